use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tock_core::{resolve_click, ClickAction};
use tracing::{debug, warn};

const OPENER: &str = "xdg-open";

/// Waits for the notification's default action on a blocking thread, then
/// opens its URL. The daemon owns no windows, so a click always opens.
/// The thread is released when the notification closes, at the latest when
/// it expires. The opener runs on the same thread and is reaped there.
pub fn watch_click(handle: notify_rust::NotificationHandle, url: String) {
    tokio::task::spawn_blocking(move || {
        handle.wait_for_action(|action| {
            if action != "default" {
                debug!(action, "notification dismissed");
                return;
            }

            match resolve_click(&url, &[]) {
                ClickAction::Open(url) => open_url(&url),
                ClickAction::Focus(window) => debug!(window, "window focused"),
            }
        });
    });
}

pub fn open_url(url: &str) {
    let opener = match which::which(OPENER) {
        Ok(path) => path,
        Err(error) => {
            warn!(%error, "cannot open notification URL, {} not found", OPENER);
            return;
        }
    };

    match run_opener(&opener, url) {
        Ok(status) if status.success() => debug!(url, "notification URL opened"),
        Ok(status) => warn!(%status, url, "opener exited with failure"),
        Err(error) => warn!(%error, url, "failed to open notification URL"),
    }
}

/// Runs the opener and reaps it.
fn run_opener(opener: &Path, url: &str) -> std::io::Result<ExitStatus> {
    Command::new(opener)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?
        .wait()
}
