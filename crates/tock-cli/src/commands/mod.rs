mod asset;
mod bell;
mod control;
mod mode;
mod ping;
mod push;
mod start;
mod status;
mod variant;
mod watch;

use crate::client::{ClientError, DaemonClient};
use anyhow::{bail, Result};
use tock_protocol::{Request, Response};

pub use asset::execute as asset;
pub use bell::execute as bell;
pub use control::{reset, stop, toggle};
pub use mode::{execute as mode, ModeArg};
pub use ping::execute as ping;
pub use push::execute as push;
pub use start::execute as start;
pub use status::execute as status;
pub use variant::{execute as variant, VariantArg};
pub use watch::execute as watch;

/// Sends a command that only acknowledges, and prints `success` when it does.
async fn acknowledge(client: &DaemonClient, request: Request, success: &str) -> Result<()> {
    match client.send(request).await {
        Ok(Response::Ok) => {
            println!("{}", success);
            Ok(())
        }
        Ok(Response::Error { message }) => bail!("{}", message),
        Ok(_) => bail!("unexpected response from the daemon"),
        Err(error) => exit_on_client_error(error),
    }
}

fn exit_on_client_error<T>(error: ClientError) -> Result<T> {
    match error {
        ClientError::DaemonNotRunning => {
            eprintln!("⚫ The daemon is not running");
            eprintln!("   Start it with: tock start");
            std::process::exit(1);
        }
        ClientError::Timeout => bail!("timed out connecting to the daemon"),
        error => bail!("{}", error),
    }
}

/// Fixed-width bar with `progress` between 0.0 and 1.0.
pub(crate) fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
