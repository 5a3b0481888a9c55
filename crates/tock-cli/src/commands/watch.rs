use super::status::{fetch_snapshot, phase_icon};
use super::{exit_on_client_error, progress_bar};
use crate::client::DaemonClient;
use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

const REFRESH_PERIOD: Duration = Duration::from_secs(1);
const BAR_WIDTH: usize = 30;

/// Redraws a single status line every second until interrupted.
pub async fn execute() -> Result<()> {
    let client = DaemonClient::new().with_timeout(Duration::from_secs(2));
    let mut refresh = interval(REFRESH_PERIOD);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let snapshot = match fetch_snapshot(&client).await {
                    Ok(snapshot) => snapshot,
                    Err(error) => {
                        println!();
                        return exit_on_client_error(error);
                    }
                };

                let mut stdout = std::io::stdout().lock();
                write!(
                    stdout,
                    "\r\x1b[2K{} {} {} {}",
                    phase_icon(&snapshot),
                    snapshot.label(),
                    progress_bar(snapshot.progress, BAR_WIDTH),
                    snapshot.status.text()
                )?;
                stdout.flush()?;
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
        }
    }
}
