use super::acknowledge;
use crate::client::DaemonClient;
use crate::daemon_launcher::ensure_daemon_running;
use anyhow::Result;
use tock_protocol::Request;

pub async fn execute() -> Result<()> {
    ensure_daemon_running().await?;

    acknowledge(&DaemonClient::new(), Request::Start, "🚀 Timer started").await
}
