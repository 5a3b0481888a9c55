use super::acknowledge;
use crate::client::DaemonClient;
use anyhow::Result;
use tock_protocol::Request;

pub async fn stop() -> Result<()> {
    acknowledge(&DaemonClient::new(), Request::Stop, "⏸️  Timer stopped").await
}

pub async fn toggle() -> Result<()> {
    acknowledge(&DaemonClient::new(), Request::Toggle, "⏯️  Timer toggled").await
}

pub async fn reset(sessions: bool) -> Result<()> {
    let client = DaemonClient::new();

    acknowledge(&client, Request::Reset, "🔄 Timer reset").await?;

    if sessions {
        acknowledge(&client, Request::ResetSessions, "   Session count cleared").await?;
    }

    Ok(())
}
