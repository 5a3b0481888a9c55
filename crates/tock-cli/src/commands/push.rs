use super::acknowledge;
use crate::client::DaemonClient;
use anyhow::Result;
use tock_protocol::{PushPayload, Request};

/// Starts from `data` (a JSON push body) or the defaults, then applies flags.
fn build_payload(
    data: Option<&str>,
    title: Option<String>,
    body: Option<String>,
    url: Option<String>,
) -> PushPayload {
    let mut payload = PushPayload::from_json(data);
    if let Some(title) = title {
        payload.title = title;
    }
    if let Some(body) = body {
        payload.body = body;
    }
    if let Some(url) = url {
        payload.url = url;
    }
    payload
}

pub async fn execute(
    data: Option<String>,
    title: Option<String>,
    body: Option<String>,
    url: Option<String>,
) -> Result<()> {
    let payload = build_payload(data.as_deref(), title, body, url);
    let success = format!("📨 Alert relayed: {}", payload.title);

    acknowledge(&DaemonClient::new(), Request::Push { payload }, &success).await
}
