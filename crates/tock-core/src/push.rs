use serde::{Deserialize, Serialize};

pub const DEFAULT_PUSH_TITLE: &str = "Tock Alert";
pub const DEFAULT_PUSH_BODY: &str = "You have a new alert!";
pub const DEFAULT_PUSH_URL: &str = "/";
pub const PUSH_VIBRATION_PATTERN: [u64; 3] = [200, 100, 200];

/// Alert relayed into a system notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub url: String,
}

/// Push body as sent; any field may be missing, null or empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPushPayload {
    title: Option<String>,
    body: Option<String>,
    url: Option<String>,
}

impl Default for PushPayload {
    fn default() -> Self {
        Self {
            title: DEFAULT_PUSH_TITLE.to_string(),
            body: DEFAULT_PUSH_BODY.to_string(),
            url: DEFAULT_PUSH_URL.to_string(),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl PushPayload {
    /// Each field falls back on its own when missing, null or empty.
    /// Absent or unparseable data yields the defaults.
    pub fn from_json(data: Option<&str>) -> Self {
        let raw = data
            .map(str::trim)
            .filter(|data| !data.is_empty())
            .and_then(|data| serde_json::from_str::<RawPushPayload>(data).ok())
            .unwrap_or_default();

        Self {
            title: or_default(raw.title, DEFAULT_PUSH_TITLE),
            body: or_default(raw.body, DEFAULT_PUSH_BODY),
            url: or_default(raw.url, DEFAULT_PUSH_URL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientWindow {
    pub id: u32,
    pub url: String,
    pub focusable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    Focus(u32),
    Open(String),
}

/// Clicking a notification focuses a window already showing its URL, or opens the URL.
pub fn resolve_click(url: &str, windows: &[ClientWindow]) -> ClickAction {
    let url = if url.is_empty() { DEFAULT_PUSH_URL } else { url };

    windows
        .iter()
        .find(|window| window.url == url && window.focusable)
        .map(|window| ClickAction::Focus(window.id))
        .unwrap_or_else(|| ClickAction::Open(url.to_string()))
}
