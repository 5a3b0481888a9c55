use super::status::fetch_snapshot;
use super::{acknowledge, exit_on_client_error};
use crate::client::DaemonClient;
use anyhow::Result;
use tock_core::MiniBell;
use tock_protocol::Request;

/// Fills unspecified options from the current mini-bell.
fn resolve_settings(current: MiniBell, enabled: Option<bool>, interval: Option<u32>) -> (bool, u32) {
    let interval_minutes = interval.unwrap_or(current.interval_minutes);
    let enabled = match (enabled, interval) {
        (Some(enabled), _) => enabled,
        (None, Some(_)) => true,
        (None, None) => current.enabled,
    };
    (enabled, interval_minutes)
}

pub async fn execute(enabled: Option<bool>, interval: Option<u32>) -> Result<()> {
    let client = DaemonClient::new();

    let current = match fetch_snapshot(&client).await {
        Ok(snapshot) => snapshot.mini_bell,
        Err(error) => return exit_on_client_error(error),
    };

    if enabled.is_none() && interval.is_none() {
        if current.enabled {
            println!("🔔 Mini-bell every {} min", current.interval_minutes);
        } else {
            println!("🔕 Mini-bell off");
        }
        return Ok(());
    }

    let (enabled, interval_minutes) = resolve_settings(current, enabled, interval);

    let success = if enabled {
        format!("🔔 Mini-bell every {} min", interval_minutes)
    } else {
        "🔕 Mini-bell off".to_string()
    };

    acknowledge(
        &client,
        Request::SetMiniBell {
            enabled,
            interval_minutes,
        },
        &success,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_alone_enables_the_bell() {
        let current = MiniBell::new(false, 25);
        assert_eq!(resolve_settings(current, None, Some(10)), (true, 10));
    }

    #[test]
    fn off_keeps_the_current_interval() {
        let current = MiniBell::new(true, 15);
        assert_eq!(resolve_settings(current, Some(false), None), (false, 15));
    }

    #[test]
    fn explicit_flags_win() {
        let current = MiniBell::new(true, 15);
        assert_eq!(resolve_settings(current, Some(false), Some(5)), (false, 5));
    }
}
