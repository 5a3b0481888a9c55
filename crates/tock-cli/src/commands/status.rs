use super::{exit_on_client_error, progress_bar};
use crate::client::{ClientError, DaemonClient};
use anyhow::{bail, Result};
use serde::Serialize;
use tock_core::{Phase, Snapshot, TimerVariant};
use tock_protocol::{Request, Response};

const BAR_WIDTH: usize = 20;

#[derive(Serialize)]
struct StatusOutput {
    phase: &'static str,
    mode: &'static str,
    variant: &'static str,
    seconds: u64,
    label: String,
    status: &'static str,
    progress: f64,
    ticking: bool,
    session_count: u32,
    break_budget_seconds: u64,
    countdown_seconds: Option<u64>,
    mini_bell_enabled: bool,
    mini_bell_interval_minutes: u32,
}

impl From<&Snapshot> for StatusOutput {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            phase: snapshot.phase.as_str(),
            mode: snapshot.mode.as_str(),
            variant: snapshot.variant.as_str(),
            seconds: snapshot.seconds,
            label: snapshot.label(),
            status: snapshot.status.text(),
            progress: snapshot.progress,
            ticking: snapshot.ticking,
            session_count: snapshot.session_count,
            break_budget_seconds: snapshot.break_budget_seconds,
            countdown_seconds: match snapshot.variant {
                TimerVariant::Countdown { total_seconds } => Some(total_seconds),
                TimerVariant::Stopwatch => None,
            },
            mini_bell_enabled: snapshot.mini_bell.enabled,
            mini_bell_interval_minutes: snapshot.mini_bell.interval_minutes,
        }
    }
}

pub async fn fetch_snapshot(client: &DaemonClient) -> Result<Snapshot, ClientError> {
    match client.send(Request::GetStatus).await? {
        Response::Status(snapshot) => Ok(snapshot),
        Response::Error { message } => Err(ClientError::Connection(message)),
        _ => Err(ClientError::Serialization(
            "unexpected response from the daemon".to_string(),
        )),
    }
}

pub async fn execute(json: bool) -> Result<()> {
    let client = DaemonClient::new();

    match fetch_snapshot(&client).await {
        Ok(snapshot) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&StatusOutput::from(&snapshot))?);
            } else {
                println!("{}", format_status(&snapshot));
            }
        }
        Err(ClientError::DaemonNotRunning) if json => {
            println!(r#"{{"error": "daemon not running", "ticking": false}}"#);
        }
        Err(ClientError::DaemonNotRunning) => {
            println!("⚫ Daemon not running");
        }
        Err(error) if json => {
            println!("{}", serde_json::json!({ "error": error.to_string() }));
            std::process::exit(1);
        }
        Err(error) => return exit_on_client_error(error),
    }

    Ok(())
}

pub fn phase_icon(snapshot: &Snapshot) -> &'static str {
    match (snapshot.phase, snapshot.ticking) {
        (Phase::Counting, true) => "🟢",
        (Phase::BreakCounting, _) => "☕",
        _ => "⚪",
    }
}

fn format_status(snapshot: &Snapshot) -> String {
    let mut lines = vec![
        format!(
            "{} {}  {}",
            phase_icon(snapshot),
            snapshot.label(),
            snapshot.status.text()
        ),
        format!(
            "   {} {:.0}%",
            progress_bar(snapshot.progress, BAR_WIDTH),
            snapshot.progress * 100.0
        ),
        format!(
            "   Mode: {} · Variant: {} · Sessions: {}",
            snapshot.mode,
            snapshot.variant.as_str(),
            snapshot.session_count
        ),
    ];

    if snapshot.mini_bell.enabled {
        lines.push(format!(
            "   Mini-bell: every {} min",
            snapshot.mini_bell.interval_minutes
        ));
    }

    lines.join("\n")
}
