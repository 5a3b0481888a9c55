//! Tock protocol definitions for CLI-daemon communication
//!
//! This crate defines the IPC protocol between the tock CLI and daemon.
//! Frames are a 4-byte little-endian length followed by a bincode payload.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use tock_core::{PushPayload, Resource, Snapshot, TimerMode, TimerVariant};

/// Requests sent from CLI to daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    /// Start or resume counting
    Start,
    /// Stop counting; a focus stop schedules the automatic break
    Stop,
    /// Start when stopped, stop when running
    Toggle,
    /// Return to idle, keeping the session count
    Reset,
    /// Zero the completed session counter
    ResetSessions,
    /// Configure the periodic reminder
    SetMiniBell { enabled: bool, interval_minutes: u32 },
    /// Switch between focus and relax profiles
    SwitchMode { mode: TimerMode },
    /// Select stopwatch or fixed-duration focus (idle only)
    SetVariant { variant: TimerVariant },
    /// Get the current snapshot
    GetStatus,
    /// Relay an alert into a system notification
    Push { payload: PushPayload },
    /// Fetch a static asset through the offline cache
    FetchAsset { url: String },
    /// Ping the daemon to check if it's alive
    Ping,
}

/// Responses sent from daemon to CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Current timer snapshot
    Status(Snapshot),
    /// Asset body and whether it came from the offline cache
    Asset { resource: Resource, from_cache: bool },
    /// Generic success acknowledgment
    Ok,
    /// Error response with message
    Error { message: String },
    /// Pong response to ping
    Pong,
}

/// Local socket the daemon listens on and the CLI connects to.
#[cfg(unix)]
pub fn socket_path() -> PathBuf {
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/run/user/{}/tock.sock", uid))
}

#[cfg(windows)]
pub fn socket_path() -> PathBuf {
    let local_app_data = std::env::var("LOCALAPPDATA").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(format!(r"{}\tock\tock.sock", local_app_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tock_core::TimerSession;

    fn roundtrip<T>(value: &T) -> T
    where
        T: Serialize + for<'de> Deserialize<'de>,
    {
        let bytes = bincode::serialize(value).unwrap();
        bincode::deserialize(&bytes).unwrap()
    }

    #[test]
    fn command_requests_survive_encoding() {
        let requests = vec![
            Request::Start,
            Request::Stop,
            Request::Toggle,
            Request::Reset,
            Request::ResetSessions,
            Request::SetMiniBell {
                enabled: true,
                interval_minutes: 10,
            },
            Request::SwitchMode {
                mode: TimerMode::Relax,
            },
            Request::SetVariant {
                variant: TimerVariant::countdown_minutes(25),
            },
            Request::GetStatus,
            Request::Ping,
        ];

        for request in requests {
            assert_eq!(roundtrip(&request), request);
        }
    }

    #[test]
    fn push_request_carries_payload() {
        let request = Request::Push {
            payload: PushPayload {
                title: "Stand up".to_string(),
                body: "Stretch your legs".to_string(),
                url: "/".to_string(),
            },
        };

        assert_eq!(roundtrip(&request), request);
    }

    #[test]
    fn status_response_carries_snapshot() {
        let mut session = TimerSession::default();
        session.start();
        session.tick();
        let response = Response::Status(session.snapshot());

        match roundtrip(&response) {
            Response::Status(snapshot) => {
                assert_eq!(snapshot.seconds, 1);
                assert!(snapshot.ticking);
                assert_eq!(snapshot.label(), "00:01");
            }
            other => panic!("expected Status, got {:?}", other),
        }
    }

    #[test]
    fn asset_response_keeps_body_bytes() {
        let response = Response::Asset {
            resource: Resource::new("http://localhost:8080/app.js", None, vec![0, 159, 146, 150]),
            from_cache: true,
        };

        assert_eq!(roundtrip(&response), response);
    }

    #[cfg(unix)]
    #[test]
    fn socket_lives_in_the_user_runtime_dir() {
        let path = socket_path();

        assert!(path.starts_with("/run/user"));
        assert!(path.ends_with("tock.sock"));
    }
}
