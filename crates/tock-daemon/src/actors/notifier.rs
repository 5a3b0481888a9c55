use std::io::Write;

use notify_rust::{Notification, Timeout, Urgency};
use tock_core::push::PUSH_VIBRATION_PATTERN;
use tock_core::{NotificationConfig, NotificationUrgency, PushPayload};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub const COMPLETION_VIBRATION_PATTERN: [u64; 3] = [200, 100, 200];
const MINI_BELL_TIMEOUT_MS: u32 = 2000;
/// Bounds how long a click watcher keeps its blocking thread.
const PUSH_TIMEOUT_MS: u32 = 60_000;
const APP_NAME: &str = "Tock";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    Default,
    Granted,
    Denied,
}

pub enum NotifierMessage {
    BreakStarted { break_seconds: u64 },
    BreakComplete { tone: String },
    MiniBell { tone: String, elapsed_seconds: u64 },
    Push { payload: PushPayload },
    RequestPermission,
}

#[derive(Clone)]
pub struct NotifierHandle {
    sender: mpsc::Sender<NotifierMessage>,
}

impl NotifierHandle {
    fn dispatch(&self, message: NotifierMessage, label: &'static str) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            if let Err(error) = sender.send(message).await {
                error!(%error, label, "failed to send notifier message");
            }
        });
    }

    pub fn send_break_started(&self, break_seconds: u64) {
        self.dispatch(NotifierMessage::BreakStarted { break_seconds }, "break started");
    }

    pub fn send_break_complete(&self, tone: String) {
        self.dispatch(NotifierMessage::BreakComplete { tone }, "break complete");
    }

    pub fn send_mini_bell(&self, tone: String, elapsed_seconds: u64) {
        self.dispatch(
            NotifierMessage::MiniBell {
                tone,
                elapsed_seconds,
            },
            "mini-bell",
        );
    }

    pub fn send_push(&self, payload: PushPayload) {
        self.dispatch(NotifierMessage::Push { payload }, "push");
    }

    pub fn request_permission(&self) {
        self.dispatch(NotifierMessage::RequestPermission, "permission request");
    }
}

pub struct NotifierActor {
    receiver: mpsc::Receiver<NotifierMessage>,
    urgency: Urgency,
    enabled: bool,
    sound_enabled: bool,
    permission: NotificationPermission,
    base_url: String,
}

impl NotifierActor {
    pub fn new(config: &NotificationConfig, base_url: String) -> (Self, NotifierHandle) {
        let (sender, receiver) = mpsc::channel(32);

        let urgency = match config.urgency {
            NotificationUrgency::Low => Urgency::Low,
            NotificationUrgency::Normal => Urgency::Normal,
            NotificationUrgency::Critical => Urgency::Critical,
        };

        let actor = Self {
            receiver,
            urgency,
            enabled: config.enabled,
            sound_enabled: config.sound_enabled,
            permission: NotificationPermission::Default,
            base_url,
        };

        let handle = NotifierHandle { sender };

        (actor, handle)
    }

    pub async fn run(mut self) {
        info!("notifier actor started");

        while let Some(message) = self.receiver.recv().await {
            match message {
                NotifierMessage::BreakStarted { break_seconds } => {
                    self.show(
                        "Focus session complete!",
                        &break_started_body(break_seconds),
                        None,
                    );
                }
                NotifierMessage::BreakComplete { tone } => {
                    self.ring_terminal_bell();
                    self.vibrate(&COMPLETION_VIBRATION_PATTERN);
                    self.show(
                        "Break complete!",
                        "Ready for another focus session? 💪",
                        Some(&tone),
                    );
                }
                NotifierMessage::MiniBell {
                    tone,
                    elapsed_seconds,
                } => {
                    debug!(elapsed_seconds, "mini-bell");
                    self.play_tone(&tone);
                }
                NotifierMessage::Push { payload } => {
                    self.show_push(payload);
                }
                NotifierMessage::RequestPermission => {
                    self.request_permission();
                }
            }
        }

        debug!("notifier actor stopped");
    }

    fn request_permission(&mut self) {
        if self.permission != NotificationPermission::Default {
            return;
        }

        self.permission = if self.enabled {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Denied
        };
        info!(permission = ?self.permission, "notification permission resolved");
    }

    fn ring_terminal_bell(&self) {
        if !self.sound_enabled {
            return;
        }

        if let Err(error) = std::io::stderr().write_all(b"\x07") {
            debug!(%error, "terminal bell unavailable");
        }
    }

    /// Terminal bell plus a short-lived notification carrying the themed sound.
    fn play_tone(&self, tone: &str) {
        if !self.sound_enabled {
            return;
        }

        self.ring_terminal_bell();

        if self.permission == NotificationPermission::Granted {
            let mut notification = self.build_notification("Tock", "🔔");
            notification
                .sound_name(tone)
                .timeout(Timeout::Milliseconds(MINI_BELL_TIMEOUT_MS));
            if let Err(error) = notification.show() {
                warn!(%error, tone, "failed to play tone");
            }
        }
    }

    fn vibrate(&self, pattern: &[u64]) {
        debug!(?pattern, "vibration requested, no haptic device on this host");
    }

    fn show(&self, title: &str, body: &str, tone: Option<&str>) {
        if self.permission != NotificationPermission::Granted {
            debug!(title, permission = ?self.permission, "notification suppressed");
            return;
        }

        let mut notification = self.build_notification(title, body);
        if let Some(tone) = tone.filter(|_| self.sound_enabled) {
            notification.sound_name(tone);
        }

        match notification.show() {
            Ok(_) => {
                debug!(title, "notification sent");
            }
            Err(error) => {
                warn!(%error, title, "failed to show notification");
            }
        }
    }

    fn show_push(&self, payload: PushPayload) {
        if self.permission != NotificationPermission::Granted {
            debug!(title = %payload.title, "push notification suppressed");
            return;
        }

        self.vibrate(&PUSH_VIBRATION_PATTERN);

        let mut notification = self.build_notification(&payload.title, &payload.body);
        notification
            .action("default", "Open")
            .timeout(Timeout::Milliseconds(PUSH_TIMEOUT_MS));

        match notification.show() {
            Ok(_handle) => {
                debug!(title = %payload.title, "push notification sent");
                #[cfg(target_os = "linux")]
                super::launcher::watch_click(_handle, resolve_url(&self.base_url, &payload.url));
            }
            Err(error) => {
                warn!(%error, title = %payload.title, "failed to show push notification");
            }
        }
    }

    fn build_notification(&self, summary: &str, body: &str) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(summary)
            .body(body)
            .urgency(self.urgency)
            .appname(APP_NAME);

        notification
    }
}

/// Minutes are not padded in the notification body, seconds are.
pub fn break_started_body(break_seconds: u64) -> String {
    format!(
        "Time for a {}:{:02} break 🎉",
        break_seconds / 60,
        break_seconds % 60
    )
}

fn resolve_url(base_url: &str, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}
