use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, info};

use tock_core::domain::{TransitionKind, TransitionToken};
use tock_core::{SettingsError, Snapshot, TimerEvent, TimerMode, TimerSession, TimerVariant};

use super::NotifierHandle;
#[cfg(target_os = "linux")]
use super::TrayStateHandle;

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub enum TimerMessage {
    Start,
    Stop,
    Toggle,
    Reset,
    ResetSessions,
    SetMiniBell {
        enabled: bool,
        interval_minutes: u32,
        reply: oneshot::Sender<Result<(), SettingsError>>,
    },
    SwitchMode {
        mode: TimerMode,
    },
    SetVariant {
        variant: TimerVariant,
        reply: oneshot::Sender<Result<(), SettingsError>>,
    },
    GetStatus {
        reply: oneshot::Sender<Snapshot>,
    },
}

/// A deferred transition waiting for its delay to elapse.
struct Deferred {
    token: TransitionToken,
    kind: TransitionKind,
    sleep: Pin<Box<Sleep>>,
}

pub struct TimerActor {
    receiver: mpsc::Receiver<TimerMessage>,
    session: TimerSession,
    transition_delay: Duration,
    notifier: Option<NotifierHandle>,
    #[cfg(target_os = "linux")]
    tray_state: Option<TrayStateHandle>,
}

#[derive(Clone)]
pub struct TimerHandle {
    sender: mpsc::Sender<TimerMessage>,
}

type SendResult = Result<(), mpsc::error::SendError<TimerMessage>>;

impl TimerHandle {
    pub async fn start(&self) -> SendResult {
        self.sender.send(TimerMessage::Start).await
    }

    pub async fn stop(&self) -> SendResult {
        self.sender.send(TimerMessage::Stop).await
    }

    pub async fn toggle(&self) -> SendResult {
        self.sender.send(TimerMessage::Toggle).await
    }

    pub async fn reset(&self) -> SendResult {
        self.sender.send(TimerMessage::Reset).await
    }

    pub async fn reset_sessions(&self) -> SendResult {
        self.sender.send(TimerMessage::ResetSessions).await
    }

    pub async fn switch_mode(&self, mode: TimerMode) -> SendResult {
        self.sender.send(TimerMessage::SwitchMode { mode }).await
    }

    /// `None` when the actor is gone.
    pub async fn set_mini_bell(
        &self,
        enabled: bool,
        interval_minutes: u32,
    ) -> Option<Result<(), SettingsError>> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(TimerMessage::SetMiniBell {
                enabled,
                interval_minutes,
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }

    pub async fn set_variant(&self, variant: TimerVariant) -> Option<Result<(), SettingsError>> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(TimerMessage::SetVariant {
                variant,
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }

    pub async fn get_status(&self) -> Option<Snapshot> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(TimerMessage::GetStatus {
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }
}

impl TimerActor {
    pub fn new(
        session: TimerSession,
        transition_delay: Duration,
        notifier: Option<NotifierHandle>,
    ) -> (Self, TimerHandle) {
        let (sender, receiver) = mpsc::channel(32);

        let actor = Self {
            receiver,
            session,
            transition_delay,
            notifier,
            #[cfg(target_os = "linux")]
            tray_state: None,
        };

        let handle = TimerHandle { sender };

        (actor, handle)
    }

    #[cfg(target_os = "linux")]
    pub fn with_tray(mut self, tray_state: Option<TrayStateHandle>) -> Self {
        self.tray_state = tray_state;
        self
    }

    #[cfg(target_os = "linux")]
    fn update_tray(&self) {
        if let Some(ref tray) = self.tray_state {
            tray.set_snapshot(&self.session.snapshot());
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn update_tray(&self) {}

    pub async fn run(mut self) {
        let mut ticker: Option<Interval> = None;
        let mut deferred: Option<Deferred> = None;

        self.update_tray();

        loop {
            self.sync_tick_source(&mut ticker);
            self.sync_deferred(&mut deferred);

            tokio::select! {
                message = self.receiver.recv() => {
                    match message {
                        Some(message) => self.handle_message(message),
                        None => break,
                    }
                }
                _ = next_tick(&mut ticker) => {
                    let events = self.session.tick();
                    self.dispatch(events);
                }
                fired = fire_deferred(&mut deferred) => {
                    let events = match fired.kind {
                        TransitionKind::StartBreak { .. } => self.session.start_break(fired.token),
                        TransitionKind::ResumeBreak => self.session.resume_break(fired.token),
                    };
                    if events.is_empty() {
                        debug!("deferred transition no longer applies");
                    }
                    self.dispatch(events);
                }
            }

            self.update_tray();
        }

        debug!("timer actor stopped");
    }

    /// Exactly one interval exists while the session ticks, none otherwise.
    fn sync_tick_source(&self, ticker: &mut Option<Interval>) {
        match (self.session.is_ticking(), ticker.is_some()) {
            (true, false) => {
                let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                *ticker = Some(interval);
                debug!("tick source started");
            }
            (false, true) => {
                *ticker = None;
                debug!("tick source stopped");
            }
            _ => {}
        }
    }

    fn sync_deferred(&self, deferred: &mut Option<Deferred>) {
        match self.session.pending() {
            Some(pending) => {
                let already_scheduled = deferred
                    .as_ref()
                    .is_some_and(|scheduled| scheduled.token == pending.token);
                if !already_scheduled {
                    debug!(kind = ?pending.kind, delay = ?self.transition_delay, "transition scheduled");
                    *deferred = Some(Deferred {
                        token: pending.token,
                        kind: pending.kind,
                        sleep: Box::pin(tokio::time::sleep(self.transition_delay)),
                    });
                }
            }
            None => {
                if deferred.take().is_some() {
                    debug!("scheduled transition cancelled");
                }
            }
        }
    }

    fn handle_message(&mut self, message: TimerMessage) {
        match message {
            TimerMessage::Start => {
                let events = self.session.start();
                self.dispatch(events);
            }
            TimerMessage::Stop => {
                let events = self.session.stop();
                self.dispatch(events);
            }
            TimerMessage::Toggle => {
                let events = self.session.toggle();
                self.dispatch(events);
            }
            TimerMessage::Reset => {
                let events = self.session.reset();
                self.dispatch(events);
            }
            TimerMessage::ResetSessions => {
                self.session.reset_sessions();
                info!("session count cleared");
            }
            TimerMessage::SetMiniBell {
                enabled,
                interval_minutes,
                reply,
            } => {
                let result = self.session.set_mini_bell(enabled, interval_minutes);
                if result.is_ok() {
                    info!(enabled, interval_minutes, "mini-bell configured");
                }
                let _ = reply.send(result);
            }
            TimerMessage::SwitchMode { mode } => {
                let events = self.session.switch_mode(mode);
                self.dispatch(events);
            }
            TimerMessage::SetVariant { variant, reply } => {
                let result = self.session.set_variant(variant);
                if result.is_ok() {
                    info!(variant = variant.as_str(), "timer variant changed");
                }
                let _ = reply.send(result);
            }
            TimerMessage::GetStatus { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
        }
    }

    fn dispatch(&self, events: Vec<TimerEvent>) {
        for event in events {
            match event {
                TimerEvent::Started => {
                    info!(phase = %self.session.phase(), mode = %self.session.mode(), "timer started");
                }
                TimerEvent::Paused => {
                    info!(seconds = self.session.seconds(), "timer paused");
                }
                TimerEvent::FocusComplete { focus_seconds } => {
                    info!(focus_seconds, "focus complete, break pending");
                }
                TimerEvent::BreakStarted {
                    break_seconds,
                    session_count,
                } => {
                    info!(break_seconds, session_count, "break started");
                    if let Some(ref notifier) = self.notifier {
                        notifier.send_break_started(break_seconds);
                    }
                }
                TimerEvent::BreakResumed => {
                    debug!("break countdown running");
                }
                TimerEvent::BreakComplete => {
                    info!("break complete");
                    if let Some(ref notifier) = self.notifier {
                        notifier.send_break_complete(self.session.tones().completion.clone());
                    }
                }
                TimerEvent::MiniBell { elapsed_seconds } => {
                    debug!(elapsed_seconds, "mini-bell due");
                    if let Some(ref notifier) = self.notifier {
                        notifier.send_mini_bell(
                            self.session.tones().mini_bell.clone(),
                            elapsed_seconds,
                        );
                    }
                }
                TimerEvent::ModeSwitched { mode } => {
                    info!(%mode, "mode switched");
                }
                TimerEvent::Reset => {
                    info!("timer reset");
                }
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending::<()>().await,
    }
}

async fn fire_deferred(deferred: &mut Option<Deferred>) -> Deferred {
    match deferred {
        Some(scheduled) => {
            scheduled.sleep.as_mut().await;
        }
        None => pending::<()>().await,
    }
    match deferred.take() {
        Some(fired) => fired,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tock_core::{Phase, SessionSettings};

    const MILLIS: Duration = Duration::from_millis(1);

    fn spawn_actor() -> TimerHandle {
        let mut session = TimerSession::new(SessionSettings::default());
        session.set_mini_bell(false, 25).unwrap();
        let (actor, handle) = TimerActor::new(session, Duration::from_secs(1), None);
        tokio::spawn(actor.run());
        handle
    }

    async fn advance(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_get_status() {
        let handle = spawn_actor();

        handle.start().await.unwrap();
        advance(Duration::from_secs(5) + 500 * MILLIS).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.phase, Phase::Counting);
        assert!(status.ticking);
        assert_eq!(status.seconds, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_schedules_break_after_delay() {
        let handle = spawn_actor();

        handle.start().await.unwrap();
        advance(Duration::from_secs(1800) + 500 * MILLIS).await;
        handle.stop().await.unwrap();
        advance(600 * MILLIS).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.phase, Phase::Idle);
        assert_eq!(status.seconds, 1800);

        advance(500 * MILLIS).await;
        let status = handle.get_status().await.unwrap();
        assert_eq!(status.phase, Phase::BreakCounting);
        assert_eq!(status.break_budget_seconds, 600);
        assert_eq!(status.seconds, 600);
        assert_eq!(status.session_count, 1);
        assert!(!status.ticking);

        advance(Duration::from_secs(1)).await;
        let status = handle.get_status().await.unwrap();
        assert!(status.ticking);

        advance(Duration::from_secs(10)).await;
        let status = handle.get_status().await.unwrap();
        assert_eq!(status.seconds, 590);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_delay_prevents_break() {
        let handle = spawn_actor();

        handle.start().await.unwrap();
        advance(Duration::from_secs(90) + 500 * MILLIS).await;
        handle.stop().await.unwrap();
        advance(300 * MILLIS).await;
        handle.reset().await.unwrap();
        advance(Duration::from_secs(3)).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.phase, Phase::Idle);
        assert_eq!(status.seconds, 0);
        assert_eq!(status.session_count, 0);
        assert!(!status.ticking);
    }

    #[tokio::test(start_paused = true)]
    async fn break_runs_to_completion_and_returns_to_idle() {
        let handle = spawn_actor();

        handle.start().await.unwrap();
        advance(Duration::from_secs(30) + 500 * MILLIS).await;
        handle.stop().await.unwrap();
        advance(Duration::from_secs(20)).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.phase, Phase::Idle);
        assert_eq!(status.seconds, 0);
        assert_eq!(status.session_count, 1);
        assert_eq!(status.status, tock_core::Status::BreakComplete);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_commands_reply_with_validation() {
        let handle = spawn_actor();

        assert_eq!(handle.set_mini_bell(true, 0).await, Some(Err(SettingsError::ZeroInterval)));
        assert_eq!(handle.set_mini_bell(true, 5).await, Some(Ok(())));

        handle.start().await.unwrap();
        assert_eq!(
            handle.set_variant(TimerVariant::countdown_minutes(25)).await,
            Some(Err(SettingsError::Busy))
        );

        handle.switch_mode(TimerMode::Relax).await.unwrap();
        let status = handle.get_status().await.unwrap();
        assert_eq!(status.mode, TimerMode::Relax);
        assert!(!status.mini_bell.enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_variant_breaks_on_its_own() {
        let handle = spawn_actor();

        assert_eq!(
            handle
                .set_variant(TimerVariant::Countdown { total_seconds: 60 })
                .await,
            Some(Ok(()))
        );
        handle.start().await.unwrap();
        advance(Duration::from_secs(62) + 500 * MILLIS).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.phase, Phase::BreakCounting);
        assert_eq!(status.break_budget_seconds, 20);
    }
}
