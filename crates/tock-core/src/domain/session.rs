//! The timer state machine.
//!
//! `TimerSession` is driven by one-second ticks and by user commands. Every
//! operation returns the events it produced; the host turns those into
//! sounds, notifications and redraws. Deferred transitions (break start and
//! break resume) are exposed through [`TimerSession::pending`] and must be
//! fed back with their token once their delay has elapsed.

use thiserror::Error;

use super::snapshot::{
    break_progress, countdown_progress, stopwatch_progress, DEFAULT_PROGRESS_REFERENCE_SECONDS,
};
use super::phase::MAX_COUNTDOWN_MINUTES;
use super::{
    MiniBell, ModeTable, Phase, Snapshot, Status, TimerEvent, TimerMode, TimerVariant, ToneSet,
};

/// Break length is a third of the focus time it follows.
pub const BREAK_DIVISOR: u64 = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("mini-bell interval must be at least one minute")]
    ZeroInterval,

    #[error("countdown duration must be at least one second")]
    ZeroCountdown,

    #[error("countdown duration must not exceed {} minutes", MAX_COUNTDOWN_MINUTES)]
    CountdownTooLong,

    #[error("timer variant can only change while the timer is idle")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    StartBreak { focus_seconds: u64 },
    ResumeBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub token: TransitionToken,
    pub kind: TransitionKind,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub variant: TimerVariant,
    pub mode: TimerMode,
    pub modes: ModeTable,
    pub progress_reference_seconds: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            variant: TimerVariant::Stopwatch,
            mode: TimerMode::Focus,
            modes: ModeTable::default(),
            progress_reference_seconds: DEFAULT_PROGRESS_REFERENCE_SECONDS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimerSession {
    seconds: u64,
    phase: Phase,
    ticking: bool,
    mode: TimerMode,
    modes: ModeTable,
    variant: TimerVariant,
    session_count: u32,
    break_budget_seconds: u64,
    mini_bell: MiniBell,
    status: Status,
    pending: Option<PendingTransition>,
    next_token: u64,
    progress_reference_seconds: u64,
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl TimerSession {
    pub fn new(settings: SessionSettings) -> Self {
        let profile = settings.modes.profile(settings.mode);
        let mini_bell = MiniBell::new(profile.mini_bell_enabled, profile.mini_bell_interval_minutes);

        Self {
            seconds: 0,
            phase: Phase::Idle,
            ticking: false,
            mode: settings.mode,
            mini_bell,
            modes: settings.modes,
            variant: settings.variant,
            session_count: 0,
            break_budget_seconds: 0,
            status: Status::Ready,
            pending: None,
            next_token: 0,
            progress_reference_seconds: settings.progress_reference_seconds,
        }
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn variant(&self) -> TimerVariant {
        self.variant
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn break_budget_seconds(&self) -> u64 {
        self.break_budget_seconds
    }

    pub fn mini_bell(&self) -> &MiniBell {
        &self.mini_bell
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    pub fn tones(&self) -> &ToneSet {
        &self.modes.profile(self.mode).tones
    }

    pub fn start(&mut self) -> Vec<TimerEvent> {
        if self.ticking {
            return Vec::new();
        }

        match self.phase {
            Phase::Idle => {
                self.pending = None;
                if let TimerVariant::Countdown { total_seconds } = self.variant {
                    if self.seconds == 0 {
                        self.seconds = total_seconds;
                    }
                }
                self.phase = Phase::Counting;
                self.ticking = true;
                self.status = self.counting_status();
                vec![TimerEvent::Started]
            }
            Phase::BreakCounting => {
                self.pending = None;
                self.ticking = true;
                self.status = Status::BreakTime;
                vec![TimerEvent::Started]
            }
            Phase::Counting => Vec::new(),
        }
    }

    pub fn stop(&mut self) -> Vec<TimerEvent> {
        match self.phase {
            Phase::Counting if self.ticking => {
                let focus_seconds = self.focus_elapsed();
                self.ticking = false;
                self.phase = Phase::Idle;
                if focus_seconds > 0 {
                    self.complete_focus(focus_seconds)
                } else {
                    self.status = Status::Paused;
                    vec![TimerEvent::Paused]
                }
            }
            Phase::BreakCounting if self.ticking || self.pending.is_some() => {
                self.ticking = false;
                self.pending = None;
                self.status = Status::Paused;
                vec![TimerEvent::Paused]
            }
            _ => Vec::new(),
        }
    }

    /// Single start/stop control.
    pub fn toggle(&mut self) -> Vec<TimerEvent> {
        if self.ticking {
            self.stop()
        } else {
            self.start()
        }
    }

    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.ticking {
            return Vec::new();
        }

        match self.phase {
            Phase::Counting => self.tick_focus(),
            Phase::BreakCounting => self.tick_break(),
            Phase::Idle => Vec::new(),
        }
    }

    /// Deferred Counting -> BreakCounting transition. No-op when `token` was
    /// invalidated by a command issued during the delay.
    pub fn start_break(&mut self, token: TransitionToken) -> Vec<TimerEvent> {
        let focus_seconds = match self.pending {
            Some(PendingTransition {
                token: pending_token,
                kind: TransitionKind::StartBreak { focus_seconds },
            }) if pending_token == token && self.phase == Phase::Idle => focus_seconds,
            _ => return Vec::new(),
        };

        let budget = self.break_budget_for(focus_seconds);
        self.pending = None;
        self.break_budget_seconds = budget;
        self.seconds = budget;
        self.phase = Phase::BreakCounting;
        self.ticking = false;
        self.session_count += 1;
        self.status = Status::BreakStarted;
        self.schedule(TransitionKind::ResumeBreak);

        vec![TimerEvent::BreakStarted {
            break_seconds: budget,
            session_count: self.session_count,
        }]
    }

    /// Deferred start of the break countdown.
    pub fn resume_break(&mut self, token: TransitionToken) -> Vec<TimerEvent> {
        match self.pending {
            Some(PendingTransition {
                token: pending_token,
                kind: TransitionKind::ResumeBreak,
            }) if pending_token == token && self.phase == Phase::BreakCounting => {
                self.pending = None;
                self.ticking = true;
                self.status = Status::BreakTime;
                vec![TimerEvent::BreakResumed]
            }
            _ => Vec::new(),
        }
    }

    pub fn reset(&mut self) -> Vec<TimerEvent> {
        self.ticking = false;
        self.pending = None;
        self.phase = Phase::Idle;
        self.seconds = 0;
        self.break_budget_seconds = 0;
        self.mini_bell.rewind();
        self.status = Status::Ready;
        vec![TimerEvent::Reset]
    }

    pub fn reset_sessions(&mut self) {
        self.session_count = 0;
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Vec<TimerEvent> {
        let profile = self.modes.profile(mode);
        self.mode = mode;
        self.mini_bell.enabled = profile.mini_bell_enabled;
        self.mini_bell.interval_minutes = profile.mini_bell_interval_minutes;
        if self.phase == Phase::Counting && self.ticking {
            self.status = self.counting_status();
        }
        vec![TimerEvent::ModeSwitched { mode }]
    }

    pub fn set_mini_bell(&mut self, enabled: bool, interval_minutes: u32) -> Result<(), SettingsError> {
        if interval_minutes == 0 {
            return Err(SettingsError::ZeroInterval);
        }
        self.mini_bell.enabled = enabled;
        self.mini_bell.interval_minutes = interval_minutes;
        Ok(())
    }

    pub fn set_variant(&mut self, variant: TimerVariant) -> Result<(), SettingsError> {
        if let TimerVariant::Countdown { total_seconds } = variant {
            if total_seconds == 0 {
                return Err(SettingsError::ZeroCountdown);
            }
            if total_seconds > MAX_COUNTDOWN_MINUTES * 60 {
                return Err(SettingsError::CountdownTooLong);
            }
        }
        if self.phase != Phase::Idle || self.ticking || self.pending.is_some() {
            return Err(SettingsError::Busy);
        }
        self.variant = variant;
        self.seconds = 0;
        self.status = Status::Ready;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seconds: self.seconds,
            phase: self.phase,
            mode: self.mode,
            variant: self.variant,
            session_count: self.session_count,
            break_budget_seconds: self.break_budget_seconds,
            progress: self.progress(),
            status: self.status,
            ticking: self.ticking,
            mini_bell: self.mini_bell,
        }
    }

    fn tick_focus(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();

        match self.variant {
            TimerVariant::Stopwatch => self.seconds += 1,
            TimerVariant::Countdown { .. } => self.seconds = self.seconds.saturating_sub(1),
        }

        let focus_seconds = self.focus_elapsed();
        if self.mini_bell.check(focus_seconds) {
            events.push(TimerEvent::MiniBell {
                elapsed_seconds: focus_seconds,
            });
        }

        if matches!(self.variant, TimerVariant::Countdown { .. }) && self.seconds == 0 {
            self.ticking = false;
            self.phase = Phase::Idle;
            events.extend(self.complete_focus(focus_seconds));
        }

        events
    }

    fn tick_break(&mut self) -> Vec<TimerEvent> {
        self.seconds = self.seconds.saturating_sub(1);
        if self.seconds > 0 {
            return Vec::new();
        }

        self.ticking = false;
        self.phase = Phase::Idle;
        self.break_budget_seconds = 0;
        self.mini_bell.rewind();
        self.status = Status::BreakComplete;
        vec![TimerEvent::BreakComplete]
    }

    fn complete_focus(&mut self, focus_seconds: u64) -> Vec<TimerEvent> {
        self.status = Status::FocusComplete;
        self.schedule(TransitionKind::StartBreak { focus_seconds });
        vec![TimerEvent::FocusComplete { focus_seconds }]
    }

    fn schedule(&mut self, kind: TransitionKind) {
        self.next_token += 1;
        self.pending = Some(PendingTransition {
            token: TransitionToken(self.next_token),
            kind,
        });
    }

    fn focus_elapsed(&self) -> u64 {
        match self.variant {
            TimerVariant::Stopwatch => self.seconds,
            TimerVariant::Countdown { total_seconds } => total_seconds.saturating_sub(self.seconds),
        }
    }

    fn break_budget_for(&self, focus_seconds: u64) -> u64 {
        match self.variant {
            TimerVariant::Stopwatch => focus_seconds / BREAK_DIVISOR,
            TimerVariant::Countdown { total_seconds } => total_seconds / BREAK_DIVISOR,
        }
    }

    fn focus_progress(&self, focus_seconds: u64) -> f64 {
        match self.variant {
            TimerVariant::Stopwatch => {
                stopwatch_progress(focus_seconds, self.progress_reference_seconds)
            }
            TimerVariant::Countdown { total_seconds } => {
                countdown_progress(focus_seconds, total_seconds)
            }
        }
    }

    fn progress(&self) -> f64 {
        match self.phase {
            Phase::BreakCounting => break_progress(self.break_budget_seconds, self.seconds),
            Phase::Counting => self.focus_progress(self.focus_elapsed()),
            Phase::Idle => match self.pending {
                Some(PendingTransition {
                    kind: TransitionKind::StartBreak { focus_seconds },
                    ..
                }) => self.focus_progress(focus_seconds),
                _ => 0.0,
            },
        }
    }

    fn counting_status(&self) -> Status {
        match self.mode {
            TimerMode::Focus => Status::Focusing,
            TimerMode::Relax => Status::Relaxing,
        }
    }
}
