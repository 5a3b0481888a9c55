use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Counting,
    BreakCounting,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Counting => "counting",
            Phase::BreakCounting => "break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Short status line shown next to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Ready,
    Focusing,
    Relaxing,
    FocusComplete,
    BreakStarted,
    BreakTime,
    BreakComplete,
    Paused,
}

impl Status {
    pub fn text(&self) -> &'static str {
        match self {
            Status::Ready => "Ready",
            Status::Focusing => "Focusing...",
            Status::Relaxing => "Relaxing...",
            Status::FocusComplete => "Focus Complete!",
            Status::BreakStarted => "Break Started!",
            Status::BreakTime => "Break Time",
            Status::BreakComplete => "Break Complete!",
            Status::Paused => "Paused",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Longest accepted countdown, one day.
pub const MAX_COUNTDOWN_MINUTES: u64 = 24 * 60;

/// How the focus phase counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerVariant {
    /// Open-ended: counts up until stopped.
    #[default]
    Stopwatch,
    /// Fixed duration: counts down from `total_seconds`, then breaks automatically.
    Countdown { total_seconds: u64 },
}

impl TimerVariant {
    /// Minutes beyond [`MAX_COUNTDOWN_MINUTES`] are clamped.
    pub fn countdown_minutes(minutes: u64) -> Self {
        TimerVariant::Countdown {
            total_seconds: minutes.min(MAX_COUNTDOWN_MINUTES) * 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerVariant::Stopwatch => "stopwatch",
            TimerVariant::Countdown { .. } => "countdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_minutes_converts_to_seconds() {
        assert_eq!(
            TimerVariant::countdown_minutes(25),
            TimerVariant::Countdown { total_seconds: 1500 }
        );
    }

    #[test]
    fn huge_countdown_is_clamped_to_a_day() {
        assert_eq!(
            TimerVariant::countdown_minutes(u64::MAX / 10),
            TimerVariant::Countdown {
                total_seconds: MAX_COUNTDOWN_MINUTES * 60
            }
        );
    }
}
