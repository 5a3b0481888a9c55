use serde::{Deserialize, Serialize};

use super::TimerMode;

/// Discrete outputs of the state machine, consumed by the presentation sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    Started,
    /// Focus stopped with time on the clock; a break start is pending.
    FocusComplete { focus_seconds: u64 },
    Paused,
    BreakStarted {
        break_seconds: u64,
        session_count: u32,
    },
    BreakResumed,
    BreakComplete,
    MiniBell { elapsed_seconds: u64 },
    ModeSwitched { mode: TimerMode },
    Reset,
}
