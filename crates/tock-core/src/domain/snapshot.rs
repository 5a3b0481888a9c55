use serde::{Deserialize, Serialize};

use super::{MiniBell, Phase, Status, TimerMode, TimerVariant};

pub const DEFAULT_PROGRESS_REFERENCE_SECONDS: u64 = 1800;
pub const WINDOW_TITLE_SUFFIX: &str = "Tock";

/// Read-only view of the session pushed to the presentation sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seconds: u64,
    pub phase: Phase,
    pub mode: TimerMode,
    pub variant: TimerVariant,
    pub session_count: u32,
    pub break_budget_seconds: u64,
    /// Between 0.0 and 1.0.
    pub progress: f64,
    pub status: Status,
    pub ticking: bool,
    pub mini_bell: MiniBell,
}

impl Snapshot {
    pub fn label(&self) -> String {
        format_label(self.seconds)
    }

    pub fn title(&self) -> String {
        window_title(&self.label())
    }
}

/// `MM:SS`, zero padded. Minutes keep growing past 99.
pub fn format_label(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn window_title(label: &str) -> String {
    format!("{} - {}", label, WINDOW_TITLE_SUFFIX)
}

/// Fraction of the break already spent. An empty break counts as finished.
pub fn break_progress(budget_seconds: u64, remaining_seconds: u64) -> f64 {
    if budget_seconds == 0 {
        return 1.0;
    }
    let spent = budget_seconds as f64 - remaining_seconds as f64;
    (spent / budget_seconds as f64).clamp(0.0, 1.0)
}

/// Open-ended focus is drawn against a fixed visual reference; counting itself is not capped.
pub fn stopwatch_progress(elapsed_seconds: u64, reference_seconds: u64) -> f64 {
    if reference_seconds == 0 {
        return 1.0;
    }
    (elapsed_seconds as f64 / reference_seconds as f64).min(1.0)
}

pub fn countdown_progress(elapsed_seconds: u64, total_seconds: u64) -> f64 {
    if total_seconds == 0 {
        return 1.0;
    }
    (elapsed_seconds as f64 / total_seconds as f64).clamp(0.0, 1.0)
}
