mod event;
mod mini_bell;
mod mode;
mod phase;
mod session;
mod snapshot;

pub use event::TimerEvent;
pub use mini_bell::MiniBell;
pub use mode::{ModeProfile, ModeTable, TimerMode, ToneSet};
pub use phase::{Phase, Status, TimerVariant, MAX_COUNTDOWN_MINUTES};
pub use session::{
    PendingTransition, SessionSettings, SettingsError, TimerSession, TransitionKind,
    TransitionToken, BREAK_DIVISOR,
};
pub use snapshot::{format_label, window_title, Snapshot, DEFAULT_PROGRESS_REFERENCE_SECONDS};
