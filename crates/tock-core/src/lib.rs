//! Tock core library
//!
//! Contains the timer state machine, presentation maths, the offline asset
//! cache and the port definitions (traits) used by the daemon and the CLI.
//! This crate has no knowledge of infrastructure concerns.

pub mod cache;
pub mod config;
pub mod domain;
pub mod ports;
pub mod push;

pub use cache::{CacheError, CacheStorage, FetchOutcome, OfflineCache, Resource};
pub use config::{
    CacheConfig, Config, ConfigError, NotificationConfig, NotificationUrgency, TimerConfig,
};
pub use domain::{
    format_label, window_title, MiniBell, ModeProfile, ModeTable, Phase, SessionSettings,
    SettingsError, Snapshot, Status, TimerEvent, TimerMode, TimerSession, TimerVariant, ToneSet,
    MAX_COUNTDOWN_MINUTES,
};
pub use ports::{FetchError, ResourceFetcher};
pub use push::{resolve_click, ClickAction, ClientWindow, PushPayload};
