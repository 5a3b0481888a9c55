use crate::cache::{DEFAULT_ASSETS, DEFAULT_CACHE_NAME};
use crate::domain::{
    ModeProfile, ModeTable, SessionSettings, TimerMode, TimerVariant, ToneSet,
    DEFAULT_PROGRESS_REFERENCE_SECONDS, MAX_COUNTDOWN_MINUTES,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read error: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("TOML parse error: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub timer: TimerConfig,
    pub notifications: NotificationConfig,
    pub modes: ModesConfig,
    pub tray: TrayConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    #[default]
    Stopwatch,
    Countdown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub variant: VariantKind,
    pub countdown_minutes: u64,
    pub transition_delay_ms: u64,
    pub progress_reference_seconds: u64,
    pub mode: TimerMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub sound_enabled: bool,
    pub urgency: NotificationUrgency,
    pub permission_request_delay_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationUrgency {
    Low,
    #[default]
    Normal,
    Critical,
}

/// Per-mode overrides; any field left out keeps the built-in value.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ModeOverride {
    pub mini_bell_enabled: Option<bool>,
    pub mini_bell_interval_minutes: Option<u32>,
    pub tones: Option<ToneSet>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ModesConfig {
    pub focus: ModeOverride,
    pub relax: ModeOverride,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TrayConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub name: String,
    pub base_url: String,
    pub assets: Vec<String>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            variant: VariantKind::Stopwatch,
            countdown_minutes: 25,
            transition_delay_ms: 1000,
            progress_reference_seconds: DEFAULT_PROGRESS_REFERENCE_SECONDS,
            mode: TimerMode::Focus,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_enabled: true,
            urgency: NotificationUrgency::Normal,
            permission_request_delay_seconds: 2,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: DEFAULT_CACHE_NAME.to_string(),
            base_url: "http://localhost:8080".to_string(),
            assets: DEFAULT_ASSETS.iter().map(|asset| asset.to_string()).collect(),
        }
    }
}

impl TimerConfig {
    pub fn variant(&self) -> TimerVariant {
        match self.variant {
            VariantKind::Stopwatch => TimerVariant::Stopwatch,
            VariantKind::Countdown => TimerVariant::countdown_minutes(
                self.countdown_minutes.clamp(1, MAX_COUNTDOWN_MINUTES),
            ),
        }
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

impl NotificationConfig {
    pub fn permission_request_delay(&self) -> Duration {
        Duration::from_secs(self.permission_request_delay_seconds)
    }
}

impl ModeOverride {
    fn apply(&self, mut profile: ModeProfile) -> ModeProfile {
        if let Some(enabled) = self.mini_bell_enabled {
            profile.mini_bell_enabled = enabled;
        }
        if let Some(interval) = self.mini_bell_interval_minutes.filter(|minutes| *minutes > 0) {
            profile.mini_bell_interval_minutes = interval;
        }
        if let Some(ref tones) = self.tones {
            profile.tones = tones.clone();
        }
        profile
    }
}

impl ModesConfig {
    pub fn table(&self) -> ModeTable {
        ModeTable::new(
            self.focus.apply(ModeProfile::builtin(TimerMode::Focus)),
            self.relax.apply(ModeProfile::builtin(TimerMode::Relax)),
        )
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tock")
            .join("config.toml")
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            variant: self.timer.variant(),
            mode: self.timer.mode,
            modes: self.modes.table(),
            progress_reference_seconds: self.timer.progress_reference_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = Config::default();

        assert_eq!(config.timer.variant, VariantKind::Stopwatch);
        assert_eq!(config.timer.countdown_minutes, 25);
        assert_eq!(config.timer.transition_delay(), Duration::from_secs(1));
        assert_eq!(config.timer.progress_reference_seconds, 1800);
        assert_eq!(config.timer.mode, TimerMode::Focus);
        assert!(config.notifications.enabled);
        assert!(config.notifications.sound_enabled);
        assert_eq!(
            config.notifications.permission_request_delay(),
            Duration::from_secs(2)
        );
        assert!(!config.tray.enabled);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.name, "tock-v1");
        assert_eq!(config.cache.assets.len(), 5);
    }

    #[test]
    fn countdown_minutes_are_clamped() {
        let config: Config = toml::from_str(
            r#"
            [timer]
            variant = "countdown"
            countdown_minutes = 9223372036854775807
        "#,
        )
        .unwrap();

        assert_eq!(
            config.timer.variant(),
            TimerVariant::Countdown {
                total_seconds: MAX_COUNTDOWN_MINUTES * 60
            }
        );
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [timer]
            transition_delay_ms = 0
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.timer.transition_delay(), Duration::ZERO);
        assert_eq!(config.timer.countdown_minutes, 25);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [timer]
            variant = "countdown"
            countdown_minutes = 50
            mode = "relax"

            [notifications]
            enabled = false
            sound_enabled = false
            urgency = "critical"

            [modes.focus]
            mini_bell_interval_minutes = 10

            [modes.relax]
            mini_bell_enabled = true
            tones = { mini_bell = "dialog-information", completion = "bell" }

            [tray]
            enabled = true

            [cache]
            enabled = true
            name = "tock-v2"
            base_url = "https://tock.example.com"
            assets = ["/", "/app.js"]
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.timer.variant(),
            TimerVariant::Countdown {
                total_seconds: 3000
            }
        );
        assert_eq!(config.timer.mode, TimerMode::Relax);
        assert!(!config.notifications.enabled);
        assert!(matches!(
            config.notifications.urgency,
            NotificationUrgency::Critical
        ));
        assert!(config.tray.enabled);
        assert_eq!(config.cache.name, "tock-v2");
        assert_eq!(config.cache.assets, vec!["/", "/app.js"]);

        let table = config.modes.table();
        let focus = table.profile(TimerMode::Focus);
        assert!(focus.mini_bell_enabled);
        assert_eq!(focus.mini_bell_interval_minutes, 10);
        let relax = table.profile(TimerMode::Relax);
        assert!(relax.mini_bell_enabled);
        assert_eq!(relax.mini_bell_interval_minutes, 5);
        assert_eq!(relax.tones.mini_bell, "dialog-information");
    }

    #[test]
    fn zero_interval_override_is_ignored() {
        let toml = r#"
            [modes.focus]
            mini_bell_interval_minutes = 0
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config
                .modes
                .table()
                .profile(TimerMode::Focus)
                .mini_bell_interval_minutes,
            25
        );
    }

    #[test]
    fn session_settings_follow_config() {
        let toml = r#"
            [timer]
            mode = "relax"
            progress_reference_seconds = 600
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        let settings = config.session_settings();

        assert_eq!(settings.mode, TimerMode::Relax);
        assert_eq!(settings.variant, TimerVariant::Stopwatch);
        assert_eq!(settings.progress_reference_seconds, 600);
    }
}
