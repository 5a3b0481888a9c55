use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Focus,
    Relax,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::Relax => "relax",
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sound names played for a mode, resolved by the notification server's sound theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneSet {
    pub mini_bell: String,
    pub completion: String,
}

impl Default for ToneSet {
    fn default() -> Self {
        ModeProfile::builtin(TimerMode::Focus).tones
    }
}

/// Defaults applied wholesale when switching to a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeProfile {
    pub mini_bell_enabled: bool,
    pub mini_bell_interval_minutes: u32,
    pub tones: ToneSet,
}

impl ModeProfile {
    pub fn builtin(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Focus => Self {
                mini_bell_enabled: true,
                mini_bell_interval_minutes: 25,
                tones: ToneSet {
                    mini_bell: "bell".to_string(),
                    completion: "complete".to_string(),
                },
            },
            TimerMode::Relax => Self {
                mini_bell_enabled: false,
                mini_bell_interval_minutes: 5,
                tones: ToneSet {
                    mini_bell: "message".to_string(),
                    completion: "alarm-clock-elapsed".to_string(),
                },
            },
        }
    }
}

/// Lookup table from mode to profile. Built from the built-in profiles and
/// optionally overridden per mode by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTable {
    focus: ModeProfile,
    relax: ModeProfile,
}

impl ModeTable {
    pub fn new(focus: ModeProfile, relax: ModeProfile) -> Self {
        Self { focus, relax }
    }

    pub fn profile(&self, mode: TimerMode) -> &ModeProfile {
        match mode {
            TimerMode::Focus => &self.focus,
            TimerMode::Relax => &self.relax,
        }
    }
}

impl Default for ModeTable {
    fn default() -> Self {
        Self {
            focus: ModeProfile::builtin(TimerMode::Focus),
            relax: ModeProfile::builtin(TimerMode::Relax),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_are_lowercase() {
        assert_eq!(TimerMode::Focus.to_string(), "focus");
        assert_eq!(TimerMode::Relax.as_str(), "relax");
    }

    #[test]
    fn focus_profile_rings_and_relax_stays_quiet() {
        let table = ModeTable::default();

        assert!(table.profile(TimerMode::Focus).mini_bell_enabled);
        assert!(!table.profile(TimerMode::Relax).mini_bell_enabled);
        assert_ne!(
            table.profile(TimerMode::Focus).tones,
            table.profile(TimerMode::Relax).tones
        );
    }

    #[test]
    fn table_returns_overridden_profile() {
        let custom = ModeProfile {
            mini_bell_enabled: true,
            mini_bell_interval_minutes: 3,
            tones: ToneSet::default(),
        };
        let table = ModeTable::new(ModeProfile::builtin(TimerMode::Focus), custom.clone());

        assert_eq!(table.profile(TimerMode::Relax), &custom);
    }
}
