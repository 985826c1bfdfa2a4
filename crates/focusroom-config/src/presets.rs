//! Focus-mode presets
//!
//! Each mode bundles a timer configuration with the experience multiplier
//! rooms apply to completed work.

use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    /// Maximum concentration: long work blocks, strict breaks
    DeepFocus,
    /// Balanced group study
    Collaborative,
    /// Relaxed, casual sessions
    Flexible,
}

impl FocusMode {
    pub const ALL: [FocusMode; 3] = [
        FocusMode::DeepFocus,
        FocusMode::Collaborative,
        FocusMode::Flexible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FocusMode::DeepFocus => "deep_focus",
            FocusMode::Collaborative => "collaborative",
            FocusMode::Flexible => "flexible",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FocusMode::DeepFocus => "Deep Focus",
            FocusMode::Collaborative => "Collaborative Study",
            FocusMode::Flexible => "Flexible Flow",
        }
    }

    pub fn settings(&self) -> Settings {
        match self {
            FocusMode::DeepFocus => Settings {
                work_duration: 50,
                short_break: 10,
                long_break: 30,
                sessions_until_long_break: 3,
            },
            FocusMode::Collaborative | FocusMode::Flexible => Settings::default(),
        }
    }

    /// Experience multiplier applied to completed work minutes, in percent
    pub fn xp_multiplier_percent(&self) -> u32 {
        match self {
            FocusMode::DeepFocus => 150,
            FocusMode::Collaborative => 120,
            FocusMode::Flexible => 100,
        }
    }

    /// Experience earned for `minutes` of completed work, rounded down and
    /// capped at `u32::MAX`
    pub fn xp_for_minutes(&self, minutes: u32) -> u32 {
        let xp = u64::from(minutes) * u64::from(self.xp_multiplier_percent()) / 100;
        u32::try_from(xp).unwrap_or(u32::MAX)
    }
}

impl Default for FocusMode {
    fn default() -> Self {
        FocusMode::Flexible
    }
}

impl fmt::Display for FocusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FocusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "deep_focus" | "deep" => Ok(FocusMode::DeepFocus),
            "collaborative" => Ok(FocusMode::Collaborative),
            "flexible" => Ok(FocusMode::Flexible),
            other => Err(format!("Unknown focus mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_focus_uses_long_blocks() {
        let settings = FocusMode::DeepFocus.settings();
        assert_eq!(settings.work_duration, 50);
        assert_eq!(settings.short_break, 10);
        assert_eq!(settings.long_break, 30);
        assert_eq!(settings.sessions_until_long_break, 3);
    }

    #[test]
    fn presets_are_valid_settings() {
        for mode in FocusMode::ALL {
            assert!(mode.settings().validate().is_ok(), "{} preset invalid", mode);
        }
    }

    #[test]
    fn parse_mode_names() {
        for mode in FocusMode::ALL {
            assert_eq!(mode.as_str().parse::<FocusMode>().unwrap(), mode);
        }
        assert_eq!("deep-focus".parse::<FocusMode>().unwrap(), FocusMode::DeepFocus);
        assert!("turbo".parse::<FocusMode>().is_err());
    }

    #[test]
    fn xp_rounds_down() {
        assert_eq!(FocusMode::DeepFocus.xp_for_minutes(25), 37);
        assert_eq!(FocusMode::Collaborative.xp_for_minutes(25), 30);
        assert_eq!(FocusMode::Flexible.xp_for_minutes(25), 25);
    }

    #[test]
    fn xp_for_large_minute_counts() {
        assert_eq!(FocusMode::Flexible.xp_for_minutes(u32::MAX), u32::MAX);
        assert_eq!(FocusMode::DeepFocus.xp_for_minutes(u32::MAX), u32::MAX);
        assert_eq!(FocusMode::Collaborative.xp_for_minutes(u32::MAX / 2), 2_576_980_376);
    }
}
