//! Validated timer configuration

use crate::presets::FocusMode;
use crate::schema::RawConfig;
use crate::settings::{Settings, SettingsError, SettingsPatch};

/// Daily goal used when the config leaves it unset
pub const DEFAULT_DAILY_GOAL: u32 = 4;

/// Validated configuration ready for use by the session engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Focus mode the settings were derived from
    pub focus_mode: FocusMode,

    /// Preset settings with explicit overrides applied
    pub settings: Settings,

    /// Work sessions per day to aim for
    pub daily_goal: u32,
}

impl TimerConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Result<Self, SettingsError> {
        let focus_mode = raw
            .timer
            .focus_mode
            .as_deref()
            .and_then(|m| m.parse::<FocusMode>().ok())
            .unwrap_or_default();

        let overrides = SettingsPatch {
            work_duration: raw.timer.work_duration,
            short_break: raw.timer.short_break,
            long_break: raw.timer.long_break,
            sessions_until_long_break: raw.timer.sessions_until_long_break,
        };
        let settings = focus_mode.settings().merged(&overrides)?;

        Ok(Self {
            focus_mode,
            settings,
            daily_goal: raw.goals.daily_goal.unwrap_or(DEFAULT_DAILY_GOAL),
        })
    }

    /// Apply command-line style overrides on top of the loaded settings
    pub fn with_overrides(mut self, patch: &SettingsPatch) -> Result<Self, SettingsError> {
        self.settings = self.settings.merged(patch)?;
        Ok(self)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        let focus_mode = FocusMode::default();
        Self {
            focus_mode,
            settings: focus_mode.settings(),
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }
}
