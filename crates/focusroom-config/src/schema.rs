//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Timer durations and focus mode
    #[serde(default)]
    pub timer: RawTimerConfig,

    /// Goal tracking
    #[serde(default)]
    pub goals: RawGoals,
}

/// Timer settings. Explicit durations override the focus-mode preset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTimerConfig {
    /// Preset name: "deep_focus", "collaborative" or "flexible"
    pub focus_mode: Option<String>,

    /// Work interval in minutes
    pub work_duration: Option<u32>,

    /// Short break in minutes
    pub short_break: Option<u32>,

    /// Long break in minutes
    pub long_break: Option<u32>,

    /// Work sessions between long breaks
    pub sessions_until_long_break: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawGoals {
    /// Work sessions per day to aim for
    pub daily_goal: Option<u32>,
}
