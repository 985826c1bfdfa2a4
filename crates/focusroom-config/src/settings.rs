//! Timer settings and the per-kind duration lookup

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of a Pomodoro interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Work => "work",
            SessionKind::ShortBreak => "short_break",
            SessionKind::LongBreak => "long_break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionKind::Work)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected settings value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{field} must be at least 1, got {value}")]
    NotPositive { field: &'static str, value: u32 },

    #[error("{field} must be at most {max} minutes, got {value}")]
    TooLong {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

pub const DEFAULT_WORK_DURATION: u32 = 25;
pub const DEFAULT_SHORT_BREAK: u32 = 5;
pub const DEFAULT_LONG_BREAK: u32 = 15;
pub const DEFAULT_SESSIONS_UNTIL_LONG_BREAK: u32 = 4;

/// Longest interval whose length in seconds still fits a `u32` countdown
pub const MAX_DURATION_MINUTES: u32 = u32::MAX / 60;

/// Validated timer settings. Durations are in minutes.
///
/// Every field is at least 1 and every duration at most
/// [`MAX_DURATION_MINUTES`]; the only way to build one from untrusted input
/// is [`Settings::merged`], which enforces that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub work_duration: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub sessions_until_long_break: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_DURATION,
            short_break: DEFAULT_SHORT_BREAK,
            long_break: DEFAULT_LONG_BREAK,
            sessions_until_long_break: DEFAULT_SESSIONS_UNTIL_LONG_BREAK,
        }
    }
}

impl Settings {
    /// Apply a partial update on top of these settings.
    ///
    /// Returns the merged settings, or the first offending field. `self` is
    /// never modified, so a rejected update leaves the caller's copy intact.
    pub fn merged(&self, patch: &SettingsPatch) -> Result<Settings, SettingsError> {
        let merged = Settings {
            work_duration: patch.work_duration.unwrap_or(self.work_duration),
            short_break: patch.short_break.unwrap_or(self.short_break),
            long_break: patch.long_break.unwrap_or(self.long_break),
            sessions_until_long_break: patch
                .sessions_until_long_break
                .unwrap_or(self.sessions_until_long_break),
        };
        merged.validate()?;
        Ok(merged)
    }

    /// Check the positivity and duration bounds
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("work_duration", self.work_duration),
            ("short_break", self.short_break),
            ("long_break", self.long_break),
            ("sessions_until_long_break", self.sessions_until_long_break),
        ] {
            if value == 0 {
                return Err(SettingsError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("work_duration", self.work_duration),
            ("short_break", self.short_break),
            ("long_break", self.long_break),
        ] {
            if value > MAX_DURATION_MINUTES {
                return Err(SettingsError::TooLong {
                    field,
                    value,
                    max: MAX_DURATION_MINUTES,
                });
            }
        }
        Ok(())
    }

    /// Duration in minutes of an interval of the given kind
    pub fn minutes_for(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.work_duration,
            SessionKind::ShortBreak => self.short_break,
            SessionKind::LongBreak => self.long_break,
        }
    }

    /// Duration in seconds of an interval of the given kind
    pub fn seconds_for(&self, kind: SessionKind) -> u32 {
        self.minutes_for(kind) * 60
    }
}

/// Partial settings. Unset fields keep their current value when merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_break: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_until_long_break: Option<u32>,
}

impl SettingsPatch {
    pub fn work_duration(mut self, minutes: u32) -> Self {
        self.work_duration = Some(minutes);
        self
    }

    pub fn short_break(mut self, minutes: u32) -> Self {
        self.short_break = Some(minutes);
        self
    }

    pub fn long_break(mut self, minutes: u32) -> Self {
        self.long_break = Some(minutes);
        self
    }

    pub fn sessions_until_long_break(mut self, count: u32) -> Self {
        self.sessions_until_long_break = Some(count);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn overlay(self, other: SettingsPatch) -> Self {
        Self {
            work_duration: other.work_duration.or(self.work_duration),
            short_break: other.short_break.or(self.short_break),
            long_break: other.long_break.or(self.long_break),
            sessions_until_long_break: other
                .sessions_until_long_break
                .or(self.sessions_until_long_break),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            work_duration: Some(settings.work_duration),
            short_break: Some(settings.short_break),
            long_break: Some(settings.long_break),
            sessions_until_long_break: Some(settings.sessions_until_long_break),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let settings = Settings::default();
        assert_eq!(settings.work_duration, 25);
        assert_eq!(settings.short_break, 5);
        assert_eq!(settings.long_break, 15);
        assert_eq!(settings.sessions_until_long_break, 4);
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let merged = Settings::default()
            .merged(&SettingsPatch::default().work_duration(30))
            .unwrap();
        assert_eq!(merged.work_duration, 30);
        assert_eq!(merged.short_break, 5);
        assert_eq!(merged.long_break, 15);
        assert_eq!(merged.sessions_until_long_break, 4);
    }

    #[test]
    fn merge_rejects_zero_duration() {
        let err = Settings::default()
            .merged(&SettingsPatch::default().short_break(0))
            .unwrap_err();
        assert_eq!(
            err,
            SettingsError::NotPositive {
                field: "short_break",
                value: 0
            }
        );
    }

    #[test]
    fn merge_rejects_zero_cycle_length() {
        let result = Settings::default().merged(&SettingsPatch::default().sessions_until_long_break(0));
        assert!(matches!(
            result,
            Err(SettingsError::NotPositive {
                field: "sessions_until_long_break",
                ..
            })
        ));
    }

    #[test]
    fn merge_accepts_longest_duration() {
        let merged = Settings::default()
            .merged(&SettingsPatch::default().work_duration(MAX_DURATION_MINUTES))
            .unwrap();
        assert_eq!(merged.seconds_for(SessionKind::Work), MAX_DURATION_MINUTES * 60);
    }

    #[test]
    fn merge_rejects_duration_past_countdown_range() {
        let err = Settings::default()
            .merged(&SettingsPatch::default().long_break(MAX_DURATION_MINUTES + 1))
            .unwrap_err();
        assert_eq!(
            err,
            SettingsError::TooLong {
                field: "long_break",
                value: MAX_DURATION_MINUTES + 1,
                max: MAX_DURATION_MINUTES,
            }
        );

        let result = Settings::default().merged(&SettingsPatch::default().work_duration(u32::MAX));
        assert!(matches!(result, Err(SettingsError::TooLong { field: "work_duration", .. })));
    }

    #[test]
    fn large_cycle_length_is_accepted() {
        let merged = Settings::default()
            .merged(&SettingsPatch::default().sessions_until_long_break(u32::MAX))
            .unwrap();
        assert_eq!(merged.sessions_until_long_break, u32::MAX);
    }

    #[test]
    fn duration_lookup_per_kind() {
        let settings = Settings {
            work_duration: 50,
            short_break: 10,
            long_break: 30,
            sessions_until_long_break: 3,
        };
        assert_eq!(settings.minutes_for(SessionKind::Work), 50);
        assert_eq!(settings.minutes_for(SessionKind::ShortBreak), 10);
        assert_eq!(settings.minutes_for(SessionKind::LongBreak), 30);
        assert_eq!(settings.seconds_for(SessionKind::LongBreak), 1800);
    }

    #[test]
    fn overlay_prefers_later_fields() {
        let base = SettingsPatch::default().work_duration(50).short_break(10);
        let layered = base.overlay(SettingsPatch::default().work_duration(40));
        assert_eq!(layered.work_duration, Some(40));
        assert_eq!(layered.short_break, Some(10));
        assert_eq!(layered.long_break, None);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&SessionKind::ShortBreak).unwrap();
        assert_eq!(json, "\"short_break\"");
        assert_eq!(SessionKind::LongBreak.to_string(), "long_break");
        assert!(SessionKind::LongBreak.is_break());
        assert!(!SessionKind::Work.is_break());
    }
}
