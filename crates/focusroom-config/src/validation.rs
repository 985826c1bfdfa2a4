//! Configuration validation

use crate::presets::FocusMode;
use crate::schema::RawConfig;
use crate::settings::MAX_DURATION_MINUTES;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("timer.{field} must be at least 1 minute")]
    ZeroDuration { field: &'static str },

    #[error("timer.{field} must be at most {max} minutes")]
    DurationTooLong { field: &'static str, max: u32 },

    #[error("timer.sessions_until_long_break must be at least 1")]
    ZeroCycleLength,

    #[error("Unknown focus mode '{0}' (expected deep_focus, collaborative or flexible)")]
    UnknownFocusMode(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let timer = &config.timer;

    if let Some(mode) = &timer.focus_mode
        && mode.parse::<FocusMode>().is_err()
    {
        errors.push(ValidationError::UnknownFocusMode(mode.clone()));
    }

    for (field, value) in [
        ("work_duration", timer.work_duration),
        ("short_break", timer.short_break),
        ("long_break", timer.long_break),
    ] {
        match value {
            Some(0) => errors.push(ValidationError::ZeroDuration { field }),
            Some(minutes) if minutes > MAX_DURATION_MINUTES => {
                errors.push(ValidationError::DurationTooLong {
                    field,
                    max: MAX_DURATION_MINUTES,
                });
            }
            _ => {}
        }
    }

    if timer.sessions_until_long_break == Some(0) {
        errors.push(ValidationError::ZeroCycleLength);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawGoals, RawTimerConfig};

    fn config_with(timer: RawTimerConfig) -> RawConfig {
        RawConfig {
            config_version: 1,
            timer,
            goals: RawGoals::default(),
        }
    }

    #[test]
    fn empty_timer_section_is_valid() {
        assert!(validate_config(&config_with(RawTimerConfig::default())).is_empty());
    }

    #[test]
    fn collects_every_error() {
        let config = config_with(RawTimerConfig {
            focus_mode: Some("hyperfocus".into()),
            work_duration: Some(0),
            short_break: Some(5),
            long_break: Some(0),
            sessions_until_long_break: Some(0),
        });

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownFocusMode(m) if m == "hyperfocus")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ZeroDuration { field: "long_break" })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ZeroCycleLength)));
    }

    #[test]
    fn duration_bound_is_inclusive() {
        let at_limit = config_with(RawTimerConfig {
            work_duration: Some(MAX_DURATION_MINUTES),
            ..Default::default()
        });
        assert!(validate_config(&at_limit).is_empty());

        let past_limit = config_with(RawTimerConfig {
            short_break: Some(MAX_DURATION_MINUTES + 1),
            ..Default::default()
        });
        let errors = validate_config(&past_limit);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::DurationTooLong { field: "short_break", .. }
        ));
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ValidationError::ZeroDuration { field: "work_duration" };
        assert_eq!(err.to_string(), "timer.work_duration must be at least 1 minute");
    }
}
