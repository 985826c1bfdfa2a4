//! Time utilities for focusroom
//!
//! Wall-clock time is only used to stamp completed sessions and to decide
//! which of them belong to "today". Countdown progress is driven by clock
//! ticks, never by reading the wall clock.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `FOCUSROOM_MOCK_TIME` environment variable can be set
//! to override the system time returned by [`now`]. This is useful for
//! checking the per-day statistics around midnight.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 23:59:30`)
//!
//! Example:
//! ```bash
//! FOCUSROOM_MOCK_TIME="2025-12-25 23:59:30" cargo run -p focusroom
//! ```

use chrono::{DateTime, Local};
#[cfg(debug_assertions)]
use chrono::{NaiveDateTime, TimeZone};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "FOCUSROOM_MOCK_TIME";

/// Format accepted by [`MOCK_TIME_ENV_VAR`]
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time, computed once at first use so
/// mock time advances naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            let Ok(naive_dt) = NaiveDateTime::parse_from_str(&mock_time_str, MOCK_TIME_FORMAT)
            else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    expected_format = MOCK_TIME_FORMAT,
                    "Invalid mock time format"
                );
                return None;
            };
            let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    "Failed to convert mock time to local timezone"
                );
                return None;
            };
            let offset = mock_dt.signed_duration_since(Local::now());
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Whether two instants fall on the same calendar day in the local timezone.
pub fn is_same_local_day(a: &DateTime<Local>, b: &DateTime<Local>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Format a countdown as `MM:SS`.
///
/// Minutes are not wrapped into hours, so an hour-long session shows `60:00`.
pub fn format_countdown(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Format a DateTime as `HH:MM` for session log lines.
pub fn format_clock_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M").to_string()
}

/// Helper to format a minute total in human-readable form
pub fn format_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDateTime, TimeZone};

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(65), "01:05");
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(3600), "60:00");
        assert_eq!(format_countdown(25 * 60), "25:00");
        assert_eq!(format_countdown(59), "00:59");
    }

    #[test]
    fn test_format_countdown_does_not_roll_into_hours() {
        assert_eq!(format_countdown(100 * 60 + 7), "100:07");
    }

    #[test]
    fn test_same_local_day() {
        let morning = Local.with_ymd_and_hms(2025, 12, 25, 8, 0, 0).unwrap();
        let night = Local.with_ymd_and_hms(2025, 12, 25, 23, 59, 59).unwrap();
        let next_day = Local.with_ymd_and_hms(2025, 12, 26, 0, 0, 1).unwrap();

        assert!(is_same_local_day(&morning, &night));
        assert!(!is_same_local_day(&night, &next_day));
    }

    #[test]
    fn test_format_clock_time() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_clock_time(&dt), "14:30");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(125), "2h 5m");
    }

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_mock_time_format_accepts_documented_example() {
        assert_eq!(MOCK_TIME_ENV_VAR, "FOCUSROOM_MOCK_TIME");
        assert!(NaiveDateTime::parse_from_str("2025-12-25 23:59:30", MOCK_TIME_FORMAT).is_ok());
    }

    #[test]
    fn test_mock_time_format_rejects_other_layouts() {
        let invalid_formats = [
            "2025-12-25",
            "14:30:00",
            "2025/12/25 14:30:00",
            "2025-12-25T14:30:00",
            "",
        ];

        for format_str in &invalid_formats {
            assert!(
                NaiveDateTime::parse_from_str(format_str, MOCK_TIME_FORMAT).is_err(),
                "Expected '{}' to fail parsing",
                format_str
            );
        }
    }

    #[test]
    fn test_is_mock_time_active_does_not_panic() {
        let _ = is_mock_time_active();
    }
}
