//! Session statistics
//!
//! Computed on demand from the engine state and history; nothing here is
//! cached between calls.

use chrono::{DateTime, Local};
use focusroom_util::is_same_local_day;
use serde::{Deserialize, Serialize};

use crate::{EngineState, Session};

/// Aggregated focus statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Work sessions completed since the daily counter was last zeroed
    pub sessions_today: u32,
    /// Work sessions completed over the engine's lifetime
    pub total_sessions: u32,
    /// Minutes of work in history that ended on today's calendar day
    pub focus_time_today: u32,
    /// Minutes of completed work over the engine's lifetime
    pub total_focus_time: u32,
    pub current_streak: u32,
    /// Equal to the current streak, which never decreases
    pub longest_streak: u32,
    /// Configured work duration in minutes
    pub average_session_length: u32,
    /// Percentage of history entries that ran to completion (0.0-100.0)
    pub completion_rate: f64,
    pub daily_goal: u32,
    pub weekly_goal: u32,
    pub daily_goal_reached: bool,
}

impl SessionStats {
    /// Calculate statistics as of `now`
    pub fn compute(state: &EngineState, history: &[Session], now: DateTime<Local>) -> Self {
        let focus_time_today = history
            .iter()
            .filter(|s| s.is_work() && is_same_local_day(&s.ended_at, &now))
            .fold(0u32, |total, s| total.saturating_add(s.duration));

        Self {
            sessions_today: state.completed_today,
            total_sessions: state.work_sessions_completed,
            focus_time_today,
            total_focus_time: state.total_focus_minutes,
            current_streak: state.streak,
            longest_streak: state.streak,
            average_session_length: state.settings.work_duration,
            completion_rate: completion_rate(history),
            daily_goal: state.daily_goal,
            weekly_goal: state.daily_goal.saturating_mul(7),
            daily_goal_reached: state.daily_goal > 0 && state.completed_today >= state.daily_goal,
        }
    }
}

fn completion_rate(history: &[Session]) -> f64 {
    if history.is_empty() {
        return 100.0;
    }
    let completed = history.iter().filter(|s| s.completed).count();
    completed as f64 * 100.0 / history.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use focusroom_config::{SessionKind, Settings};

    fn state_with(work_sessions: u32, daily_goal: u32) -> EngineState {
        let settings = Settings::default();
        EngineState {
            is_active: false,
            time_remaining: settings.seconds_for(SessionKind::Work),
            current_kind: SessionKind::Work,
            work_sessions_completed: work_sessions,
            total_focus_minutes: work_sessions * settings.work_duration,
            streak: work_sessions,
            completed_today: work_sessions,
            daily_goal,
            settings,
        }
    }

    #[test]
    fn test_empty_stats() {
        let now = Local.with_ymd_and_hms(2025, 5, 2, 12, 0, 0).unwrap();
        let stats = SessionStats::compute(&state_with(0, 4), &[], now);

        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.focus_time_today, 0);
        assert_eq!(stats.completion_rate, 100.0);
        assert_eq!(stats.weekly_goal, 28);
        assert!(!stats.daily_goal_reached);
    }

    #[test]
    fn test_focus_time_counts_only_todays_work() {
        let now = Local.with_ymd_and_hms(2025, 5, 2, 18, 0, 0).unwrap();
        let yesterday = Local.with_ymd_and_hms(2025, 5, 1, 22, 0, 0).unwrap();
        let morning = Local.with_ymd_and_hms(2025, 5, 2, 9, 0, 0).unwrap();

        let history = vec![
            Session::completed(SessionKind::Work, 25, yesterday),
            Session::completed(SessionKind::Work, 25, morning),
            Session::completed(SessionKind::ShortBreak, 5, morning),
            Session::completed(SessionKind::Work, 30, now),
        ];

        let stats = SessionStats::compute(&state_with(3, 4), &history, now);
        assert_eq!(stats.focus_time_today, 55);
        assert_eq!(stats.total_focus_time, 75);
        assert_eq!(stats.completion_rate, 100.0);
    }

    #[test]
    fn test_completion_rate_counts_incomplete_records() {
        let now = Local.with_ymd_and_hms(2025, 5, 2, 18, 0, 0).unwrap();
        let mut abandoned = Session::completed(SessionKind::Work, 25, now);
        abandoned.completed = false;
        let history = vec![
            Session::completed(SessionKind::Work, 25, now),
            abandoned,
            Session::completed(SessionKind::Work, 25, now),
            Session::completed(SessionKind::ShortBreak, 5, now),
        ];

        let stats = SessionStats::compute(&state_with(3, 4), &history, now);
        assert_eq!(stats.completion_rate, 75.0);
    }

    #[test]
    fn test_completion_rate_keeps_fraction() {
        let now = Local.with_ymd_and_hms(2025, 5, 2, 18, 0, 0).unwrap();
        let mut abandoned = Session::completed(SessionKind::Work, 25, now);
        abandoned.completed = false;
        let history = vec![
            Session::completed(SessionKind::Work, 25, now),
            Session::completed(SessionKind::ShortBreak, 5, now),
            abandoned,
        ];

        let stats = SessionStats::compute(&state_with(2, 4), &history, now);
        assert!((stats.completion_rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_daily_goal_saturates_weekly_goal() {
        let now = Local.with_ymd_and_hms(2025, 5, 2, 18, 0, 0).unwrap();

        let stats = SessionStats::compute(&state_with(1, u32::MAX), &[], now);
        assert_eq!(stats.weekly_goal, u32::MAX);
        assert_eq!(stats.daily_goal, u32::MAX);
        assert!(!stats.daily_goal_reached);

        let stats = SessionStats::compute(&state_with(1, u32::MAX / 7), &[], now);
        assert_eq!(stats.weekly_goal, u32::MAX / 7 * 7);
    }

    #[test]
    fn test_focus_time_today_saturates() {
        let now = Local.with_ymd_and_hms(2025, 5, 2, 18, 0, 0).unwrap();
        let history = vec![
            Session::completed(SessionKind::Work, u32::MAX - 1, now),
            Session::completed(SessionKind::Work, 10, now),
        ];

        let stats = SessionStats::compute(&state_with(2, 4), &history, now);
        assert_eq!(stats.focus_time_today, u32::MAX);
    }

    #[test]
    fn test_goal_tracking() {
        let now = Local.with_ymd_and_hms(2025, 5, 2, 18, 0, 0).unwrap();

        let stats = SessionStats::compute(&state_with(4, 4), &[], now);
        assert!(stats.daily_goal_reached);
        assert_eq!(stats.sessions_today, 4);
        assert_eq!(stats.longest_streak, 4);
        assert_eq!(stats.average_session_length, 25);

        let stats = SessionStats::compute(&state_with(4, 0), &[], now);
        assert!(!stats.daily_goal_reached);
        assert_eq!(stats.weekly_goal, 0);
    }
}
