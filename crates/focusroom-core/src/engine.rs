//! Pomodoro session engine

use chrono::{DateTime, Local};
use focusroom_config::{DEFAULT_DAILY_GOAL, SessionKind, Settings, SettingsPatch};
use focusroom_util::SubscriptionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use crate::{EngineEvent, EngineError, EngineResult, Session, SessionStats, SubscriberError};

/// Completion callback. Runs after the completion is committed.
pub type Subscriber = Box<dyn FnMut(&Session) -> Result<(), SubscriberError> + Send>;

/// Live engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    /// Whether the countdown is running
    pub is_active: bool,

    /// Seconds left in the current interval
    pub time_remaining: u32,

    pub current_kind: SessionKind,

    /// Completed work intervals (breaks are not counted)
    pub work_sessions_completed: u32,

    /// Sum of the durations of completed work intervals, in minutes
    pub total_focus_minutes: u32,

    /// Consecutive completed work intervals. Never decremented.
    pub streak: u32,

    /// Work intervals completed since the caller last zeroed this counter
    pub completed_today: u32,

    pub daily_goal: u32,

    pub settings: Settings,
}

impl EngineState {
    fn new(settings: Settings) -> Self {
        Self {
            is_active: false,
            time_remaining: settings.seconds_for(SessionKind::Work),
            current_kind: SessionKind::Work,
            work_sessions_completed: 0,
            total_focus_minutes: 0,
            streak: 0,
            completed_today: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
            settings,
        }
    }
}

/// Plain-data form of an engine: state plus history.
///
/// Subscribers are not part of a snapshot; a restored engine starts with an
/// empty registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub history: Vec<Session>,
}

impl EngineSnapshot {
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string(self).map_err(|e| EngineError::InvalidSnapshot(e.to_string()))
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidSnapshot(e.to_string()))
    }
}

/// The Pomodoro state machine.
///
/// Cycles work -> short break -> work ... with a long break after every
/// `sessions_until_long_break`-th completed work interval. The engine does
/// not own a clock: something else calls [`tick`](Self::tick) once per second
/// while the engine is active (see [`Timer`](crate::Timer)).
pub struct SessionEngine {
    state: EngineState,
    history: Vec<Session>,
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SessionEngine {
    /// Create an engine from the default settings merged with `overrides`
    pub fn new(overrides: &SettingsPatch) -> EngineResult<Self> {
        let settings = Settings::default().merged(overrides)?;
        Ok(Self::with_settings(settings))
    }

    /// Create an engine from already validated settings
    pub fn with_settings(settings: Settings) -> Self {
        info!(
            work = settings.work_duration,
            short_break = settings.short_break,
            long_break = settings.long_break,
            sessions_until_long_break = settings.sessions_until_long_break,
            "Session engine initialized"
        );

        Self {
            state: EngineState::new(settings),
            history: Vec::new(),
            subscribers: BTreeMap::new(),
            next_subscription: SubscriptionId::from_raw(1),
        }
    }

    /// Rebuild an engine from a snapshot
    pub fn restore(snapshot: EngineSnapshot) -> EngineResult<Self> {
        snapshot.state.settings.validate()?;

        let limit = snapshot
            .state
            .settings
            .seconds_for(snapshot.state.current_kind);
        if snapshot.state.time_remaining > limit {
            return Err(EngineError::InvalidSnapshot(format!(
                "time_remaining {}s exceeds {} length of {}s",
                snapshot.state.time_remaining, snapshot.state.current_kind, limit
            )));
        }

        debug!(
            history_len = snapshot.history.len(),
            kind = %snapshot.state.current_kind,
            "Session engine restored"
        );

        Ok(Self {
            state: snapshot.state,
            history: snapshot.history,
            subscribers: BTreeMap::new(),
            next_subscription: SubscriptionId::from_raw(1),
        })
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state.clone(),
            history: self.history.clone(),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Completed sessions, oldest first
    pub fn history(&self) -> &[Session] {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Configured length in minutes of an interval of the given kind
    pub fn duration_minutes(&self, kind: SessionKind) -> u32 {
        self.state.settings.minutes_for(kind)
    }

    /// Start or resume the countdown
    pub fn start(&mut self) {
        if !self.state.is_active {
            info!(
                kind = %self.state.current_kind,
                time_remaining = self.state.time_remaining,
                "Countdown started"
            );
        }
        self.state.is_active = true;
    }

    /// Stop the countdown, keeping the remaining time
    pub fn pause(&mut self) {
        if self.state.is_active {
            info!(
                kind = %self.state.current_kind,
                time_remaining = self.state.time_remaining,
                "Countdown paused"
            );
        }
        self.state.is_active = false;
    }

    /// Stop the countdown and rewind it to the full length of the current kind
    pub fn reset(&mut self) {
        self.state.is_active = false;
        self.state.time_remaining = self.state.settings.seconds_for(self.state.current_kind);
        info!(
            kind = %self.state.current_kind,
            time_remaining = self.state.time_remaining,
            "Countdown reset"
        );
    }

    /// Complete the current interval now, whatever time is left
    pub fn skip(&mut self, now: DateTime<Local>) -> Vec<EngineEvent> {
        info!(
            kind = %self.state.current_kind,
            time_remaining = self.state.time_remaining,
            "Interval skipped"
        );
        self.complete_current_session(now)
    }

    /// Advance the countdown by one second.
    ///
    /// Does nothing while paused. When one second or less is left the
    /// interval completes instead of reaching zero.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<EngineEvent> {
        if !self.state.is_active {
            return Vec::new();
        }

        if self.state.time_remaining <= 1 {
            return self.complete_current_session(now);
        }

        self.state.time_remaining -= 1;
        Vec::new()
    }

    /// Merge new settings. Stops the countdown and rewinds it using the new
    /// length of the current kind. A rejected patch leaves the engine as is.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> EngineResult<()> {
        let settings = match self.state.settings.merged(patch) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Settings update rejected");
                return Err(EngineError::InvalidSettings(e));
            }
        };

        self.state.settings = settings;
        self.state.is_active = false;
        self.state.time_remaining = settings.seconds_for(self.state.current_kind);

        info!(
            work = settings.work_duration,
            short_break = settings.short_break,
            long_break = settings.long_break,
            sessions_until_long_break = settings.sessions_until_long_break,
            time_remaining = self.state.time_remaining,
            "Settings updated"
        );
        Ok(())
    }

    pub fn set_daily_goal(&mut self, goal: u32) {
        self.state.daily_goal = goal;
    }

    /// Zero the daily counter. The engine never does this on its own.
    pub fn reset_completed_today(&mut self) {
        self.state.completed_today = 0;
    }

    /// Register a completion callback. Callbacks run in registration order.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Session) -> Result<(), SubscriberError> + Send + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription = id.next();
        self.subscribers.insert(id, Box::new(callback));
        debug!(subscription = %id, "Subscriber registered");
        id
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!(subscription = %id, "Subscriber removed");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn stats(&self, now: DateTime<Local>) -> SessionStats {
        SessionStats::compute(&self.state, &self.history, now)
    }

    fn next_kind_after(&self, finished: SessionKind) -> SessionKind {
        match finished {
            SessionKind::Work => {
                let cycle = self.state.settings.sessions_until_long_break;
                if self.state.work_sessions_completed % cycle == 0 {
                    SessionKind::LongBreak
                } else {
                    SessionKind::ShortBreak
                }
            }
            SessionKind::ShortBreak | SessionKind::LongBreak => SessionKind::Work,
        }
    }

    fn complete_current_session(&mut self, now: DateTime<Local>) -> Vec<EngineEvent> {
        let finished = self.state.current_kind;
        let session = Session::completed(finished, self.duration_minutes(finished), now);

        self.history.push(session.clone());
        self.state.is_active = false;

        if finished == SessionKind::Work {
            let state = &mut self.state;
            state.work_sessions_completed = state.work_sessions_completed.saturating_add(1);
            state.total_focus_minutes = state.total_focus_minutes.saturating_add(session.duration);
            state.completed_today = state.completed_today.saturating_add(1);
            state.streak = state.streak.saturating_add(1);
        }

        let next_kind = self.next_kind_after(finished);
        self.state.current_kind = next_kind;
        self.state.time_remaining = self.state.settings.seconds_for(next_kind);

        info!(
            session_id = %session.id,
            kind = %finished,
            duration_mins = session.duration,
            next = %next_kind,
            work_sessions_completed = self.state.work_sessions_completed,
            "Interval completed"
        );

        let mut events = vec![EngineEvent::SessionCompleted {
            session: session.clone(),
            next_kind,
        }];

        for (id, subscriber) in self.subscribers.iter_mut() {
            if let Err(error) = subscriber(&session) {
                warn!(
                    subscription = %id,
                    session_id = %session.id,
                    error = %error,
                    "Completion subscriber failed"
                );
                events.push(EngineEvent::SubscriberFailed {
                    subscription: *id,
                    error,
                });
            }
        }

        events
    }
}
