//! Clock-driven timer
//!
//! [`Timer`] owns a [`SessionEngine`] and the [`ClockHandle`] of its one-second
//! tick. The handle exists exactly while the engine is counting down: it is
//! acquired on start and released on pause, reset, settings change,
//! completion, shutdown and drop.
//!
//! Completion subscribers run on whatever thread delivers the tick, with the
//! timer's lock held. A subscriber must not call back into the same timer.

use focusroom_util::{format_countdown, now};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::debug;

use crate::{
    Clock, ClockHandle, EngineError, EngineEvent, EngineResult, EngineSnapshot, EngineState,
    Session, SessionEngine, SessionStats, SettingsPatch, SubscriberError, SubscriptionId,
};

/// Interval between countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

struct TimerShared {
    engine: SessionEngine,
    ticker: Option<ClockHandle>,
    /// Bumped on every release so a callback from an old schedule is ignored
    generation: u64,
    /// Events produced by clock ticks, waiting for `take_events`
    pending: Vec<EngineEvent>,
}

impl TimerShared {
    fn release_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.release();
            self.generation += 1;
            debug!(generation = self.generation, "Tick source released");
        }
    }

    fn on_tick(&mut self, generation: u64) {
        if generation != self.generation || !self.engine.is_active() {
            return;
        }

        let events = self.engine.tick(now());
        self.pending.extend(events);

        if !self.engine.is_active() {
            self.release_ticker();
        }
    }
}

/// A [`SessionEngine`] driven by a [`Clock`]
pub struct Timer<C: Clock> {
    clock: C,
    shared: Arc<Mutex<TimerShared>>,
}

impl<C: Clock> Timer<C> {
    /// Create a paused timer with the default settings merged with `overrides`
    pub fn new(clock: C, overrides: &SettingsPatch) -> EngineResult<Self> {
        Ok(Self::with_engine(clock, SessionEngine::new(overrides)?))
    }

    /// Wrap an existing engine. Ticking starts right away if it is active.
    pub fn with_engine(clock: C, engine: SessionEngine) -> Self {
        let active = engine.is_active();
        let timer = Self {
            clock,
            shared: Arc::new(Mutex::new(TimerShared {
                engine,
                ticker: None,
                generation: 0,
                pending: Vec::new(),
            })),
        };

        if active {
            let mut shared = timer.lock_unchecked();
            timer.start_ticking(&mut shared);
            drop(shared);
        }
        timer
    }

    /// Rebuild a timer from a snapshot, resuming the countdown if the
    /// snapshot was taken while it was running
    pub fn restore(clock: C, snapshot: EngineSnapshot) -> EngineResult<Self> {
        Ok(Self::with_engine(clock, SessionEngine::restore(snapshot)?))
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, TimerShared>> {
        self.shared.lock().map_err(|_| EngineError::Poisoned)
    }

    fn lock_unchecked(&self) -> MutexGuard<'_, TimerShared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_ticking(&self, shared: &mut TimerShared) {
        shared.release_ticker();

        let generation = shared.generation;
        let weak: Weak<Mutex<TimerShared>> = Arc::downgrade(&self.shared);
        let handle = self.clock.schedule_repeating(
            TICK_PERIOD,
            Box::new(move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let Ok(mut shared) = shared.lock() else {
                    return;
                };
                shared.on_tick(generation);
            }),
        );

        shared.ticker = Some(handle);
        debug!(generation, "Tick source acquired");
    }

    /// Start or resume the countdown, replacing any running tick source
    pub fn start(&self) -> EngineResult<()> {
        let mut shared = self.lock()?;
        shared.engine.start();
        self.start_ticking(&mut shared);
        Ok(())
    }

    pub fn pause(&self) -> EngineResult<()> {
        let mut shared = self.lock()?;
        shared.engine.pause();
        shared.release_ticker();
        Ok(())
    }

    pub fn reset(&self) -> EngineResult<()> {
        let mut shared = self.lock()?;
        shared.engine.reset();
        shared.release_ticker();
        Ok(())
    }

    /// Complete the current interval now. Returns the completion events
    /// directly rather than queueing them.
    pub fn skip(&self) -> EngineResult<Vec<EngineEvent>> {
        let mut shared = self.lock()?;
        let events = shared.engine.skip(now());
        shared.release_ticker();
        Ok(events)
    }

    /// Apply new settings. The countdown stops; a rejected patch changes
    /// nothing, including the tick source.
    pub fn update_settings(&self, patch: &SettingsPatch) -> EngineResult<()> {
        let mut shared = self.lock()?;
        shared.engine.update_settings(patch)?;
        shared.release_ticker();
        Ok(())
    }

    pub fn set_daily_goal(&self, goal: u32) -> EngineResult<()> {
        self.lock()?.engine.set_daily_goal(goal);
        Ok(())
    }

    pub fn reset_completed_today(&self) -> EngineResult<()> {
        self.lock()?.engine.reset_completed_today();
        Ok(())
    }

    pub fn subscribe<F>(&self, callback: F) -> EngineResult<SubscriptionId>
    where
        F: FnMut(&Session) -> Result<(), SubscriberError> + Send + 'static,
    {
        Ok(self.lock()?.engine.subscribe(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> EngineResult<bool> {
        Ok(self.lock()?.engine.unsubscribe(id))
    }

    /// Drain the events produced by clock ticks since the last call
    pub fn take_events(&self) -> EngineResult<Vec<EngineEvent>> {
        Ok(std::mem::take(&mut self.lock()?.pending))
    }

    pub fn state(&self) -> EngineResult<EngineState> {
        Ok(self.lock()?.engine.state().clone())
    }

    pub fn history(&self) -> EngineResult<Vec<Session>> {
        Ok(self.lock()?.engine.history().to_vec())
    }

    pub fn stats(&self) -> EngineResult<SessionStats> {
        Ok(self.lock()?.engine.stats(now()))
    }

    pub fn snapshot(&self) -> EngineResult<EngineSnapshot> {
        Ok(self.lock()?.engine.snapshot())
    }

    /// Remaining time of the current interval as `MM:SS`
    pub fn format_remaining(&self) -> EngineResult<String> {
        Ok(format_countdown(self.lock()?.engine.state().time_remaining))
    }

    /// Whether a tick source is currently held
    pub fn is_ticking(&self) -> EngineResult<bool> {
        Ok(self.lock()?.ticker.is_some())
    }

    /// Release the tick source. The engine keeps its state and can be
    /// started again.
    pub fn shutdown(&self) {
        let mut shared = self.lock_unchecked();
        if shared.engine.is_active() {
            shared.engine.pause();
        }
        shared.release_ticker();
    }
}

impl<C: Clock> Drop for Timer<C> {
    fn drop(&mut self) {
        self.lock_unchecked().release_ticker();
    }
}
