//! Clock abstraction for driving the timer
//!
//! A [`Clock`] runs a callback repeatedly until the returned [`ClockHandle`]
//! is released. [`TokioClock`] is the real-time implementation used by the
//! daemon; [`ManualClock`] is advanced explicitly and is what the tests use.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::trace;

/// Shortest period a clock will schedule. Zero periods are raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Callback invoked on every tick of a repeating schedule
pub type TickCallback = Box<dyn FnMut() + Send>;

/// Source of repeating ticks
pub trait Clock: Send + Sync + 'static {
    /// Invoke `on_tick` every `period`, starting one period from now, until
    /// the returned handle is released or dropped.
    fn schedule_repeating(&self, period: Duration, on_tick: TickCallback) -> ClockHandle;
}

/// Ownership of a repeating schedule.
///
/// Releasing (or dropping) the handle cancels the schedule. After release
/// returns, the callback is not invoked again.
#[must_use = "dropping a ClockHandle cancels its schedule"]
pub struct ClockHandle {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ClockHandle {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Cancel the schedule. Returns false if it was already released.
    pub fn release(&mut self) -> bool {
        match self.release.take() {
            Some(release) => {
                release();
                true
            }
            None => false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.release.is_none()
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ClockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockHandle")
            .field("released", &self.is_released())
            .finish()
    }
}

/// Real-time clock backed by a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioClock {
    handle: Handle,
}

impl TokioClock {
    /// Clock on the runtime of the calling context, if there is one
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::from_handle)
    }

    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Clock for TokioClock {
    fn schedule_repeating(&self, period: Duration, mut on_tick: TickCallback) -> ClockHandle {
        let period = period.max(MIN_PERIOD);
        let cancelled = Arc::new(AtomicBool::new(false));

        let flag = cancelled.clone();
        let task = self.handle.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                on_tick();
            }
        });

        ClockHandle::new(move || {
            cancelled.store(true, Ordering::Release);
            task.abort();
        })
    }
}

struct Schedule {
    id: u64,
    period: Duration,
    next_fire: Duration,
    callback: Arc<Mutex<TickCallback>>,
    cancelled: Arc<AtomicBool>,
}

#[derive(Default)]
struct ManualInner {
    elapsed: Duration,
    next_id: u64,
    schedules: Vec<Schedule>,
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same timeline.
#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
    released: Arc<AtomicUsize>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Number of schedules that have not been released
    pub fn live_schedules(&self) -> usize {
        self.lock().schedules.len()
    }

    /// Number of handles released over the clock's lifetime
    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::Acquire)
    }

    /// Move virtual time forward, firing every tick that falls due in order.
    ///
    /// Ticks due at the same instant fire in scheduling order. Callbacks run
    /// without the clock's lock held, so they may schedule or release.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().elapsed + by;

        loop {
            let due = {
                let mut inner = self.lock();
                let next = inner
                    .schedules
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.next_fire <= target)
                    .min_by_key(|(_, s)| (s.next_fire, s.id))
                    .map(|(index, _)| index);

                match next {
                    Some(index) => {
                        let schedule = &mut inner.schedules[index];
                        let fire_at = schedule.next_fire;
                        schedule.next_fire += schedule.period;
                        let due = (schedule.callback.clone(), schedule.cancelled.clone());
                        inner.elapsed = fire_at;
                        Some(due)
                    }
                    None => {
                        inner.elapsed = target;
                        None
                    }
                }
            };

            let Some((callback, cancelled)) = due else {
                break;
            };
            if cancelled.load(Ordering::Acquire) {
                continue;
            }
            let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
            (*callback)();
        }
    }
}

impl Clock for ManualClock {
    fn schedule_repeating(&self, period: Duration, on_tick: TickCallback) -> ClockHandle {
        let period = period.max(MIN_PERIOD);
        let cancelled = Arc::new(AtomicBool::new(false));

        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            let next_fire = inner.elapsed + period;
            inner.schedules.push(Schedule {
                id,
                period,
                next_fire,
                callback: Arc::new(Mutex::new(on_tick)),
                cancelled: cancelled.clone(),
            });
            id
        };
        trace!(schedule = id, period_ms = period.as_millis() as u64, "Manual schedule created");

        let inner: Weak<Mutex<ManualInner>> = Arc::downgrade(&self.inner);
        let released = self.released.clone();
        ClockHandle::new(move || {
            cancelled.store(true, Ordering::Release);
            released.fetch_add(1, Ordering::AcqRel);
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                inner.schedules.retain(|s| s.id != id);
            }
            trace!(schedule = id, "Manual schedule released");
        })
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("ManualClock")
            .field("elapsed", &inner.elapsed)
            .field("schedules", &inner.schedules.len())
            .finish()
    }
}
