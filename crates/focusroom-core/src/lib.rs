//! Pomodoro session engine for focusroom
//!
//! This crate is the heart of focusroom, containing:
//! - Session state machine (work -> short/long break -> work, with pause/resume)
//! - Completed-session history and statistics
//! - Completion subscribers
//! - Clock abstraction with a virtual clock for tests and a tokio clock
//! - A timer binding the engine to a clock

mod clock;
mod engine;
mod error;
mod events;
mod session;
mod stats;
mod timer;

pub use clock::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use session::*;
pub use stats::*;
pub use timer::*;

pub use focusroom_config::{Settings, SettingsError, SettingsPatch, SessionKind};
pub use focusroom_util::{format_countdown, SessionId, SubscriptionId};
