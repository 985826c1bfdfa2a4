//! Shared utilities for focusroom
//!
//! This crate provides:
//! - ID types (SessionId, SubscriptionId)
//! - Time utilities (mockable local time, countdown formatting, calendar days)
//! - Default paths for the configuration file

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
