//! Error types for the session engine

use focusroom_config::SettingsError;
use thiserror::Error;

/// Core error type for engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Timer state lock poisoned")]
    Poisoned,
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failure reported by a completion subscriber.
///
/// The engine has already committed the completion when subscribers run, so
/// a failure never rolls anything back; it is logged and surfaced as an
/// [`EngineEvent::SubscriberFailed`](crate::EngineEvent::SubscriberFailed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubscriberError {
    message: String,
}

impl SubscriberError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
