//! Events emitted by the engine

use focusroom_config::SessionKind;
use focusroom_util::SubscriptionId;

use crate::{Session, SubscriberError};

/// Events emitted by the session engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An interval finished (countdown expiry or skip)
    SessionCompleted {
        session: Session,
        next_kind: SessionKind,
    },

    /// A completion subscriber returned an error
    SubscriberFailed {
        subscription: SubscriptionId,
        error: SubscriberError,
    },
}

impl EngineEvent {
    /// The completed session, if this is a completion event
    pub fn completed_session(&self) -> Option<&Session> {
        match self {
            EngineEvent::SessionCompleted { session, .. } => Some(session),
            EngineEvent::SubscriberFailed { .. } => None,
        }
    }
}
