//! Completed session records

use chrono::{DateTime, Local};
use focusroom_config::SessionKind;
use focusroom_util::SessionId;
use serde::{Deserialize, Serialize};

/// One finished work or break interval.
///
/// Records are created by the engine at completion time and never change
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,

    #[serde(rename = "type")]
    pub kind: SessionKind,

    /// Length in minutes, resolved from the settings in force at completion
    pub duration: u32,

    /// Whether the interval ran to completion. Always true for engine records.
    pub completed: bool,

    pub ended_at: DateTime<Local>,
}

impl Session {
    /// Create the record for an interval that just finished
    pub fn completed(kind: SessionKind, duration: u32, ended_at: DateTime<Local>) -> Self {
        Self {
            id: SessionId::new(),
            kind,
            duration,
            completed: true,
            ended_at,
        }
    }

    pub fn is_work(&self) -> bool {
        self.kind == SessionKind::Work
    }
}
