use super::session::{AttendanceSession, Timestamp};
use super::status::SessionStatus;
use serde::{Deserialize, Serialize};

/// Read-only view handed to display collaborators, refreshed on every
/// transition and every tick. All durations are non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub session: Option<AttendanceSession>,
    pub total_elapsed_seconds: i64,
    pub total_break_seconds: i64,
    pub net_working_seconds: i64,
    pub taken_at: Timestamp,
}

impl SessionSnapshot {
    /// Snapshot for a subject with no session at all.
    pub fn idle(taken_at: Timestamp) -> Self {
        Self {
            status: SessionStatus::NotCheckedIn,
            session: None,
            total_elapsed_seconds: 0,
            total_break_seconds: 0,
            net_working_seconds: 0,
            taken_at,
        }
    }
}
