use super::session::{AttendanceSession, SealedSession};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotCheckedIn,
    CheckedIn,
    OnBreak,
    CheckedOut,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::NotCheckedIn => "not checked in",
            SessionStatus::CheckedIn => "checked in",
            SessionStatus::OnBreak => "on break",
            SessionStatus::CheckedOut => "checked out",
        }
    }

    /// A session is open and its durations keep moving.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::CheckedIn | SessionStatus::OnBreak)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status together with the session it governs. A session only exists in
/// the variants that can have one, so "breaks while not checked in" cannot
/// be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "session", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NotCheckedIn,
    CheckedIn(AttendanceSession),
    /// The last break of the session is open.
    OnBreak(AttendanceSession),
    CheckedOut(SealedSession),
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::NotCheckedIn => SessionStatus::NotCheckedIn,
            SessionState::CheckedIn(_) => SessionStatus::CheckedIn,
            SessionState::OnBreak(_) => SessionStatus::OnBreak,
            SessionState::CheckedOut(_) => SessionStatus::CheckedOut,
        }
    }

    pub fn session(&self) -> Option<&AttendanceSession> {
        match self {
            SessionState::NotCheckedIn => None,
            SessionState::CheckedIn(s) | SessionState::OnBreak(s) => Some(s),
            SessionState::CheckedOut(sealed) => Some(sealed.session()),
        }
    }
}
