//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage. The session engine has its own
//! narrower `SessionError`, folded into AppError at the CLI boundary.

use crate::models::{SessionStatus, Transition};
use std::fmt;
use std::io;
use thiserror::Error;

// ---------------------------
// Session engine
// ---------------------------

/// Rejected transitions. None of them mutate state and all of them are
/// recoverable by choosing a different action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while {status}")]
    InvalidTransition {
        action: Transition,
        status: SessionStatus,
    },

    #[error("No open break to end")]
    NoOpenBreak,

    #[error("Inconsistent session state: {0}")]
    Inconsistent(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// `now` is earlier than the check-in.
    NowBeforeCheckIn,
    /// Stored check-out precedes the check-in.
    CheckOutBeforeCheckIn,
    /// A closed break ends before it starts.
    BreakEndsBeforeStart,
    /// `now` is earlier than the start of the open break.
    NowBeforeBreakStart,
    /// Break time exceeds elapsed time.
    BreakExceedsElapsed,
    /// The clock returned an instant earlier than the last recorded one.
    ClockWentBackwards,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnomalyKind::NowBeforeCheckIn => "now is before check-in",
            AnomalyKind::CheckOutBeforeCheckIn => "check-out is before check-in",
            AnomalyKind::BreakEndsBeforeStart => "break ends before it starts",
            AnomalyKind::NowBeforeBreakStart => "now is before the open break started",
            AnomalyKind::BreakExceedsElapsed => "break time exceeds elapsed time",
            AnomalyKind::ClockWentBackwards => "clock went backwards",
        };
        f.write_str(s)
    }
}

/// A timestamp comparison that would have produced a negative duration.
/// Clamped to zero where it happens; kept around for diagnostics only.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Clock anomaly: {kind} (by {seconds}s)")]
pub struct ClockAnomaly {
    pub kind: AnomalyKind,
    /// Size of the discarded negative delta, as a positive number.
    pub seconds: i64,
}

// ---------------------------
// Application
// ---------------------------

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Stored state error: {0}")]
    StoredState(#[from] serde_json::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid position code: {0}")]
    InvalidPosition(String),

    #[error("Invalid break kind: {0}")]
    InvalidBreakKind(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error(transparent)]
    Session(#[from] SessionError),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
