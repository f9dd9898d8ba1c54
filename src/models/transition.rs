use super::session::Timestamp;
use super::snapshot::SessionSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every mutation the state machine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    CheckIn,
    StartBreak,
    EndBreak,
    CheckOut,
    Reset,
    EditNote,
}

impl Transition {
    /// Operation name as written into the internal log table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::CheckIn => "check_in",
            Transition::StartBreak => "start_break",
            Transition::EndBreak => "end_break",
            Transition::CheckOut => "check_out",
            Transition::Reset => "reset",
            Transition::EditNote => "edit_note",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transition::CheckIn => "check in",
            Transition::StartBreak => "start a break",
            Transition::EndBreak => "end a break",
            Transition::CheckOut => "check out",
            Transition::Reset => "reset",
            Transition::EditNote => "edit the note",
        };
        f.write_str(s)
    }
}

/// Emitted after each committed transition. `payload` is the snapshot as
/// it stands right after the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    #[serde(rename = "type")]
    pub kind: Transition,
    pub timestamp: Timestamp,
    pub payload: SessionSnapshot,
}
