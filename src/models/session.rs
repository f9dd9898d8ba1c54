//! Session records: one check-in/check-out cycle and the breaks inside it.

use super::{break_category::BreakCategory, location::WorkLocation};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Wall-clock reading used everywhere in the engine.
pub type Timestamp = DateTime<Local>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub category: BreakCategory,
}

impl BreakInterval {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSession {
    pub check_in: Timestamp,
    pub check_in_location: WorkLocation,
    pub check_in_note: Option<String>,
    /// Insertion order is chronological order.
    pub breaks: Vec<BreakInterval>,
    pub check_out: Option<Timestamp>,
    pub check_out_note: Option<String>,
}

impl AttendanceSession {
    pub(crate) fn open(at: Timestamp, location: WorkLocation, note: Option<String>) -> Self {
        Self {
            check_in: at,
            check_in_location: location,
            check_in_note: note,
            breaks: Vec::new(),
            check_out: None,
            check_out_note: None,
        }
    }

    /// Local calendar date of the check-in; sessions are filed under it.
    pub fn date(&self) -> NaiveDate {
        self.check_in.date_naive()
    }

    pub fn open_break(&self) -> Option<&BreakInterval> {
        self.breaks.last().filter(|b| b.is_open())
    }

    pub fn closed_breaks(&self) -> impl Iterator<Item = &BreakInterval> {
        self.breaks.iter().filter(|b| !b.is_open())
    }

    /// Latest instant recorded in the session. New instants are never
    /// allowed to fall before it.
    pub fn last_instant(&self) -> Timestamp {
        let mut last = self.check_in;
        for b in &self.breaks {
            last = last.max(b.start);
            if let Some(end) = b.end {
                last = last.max(end);
            }
        }
        if let Some(out) = self.check_out {
            last = last.max(out);
        }
        last
    }

    /// Check the structural invariants of a session.
    /// `open_break_expected` says whether the owning state is OnBreak.
    ///
    /// Break starts must be strictly increasing. A break may start at the
    /// very instant the previous one ended, and may itself be zero-length.
    pub(crate) fn validate(&self, open_break_expected: bool) -> Result<(), String> {
        let open_count = self.breaks.iter().filter(|b| b.is_open()).count();

        match (open_break_expected, open_count) {
            (true, 1) if self.open_break().is_some() => {}
            (true, _) => return Err("on break but no single trailing open break".into()),
            (false, 0) => {}
            (false, _) => return Err("open break outside of an active break".into()),
        }

        let mut floor = self.check_in;
        let mut prev_start: Option<Timestamp> = None;
        for (i, b) in self.breaks.iter().enumerate() {
            if prev_start.is_some_and(|p| b.start <= p) {
                return Err(format!(
                    "break #{} does not start after the previous one",
                    i + 1
                ));
            }
            prev_start = Some(b.start);
            if b.start < floor {
                return Err(format!(
                    "break #{} starts before check-in or the previous break",
                    i + 1
                ));
            }
            if let Some(end) = b.end {
                if end < b.start {
                    return Err(format!("break #{} ends before it starts", i + 1));
                }
                floor = end;
            } else {
                floor = b.start;
            }
        }

        if let Some(out) = self.check_out {
            if out < floor {
                return Err("check-out precedes a recorded break".into());
            }
            if open_count > 0 {
                return Err("break still open at check-out".into());
            }
        }

        Ok(())
    }
}

/// A checked-out session. Read-only: it derefs to the underlying record but
/// never hands out mutable access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SealedSession(AttendanceSession);

impl SealedSession {
    pub(crate) fn seal(session: AttendanceSession) -> Result<Self, String> {
        if session.check_out.is_none() {
            return Err("cannot seal a session without check-out".into());
        }
        session.validate(false)?;
        Ok(Self(session))
    }

    pub fn session(&self) -> &AttendanceSession {
        &self.0
    }

    pub fn check_out(&self) -> Timestamp {
        // seal() refuses sessions without a check-out
        self.0.check_out.unwrap_or(self.0.check_in)
    }
}

impl Deref for SealedSession {
    type Target = AttendanceSession;

    fn deref(&self) -> &AttendanceSession {
        &self.0
    }
}
