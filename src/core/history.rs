//! Append-only list of finalized sessions, held for the process lifetime.

use crate::core::calculator::accumulator::accumulate;
use crate::models::{SealedSession, SessionStatus};
use chrono::NaiveDate;

/// Sums over a set of sealed sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryTotals {
    pub sessions: usize,
    pub elapsed_seconds: i64,
    pub break_seconds: i64,
    pub net_seconds: i64,
}

impl HistoryTotals {
    pub fn of<'a>(sessions: impl IntoIterator<Item = &'a SealedSession>) -> Self {
        let mut totals = HistoryTotals::default();
        for s in sessions {
            // sealed sessions are closed, so `now` is never consulted
            let acc = accumulate(s.session(), SessionStatus::CheckedOut, s.check_out());
            totals.sessions += 1;
            totals.elapsed_seconds += acc.total_elapsed_seconds;
            totals.break_seconds += acc.total_break_seconds;
            totals.net_seconds += acc.net_working_seconds;
        }
        totals
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    sessions: Vec<SealedSession>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the state machine appends, once per check-out.
    pub(crate) fn append(&mut self, sealed: SealedSession) {
        self.sessions.push(sealed);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SealedSession> {
        self.sessions.iter()
    }

    pub fn last(&self) -> Option<&SealedSession> {
        self.sessions.last()
    }

    /// Sessions whose check-in falls on `date`.
    pub fn by_date(&self, date: NaiveDate) -> Vec<&SealedSession> {
        self.sessions.iter().filter(|s| s.date() == date).collect()
    }

    /// Sessions whose check-in date is within `from..=to`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&SealedSession> {
        self.sessions
            .iter()
            .filter(|s| (from..=to).contains(&s.date()))
            .collect()
    }

    pub fn totals(&self) -> HistoryTotals {
        HistoryTotals::of(&self.sessions)
    }
}
