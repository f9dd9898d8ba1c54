//! Runs one transition against the stored state: load, settle, apply,
//! write back. This is the persistence side of the engine; the engine
//! itself never touches the database.

use crate::core::clock::{Clock, SystemClock};
use crate::core::machine::SessionStateMachine;
use crate::core::tracker::AttendanceTracker;
use crate::db::log::log_transition;
use crate::db::queries::{insert_sealed_session, load_active_state, save_active_state};
use crate::errors::AppResult;
use crate::models::{
    BreakCategory, SealedSession, SessionSnapshot, Transition, TransitionEvent, WorkLocation,
};
use rusqlite::Connection;
use tokio::sync::broadcast::{self, error::TryRecvError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PunchAction {
    In {
        location: WorkLocation,
        note: Option<String>,
    },
    Break(BreakCategory),
    Resume,
    Out {
        note: Option<String>,
    },
    Reset,
    Note(Option<String>),
}

impl PunchAction {
    pub fn transition(&self) -> Transition {
        match self {
            PunchAction::In { .. } => Transition::CheckIn,
            PunchAction::Break(_) => Transition::StartBreak,
            PunchAction::Resume => Transition::EndBreak,
            PunchAction::Out { .. } => Transition::CheckOut,
            PunchAction::Reset => Transition::Reset,
            PunchAction::Note(_) => Transition::EditNote,
        }
    }
}

pub struct PunchLogic<C: Clock = SystemClock> {
    tracker: AttendanceTracker<C>,
    events: broadcast::Receiver<TransitionEvent>,
    /// History entries already written to the database.
    stored: usize,
}

impl<C: Clock> PunchLogic<C> {
    /// Restore the saved state (or start fresh) around `clock`.
    pub fn load(conn: &Connection, clock: C) -> AppResult<Self> {
        let state = load_active_state(conn)?.unwrap_or_default();
        let machine = SessionStateMachine::restore(clock, state)?;
        let tracker = AttendanceTracker::new(machine);
        let events = tracker.subscribe_events();
        Ok(Self {
            tracker,
            events,
            stored: 0,
        })
    }

    pub fn tracker(&self) -> &AttendanceTracker<C> {
        &self.tracker
    }

    /// Apply the quiescence reset if it is due.
    pub fn settle(&self, quiescence: chrono::Duration) -> AppResult<Option<SessionSnapshot>> {
        Ok(self.tracker.settle(quiescence)?)
    }

    pub fn apply(&self, action: PunchAction) -> AppResult<SessionSnapshot> {
        let snapshot = match action {
            PunchAction::In { location, note } => self.tracker.check_in(location, note),
            PunchAction::Break(category) => self.tracker.start_break(category),
            PunchAction::Resume => self.tracker.end_break(),
            PunchAction::Out { note } => self.tracker.check_out(note),
            PunchAction::Reset => self.tracker.reset(),
            PunchAction::Note(note) => self.tracker.edit_note(note),
        }?;
        Ok(snapshot)
    }

    /// Write everything that happened since `load` in one transaction:
    /// sealed sessions, the internal log lines and the current state.
    /// Returns how many transitions were recorded.
    pub fn persist(&mut self, conn: &mut Connection) -> AppResult<usize> {
        let tx = conn.transaction()?;
        let mut recorded = 0;

        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "transition events dropped before persisting");
                    continue;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            };

            log_transition(&tx, &event)?;
            recorded += 1;
        }

        let unsaved: Vec<SealedSession> = self
            .tracker
            .with_machine(|m| m.history().iter().skip(self.stored).cloned().collect());
        for sealed in &unsaved {
            let id = insert_sealed_session(&tx, sealed)?;
            tracing::debug!(id, "sealed session stored");
        }

        save_active_state(&tx, &self.tracker.state())?;
        tx.commit()?;

        self.stored += unsaved.len();
        Ok(recorded)
    }
}
