//! Lock-guarded owner of one subject's state machine.
//!
//! Transitions and scheduler ticks both go through the same mutex, so a tick
//! never sees a half-applied transition. The latest snapshot is published on
//! a `watch` channel for display collaborators.

use crate::core::clock::{Clock, SystemClock};
use crate::core::machine::SessionStateMachine;
use crate::errors::SessionResult;
use crate::models::{
    BreakCategory, SessionSnapshot, SessionState, SessionStatus, TransitionEvent, WorkLocation,
};
use chrono::Duration;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

pub struct AttendanceTracker<C: Clock = SystemClock> {
    machine: Arc<Mutex<SessionStateMachine<C>>>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
}

impl<C: Clock> Clone for AttendanceTracker<C> {
    fn clone(&self) -> Self {
        Self {
            machine: Arc::clone(&self.machine),
            snapshots: Arc::clone(&self.snapshots),
        }
    }
}

/// What a single scheduler tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    Published(SessionSnapshot),
    /// No open session: the scheduler has nothing left to drive.
    Inactive,
    Cancelled,
}

impl<C: Clock> AttendanceTracker<C> {
    pub fn new(machine: SessionStateMachine<C>) -> Self {
        let (snapshots, _) = watch::channel(machine.snapshot());
        Self {
            machine: Arc::new(Mutex::new(machine)),
            snapshots: Arc::new(snapshots),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.machine.lock().status()
    }

    pub fn state(&self) -> SessionState {
        self.machine.lock().state().clone()
    }

    /// Fresh snapshot computed at the machine's clock.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.machine.lock().snapshot()
    }

    /// Read access to the machine (history, clock...) under the lock.
    pub fn with_machine<R>(&self, f: impl FnOnce(&SessionStateMachine<C>) -> R) -> R {
        f(&self.machine.lock())
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TransitionEvent> {
        self.machine.lock().subscribe()
    }

    pub fn check_in(
        &self,
        location: WorkLocation,
        note: Option<String>,
    ) -> SessionResult<SessionSnapshot> {
        self.apply(|m| m.check_in(location, note))
    }

    pub fn start_break(&self, category: BreakCategory) -> SessionResult<SessionSnapshot> {
        self.apply(|m| m.start_break(category))
    }

    pub fn end_break(&self) -> SessionResult<SessionSnapshot> {
        self.apply(|m| m.end_break())
    }

    pub fn check_out(&self, note: Option<String>) -> SessionResult<SessionSnapshot> {
        self.apply(|m| m.check_out(note))
    }

    pub fn reset(&self) -> SessionResult<SessionSnapshot> {
        self.apply(|m| m.reset())
    }

    pub fn edit_note(&self, note: Option<String>) -> SessionResult<SessionSnapshot> {
        self.apply(|m| m.edit_note(note))
    }

    pub fn settle(&self, quiescence: Duration) -> SessionResult<Option<SessionSnapshot>> {
        let mut machine = self.machine.lock();
        let settled = machine.settle(quiescence)?;
        if let Some(snapshot) = &settled {
            self.snapshots.send_replace(snapshot.clone());
        }
        Ok(settled)
    }

    fn apply(
        &self,
        op: impl FnOnce(&mut SessionStateMachine<C>) -> SessionResult<SessionSnapshot>,
    ) -> SessionResult<SessionSnapshot> {
        let mut machine = self.machine.lock();
        let snapshot = op(&mut machine)?;
        // publish while still holding the lock so observers see transitions in order
        self.snapshots.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Block until nobody holds the machine lock.
    pub(crate) fn fence(&self) {
        drop(self.machine.lock());
    }

    /// One scheduler tick. Cancellation is checked under the lock, so once
    /// `cancel` is set no further snapshot gets out.
    pub(crate) fn tick(&self, cancel: &CancellationToken) -> TickOutcome {
        let machine = self.machine.lock();
        if cancel.is_cancelled() {
            return TickOutcome::Cancelled;
        }
        if !machine.status().is_active() {
            return TickOutcome::Inactive;
        }

        let snapshot = machine.snapshot();
        self.snapshots.send_replace(snapshot.clone());
        TickOutcome::Published(snapshot)
    }
}
