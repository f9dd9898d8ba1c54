//! The attendance state machine.
//!
//! ```text
//! NotCheckedIn ──check_in──▶ CheckedIn ──start_break──▶ OnBreak
//!      ▲                      │   ▲                        │
//!      │                      │   └───────end_break────────┘
//!    reset                check_out
//!      │                      ▼
//!      └──────────────── CheckedOut
//! ```
//!
//! Every operation validates against the current state before touching
//! anything; the new state is built on a copy and swapped in only once it is
//! complete, so a rejected call leaves the machine exactly as it was.
//!
//! Checking out while on break is rejected: the break has to be ended first.

use crate::core::calculator::accumulator::{Accumulation, accumulate};
use crate::core::clock::{Clock, SystemClock};
use crate::core::history::SessionHistory;
use crate::errors::{AnomalyKind, ClockAnomaly, SessionError, SessionResult};
use crate::models::{
    AttendanceSession, BreakCategory, BreakInterval, SealedSession, SessionSnapshot, SessionState,
    SessionStatus, Timestamp, Transition, TransitionEvent, WorkLocation,
};
use chrono::{Duration, SubsecRound};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

pub struct SessionStateMachine<C: Clock = SystemClock> {
    clock: C,
    state: SessionState,
    history: SessionHistory,
    events: broadcast::Sender<TransitionEvent>,
}

impl Default for SessionStateMachine<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> SessionStateMachine<C> {
    pub fn new(clock: C) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            clock,
            state: SessionState::NotCheckedIn,
            history: SessionHistory::new(),
            events,
        }
    }

    /// Rebuild a machine around a previously saved state (e.g. after a
    /// restart). The state is checked against every session invariant first.
    /// History starts empty: sessions sealed by an earlier process belong to
    /// whoever persisted them.
    pub fn restore(clock: C, state: SessionState) -> SessionResult<Self> {
        validate_state(&state)?;
        debug!(status = %state.status(), "restored session state");
        let mut machine = Self::new(clock);
        machine.state = state;
        Ok(machine)
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&AttendanceSession> {
        self.state.session()
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Stream of committed transitions. Events sent before subscribing are
    /// not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<TransitionEvent> {
        self.events.subscribe()
    }

    pub fn accumulation_at(&self, now: Timestamp) -> Accumulation {
        match self.state.session() {
            Some(session) => accumulate(session, self.status(), now),
            None => Accumulation::default(),
        }
    }

    pub fn snapshot_at(&self, now: Timestamp) -> SessionSnapshot {
        let Some(session) = self.state.session() else {
            return SessionSnapshot::idle(now);
        };

        let acc = accumulate(session, self.status(), now);
        acc.log_anomalies();

        SessionSnapshot {
            status: self.status(),
            session: Some(session.clone()),
            total_elapsed_seconds: acc.total_elapsed_seconds,
            total_break_seconds: acc.total_break_seconds,
            net_working_seconds: acc.net_working_seconds,
            taken_at: now,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_at(self.now())
    }

    // ---------------------------
    // Transitions
    // ---------------------------

    pub fn check_in(
        &mut self,
        location: WorkLocation,
        note: Option<String>,
    ) -> SessionResult<SessionSnapshot> {
        if !matches!(self.state, SessionState::NotCheckedIn) {
            return Err(self.reject(Transition::CheckIn));
        }

        let now = self.now();
        let session = AttendanceSession::open(now, location, note);
        Ok(self.commit(Transition::CheckIn, SessionState::CheckedIn(session), now))
    }

    pub fn start_break(&mut self, category: BreakCategory) -> SessionResult<SessionSnapshot> {
        let SessionState::CheckedIn(session) = &self.state else {
            return Err(self.reject(Transition::StartBreak));
        };

        let now = self.now_not_before(session.last_instant());
        let mut next = session.clone();
        // a zero-length break ending right now would share its start with
        // the new one: drop it, breaks stay strictly ordered by start
        if next
            .breaks
            .last()
            .is_some_and(|b| b.start == now && b.end == Some(now))
        {
            next.breaks.pop();
        }
        next.breaks.push(BreakInterval {
            start: now,
            end: None,
            category,
        });

        Ok(self.commit(Transition::StartBreak, SessionState::OnBreak(next), now))
    }

    pub fn end_break(&mut self) -> SessionResult<SessionSnapshot> {
        let session = match &self.state {
            SessionState::OnBreak(session) => session,
            SessionState::CheckedIn(_) => return Err(SessionError::NoOpenBreak),
            SessionState::NotCheckedIn | SessionState::CheckedOut(_) => {
                return Err(self.reject(Transition::EndBreak));
            }
        };

        let now = self.now_not_before(session.last_instant());
        let mut next = session.clone();
        match next.breaks.last_mut() {
            Some(open) if open.is_open() => open.end = Some(now),
            _ => return Err(SessionError::NoOpenBreak),
        }

        Ok(self.commit(Transition::EndBreak, SessionState::CheckedIn(next), now))
    }

    pub fn check_out(&mut self, note: Option<String>) -> SessionResult<SessionSnapshot> {
        let SessionState::CheckedIn(session) = &self.state else {
            return Err(self.reject(Transition::CheckOut));
        };

        let now = self.now_not_before(session.last_instant());
        let mut next = session.clone();
        next.check_out = Some(now);
        next.check_out_note = note;
        let sealed = SealedSession::seal(next).map_err(SessionError::Inconsistent)?;

        self.history.append(sealed.clone());
        Ok(self.commit(Transition::CheckOut, SessionState::CheckedOut(sealed), now))
    }

    pub fn reset(&mut self) -> SessionResult<SessionSnapshot> {
        if !matches!(self.state, SessionState::CheckedOut(_)) {
            return Err(self.reject(Transition::Reset));
        }

        let now = self.now();
        Ok(self.commit(Transition::Reset, SessionState::NotCheckedIn, now))
    }

    /// Reset automatically once `quiescence` has passed since check-out.
    /// Returns `None` when there was nothing to do.
    pub fn settle(&mut self, quiescence: Duration) -> SessionResult<Option<SessionSnapshot>> {
        let SessionState::CheckedOut(sealed) = &self.state else {
            return Ok(None);
        };

        if self.now() - sealed.check_out() < quiescence {
            return Ok(None);
        }

        debug!("quiescence delay elapsed, resetting");
        self.reset().map(Some)
    }

    /// Replace the check-in note of the open session.
    pub fn edit_note(&mut self, note: Option<String>) -> SessionResult<SessionSnapshot> {
        let next = match &self.state {
            SessionState::CheckedIn(session) => SessionState::CheckedIn(AttendanceSession {
                check_in_note: note,
                ..session.clone()
            }),
            SessionState::OnBreak(session) => SessionState::OnBreak(AttendanceSession {
                check_in_note: note,
                ..session.clone()
            }),
            SessionState::NotCheckedIn | SessionState::CheckedOut(_) => {
                return Err(self.reject(Transition::EditNote));
            }
        };

        let now = self.now();
        Ok(self.commit(Transition::EditNote, next, now))
    }

    // ---------------------------
    // Internals
    // ---------------------------

    fn reject(&self, action: Transition) -> SessionError {
        SessionError::InvalidTransition {
            action,
            status: self.status(),
        }
    }

    /// Clock reading cut to whole seconds. Every recorded instant goes
    /// through here.
    fn now(&self) -> Timestamp {
        self.clock.now().trunc_subsecs(0)
    }

    /// Read the clock, but never return less than `floor`.
    fn now_not_before(&self, floor: Timestamp) -> Timestamp {
        let now = self.now();
        if now < floor {
            let anomaly = ClockAnomaly {
                kind: AnomalyKind::ClockWentBackwards,
                seconds: (floor - now).num_seconds(),
            };
            warn!(kind = ?anomaly.kind, seconds = anomaly.seconds, "{}", anomaly);
            floor
        } else {
            now
        }
    }

    fn commit(&mut self, kind: Transition, next: SessionState, at: Timestamp) -> SessionSnapshot {
        self.state = next;
        let payload = self.snapshot_at(at);

        info!(
            transition = kind.as_str(),
            status = %payload.status,
            net_working_seconds = payload.net_working_seconds,
            "session transition"
        );

        // no subscribers is fine
        let _ = self.events.send(TransitionEvent {
            kind,
            timestamp: at,
            payload: payload.clone(),
        });

        payload
    }
}

fn validate_state(state: &SessionState) -> SessionResult<()> {
    let checked = match state {
        SessionState::NotCheckedIn => Ok(()),
        SessionState::CheckedIn(s) | SessionState::OnBreak(s) if s.check_out.is_some() => {
            Err("open session carries a check-out".to_string())
        }
        SessionState::CheckedIn(s) => s.validate(false),
        SessionState::OnBreak(s) => s.validate(true),
        SessionState::CheckedOut(sealed) if sealed.check_out.is_none() => {
            Err("checked-out session has no check-out".to_string())
        }
        SessionState::CheckedOut(sealed) => sealed.validate(false),
    };
    checked.map_err(SessionError::Inconsistent)
}
