use rattendance::core::{ManualClock, SessionStateMachine};
use rattendance::errors::SessionError;
use rattendance::models::{
    AttendanceSession, BreakCategory, BreakInterval, SessionState, SessionStatus, Transition,
    WorkLocation,
};

mod common;
use common::{at, machine_at};

#[test]
fn test_full_day_with_lunch() {
    let (clock, mut m) = machine_at(at(9, 0, 0));

    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance_secs(3600);
    m.start_break(BreakCategory::Lunch).unwrap();
    clock.advance_secs(1800);
    m.end_break().unwrap();
    clock.advance_secs(3600);
    let snap = m.check_out(None).unwrap();

    assert_eq!(snap.status, SessionStatus::CheckedOut);
    assert_eq!(snap.total_break_seconds, 1800);
    assert_eq!(snap.total_elapsed_seconds, 9000);
    assert_eq!(snap.net_working_seconds, 7200);
    assert_eq!(m.history().len(), 1);

    // a checked-out session no longer moves
    clock.advance_secs(7200);
    assert_eq!(m.snapshot().net_working_seconds, 7200);
}

#[test]
fn test_end_break_without_open_break() {
    let (_clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Remote, None).unwrap();
    let before = m.state().clone();

    assert_eq!(m.end_break(), Err(SessionError::NoOpenBreak));
    assert_eq!(m.status(), SessionStatus::CheckedIn);
    assert_eq!(m.state(), &before);
}

#[test]
fn test_end_break_when_not_checked_in() {
    let (_clock, mut m) = machine_at(at(9, 0, 0));

    let err = m.end_break().unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            action: Transition::EndBreak,
            status: SessionStatus::NotCheckedIn,
        }
    );
    assert_eq!(m.status(), SessionStatus::NotCheckedIn);
}

#[test]
fn test_check_out_while_on_break_is_rejected() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance_secs(600);
    m.start_break(BreakCategory::Tea).unwrap();
    let before = m.state().clone();

    clock.advance_secs(60);
    let err = m.check_out(None).unwrap_err();

    assert_eq!(
        err,
        SessionError::InvalidTransition {
            action: Transition::CheckOut,
            status: SessionStatus::OnBreak,
        }
    );
    assert_eq!(m.state(), &before);
    assert!(m.history().is_empty());
    assert!(m.session().and_then(|s| s.open_break()).is_some());
}

#[test]
fn test_double_check_in_is_rejected() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Office, Some("first".into()))
        .unwrap();
    clock.advance_secs(300);
    let before = m.snapshot();

    let err = m.check_in(WorkLocation::Home, None).unwrap_err();

    assert!(matches!(
        err,
        SessionError::InvalidTransition {
            action: Transition::CheckIn,
            status: SessionStatus::CheckedIn,
        }
    ));
    assert_eq!(m.snapshot(), before);
    assert_eq!(
        m.session().map(|s| s.check_in_location),
        Some(WorkLocation::Office)
    );
}

#[test]
fn test_break_round_trip_adds_exactly_its_duration() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance_secs(1000);
    let before = m.snapshot().total_break_seconds;

    m.start_break(BreakCategory::Short).unwrap();
    clock.advance_secs(420);
    let snap = m.end_break().unwrap();

    assert_eq!(snap.total_break_seconds - before, 420);
    let session = m.session().unwrap();
    assert_eq!(session.breaks.len(), 1);
    assert!(!session.breaks[0].is_open());
    assert_eq!(session.breaks[0].category, BreakCategory::Short);
}

#[test]
fn test_net_time_frozen_while_on_break() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance_secs(600);
    m.start_break(BreakCategory::Lunch).unwrap();

    let mut last = m.snapshot();
    for _ in 0..5 {
        clock.advance_secs(180);
        let snap = m.snapshot();
        assert_eq!(snap.net_working_seconds, 600);
        assert!(snap.total_break_seconds > last.total_break_seconds);
        last = snap;
    }
    assert_eq!(last.total_break_seconds, 900);
}

#[test]
fn test_net_time_grows_while_checked_in() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Field, None).unwrap();

    let mut last = m.snapshot().net_working_seconds;
    for step in [1, 59, 0, 3600] {
        clock.advance_secs(step);
        let net = m.snapshot().net_working_seconds;
        assert!(net >= last);
        last = net;
    }
    assert_eq!(last, 3660);
}

#[test]
fn test_reset_only_after_check_out() {
    let (clock, mut m) = machine_at(at(9, 0, 0));

    assert!(m.reset().is_err());
    m.check_in(WorkLocation::Office, None).unwrap();
    assert!(m.reset().is_err());

    clock.advance_secs(3600);
    m.check_out(Some("done".into())).unwrap();
    let snap = m.reset().unwrap();

    assert_eq!(snap.status, SessionStatus::NotCheckedIn);
    assert!(snap.session.is_none());
    assert_eq!(snap.net_working_seconds, 0);
    // history survives the reset
    assert_eq!(m.history().len(), 1);
    assert_eq!(
        m.history().last().and_then(|s| s.check_out_note.clone()),
        Some("done".to_string())
    );
}

#[test]
fn test_settle_waits_for_quiescence() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance_secs(3600);
    m.check_out(None).unwrap();

    let delay = chrono::Duration::seconds(300);
    clock.advance_secs(100);
    assert_eq!(m.settle(delay), Ok(None));
    assert_eq!(m.status(), SessionStatus::CheckedOut);

    clock.advance_secs(250);
    let settled = m.settle(delay).unwrap();
    assert!(settled.is_some());
    assert_eq!(m.status(), SessionStatus::NotCheckedIn);

    // nothing left to settle
    assert_eq!(m.settle(delay), Ok(None));
}

#[test]
fn test_edit_note() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    assert!(m.edit_note(Some("x".into())).is_err());

    m.check_in(WorkLocation::Office, Some("old".into())).unwrap();
    m.edit_note(Some("new".into())).unwrap();
    assert_eq!(
        m.session().and_then(|s| s.check_in_note.clone()),
        Some("new".to_string())
    );

    clock.advance_secs(60);
    m.start_break(BreakCategory::Tea).unwrap();
    m.edit_note(None).unwrap();
    assert_eq!(m.status(), SessionStatus::OnBreak);
    assert!(m.session().unwrap().check_in_note.is_none());
}

#[test]
fn test_clock_going_backwards_never_reorders_instants() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Office, None).unwrap();

    clock.set(at(8, 55, 0));
    m.start_break(BreakCategory::Short).unwrap();
    let session = m.session().unwrap();
    assert_eq!(session.breaks[0].start, at(9, 0, 0));

    let snap = m.snapshot();
    assert_eq!(snap.total_elapsed_seconds, 0);
    assert_eq!(snap.net_working_seconds, 0);

    clock.set(at(9, 10, 0));
    m.end_break().unwrap();
    clock.set(at(9, 5, 0));
    m.check_out(None).unwrap();

    let sealed = m.history().last().unwrap();
    assert_eq!(sealed.check_out(), at(9, 10, 0));
}

#[test]
fn test_events_follow_committed_transitions() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    let mut events = m.subscribe();

    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance_secs(60);
    // rejected: no event
    assert!(m.end_break().is_err());
    m.start_break(BreakCategory::Lunch).unwrap();

    let first = events.try_recv().unwrap();
    assert_eq!(first.kind, Transition::CheckIn);
    assert_eq!(first.timestamp, at(9, 0, 0));
    assert_eq!(first.payload.status, SessionStatus::CheckedIn);

    let second = events.try_recv().unwrap();
    assert_eq!(second.kind, Transition::StartBreak);
    assert_eq!(second.payload.status, SessionStatus::OnBreak);
    assert_eq!(second.payload.net_working_seconds, 60);

    assert!(events.try_recv().is_err());
}

#[test]
fn test_restore_validates_state() {
    let clock = ManualClock::new(at(10, 0, 0));

    // on break, but the last break is closed
    let broken = SessionState::OnBreak(AttendanceSession {
        check_in: at(9, 0, 0),
        check_in_location: WorkLocation::Office,
        check_in_note: None,
        breaks: vec![BreakInterval {
            start: at(9, 30, 0),
            end: Some(at(9, 40, 0)),
            category: BreakCategory::Tea,
        }],
        check_out: None,
        check_out_note: None,
    });
    assert!(matches!(
        SessionStateMachine::restore(clock.clone(), broken),
        Err(SessionError::Inconsistent(_))
    ));

    // break starting before check-in
    let early = SessionState::CheckedIn(AttendanceSession {
        check_in: at(9, 0, 0),
        check_in_location: WorkLocation::Office,
        check_in_note: None,
        breaks: vec![BreakInterval {
            start: at(8, 0, 0),
            end: Some(at(8, 10, 0)),
            category: BreakCategory::Tea,
        }],
        check_out: None,
        check_out_note: None,
    });
    assert!(SessionStateMachine::restore(clock.clone(), early).is_err());
}

#[test]
fn test_restore_resumes_open_break() {
    let clock = ManualClock::new(at(12, 30, 0));
    let state = SessionState::OnBreak(AttendanceSession {
        check_in: at(9, 0, 0),
        check_in_location: WorkLocation::Home,
        check_in_note: None,
        breaks: vec![BreakInterval {
            start: at(12, 0, 0),
            end: None,
            category: BreakCategory::Lunch,
        }],
        check_out: None,
        check_out_note: None,
    });

    let mut m = SessionStateMachine::restore(clock.clone(), state).unwrap();
    assert_eq!(m.status(), SessionStatus::OnBreak);

    let snap = m.end_break().unwrap();
    assert_eq!(snap.total_break_seconds, 1800);
    assert_eq!(snap.net_working_seconds, 3 * 3600);
}

#[test]
fn test_instances_are_independent() {
    let (_c1, mut a) = machine_at(at(9, 0, 0));
    let (_c2, b) = machine_at(at(9, 0, 0));

    a.check_in(WorkLocation::Office, None).unwrap();

    assert_eq!(a.status(), SessionStatus::CheckedIn);
    assert_eq!(b.status(), SessionStatus::NotCheckedIn);
}

#[test]
fn test_net_time_frozen_on_break_with_sub_second_clock() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance(chrono::Duration::milliseconds(10_500));
    m.start_break(BreakCategory::Tea).unwrap();

    let mut nets = Vec::new();
    for ms in [100, 800, 200, 800, 999, 1] {
        clock.advance(chrono::Duration::milliseconds(ms));
        nets.push(m.snapshot().net_working_seconds);
    }
    assert_eq!(nets, vec![10; 6]);
}

#[test]
fn test_net_time_never_decreases_with_sub_second_clock() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    clock.advance(chrono::Duration::milliseconds(400));
    m.check_in(WorkLocation::Office, None).unwrap();

    let mut last = 0;
    for ms in [700, 300, 650, 350, 999, 1, 500] {
        clock.advance(chrono::Duration::milliseconds(ms));
        let net = m.snapshot().net_working_seconds;
        assert!(net >= last, "net went from {} to {}", last, net);
        last = net;
    }
}

#[test]
fn test_recorded_instants_are_whole_seconds() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    clock.advance(chrono::Duration::milliseconds(1_250));
    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance(chrono::Duration::milliseconds(2_900));
    m.start_break(BreakCategory::Short).unwrap();

    let session = m.session().unwrap();
    assert_eq!(session.check_in, at(9, 0, 1));
    assert_eq!(session.breaks[0].start, at(9, 0, 4));
}

#[test]
fn test_break_resumed_and_restarted_in_the_same_second() {
    let (clock, mut m) = machine_at(at(9, 0, 0));
    m.check_in(WorkLocation::Office, None).unwrap();
    clock.advance_secs(60);
    m.start_break(BreakCategory::Tea).unwrap();
    clock.advance(chrono::Duration::milliseconds(300));
    m.end_break().unwrap();
    clock.advance(chrono::Duration::milliseconds(300));
    m.start_break(BreakCategory::Lunch).unwrap();

    // the zero-length tea break gives way to the lunch break
    let session = m.session().unwrap();
    assert_eq!(session.breaks.len(), 1);
    assert_eq!(session.breaks[0].category, BreakCategory::Lunch);
    assert!(session.breaks[0].is_open());

    let restored = SessionStateMachine::restore(clock.clone(), m.state().clone());
    assert!(restored.is_ok());
}

#[test]
fn test_restore_requires_strictly_increasing_break_starts() {
    let clock = ManualClock::new(at(10, 0, 0));
    let with_breaks = |breaks: Vec<BreakInterval>| {
        SessionState::CheckedIn(AttendanceSession {
            check_in: at(9, 0, 0),
            check_in_location: WorkLocation::Office,
            check_in_note: None,
            breaks,
            check_out: None,
            check_out_note: None,
        })
    };
    let closed = |from: (u32, u32), to: (u32, u32)| BreakInterval {
        start: at(9, from.0, from.1),
        end: Some(at(9, to.0, to.1)),
        category: BreakCategory::Short,
    };

    // two zero-length breaks in the same second
    let same_start = with_breaks(vec![closed((10, 0), (10, 0)), closed((10, 0), (10, 0))]);
    assert!(matches!(
        SessionStateMachine::restore(clock.clone(), same_start),
        Err(SessionError::Inconsistent(_))
    ));

    // back to back: starts right where the previous one ended
    let back_to_back = with_breaks(vec![closed((10, 0), (15, 0)), closed((15, 0), (20, 0))]);
    assert!(SessionStateMachine::restore(clock.clone(), back_to_back).is_ok());
}
