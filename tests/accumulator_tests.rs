use rattendance::core::accumulate;
use rattendance::errors::AnomalyKind;
use rattendance::models::{
    AttendanceSession, BreakCategory, BreakInterval, SessionStatus, WorkLocation,
};

mod common;
use common::at;

fn session_from(h: u32, m: u32) -> AttendanceSession {
    AttendanceSession {
        check_in: at(h, m, 0),
        check_in_location: WorkLocation::Office,
        check_in_note: None,
        breaks: Vec::new(),
        check_out: None,
        check_out_note: None,
    }
}

fn closed(start: (u32, u32), end: (u32, u32), category: BreakCategory) -> BreakInterval {
    BreakInterval {
        start: at(start.0, start.1, 0),
        end: Some(at(end.0, end.1, 0)),
        category,
    }
}

#[test]
fn test_checked_in_without_breaks() {
    let s = session_from(9, 0);
    let acc = accumulate(&s, SessionStatus::CheckedIn, at(10, 15, 30));

    assert_eq!(acc.total_elapsed_seconds, 4530);
    assert_eq!(acc.total_break_seconds, 0);
    assert_eq!(acc.net_working_seconds, 4530);
    assert!(!acc.has_anomalies());
}

#[test]
fn test_closed_breaks_are_subtracted() {
    let mut s = session_from(9, 0);
    s.breaks.push(closed((10, 30), (10, 45), BreakCategory::Tea));
    s.breaks.push(closed((12, 0), (12, 30), BreakCategory::Lunch));

    let acc = accumulate(&s, SessionStatus::CheckedIn, at(14, 30, 0));

    assert_eq!(acc.total_elapsed_seconds, 5 * 3600 + 1800);
    assert_eq!(acc.total_break_seconds, 2700);
    assert_eq!(acc.net_working_seconds, 5 * 3600 + 1800 - 2700);
}

#[test]
fn test_open_break_counts_up_to_now_while_on_break() {
    let mut s = session_from(9, 0);
    s.breaks.push(BreakInterval {
        start: at(12, 0, 0),
        end: None,
        category: BreakCategory::Lunch,
    });

    let acc = accumulate(&s, SessionStatus::OnBreak, at(12, 20, 0));

    assert_eq!(acc.total_elapsed_seconds, 3 * 3600 + 1200);
    assert_eq!(acc.total_break_seconds, 1200);
    assert_eq!(acc.net_working_seconds, 3 * 3600);
}

#[test]
fn test_check_out_bounds_elapsed_time() {
    let mut s = session_from(9, 0);
    s.breaks.push(closed((12, 0), (13, 0), BreakCategory::Lunch));
    s.check_out = Some(at(17, 0, 0));

    // `now` far after check-out must not matter
    let acc = accumulate(&s, SessionStatus::CheckedOut, at(23, 59, 0));

    assert_eq!(acc.total_elapsed_seconds, 8 * 3600);
    assert_eq!(acc.total_break_seconds, 3600);
    assert_eq!(acc.net_working_seconds, 7 * 3600);
}

#[test]
fn test_now_before_check_in_is_clamped() {
    let s = session_from(9, 0);
    let acc = accumulate(&s, SessionStatus::CheckedIn, at(8, 59, 0));

    assert_eq!(acc.total_elapsed_seconds, 0);
    assert_eq!(acc.net_working_seconds, 0);
    assert_eq!(acc.anomalies.len(), 1);
    assert_eq!(acc.anomalies[0].kind, AnomalyKind::NowBeforeCheckIn);
    assert_eq!(acc.anomalies[0].seconds, 60);
}

#[test]
fn test_break_longer_than_session_is_clamped() {
    let mut s = session_from(9, 0);
    s.breaks.push(closed((9, 0), (9, 30), BreakCategory::Meeting));
    s.check_out = Some(at(9, 10, 0));

    let acc = accumulate(&s, SessionStatus::CheckedOut, at(9, 10, 0));

    assert_eq!(acc.total_elapsed_seconds, 600);
    assert_eq!(acc.total_break_seconds, 1800);
    assert_eq!(acc.net_working_seconds, 0);
    assert!(
        acc.anomalies
            .iter()
            .any(|a| a.kind == AnomalyKind::BreakExceedsElapsed && a.seconds == 1200)
    );
}

#[test]
fn test_inverted_break_contributes_nothing() {
    let mut s = session_from(9, 0);
    s.breaks.push(closed((11, 0), (10, 50), BreakCategory::Short));

    let acc = accumulate(&s, SessionStatus::CheckedIn, at(12, 0, 0));

    assert_eq!(acc.total_break_seconds, 0);
    assert_eq!(acc.net_working_seconds, 3 * 3600);
    assert_eq!(acc.anomalies[0].kind, AnomalyKind::BreakEndsBeforeStart);
}

#[test]
fn test_figures_never_negative() {
    let mut s = session_from(9, 0);
    s.breaks.push(BreakInterval {
        start: at(10, 0, 0),
        end: None,
        category: BreakCategory::Other,
    });

    for now in [at(0, 0, 0), at(9, 30, 0), at(10, 0, 0), at(18, 0, 0)] {
        let acc = accumulate(&s, SessionStatus::OnBreak, now);
        assert!(acc.total_elapsed_seconds >= 0);
        assert!(acc.total_break_seconds >= 0);
        assert!(acc.net_working_seconds >= 0);
    }
}

#[test]
fn test_sub_second_instants_keep_net_constant_on_break() {
    let ms = |t: rattendance::models::Timestamp, n: i64| t + chrono::Duration::milliseconds(n);

    let mut s = session_from(9, 0);
    s.check_in = ms(at(9, 0, 0), 700);
    s.breaks.push(BreakInterval {
        start: ms(at(9, 0, 10), 300),
        end: None,
        category: BreakCategory::Tea,
    });

    let nets: Vec<i64> = [100, 400, 650, 999, 1_200, 2_050]
        .into_iter()
        .map(|n| accumulate(&s, SessionStatus::OnBreak, ms(at(9, 0, 11), n)).net_working_seconds)
        .collect();

    assert_eq!(nets, vec![10; 6]);
}
