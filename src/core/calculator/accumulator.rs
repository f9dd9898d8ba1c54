//! Pure duration math over a session: elapsed, break and net working time.

use crate::errors::{AnomalyKind, ClockAnomaly};
use crate::models::{AttendanceSession, SessionStatus, Timestamp};
use chrono::SubsecRound;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulation {
    pub total_elapsed_seconds: i64,
    pub total_break_seconds: i64,
    pub net_working_seconds: i64,
    pub anomalies: Vec<ClockAnomaly>,
}

impl Accumulation {
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }

    pub fn log_anomalies(&self) {
        for a in &self.anomalies {
            tracing::warn!(kind = ?a.kind, seconds = a.seconds, "{}", a);
        }
    }
}

/// Seconds from `from` to `to`, clamped at zero. A negative delta is
/// recorded as an anomaly of the given kind.
///
/// Both ends are cut to whole seconds before subtracting, so intervals that
/// share an endpoint (e.g. `now`) always lose the same fraction and their
/// differences stay exact.
fn clamped_seconds(
    from: Timestamp,
    to: Timestamp,
    kind: AnomalyKind,
    anomalies: &mut Vec<ClockAnomaly>,
) -> i64 {
    let secs = (to.trunc_subsecs(0) - from.trunc_subsecs(0)).num_seconds();
    if secs < 0 {
        anomalies.push(ClockAnomaly {
            kind,
            seconds: -secs,
        });
        0
    } else {
        secs
    }
}

/// Compute the duration figures of `session` as seen at `now`.
///
/// - elapsed = (check-out or now) - check-in
/// - break   = closed breaks + the open break (only while `OnBreak`)
/// - net     = elapsed - break
///
/// Every figure is clamped at zero; each clamp is reported in `anomalies`.
/// Runs in time linear in the number of breaks.
pub fn accumulate(
    session: &AttendanceSession,
    status: SessionStatus,
    now: Timestamp,
) -> Accumulation {
    let mut anomalies = Vec::new();

    let total_elapsed_seconds = match session.check_out {
        Some(out) => clamped_seconds(
            session.check_in,
            out,
            AnomalyKind::CheckOutBeforeCheckIn,
            &mut anomalies,
        ),
        None => clamped_seconds(
            session.check_in,
            now,
            AnomalyKind::NowBeforeCheckIn,
            &mut anomalies,
        ),
    };

    let closed_break_seconds: i64 = session
        .closed_breaks()
        .filter_map(|b| b.end.map(|end| (b.start, end)))
        .map(|(start, end)| {
            clamped_seconds(start, end, AnomalyKind::BreakEndsBeforeStart, &mut anomalies)
        })
        .sum();

    let open_break_seconds = match (status, session.open_break()) {
        (SessionStatus::OnBreak, Some(open)) => clamped_seconds(
            open.start,
            now,
            AnomalyKind::NowBeforeBreakStart,
            &mut anomalies,
        ),
        _ => 0,
    };

    let total_break_seconds = closed_break_seconds + open_break_seconds;

    let net = total_elapsed_seconds - total_break_seconds;
    let net_working_seconds = if net < 0 {
        anomalies.push(ClockAnomaly {
            kind: AnomalyKind::BreakExceedsElapsed,
            seconds: -net,
        });
        0
    } else {
        net
    };

    Accumulation {
        total_elapsed_seconds,
        total_break_seconds,
        net_working_seconds,
        anomalies,
    }
}
