//! Formatting utilities used for CLI output.

use crate::models::SessionSnapshot;
use crate::utils::colors::{GREEN, GREY, RESET, YELLOW};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn italic(s: &str) -> String {
    format!("\x1b[3m{}\x1b[0m", s)
}

/// `HH:MM:SS`; hours are not wrapped at 24. Negative input is shown as zero,
/// durations coming from the engine never are.
pub fn secs2hms(secs: i64) -> String {
    let s = secs.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// Colour for the status line: green while working, yellow on break.
pub fn color_for_status(snapshot: &SessionSnapshot) -> &'static str {
    use crate::models::SessionStatus::*;
    match snapshot.status {
        CheckedIn => GREEN,
        OnBreak => YELLOW,
        NotCheckedIn | CheckedOut => GREY,
    }
}

/// One-line rendering of a snapshot, used by `status` and `watch`.
pub fn snapshot_line(snapshot: &SessionSnapshot) -> String {
    let color = color_for_status(snapshot);
    format!(
        "{}{:<14}{} elapsed {} | break {} | net {}",
        color,
        snapshot.status.as_str(),
        RESET,
        secs2hms(snapshot.total_elapsed_seconds),
        secs2hms(snapshot.total_break_seconds),
        secs2hms(snapshot.net_working_seconds),
    )
}

/// Multi-line rendering with session details.
pub fn snapshot_details(snapshot: &SessionSnapshot) -> String {
    let mut out = snapshot_line(snapshot);

    if let Some(session) = &snapshot.session {
        out.push_str(&format!(
            "\n  {} {} @ {}",
            italic("in: "),
            session.check_in.format("%Y-%m-%d %H:%M:%S"),
            session.check_in_location
        ));
        if let Some(note) = &session.check_in_note {
            out.push_str(&format!(" — {}", note));
        }

        for (i, b) in session.breaks.iter().enumerate() {
            let end = b
                .end
                .map(|e| e.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "…".into());
            let hint = b
                .category
                .nominal_minutes()
                .map(|m| format!(" (~{}m)", m))
                .unwrap_or_default();
            out.push_str(&format!(
                "\n  {}break #{} {}{} {} → {}{}",
                GREY,
                i + 1,
                b.category,
                hint,
                b.start.format("%H:%M:%S"),
                end,
                RESET
            ));
        }

        if let Some(out_at) = session.check_out {
            out.push_str(&format!(
                "\n  {} {}",
                italic("out:"),
                out_at.format("%Y-%m-%d %H:%M:%S")
            ));
            if let Some(note) = &session.check_out_note {
                out.push_str(&format!(" — {}", note));
            }
        }
    }

    out
}
