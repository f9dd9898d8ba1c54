use crate::errors::AppResult;
use crate::models::TransitionEvent;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    // Timestamp locale, formattato in ISO 8601
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Record a committed transition. The target is the session's check-in date.
pub fn log_transition(conn: &Connection, event: &TransitionEvent) -> AppResult<()> {
    let target = event
        .payload
        .session
        .as_ref()
        .map(|s| s.date().to_string())
        .unwrap_or_default();

    let message = format!(
        "at {} → {} (net {}s, break {}s)",
        event.timestamp.format("%H:%M:%S"),
        event.payload.status,
        event.payload.net_working_seconds,
        event.payload.total_break_seconds,
    );

    ttlog(conn, event.kind.as_str(), &target, &message)
}
