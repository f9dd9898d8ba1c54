use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create the tables holding sealed sessions and their breaks.
fn create_sessions_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            date             TEXT NOT NULL,
            check_in         TEXT NOT NULL,
            check_out        TEXT NOT NULL,
            position         TEXT NOT NULL DEFAULT 'O' CHECK(position IN ('O','R','H','F')),
            check_in_note    TEXT,
            check_out_note   TEXT,
            elapsed_seconds  INTEGER NOT NULL DEFAULT 0,
            break_seconds    INTEGER NOT NULL DEFAULT 0,
            net_seconds      INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS breaks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            start_time  TEXT NOT NULL,
            end_time    TEXT NOT NULL,
            category    TEXT NOT NULL
                CHECK(category IN ('lunch','tea','short','meeting','other'))
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
        CREATE INDEX IF NOT EXISTS idx_breaks_session ON breaks(session_id);
        "#,
    )?;
    Ok(())
}

/// Single-row table with the in-flight state, so a session survives the
/// process that opened it.
fn create_active_state_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS active_state (
            id          INTEGER PRIMARY KEY CHECK(id = 1),
            state       TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Bring the schema up to date. Idempotent: safe to call on every open.
/// Returns the names of the tables created by this call.
pub fn run_pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut created = Vec::new();

    // 1) Log table first, everything else logs into it
    ensure_log_table(conn)?;

    // 2) Sealed sessions + breaks
    if !table_exists(conn, "sessions")? {
        create_sessions_tables(conn)?;
        created.push("sessions");
        success("Created sessions and breaks tables.");
    }

    // 3) In-flight state
    if !table_exists(conn, "active_state")? {
        create_active_state_table(conn)?;
        created.push("active_state");
    }

    Ok(created)
}
