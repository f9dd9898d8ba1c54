use crate::core::calculator::accumulator::accumulate;
use crate::db::models::StoredSession;
use crate::errors::{AppError, AppResult, SessionError};
use crate::models::{
    AttendanceSession, BreakCategory, BreakInterval, SealedSession, SessionState, SessionStatus,
    Timestamp, WorkLocation,
};
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn fmt_ts(ts: &Timestamp) -> String {
    ts.to_rfc3339()
}

fn parse_ts(idx: usize, raw: &str) -> Result<Timestamp> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ---------------------------
// In-flight state
// ---------------------------

/// Store the current state, replacing whatever was there.
pub fn save_active_state(conn: &Connection, state: &SessionState) -> AppResult<()> {
    let json = serde_json::to_string(state)?;

    conn.execute(
        "INSERT INTO active_state (id, state, updated_at)
         VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at",
        params![json, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Load the saved state, `None` if nothing was ever saved.
pub fn load_active_state(conn: &Connection) -> AppResult<Option<SessionState>> {
    let raw: Option<String> = conn
        .query_row("SELECT state FROM active_state WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    match raw {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

// ---------------------------
// Sealed sessions
// ---------------------------

/// Write a sealed session and its breaks. Call inside a transaction when it
/// has to land together with the state update.
pub fn insert_sealed_session(conn: &Connection, sealed: &SealedSession) -> AppResult<i64> {
    let acc = accumulate(
        sealed.session(),
        SessionStatus::CheckedOut,
        sealed.check_out(),
    );

    conn.execute(
        "INSERT INTO sessions (date, check_in, check_out, position, check_in_note, check_out_note,
                               elapsed_seconds, break_seconds, net_seconds, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            sealed.date().format("%Y-%m-%d").to_string(),
            fmt_ts(&sealed.check_in),
            fmt_ts(&sealed.check_out()),
            sealed.check_in_location.to_db_str(),
            sealed.check_in_note,
            sealed.check_out_note,
            acc.total_elapsed_seconds,
            acc.total_break_seconds,
            acc.net_working_seconds,
            Local::now().to_rfc3339(),
        ],
    )?;
    let session_id = conn.last_insert_rowid();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO breaks (session_id, start_time, end_time, category)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (b, end) in sealed
        .closed_breaks()
        .filter_map(|b| b.end.map(|end| (b, end)))
    {
        stmt.execute(params![
            session_id,
            fmt_ts(&b.start),
            fmt_ts(&end),
            b.category.as_str()
        ])?;
    }

    Ok(session_id)
}

fn load_breaks(conn: &Connection, session_id: i64) -> Result<Vec<BreakInterval>> {
    let mut stmt = conn.prepare_cached(
        "SELECT start_time, end_time, category FROM breaks
         WHERE session_id = ?1
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([session_id], |row| {
        let start: String = row.get(0)?;
        let end: String = row.get(1)?;
        let category: String = row.get(2)?;

        let category = BreakCategory::parse(&category).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                Box::new(AppError::InvalidBreakKind(category.clone())),
            )
        })?;

        Ok(BreakInterval {
            start: parse_ts(0, &start)?,
            end: Some(parse_ts(1, &end)?),
            category,
        })
    })?;

    rows.collect()
}

struct SessionRow {
    id: i64,
    session: AttendanceSession,
    elapsed_seconds: i64,
    break_seconds: i64,
    net_seconds: i64,
}

fn map_session_row(row: &Row) -> Result<SessionRow> {
    let check_in: String = row.get("check_in")?;
    let check_out: String = row.get("check_out")?;
    let pos: String = row.get("position")?;

    let location = WorkLocation::from_db_str(&pos).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            Box::new(AppError::InvalidPosition(format!("Invalid location: {}", pos))),
        )
    })?;

    Ok(SessionRow {
        id: row.get("id")?,
        session: AttendanceSession {
            check_in: parse_ts(0, &check_in)?,
            check_in_location: location,
            check_in_note: row.get("check_in_note")?,
            breaks: Vec::new(),
            check_out: Some(parse_ts(0, &check_out)?),
            check_out_note: row.get("check_out_note")?,
        },
        elapsed_seconds: row.get("elapsed_seconds")?,
        break_seconds: row.get("break_seconds")?,
        net_seconds: row.get("net_seconds")?,
    })
}

fn query_sessions(
    conn: &Connection,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> AppResult<Vec<StoredSession>> {
    let rows: Vec<SessionRow> = {
        let mut stmt = conn.prepare(sql)?;
        stmt.query_map(args, map_session_row)?
            .collect::<Result<_>>()?
    };

    let mut out = Vec::with_capacity(rows.len());
    for mut r in rows {
        r.session.breaks = load_breaks(conn, r.id)?;
        let sealed = SealedSession::seal(r.session)
            .map_err(|e| SessionError::Inconsistent(format!("stored session #{}: {}", r.id, e)))?;

        out.push(StoredSession {
            id: r.id,
            sealed,
            elapsed_seconds: r.elapsed_seconds,
            break_seconds: r.break_seconds,
            net_seconds: r.net_seconds,
        });
    }
    Ok(out)
}

pub fn load_sessions_by_date(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<StoredSession>> {
    let date_str = date.format("%Y-%m-%d").to_string();
    query_sessions(
        conn,
        "SELECT * FROM sessions WHERE date = ?1 ORDER BY check_in ASC, id ASC",
        &[&date_str],
    )
}

pub fn load_sessions_between(
    conn: &Connection,
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<StoredSession>> {
    let from_str = from.format("%Y-%m-%d").to_string();
    let to_str = to.format("%Y-%m-%d").to_string();
    query_sessions(
        conn,
        "SELECT * FROM sessions WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC, check_in ASC, id ASC",
        &[&from_str, &to_str],
    )
}

pub fn load_all_sessions(conn: &Connection) -> AppResult<Vec<StoredSession>> {
    query_sessions(
        conn,
        "SELECT * FROM sessions ORDER BY date ASC, check_in ASC, id ASC",
        &[],
    )
}

pub fn count_sessions(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?)
}
