use crate::db::log::ttlog;
use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation to the migration engine and records the
/// tables it had to create.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    let created = run_pending_migrations(conn)?;

    if !created.is_empty() {
        ttlog(
            conn,
            "migration_applied",
            &created.join(","),
            "Schema tables created",
        )?;
    }
    Ok(())
}
