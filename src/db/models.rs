//! Database row models for stored sessions.
//! These are thin wrappers around SQLite rows.

use crate::models::SealedSession;

/// A sealed session as read back from the `sessions` table, with the totals
/// computed when it was written.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub id: i64,
    pub sealed: SealedSession,
    pub elapsed_seconds: i64,
    pub break_seconds: i64,
    pub net_seconds: i64,
}
