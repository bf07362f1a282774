//! Storage schema migrations.
//!
//! The applied schema version lives in SQLite's `user_version` header field,
//! so no bookkeeping table is needed. Each step runs in its own transaction.

use super::Error;
use tokio_rusqlite::Connection;

/// Ordered schema steps. Step `n` (1-based) moves the schema to version `n`.
const STEPS: &[&str] = &[include_str!("../../migrations/001_kv_store.sql")];

/// Latest schema version this build knows about.
pub const SCHEMA_VERSION: i64 = STEPS.len() as i64;

/// Bring the schema up to [`SCHEMA_VERSION`].
///
/// A database written by a newer build is rejected instead of being
/// silently downgraded.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if current > SCHEMA_VERSION {
            return Err(Error::MigrationFailed(format!(
                "schema version {current} is newer than supported version {SCHEMA_VERSION}"
            )));
        }

        for (version, sql) in (1..).zip(STEPS.iter()).skip(current.max(0) as usize) {
            tracing::debug!(version, "applying schema step");
            let tx = conn.transaction()?;
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
            tx.commit()?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
