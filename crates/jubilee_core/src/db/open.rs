//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Register SQL functions the company queries depend on.
//! - Ensure the `companies` table before returning a usable connection.
//!
//! # Invariants
//! - Returned connections can evaluate `unicode_lower(text)`.
//! - Returned connections have the `companies` table in place.

use super::schema::ensure_schema;
use super::DbResult;
use log::{error, info};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Name of the Unicode-aware lower-casing SQL function.
///
/// SQLite's built-in `lower()` only folds ASCII, which breaks search over
/// Cyrillic company names.
pub const UNICODE_LOWER_FN: &str = "unicode_lower";

/// Opens a SQLite database file and ensures the companies schema.
///
/// # Side effects
/// - Creates the database file and `companies` table when absent.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and ensures the companies schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    register_functions(conn)?;
    ensure_schema(conn)?;
    Ok(())
}

fn register_functions(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        UNICODE_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let folded = match ctx.get_raw(0) {
                ValueRef::Null => None,
                ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
                ValueRef::Integer(value) => Some(value.to_string()),
                ValueRef::Real(value) => Some(value.to_string()),
                ValueRef::Blob(_) => None,
            };
            Ok(folded)
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::open_db_in_memory;

    #[test]
    fn unicode_lower_folds_cyrillic_and_passes_null() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let (folded, null): (String, Option<String>) = conn
            .query_row(
                "SELECT unicode_lower('ООО Ромашка'), unicode_lower(NULL);",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("unicode_lower should evaluate");
        assert_eq!(folded, "ооо ромашка");
        assert_eq!(null, None);
    }
}
