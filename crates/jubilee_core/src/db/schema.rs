//! Idempotent `companies` table setup.
//!
//! # Invariants
//! - Creation is guarded by an existence check in `sqlite_master`.
//! - Existing tables are validated, never altered.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Table holding every anniversary record.
pub const COMPANIES_TABLE: &str = "companies";

/// Columns the core reads from `companies`, in storage order.
pub const COMPANY_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "website",
    "anniversary_date",
    "jubilee",
    "industry",
    "calls",
    "notes",
];

const CREATE_COMPANIES_SQL: &str = "CREATE TABLE companies (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE,
    website TEXT,
    anniversary_date TEXT,
    jubilee TEXT,
    industry TEXT,
    calls TEXT,
    notes TEXT
);";

/// Outcome of [`ensure_schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// The table was absent and has been created.
    Created,
    /// The table already existed with every required column.
    Existing,
}

/// Creates the `companies` table when it does not exist yet.
///
/// An existing table is checked for the required columns and otherwise left
/// alone.
pub fn ensure_schema(conn: &Connection) -> DbResult<SchemaStatus> {
    if table_exists(conn, COMPANIES_TABLE)? {
        for column in COMPANY_COLUMNS {
            if !table_has_column(conn, COMPANIES_TABLE, column)? {
                return Err(DbError::MissingRequiredColumn {
                    table: COMPANIES_TABLE,
                    column,
                });
            }
        }
        return Ok(SchemaStatus::Existing);
    }

    conn.execute_batch(CREATE_COMPANIES_SQL)?;
    info!("event=schema_ensure module=db status=ok table={COMPANIES_TABLE} action=created");
    Ok(SchemaStatus::Created)
}

/// Returns whether a table with the given name exists.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, SchemaStatus};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn second_call_reports_existing_table() {
        let conn = Connection::open_in_memory().expect("open");
        assert_eq!(ensure_schema(&conn).expect("create"), SchemaStatus::Created);
        assert_eq!(ensure_schema(&conn).expect("reuse"), SchemaStatus::Existing);
    }

    #[test]
    fn legacy_table_without_required_column_is_rejected_untouched() {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TABLE companies (id INTEGER PRIMARY KEY, name TEXT UNIQUE);
             INSERT INTO companies (name) VALUES ('kept');",
        )
        .expect("legacy schema");

        let err = ensure_schema(&conn).expect_err("missing columns must be reported");
        assert!(matches!(
            err,
            DbError::MissingRequiredColumn {
                column: "website",
                ..
            }
        ));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM companies;", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }
}
