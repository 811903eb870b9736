//! Company repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate a [`CompanyFilter`] into one WHERE clause shared by the count
//!   and page statements.
//! - Provide out-of-band inserts used by import tooling and fixtures.
//!
//! # Invariants
//! - The base predicate `anniversary_date` not empty and not `'0'` is always
//!   applied.
//! - At most one jubilee predicate is emitted (year XOR month).
//! - Search matches `name` or `industry` through `unicode_lower` + `instr`,
//!   so LIKE wildcards in user text stay literal.
//! - Results are ordered by `name ASC`.

use crate::db::{DbError, UNICODE_LOWER_FN};
use crate::model::company::{Company, CompanyId, NewCompany, JUBILEE_PERIOD_YEARS};
use crate::model::filter::{FilterState, PrimaryFilter};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const COMPANY_SELECT_SQL: &str = "SELECT
    id,
    name,
    website,
    anniversary_date,
    jubilee,
    industry,
    calls,
    notes
FROM companies";

const DATED_SQL: &str = "anniversary_date != '0' AND anniversary_date != ''";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for company persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Another record already uses this name.
    DuplicateName(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => write!(f, "company name already exists: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted company data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateName(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Predicate inputs for count/list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    pub primary: PrimaryFilter,
    /// Already lower-cased search text.
    pub search: Option<String>,
    /// Year a month filter computes jubilees against.
    pub reference_year: i32,
}

impl CompanyFilter {
    pub fn from_state(state: &FilterState, reference_year: i32) -> Self {
        Self {
            primary: state.primary(),
            search: state.search().map(str::to_string),
            reference_year,
        }
    }
}

/// Repository interface for company listing operations.
pub trait CompanyRepository {
    /// Inserts one record and returns its row id.
    fn insert_company(&self, company: &NewCompany) -> RepoResult<CompanyId>;
    /// Gets one record by its unique name, dated or not.
    fn get_company_by_name(&self, name: &str) -> RepoResult<Option<Company>>;
    /// Counts records matching the filter.
    fn count_companies(&self, filter: &CompanyFilter) -> RepoResult<u64>;
    /// Lists matching records sorted by name.
    fn list_companies(
        &self,
        filter: &CompanyFilter,
        limit: u32,
        offset: u64,
    ) -> RepoResult<Vec<Company>>;
}

/// SQLite-backed company repository.
///
/// Expects a connection from [`crate::db::open_db`], which registers the
/// search function and ensures the table.
pub struct SqliteCompanyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompanyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CompanyRepository for SqliteCompanyRepository<'_> {
    fn insert_company(&self, company: &NewCompany) -> RepoResult<CompanyId> {
        let result = self.conn.execute(
            "INSERT INTO companies (
                name,
                website,
                anniversary_date,
                jubilee,
                industry,
                calls,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                company.name.as_str(),
                company.website.as_deref(),
                company.anniversary_date.as_str(),
                company.jubilee.as_deref(),
                company.industry.as_deref(),
                company.calls.as_deref(),
                company.notes.as_deref(),
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(inner, _))
                if inner.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::DuplicateName(company.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_company_by_name(&self, name: &str) -> RepoResult<Option<Company>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPANY_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_company_row(row)?));
        }
        Ok(None)
    }

    fn count_companies(&self, filter: &CompanyFilter) -> RepoResult<u64> {
        let (where_sql, bind_values) = build_where_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM companies WHERE {where_sql};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }

    fn list_companies(
        &self,
        filter: &CompanyFilter,
        limit: u32,
        offset: u64,
    ) -> RepoResult<Vec<Company>> {
        let (where_sql, mut bind_values) = build_where_clause(filter);
        let sql = format!(
            "{COMPANY_SELECT_SQL}
             WHERE {where_sql}
             ORDER BY name ASC, id ASC
             LIMIT ? OFFSET ?;"
        );
        bind_values.push(Value::Integer(i64::from(limit)));
        bind_values.push(Value::Integer(i64::try_from(offset).map_err(|_| {
            RepoError::InvalidData(format!("offset `{offset}` exceeds SQLite range"))
        })?));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }
        Ok(companies)
    }
}

/// Builds the WHERE clause (without the keyword) and its positional binds.
///
/// The year slice is the last four characters of `DD.MM.YYYY`, the month
/// slice characters 4..5.
pub fn build_where_clause(filter: &CompanyFilter) -> (String, Vec<Value>) {
    let jubilee_sql = format!(
        "(? - CAST(SUBSTR(anniversary_date, -4, 4) AS INTEGER)) % {JUBILEE_PERIOD_YEARS} = 0"
    );
    let mut conditions = vec![DATED_SQL.to_string()];
    let mut bind_values: Vec<Value> = Vec::new();

    match filter.primary {
        PrimaryFilter::None => {}
        PrimaryFilter::Year(year) => {
            conditions.push(jubilee_sql);
            bind_values.push(Value::Integer(i64::from(year)));
        }
        PrimaryFilter::Month(month) => {
            conditions.push("SUBSTR(anniversary_date, 4, 2) = ?".to_string());
            bind_values.push(Value::Text(month.two_digit()));
            conditions.push(jubilee_sql);
            bind_values.push(Value::Integer(i64::from(filter.reference_year)));
        }
    }

    if let Some(search) = filter.search.as_ref() {
        conditions.push(format!(
            "(INSTR({UNICODE_LOWER_FN}(name), ?) > 0 OR INSTR({UNICODE_LOWER_FN}(industry), ?) > 0)"
        ));
        bind_values.push(Value::Text(search.clone()));
        bind_values.push(Value::Text(search.clone()));
    }

    (conditions.join(" AND "), bind_values)
}

fn parse_company_row(row: &Row<'_>) -> RepoResult<Company> {
    Ok(Company {
        id: row.get("id")?,
        name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
        website: row.get("website")?,
        anniversary_date: row
            .get::<_, Option<String>>("anniversary_date")?
            .unwrap_or_default(),
        jubilee: row.get("jubilee")?,
        industry: row.get("industry")?,
        calls: row.get("calls")?,
        notes: row.get("notes")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{build_where_clause, CompanyFilter};
    use crate::model::filter::{Month, PrimaryFilter};
    use rusqlite::types::Value;

    #[test]
    fn unfiltered_clause_is_base_predicate_only() {
        let (sql, binds) = build_where_clause(&CompanyFilter::default());
        assert_eq!(sql, "anniversary_date != '0' AND anniversary_date != ''");
        assert!(binds.is_empty());
    }

    #[test]
    fn month_filter_binds_padded_month_then_reference_year() {
        let filter = CompanyFilter {
            primary: PrimaryFilter::Month(Month::new(1).expect("month")),
            search: Some("acme".to_string()),
            reference_year: 2025,
        };
        let (sql, binds) = build_where_clause(&filter);
        assert_eq!(sql.matches('?').count(), binds.len());
        assert_eq!(
            binds,
            vec![
                Value::Text("01".to_string()),
                Value::Integer(2025),
                Value::Text("acme".to_string()),
                Value::Text("acme".to_string()),
            ]
        );
    }

    #[test]
    fn year_filter_ignores_reference_year() {
        let filter = CompanyFilter {
            primary: PrimaryFilter::Year(2030),
            search: None,
            reference_year: 2025,
        };
        let (_, binds) = build_where_clause(&filter);
        assert_eq!(binds, vec![Value::Integer(2030)]);
    }
}
