use jubilee_core::db::schema::{ensure_schema, table_exists, SchemaStatus, COMPANY_COLUMNS};
use jubilee_core::db::{open_db, open_db_in_memory, DbError};
use jubilee_core::{CompanyRepository, NewCompany, RepoError, SqliteCompanyRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_companies_table() {
    let conn = open_db_in_memory().unwrap();

    assert!(table_exists(&conn, "companies").unwrap());
    let columns = column_names(&conn);
    assert_eq!(columns, COMPANY_COLUMNS.map(str::to_string).to_vec());
}

#[test]
fn reopening_file_database_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("companies.db");

    let conn = open_db(&path).unwrap();
    SqliteCompanyRepository::new(&conn)
        .insert_company(&NewCompany::new("Acme", "01.01.2015"))
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(ensure_schema(&conn).unwrap(), SchemaStatus::Existing);
    let kept = SqliteCompanyRepository::new(&conn)
        .get_company_by_name("Acme")
        .unwrap()
        .expect("row must survive reopen");
    assert_eq!(kept.anniversary_date, "01.01.2015");
}

#[test]
fn opening_legacy_table_missing_columns_fails_without_altering_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE companies (id INTEGER PRIMARY KEY, name TEXT UNIQUE, anniversary_date TEXT);",
    )
    .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::MissingRequiredColumn { .. }), "{err}");

    let conn = Connection::open(&path).unwrap();
    assert_eq!(column_names(&conn).len(), 3);
}

#[test]
fn duplicate_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::new(&conn);
    repo.insert_company(&NewCompany::new("Acme", "01.01.2015"))
        .unwrap();

    let err = repo
        .insert_company(&NewCompany::new("Acme", "02.02.2020"))
        .unwrap_err();
    match err {
        RepoError::DuplicateName(name) => assert_eq!(name, "Acme"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn inserted_optional_fields_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::new(&conn);
    let id = repo
        .insert_company(
            &NewCompany::new("Acme", "01.01.2015")
                .with_industry("Retail")
                .with_jubilee("10 лет")
                .with_website("https://acme.example"),
        )
        .unwrap();

    let loaded = repo.get_company_by_name("Acme").unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.industry.as_deref(), Some("Retail"));
    assert_eq!(loaded.jubilee.as_deref(), Some("10 лет"));
    assert_eq!(loaded.website.as_deref(), Some("https://acme.example"));
    assert_eq!(loaded.calls, None);
    assert!(loaded.has_anniversary());
    assert_eq!(loaded.anniversary_year(), Some(2015));
    assert_eq!(loaded.anniversary_month(), Some(1));
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(companies);").unwrap();
    let rows = stmt.query_map([], |row| row.get::<_, String>(1)).unwrap();
    rows.map(Result::unwrap).collect()
}
