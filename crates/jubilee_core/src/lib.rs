//! Core listing logic for the company anniversary tracker.
//! This crate owns filter normalization, jubilee query building and pagination.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::company::{Company, CompanyId, NewCompany};
pub use model::filter::{FilterState, Month, MonthChoice, PrimaryFilter};
pub use repo::company_repo::{
    CompanyFilter, CompanyRepository, RepoError, RepoResult, SqliteCompanyRepository,
};
pub use service::listing_service::{
    current_year, fetch_page, query_page, today_label, total_pages, CompanyPage, ListingSession,
    StorageError, PAGE_SIZE,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
