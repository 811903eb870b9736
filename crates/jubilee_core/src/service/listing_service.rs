//! Anniversary listing use-case service.
//!
//! # Responsibility
//! - Turn a [`FilterState`] plus reference year into one result page.
//! - Own the single listing session: filters, page, last rendered page.
//! - Map every storage failure to one caller-facing [`StorageError`].
//!
//! # Invariants
//! - Page size is fixed at [`PAGE_SIZE`]; `total_pages` is never below 1.
//! - A query cycle opens one connection and drops it before returning.
//! - A failed cycle leaves session state and the last page untouched.
//! - Navigation beyond either end is a no-op and issues no query.

use crate::db::{open_db, DbError};
use crate::model::company::Company;
use crate::model::filter::{FilterState, MonthChoice, PrimaryFilter};
use crate::repo::company_repo::{
    CompanyFilter, CompanyRepository, RepoError, SqliteCompanyRepository,
};
use chrono::Datelike;
use log::{debug, error, info};
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Rows per listing page.
pub const PAGE_SIZE: u32 = 50;

/// The only error a listing caller sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable notification text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StorageError {}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::new(value.to_string())
    }
}

impl From<RepoError> for StorageError {
    fn from(value: RepoError) -> Self {
        Self::new(value.to_string())
    }
}

/// One rendered page of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyPage {
    /// At most [`PAGE_SIZE`] records, sorted by name.
    pub items: Vec<Company>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_matching: u64,
}

impl CompanyPage {
    /// 1-based row number across all pages for the item at `index`.
    pub fn row_number(&self, index: usize) -> u64 {
        page_offset(self.current_page) + index as u64 + 1
    }

    /// Items paired with their global row numbers.
    pub fn numbered(&self) -> impl Iterator<Item = (u64, &Company)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(index, company)| (self.row_number(index), company))
    }
}

/// `ceil(match_count / PAGE_SIZE)`, at least 1.
pub fn total_pages(match_count: u64) -> u32 {
    let pages = match_count.div_ceil(u64::from(PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Row offset of the first record on `page` (1-based; 0 acts as 1).
pub fn page_offset(page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(PAGE_SIZE)
}

/// Current local calendar year.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Today's date in the `DD.MM.YYYY` form used by anniversary dates.
pub fn today_label() -> String {
    chrono::Local::now().format("%d.%m.%Y").to_string()
}

/// Counts and fetches the page selected by `state`.
///
/// The page number is taken as given; callers keep it in `1..=total_pages`.
pub fn fetch_page<R: CompanyRepository>(
    repo: &R,
    state: &FilterState,
    reference_year: i32,
) -> Result<CompanyPage, StorageError> {
    let filter = CompanyFilter::from_state(state, reference_year);
    let total_matching = repo.count_companies(&filter)?;
    let items = repo.list_companies(&filter, PAGE_SIZE, page_offset(state.page()))?;
    Ok(CompanyPage {
        items,
        current_page: state.page(),
        total_pages: total_pages(total_matching),
        total_matching,
    })
}

/// Runs [`fetch_page`] against a SQLite connection.
pub fn query_page(
    conn: &Connection,
    state: &FilterState,
    reference_year: i32,
) -> Result<CompanyPage, StorageError> {
    fetch_page(&SqliteCompanyRepository::new(conn), state, reference_year)
}

/// Listing session driven by UI actions.
///
/// Each action builds a candidate state, runs one query cycle and only then
/// commits the candidate, so the previous page stays valid on failure.
#[derive(Debug)]
pub struct ListingSession {
    db_path: PathBuf,
    reference_year: i32,
    state: FilterState,
    last_page: Option<CompanyPage>,
}

impl ListingSession {
    /// Creates a session whose reference year is the current local year.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self::with_reference_year(db_path, current_year())
    }

    /// Creates a session with a fixed reference year for month filtering.
    pub fn with_reference_year(db_path: impl Into<PathBuf>, reference_year: i32) -> Self {
        Self {
            db_path: db_path.into(),
            reference_year,
            state: FilterState::new(),
            last_page: None,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Filters and page of the last successful cycle.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn current_page(&self) -> u32 {
        self.state.page()
    }

    /// Total pages of the last successful cycle (1 before any cycle).
    pub fn total_pages(&self) -> u32 {
        self.last_page.as_ref().map_or(1, |page| page.total_pages)
    }

    /// Last successfully rendered page.
    pub fn last_page(&self) -> Option<&CompanyPage> {
        self.last_page.as_ref()
    }

    /// Re-runs the query for the current state.
    pub fn load(&mut self) -> Result<&CompanyPage, StorageError> {
        let candidate = self.state.clone();
        self.run_cycle(candidate)
    }

    pub fn apply_year_filter(&mut self, year: &str) -> Result<&CompanyPage, StorageError> {
        let mut candidate = self.state.clone();
        candidate.set_year_filter(year);
        self.run_cycle(candidate)
    }

    pub fn apply_month_filter(
        &mut self,
        choice: MonthChoice,
    ) -> Result<&CompanyPage, StorageError> {
        let mut candidate = self.state.clone();
        candidate.set_month_filter(choice);
        self.run_cycle(candidate)
    }

    pub fn apply_search(&mut self, text: &str) -> Result<&CompanyPage, StorageError> {
        let mut candidate = self.state.clone();
        candidate.set_search(text);
        self.run_cycle(candidate)
    }

    pub fn reset_filters(&mut self) -> Result<&CompanyPage, StorageError> {
        let mut candidate = self.state.clone();
        candidate.reset();
        self.run_cycle(candidate)
    }

    /// Moves one page forward when not already on the last page.
    pub fn next_page(&mut self) -> Result<&CompanyPage, StorageError> {
        let current = self.current_page();
        if self.last_page.is_some() && current < self.total_pages() {
            let candidate = self.state.with_page(current + 1);
            return self.run_cycle(candidate);
        }
        self.current_or_load()
    }

    /// Moves one page back when not already on page 1.
    pub fn prev_page(&mut self) -> Result<&CompanyPage, StorageError> {
        let current = self.current_page();
        if self.last_page.is_some() && current > 1 {
            let candidate = self.state.with_page(current - 1);
            return self.run_cycle(candidate);
        }
        self.current_or_load()
    }

    fn current_or_load(&mut self) -> Result<&CompanyPage, StorageError> {
        if self.last_page.is_none() {
            return self.load();
        }
        debug!(
            "event=listing_nav module=listing status=noop page={} total_pages={}",
            self.current_page(),
            self.total_pages()
        );
        self.last_page
            .as_ref()
            .ok_or_else(|| StorageError::new("no listing page loaded"))
    }

    fn run_cycle(&mut self, candidate: FilterState) -> Result<&CompanyPage, StorageError> {
        let started_at = Instant::now();
        let reference_year = self.reference_year;
        let outcome = open_db(&self.db_path)
            .map_err(StorageError::from)
            .and_then(|conn| query_page(&conn, &candidate, reference_year));

        match outcome {
            Ok(page) => {
                info!(
                    "event=listing_query module=listing status=ok filter={} search_len={} page={} total_pages={} matching={} duration_ms={}",
                    filter_label(candidate.primary()),
                    candidate.search().map_or(0, |text| text.chars().count()),
                    page.current_page,
                    page.total_pages,
                    page.total_matching,
                    started_at.elapsed().as_millis()
                );
                self.state = candidate;
                let page: &CompanyPage = self.last_page.insert(page);
                Ok(page)
            }
            Err(err) => {
                error!(
                    "event=listing_query module=listing status=error filter={} page={} duration_ms={} error={}",
                    filter_label(candidate.primary()),
                    candidate.page(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn filter_label(primary: PrimaryFilter) -> &'static str {
    match primary {
        PrimaryFilter::None => "none",
        PrimaryFilter::Year(_) => "year",
        PrimaryFilter::Month(_) => "month",
    }
}

#[cfg(test)]
mod tests {
    use super::{page_offset, total_pages, CompanyPage, PAGE_SIZE};

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(50), 1);
        assert_eq!(total_pages(51), 2);
        assert_eq!(total_pages(120), 3);
    }

    #[test]
    fn total_pages_matches_ceiling_division() {
        for count in 0..=500_u64 {
            let expected = ((count + u64::from(PAGE_SIZE) - 1) / u64::from(PAGE_SIZE)).max(1);
            assert_eq!(u64::from(total_pages(count)), expected, "count={count}");
        }
    }

    #[test]
    fn offsets_are_page_aligned() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(3), 100);
        assert_eq!(page_offset(0), 0);
    }

    #[test]
    fn row_numbers_continue_across_pages() {
        let page = CompanyPage {
            items: Vec::new(),
            current_page: 2,
            total_pages: 3,
            total_matching: 120,
        };
        assert_eq!(page.row_number(0), 51);
        assert_eq!(page.row_number(49), 100);
    }
}
