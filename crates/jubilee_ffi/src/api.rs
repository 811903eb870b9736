//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the listing actions (filters, search, paging) to Dart via FRB.
//! - Hold the one process-wide listing session.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - A failed listing call returns the previously displayed page with
//!   `ok = false` and a human-readable message.

use jubilee_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    today_label as today_label_inner, CompanyPage, ListingSession, MonthChoice, StorageError,
};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Mutex;

const DB_FILE_NAME: &str = "companies.db";
const DB_PATH_ENV: &str = "JUBILEE_DB_PATH";
const EMPTY_CELL: &str = "-";

static SESSION: Mutex<Option<ListingSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Today's date as `DD.MM.YYYY` for the header label.
#[flutter_rust_bridge::frb(sync)]
pub fn today_label() -> String {
    today_label_inner()
}

/// Points the listing at a database file, e.g. the app storage directory on
/// mobile platforms.
///
/// # FFI contract
/// - Replaces the current session; filters return to their defaults.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }

    match SESSION.lock() {
        Ok(mut guard) => {
            *guard = Some(ListingSession::new(trimmed));
            info!("event=ffi_configure module=ffi status=ok");
            String::new()
        }
        Err(_) => "listing session lock poisoned".to_string(),
    }
}

/// One table row as displayed by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// 1-based position across all pages.
    pub row_number: u64,
    pub name: String,
    pub industry: String,
    pub anniversary_date: String,
    pub jubilee: String,
}

/// Render envelope for every listing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingResponse {
    /// Whether the action's query cycle succeeded.
    pub ok: bool,
    /// Rows to display; the previous page's rows when `ok` is false.
    pub rows: Vec<ListingRow>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_matching: u64,
    /// Human-readable message for diagnostics/UI notifications.
    pub message: String,
}

impl ListingResponse {
    fn from_page(page: &CompanyPage, message: String) -> Self {
        Self {
            ok: true,
            rows: to_listing_rows(page),
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_matching: page.total_matching,
            message,
        }
    }

    fn failure(previous: Option<&CompanyPage>, message: String) -> Self {
        match previous {
            Some(page) => Self {
                ok: false,
                message,
                ..Self::from_page(page, String::new())
            },
            None => Self {
                ok: false,
                rows: Vec::new(),
                current_page: 1,
                total_pages: 1,
                total_matching: 0,
                message,
            },
        }
    }
}

/// Loads (or reloads) the current page.
#[flutter_rust_bridge::frb(sync)]
pub fn listing_load() -> ListingResponse {
    with_session("listing_load", ListingSession::load)
}

/// Applies a year filter from the raw text field; non-4-digit input clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn apply_year_filter(year: String) -> ListingResponse {
    with_session("apply_year_filter", |session| {
        session.apply_year_filter(year.as_str())
    })
}

/// Applies a month filter; `0` (or any number outside `1..=12`) means all months.
#[flutter_rust_bridge::frb(sync)]
pub fn apply_month_filter(month: u32) -> ListingResponse {
    with_session("apply_month_filter", |session| {
        session.apply_month_filter(MonthChoice::from_number(month))
    })
}

/// Applies search text; fewer than two characters clears the search.
#[flutter_rust_bridge::frb(sync)]
pub fn apply_search(text: String) -> ListingResponse {
    with_session("apply_search", |session| session.apply_search(text.as_str()))
}

/// Clears all filters and returns to page 1.
#[flutter_rust_bridge::frb(sync)]
pub fn reset_filters() -> ListingResponse {
    with_session("reset_filters", ListingSession::reset_filters)
}

/// Goes back one page; no-op on page 1.
#[flutter_rust_bridge::frb(sync)]
pub fn prev_page() -> ListingResponse {
    with_session("prev_page", ListingSession::prev_page)
}

/// Goes forward one page; no-op on the last page.
#[flutter_rust_bridge::frb(sync)]
pub fn next_page() -> ListingResponse {
    with_session("next_page", ListingSession::next_page)
}

fn with_session(
    action: &'static str,
    f: impl FnOnce(&mut ListingSession) -> Result<&CompanyPage, StorageError>,
) -> ListingResponse {
    let mut guard = match SESSION.lock() {
        Ok(guard) => guard,
        Err(_) => {
            warn!("event=ffi_listing module=ffi status=error action={action} error_code=lock_poisoned");
            return ListingResponse::failure(None, format!("{action} failed: session unavailable"));
        }
    };
    let session = guard.get_or_insert_with(|| ListingSession::new(resolve_db_path()));

    let outcome = f(&mut *session).map(|page| {
        let message = format!("Page {} of {}.", page.current_page, page.total_pages);
        ListingResponse::from_page(page, message)
    });
    match outcome {
        Ok(response) => response,
        Err(err) => {
            warn!("event=ffi_listing module=ffi status=error action={action} error={err}");
            ListingResponse::failure(session.last_page(), format!("{action} failed: {err}"))
        }
    }
}

fn resolve_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    PathBuf::from(DB_FILE_NAME)
}

fn to_listing_rows(page: &CompanyPage) -> Vec<ListingRow> {
    page.numbered()
        .map(|(row_number, company)| ListingRow {
            row_number,
            name: display_or_dash(Some(company.name.as_str())),
            industry: display_or_dash(company.industry.as_deref()),
            anniversary_date: display_or_dash(Some(company.anniversary_date.as_str())),
            jubilee: display_or_dash(company.jubilee.as_deref()),
        })
        .collect()
}

fn display_or_dash(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}
