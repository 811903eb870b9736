//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `jubilee_core` linkage.
//! - Print the first listing page of `JUBILEE_DB_PATH` (or `companies.db`).

use jubilee_core::ListingSession;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("jubilee_core ping={}", jubilee_core::ping());
    println!("jubilee_core version={}", jubilee_core::core_version());

    let db_path = std::env::var("JUBILEE_DB_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "companies.db".to_string());
    let mut session = ListingSession::new(db_path.trim());

    match session.load() {
        Ok(page) => {
            println!(
                "page {} of {} ({} matching)",
                page.current_page, page.total_pages, page.total_matching
            );
            for (number, company) in page.numbered() {
                println!("{number:>4}  {}  {}", company.anniversary_date, company.name);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("listing failed: {err}");
            ExitCode::FAILURE
        }
    }
}
