//! Domain model for the anniversary listing.
//!
//! # Responsibility
//! - Define the `Company` record read from storage.
//! - Define the filter state the UI mutates between query cycles.
//!
//! # Invariants
//! - A company name is unique across storage.
//! - Year and month filters are mutually exclusive by construction.

pub mod company;
pub mod filter;
