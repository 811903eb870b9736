//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for company records.
//! - Keep every SQL statement inside the persistence boundary.
//!
//! # Invariants
//! - Listing queries always exclude rows without an anniversary date.
//! - Repository APIs return semantic errors (`DuplicateName`) in addition to
//!   DB transport errors.

pub mod company_repo;
