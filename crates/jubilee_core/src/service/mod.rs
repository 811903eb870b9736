//! Core use-case services.
//!
//! # Responsibility
//! - Run listing query cycles on top of the company repository.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod listing_service;
