//! Flutter bridge for the anniversary listing core.

pub mod api;
