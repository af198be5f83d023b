//! Common library for the auction marketplace
//!
//! This crate provides shared infrastructure used by the marketplace
//! service: document-store connectivity and the infrastructure-level
//! error types.

pub mod database;
pub mod error;
