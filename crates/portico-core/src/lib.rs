//! Portico Core — domain models, error taxonomy, and repository
//! trait definitions shared across all crates.
//!
//! This crate has no I/O: database and provider implementations live
//! in `portico-db` and `portico-comms` respectively.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{PorticoError, PorticoResult};
