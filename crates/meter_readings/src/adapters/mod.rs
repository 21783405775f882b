// Rust guideline compliant 2026-10-18

//! Adapters (secondary ports) for the meter-readings binary.
//!
//! Each sub-module implements one or more hexagonal port traits defined in the
//! `domain` crate.

pub mod in_memory_store;
pub mod log_faults;
pub mod sqlite_store;
