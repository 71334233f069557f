//! Core types for relsnap
//!
//! This crate provides:
//! - The interval table (tiers coarsest to finest, plus tolerance)
//! - Snapshot name parsing and formatting
//! - Per-filesystem snapshot inventories
//! - Run configuration (property prefix, tier table)
//! - The error taxonomy shared by the store and policy crates

pub mod config;
pub mod error;
pub mod inventory;
pub mod snapshot;
pub mod tier;

// Re-exports
pub use config::{Properties, RunConfig, DEFAULT_COUNT, DEFAULT_PREFIX};
pub use error::Error;
pub use inventory::Inventory;
pub use snapshot::{Snapshot, SnapshotEntry, STAMP_FORMAT};
pub use tier::{IntervalTable, Tier};

/// Result type for relsnap operations
pub type Result<T> = std::result::Result<T, Error>;
