//! Snapshot scheduling policy
//!
//! This crate provides:
//! - The create cascade (which tier, if any, is due for a new snapshot)
//! - Per-tier retention (which snapshots exceed a tier's count)
//! - The run driver that walks a filesystem tree against a store

pub mod cascade;
pub mod retention;
pub mod runner;

// Re-exports
pub use cascade::{plan_create, tier_is_due};
pub use retention::excess;
pub use runner::{FilesystemFailure, RunReport, Runner};
