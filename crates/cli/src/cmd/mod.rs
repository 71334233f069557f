//! CLI command implementations

pub mod create;
pub mod destroy;
pub mod init;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use policy::RunReport;
use relsnap_core::RunConfig;
use store::SnapshotStore;

/// What a run does to the filesystem tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    /// Write the retention count of every tier on the filesystem
    Init,
    /// Take at most one snapshot per filesystem
    Create,
    /// Prune every tier down to its retention count
    Destroy,
}

/// Everything a single run needs
pub struct Invocation<'a> {
    pub store: &'a dyn SnapshotStore,
    pub config: &'a RunConfig,
    pub filesystem: &'a str,
    /// Count written by `init`
    pub count: i64,
    /// Timestamp given to snapshots made by `create`
    pub now: NaiveDateTime,
}

pub fn execute(operation: Operation, invocation: &Invocation<'_>) -> Result<()> {
    match operation {
        Operation::Init => init::run(invocation),
        Operation::Create => create::run(invocation),
        Operation::Destroy => destroy::run(invocation),
    }
}

/// Turn per-filesystem failures into a run failure
fn check_report(operation: &str, report: &RunReport) -> Result<()> {
    if report.is_success() {
        return Ok(());
    }

    let failed: Vec<&str> = report
        .failures
        .iter()
        .map(|f| f.filesystem.as_str())
        .collect();
    Err(anyhow!(
        "{} failed on {} of {} filesystems: {}",
        operation,
        failed.len(),
        report.filesystems.len(),
        failed.join(", ")
    ))
}
