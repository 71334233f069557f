//! Take the snapshots that are due

use super::{check_report, Invocation};
use anyhow::{Context, Result};
use policy::Runner;
use tracing::info;

pub fn run(invocation: &Invocation<'_>) -> Result<()> {
    let runner = Runner::new(invocation.store, invocation.config);
    let report = runner
        .create(invocation.filesystem, invocation.now)
        .with_context(|| format!("create under {} aborted", invocation.filesystem))?;

    info!(
        "create: {} filesystems, {} snapshots created, {} skipped",
        report.filesystems.len(),
        report.created.len(),
        report.skipped.len()
    );

    check_report("create", &report)
}
