//! Prune snapshots beyond each tier's retention count

use super::{check_report, Invocation};
use anyhow::{Context, Result};
use policy::Runner;
use tracing::info;

pub fn run(invocation: &Invocation<'_>) -> Result<()> {
    let runner = Runner::new(invocation.store, invocation.config);
    let report = runner
        .destroy(invocation.filesystem)
        .with_context(|| format!("destroy under {} aborted", invocation.filesystem))?;

    info!(
        "destroy: {} filesystems, {} snapshots destroyed, {} skipped",
        report.filesystems.len(),
        report.destroyed.len(),
        report.skipped.len()
    );

    check_report("destroy", &report)
}
