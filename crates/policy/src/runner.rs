//! Run driver
//!
//! Walks a filesystem tree against a [`SnapshotStore`] and applies the create
//! or destroy policy to each filesystem in listing order. Each filesystem is
//! independent: a store failure ends that filesystem's work and is recorded,
//! then the walk moves on. A configuration error, or a failure to list the
//! tree itself, ends the whole run.

use crate::cascade::plan_create;
use crate::retention::excess;
use chrono::NaiveDateTime;
use relsnap_core::{Error, Inventory, Result, RunConfig};
use store::SnapshotStore;
use tracing::{debug, error, info, warn};

/// A filesystem whose processing stopped on a store error
#[derive(Debug)]
pub struct FilesystemFailure {
    pub filesystem: String,
    pub error: Error,
}

/// Outcome of a create or destroy run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Filesystems visited, listing order
    pub filesystems: Vec<String>,
    /// Snapshots created
    pub created: Vec<String>,
    /// Snapshots destroyed
    pub destroyed: Vec<String>,
    /// Tagged snapshots skipped because their names did not parse
    pub skipped: Vec<String>,
    pub failures: Vec<FilesystemFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies the schedule to a store
pub struct Runner<'a, S: SnapshotStore + ?Sized> {
    store: &'a S,
    config: &'a RunConfig,
}

impl<'a, S: SnapshotStore + ?Sized> Runner<'a, S> {
    pub fn new(store: &'a S, config: &'a RunConfig) -> Self {
        Self { store, config }
    }

    /// Write `count` as the retention count of every tier on `filesystem`
    ///
    /// Only `filesystem` itself is touched; descendants are left alone and
    /// see the value through ZFS property inheritance unless they override it.
    /// Returns the properties written.
    pub fn init(&self, filesystem: &str, count: i64) -> Result<Vec<String>> {
        info!("initializing snapcnt properties on {}", filesystem);

        let mut written = Vec::with_capacity(self.config.table.len());
        for tier in &self.config.table {
            let property = self.config.properties.snapcnt(tier.name());
            info!("{}={} on {}", property, count, filesystem);
            self.store
                .set_retention_count(filesystem, tier.name(), count)?;
            written.push(property);
        }

        Ok(written)
    }

    /// Create at most one snapshot per filesystem under `root`, stamped `now`
    pub fn create(&self, root: &str, now: NaiveDateTime) -> Result<RunReport> {
        self.for_each_filesystem("create", root, |filesystem, inventory, report| {
            let table = &self.config.table;
            let due = plan_create(table, inventory, now, |tier| {
                self.store.get_retention_count(filesystem, tier.name())
            })?;

            match due {
                Some(tier) => {
                    let name = self.store.create_snapshot(filesystem, tier.name(), now)?;
                    info!("created {} ({})", name, tier.name());
                    report.created.push(name);
                }
                None => debug!("  nothing due"),
            }
            Ok(())
        })
    }

    /// Destroy, per tier, every snapshot beyond the tier's retention count
    pub fn destroy(&self, root: &str) -> Result<RunReport> {
        self.for_each_filesystem("destroy", root, |filesystem, inventory, report| {
            for tier in &self.config.table {
                let keep = self.store.get_retention_count(filesystem, tier.name())?;
                let snapshots = inventory.tier(tier.name());
                let doomed = excess(snapshots, keep);
                debug!(
                    "  {}: {} present, keeping {}, destroying {}",
                    tier.name(),
                    snapshots.len(),
                    keep.max(0),
                    doomed.len()
                );

                for snapshot in doomed {
                    self.store.destroy_snapshot(snapshot.name())?;
                    info!("destroyed {} ({})", snapshot.name(), tier.name());
                    report.destroyed.push(snapshot.name().to_string());
                }
            }
            Ok(())
        })
    }

    fn for_each_filesystem<F>(&self, operation: &str, root: &str, mut apply: F) -> Result<RunReport>
    where
        F: FnMut(&str, &Inventory, &mut RunReport) -> Result<()>,
    {
        let filesystems = self.store.list_filesystems(root)?;
        let mut report = RunReport::default();

        for filesystem in filesystems {
            debug!("{}", filesystem);

            let result = self
                .load_inventory(&filesystem, &mut report)
                .and_then(|inventory| apply(&filesystem, &inventory, &mut report));

            match result {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("{} on {} stopped: {}", operation, filesystem, e);
                    report.failures.push(FilesystemFailure {
                        filesystem: filesystem.clone(),
                        error: e,
                    });
                }
            }
            report.filesystems.push(filesystem);
        }

        Ok(report)
    }

    fn load_inventory(&self, filesystem: &str, report: &mut RunReport) -> Result<Inventory> {
        let entries = self.store.list_snapshots(filesystem)?;
        let (inventory, rejected) = Inventory::build(&self.config.table, &entries);

        for e in rejected {
            warn!("skipping snapshot on {}: {}", filesystem, e);
            if let Error::Parse { name, .. } = e {
                report.skipped.push(name);
            }
        }

        Ok(inventory)
    }
}
