//! In-memory snapshot store
//!
//! Mirrors the parts of ZFS behavior the scheduler relies on: recursive
//! filesystem listing, snapshots listed in creation order, user properties
//! inherited from the nearest ancestor, and errors for duplicate or missing
//! datasets. Every mutating call is journaled so tests can assert on it.

use crate::zfs::parse_count;
use crate::SnapshotStore;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use relsnap_core::{Error, Properties, Result, Snapshot, SnapshotEntry};
use std::collections::HashMap;

/// A mutating call recorded by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    SetProperty {
        filesystem: String,
        property: String,
        value: String,
    },
    Create {
        name: String,
        tier: String,
    },
    Destroy {
        name: String,
    },
}

/// A call that should fail with a store error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailPoint {
    ListFilesystems,
    ListSnapshots(String),
    Create(String),
    Destroy(String),
}

#[derive(Debug, Default)]
struct Inner {
    /// Listing order
    filesystems: Vec<String>,
    /// Per filesystem, creation order
    snapshots: HashMap<String, Vec<SnapshotEntry>>,
    /// (filesystem, property) -> raw value
    properties: HashMap<(String, String), String>,
    operations: Vec<Operation>,
    fail_points: Vec<FailPoint>,
}

/// In-process [`SnapshotStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    properties: Properties,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(properties: Properties) -> Self {
        Self {
            properties,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Register a filesystem; listing order follows registration order
    pub fn add_filesystem(&self, filesystem: &str) -> &Self {
        let mut inner = self.inner.lock();
        if !inner.filesystems.iter().any(|fs| fs == filesystem) {
            inner.filesystems.push(filesystem.to_string());
        }
        self
    }

    /// Seed an existing snapshot without journaling it
    pub fn add_snapshot(&self, name: &str, tag: Option<&str>) -> &Self {
        let filesystem = name.split_once('@').map_or(name, |(fs, _)| fs);
        self.add_filesystem(filesystem);
        self.inner
            .lock()
            .snapshots
            .entry(filesystem.to_string())
            .or_default()
            .push(SnapshotEntry::new(name, tag));
        self
    }

    /// Seed a raw property value without journaling it
    pub fn set_property(&self, filesystem: &str, property: &str, value: &str) -> &Self {
        self.inner.lock().properties.insert(
            (filesystem.to_string(), property.to_string()),
            value.to_string(),
        );
        self
    }

    /// Seed the retention count of every tier in `tiers` on `filesystem`
    pub fn set_counts<'a>(
        &self,
        filesystem: &str,
        tiers: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> &Self {
        for (tier, count) in tiers {
            let property = self.properties.snapcnt(tier);
            self.set_property(filesystem, &property, &count.to_string());
        }
        self
    }

    /// Make a future call fail
    pub fn fail_on(&self, point: FailPoint) -> &Self {
        self.inner.lock().fail_points.push(point);
        self
    }

    /// Current snapshots of `filesystem`, creation order
    pub fn snapshots(&self, filesystem: &str) -> Vec<SnapshotEntry> {
        self.inner
            .lock()
            .snapshots
            .get(filesystem)
            .cloned()
            .unwrap_or_default()
    }

    /// Raw property value set directly on `filesystem` (no inheritance)
    pub fn local_property(&self, filesystem: &str, property: &str) -> Option<String> {
        self.inner
            .lock()
            .properties
            .get(&(filesystem.to_string(), property.to_string()))
            .cloned()
    }

    /// Journal of mutating calls, oldest first
    pub fn operations(&self) -> Vec<Operation> {
        self.inner.lock().operations.clone()
    }

    pub fn clear_operations(&self) {
        self.inner.lock().operations.clear();
    }

    fn check(inner: &Inner, point: FailPoint, command: String) -> Result<()> {
        if inner.fail_points.contains(&point) {
            return Err(Error::store(command, "injected failure"));
        }
        Ok(())
    }

    fn require_filesystem(inner: &Inner, filesystem: &str, command: &str) -> Result<()> {
        if inner.filesystems.iter().any(|fs| fs == filesystem) {
            Ok(())
        } else {
            Err(Error::store(
                command,
                format!("cannot open '{}': dataset does not exist", filesystem),
            ))
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn list_filesystems(&self, root: &str) -> Result<Vec<String>> {
        let inner = self.inner.lock();
        let command = format!("list filesystems {}", root);
        Self::check(&inner, FailPoint::ListFilesystems, command.clone())?;
        Self::require_filesystem(&inner, root, &command)?;

        let prefix = format!("{}/", root);
        Ok(inner
            .filesystems
            .iter()
            .filter(|fs| *fs == root || fs.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn list_snapshots(&self, filesystem: &str) -> Result<Vec<SnapshotEntry>> {
        let inner = self.inner.lock();
        let command = format!("list snapshots {}", filesystem);
        Self::check(
            &inner,
            FailPoint::ListSnapshots(filesystem.to_string()),
            command.clone(),
        )?;
        Self::require_filesystem(&inner, filesystem, &command)?;

        Ok(inner.snapshots.get(filesystem).cloned().unwrap_or_default())
    }

    fn get_retention_count(&self, filesystem: &str, tier: &str) -> Result<i64> {
        let inner = self.inner.lock();
        let property = self.properties.snapcnt(tier);
        Self::require_filesystem(&inner, filesystem, &format!("get {} {}", property, filesystem))?;

        // User properties inherit from the nearest ancestor that sets them
        let mut current = Some(filesystem);
        let mut value = None;
        while let Some(fs) = current {
            if let Some(v) = inner.properties.get(&(fs.to_string(), property.clone())) {
                value = Some(v.as_str());
                break;
            }
            current = fs.rsplit_once('/').map(|(parent, _)| parent);
        }

        parse_count(filesystem, &property, value.unwrap_or("-"))
    }

    fn set_retention_count(&self, filesystem: &str, tier: &str, count: i64) -> Result<()> {
        let mut inner = self.inner.lock();
        let property = self.properties.snapcnt(tier);
        Self::require_filesystem(&inner, filesystem, &format!("set {} {}", property, filesystem))?;

        inner.properties.insert(
            (filesystem.to_string(), property.clone()),
            count.to_string(),
        );
        inner.operations.push(Operation::SetProperty {
            filesystem: filesystem.to_string(),
            property,
            value: count.to_string(),
        });
        Ok(())
    }

    fn create_snapshot(
        &self,
        filesystem: &str,
        tier: &str,
        timestamp: NaiveDateTime,
    ) -> Result<String> {
        let mut inner = self.inner.lock();
        let name = Snapshot::name_for(filesystem, timestamp);
        let command = format!("snapshot {}", name);
        Self::check(&inner, FailPoint::Create(filesystem.to_string()), command.clone())?;
        Self::require_filesystem(&inner, filesystem, &command)?;

        let snapshots = inner.snapshots.entry(filesystem.to_string()).or_default();
        if snapshots.iter().any(|s| s.name == name) {
            return Err(Error::store(
                command,
                format!("cannot create snapshot '{}': dataset already exists", name),
            ));
        }
        snapshots.push(SnapshotEntry::tagged(name.clone(), tier));

        inner.operations.push(Operation::Create {
            name: name.clone(),
            tier: tier.to_string(),
        });
        Ok(name)
    }

    fn destroy_snapshot(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let command = format!("destroy {}", name);
        Self::check(&inner, FailPoint::Destroy(name.to_string()), command.clone())?;

        let filesystem = name.split_once('@').map_or(name, |(fs, _)| fs);
        let removed = inner
            .snapshots
            .get_mut(filesystem)
            .and_then(|snapshots| {
                let pos = snapshots.iter().position(|s| s.name == name)?;
                Some(snapshots.remove(pos))
            })
            .is_some();

        if !removed {
            return Err(Error::store(
                command,
                format!(
                    "could not find any snapshots to destroy; check snapshot names ({})",
                    name
                ),
            ));
        }

        inner.operations.push(Operation::Destroy {
            name: name.to_string(),
        });
        Ok(())
    }
}
