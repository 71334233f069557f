//! Per-filesystem snapshot inventory grouped by tier

use crate::{Error, IntervalTable, Snapshot, SnapshotEntry};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Snapshots of one filesystem, grouped by tier tag
///
/// Each tier's sequence is sorted oldest first by the stamp in the name, so
/// nothing here depends on the order the store listed snapshots in.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    by_tier: HashMap<String, Vec<Snapshot>>,
}

impl Inventory {
    /// Group a listing by tier
    ///
    /// Untagged snapshots and tags naming no tier in `table` are left out.
    /// Tagged snapshots with unparseable names are returned as errors next
    /// to the inventory; they never abort the build.
    pub fn build(table: &IntervalTable, entries: &[SnapshotEntry]) -> (Self, Vec<Error>) {
        let mut by_tier: HashMap<String, Vec<Snapshot>> = HashMap::new();
        let mut rejected = Vec::new();

        for entry in entries {
            let Some(tag) = entry.tag.as_deref() else {
                continue;
            };
            if table.index_of(tag).is_none() {
                continue;
            }

            match Snapshot::parse(&entry.name, tag) {
                Ok(snapshot) => by_tier.entry(tag.to_string()).or_default().push(snapshot),
                Err(e) => rejected.push(e),
            }
        }

        // Stable: equal stamps keep listing order
        for snapshots in by_tier.values_mut() {
            snapshots.sort_by_key(Snapshot::timestamp);
        }

        (Self { by_tier }, rejected)
    }

    /// Snapshots of one tier, oldest first
    pub fn tier(&self, name: &str) -> &[Snapshot] {
        self.by_tier.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Newest stamp among the tier at `index` and every coarser tier
    pub fn newest_through(&self, table: &IntervalTable, index: usize) -> Option<NaiveDateTime> {
        table
            .names_through(index)
            .filter_map(|name| self.tier(name).last())
            .map(Snapshot::timestamp)
            .max()
    }

    /// Total snapshots across all tiers
    pub fn len(&self) -> usize {
        self.by_tier.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
