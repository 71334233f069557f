//! Per-tier retention

use relsnap_core::Snapshot;

/// Snapshots beyond the newest `keep`, oldest first
///
/// `snapshots` must be oldest first, as [`relsnap_core::Inventory`] keeps
/// them. A `keep` of zero or less marks the whole tier as excess.
pub fn excess(snapshots: &[Snapshot], keep: i64) -> &[Snapshot] {
    let keep = if keep <= 0 {
        0
    } else {
        usize::try_from(keep).unwrap_or(usize::MAX)
    };
    let cut = snapshots.len().saturating_sub(keep);
    &snapshots[..cut]
}
