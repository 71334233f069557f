//! Snapshot store adapters
//!
//! The decision engine talks to the volume manager only through
//! [`SnapshotStore`]. Two implementations live here:
//! - [`ZfsStore`]: runs the `zfs` command and parses its tab-separated output
//! - [`MemoryStore`]: in-process store with ZFS-like semantics, for tests

pub mod memory;
pub mod zfs;

pub use memory::{FailPoint, MemoryStore, Operation};
pub use zfs::ZfsStore;

use chrono::NaiveDateTime;
use relsnap_core::{Result, SnapshotEntry};

/// Primitive operations on the volume manager
///
/// Every call blocks until the store answers. Failures surface as
/// [`relsnap_core::Error::Store`], except an unset or non-numeric retention
/// count, which is [`relsnap_core::Error::Configuration`].
///
/// Listings are expected oldest first, which is how ZFS lists snapshots, but
/// callers sort by the stamp in the name and do not depend on it.
pub trait SnapshotStore {
    /// `root` and all of its descendants, in listing order
    fn list_filesystems(&self, root: &str) -> Result<Vec<String>>;

    /// Direct snapshots of `filesystem`, untagged ones included with `tag: None`
    fn list_snapshots(&self, filesystem: &str) -> Result<Vec<SnapshotEntry>>;

    /// Desired number of snapshots of `tier` on `filesystem`
    fn get_retention_count(&self, filesystem: &str, tier: &str) -> Result<i64>;

    /// Store the desired count for `tier`; setting the same value twice is harmless
    fn set_retention_count(&self, filesystem: &str, tier: &str, count: i64) -> Result<()>;

    /// Create `<filesystem>@<stamp>` tagged with `tier`, returning its name
    fn create_snapshot(&self, filesystem: &str, tier: &str, timestamp: NaiveDateTime)
        -> Result<String>;

    /// Destroy one snapshot by full name
    fn destroy_snapshot(&self, name: &str) -> Result<()>;
}
