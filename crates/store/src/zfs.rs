//! `zfs` command adapter

use crate::SnapshotStore;
use chrono::NaiveDateTime;
use relsnap_core::{Error, Properties, Result, Snapshot, SnapshotEntry};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Store backed by the `zfs` command line tool
///
/// Commands are spawned with an argument vector, never through a shell.
#[derive(Debug, Clone)]
pub struct ZfsStore {
    zfs_bin: PathBuf,
    properties: Properties,
}

impl ZfsStore {
    /// Create a store that runs `zfs_bin` (a bare name is resolved via PATH)
    pub fn new(zfs_bin: impl Into<PathBuf>, properties: Properties) -> Self {
        Self {
            zfs_bin: zfs_bin.into(),
            properties,
        }
    }

    pub fn zfs_bin(&self) -> &Path {
        &self.zfs_bin
    }

    /// Run `zfs` with `args`, returning stdout
    fn run(&self, args: &[&str]) -> Result<String> {
        let command = format!("{} {}", self.zfs_bin.display(), args.join(" "));
        debug!("{}", command);

        let out = Command::new(&self.zfs_bin)
            .args(args)
            .output()
            .map_err(|e| Error::store(&command, e.to_string()))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", out.status)
            } else {
                stderr
            };
            return Err(Error::store(command, message));
        }

        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl SnapshotStore for ZfsStore {
    fn list_filesystems(&self, root: &str) -> Result<Vec<String>> {
        let out = self.run(&["list", "-H", "-o", "name", "-r", root])?;
        Ok(parse_filesystems(&out))
    }

    fn list_snapshots(&self, filesystem: &str) -> Result<Vec<SnapshotEntry>> {
        let columns = format!("name,{}", self.properties.snaptype());
        let out = self.run(&[
            "list", "-H", "-d", "1", "-o", &columns, "-t", "snapshot", filesystem,
        ])?;
        Ok(parse_snapshot_listing(&out))
    }

    fn get_retention_count(&self, filesystem: &str, tier: &str) -> Result<i64> {
        let property = self.properties.snapcnt(tier);
        let out = self.run(&["get", "-H", "-o", "value", &property, filesystem])?;
        parse_count(filesystem, &property, &out)
    }

    fn set_retention_count(&self, filesystem: &str, tier: &str, count: i64) -> Result<()> {
        let assignment = format!("{}={}", self.properties.snapcnt(tier), count);
        self.run(&["set", &assignment, filesystem])?;
        Ok(())
    }

    fn create_snapshot(
        &self,
        filesystem: &str,
        tier: &str,
        timestamp: NaiveDateTime,
    ) -> Result<String> {
        let tag = format!("{}={}", self.properties.snaptype(), tier);
        let name = Snapshot::name_for(filesystem, timestamp);
        self.run(&["snapshot", "-o", &tag, &name])?;
        Ok(name)
    }

    fn destroy_snapshot(&self, name: &str) -> Result<()> {
        // A name without '@' would destroy the filesystem itself
        if !name.contains('@') {
            return Err(Error::store(
                format!("{} destroy {}", self.zfs_bin.display(), name),
                "refusing to destroy something that is not a snapshot",
            ));
        }
        self.run(&["destroy", name])?;
        Ok(())
    }
}

/// One dataset name per line
pub(crate) fn parse_filesystems(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `name<TAB>tag` per line; `-` or an empty column means untagged
pub(crate) fn parse_snapshot_listing(out: &str) -> Vec<SnapshotEntry> {
    out.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut columns = line.split('\t');
            let name = columns.next().unwrap_or_default().trim();
            let tag = columns
                .next()
                .map(str::trim)
                .filter(|tag| !tag.is_empty() && *tag != "-");
            SnapshotEntry::new(name, tag)
        })
        .collect()
}

/// Decode a retention count property value
pub(crate) fn parse_count(filesystem: &str, property: &str, raw: &str) -> Result<i64> {
    let value = raw.trim();
    if value.is_empty() || value == "-" {
        return Err(Error::Configuration {
            filesystem: filesystem.to_string(),
            property: property.to_string(),
            reason: "is not set (run `relsnap init` first)".to_string(),
        });
    }

    value.parse::<i64>().map_err(|_| Error::Configuration {
        filesystem: filesystem.to_string(),
        property: property.to_string(),
        reason: format!("is not an integer: '{}'", value),
    })
}
