//! Run configuration

use crate::IntervalTable;

/// Default namespace for relsnap's ZFS user properties
pub const DEFAULT_PREFIX: &str = "relsnap";

/// Default retention count written by `init`
pub const DEFAULT_COUNT: i64 = 8;

/// Names of the user properties relsnap reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    prefix: String,
}

impl Properties {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `<prefix>:snapcnt-<tier>`: how many snapshots of a tier to keep
    pub fn snapcnt(&self, tier: &str) -> String {
        format!("{}:snapcnt-{}", self.prefix, tier)
    }

    /// `<prefix>:snaptype`: tier tag set on every created snapshot
    pub fn snaptype(&self) -> String {
        format!("{}:snaptype", self.prefix)
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Immutable configuration for one invocation
///
/// Built once at startup and handed to the store and the decision engine.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub properties: Properties,
    pub table: IntervalTable,
}

impl RunConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            properties: Properties::new(prefix),
            table: IntervalTable::standard(),
        }
    }

    pub fn with_table(mut self, table: IntervalTable) -> Self {
        self.table = table;
        self
    }
}
