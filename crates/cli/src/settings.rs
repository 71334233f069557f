//! Settings file
//!
//! Optional TOML file supplying defaults for the command-line flags and the
//! path of the `zfs` binary. Looked up from `--config`, then `$RELSNAP_CONFIG`,
//! then `/etc/relsnap.toml` (only if it exists). Flags given on the command
//! line override whatever the file says.

use anyhow::{Context, Result};
use relsnap_core::{Properties, RunConfig, DEFAULT_COUNT, DEFAULT_PREFIX};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use store::ZfsStore;

/// Environment variable naming a settings file
pub const CONFIG_ENV: &str = "RELSNAP_CONFIG";

/// Settings file used when neither `--config` nor `$RELSNAP_CONFIG` is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/relsnap.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// `zfs` executable; a bare name is looked up in PATH
    pub zfs_bin: PathBuf,
    /// Namespace of the ZFS user properties
    pub prefix: String,
    /// Retention count written by `init`
    pub count: i64,
    /// Log level name
    pub loglevel: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zfs_bin: PathBuf::from("zfs"),
            prefix: DEFAULT_PREFIX.to_string(),
            count: DEFAULT_COUNT,
            loglevel: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse a settings file
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = toml::from_str(&s)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Find and load the settings file, falling back to defaults
    ///
    /// An explicitly named file (flag or environment) must exist; the
    /// system-wide default path is optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Self::load_from(Path::new(&path));
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from(default_path);
        }

        Ok(Self::default())
    }

    /// Reject values that would produce invalid ZFS property names
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            anyhow::bail!("prefix must not be empty");
        }

        // ZFS user property names: lowercase letters, digits and : . _ -
        let valid = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || ":._-".contains(c);
        if !self.prefix.chars().all(valid) {
            anyhow::bail!(
                "prefix '{}' may only contain lowercase letters, digits and ': . _ -'",
                self.prefix
            );
        }

        if self.count < 0 {
            anyhow::bail!("count must not be negative (got {})", self.count);
        }

        if self.zfs_bin.as_os_str().is_empty() {
            anyhow::bail!("zfs_bin must not be empty");
        }

        Ok(())
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(self.prefix.clone())
    }

    pub fn store(&self) -> ZfsStore {
        ZfsStore::new(self.zfs_bin.clone(), Properties::new(self.prefix.clone()))
    }
}
