//! Snapshot names and the records parsed from them

use crate::{Error, Result};
use chrono::NaiveDateTime;

/// Stamp embedded after the `@` in every snapshot relsnap creates
pub const STAMP_FORMAT: &str = "%Y-%m-%d-%H%M";

/// One row of a snapshot listing, before parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Full snapshot name (`<filesystem>@<stamp>`)
    pub name: String,
    /// Tier tag, `None` for snapshots relsnap did not create
    pub tag: Option<String>,
}

impl SnapshotEntry {
    pub fn new(name: impl Into<String>, tag: Option<&str>) -> Self {
        Self {
            name: name.into(),
            tag: tag.map(str::to_string),
        }
    }

    pub fn tagged(name: impl Into<String>, tag: &str) -> Self {
        Self::new(name, Some(tag))
    }
}

/// A snapshot belonging to a tier, with its stamp decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    name: String,
    filesystem: String,
    tier: String,
    timestamp: NaiveDateTime,
}

impl Snapshot {
    /// Parse `<filesystem>@<YYYY-MM-DD-HHMM>` for the given tier
    pub fn parse(name: &str, tier: &str) -> Result<Self> {
        let (filesystem, stamp) = name.split_once('@').ok_or_else(|| Error::Parse {
            name: name.to_string(),
            reason: "missing '@' separator".to_string(),
        })?;

        // chrono's %Y also takes signed and longer years; stamps are exactly YYYY-MM-DD-HHMM
        let shaped = stamp.len() == 15
            && stamp.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 | 10 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !shaped {
            return Err(Error::Parse {
                name: name.to_string(),
                reason: format!("stamp '{}' is not YYYY-MM-DD-HHMM", stamp),
            });
        }

        let timestamp =
            NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).map_err(|e| Error::Parse {
                name: name.to_string(),
                reason: format!("stamp '{}' is not YYYY-MM-DD-HHMM ({})", stamp, e),
            })?;

        Ok(Self {
            name: name.to_string(),
            filesystem: filesystem.to_string(),
            tier: tier.to_string(),
            timestamp,
        })
    }

    /// Name of the snapshot created for `filesystem` at `timestamp`
    ///
    /// Seconds are dropped; names carry minute precision.
    pub fn name_for(filesystem: &str, timestamp: NaiveDateTime) -> String {
        format!("{}@{}", filesystem, timestamp.format(STAMP_FORMAT))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filesystem(&self) -> &str {
        &self.filesystem
    }

    pub fn tier(&self) -> &str {
        &self.tier
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_valid_name() {
        let snap = Snapshot::parse("tank/home@2013-04-01-0930", "daily").unwrap();
        assert_eq!(snap.filesystem(), "tank/home");
        assert_eq!(snap.tier(), "daily");
        assert_eq!(snap.timestamp(), at(2013, 4, 1, 9, 30));
        assert_eq!(snap.to_string(), "tank/home@2013-04-01-0930");
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        for name in [
            "tank/home",
            "tank/home@manual-backup",
            "tank/home@2013-04-01",
            "tank/home@2013-13-01-0930",
            "tank/home@2013-04-01-0930-extra",
            "tank/home@+262142-12-31-2359",
            "tank/home@12013-04-01-0930",
            "tank/home@2013-4-01-0930",
        ] {
            let err = Snapshot::parse(name, "daily").unwrap_err();
            assert!(matches!(err, Error::Parse { .. }), "{} should not parse", name);
        }
    }

    #[test]
    fn test_name_for_drops_seconds() {
        let ts = at(2024, 1, 2, 3, 4) + chrono::Duration::seconds(59);
        assert_eq!(Snapshot::name_for("tank", ts), "tank@2024-01-02-0304");

        let parsed = Snapshot::parse(&Snapshot::name_for("tank", ts), "hourly").unwrap();
        assert_eq!(parsed.timestamp(), at(2024, 1, 2, 3, 4));
    }
}
