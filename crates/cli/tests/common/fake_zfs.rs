//! Stand-in for the `zfs` binary
//!
//! A shell script keeping pool state in plain files under a temp directory:
//!
//! - `filesystems`: one dataset per line, listing order
//! - `snapshots`: `name<TAB>tag` per line, creation order (`-` for no tag)
//! - `props`: `dataset property value` per line, last one wins
//! - `fail`: snapshot names whose destroy is refused
//! - `calls.log`: the arguments of every invocation

use super::RelsnapCommand;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCRIPT: &str = r#"#!/bin/sh
state='@STATE@'
echo "$*" >> "$state/calls.log"

case "$1" in
  list)
    if [ "$4" = "name" ]; then
      root="$6"
      if ! grep -qx "$root" "$state/filesystems"; then
        echo "cannot open '$root': dataset does not exist" >&2
        exit 1
      fi
      awk -v root="$root" '$0 == root || index($0, root "/") == 1' "$state/filesystems"
    else
      fs="$9"
      awk -F '\t' -v fs="$fs" 'index($1, fs "@") == 1' "$state/snapshots"
    fi
    ;;
  get)
    prop="$5"
    fs="$6"
    while :; do
      value=$(awk -v fs="$fs" -v p="$prop" '$1 == fs && $2 == p { v = $3 } END { print v }' "$state/props")
      if [ -n "$value" ]; then
        echo "$value"
        exit 0
      fi
      case "$fs" in
        */*) fs="${fs%/*}" ;;
        *) break ;;
      esac
    done
    echo "-"
    ;;
  set)
    echo "$3 ${2%%=*} ${2#*=}" >> "$state/props"
    ;;
  snapshot)
    if awk -F '\t' -v n="$4" '$1 == n { found = 1 } END { exit !found }' "$state/snapshots"; then
      echo "cannot create snapshot '$4': dataset already exists" >&2
      exit 1
    fi
    printf '%s\t%s\n' "$4" "${3#*=}" >> "$state/snapshots"
    ;;
  destroy)
    if grep -qx "$2" "$state/fail"; then
      echo "cannot destroy '$2': dataset is busy" >&2
      exit 1
    fi
    awk -F '\t' -v n="$2" '$1 != n' "$state/snapshots" > "$state/snapshots.tmp"
    mv "$state/snapshots.tmp" "$state/snapshots"
    ;;
  *)
    echo "unrecognized command '$1'" >&2
    exit 2
    ;;
esac
"#;

/// A fake pool plus a settings file pointing `relsnap` at it
pub struct FakeZfs {
    dir: TempDir,
}

impl FakeZfs {
    pub fn new(filesystems: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let state = dir.path();

        let script = state.join("zfs");
        fs::write(&script, SCRIPT.replace("@STATE@", &state.display().to_string())).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let mut listing = filesystems.join("\n");
        listing.push('\n');
        fs::write(state.join("filesystems"), listing).unwrap();
        for file in ["snapshots", "props", "fail", "calls.log"] {
            fs::write(state.join(file), "").unwrap();
        }

        fs::write(
            state.join("relsnap.toml"),
            format!("zfs_bin = \"{}\"\n", script.display()),
        )
        .unwrap();

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn settings_path(&self) -> PathBuf {
        self.path().join("relsnap.toml")
    }

    /// `relsnap` wired to this pool through `$RELSNAP_CONFIG`
    pub fn command(&self) -> RelsnapCommand {
        let mut cmd = RelsnapCommand::new();
        cmd.env("RELSNAP_CONFIG", &self.settings_path().display().to_string());
        cmd
    }

    pub fn add_snapshot(&self, name: &str, tag: Option<&str>) -> &Self {
        self.append("snapshots", &format!("{}\t{}", name, tag.unwrap_or("-")));
        self
    }

    pub fn set_property(&self, filesystem: &str, property: &str, value: &str) -> &Self {
        self.append("props", &format!("{} {} {}", filesystem, property, value));
        self
    }

    pub fn fail_destroy(&self, name: &str) -> &Self {
        self.append("fail", name);
        self
    }

    /// `(name, tag)` of every snapshot, creation order
    pub fn snapshots(&self) -> Vec<(String, String)> {
        self.read("snapshots")
            .iter()
            .filter_map(|line| line.split_once('\t'))
            .map(|(name, tag)| (name.to_string(), tag.to_string()))
            .collect()
    }

    pub fn snapshot_names(&self, filesystem: &str) -> Vec<String> {
        let prefix = format!("{}@", filesystem);
        self.snapshots()
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| name.starts_with(&prefix))
            .collect()
    }

    /// Locally set value of `property` on `filesystem`
    pub fn property(&self, filesystem: &str, property: &str) -> Option<String> {
        self.read("props")
            .iter()
            .filter_map(|line| {
                let mut fields = line.splitn(3, ' ');
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(fs), Some(p), Some(v)) if fs == filesystem && p == property => {
                        Some(v.to_string())
                    }
                    _ => None,
                }
            })
            .last()
    }

    pub fn calls(&self) -> Vec<String> {
        self.read("calls.log")
    }

    fn append(&self, file: &str, line: &str) {
        let path = self.path().join(file);
        let mut contents = fs::read_to_string(&path).unwrap_or_default();
        contents.push_str(line);
        contents.push('\n');
        fs::write(path, contents).unwrap();
    }

    fn read(&self, file: &str) -> Vec<String> {
        fs::read_to_string(self.path().join(file))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
