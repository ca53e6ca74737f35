//! Versioned result log
//!
//! A log is the full history of one experiment: an ordered list of snapshots,
//! each tagged with a version label. The whole log is read at startup and
//! rewritten on every save (append-mostly, single writer).
//!
//! ## Storage format
//!
//! ```json
//! [
//!   {
//!     "version": "v1",
//!     "entries": [
//!       { "name": "adder", "size": 10 }
//!     ]
//!   }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::{Error, Result};

/// One serialized row: column name to value, in column declaration order.
pub type Entry = serde_json::Map<String, serde_json::Value>;

/// One saved set of entries tagged with a version label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    version: String,
    entries: Vec<Entry>,
}

impl Snapshot {
    /// Create a snapshot.
    #[must_use]
    pub fn new(version: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            version: version.into(),
            entries,
        }
    }

    /// Version label.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Column names in the order the first entry stores them.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.entries
            .first()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Ordered snapshot history backed by a JSON document.
#[derive(Debug, Clone)]
pub struct VersionedLog {
    path: PathBuf,
    config: Config,
    snapshots: Vec<Snapshot>,
}

impl VersionedLog {
    /// Open the log for experiment `name` under `config`.
    ///
    /// # Errors
    ///
    /// See [`VersionedLog::load`].
    pub fn open(name: &str, config: &Config) -> Result<Self> {
        let mut log = Self::load(config.storage_path(name))?;
        log.config = config.clone();
        Ok(log)
    }

    /// Load the log stored at `path`.
    ///
    /// A missing (or blank) file yields an empty log.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists but cannot be read, and
    /// [`Error::Storage`] if it is not a valid snapshot array.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshots = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                Error::Storage(format!("Failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), snapshots = snapshots.len(), "loaded result log");

        Ok(Self {
            path,
            config: Config::default(),
            snapshots,
        })
    }

    /// Storage file backing this log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All snapshots, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when nothing has been saved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Snapshot before the most recent one.
    #[must_use]
    pub fn previous(&self) -> Option<&Snapshot> {
        self.snapshots.len().checked_sub(2).map(|i| &self.snapshots[i])
    }

    /// Record `entries` under `version` and rewrite the storage file.
    ///
    /// The default-revision sentinel is resolved first. If the last snapshot
    /// already carries the effective label it is replaced, otherwise a new
    /// snapshot is appended. Returns the effective label.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or written.
    pub fn save(&mut self, entries: Vec<Entry>, version: &str) -> Result<String> {
        let version = self.config.resolve_version(version);

        let replace = self.last().is_some_and(|s| s.version == version);
        let keep = self.snapshots.len() - usize::from(replace);
        let mut snapshots = Vec::with_capacity(keep + 1);
        snapshots.extend_from_slice(&self.snapshots[..keep]);
        snapshots.push(Snapshot::new(version.clone(), entries));

        // in-memory history only changes once the document is on disk
        self.persist(&snapshots)?;
        self.snapshots = snapshots;

        if replace {
            info!(version = %version, "replaced last snapshot");
        } else {
            info!(version = %version, "appended snapshot");
        }
        Ok(version)
    }

    /// Column names in the order the first non-empty snapshot stores them.
    ///
    /// `preferred` snapshots are tried first, then the whole history from
    /// the oldest. Empty when no snapshot holds an entry.
    #[must_use]
    pub fn layout(&self, preferred: &[&Snapshot]) -> Vec<String> {
        preferred
            .iter()
            .copied()
            .chain(&self.snapshots)
            .map(Snapshot::columns)
            .find(|columns| !columns.is_empty())
            .unwrap_or_default()
    }

    fn persist(&self, snapshots: &[Snapshot]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut document = serde_json::to_string_pretty(snapshots)?;
        document.push('\n');
        fs::write(&self.path, document)?;
        debug!(path = %self.path.display(), snapshots = snapshots.len(), "wrote result log");
        Ok(())
    }

    /// Look up a snapshot by label.
    ///
    /// An empty label selects `default`; otherwise the first snapshot with an
    /// exactly matching label is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionNotFound`] when no snapshot matches.
    pub fn find<'a>(&'a self, version: &str, default: &'a Snapshot) -> Result<&'a Snapshot> {
        if version.is_empty() {
            return Ok(default);
        }
        self.snapshots
            .iter()
            .find(|s| s.version == version)
            .ok_or_else(|| Error::VersionNotFound(version.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> Entry {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = VersionedLog::load(dir.path().join("absent.json")).unwrap();
        assert!(log.is_empty());
        assert!(log.last().is_none());
        assert!(log.previous().is_none());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(VersionedLog::load(&path), Err(Error::Storage(_))));
    }

    #[test]
    fn test_save_same_version_replaces_last() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = VersionedLog::load(dir.path().join("x.json")).unwrap();

        log.save(vec![entry(json!({"name": "a"}))], "v1").unwrap();
        log.save(vec![entry(json!({"name": "b"}))], "v1").unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.snapshots()[0].entries()[0]["name"], json!("b"));

        log.save(vec![], "v2").unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.previous().unwrap().version(), "v1");
    }

    #[test]
    fn test_save_only_dedups_against_last() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = VersionedLog::load(dir.path().join("x.json")).unwrap();
        log.save(vec![], "v1").unwrap();
        log.save(vec![], "v2").unwrap();
        log.save(vec![], "v1").unwrap();
        let labels: Vec<_> = log.snapshots().iter().map(Snapshot::version).collect();
        assert_eq!(labels, vec!["v1", "v2", "v1"]);
    }

    #[test]
    fn test_find_returns_first_repeated_label() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = VersionedLog::load(dir.path().join("x.json")).unwrap();
        log.save(vec![entry(json!({"name": "first"}))], "v1").unwrap();
        log.save(vec![], "v2").unwrap();
        log.save(vec![entry(json!({"name": "second"}))], "v1").unwrap();

        let last = log.last().unwrap();
        let found = log.find("v1", last).unwrap();
        assert!(std::ptr::eq(found, &log.snapshots()[0]));
        assert_eq!(found.entries()[0]["name"], json!("first"));
    }

    #[test]
    fn test_failed_save_keeps_history() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("results");
        let mut log = VersionedLog::load(base.join("x.json")).unwrap();
        log.save(vec![entry(json!({"name": "adder"}))], "v1").unwrap();

        fs::remove_dir_all(&base).unwrap();
        fs::write(&base, "not a directory").unwrap();

        assert!(log.save(vec![entry(json!({"name": "bar"}))], "v2").is_err());
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().version(), "v1");

        assert!(log.save(vec![], "v1").is_err());
        assert_eq!(log.last().unwrap().entries()[0]["name"], json!("adder"));
    }

    #[test]
    fn test_layout_skips_empty_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = VersionedLog::load(dir.path().join("x.json")).unwrap();
        assert!(log.layout(&[]).is_empty());

        log.save(vec![entry(json!({"name": "adder", "size": 10}))], "v1").unwrap();
        log.save(vec![], "v2").unwrap();

        let last = log.last().unwrap();
        assert_eq!(log.layout(&[last]), vec!["name", "size"]);
    }

    #[test]
    fn test_save_resolves_default_revision() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new().base_dir(dir.path()).default_revision("deadbee");
        let mut log = VersionedLog::open("rev", &config).unwrap();
        let label = log.save(vec![], crate::USE_DEFAULT_REVISION).unwrap();
        assert_eq!(label, "deadbee");
        assert_eq!(log.last().unwrap().version(), "deadbee");
    }

    #[test]
    fn test_persisted_document_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let mut log = VersionedLog::load(&path).unwrap();
        log.save(vec![entry(json!({"name": "adder", "size": 10}))], "v1")
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("]\n"));
        assert!(text.contains("\n  {\n    \"version\": \"v1\""));
        let name_at = text.find("\"name\"").unwrap();
        let size_at = text.find("\"size\"").unwrap();
        assert!(name_at < size_at);
    }

    #[test]
    fn test_find() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = VersionedLog::load(dir.path().join("f.json")).unwrap();
        log.save(vec![], "v1").unwrap();
        log.save(vec![], "v2").unwrap();
        let last = log.last().unwrap();

        assert_eq!(log.find("", last).unwrap().version(), "v2");
        assert_eq!(log.find("v1", last).unwrap().version(), "v1");
        assert!(matches!(
            log.find("v9", last),
            Err(Error::VersionNotFound(v)) if v == "v9"
        ));
    }
}
