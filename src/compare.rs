//! Cross-version comparison
//!
//! Two snapshots are outer-joined on the key column (first declared column).
//! The joined table carries the old values under the original column names
//! and the current values under primed names (`size` / `size'`).
//!
//! ## Key order
//!
//! Keys of the current snapshot come first, in its order; keys that only
//! exist in the old snapshot (removed rows) follow in the old snapshot's order.
//!
//! ## Absent cells
//!
//! A removed row has no primed fields and an added row has no unprimed
//! non-key fields. Absent fields are left out of the joined entry and render
//! as blank cells.

use std::io::Write;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::log::{Entry, Snapshot, VersionedLog};
use crate::table::Table;
use crate::Result;

/// Name of the column holding current-version values for `column`.
#[must_use]
pub fn primed(column: &str) -> String {
    format!("{column}'")
}

/// Result of joining two snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    old_version: String,
    current_version: String,
    columns: Vec<String>,
    rows: Vec<Entry>,
    differences: Vec<(String, usize)>,
}

impl Comparison {
    /// Join `old` and `current` on the `key` column.
    ///
    /// `value_columns` are the non-key columns in declaration order; each
    /// gets a primed counterpart in the joined layout. Differences are
    /// counted for every name in `tracked`, only over keys present in both
    /// snapshots. A tracked name that is the key column or not one of
    /// `value_columns` always counts zero.
    #[must_use]
    pub fn between<C: AsRef<str>, T: AsRef<str>>(
        key: &str,
        value_columns: &[C],
        old: &Snapshot,
        current: &Snapshot,
        tracked: &[T],
    ) -> Self {
        let value_columns: Vec<String> = value_columns
            .iter()
            .map(|c| c.as_ref().to_string())
            .collect();

        let old_index = index_by_key(old.entries(), key);
        let cur_index = index_by_key(current.entries(), key);
        let keys = collect_keys(current.entries(), old.entries(), key);

        let mut differences: Vec<(String, usize)> = Vec::new();
        for name in tracked {
            let name = name.as_ref();
            if !differences.iter().any(|(n, _)| n == name) {
                differences.push((name.to_string(), 0));
            }
        }

        let mut rows = Vec::with_capacity(keys.len());
        for k in &keys {
            let old_entry = old_index.get(k.as_str()).copied();
            let cur_entry = cur_index.get(k.as_str()).copied();

            let mut row = old_entry.cloned().unwrap_or_default();
            if let Some(cur) = cur_entry {
                if old_entry.is_none() {
                    if let Some(v) = cur.get(key) {
                        row.insert(key.to_string(), v.clone());
                    }
                }
                for column in &value_columns {
                    if let Some(v) = cur.get(column) {
                        row.insert(primed(column), v.clone());
                    }
                }
            }

            if let (Some(old), Some(cur)) = (old_entry, cur_entry) {
                for (name, count) in &mut differences {
                    let tracked_value = value_columns.contains(name);
                    if tracked_value && old.get(name.as_str()) != cur.get(name.as_str()) {
                        *count += 1;
                    }
                }
            }

            rows.push(row);
        }

        let mut joined_columns = Vec::with_capacity(1 + 2 * value_columns.len());
        joined_columns.push(key.to_string());
        joined_columns.extend(value_columns.iter().cloned());
        joined_columns.extend(value_columns.iter().map(|c| primed(c)));

        debug!(
            old = old.version(),
            current = current.version(),
            keys = keys.len(),
            "joined snapshots"
        );

        Self {
            old_version: old.version().to_string(),
            current_version: current.version().to_string(),
            columns: joined_columns,
            rows,
            differences,
        }
    }

    /// Label of the old snapshot.
    #[must_use]
    pub fn old_version(&self) -> &str {
        &self.old_version
    }

    /// Label of the current snapshot.
    #[must_use]
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Joined column layout: declared columns, then primed non-key columns.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Joined rows, one per key.
    #[must_use]
    pub fn rows(&self) -> &[Entry] {
        &self.rows
    }

    /// Difference count per tracked column, in tracking order.
    #[must_use]
    pub fn differences(&self) -> &[(String, usize)] {
        &self.differences
    }

    /// Difference count for one tracked column.
    #[must_use]
    pub fn differences_in(&self, column: &str) -> Option<usize> {
        self.differences
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, count)| *count)
    }

    /// Render the joined rows.
    #[must_use]
    pub fn table(&self) -> Table {
        Table::new(&self.columns, &self.rows)
    }

    /// Write the joined table followed by one summary line per tracked column.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn write_report<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        self.table().write_to(out)?;
        for (column, count) in &self.differences {
            if *count == 0 {
                writeln!(out, "[i] no differences in column '{column}'")?;
            } else {
                writeln!(out, "[i] {count} differences in column '{column}'")?;
            }
        }
        Ok(())
    }
}

/// JSON text of an entry's key; distinguishes `"1"` from `1`.
fn key_text(entry: &Entry, key: &str) -> String {
    entry
        .get(key)
        .map_or_else(|| "null".to_string(), ToString::to_string)
}

/// First entry per key, like a linear scan would find.
fn index_by_key<'a>(entries: &'a [Entry], key: &str) -> FxHashMap<String, &'a Entry> {
    let mut index = FxHashMap::default();
    for entry in entries {
        index.entry(key_text(entry, key)).or_insert(entry);
    }
    index
}

fn collect_keys(current: &[Entry], old: &[Entry], key: &str) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut keys = Vec::with_capacity(current.len() + old.len());
    for entry in current.iter().chain(old) {
        let k = key_text(entry, key);
        if seen.insert(k.clone()) {
            keys.push(k);
        }
    }
    keys
}

/// Compare two snapshots of `log` on the `key` column and write the report
/// to `out`.
///
/// Empty labels select the defaults: the second-to-last snapshot as old and
/// the last snapshot as current. Returns `Ok(false)` after printing a warning
/// when the log holds fewer than two snapshots or a label is unknown.
///
/// # Errors
///
/// Only write failures on `out` are returned as errors.
pub fn compare<C: AsRef<str>, T: AsRef<str>, W: Write + ?Sized>(
    log: &VersionedLog,
    key: &str,
    value_columns: &[C],
    old_version: &str,
    current_version: &str,
    tracked: &[T],
    out: &mut W,
) -> Result<bool> {
    let (Some(previous), Some(last)) = (log.previous(), log.last()) else {
        warn!(path = %log.path().display(), "fewer than two snapshots to compare");
        writeln!(out, "[w] dataset contains less than two entry sets")?;
        return Ok(false);
    };

    let resolved = log
        .find(old_version, previous)
        .and_then(|old| Ok((old, log.find(current_version, last)?)));
    let (old, current) = match resolved {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, "comparison dataset lookup failed");
            writeln!(out, "[w] dataset not found")?;
            return Ok(false);
        }
    };

    if key.is_empty() {
        warn!("no columns to compare");
        writeln!(out, "[w] no columns to compare")?;
        return Ok(false);
    }

    let comparison = Comparison::between(key, value_columns, old, current, tracked);
    writeln!(
        out,
        "[i] compare {} to {}",
        comparison.old_version(),
        comparison.current_version()
    )?;
    comparison.write_report(out)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(version: &str, rows: serde_json::Value) -> Snapshot {
        let entries = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().cloned().unwrap())
            .collect();
        Snapshot::new(version, entries)
    }

    #[test]
    fn test_join_orders_current_keys_first() {
        let old = snapshot(
            "v1",
            json!([{"name": "gone", "size": 1}, {"name": "adder", "size": 10}]),
        );
        let cur = snapshot(
            "v2",
            json!([{"name": "adder", "size": 8}, {"name": "new", "size": 5}]),
        );
        let cmp = Comparison::between("name", &["size"], &old, &cur, &["size"]);

        let keys: Vec<_> = cmp.rows().iter().map(|r| r["name"].clone()).collect();
        assert_eq!(keys, vec![json!("adder"), json!("new"), json!("gone")]);
        assert_eq!(cmp.columns(), &["name", "size", "size'"]);
        assert_eq!(cmp.differences_in("size"), Some(1));
    }

    #[test]
    fn test_absent_sides_are_left_out() {
        let old = snapshot("v1", json!([{"name": "gone", "size": 1}]));
        let cur = snapshot("v2", json!([{"name": "new", "size": 5}]));
        let cmp = Comparison::between("name", &["size"], &old, &cur, &["size"]);

        let added = &cmp.rows()[0];
        assert_eq!(added["name"], json!("new"));
        assert_eq!(added["size'"], json!(5));
        assert!(added.get("size").is_none());

        let removed = &cmp.rows()[1];
        assert_eq!(removed["size"], json!(1));
        assert!(removed.get("size'").is_none());

        assert_eq!(cmp.differences_in("size"), Some(0));
    }

    #[test]
    fn test_key_and_unknown_tracked_columns_report_zero() {
        let old = snapshot("v1", json!([{"name": "a", "size": 1}]));
        let cur = snapshot("v2", json!([{"name": "a", "size": 2}]));
        let cmp = Comparison::between("name", &["size"], &old, &cur, &["name", "depth", "name"]);
        assert_eq!(
            cmp.differences(),
            &[("name".to_string(), 0), ("depth".to_string(), 0)]
        );
    }

    #[test]
    fn test_string_and_integer_keys_are_distinct() {
        let old = snapshot("v1", json!([{"id": 1, "ok": true}]));
        let cur = snapshot("v2", json!([{"id": "1", "ok": true}]));
        let cmp = Comparison::between("id", &["ok"], &old, &cur, &["ok"]);
        assert_eq!(cmp.rows().len(), 2);
        assert_eq!(cmp.differences_in("ok"), Some(0));
    }

    #[test]
    fn test_report_lines() {
        let old = snapshot("v1", json!([{"name": "adder", "size": 10}]));
        let cur = snapshot("v2", json!([{"name": "adder", "size": 8}]));
        let cmp = Comparison::between("name", &["size"], &old, &cur, &["size"]);

        let mut out = Vec::new();
        cmp.write_report(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "|  name | size | size' |\n| adder |   10 |     8 |\n[i] 1 differences in column 'size'\n"
        );
    }

    #[test]
    fn test_versions_and_layout() {
        let old = snapshot("base", json!([{"name": "adder", "size": 10, "depth": 3}]));
        let cur = snapshot("head", json!([{"name": "adder", "size": 10, "depth": 2}]));
        let cmp = Comparison::between("name", &["size", "depth"], &old, &cur, &["depth"]);
        assert_eq!(cmp.old_version(), "base");
        assert_eq!(cmp.current_version(), "head");
        assert_eq!(cmp.columns(), &["name", "size", "depth", "size'", "depth'"]);
        assert_eq!(cmp.differences_in("depth"), Some(1));
        assert_eq!(cmp.differences_in("size"), None);
    }

    #[test]
    fn test_compare_explicit_labels_in_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = VersionedLog::load(dir.path().join("c.json")).unwrap();
        for (label, size) in [("v1", 10), ("v2", 8), ("v3", 8)] {
            let rows = snapshot(label, json!([{"name": "adder", "size": size}]));
            log.save(rows.entries().to_vec(), label).unwrap();
        }

        let mut out = Vec::new();
        assert!(compare(&log, "name", &["size"], "v1", "v3", &["size"], &mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[i] compare v1 to v3\n"));
        assert!(text.ends_with("[i] 1 differences in column 'size'\n"));

        let mut out = Vec::new();
        assert!(!compare::<&str, &str, _>(&log, "", &[], "", "", &[], &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "[w] no columns to compare\n");
    }
}
