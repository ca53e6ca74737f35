//! Command-line inspector for stored result logs
//!
//! Stored logs do not carry their schema, so the column layout is taken from
//! the key order of the snapshot being shown (for a comparison, the current
//! snapshot, then the old one). Empty snapshots fall back to the oldest
//! snapshot holding an entry.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::compare;
use crate::log::{Snapshot, VersionedLog};
use crate::table::Table;

/// Inspect versioned benchmark result logs.
#[derive(Debug, Parser)]
#[command(name = "trueno-results", about)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one snapshot as a table.
    Table {
        /// Result log (JSON).
        file: PathBuf,

        /// Version label (default: most recent snapshot).
        #[arg(long, default_value = "")]
        version: String,
    },
    /// Join two snapshots on the key column and count differences.
    Compare {
        /// Result log (JSON).
        file: PathBuf,

        /// Old version label (default: second-to-last snapshot).
        #[arg(long, default_value = "")]
        old: String,

        /// Current version label (default: last snapshot).
        #[arg(long, default_value = "")]
        current: String,

        /// Column to count differences in (repeatable).
        #[arg(long = "track")]
        track: Vec<String>,
    },
}

/// Run the command described by `args`, writing to `out`.
///
/// Returns the success flag of the underlying operation.
///
/// # Errors
///
/// Returns an error if the log cannot be loaded or `out` cannot be written.
pub fn run<W: Write + ?Sized>(args: Args, out: &mut W) -> Result<bool> {
    match args.command {
        Command::Table { file, version } => {
            let log = load(&file)?;
            table(&log, &version, out)
        }
        Command::Compare {
            file,
            old,
            current,
            track,
        } => {
            let log = load(&file)?;
            let resolved = [
                log.last().and_then(|l| log.find(&current, l).ok()),
                log.previous().and_then(|p| log.find(&old, p).ok()),
            ];
            let preferred: Vec<&Snapshot> = resolved.into_iter().flatten().collect();
            let columns = log.layout(&preferred);
            let (key, value_columns) = columns
                .split_first()
                .map_or(("", &[][..]), |(key, rest)| (key.as_str(), rest));
            Ok(compare::compare(
                &log,
                key,
                value_columns,
                &old,
                &current,
                &track,
                out,
            )?)
        }
    }
}

fn load(file: &Path) -> Result<VersionedLog> {
    VersionedLog::load(file).with_context(|| format!("loading {}", file.display()))
}

fn table<W: Write + ?Sized>(log: &VersionedLog, version: &str, out: &mut W) -> Result<bool> {
    let Some(last) = log.last() else {
        writeln!(out, "[w] no data available")?;
        return Ok(false);
    };
    let Ok(snapshot) = log.find(version, last) else {
        writeln!(out, "[w] version {version} not found")?;
        return Ok(false);
    };
    writeln!(out, "[i] dataset {}", snapshot.version())?;
    Table::new(&log.layout(&[snapshot]), snapshot.entries()).write_to(out)?;
    Ok(true)
}
