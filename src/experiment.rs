//! Experiment - row accumulator bound to a versioned log
//!
//! An experiment collects one row per processed benchmark during a run and
//! saves them as a snapshot of its log. Rows stay in memory after a save, so
//! saving again within the same process includes them again.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trueno_results::{row, ColumnType, Config, Experiment};
//!
//! let mut exp = Experiment::builder("rewrite")
//!     .column("benchmark", ColumnType::Str)
//!     .column("size", ColumnType::Int)
//!     .column("runtime", ColumnType::Float)
//!     .column("equivalent", ColumnType::Bool)
//!     .config(Config::from_env())
//!     .build()?;
//!
//! exp.append(row!["adder", 1020, 0.31, true])?;
//! exp.save("v1")?;
//! exp.table("", &mut std::io::stdout())?;
//! exp.compare("", "", &["size"], &mut std::io::stdout())?;
//! # Ok::<(), trueno_results::Error>(())
//! ```

use std::io::Write;

use tracing::{debug, warn};

use crate::compare;
use crate::config::{Config, USE_DEFAULT_REVISION};
use crate::log::{Entry, VersionedLog};
use crate::schema::{Column, Schema};
use crate::table::Table;
use crate::value::{ColumnType, Value};
use crate::Result;

/// Build a row of [`Value`]s from heterogeneous literals.
///
/// ```rust
/// use trueno_results::{row, Value};
///
/// let r = row!["adder", 10, 0.5, true];
/// assert_eq!(r[1], Value::Int(10));
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}

/// Named, schema-typed result table with a persistent version history.
#[derive(Debug)]
pub struct Experiment {
    name: String,
    schema: Schema,
    rows: Vec<Vec<Value>>,
    log: VersionedLog,
}

impl Experiment {
    /// Create an experiment and load its stored history.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored log exists but cannot be read.
    pub fn new(name: impl Into<String>, schema: Schema, config: &Config) -> Result<Self> {
        let name = name.into();
        let log = VersionedLog::open(&name, config)?;
        debug!(experiment = %name, columns = schema.len(), snapshots = log.len(), "opened experiment");
        Ok(Self {
            name,
            schema,
            rows: Vec::new(),
            log,
        })
    }

    /// Create an experiment from parallel lists of column names and types.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] if the name count does not match the
    /// type count, plus any error from [`Experiment::new`].
    pub fn with_columns<S: AsRef<str>>(
        name: impl Into<String>,
        names: &[S],
        kinds: &[ColumnType],
        config: &Config,
    ) -> Result<Self> {
        let schema = Schema::new(names, kinds)?;
        Self::new(name, schema, config)
    }

    /// Create a builder for declaring columns one at a time.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ExperimentBuilder {
        ExperimentBuilder::new(name)
    }

    /// Experiment name (also the storage file stem).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows appended in this process.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Stored version history.
    #[must_use]
    pub const fn log(&self) -> &VersionedLog {
        &self.log
    }

    /// Append one row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Arity`] or [`crate::Error::TypeMismatch`] when
    /// the row does not fit the schema; the row is not stored.
    pub fn append(&mut self, row: Vec<Value>) -> Result<()> {
        self.schema.validate(&row)?;
        self.rows.push(row);
        Ok(())
    }

    /// Serialize every accumulated row into an entry.
    #[must_use]
    pub fn entries(&self) -> Vec<Entry> {
        self.rows
            .iter()
            .map(|row| {
                self.schema
                    .columns()
                    .iter()
                    .map(Column::name)
                    .zip(row)
                    .map(|(name, value)| (name.to_string(), value.to_json()))
                    .collect()
            })
            .collect()
    }

    /// Save the accumulated rows as the snapshot labelled `version`.
    ///
    /// Returns the effective label (see [`Config::resolve_version`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    pub fn save(&mut self, version: &str) -> Result<String> {
        let entries = self.entries();
        self.log.save(entries, version)
    }

    /// Save under the configured default revision.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    pub fn save_default(&mut self) -> Result<String> {
        self.save(USE_DEFAULT_REVISION)
    }

    /// Print a stored snapshot as a table.
    ///
    /// An empty `version` selects the most recent snapshot. Returns
    /// `Ok(false)` after printing a warning when the log is empty or the
    /// version is unknown.
    ///
    /// # Errors
    ///
    /// Only write failures on `out` are returned as errors.
    pub fn table<W: Write + ?Sized>(&self, version: &str, out: &mut W) -> Result<bool> {
        let Some(last) = self.log.last() else {
            warn!(experiment = %self.name, "no data available");
            writeln!(out, "[w] no data available")?;
            return Ok(false);
        };

        match self.log.find(version, last) {
            Ok(snapshot) => {
                writeln!(out, "[i] dataset {}", snapshot.version())?;
                Table::new(&self.schema.names(), snapshot.entries()).write_to(out)?;
                Ok(true)
            }
            Err(e) => {
                warn!(experiment = %self.name, error = %e, "table lookup failed");
                writeln!(out, "[w] version {version} not found")?;
                Ok(false)
            }
        }
    }

    /// Compare two stored snapshots.
    ///
    /// Empty labels default to the second-to-last (`old_version`) and last
    /// (`current_version`) snapshots. See [`compare::compare`].
    ///
    /// # Errors
    ///
    /// Only write failures on `out` are returned as errors.
    pub fn compare<S: AsRef<str>, W: Write + ?Sized>(
        &self,
        old_version: &str,
        current_version: &str,
        tracked: &[S],
        out: &mut W,
    ) -> Result<bool> {
        let value_columns: Vec<&str> = self
            .schema
            .value_columns()
            .iter()
            .map(Column::name)
            .collect();
        compare::compare(
            &self.log,
            self.schema.key().name(),
            &value_columns,
            old_version,
            current_version,
            tracked,
            out,
        )
    }
}

/// Builder for `Experiment`.
#[derive(Debug)]
pub struct ExperimentBuilder {
    name: String,
    columns: Vec<Column>,
    config: Config,
}

impl ExperimentBuilder {
    /// Create a builder with no columns and an empty configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            config: Config::default(),
        }
    }

    /// Declare the next column. The first column is the key column.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, kind: ColumnType) -> Self {
        self.columns.push(Column::new(name, kind));
        self
    }

    /// Set the storage configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the `Experiment`, loading its stored history.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] for an empty or duplicate column list,
    /// plus any error from [`Experiment::new`].
    pub fn build(self) -> Result<Experiment> {
        let schema = Schema::from_columns(self.columns)?;
        Experiment::new(self.name, schema, &self.config)
    }
}
