//! # Trueno-Results: Versioned Benchmark Result Tracking
//!
//! Trueno-Results records benchmark measurements (circuit sizes, areas,
//! runtimes) produced by repeated runs of a tool, keeps a version history of
//! them on disk, and compares any two versions row by row.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Genchi Genbutsu**: Every run is saved, so regressions are observed, not guessed
//! - **Poka-Yoke**: Rows are type-checked against the column schema on append
//! - **Jidoka**: Comparisons count differences per tracked column
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use trueno_results::{row, ColumnType, Config, Experiment};
//!
//! let mut exp = Experiment::builder("mig_rewriting")
//!     .column("benchmark", ColumnType::Str)
//!     .column("size", ColumnType::Int)
//!     .config(Config::from_env())
//!     .build()?;
//!
//! exp.append(row!["adder", 1020])?;
//! exp.append(row!["bar", 3336])?;
//! exp.save_default()?;
//!
//! exp.compare("", "", &["size"], &mut std::io::stdout())?;
//! # Ok::<(), trueno_results::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod benchmarks;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod experiment;
pub mod log;
pub mod schema;
pub mod table;
pub mod value;

pub use compare::Comparison;
pub use config::{Config, USE_DEFAULT_REVISION};
pub use error::{Error, Result};
pub use experiment::{Experiment, ExperimentBuilder};
pub use log::{Entry, Snapshot, VersionedLog};
pub use schema::{Column, Schema};
pub use table::Table;
pub use value::{format_cell, ColumnType, Value};
