//! Column schema for result rows
//!
//! The first declared column is the key column: it identifies a unit of work
//! (usually a benchmark name) and is the join key when two versions are compared.

use rustc_hash::FxHashSet;

use crate::value::{ColumnType, Value};
use crate::{Error, Result};

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    kind: ColumnType,
}

impl Column {
    /// Create a column.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared column type.
    #[must_use]
    pub const fn kind(&self) -> ColumnType {
        self.kind
    }
}

/// Ordered, non-empty list of uniquely named columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema from parallel lists of column names and types.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the lists differ in length, are empty,
    /// or contain a duplicate name.
    pub fn new<S: AsRef<str>>(names: &[S], kinds: &[ColumnType]) -> Result<Self> {
        if names.len() != kinds.len() {
            return Err(Error::Schema(format!(
                "number of column names ({}) must match column types ({})",
                names.len(),
                kinds.len()
            )));
        }
        Self::from_columns(
            names
                .iter()
                .zip(kinds)
                .map(|(name, kind)| Column::new(name.as_ref(), *kind))
                .collect(),
        )
    }

    /// Build a schema from already-paired columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if `columns` is empty or names repeat.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Schema(
                "at least one column must be specified".to_string(),
            ));
        }
        let mut seen = FxHashSet::default();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(Error::Schema(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }
        Ok(Self { columns })
    }

    /// The key column (first declared column).
    #[must_use]
    pub fn key(&self) -> &Column {
        &self.columns[0]
    }

    /// All columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Non-key columns in declaration order.
    #[must_use]
    pub fn value_columns(&self) -> &[Column] {
        &self.columns[1..]
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; a schema has at least one column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check a row against the schema (arity, then positional types).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arity`] or [`Error::TypeMismatch`].
    pub fn validate(&self, row: &[Value]) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Arity {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(row) {
            if value.column_type() != column.kind {
                return Err(Error::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.kind.name(),
                    got: value.column_type().name(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_schema() -> Schema {
        Schema::new(&["name", "size"], &[ColumnType::Str, ColumnType::Int]).unwrap()
    }

    #[test]
    fn test_schema_key_is_first_column() {
        let schema = size_schema();
        assert_eq!(schema.key().name(), "name");
        assert_eq!(schema.value_columns().len(), 1);
        assert_eq!(schema.names(), vec!["name", "size"]);
    }

    #[test]
    fn test_schema_count_mismatch() {
        let err = Schema::new(&["name"], &[ColumnType::Str, ColumnType::Int]).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_schema_rejects_empty_and_duplicates() {
        let empty: [&str; 0] = [];
        assert!(matches!(Schema::new(&empty, &[]), Err(Error::Schema(_))));
        assert!(matches!(
            Schema::new(&["a", "a"], &[ColumnType::Int, ColumnType::Int]),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_validate_row() {
        let schema = size_schema();
        assert!(schema.validate(&["adder".into(), 10.into()]).is_ok());
        assert!(matches!(
            schema.validate(&["adder".into()]),
            Err(Error::Arity { expected: 2, got: 1 })
        ));
        let err = schema.validate(&["adder".into(), 1.5.into()]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref column, .. } if column == "size"));
    }
}
