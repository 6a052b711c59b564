//! In-memory tabular values.
//!
//! A [`Frame`] is an ordered set of named columns, each an ordered sequence
//! of [`SqlValue`] cells, optionally carrying an explicit row index. It is
//! what table reads return and what materialization consumes.

use crate::error::{FrameError, Result};
use crate::value::SqlValue;

/// Name given to a promoted row index column during materialization.
pub const INDEX_COLUMN: &str = "Index";

/// An in-memory table: named columns, ordered rows, optional explicit index.
///
/// All columns (and the index, when present) must have the same length;
/// constructors enforce this and report violations as
/// [`FrameError::InvalidArgument`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Vec<SqlValue>>,
    index: Option<Vec<SqlValue>>,
}

impl Frame {
    /// Create an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named column, consuming and returning the frame.
    ///
    /// Fails if the name is already taken or the length disagrees with the
    /// existing columns/index.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<SqlValue>) -> Result<Self> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(FrameError::InvalidArgument(format!(
                "duplicate column name '{}'",
                name
            )));
        }
        if let Some(expected) = self.expected_len() {
            if values.len() != expected {
                return Err(FrameError::InvalidArgument(format!(
                    "column '{}' has {} values, expected {}",
                    name,
                    values.len(),
                    expected
                )));
            }
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(self)
    }

    /// Build a frame from row-major data.
    ///
    /// Every row must have exactly one cell per column name. Duplicate names
    /// are permitted here: catalog-derived headers offer no uniqueness
    /// guarantee beyond the catalog's own.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Result<Self> {
        let mut columns = vec![Vec::with_capacity(rows.len()); names.len()];
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(FrameError::InvalidArgument(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    names.len()
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell);
            }
        }
        Ok(Self {
            names,
            columns,
            index: None,
        })
    }

    /// Attach an explicit row index.
    ///
    /// Fails if the frame already has columns of a different length.
    pub fn set_index(&mut self, index: Vec<SqlValue>) -> Result<()> {
        if !self.columns.is_empty() && index.len() != self.len() {
            return Err(FrameError::InvalidArgument(format!(
                "index has {} values, expected {}",
                index.len(),
                self.len()
            )));
        }
        self.index = Some(index);
        Ok(())
    }

    /// The explicit row index, if one is set.
    #[must_use]
    pub fn index(&self) -> Option<&[SqlValue]> {
        self.index.as_deref()
    }

    /// Column names, in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expected_len().unwrap_or(0)
    }

    /// Check if the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.names.len()
    }

    /// Cells of the first column with the given name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[SqlValue]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate over `(name, cells)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[SqlValue])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Iterate over rows, cloning cells into row-major form.
    pub fn rows(&self) -> impl Iterator<Item = Vec<SqlValue>> + '_ {
        (0..self.len()).map(move |r| self.columns.iter().map(|c| c[r].clone()).collect())
    }

    /// Return a copy with any explicit index promoted to a leading column
    /// named [`INDEX_COLUMN`]; the original columns keep their relative
    /// order after it. A frame with the default index is returned unchanged.
    #[must_use]
    pub fn promote_index(&self) -> Frame {
        let Some(index) = &self.index else {
            return self.clone();
        };
        let mut names = Vec::with_capacity(self.width() + 1);
        names.push(INDEX_COLUMN.to_string());
        names.extend(self.names.iter().cloned());

        let mut columns = Vec::with_capacity(self.width() + 1);
        columns.push(index.clone());
        columns.extend(self.columns.iter().cloned());

        Frame {
            names,
            columns,
            index: None,
        }
    }

    /// Collapse every missing marker (NULL, float NaN) to [`SqlValue::Null`].
    pub fn normalize_missing(&mut self) {
        for column in &mut self.columns {
            for cell in column {
                if cell.is_missing() {
                    *cell = SqlValue::Null;
                }
            }
        }
        if let Some(index) = &mut self.index {
            for cell in index {
                if cell.is_missing() {
                    *cell = SqlValue::Null;
                }
            }
        }
    }

    fn expected_len(&self) -> Option<usize> {
        if let Some(first) = self.columns.first() {
            Some(first.len())
        } else {
            self.index.as_ref().map(Vec::len)
        }
    }
}
