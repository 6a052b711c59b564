//! Table handles.

use tracing::debug;

use crate::backend::Link;
use crate::catalog;
use crate::error::{FrameError, Result};
use crate::frame::Frame;
use crate::identifier::{qualify, quote_ident};

/// Which columns a [`Table::fetch`] reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Every column, in live catalog order.
    All,
    /// The named columns, in the given order. Every name must exist.
    Columns(Vec<String>),
}

impl From<&str> for ColumnSelection {
    /// `"*"` selects all columns; any other string selects that one column.
    fn from(name: &str) -> Self {
        if name == "*" {
            ColumnSelection::All
        } else {
            ColumnSelection::Columns(vec![name.to_string()])
        }
    }
}

impl From<String> for ColumnSelection {
    fn from(name: String) -> Self {
        ColumnSelection::from(name.as_str())
    }
}

impl From<Vec<String>> for ColumnSelection {
    fn from(names: Vec<String>) -> Self {
        ColumnSelection::Columns(names)
    }
}

impl From<Vec<&str>> for ColumnSelection {
    fn from(names: Vec<&str>) -> Self {
        ColumnSelection::Columns(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ColumnSelection {
    fn from(names: &[&str]) -> Self {
        ColumnSelection::Columns(names.iter().map(|n| n.to_string()).collect())
    }
}

/// A bulk column rename, in one of two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRename {
    /// New names paired positionally with the live catalog order.
    /// Positions where the name is unchanged are skipped.
    Positional(Vec<String>),
    /// `(old, new)` pairs. Every old name must currently exist; identical
    /// pairs are skipped.
    Mapping(Vec<(String, String)>),
}

/// A handle to one table, identified by `(schema name, table name)`.
///
/// The column list is cached at construction; [`columns`](Table::columns)
/// is that point-in-time snapshot and never refreshes, while
/// [`meta`](Table::meta) is the authoritative live read. The schema name is
/// likewise a copy: it goes stale if the schema is renamed afterwards.
pub struct Table {
    link: Link,
    schema: String,
    name: String,
    columns: Vec<String>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("schema", &self.schema)
            .field("name", &self.name)
            .field("columns", &self.columns)
            .finish()
    }
}

impl Table {
    pub(crate) fn open(link: Link, schema: &str, name: &str) -> Result<Self> {
        let columns = catalog::list_columns_and_types(&link, schema, name)?
            .into_iter()
            .map(|(column, _)| column)
            .collect();
        Ok(Self {
            link,
            schema: schema.to_string(),
            name: name.to_string(),
            columns,
        })
    }

    /// The table's current cached name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema name this handle was created under.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Column names cached when this handle was constructed.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Live column names and data types, in ordinal position order.
    pub fn meta(&self) -> Result<Vec<(String, String)>> {
        catalog::list_columns_and_types(&self.link, &self.schema, &self.name)
    }

    /// Read columns into a frame.
    ///
    /// Accepts a single name, `"*"`, or a sequence of names. Named columns
    /// are validated against the live catalog and returned in the requested
    /// order; `"*"` returns every column in catalog order.
    pub fn fetch(&self, selection: impl Into<ColumnSelection>) -> Result<Frame> {
        let live: Vec<String> = self.meta()?.into_iter().map(|(column, _)| column).collect();

        let (sql, headers) = match selection.into() {
            ColumnSelection::All => (format!("SELECT * FROM {}", self.qualified()?), live),
            ColumnSelection::Columns(names) => {
                for name in &names {
                    if !live.contains(name) {
                        return Err(FrameError::ColumnNotFound(name.clone()));
                    }
                }
                let columns: Vec<String> = names
                    .iter()
                    .map(|name| quote_ident(name))
                    .collect::<Result<_>>()?;
                (
                    format!("SELECT {} FROM {}", columns.join(", "), self.qualified()?),
                    names,
                )
            }
        };

        let rows = self.link.fetch(&sql)?;
        Frame::from_rows(headers, rows)
    }

    /// Run a custom query built from a trailing clause (`WHERE`, `ORDER BY`,
    /// …, or empty).
    ///
    /// The query always enumerates the live column list explicitly — never
    /// `SELECT *` — so the result columns are authoritative.
    pub fn select(&self, clause: &str) -> Result<Frame> {
        let live: Vec<String> = self.meta()?.into_iter().map(|(column, _)| column).collect();
        let columns: Vec<String> = live
            .iter()
            .map(|name| quote_ident(name))
            .collect::<Result<_>>()?;

        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), self.qualified()?);
        let clause = clause.trim();
        if !clause.is_empty() {
            sql.push(' ');
            sql.push_str(clause);
        }

        let rows = self.link.fetch(&sql)?;
        Frame::from_rows(live, rows)
    }

    /// Rename the table on the server, then update this handle's name.
    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} RENAME TO {};",
            self.qualified()?,
            quote_ident(new_name)?
        );
        self.link.run(&sql)?;
        debug!(
            "Renamed table {}.{} to {}",
            self.schema, self.name, new_name
        );
        self.name = new_name.to_string();
        Ok(())
    }

    /// Rename columns in bulk.
    ///
    /// All changed names batch into a single execution; a rename set where
    /// nothing changes executes no statement at all. The cached
    /// [`columns`](Table::columns) snapshot is not refreshed.
    pub fn rename_columns(&mut self, rename: ColumnRename) -> Result<()> {
        let live: Vec<String> = self.meta()?.into_iter().map(|(column, _)| column).collect();
        let pairs = changed_pairs(&live, rename)?;

        if pairs.is_empty() {
            debug!("No column renames needed for {}.{}", self.schema, self.name);
            return Ok(());
        }

        let qualified = self.qualified()?;
        let statements: Vec<String> = pairs
            .iter()
            .map(|(old, new)| {
                Ok(format!(
                    "ALTER TABLE {} RENAME COLUMN {} TO {};",
                    qualified,
                    quote_ident(old)?,
                    quote_ident(new)?
                ))
            })
            .collect::<Result<_>>()?;

        self.link.run(&statements.join(" "))?;
        debug!(
            "Renamed {} columns on {}.{}",
            pairs.len(),
            self.schema,
            self.name
        );
        Ok(())
    }

    /// Drop the table, consuming the handle.
    pub fn delete(self) -> Result<()> {
        self.link
            .run(&format!("DROP TABLE {};", self.qualified()?))?;
        debug!("Dropped table {}.{}", self.schema, self.name);
        Ok(())
    }

    fn qualified(&self) -> Result<String> {
        qualify(&self.schema, &self.name)
    }
}

/// Resolve a rename request against the live column order, dropping
/// unchanged pairs.
fn changed_pairs(live: &[String], rename: ColumnRename) -> Result<Vec<(String, String)>> {
    match rename {
        ColumnRename::Positional(new_names) => Ok(live
            .iter()
            .zip(new_names)
            .filter(|(old, new)| old.as_str() != new.as_str())
            .map(|(old, new)| (old.clone(), new))
            .collect()),
        ColumnRename::Mapping(pairs) => {
            for (old, _) in &pairs {
                if !live.contains(old) {
                    return Err(FrameError::ColumnNotFound(old.clone()));
                }
            }
            Ok(pairs
                .into_iter()
                .filter(|(old, new)| old != new)
                .collect())
        }
    }
}
