//! Catalog reads over `information_schema`.
//!
//! Three queries produce the name listings everything else validates
//! against: schemas to tables, tables to columns, and columns to types.
//! Column listings come back in ordinal position order — that order is
//! authoritative for column caches, `*` reads, and row reattachment.

use tracing::debug;

use crate::backend::{Link, Row};
use crate::error::{FrameError, Result};
use crate::identifier::quote_literal;
use crate::value::SqlValue;

/// An order-preserving mapping from a parent name to its child names.
///
/// Duplicate `(parent, child)` pairs are appended, never deduplicated —
/// callers must not assume uniqueness beyond what the catalog itself
/// guarantees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    entries: Vec<(String, Vec<String>)>,
}

impl Listing {
    /// Create an empty listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child under a parent, creating the parent entry on first use.
    pub fn push(&mut self, parent: &str, child: impl Into<String>) {
        let child = child.into();
        match self.entries.iter_mut().find(|(name, _)| name == parent) {
            Some((_, children)) => children.push(child),
            None => self.entries.push((parent.to_string(), vec![child])),
        }
    }

    /// Ensure a parent entry exists, even with no children.
    pub fn ensure(&mut self, parent: &str) {
        if !self.contains(parent) {
            self.entries.push((parent.to_string(), Vec::new()));
        }
    }

    /// Children of a parent, in arrival order.
    #[must_use]
    pub fn get(&self, parent: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == parent)
            .map(|(_, children)| children.as_slice())
    }

    /// Check whether a parent name is present.
    #[must_use]
    pub fn contains(&self, parent: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == parent)
    }

    /// Parent names, in arrival order.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(parent, children)` entries in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, children)| (name.as_str(), children.as_slice()))
    }

    /// Number of parent entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the listing has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All non-system schemas and their tables, ordered by schema then table.
///
/// Schemas are read from `information_schema.schemata` so that a schema
/// with no tables still appears (with an empty child list) and stays
/// navigable right after `CREATE SCHEMA`.
pub(crate) fn list_schemas_and_tables(link: &Link) -> Result<Listing> {
    let sql = "SELECT s.schema_name, t.table_name \
               FROM information_schema.schemata s \
               LEFT JOIN information_schema.tables t \
               ON t.table_schema = s.schema_name \
               WHERE s.schema_name != 'pg_catalog' \
               AND s.schema_name != 'information_schema' \
               ORDER BY s.schema_name ASC, t.table_name ASC";

    let rows = link.fetch(sql)?;
    let mut listing = Listing::new();
    for row in &rows {
        let schema = text_at(row, 0)?;
        match row.get(1) {
            Some(SqlValue::Text(table)) => listing.push(&schema, table.clone()),
            // NULL table_name: the schema exists but holds no tables.
            _ => listing.ensure(&schema),
        }
    }

    debug!("Catalog lists {} schemas", listing.len());
    Ok(listing)
}

/// Tables of one schema and their columns, ordered by table name then
/// column ordinal position.
pub(crate) fn list_tables_and_columns(link: &Link, schema: &str) -> Result<Listing> {
    let sql = format!(
        "SELECT table_name, column_name \
         FROM information_schema.columns \
         WHERE table_schema = {} \
         ORDER BY table_name ASC, ordinal_position ASC",
        quote_literal(schema)
    );

    let rows = link.fetch(&sql)?;
    let mut listing = Listing::new();
    for row in &rows {
        let table = text_at(row, 0)?;
        listing.push(&table, text_at(row, 1)?);
    }
    Ok(listing)
}

/// Columns of one table and their data types, in ordinal position order.
pub(crate) fn list_columns_and_types(
    link: &Link,
    schema: &str,
    table: &str,
) -> Result<Vec<(String, String)>> {
    let sql = format!(
        "SELECT column_name, data_type \
         FROM information_schema.columns \
         WHERE table_schema = {} \
         AND table_name = {} \
         ORDER BY ordinal_position ASC",
        quote_literal(schema),
        quote_literal(table)
    );

    let rows = link.fetch(&sql)?;
    rows.iter()
        .map(|row| Ok((text_at(row, 0)?, text_at(row, 1)?)))
        .collect()
}

fn text_at(row: &Row, idx: usize) -> Result<String> {
    match row.get(idx) {
        Some(SqlValue::Text(s)) => Ok(s.clone()),
        other => Err(FrameError::Backend(format!(
            "catalog query returned a non-text value at position {}: {:?}",
            idx, other
        ))),
    }
}
