//! The table-materialization pipeline.
//!
//! Turns a [`Frame`] into a live table: replace any existing table of the
//! same name, promote a non-default index, infer column types, emit
//! `CREATE TABLE`, normalize missing values, and load every row with one
//! multi-row `INSERT`.

use tracing::debug;

use crate::backend::Link;
use crate::catalog;
use crate::error::Result;
use crate::frame::Frame;
use crate::identifier::{qualify, quote_ident};
use crate::typemap::infer_sql_type;
use crate::value::SqlValue;

/// Materialize `frame` as `schema.name`, replacing any existing table.
///
/// Type inference runs before any statement is sent, so an undefined or
/// unmapped column type fails with the catalog untouched. The CREATE and the
/// INSERT each commit in their own transaction: a failing INSERT leaves the
/// already-committed empty table behind. That asymmetry is part of the
/// contract, not an oversight.
pub(crate) fn put_table(link: &Link, schema: &str, name: &str, frame: &Frame) -> Result<()> {
    let mut staged = frame.promote_index();

    let mut columns = Vec::with_capacity(staged.width());
    for (column, values) in staged.columns() {
        columns.push((column.to_string(), infer_sql_type(column, values)?));
    }

    if catalog::list_tables_and_columns(link, schema)?.contains(name) {
        link.run(&format!("DROP TABLE {};", qualify(schema, name)?))?;
        debug!("Dropped existing table {}.{}", schema, name);
    }

    link.run(&build_create_table(schema, name, &columns)?)?;
    debug!("Created table {}.{}", schema, name);

    staged.normalize_missing();

    if staged.is_empty() {
        debug!("No rows to insert into {}.{}", schema, name);
        return Ok(());
    }

    let row_count = staged.len();
    link.run(&build_insert(schema, name, &staged)?)?;
    debug!("Inserted {} rows into {}.{}", row_count, schema, name);

    Ok(())
}

/// Build the `CREATE TABLE` statement from inferred column types.
fn build_create_table(
    schema: &str,
    table: &str,
    columns: &[(String, &'static str)],
) -> Result<String> {
    let defs: Vec<String> = columns
        .iter()
        .map(|(name, sql_type)| Ok(format!("{} {}", quote_ident(name)?, sql_type)))
        .collect::<Result<_>>()?;

    Ok(format!(
        "CREATE TABLE {} ({});",
        qualify(schema, table)?,
        defs.join(", ")
    ))
}

/// Build one multi-row `INSERT` covering every row of the frame.
fn build_insert(schema: &str, table: &str, frame: &Frame) -> Result<String> {
    let columns: Vec<String> = frame
        .names()
        .iter()
        .map(|name| quote_ident(name))
        .collect::<Result<_>>()?;

    let tuples: Vec<String> = frame
        .rows()
        .map(|row| {
            let values: Vec<String> = row.iter().map(SqlValue::to_sql_literal).collect();
            format!("({})", values.join(", "))
        })
        .collect();

    Ok(format!(
        "INSERT INTO {} ({}) VALUES {};",
        qualify(schema, table)?,
        columns.join(", "),
        tuples.join(", ")
    ))
}
