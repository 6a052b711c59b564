//! Identifier validation and quoting.
//!
//! SQL identifiers (schema, table, and column names) cannot be passed as
//! parameters in prepared statements — only data values can. Every piece of
//! dynamic SQL this library builds therefore goes through these functions:
//! identifiers are validated for suspicious content, then quoted with
//! PostgreSQL double-quote rules.

use crate::error::{FrameError, Result};

/// Maximum identifier length accepted before quoting.
///
/// PostgreSQL truncates identifiers at 63 bytes; anything longer is a caller
/// mistake that would silently address a different object.
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate an identifier for use in dynamic SQL.
///
/// Rejects empty identifiers, identifiers containing NUL bytes, and
/// identifiers exceeding [`MAX_IDENTIFIER_LENGTH`] bytes.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FrameError::InvalidArgument(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(FrameError::InvalidArgument(format!(
            "identifier contains a NUL byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(FrameError::InvalidArgument(format!(
            "identifier exceeds {} bytes (got {}): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a PostgreSQL identifier.
///
/// Escapes embedded double quotes by doubling them and wraps the result in
/// double quotes. Validates the identifier first.
pub fn quote_ident(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Qualify a table name with its schema, both quoted.
pub fn qualify(schema: &str, table: &str) -> Result<String> {
    Ok(format!("{}.{}", quote_ident(schema)?, quote_ident(table)?))
}

/// Quote a string value as a SQL literal (single quotes doubled).
///
/// Used for catalog predicates (`WHERE table_schema = '…'`) where the value
/// is a name, not untrusted row data.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
