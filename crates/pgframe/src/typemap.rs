//! Runtime-type to SQL-type mapping for table creation.
//!
//! A column's SQL type is inferred from the value at its first non-missing
//! position — a leading null never decides a type, and a fully missing
//! column has no type at all. The mapping table is closed on purpose:
//! anything outside it is a hard failure rather than a silent `text`
//! fallback that would corrupt round-tripping.

use crate::error::{FrameError, Result};
use crate::value::SqlValue;

/// SQL type name for a sampled value, or `None` when the variant has no
/// mapping entry.
///
/// Each temporal kind maps independently: a date is never widened to a
/// timestamp, nor the reverse.
#[must_use]
pub fn sql_type_of(value: &SqlValue) -> Option<&'static str> {
    match value {
        SqlValue::I32(_) | SqlValue::I64(_) => Some("int"),
        SqlValue::F32(_) | SqlValue::F64(_) => Some("real"),
        SqlValue::Text(_) => Some("text"),
        SqlValue::Bool(_) => Some("bool"),
        SqlValue::Timestamp(_) => Some("timestamp"),
        SqlValue::Date(_) => Some("date"),
        SqlValue::Time(_) => Some("time"),
        SqlValue::Null
        | SqlValue::Bytes(_)
        | SqlValue::Uuid(_)
        | SqlValue::Decimal(_) => None,
    }
}

/// Infer the SQL column type for `values`, sampling the first non-missing
/// cell.
///
/// Fails with [`FrameError::UndefinedType`] when every cell is missing and
/// with [`FrameError::UnmappedType`] when the sample's variant has no
/// mapping entry.
pub fn infer_sql_type(column: &str, values: &[SqlValue]) -> Result<&'static str> {
    let sample = values
        .iter()
        .find(|v| !v.is_missing())
        .ok_or_else(|| FrameError::UndefinedType {
            column: column.to_string(),
        })?;

    sql_type_of(sample).ok_or_else(|| FrameError::UnmappedType {
        column: column.to_string(),
        kind: sample.kind(),
    })
}
