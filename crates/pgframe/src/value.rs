//! Scalar SQL values.
//!
//! [`SqlValue`] is the cell type of a [`Frame`](crate::frame::Frame) and the
//! row element returned by a [`Backend`](crate::backend::Backend). It covers
//! the closed scalar set the type mapper understands (integers, floats, text,
//! bool, and the three temporal kinds) plus a few read-side variants a live
//! backend can produce (`Bytes`, `Uuid`, `Decimal`) which deliberately have
//! no type-mapping entry.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A single scalar value moving between a frame and the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL. The single backend-neutral missing-value sentinel.
    Null,

    /// Boolean value.
    Bool(bool),

    /// 32-bit signed integer.
    I32(i32),

    /// 64-bit signed integer.
    I64(i64),

    /// 32-bit floating point.
    F32(f32),

    /// 64-bit floating point.
    F64(f64),

    /// Text data.
    Text(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// UUID value.
    Uuid(Uuid),

    /// Arbitrary-precision decimal value.
    Decimal(Decimal),

    /// Timestamp without timezone.
    Timestamp(NaiveDateTime),

    /// Date without time component.
    Date(NaiveDate),

    /// Time without date component.
    Time(NaiveTime),
}

impl SqlValue {
    /// Check if this value is SQL NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Check if this value is missing: NULL, or a float NaN.
    ///
    /// NaN is the null-like marker frames arrive with; normalization
    /// collapses it to [`SqlValue::Null`] before data reaches the backend,
    /// and type inference skips it when sampling.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::F32(v) => v.is_nan(),
            SqlValue::F64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Short name of this value's runtime kind, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::I32(_) => "i32",
            SqlValue::I64(_) => "i64",
            SqlValue::F32(_) => "f32",
            SqlValue::F64(_) => "f64",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Uuid(_) => "uuid",
            SqlValue::Decimal(_) => "decimal",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Date(_) => "date",
            SqlValue::Time(_) => "time",
        }
    }

    /// Render this value as a SQL literal for a VALUES list.
    ///
    /// Text has single quotes doubled; temporals use ISO forms; non-finite
    /// floats use PostgreSQL's quoted spellings.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(true) => "TRUE".to_string(),
            SqlValue::Bool(false) => "FALSE".to_string(),
            SqlValue::I32(v) => v.to_string(),
            SqlValue::I64(v) => v.to_string(),
            SqlValue::F32(v) => float_literal(f64::from(*v)),
            SqlValue::F64(v) => float_literal(*v),
            SqlValue::Text(v) => format!("'{}'", v.replace('\'', "''")),
            SqlValue::Bytes(v) => {
                let hex: String = v.iter().map(|b| format!("{:02x}", b)).collect();
                format!("'\\x{}'", hex)
            }
            SqlValue::Uuid(v) => format!("'{}'", v),
            SqlValue::Decimal(v) => v.to_string(),
            SqlValue::Timestamp(v) => format!("'{}'", v.format("%Y-%m-%d %H:%M:%S%.f")),
            SqlValue::Date(v) => format!("'{}'", v.format("%Y-%m-%d")),
            SqlValue::Time(v) => format!("'{}'", v.format("%H:%M:%S%.f")),
        }
    }
}

fn float_literal(v: f64) -> String {
    if v.is_nan() {
        "'NaN'".to_string()
    } else if v.is_infinite() {
        if v > 0.0 {
            "'Infinity'".to_string()
        } else {
            "'-Infinity'".to_string()
        }
    } else {
        v.to_string()
    }
}

// From implementations for common types

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::F32(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

/// `None` becomes NULL; `Some(v)` converts like `v`.
impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}
