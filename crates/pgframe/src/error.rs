//! Error types for the library.

use thiserror::Error;

/// Main error type for all operations.
#[derive(Error, Debug)]
pub enum FrameError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Driver-level failure from the PostgreSQL client.
    ///
    /// The statement's transaction has already been rolled back; the
    /// original driver error is carried unchanged.
    #[error("Backend error: {0}")]
    Driver(#[from] postgres::Error),

    /// Statement rejected by a non-driver backend (re-signaled after rollback).
    #[error("Backend error: {0}")]
    Backend(String),

    /// The connection was explicitly closed and cannot be used again.
    #[error("Connection is closed")]
    Closed,

    /// Schema name absent from the live catalog.
    #[error("The '{0}' schema does not exist")]
    SchemaNotFound(String),

    /// Table name absent from the live catalog.
    #[error("The '{0}' table does not exist")]
    TableNotFound(String),

    /// Column name absent from the table's live column list.
    #[error("The '{0}' column does not exist in this table")]
    ColumnNotFound(String),

    /// A column contains no non-null values, so no SQL type can be inferred.
    #[error("Column '{column}' has no non-null values; its SQL type is undefined")]
    UndefinedType { column: String },

    /// A sampled value has no entry in the type mapping table.
    ///
    /// Intentionally a hard failure: a silent fallback to text would
    /// corrupt round-tripping.
    #[error("No SQL type mapping for a {kind} value in column '{column}'")]
    UnmappedType { column: String, kind: &'static str },

    /// Malformed caller input (frame shape violations and the like).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error (file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, FrameError>;
