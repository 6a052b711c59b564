//! # pgframe
//!
//! A convenience layer over a PostgreSQL connection: schemas, tables, and
//! columns become navigable objects, and tabular [`Frame`]s move in and out
//! of the database as SQL.
//!
//! - **Navigation** validates every name against the live
//!   `information_schema` catalog before handing out a handle.
//! - **Materialization** turns a frame into a table: column types are
//!   inferred from the first non-null sample of each column, missing values
//!   collapse to SQL NULL, and all rows load with a single multi-row INSERT.
//! - **Statements are transactions**: each execution commits on success and
//!   rolls back on failure; there is no multi-statement transaction surface.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pgframe::{ConnectConfig, Database, Frame, SqlValue};
//!
//! fn main() -> pgframe::Result<()> {
//!     let config = ConnectConfig::new("postgres", "secret").with_database("warehouse");
//!     let db = Database::connect(&config)?;
//!
//!     // Navigate: database -> schema -> table -> frame.
//!     let sales = db.schema("sales")?;
//!     let orders = sales.table("orders")?;
//!     let frame = orders.fetch("*")?;
//!     println!("read {} rows", frame.len());
//!
//!     // Materialize: frame -> table (replace semantics).
//!     let summary = Frame::new()
//!         .with_column("region", vec![SqlValue::from("north"), SqlValue::from("south")])?
//!         .with_column("total", vec![SqlValue::from(412.5), SqlValue::from(97.0)])?;
//!     sales.put_table("summary", &summary)?;
//!
//!     db.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Handles are single-threaded by construction (they are not `Send`): one
//! backend session, synchronous blocking calls, no internal locking, no
//! retries. Sharing a session across simultaneous operations is not
//! supported.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod frame;
pub mod identifier;
pub mod typemap;
pub mod value;

mod materialize;

// Re-exports for convenient access
pub use backend::{Backend, PgBackend, Row};
pub use catalog::Listing;
pub use config::ConnectConfig;
pub use entity::{ColumnRename, ColumnSelection, Database, DropBehavior, Schema, Table};
pub use error::{FrameError, Result};
pub use frame::{Frame, INDEX_COLUMN};
pub use value::SqlValue;
