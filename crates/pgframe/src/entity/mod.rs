//! Entity objects: in-process handles for catalog objects.
//!
//! A [`Database`] owns the backend session; [`Schema`] and [`Table`] handles
//! are created on demand by name lookups that validate against the live
//! catalog, and hold a shared reference back to the session. Handles are
//! cheap and never cached — obtain a fresh one whenever staleness matters.

mod database;
mod schema;
mod table;

pub use database::Database;
pub use schema::{DropBehavior, Schema};
pub use table::{ColumnRename, ColumnSelection, Table};
