//! Schema handles.

use tracing::debug;

use crate::backend::Link;
use crate::catalog::{self, Listing};
use crate::entity::Table;
use crate::error::{FrameError, Result};
use crate::frame::Frame;
use crate::identifier::quote_ident;
use crate::materialize;

/// What `DROP SCHEMA` does to dependent objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropBehavior {
    /// Fail if the schema still contains objects.
    Restrict,
    /// Drop contained objects along with the schema.
    Cascade,
}

/// A handle to one schema, identified by a mutable name.
///
/// The name is a cached copy: [`rename`](Schema::rename) updates the server
/// and this handle together, but handles created *before* the rename —
/// including every [`Table`] built through this schema — keep the old name
/// and will address a nonexistent qualified name afterwards. Obtain fresh
/// handles after renaming.
pub struct Schema {
    link: Link,
    name: String,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema").field("name", &self.name).finish()
    }
}

impl Schema {
    pub(crate) fn new(link: Link, name: &str) -> Self {
        Self {
            link,
            name: name.to_string(),
        }
    }

    /// The schema's current cached name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tables of this schema and their columns, from the live catalog.
    pub fn meta(&self) -> Result<Listing> {
        catalog::list_tables_and_columns(&self.link, &self.name)
    }

    /// Look up a table by name.
    ///
    /// Validates existence against the live catalog; fails with
    /// [`FrameError::TableNotFound`] if absent.
    pub fn table(&self, name: &str) -> Result<Table> {
        if self.meta()?.contains(name) {
            Table::open(self.link.clone(), &self.name, name)
        } else {
            Err(FrameError::TableNotFound(name.to_string()))
        }
    }

    /// Materialize a frame as a table named `name`, replacing any existing
    /// table of that name. See [`crate::materialize`] for the pipeline.
    pub fn put_table(&self, name: &str, frame: &Frame) -> Result<()> {
        materialize::put_table(&self.link, &self.name, name, frame)
    }

    /// Rename the schema on the server, then update this handle's name.
    ///
    /// Previously created child handles do not observe the rename.
    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        let sql = format!(
            "ALTER SCHEMA {} RENAME TO {};",
            quote_ident(&self.name)?,
            quote_ident(new_name)?
        );
        self.link.run(&sql)?;
        debug!("Renamed schema '{}' to '{}'", self.name, new_name);
        self.name = new_name.to_string();
        Ok(())
    }

    /// Drop the schema, consuming the handle.
    pub fn delete(self, behavior: DropBehavior) -> Result<()> {
        let sql = match behavior {
            DropBehavior::Restrict => format!("DROP SCHEMA {};", quote_ident(&self.name)?),
            DropBehavior::Cascade => {
                format!("DROP SCHEMA {} CASCADE;", quote_ident(&self.name)?)
            }
        };
        self.link.run(&sql)?;
        debug!("Dropped schema '{}'", self.name);
        Ok(())
    }
}
