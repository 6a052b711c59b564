//! The top-level database handle.

use tracing::debug;

use crate::backend::{Backend, Link, PgBackend};
use crate::catalog::{self, Listing};
use crate::config::ConnectConfig;
use crate::entity::Schema;
use crate::error::{FrameError, Result};
use crate::identifier::quote_ident;

/// A connection to one PostgreSQL database, exposing its schemas as
/// navigable objects.
///
/// The database exclusively owns the backend session. Child handles share
/// it by reference; after [`close`](Database::close) every handle fails
/// with [`FrameError::Closed`].
pub struct Database {
    link: Link,
}

impl Database {
    /// Connect to PostgreSQL and wrap the session.
    pub fn connect(config: &ConnectConfig) -> Result<Self> {
        let backend = PgBackend::connect(config)?;
        Ok(Self::from_backend(Box::new(backend)))
    }

    /// Wrap an already-open backend session.
    ///
    /// This is the seam test suites use to substitute a scripted backend.
    #[must_use]
    pub fn from_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            link: Link::new(backend),
        }
    }

    /// All non-system schemas and their tables, from the live catalog.
    pub fn meta(&self) -> Result<Listing> {
        catalog::list_schemas_and_tables(&self.link)
    }

    /// Look up a schema by name.
    ///
    /// Validates existence against the live catalog; fails with
    /// [`FrameError::SchemaNotFound`] if absent.
    pub fn schema(&self, name: &str) -> Result<Schema> {
        if self.meta()?.contains(name) {
            Ok(Schema::new(self.link.clone(), name))
        } else {
            Err(FrameError::SchemaNotFound(name.to_string()))
        }
    }

    /// Create a schema.
    ///
    /// No existence pre-check: an already-existing schema fails at the
    /// backend.
    pub fn create_schema(&self, name: &str) -> Result<()> {
        self.link
            .run(&format!("CREATE SCHEMA {};", quote_ident(name)?))?;
        debug!("Created schema '{}'", name);
        Ok(())
    }

    /// Release the backend session.
    ///
    /// Not called automatically: callers must guarantee release on every
    /// exit path. All handles into this database become unusable.
    pub fn close(&self) -> Result<()> {
        self.link.close()
    }
}
