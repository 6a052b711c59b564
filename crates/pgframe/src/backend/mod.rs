//! The relational backend seam.
//!
//! [`Backend`] is the capability the entity objects are written against:
//! execute a statement inside its own transaction, and close the session.
//! The production implementation is [`PgBackend`]; test suites supply their
//! own scripted implementations.

mod postgres;

pub use self::postgres::PgBackend;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{FrameError, Result};
use crate::value::SqlValue;

/// One result row: the cells of a fetched row, in result-column order.
pub type Row = Vec<SqlValue>;

/// A live session with a relational backend.
///
/// Each `execute` call is its own transaction: committed on success, rolled
/// back on failure with the original error re-signaled unchanged. Pass
/// `expect_rows = false` for DDL and INSERT statements (the SQL may contain
/// several `;`-separated statements); `expect_rows = true` only for
/// statements that produce a result set — using it against a rowless
/// statement is a caller error surfaced by the backend.
///
/// Sessions are released only by an explicit [`close`](Backend::close); a
/// closed session fails every subsequent call with [`FrameError::Closed`].
pub trait Backend {
    /// Execute `sql` in its own transaction.
    fn execute(&mut self, sql: &str, expect_rows: bool) -> Result<Option<Vec<Row>>>;

    /// Release the underlying session.
    fn close(&mut self) -> Result<()>;
}

/// Shared handle to the one backend session a [`Database`](crate::Database)
/// owns.
///
/// Child entities clone the handle instead of borrowing the database. The
/// interior `RefCell` provides no locking: handles are not `Send`, and
/// single-threaded use is the documented contract.
#[derive(Clone)]
pub(crate) struct Link {
    backend: Rc<RefCell<Box<dyn Backend>>>,
}

impl Link {
    pub(crate) fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend: Rc::new(RefCell::new(backend)),
        }
    }

    /// Execute a result-producing statement.
    pub(crate) fn fetch(&self, sql: &str) -> Result<Vec<Row>> {
        self.backend
            .borrow_mut()
            .execute(sql, true)?
            .ok_or_else(|| {
                FrameError::Backend("statement produced no result set".to_string())
            })
    }

    /// Execute one or more rowless statements.
    pub(crate) fn run(&self, sql: &str) -> Result<()> {
        self.backend.borrow_mut().execute(sql, false)?;
        Ok(())
    }

    pub(crate) fn close(&self) -> Result<()> {
        self.backend.borrow_mut().close()
    }
}
