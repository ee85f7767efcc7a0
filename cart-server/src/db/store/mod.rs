//! Cart and catalog database operations
//!
//! Every function takes `&mut SqliteConnection` so callers decide the
//! transaction scope: the engine runs each of its operations inside a
//! single transaction and threads the connection through these helpers.

pub mod cart;
pub mod catalog;

pub use cart::*;
pub use catalog::*;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// True when the error is a SQLite unique index violation.
///
/// Used by the engine to tell "another writer beat us to it" apart from
/// real infrastructure failures.
pub(crate) fn is_unique_violation(err: &BoxError) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db))
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}
