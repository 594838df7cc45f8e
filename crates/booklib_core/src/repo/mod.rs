//! Data access layer.
//!
//! # Responsibility
//! - Define per-entity data access contracts and their SQLite implementations.
//! - Provide the transaction coordinator used by every service write.
//!
//! # Invariants
//! - Every write accepts an optional transaction; `None` runs in autocommit.
//! - Writes that touch no row report `RepoError::NotFound`.
//! - Repositories never check cross-entity references; services do.

use crate::db::DbError;
use crate::model::EntityKind;
use rusqlite::{Connection, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod book_repo;
pub mod category_repo;
pub mod transaction;

pub type RepoResult<T> = Result<T, RepoError>;

/// Data access error shared by all catalog repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: EntityKind, id: i64 },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Picks the connection a statement runs on: the open transaction when one
/// is supplied, the repository connection otherwise.
fn executor<'a>(conn: &'a Connection, tx: Option<&'a Transaction<'_>>) -> &'a Connection {
    match tx {
        Some(tx) => &**tx,
        None => conn,
    }
}

fn ensure_changed(changed: usize, entity: EntityKind, id: i64) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}
