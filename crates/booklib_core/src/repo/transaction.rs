//! Transaction coordinator.
//!
//! # Responsibility
//! - Begin, commit and roll back the single transaction of a service write.
//! - Provide a scoped helper that guarantees rollback on error or panic.
//!
//! # Invariants
//! - Transactions start with `BEGIN IMMEDIATE`, taking the write lock up front.
//! - A failed write is rolled back and its original error is returned; a
//!   rollback failure is logged, never substituted for the original error.
//! - A transaction dropped without commit (including during unwinding) rolls
//!   back.

use super::RepoResult;
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Begin/commit/rollback primitive used by every mutating service operation.
pub trait TransactionManager {
    fn begin_transaction(&self) -> RepoResult<Transaction<'_>>;

    fn commit_transaction(&self, tx: Transaction<'_>) -> RepoResult<()> {
        tx.commit()?;
        Ok(())
    }

    fn rollback_transaction(&self, tx: Transaction<'_>) -> RepoResult<()> {
        tx.rollback()?;
        Ok(())
    }
}

/// SQLite transaction manager over a borrowed connection.
#[derive(Clone, Copy)]
pub struct SqliteTransactionManager<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTransactionManager<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TransactionManager for SqliteTransactionManager<'_> {
    fn begin_transaction(&self) -> RepoResult<Transaction<'_>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        Ok(tx)
    }
}

/// Runs `write` inside exactly one transaction.
///
/// Commits when `write` succeeds; rolls back and returns the original error
/// when it fails.
pub fn run_in_transaction<M, T, F>(manager: &M, operation: &str, write: F) -> RepoResult<T>
where
    M: TransactionManager + ?Sized,
    F: FnOnce(&Transaction<'_>) -> RepoResult<T>,
{
    let tx = manager.begin_transaction().map_err(|err| {
        error!("event=tx_begin module=repo status=error operation={operation} error={err}");
        err
    })?;

    match write(&tx) {
        Ok(value) => {
            manager.commit_transaction(tx).map_err(|err| {
                error!("event=tx_commit module=repo status=error operation={operation} error={err}");
                err
            })?;
            debug!("event=tx_commit module=repo status=ok operation={operation}");
            Ok(value)
        }
        Err(err) => {
            warn!("event=tx_rollback module=repo status=start operation={operation} cause={err}");
            if let Err(rollback_err) = manager.rollback_transaction(tx) {
                error!(
                    "event=tx_rollback module=repo status=error operation={operation} error={rollback_err}"
                );
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run_in_transaction, SqliteTransactionManager, TransactionManager};
    use crate::repo::RepoError;
    use rusqlite::Connection;

    fn scratch_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE scratch (value INTEGER NOT NULL);")
            .unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM scratch;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn successful_write_is_committed() {
        let conn = scratch_connection();
        let manager = SqliteTransactionManager::new(&conn);

        let inserted = run_in_transaction(&manager, "scratch_insert", |tx| {
            Ok(tx.execute("INSERT INTO scratch (value) VALUES (1);", [])?)
        })
        .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(count(&conn), 1);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn failed_write_is_rolled_back_and_error_preserved() {
        let conn = scratch_connection();
        let manager = SqliteTransactionManager::new(&conn);

        let err = run_in_transaction(&manager, "scratch_insert", |tx| -> Result<(), RepoError> {
            tx.execute("INSERT INTO scratch (value) VALUES (1);", [])?;
            Err(RepoError::InvalidData("forced".to_string()))
        })
        .unwrap_err();

        assert!(matches!(err, RepoError::InvalidData(ref message) if message == "forced"));
        assert_eq!(count(&conn), 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn panicking_write_leaves_no_open_transaction() {
        let conn = scratch_connection();
        let manager = SqliteTransactionManager::new(&conn);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = run_in_transaction(&manager, "scratch_insert", |tx| -> Result<(), RepoError> {
                tx.execute("INSERT INTO scratch (value) VALUES (1);", [])?;
                panic!("write aborted");
            });
        }));

        assert!(outcome.is_err());
        assert_eq!(count(&conn), 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn nested_begin_is_reported_as_error() {
        let conn = scratch_connection();
        let manager = SqliteTransactionManager::new(&conn);

        let outer = manager.begin_transaction().unwrap();
        let nested = run_in_transaction(&manager, "scratch_insert", |_| Ok(()));
        assert!(matches!(nested, Err(RepoError::Db(_))));

        manager.rollback_transaction(outer).unwrap();
        assert!(conn.is_autocommit());
    }
}
