//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure the busy timeout used to serialize concurrent writers.
//! - Apply the catalog schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have the catalog schema applied.

use super::schema::apply_schema;
use super::{DbError, DbResult};
use crate::config::{CoreConfig, DatabaseLocation};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file with the default busy timeout.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
}

/// Opens a SQLite database file and applies the catalog schema.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    open_with("file", busy_timeout, || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies the catalog schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", DEFAULT_BUSY_TIMEOUT, Connection::open_in_memory)
}

/// Opens the database described by `config`.
pub fn open_configured(config: &CoreConfig) -> DbResult<Connection> {
    match &config.database {
        DatabaseLocation::File(path) => open_db_with_timeout(path, config.busy_timeout),
        DatabaseLocation::Memory => open_with("memory", config.busy_timeout, Connection::open_in_memory),
    }
}

fn open_with<F>(mode: &str, busy_timeout: Duration, open: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    let opened = open()
        .map_err(|err| ("db_open_failed", DbError::from(err)))
        .and_then(|mut conn| {
            bootstrap_connection(&mut conn, busy_timeout)
                .map(|()| conn)
                .map_err(|err| ("db_bootstrap_failed", err))
        });
    let duration_ms = started_at.elapsed().as_millis();

    match opened {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} busy_timeout_ms={} duration_ms={duration_ms}",
                busy_timeout.as_millis()
            );
            Ok(conn)
        }
        Err((error_code, err)) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error_code={error_code} error={err}"
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.busy_timeout(busy_timeout)?;
    apply_schema(conn)?;
    Ok(())
}
