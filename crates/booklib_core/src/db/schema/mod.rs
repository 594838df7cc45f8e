//! Catalog schema bootstrap.
//!
//! # Responsibility
//! - Create the author/category/book tables on a fresh database.
//! - Reject databases written by a newer schema.
//!
//! # Invariants
//! - Applied schema version is mirrored to `PRAGMA user_version`.
//! - Tables carry no `FOREIGN KEY` clauses; book references stay soft.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const CATALOG_SCHEMA_SQL: &str = include_str!("0001_catalog.sql");

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

/// Table names owned by the catalog schema.
pub const CATALOG_TABLES: [&str; 3] = ["tb_author", "tb_category", "tb_book"];

/// Applies the catalog schema when the database has not been bootstrapped.
pub fn apply_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(CATALOG_SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Reads the schema version recorded in the database header.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
