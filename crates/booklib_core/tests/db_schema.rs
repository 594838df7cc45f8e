use booklib_core::db::schema::{CATALOG_TABLES, SCHEMA_VERSION};
use booklib_core::db::{open_configured, open_db, open_db_in_memory, DbError};
use booklib_core::{CoreConfig, DatabaseLocation};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_catalog_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    for table in CATALOG_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn book_table_has_no_foreign_keys() {
    let conn = open_db_in_memory().unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_foreign_key_list('tb_book');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn book_rows_may_reference_missing_authors_at_storage_level() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO tb_book (title, description, isbn, published_flag, author_id, category_id, created_at)
         VALUES ('Orphan', 'no author', '1', 1, 404, 405, 0);",
        [],
    )
    .unwrap();
}

#[test]
fn published_flag_rejects_values_other_than_zero_or_one() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute(
        "INSERT INTO tb_book (title, description, isbn, published_flag, author_id, category_id, created_at)
         VALUES ('Bad', 'flag', '1', 2, 1, 1, 0);",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("booklib.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO tb_author (name, name_folded, email, email_folded, created_at) VALUES ('Jane Doe', 'jane doe', 'jane@example.com', 'jane@example.com', 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), SCHEMA_VERSION);
    let authors: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM tb_author;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(authors, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_configured_honors_file_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let config = CoreConfig {
        database: DatabaseLocation::File(path.clone()),
        ..CoreConfig::in_memory()
    };

    let conn = open_configured(&config).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    drop(conn);
    assert!(path.exists());
}

#[test]
fn open_configured_honors_memory_location() {
    let conn = open_configured(&CoreConfig::in_memory()).unwrap();
    assert_table_exists(&conn, "tb_book");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
