//! Author data access.

use super::{ensure_changed, executor, RepoResult};
use crate::model::author::{Author, AuthorChanges, AuthorId, AuthorInput};
use crate::model::{fold_key, EntityKind};
use crate::search::criteria::{AuthorLookup, NameFilter};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};

const AUTHOR_SELECT_SQL: &str = "SELECT id, name, email, created_at, updated_at FROM tb_author";

/// Repository interface for author persistence.
pub trait AuthorRepository {
    /// Inserts a row with `updated_at = NULL` and returns its id.
    fn create_author(
        &self,
        tx: Option<&Transaction<'_>>,
        input: &AuthorInput,
        created_at: i64,
    ) -> RepoResult<AuthorId>;
    fn update_author(
        &self,
        tx: Option<&Transaction<'_>>,
        id: AuthorId,
        changes: &AuthorChanges,
    ) -> RepoResult<()>;
    fn delete_author(&self, tx: Option<&Transaction<'_>>, id: AuthorId) -> RepoResult<()>;
    fn find_author(&self, lookup: &AuthorLookup) -> RepoResult<Option<Author>>;
    /// Lists authors ordered by id ascending.
    fn list_authors(&self, filter: &NameFilter) -> RepoResult<Vec<Author>>;
}

/// SQLite-backed author repository.
#[derive(Clone, Copy)]
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(
        &self,
        tx: Option<&Transaction<'_>>,
        input: &AuthorInput,
        created_at: i64,
    ) -> RepoResult<AuthorId> {
        let conn = executor(self.conn, tx);
        conn.execute(
            "INSERT INTO tb_author (name, name_folded, email, email_folded, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL);",
            params![
                input.name.as_str(),
                fold_key(&input.name),
                input.email.as_str(),
                fold_key(&input.email),
                created_at
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_author(
        &self,
        tx: Option<&Transaction<'_>>,
        id: AuthorId,
        changes: &AuthorChanges,
    ) -> RepoResult<()> {
        let changed = executor(self.conn, tx).execute(
            "UPDATE tb_author
             SET
                name = ?1,
                name_folded = ?2,
                email = ?3,
                email_folded = ?4,
                updated_at = ?5
             WHERE id = ?6;",
            params![
                changes.name.as_str(),
                fold_key(&changes.name),
                changes.email.as_str(),
                fold_key(&changes.email),
                changes.updated_at,
                id
            ],
        )?;
        ensure_changed(changed, EntityKind::Author, id)
    }

    fn delete_author(&self, tx: Option<&Transaction<'_>>, id: AuthorId) -> RepoResult<()> {
        let changed = executor(self.conn, tx).execute("DELETE FROM tb_author WHERE id = ?1;", [id])?;
        ensure_changed(changed, EntityKind::Author, id)
    }

    fn find_author(&self, lookup: &AuthorLookup) -> RepoResult<Option<Author>> {
        let (predicate, value) = lookup.predicate();
        let mut stmt = self.conn.prepare(&format!(
            "{AUTHOR_SELECT_SQL} WHERE {predicate} ORDER BY id ASC LIMIT 1;"
        ))?;

        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_author_row(row)?));
        }

        Ok(None)
    }

    fn list_authors(&self, filter: &NameFilter) -> RepoResult<Vec<Author>> {
        let mut sql = AUTHOR_SELECT_SQL.to_string();
        let mut bind_values: Vec<Value> = Vec::new();
        filter.apply("name_folded", &mut sql, &mut bind_values);
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }

        Ok(authors)
    }
}

fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    Ok(Author {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
