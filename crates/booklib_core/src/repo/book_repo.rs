//! Book data access.
//!
//! # Invariants
//! - `author_id`/`category_id` are written as-is; existence is the book
//!   service's concern.
//! - The detail listing left-joins authors and categories, so a dangling
//!   reference yields empty summary fields rather than dropping the book.

use super::{ensure_changed, executor, RepoError, RepoResult};
use crate::model::author::AuthorSummary;
use crate::model::book::{Book, BookChanges, BookDetail, BookId, BookInput};
use crate::model::category::CategorySummary;
use crate::model::EntityKind;
use crate::search::criteria::{BookLookup, BookSearch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    isbn,
    published_flag,
    author_id,
    category_id,
    created_at,
    updated_at
FROM tb_book";

const BOOK_DETAIL_SELECT_SQL: &str = "SELECT
    b.id,
    b.title,
    b.description,
    b.isbn,
    b.published_flag,
    b.author_id,
    a.name AS author_name,
    a.email AS author_email,
    b.category_id,
    c.name AS category_name,
    c.description AS category_description,
    b.created_at,
    b.updated_at
FROM tb_book b
LEFT JOIN tb_author a ON a.id = b.author_id
LEFT JOIN tb_category c ON c.id = b.category_id
WHERE b.published_flag = 1";

pub trait BookRepository {
    fn create_book(
        &self,
        tx: Option<&Transaction<'_>>,
        input: &BookInput,
        created_at: i64,
    ) -> RepoResult<BookId>;
    fn update_book(
        &self,
        tx: Option<&Transaction<'_>>,
        id: BookId,
        changes: &BookChanges,
    ) -> RepoResult<()>;
    fn delete_book(&self, tx: Option<&Transaction<'_>>, id: BookId) -> RepoResult<()>;
    /// Returns the lowest-id book matching `lookup`.
    fn find_book(&self, lookup: &BookLookup) -> RepoResult<Option<Book>>;
    /// Published books joined with author and category, ordered by id.
    fn list_book_details(&self, search: &BookSearch) -> RepoResult<Vec<BookDetail>>;
}

#[derive(Clone, Copy)]
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(
        &self,
        tx: Option<&Transaction<'_>>,
        input: &BookInput,
        created_at: i64,
    ) -> RepoResult<BookId> {
        let conn = executor(self.conn, tx);
        conn.execute(
            "INSERT INTO tb_book (
                title,
                description,
                isbn,
                published_flag,
                author_id,
                category_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL);",
            params![
                input.title.as_str(),
                input.description.as_str(),
                input.isbn.as_str(),
                bool_to_int(input.published.unwrap_or(false)),
                input.author_id,
                input.category_id,
                created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_book(
        &self,
        tx: Option<&Transaction<'_>>,
        id: BookId,
        changes: &BookChanges,
    ) -> RepoResult<()> {
        let changed = executor(self.conn, tx).execute(
            "UPDATE tb_book
             SET
                title = ?1,
                description = ?2,
                isbn = ?3,
                published_flag = ?4,
                author_id = ?5,
                category_id = ?6,
                updated_at = ?7
             WHERE id = ?8;",
            params![
                changes.title.as_str(),
                changes.description.as_str(),
                changes.isbn.as_str(),
                bool_to_int(changes.published),
                changes.author_id,
                changes.category_id,
                changes.updated_at,
                id,
            ],
        )?;
        ensure_changed(changed, EntityKind::Book, id)
    }

    fn delete_book(&self, tx: Option<&Transaction<'_>>, id: BookId) -> RepoResult<()> {
        let changed = executor(self.conn, tx).execute("DELETE FROM tb_book WHERE id = ?1;", [id])?;
        ensure_changed(changed, EntityKind::Book, id)
    }

    fn find_book(&self, lookup: &BookLookup) -> RepoResult<Option<Book>> {
        let (predicate, value) = lookup.predicate();
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_SELECT_SQL} WHERE {predicate} ORDER BY id ASC LIMIT 1;"
        ))?;

        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn list_book_details(&self, search: &BookSearch) -> RepoResult<Vec<BookDetail>> {
        let mut sql = BOOK_DETAIL_SELECT_SQL.to_string();
        let mut bind_values: Vec<Value> = Vec::new();
        search.apply(&mut sql, &mut bind_values);
        sql.push_str(" ORDER BY b.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_detail_row(row)?);
        }

        Ok(books)
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        isbn: row.get("isbn")?,
        published: parse_published_flag(row.get("published_flag")?)?,
        author_id: row.get("author_id")?,
        category_id: row.get("category_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_book_detail_row(row: &Row<'_>) -> RepoResult<BookDetail> {
    Ok(BookDetail {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        isbn: row.get("isbn")?,
        published: parse_published_flag(row.get("published_flag")?)?,
        author: AuthorSummary {
            id: row.get("author_id")?,
            name: row.get::<_, Option<String>>("author_name")?.unwrap_or_default(),
            email: row.get::<_, Option<String>>("author_email")?.unwrap_or_default(),
        },
        category: CategorySummary {
            id: row.get("category_id")?,
            name: row.get::<_, Option<String>>("category_name")?.unwrap_or_default(),
            description: row
                .get::<_, Option<String>>("category_description")?
                .unwrap_or_default(),
        },
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_published_flag(value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid published_flag value `{other}` in tb_book.published_flag"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
