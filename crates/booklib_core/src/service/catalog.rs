//! SQLite-backed service bundle sharing one connection.

use super::author_service::AuthorService;
use super::book_service::BookService;
use super::category_service::CategoryService;
use crate::repo::author_repo::SqliteAuthorRepository;
use crate::repo::book_repo::SqliteBookRepository;
use crate::repo::category_repo::SqliteCategoryRepository;
use crate::repo::transaction::SqliteTransactionManager;
use rusqlite::Connection;

pub type SqliteAuthorService<'conn> = AuthorService<
    SqliteAuthorRepository<'conn>,
    SqliteBookRepository<'conn>,
    SqliteTransactionManager<'conn>,
>;

pub type SqliteCategoryService<'conn> = CategoryService<
    SqliteCategoryRepository<'conn>,
    SqliteBookRepository<'conn>,
    SqliteTransactionManager<'conn>,
>;

pub type SqliteBookService<'conn> = BookService<
    SqliteBookRepository<'conn>,
    SqliteAuthorRepository<'conn>,
    SqliteCategoryRepository<'conn>,
    SqliteTransactionManager<'conn>,
>;

/// Author, category and book services wired over one borrowed connection.
pub struct Catalog<'conn> {
    pub authors: SqliteAuthorService<'conn>,
    pub categories: SqliteCategoryService<'conn>,
    pub books: SqliteBookService<'conn>,
}

impl<'conn> Catalog<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        let author_repo = SqliteAuthorRepository::new(conn);
        let category_repo = SqliteCategoryRepository::new(conn);
        let book_repo = SqliteBookRepository::new(conn);
        let transactions = SqliteTransactionManager::new(conn);

        Self {
            authors: AuthorService::new(author_repo, book_repo, transactions),
            categories: CategoryService::new(category_repo, book_repo, transactions),
            books: BookService::new(book_repo, author_repo, category_repo, transactions),
        }
    }
}
