//! Book use-case service.
//!
//! # Responsibility
//! - Validate book input and verify its author/category references.
//! - Compose the detail read model from the book and its references.
//!
//! # Invariants
//! - References are checked on create, and on update when they change.
//! - `get_book_by_id` never returns a partially populated detail.
//! - Listing only returns published books.

use super::error::{ServiceError, ServiceResult};
use super::{require_id, require_text, track};
use crate::context::RequestContext;
use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookDetail, BookId, BookInput, BookPatch};
use crate::model::category::{Category, CategoryId};
use crate::model::{now_epoch_ms, EntityKind};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::BookRepository;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::transaction::{run_in_transaction, TransactionManager};
use crate::search::criteria::{AuthorLookup, BookLookup, BookSearch, CategoryLookup};

/// Book service facade over repository implementations.
pub struct BookService<B, A, C, T>
where
    B: BookRepository,
    A: AuthorRepository,
    C: CategoryRepository,
    T: TransactionManager,
{
    books: B,
    authors: A,
    categories: C,
    transactions: T,
}

impl<B, A, C, T> BookService<B, A, C, T>
where
    B: BookRepository,
    A: AuthorRepository,
    C: CategoryRepository,
    T: TransactionManager,
{
    pub fn new(books: B, authors: A, categories: C, transactions: T) -> Self {
        Self {
            books,
            authors,
            categories,
            transactions,
        }
    }

    /// Creates one book. `published` defaults to `false` when omitted.
    pub fn create_book(&self, ctx: &RequestContext, input: BookInput) -> ServiceResult<Book> {
        const OPERATION: &str = "book_create";
        let input = input.trimmed();
        track(ctx, OPERATION, || {
            require_id(input.author_id, "author id")?;
            require_id(input.category_id, "category id")?;
            require_text(&input.title, "book title")?;
            require_text(&input.description, "book description")?;
            require_text(&input.isbn, "book isbn")?;

            self.load_author(input.author_id, OPERATION)?;
            self.load_category(input.category_id, OPERATION)?;

            let created_at = now_epoch_ms();
            let id = run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.books.create_book(Some(tx), &input, created_at)
            })
            .map_err(ServiceError::storage(OPERATION))?;

            Ok(Book {
                id,
                title: input.title,
                description: input.description,
                isbn: input.isbn,
                published: input.published.unwrap_or(false),
                author_id: input.author_id,
                category_id: input.category_id,
                created_at,
                updated_at: None,
            })
        })
    }

    /// Applies `patch` over the stored book; omitted fields keep their values
    /// and `published: None` keeps the stored flag.
    pub fn update_book(
        &self,
        ctx: &RequestContext,
        id: BookId,
        patch: BookPatch,
    ) -> ServiceResult<Book> {
        const OPERATION: &str = "book_update";
        track(ctx, OPERATION, || {
            require_id(id, "book id")?;
            let current = self.load_book(id, OPERATION)?;
            let changes = current.merge(patch, now_epoch_ms());

            if changes.author_id != current.author_id {
                self.load_author(changes.author_id, OPERATION)?;
            }
            if changes.category_id != current.category_id {
                self.load_category(changes.category_id, OPERATION)?;
            }

            run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.books.update_book(Some(tx), id, &changes)
            })
            .map_err(ServiceError::storage(OPERATION))?;

            Ok(current.with_changes(&changes))
        })
    }

    /// Loads a book with its author and category.
    ///
    /// A reference whose row is gone fails with `NotFound` for that entity.
    pub fn get_book_by_id(&self, ctx: &RequestContext, id: BookId) -> ServiceResult<BookDetail> {
        const OPERATION: &str = "book_get";
        track(ctx, OPERATION, || {
            require_id(id, "book id")?;
            let book = self.load_book(id, OPERATION)?;
            let author = self.load_author(book.author_id, OPERATION)?;
            let category = self.load_category(book.category_id, OPERATION)?;
            Ok(book.into_detail(author.summary(), category.summary()))
        })
    }

    /// Lists published books ordered by id.
    ///
    /// A non-blank `search_term` must equal the isbn, the title or the
    /// author name exactly, after trimming.
    pub fn get_all_books(
        &self,
        ctx: &RequestContext,
        search_term: &str,
    ) -> ServiceResult<Vec<BookDetail>> {
        const OPERATION: &str = "book_list";
        track(ctx, OPERATION, || {
            self.books
                .list_book_details(&BookSearch::new(search_term))
                .map_err(ServiceError::storage(OPERATION))
        })
    }

    pub fn delete_book_by_id(&self, ctx: &RequestContext, id: BookId) -> ServiceResult<()> {
        const OPERATION: &str = "book_delete";
        track(ctx, OPERATION, || {
            require_id(id, "book id")?;
            run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.books.delete_book(Some(tx), id)
            })
            .map_err(ServiceError::storage(OPERATION))
        })
    }

    fn load_book(&self, id: BookId, operation: &'static str) -> ServiceResult<Book> {
        self.books
            .find_book(&BookLookup::Id(id))
            .map_err(ServiceError::storage(operation))?
            .ok_or(ServiceError::not_found(EntityKind::Book, id))
    }

    fn load_author(&self, id: AuthorId, operation: &'static str) -> ServiceResult<Author> {
        self.authors
            .find_author(&AuthorLookup::Id(id))
            .map_err(ServiceError::storage(operation))?
            .ok_or(ServiceError::not_found(EntityKind::Author, id))
    }

    fn load_category(&self, id: CategoryId, operation: &'static str) -> ServiceResult<Category> {
        self.categories
            .find_category(&CategoryLookup::Id(id))
            .map_err(ServiceError::storage(operation))?
            .ok_or(ServiceError::not_found(EntityKind::Category, id))
    }
}
