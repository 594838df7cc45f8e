//! Author use-case service.
//!
//! # Invariants
//! - An author referenced by any book cannot be deleted.
//! - Updates merge omitted fields from the stored row.
//! - Name and email are stored trimmed.

use super::error::{ServiceError, ServiceResult};
use super::{require_id, require_text, track};
use crate::context::RequestContext;
use crate::model::author::{Author, AuthorId, AuthorInput, AuthorPatch};
use crate::model::{now_epoch_ms, EntityKind};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::BookRepository;
use crate::repo::transaction::{run_in_transaction, TransactionManager};
use crate::search::criteria::{AuthorLookup, BookLookup, NameFilter};

/// Author service facade over repository implementations.
pub struct AuthorService<A, B, T>
where
    A: AuthorRepository,
    B: BookRepository,
    T: TransactionManager,
{
    authors: A,
    books: B,
    transactions: T,
}

impl<A, B, T> AuthorService<A, B, T>
where
    A: AuthorRepository,
    B: BookRepository,
    T: TransactionManager,
{
    pub fn new(authors: A, books: B, transactions: T) -> Self {
        Self {
            authors,
            books,
            transactions,
        }
    }

    pub fn create_author(&self, ctx: &RequestContext, input: AuthorInput) -> ServiceResult<Author> {
        const OPERATION: &str = "author_create";
        let input = input.trimmed();
        track(ctx, OPERATION, || {
            require_text(&input.name, "author name")?;
            require_text(&input.email, "author email")?;

            let created_at = now_epoch_ms();
            let id = run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.authors.create_author(Some(tx), &input, created_at)
            })
            .map_err(ServiceError::storage(OPERATION))?;

            Ok(Author {
                id,
                name: input.name,
                email: input.email,
                created_at,
                updated_at: None,
            })
        })
    }

    /// Applies `patch` over the stored author; omitted fields keep their values.
    pub fn update_author(
        &self,
        ctx: &RequestContext,
        id: AuthorId,
        patch: AuthorPatch,
    ) -> ServiceResult<Author> {
        const OPERATION: &str = "author_update";
        track(ctx, OPERATION, || {
            require_id(id, "author id")?;
            let current = self.load_author(id, OPERATION)?;
            let changes = current.merge(patch, now_epoch_ms());

            run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.authors.update_author(Some(tx), id, &changes)
            })
            .map_err(ServiceError::storage(OPERATION))?;

            Ok(current.with_changes(&changes))
        })
    }

    pub fn get_author_by_id(&self, ctx: &RequestContext, id: AuthorId) -> ServiceResult<Author> {
        const OPERATION: &str = "author_get";
        track(ctx, OPERATION, || {
            require_id(id, "author id")?;
            self.load_author(id, OPERATION)
        })
    }

    /// Looks an author up by email, ignoring case and surrounding whitespace.
    pub fn get_author_by_email(&self, ctx: &RequestContext, email: &str) -> ServiceResult<Author> {
        const OPERATION: &str = "author_get_by_email";
        track(ctx, OPERATION, || {
            require_text(email, "author email")?;
            let email = email.trim();
            self.authors
                .find_author(&AuthorLookup::Email(email.to_string()))
                .map_err(ServiceError::storage(OPERATION))?
                .ok_or_else(|| ServiceError::NotFoundByKey {
                    entity: EntityKind::Author,
                    key: email.to_string(),
                })
        })
    }

    /// Lists authors ordered by id. A blank filter returns every author.
    pub fn get_all_authors(
        &self,
        ctx: &RequestContext,
        name_filter: &str,
    ) -> ServiceResult<Vec<Author>> {
        const OPERATION: &str = "author_list";
        track(ctx, OPERATION, || {
            self.authors
                .list_authors(&NameFilter::new(name_filter))
                .map_err(ServiceError::storage(OPERATION))
        })
    }

    pub fn delete_author_by_id(&self, ctx: &RequestContext, id: AuthorId) -> ServiceResult<()> {
        const OPERATION: &str = "author_delete";
        track(ctx, OPERATION, || {
            require_id(id, "author id")?;

            let blocking = self
                .books
                .find_book(&BookLookup::AuthorId(id))
                .map_err(ServiceError::storage(OPERATION))?;
            if let Some(book) = blocking {
                return Err(ServiceError::Conflict(format!(
                    "author {id} is referenced by book `{}`; delete the book first",
                    book.title
                )));
            }

            run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.authors.delete_author(Some(tx), id)
            })
            .map_err(ServiceError::storage(OPERATION))
        })
    }

    fn load_author(&self, id: AuthorId, operation: &'static str) -> ServiceResult<Author> {
        self.authors
            .find_author(&AuthorLookup::Id(id))
            .map_err(ServiceError::storage(operation))?
            .ok_or(ServiceError::not_found(EntityKind::Author, id))
    }
}
