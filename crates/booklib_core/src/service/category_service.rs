//! Category use-case service.
//!
//! # Invariants
//! - Category names are unique by `fold_key`, checked on create and on
//!   rename.
//! - A category referenced by any book cannot be deleted.

use super::error::{ServiceError, ServiceResult};
use super::{require_id, require_text, track};
use crate::context::RequestContext;
use crate::model::category::{Category, CategoryId, CategoryInput, CategoryPatch};
use crate::model::{fold_key, now_epoch_ms, EntityKind};
use crate::repo::book_repo::BookRepository;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::transaction::{run_in_transaction, TransactionManager};
use crate::search::criteria::{BookLookup, CategoryLookup, NameFilter};

pub struct CategoryService<C, B, T>
where
    C: CategoryRepository,
    B: BookRepository,
    T: TransactionManager,
{
    categories: C,
    books: B,
    transactions: T,
}

impl<C, B, T> CategoryService<C, B, T>
where
    C: CategoryRepository,
    B: BookRepository,
    T: TransactionManager,
{
    pub fn new(categories: C, books: B, transactions: T) -> Self {
        Self {
            categories,
            books,
            transactions,
        }
    }

    pub fn create_category(
        &self,
        ctx: &RequestContext,
        input: CategoryInput,
    ) -> ServiceResult<Category> {
        const OPERATION: &str = "category_create";
        let input = input.trimmed();
        track(ctx, OPERATION, || {
            require_text(&input.name, "category name")?;
            require_text(&input.description, "category description")?;
            self.ensure_name_available(&input.name, None, OPERATION)?;

            let created_at = now_epoch_ms();
            let id = run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.categories.create_category(Some(tx), &input, created_at)
            })
            .map_err(ServiceError::storage(OPERATION))?;

            Ok(Category {
                id,
                name: input.name,
                description: input.description,
                created_at,
                updated_at: None,
            })
        })
    }

    pub fn update_category(
        &self,
        ctx: &RequestContext,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> ServiceResult<Category> {
        const OPERATION: &str = "category_update";
        track(ctx, OPERATION, || {
            require_id(id, "category id")?;
            let current = self.load_category(id, OPERATION)?;
            let changes = current.merge(patch, now_epoch_ms());

            if fold_key(&changes.name) != fold_key(&current.name) {
                self.ensure_name_available(&changes.name, Some(id), OPERATION)?;
            }

            run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.categories.update_category(Some(tx), id, &changes)
            })
            .map_err(ServiceError::storage(OPERATION))?;

            Ok(current.with_changes(&changes))
        })
    }

    pub fn get_category_by_id(
        &self,
        ctx: &RequestContext,
        id: CategoryId,
    ) -> ServiceResult<Category> {
        const OPERATION: &str = "category_get";
        track(ctx, OPERATION, || {
            require_id(id, "category id")?;
            self.load_category(id, OPERATION)
        })
    }

    /// Lists categories ordered by id. A blank filter returns every category.
    pub fn get_all_categories(
        &self,
        ctx: &RequestContext,
        name_filter: &str,
    ) -> ServiceResult<Vec<Category>> {
        const OPERATION: &str = "category_list";
        track(ctx, OPERATION, || {
            self.categories
                .list_categories(&NameFilter::new(name_filter))
                .map_err(ServiceError::storage(OPERATION))
        })
    }

    pub fn delete_category_by_id(&self, ctx: &RequestContext, id: CategoryId) -> ServiceResult<()> {
        const OPERATION: &str = "category_delete";
        track(ctx, OPERATION, || {
            require_id(id, "category id")?;

            let blocking = self
                .books
                .find_book(&BookLookup::CategoryId(id))
                .map_err(ServiceError::storage(OPERATION))?;
            if let Some(book) = blocking {
                return Err(ServiceError::Conflict(format!(
                    "category {id} is referenced by book `{}`; delete the book first",
                    book.title
                )));
            }

            run_in_transaction(&self.transactions, OPERATION, |tx| {
                self.categories.delete_category(Some(tx), id)
            })
            .map_err(ServiceError::storage(OPERATION))
        })
    }

    fn load_category(&self, id: CategoryId, operation: &'static str) -> ServiceResult<Category> {
        self.categories
            .find_category(&CategoryLookup::Id(id))
            .map_err(ServiceError::storage(operation))?
            .ok_or(ServiceError::not_found(EntityKind::Category, id))
    }

    /// Fails with `Conflict` when another category already uses `name`.
    fn ensure_name_available(
        &self,
        name: &str,
        owner: Option<CategoryId>,
        operation: &'static str,
    ) -> ServiceResult<()> {
        let existing = self
            .categories
            .find_category(&CategoryLookup::Name(name.to_string()))
            .map_err(ServiceError::storage(operation))?;

        match existing {
            Some(other) if Some(other.id) != owner => Err(ServiceError::Conflict(format!(
                "category name `{}` is already used by category {}",
                other.name, other.id
            ))),
            _ => Ok(()),
        }
    }
}
