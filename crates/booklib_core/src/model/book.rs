//! Book domain model.
//!
//! # Invariants
//! - `author_id`/`category_id` are soft references; existence is checked by
//!   the book service, never by storage.
//! - `BookPatch::published` is tri-state: `None` keeps the stored flag,
//!   `Some(false)` explicitly unpublishes.

use super::author::{AuthorId, AuthorSummary};
use super::category::{CategoryId, CategorySummary};
use super::{merge_id, merge_text, trim_text};
use serde::{Deserialize, Serialize};

pub type BookId = i64;

/// Stored book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub description: String,
    pub isbn: String,
    pub published: bool,
    pub author_id: AuthorId,
    pub category_id: CategoryId,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Create request for a book. `published` defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub description: String,
    pub isbn: String,
    #[serde(default)]
    pub published: Option<bool>,
    pub author_id: AuthorId,
    pub category_id: CategoryId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub published: Option<bool>,
    pub author_id: Option<AuthorId>,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookChanges {
    pub title: String,
    pub description: String,
    pub isbn: String,
    pub published: bool,
    pub author_id: AuthorId,
    pub category_id: CategoryId,
    pub updated_at: i64,
}

/// Book read model with its author and category embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    pub id: BookId,
    pub title: String,
    pub description: String,
    pub isbn: String,
    pub published: bool,
    pub author: AuthorSummary,
    pub category: CategorySummary,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl BookInput {
    /// Strips surrounding whitespace from the text fields.
    pub fn trimmed(self) -> Self {
        Self {
            title: trim_text(self.title),
            description: trim_text(self.description),
            isbn: trim_text(self.isbn),
            ..self
        }
    }
}

impl Book {
    pub fn merge(&self, patch: BookPatch, updated_at: i64) -> BookChanges {
        BookChanges {
            title: merge_text(patch.title, &self.title),
            description: merge_text(patch.description, &self.description),
            isbn: merge_text(patch.isbn, &self.isbn),
            published: patch.published.unwrap_or(self.published),
            author_id: merge_id(patch.author_id, self.author_id),
            category_id: merge_id(patch.category_id, self.category_id),
            updated_at,
        }
    }

    pub fn with_changes(&self, changes: &BookChanges) -> Book {
        Book {
            id: self.id,
            title: changes.title.clone(),
            description: changes.description.clone(),
            isbn: changes.isbn.clone(),
            published: changes.published,
            author_id: changes.author_id,
            category_id: changes.category_id,
            created_at: self.created_at,
            updated_at: Some(changes.updated_at),
        }
    }

    /// Assembles the composite read model from fully resolved references.
    pub fn into_detail(self, author: AuthorSummary, category: CategorySummary) -> BookDetail {
        BookDetail {
            id: self.id,
            title: self.title,
            description: self.description,
            isbn: self.isbn,
            published: self.published,
            author,
            category,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
