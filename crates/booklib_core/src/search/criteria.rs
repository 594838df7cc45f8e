//! Lookup keys and list filters consumed by data access.
//!
//! # Invariants
//! - Text keys are folded with `fold_key` and compared against the stored
//!   `*_folded` columns, never through SQLite `lower()`.
//! - Name filters are case-insensitive substring matches with wildcard
//!   characters escaped, so the user term is always literal.
//! - Category name lookups are case-insensitive exact matches.
//! - Book search terms are trimmed, then matched exactly and case-sensitively
//!   across isbn, title and author name.

use crate::model::author::AuthorId;
use crate::model::book::BookId;
use crate::model::category::CategoryId;
use crate::model::fold_key;
use rusqlite::types::Value;

/// Escape character used in every generated `LIKE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Single-row author lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorLookup {
    Id(AuthorId),
    /// Matched case-insensitively.
    Email(String),
}

/// Single-row category lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLookup {
    Id(CategoryId),
    /// Matched case-insensitively and exactly.
    Name(String),
}

/// Single-row book lookup key. Reference keys return the lowest-id match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookLookup {
    Id(BookId),
    AuthorId(AuthorId),
    CategoryId(CategoryId),
}

/// Case-insensitive substring filter over a name column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    term: Option<String>,
}

/// Exact-match search over published books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSearch {
    term: Option<String>,
}

impl AuthorLookup {
    /// Returns the `WHERE` predicate and its bind value.
    pub fn predicate(&self) -> (&'static str, Value) {
        match self {
            Self::Id(id) => ("id = ?1", Value::Integer(*id)),
            Self::Email(email) => ("email_folded = ?1", Value::Text(fold_key(email))),
        }
    }
}

impl CategoryLookup {
    pub fn predicate(&self) -> (&'static str, Value) {
        match self {
            Self::Id(id) => ("id = ?1", Value::Integer(*id)),
            Self::Name(name) => ("name_folded = ?1", Value::Text(fold_key(name))),
        }
    }
}

impl BookLookup {
    pub fn predicate(&self) -> (&'static str, Value) {
        match self {
            Self::Id(id) => ("id = ?1", Value::Integer(*id)),
            Self::AuthorId(id) => ("author_id = ?1", Value::Integer(*id)),
            Self::CategoryId(id) => ("category_id = ?1", Value::Integer(*id)),
        }
    }
}

impl NameFilter {
    /// Blank terms produce an unfiltered listing.
    pub fn new(term: &str) -> Self {
        let trimmed = term.trim();
        Self {
            term: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    /// Appends a ` WHERE` clause to an unfiltered `SELECT` and pushes its
    /// bind value. No-op for an unfiltered listing.
    ///
    /// `folded_column` must hold `fold_key` output.
    pub fn apply(&self, folded_column: &str, sql: &mut String, bind_values: &mut Vec<Value>) {
        if let Some(term) = self.term.as_deref() {
            sql.push_str(&format!(" WHERE {folded_column} LIKE ? ESCAPE '{LIKE_ESCAPE}'"));
            bind_values.push(Value::Text(substring_pattern(term)));
        }
    }
}

impl BookSearch {
    /// Blank terms search every published book.
    pub fn new(term: &str) -> Self {
        let trimmed = term.trim();
        Self {
            term: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Appends ` AND (...)` to a query already filtered on published rows.
    pub fn apply(&self, sql: &mut String, bind_values: &mut Vec<Value>) {
        if let Some(term) = self.term.as_deref() {
            sql.push_str(" AND (b.isbn = ? OR b.title = ? OR a.name = ?)");
            for _ in 0..3 {
                bind_values.push(Value::Text(term.to_string()));
            }
        }
    }
}

/// Builds a lowercase `%term%` pattern with `LIKE` wildcards escaped.
pub fn substring_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in fold_key(term).chars() {
        if ch == '%' || ch == '_' || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
