//! Catalog domain model.
//!
//! # Responsibility
//! - Define stored records, create inputs, update patches and read models.
//! - Own merge semantics for partial updates.
//!
//! # Invariants
//! - Ids are surrogate integers; `0` never identifies a stored row.
//! - Timestamps are Unix epoch milliseconds.
//! - A patch field is supplied only when it is `Some` and non-blank/non-zero.
//! - Stored text is trimmed; names and emails compare by `fold_key`.

pub mod author;
pub mod book;
pub mod category;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Entity kinds named in error messages and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Category,
    Book,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Category => "category",
            Self::Book => "book",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Case-folded form of a name or email used for comparisons.
///
/// Folds with full Unicode lowercasing, so `École` and `école` share a key.
pub fn fold_key(value: &str) -> String {
    value.trim().to_lowercase()
}

pub(crate) fn trim_text(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Returns the trimmed patch value when it carries content, the stored value
/// otherwise.
pub(crate) fn merge_text(patch: Option<String>, stored: &str) -> String {
    patch
        .filter(|value| !value.trim().is_empty())
        .map(trim_text)
        .unwrap_or_else(|| stored.to_string())
}

pub(crate) fn merge_id(patch: Option<i64>, stored: i64) -> i64 {
    patch.filter(|value| *value != 0).unwrap_or(stored)
}
