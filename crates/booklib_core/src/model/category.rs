//! Category domain model.

use super::{merge_text, trim_text};
use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// Stored category row. `name` is unique case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: String,
    pub description: String,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

impl CategoryInput {
    pub fn trimmed(self) -> Self {
        Self {
            name: trim_text(self.name),
            description: trim_text(self.description),
        }
    }
}

impl Category {
    /// Backfills each omitted field from its own stored value.
    pub fn merge(&self, patch: CategoryPatch, updated_at: i64) -> CategoryChanges {
        CategoryChanges {
            name: merge_text(patch.name, &self.name),
            description: merge_text(patch.description, &self.description),
            updated_at,
        }
    }

    pub fn with_changes(&self, changes: &CategoryChanges) -> Category {
        Category {
            id: self.id,
            name: changes.name.clone(),
            description: changes.description.clone(),
            created_at: self.created_at,
            updated_at: Some(changes.updated_at),
        }
    }

    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}
