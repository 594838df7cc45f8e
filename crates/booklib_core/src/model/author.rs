//! Author domain model.

use super::{merge_text, trim_text};
use serde::{Deserialize, Serialize};

pub type AuthorId = i64;

/// Stored author row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    /// Secondary lookup key, compared case-insensitively.
    pub email: String,
    pub created_at: i64,
    /// `None` until the first committed update.
    pub updated_at: Option<i64>,
}

/// Create request for an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInput {
    pub name: String,
    pub email: String,
}

/// Partial update for an author. Omitted or empty fields keep stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Full field set written by the repository on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorChanges {
    pub name: String,
    pub email: String,
    pub updated_at: i64,
}

/// Author fields embedded in book read models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: AuthorId,
    pub name: String,
    pub email: String,
}

impl AuthorInput {
    /// Strips surrounding whitespace from every field.
    pub fn trimmed(self) -> Self {
        Self {
            name: trim_text(self.name),
            email: trim_text(self.email),
        }
    }
}

impl Author {
    /// Backfills omitted patch fields from this stored row.
    pub fn merge(&self, patch: AuthorPatch, updated_at: i64) -> AuthorChanges {
        AuthorChanges {
            name: merge_text(patch.name, &self.name),
            email: merge_text(patch.email, &self.email),
            updated_at,
        }
    }

    /// Returns the row as it reads after `changes` are committed.
    pub fn with_changes(&self, changes: &AuthorChanges) -> Author {
        Author {
            id: self.id,
            name: changes.name.clone(),
            email: changes.email.clone(),
            created_at: self.created_at,
            updated_at: Some(changes.updated_at),
        }
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Author, AuthorPatch};

    fn stored() -> Author {
        Author {
            id: 4,
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            created_at: 100,
            updated_at: None,
        }
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let patch = AuthorPatch {
            email: Some("jane@y.com".to_string()),
            ..AuthorPatch::default()
        };
        let changes = stored().merge(patch, 200);

        assert_eq!(changes.name, "Jane Doe");
        assert_eq!(changes.email, "jane@y.com");
        assert_eq!(changes.updated_at, 200);
    }

    #[test]
    fn with_changes_preserves_identity_and_creation_time() {
        let author = stored();
        let changes = author.merge(
            AuthorPatch {
                name: Some("J. Doe".to_string()),
                email: Some(String::new()),
            },
            300,
        );
        let updated = author.with_changes(&changes);

        assert_eq!(updated.id, 4);
        assert_eq!(updated.name, "J. Doe");
        assert_eq!(updated.email, "jane@x.com");
        assert_eq!(updated.created_at, 100);
        assert_eq!(updated.updated_at, Some(300));
    }

    #[test]
    fn patch_deserializes_with_missing_fields() {
        let patch: AuthorPatch = serde_json::from_str(r#"{"name":"Only Name"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Only Name"));
        assert_eq!(patch.email, None);
    }
}
