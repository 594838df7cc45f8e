//! Typed failures returned by catalog services.

use crate::model::EntityKind;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level error surfaced to the delivery layer.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed or missing input. Caller error, not retryable.
    Validation(String),
    /// A referenced row does not exist.
    NotFound { entity: EntityKind, id: i64 },
    /// A row looked up by a secondary key does not exist.
    NotFoundByKey { entity: EntityKind, key: String },
    /// Integrity violation: duplicate name or delete blocked by a dependent.
    Conflict(String),
    /// Data access failure, including transaction begin/commit/rollback.
    Storage {
        operation: &'static str,
        source: RepoError,
    },
}

/// Coarse error classification for callers that map errors to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            Self::Validation(_) => ServiceErrorKind::Validation,
            Self::NotFound { .. } | Self::NotFoundByKey { .. } => ServiceErrorKind::NotFound,
            Self::Conflict(_) => ServiceErrorKind::Conflict,
            Self::Storage { .. } => ServiceErrorKind::Storage,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Wraps a data access failure with the operation that hit it. A write
    /// that raced with a delete surfaces as `NotFound`.
    pub(crate) fn storage(operation: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| match source {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            source => Self::Storage { operation, source },
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::NotFoundByKey { entity, key } => write!(f, "{entity} not found: `{key}`"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::Storage { operation, source } => {
                write!(f, "storage failure during {operation}: {source}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ServiceError, ServiceErrorKind};
    use crate::model::EntityKind;
    use crate::repo::RepoError;
    use std::error::Error;

    #[test]
    fn storage_wrapper_keeps_original_cause() {
        let err = ServiceError::storage("author_create")(RepoError::InvalidData(
            "bad row".to_string(),
        ));

        assert_eq!(err.kind(), ServiceErrorKind::Storage);
        assert!(err.to_string().contains("author_create"));
        assert!(err.source().unwrap().to_string().contains("bad row"));
    }

    #[test]
    fn storage_wrapper_maps_missing_row_to_not_found() {
        let err = ServiceError::storage("book_update")(RepoError::NotFound {
            entity: EntityKind::Book,
            id: 9,
        });

        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: EntityKind::Book,
                id: 9
            }
        ));
        assert_eq!(err.to_string(), "book not found: 9");
    }
}
