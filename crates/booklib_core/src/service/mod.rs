//! Catalog use-case services.
//!
//! # Responsibility
//! - Validate input and run read-only precondition checks.
//! - Enforce cross-entity referential integrity that storage does not.
//! - Execute each write as exactly one transaction.
//!
//! # Invariants
//! - All checks run before the transaction opens.
//! - Every operation logs its outcome with the request id and duration.

use crate::context::RequestContext;
use log::{debug, error, warn};
use std::time::Instant;

pub mod author_service;
pub mod book_service;
pub mod catalog;
pub mod category_service;
pub mod error;

use error::{ServiceError, ServiceErrorKind, ServiceResult};

/// Runs one service operation and logs how it ended.
pub(crate) fn track<T, F>(ctx: &RequestContext, operation: &'static str, run: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T>,
{
    let started_at = Instant::now();
    let result = run();
    let duration_ms = started_at.elapsed().as_millis();
    let request_id = ctx.request_id();

    match &result {
        Ok(_) => debug!(
            "event={operation} module=service status=ok request_id={request_id} duration_ms={duration_ms}"
        ),
        Err(err) if err.kind() == ServiceErrorKind::Storage => error!(
            "event={operation} module=service status=error request_id={request_id} duration_ms={duration_ms} error_kind=storage error={err}"
        ),
        Err(err) => warn!(
            "event={operation} module=service status=rejected request_id={request_id} duration_ms={duration_ms} error_kind={:?} error={err}",
            err.kind()
        ),
    }

    result
}

pub(crate) fn require_id(id: i64, field: &str) -> ServiceResult<()> {
    if id == 0 {
        return Err(ServiceError::validation(format!("{field} must not be zero")));
    }
    Ok(())
}

pub(crate) fn require_text(value: &str, field: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}
