//! Search and lookup criteria construction.
//!
//! # Responsibility
//! - Turn caller-supplied filters into typed criteria with bind values.
//! - Keep per-field matching rules (case sensitivity, exact vs. substring)
//!   in one place.

pub mod criteria;
