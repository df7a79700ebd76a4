//! Integrity-preserving write services.
//!
//! # Responsibility
//! - Orchestrate resolve -> mutate -> persist sequences per entity kind.
//! - Enforce cascade, detach and merge rules above the stores.
//! - Normalize caller-supplied names and titles.
//!
//! # Invariants
//! - Every multi-step write runs inside one store transaction.
//! - Services receive their stores and peers explicitly; no global wiring.

pub mod author_service;
pub mod book_service;
pub mod error;
pub mod owner_service;
pub mod resolver;

use error::ServiceError;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Trims a name/title and collapses inner whitespace runs to one space.
///
/// Returns `InvalidField(field)` when nothing is left.
pub fn normalize_label(value: &str, field: &'static str) -> Result<String, ServiceError> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        return Err(ServiceError::InvalidField(field));
    }
    Ok(collapsed.into_owned())
}
