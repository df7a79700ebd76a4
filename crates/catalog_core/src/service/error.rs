//! Service-level error shared by all write services.

use crate::model::EntityKind;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ServiceError {
    /// Name or title is blank after normalization.
    InvalidField(&'static str),
    /// Target entity does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// A many-to-many link survived a detach pass. Not user-recoverable.
    IntegrityViolation(String),
    /// Store-level failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField(field) => write!(f, "{field} must not be blank"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::IntegrityViolation(details) => write!(f, "integrity violation: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Repo(other),
        }
    }
}
