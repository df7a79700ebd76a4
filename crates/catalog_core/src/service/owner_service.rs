//! Category and publisher write service.
//!
//! # Responsibility
//! - Create, rename, delete and look up book owners.
//!
//! # Invariants
//! - `update` merges: the persisted book list is copied onto the incoming
//!   payload, so a rename can never drop book associations.
//! - `update` on an unknown id is a no-op.
//! - `delete` cascades to owned books and is idempotent.

use super::error::ServiceError;
use super::normalize_label;
use crate::model::category::Category;
use crate::model::publisher::Publisher;
use crate::model::BookOwner;
use crate::repo::owner_repo::{CascadeDelete, OwnerRepository};
use crate::repo::{RepoResult, TransactionScope};
use log::info;
use std::marker::PhantomData;

/// Service for one owner kind.
pub struct OwnerService<O, R> {
    repo: R,
    _owner: PhantomData<O>,
}

/// Category service.
pub type CategoryService<R> = OwnerService<Category, R>;
/// Publisher service.
pub type PublisherService<R> = OwnerService<Publisher, R>;

impl<O, R> OwnerService<O, R>
where
    O: BookOwner,
    R: OwnerRepository<O> + TransactionScope,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _owner: PhantomData,
        }
    }

    pub fn create(&self, name: &str) -> Result<O, ServiceError> {
        let name = normalize_label(name, "name")?;
        Ok(self.repo.insert(&name)?)
    }

    /// Applies the scalar fields of `incoming`, keeping persisted books.
    ///
    /// Returns `None` without writing anything when the id is unknown.
    pub fn update(&self, incoming: &O) -> Result<Option<O>, ServiceError> {
        let name = normalize_label(incoming.name(), "name")?;
        let kind = O::KIND;

        let updated = self.repo.atomically(|| -> Result<Option<O>, ServiceError> {
            let Some(existing) = self.repo.get(incoming.id())? else {
                return Ok(None);
            };
            let merged = O::from_parts(incoming.id(), name, existing.books().to_vec());
            Ok(Some(self.repo.update(&merged)?))
        })?;

        match &updated {
            Some(owner) => info!(
                "event={kind}_update module=service status=ok id={} books={}",
                owner.id(),
                owner.books().len()
            ),
            None => info!(
                "event={kind}_update module=service status=skipped reason=not_found id={}",
                incoming.id()
            ),
        }
        Ok(updated)
    }

    /// Deletes the owner and every book referencing it.
    ///
    /// Deleting an unknown id succeeds and changes nothing.
    pub fn delete(&self, id: i64) -> Result<CascadeDelete, ServiceError> {
        let outcome = self.repo.delete_by_id(id)?;
        info!(
            "event={}_delete module=service status=ok id={id} removed={} cascaded_books={}",
            O::KIND,
            outcome.removed,
            outcome.cascaded_books.len()
        );
        Ok(outcome)
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<O>> {
        self.repo.get(id)
    }

    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<O>> {
        self.repo.find_by_name(name)
    }

    pub fn list_all(&self) -> RepoResult<Vec<O>> {
        self.repo.list_all()
    }
}
