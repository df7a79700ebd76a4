//! Relationship resolver: raw foreign-key ids to live entities.
//!
//! # Responsibility
//! - Look up submitted category, publisher and author ids.
//! - Report the ids that did not resolve instead of failing on them.
//!
//! # Invariants
//! - Resolution is lenient: an unknown single reference stays unset and an
//!   unknown author id is dropped from the list.
//! - Author ids are de-duplicated; the first occurrence wins the position.
//! - Read-only; callers own the surrounding transaction.

use crate::model::author::Author;
use crate::model::category::Category;
use crate::model::publisher::Publisher;
use crate::model::{AuthorId, CategoryId, EntityKind, PublisherId};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::owner_repo::OwnerRepository;
use crate::repo::RepoResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A submitted id that matched no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    pub kind: EntityKind,
    pub id: i64,
}

/// Outcome of resolving all relationship fields of one book submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLinks {
    pub category: Option<Category>,
    pub publisher: Option<Publisher>,
    pub authors: Vec<Author>,
    /// Submitted ids that were left unset or dropped.
    pub unresolved: Vec<UnresolvedReference>,
}

impl ResolvedLinks {
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category.as_ref().map(|category| category.id)
    }

    pub fn publisher_id(&self) -> Option<PublisherId> {
        self.publisher.as_ref().map(|publisher| publisher.id)
    }

    pub fn author_ids(&self) -> BTreeSet<AuthorId> {
        self.authors.iter().map(|author| author.id).collect()
    }
}

/// Resolves foreign-key ids against the category, publisher and author
/// stores.
pub struct RelationshipResolver<C, P, A> {
    categories: C,
    publishers: P,
    authors: A,
}

impl<C, P, A> RelationshipResolver<C, P, A>
where
    C: OwnerRepository<Category>,
    P: OwnerRepository<Publisher>,
    A: AuthorRepository,
{
    pub fn new(categories: C, publishers: P, authors: A) -> Self {
        Self {
            categories,
            publishers,
            authors,
        }
    }

    pub fn resolve_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.categories.get(id)
    }

    pub fn resolve_publisher(&self, id: PublisherId) -> RepoResult<Option<Publisher>> {
        self.publishers.get(id)
    }

    /// Returns the authors behind `ids` that exist, in submission order.
    pub fn resolve_authors(&self, ids: &[AuthorId]) -> RepoResult<Vec<Author>> {
        let mut seen = BTreeSet::new();
        let mut resolved = Vec::new();
        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(author) = self.authors.get(id)? {
                resolved.push(author);
            }
        }
        Ok(resolved)
    }

    /// Every category a book may reference.
    pub fn categories(&self) -> RepoResult<Vec<Category>> {
        self.categories.list_all()
    }

    /// Every publisher a book may reference.
    pub fn publishers(&self) -> RepoResult<Vec<Publisher>> {
        self.publishers.list_all()
    }

    /// Every author a book may link to.
    pub fn authors(&self) -> RepoResult<Vec<Author>> {
        self.authors.list_all()
    }

    /// Resolves every relationship field of a book submission at once.
    pub fn resolve_links(
        &self,
        category_id: Option<CategoryId>,
        publisher_id: Option<PublisherId>,
        author_ids: &[AuthorId],
    ) -> RepoResult<ResolvedLinks> {
        let mut unresolved = Vec::new();

        let category = match category_id {
            Some(id) => {
                let found = self.resolve_category(id)?;
                if found.is_none() {
                    unresolved.push(UnresolvedReference {
                        kind: EntityKind::Category,
                        id,
                    });
                }
                found
            }
            None => None,
        };

        let publisher = match publisher_id {
            Some(id) => {
                let found = self.resolve_publisher(id)?;
                if found.is_none() {
                    unresolved.push(UnresolvedReference {
                        kind: EntityKind::Publisher,
                        id,
                    });
                }
                found
            }
            None => None,
        };

        let authors = self.resolve_authors(author_ids)?;
        let resolved_ids: BTreeSet<AuthorId> = authors.iter().map(|author| author.id).collect();
        let mut reported = BTreeSet::new();
        for &id in author_ids {
            if !resolved_ids.contains(&id) && reported.insert(id) {
                unresolved.push(UnresolvedReference {
                    kind: EntityKind::Author,
                    id,
                });
            }
        }

        Ok(ResolvedLinks {
            category,
            publisher,
            authors,
            unresolved,
        })
    }
}
