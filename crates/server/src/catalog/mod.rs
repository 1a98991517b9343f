//! Catalog business logic on top of the storage primitives.
//!
//! - [`ProductRepository`] - product CRUD with slug/id generation
//! - [`CategoryRegistry`] - category and mode sub-category lifecycle
//!   (create, rename with merge, delete with reassignment)

pub mod categories;
pub mod products;

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

pub use categories::CategoryRegistry;
pub use products::ProductRepository;

/// Errors surfaced by catalog operations.
///
/// The HTTP layer maps these onto status codes: validation 400, blocked
/// deletion 409, namespace conflicts 409, storage failures 500.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Missing or invalid input.
    #[error("{0}")]
    Validation(String),

    /// Deletion blocked: the category still has products and no
    /// replacement was supplied.
    #[error("{0}")]
    NeedsReplacement(String),

    /// Name collides across the category/sub-category namespaces.
    #[error("{0}")]
    Conflict(String),

    /// Storage failed underneath.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a create call; `created` is false when the name already
/// existed (the call is then a no-op).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOutcome {
    pub created: bool,
    pub name: String,
}

/// Result of a delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Products moved to the replacement category.
    pub reassigned: u64,
}

/// Result of a rename call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    /// Products moved to the new name.
    pub reassigned: u64,
    /// The new name already existed, so the two categories merged.
    pub merged: bool,
}
