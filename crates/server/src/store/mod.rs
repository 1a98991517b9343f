//! Catalog persistence.
//!
//! Two interchangeable backends behind one enum, selected once at
//! startup from [`StorageConfig`](crate::config::StorageConfig) and
//! injected through the application state:
//!
//! - [`SqlStore`] - managed `PostgreSQL` (production path)
//! - [`FileStore`] - flat JSON files under a data directory (dev/fallback)
//!
//! Both expose the same primitives with the same semantics; everything
//! above this layer (repository, registry, handlers) is backend-blind.

pub mod file;
pub mod sql;

use luxury_market_core::{Product, Universe};
use thiserror::Error;

pub use file::FileStore;
pub use sql::SqlStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// File system error on the JSON file backend.
    #[error("file storage error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization of stored data failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in storage does not match the expected shape.
    #[error("data corruption: {0}")]
    Corrupt(String),
}

/// The two name registries kept next to the product records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    /// Free-form categories created in the admin panel.
    Categories,
    /// Clothing sub-categories of the `mode` universe.
    ModeSubcategories,
}

impl RegistryKind {
    /// JSON file name on the file backend.
    const fn file_name(self) -> &'static str {
        match self {
            Self::Categories => "categories.json",
            Self::ModeSubcategories => "mode-subcategories.json",
        }
    }

    /// Table name on the SQL backend.
    const fn table_name(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::ModeSubcategories => "mode_subcategories",
        }
    }
}

/// Storage backend handle, cheap to clone.
#[derive(Clone)]
pub enum Store {
    Sql(SqlStore),
    File(FileStore),
}

impl Store {
    /// All products, in stable storage order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on SQL failures; file-read problems on the
    /// file backend are treated as an empty dataset.
    pub async fn load_products(&self) -> Result<Vec<Product>, StoreError> {
        match self {
            Self::Sql(sql) => sql.load_products().await,
            Self::File(file) => file.load_products().await,
        }
    }

    /// Products of one universe.
    ///
    /// # Errors
    ///
    /// See [`Store::load_products`].
    pub async fn load_products_by_universe(
        &self,
        universe: Universe,
    ) -> Result<Vec<Product>, StoreError> {
        let products = self.load_products().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.universe == universe)
            .collect())
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// See [`Store::load_products`].
    pub async fn find_product_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        match self {
            Self::Sql(sql) => sql.find_product_by_id(id).await,
            Self::File(file) => file.find_product_by_id(id).await,
        }
    }

    /// Look up a product by slug.
    ///
    /// # Errors
    ///
    /// See [`Store::load_products`].
    pub async fn find_product_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError> {
        match self {
            Self::Sql(sql) => sql.find_product_by_slug(slug).await,
            Self::File(file) => file.find_product_by_slug(slug).await,
        }
    }

    /// Persist a freshly created product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        match self {
            Self::Sql(sql) => sql.insert_product(product).await,
            Self::File(file) => file.insert_product(product).await,
        }
    }

    /// Overwrite an existing product record (matched by id).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        match self {
            Self::Sql(sql) => sql.update_product(product).await,
            Self::File(file) => file.update_product(product).await,
        }
    }

    /// Remove a product; `false` when the id was unknown.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn delete_product(&self, id: &str) -> Result<bool, StoreError> {
        match self {
            Self::Sql(sql) => sql.delete_product(id).await,
            Self::File(file) => file.delete_product(id).await,
        }
    }

    /// Number of products whose category is exactly `category`.
    ///
    /// # Errors
    ///
    /// See [`Store::load_products`].
    pub async fn count_products_by_category(&self, category: &str) -> Result<u64, StoreError> {
        match self {
            Self::Sql(sql) => sql.count_products_by_category(category).await,
            Self::File(file) => file.count_products_by_category(category).await,
        }
    }

    /// Bulk-move every product from `old` to `new`; returns the count.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn replace_category(&self, old: &str, new: &str) -> Result<u64, StoreError> {
        match self {
            Self::Sql(sql) => sql.replace_category(old, new).await,
            Self::File(file) => file.replace_category(old, new).await,
        }
    }

    /// Explicitly registered names of one registry, deduped and sorted.
    ///
    /// # Errors
    ///
    /// See [`Store::load_products`].
    pub async fn registered_names(&self, kind: RegistryKind) -> Result<Vec<String>, StoreError> {
        match self {
            Self::Sql(sql) => sql.registered_names(kind).await,
            Self::File(file) => file.registered_names(kind).await,
        }
    }

    /// Add a name to a registry (idempotent).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn register_name(&self, kind: RegistryKind, name: &str) -> Result<(), StoreError> {
        match self {
            Self::Sql(sql) => sql.register_name(kind, name).await,
            Self::File(file) => file.register_name(kind, name).await,
        }
    }

    /// Remove a name from a registry (idempotent).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn unregister_name(&self, kind: RegistryKind, name: &str) -> Result<(), StoreError> {
        match self {
            Self::Sql(sql) => sql.unregister_name(kind, name).await,
            Self::File(file) => file.unregister_name(kind, name).await,
        }
    }
}

/// Trim, drop empties, dedupe and sort names the way listings expect.
///
/// Sorting approximates French collation: primary order ignores case and
/// diacritics, the original spelling breaks ties.
pub(crate) fn uniq_sorted(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() || seen.iter().any(|s| s == trimmed) {
            continue;
        }
        seen.push(trimmed.to_string());
    }
    seen.sort_by(|a, b| {
        luxury_market_core::text::fold(a)
            .cmp(&luxury_market_core::text::fold(b))
            .then_with(|| a.cmp(b))
    });
    seen
}
