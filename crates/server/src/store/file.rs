//! Flat JSON file backend.
//!
//! The dev/fallback storage mode: three pretty-printed JSON arrays under
//! a data directory, each fully rewritten on every mutation.
//!
//! - `products.json` - array of products
//! - `categories.json` - array of registered category names
//! - `mode-subcategories.json` - array of registered sub-category names
//!
//! Read failures (missing file, malformed JSON) are treated as an empty
//! dataset. Concurrent writers can lose updates (read-modify-write with
//! no locking); this backend is not the production path.

use std::path::{Path, PathBuf};

use luxury_market_core::images::normalize_product_images;
use luxury_market_core::Product;

use super::{RegistryKind, StoreError, uniq_sorted};

/// JSON file storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The data directory this store writes to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn products_path(&self) -> PathBuf {
        self.dir.join("products.json")
    }

    fn registry_path(&self, kind: RegistryKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Read the product file; any failure yields an empty dataset.
    async fn read_products(&self) -> Vec<Product> {
        let path = self.products_path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "product file unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Product>>(&bytes) {
            Ok(products) => products.into_iter().map(normalize_record).collect(),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "product file unparsable, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write_products(&self, products: &[Product]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(products)?;
        tokio::fs::write(self.products_path(), json).await?;
        Ok(())
    }

    pub(super) async fn load_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.read_products().await)
    }

    pub(super) async fn find_product_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.read_products().await.into_iter().find(|p| p.id == id))
    }

    pub(super) async fn find_product_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Product>, StoreError> {
        Ok(self
            .read_products()
            .await
            .into_iter()
            .find(|p| p.slug == slug))
    }

    pub(super) async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.read_products().await;
        products.push(product.clone());
        self.write_products(&products).await
    }

    pub(super) async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.read_products().await;
        if let Some(existing) = products.iter_mut().find(|p| p.id == product.id) {
            *existing = product.clone();
            self.write_products(&products).await?;
        }
        Ok(())
    }

    pub(super) async fn delete_product(&self, id: &str) -> Result<bool, StoreError> {
        let products = self.read_products().await;
        let remaining: Vec<Product> = products.iter().filter(|p| p.id != id).cloned().collect();
        if remaining.len() == products.len() {
            return Ok(false);
        }
        self.write_products(&remaining).await?;
        Ok(true)
    }

    pub(super) async fn count_products_by_category(
        &self,
        category: &str,
    ) -> Result<u64, StoreError> {
        let products = self.read_products().await;
        Ok(products.iter().filter(|p| p.category == category).count() as u64)
    }

    pub(super) async fn replace_category(&self, old: &str, new: &str) -> Result<u64, StoreError> {
        let mut products = self.read_products().await;
        let mut count = 0u64;
        for product in &mut products {
            if product.category == old {
                product.category = new.to_string();
                count += 1;
            }
        }
        if count > 0 {
            self.write_products(&products).await?;
        }
        Ok(count)
    }

    /// Read a registry file; any failure yields an empty list.
    async fn read_registry(&self, kind: RegistryKind) -> Vec<String> {
        let path = self.registry_path(kind);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "registry file unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<String>>(&bytes) {
            Ok(names) => uniq_sorted(names),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "registry file unparsable, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write_registry(
        &self,
        kind: RegistryKind,
        names: Vec<String>,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&uniq_sorted(names))?;
        tokio::fs::write(self.registry_path(kind), json).await?;
        Ok(())
    }

    pub(super) async fn registered_names(
        &self,
        kind: RegistryKind,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self.read_registry(kind).await)
    }

    pub(super) async fn register_name(
        &self,
        kind: RegistryKind,
        name: &str,
    ) -> Result<(), StoreError> {
        let mut names = self.read_registry(kind).await;
        names.push(name.to_string());
        self.write_registry(kind, names).await
    }

    pub(super) async fn unregister_name(
        &self,
        kind: RegistryKind,
        name: &str,
    ) -> Result<(), StoreError> {
        let names = self.read_registry(kind).await;
        let remaining: Vec<String> = names.into_iter().filter(|n| n != name).collect();
        self.write_registry(kind, remaining).await
    }
}

/// Re-establish the photo invariants on a record read from disk.
///
/// Hand-edited files may carry duplicates or only the legacy single
/// field; after this, `images` is deduped and `images[0]` is the primary
/// photo whenever any photo exists.
fn normalize_record(mut product: Product) -> Product {
    let images = normalize_product_images(&product.images, Some(product.image.as_str()));
    if let Some(first) = images.first() {
        product.image = first.clone();
    }
    product.images = images;
    product
}
