//! Category and mode sub-category lifecycle.
//!
//! The visible category set is a union: names explicitly registered in
//! storage, names currently carried by product records, and the built-in
//! taxonomy constants. Deleting or renaming a name that products still
//! reference reassigns those products first, so the union never dangles.
//!
//! Deletion policy is deliberately asymmetric: a category with products
//! cannot be deleted without a replacement (409 upstream), while a mode
//! sub-category silently falls back to the top-level "Vêtements" bucket
//! so the garments stay classified.

use luxury_market_core::taxonomy::{
    MODE_CATEGORIES, MODE_CLOTHING_CATEGORY, MODE_CLOTHING_SUBCATEGORIES, UNIVERSE_CATEGORIES,
    match_mode_subcategory,
};
use luxury_market_core::{CategoryInfo, Universe};

use super::{CatalogError, CreateOutcome, DeleteOutcome, ProductRepository, RenameOutcome};
use crate::store::{RegistryKind, Store, uniq_sorted};

/// Category registry, cheap to clone (shares the backend handle).
#[derive(Clone)]
pub struct CategoryRegistry {
    store: Store,
    products: ProductRepository,
}

impl CategoryRegistry {
    #[must_use]
    pub const fn new(store: Store, products: ProductRepository) -> Self {
        Self { store, products }
    }

    /// Every category name: registered ∪ product-observed ∪ built-ins.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let registered = self.store.registered_names(RegistryKind::Categories).await?;
        let products = self.products.list().await?;

        let names = registered
            .into_iter()
            .chain(products.into_iter().map(|p| p.category))
            .chain(MODE_CATEGORIES.iter().map(ToString::to_string))
            .chain(MODE_CLOTHING_SUBCATEGORIES.iter().map(ToString::to_string))
            .chain(UNIVERSE_CATEGORIES.iter().map(ToString::to_string));

        Ok(uniq_sorted(names))
    }

    /// Every mode sub-category name: registered ∪ sub-categories in use
    /// on `mode` products ∪ the built-in clothing set.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn mode_subcategories(&self) -> Result<Vec<String>, CatalogError> {
        let registered = self
            .store
            .registered_names(RegistryKind::ModeSubcategories)
            .await?;
        let products = self.products.list_by_universe(Universe::Mode).await?;

        let observed: Vec<String> = products
            .iter()
            .filter_map(|p| match_mode_subcategory(&p.category, &registered))
            .collect();

        let names = registered
            .into_iter()
            .chain(observed)
            .chain(MODE_CLOTHING_SUBCATEGORIES.iter().map(ToString::to_string));

        Ok(uniq_sorted(names))
    }

    /// Category names with their exact product usage counts.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn category_infos(&self) -> Result<Vec<CategoryInfo>, CatalogError> {
        let names = self.categories().await?;
        self.with_counts(names).await
    }

    /// Mode sub-category names with their exact product usage counts.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn mode_subcategory_infos(&self) -> Result<Vec<CategoryInfo>, CatalogError> {
        let names = self.mode_subcategories().await?;
        self.with_counts(names).await
    }

    async fn with_counts(&self, names: Vec<String>) -> Result<Vec<CategoryInfo>, CatalogError> {
        let products = self.products.list().await?;
        Ok(names
            .into_iter()
            .map(|name| {
                let count = products.iter().filter(|p| p.category == name).count();
                CategoryInfo { name, count }
            })
            .collect())
    }

    /// Register a category; no-op when the name already exists.
    ///
    /// # Errors
    ///
    /// `Validation` on an empty name; `Store` on storage failure.
    pub async fn create_category(&self, raw_name: &str) -> Result<CreateOutcome, CatalogError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Nom de catégorie requis.".to_string(),
            ));
        }

        let existing = self.categories().await?;
        if existing.iter().any(|c| c == name) {
            return Ok(CreateOutcome {
                created: false,
                name: name.to_string(),
            });
        }

        self.store
            .register_name(RegistryKind::Categories, name)
            .await?;
        Ok(CreateOutcome {
            created: true,
            name: name.to_string(),
        })
    }

    /// Register a mode sub-category; no-op when the name already exists.
    ///
    /// # Errors
    ///
    /// `Validation` on an empty or reserved name; `Store` on storage
    /// failure.
    pub async fn create_mode_subcategory(
        &self,
        raw_name: &str,
    ) -> Result<CreateOutcome, CatalogError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Nom de sous-catégorie requis.".to_string(),
            ));
        }
        if is_reserved_mode_category(name) {
            return Err(CatalogError::Validation(
                "Ce nom est réservé à une catégorie principale du mode.".to_string(),
            ));
        }

        let existing = self.mode_subcategories().await?;
        if existing.iter().any(|c| c == name) {
            return Ok(CreateOutcome {
                created: false,
                name: name.to_string(),
            });
        }

        self.store
            .register_name(RegistryKind::ModeSubcategories, name)
            .await?;
        Ok(CreateOutcome {
            created: true,
            name: name.to_string(),
        })
    }

    /// Delete a category, reassigning its products first.
    ///
    /// # Errors
    ///
    /// `NeedsReplacement` when products still reference the category and
    /// no replacement was supplied; `Validation` on bad input; `Store`
    /// on storage failure.
    pub async fn delete_category(
        &self,
        raw_name: &str,
        raw_replacement: Option<&str>,
    ) -> Result<DeleteOutcome, CatalogError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Nom de catégorie requis.".to_string(),
            ));
        }
        let replacement = raw_replacement.map(str::trim).filter(|r| !r.is_empty());
        if replacement == Some(name) {
            return Err(CatalogError::Validation(
                "La catégorie de remplacement doit être différente.".to_string(),
            ));
        }

        let usage = self.products.count_by_category(name).await?;
        let mut reassigned = 0;

        if usage > 0 {
            let Some(replacement) = replacement else {
                return Err(CatalogError::NeedsReplacement(
                    "Cette catégorie contient des produits. Choisir une catégorie de remplacement."
                        .to_string(),
                ));
            };
            self.create_category(replacement).await?;
            reassigned = self.products.replace_category(name, replacement).await?;
        }

        self.store
            .unregister_name(RegistryKind::Categories, name)
            .await?;
        Ok(DeleteOutcome { reassigned })
    }

    /// Delete a mode sub-category, reassigning its products first.
    ///
    /// Without a replacement the products fall back to the top-level
    /// "Vêtements" category instead of blocking the deletion.
    ///
    /// # Errors
    ///
    /// `Validation` on bad input; `Store` on storage failure.
    pub async fn delete_mode_subcategory(
        &self,
        raw_name: &str,
        raw_replacement: Option<&str>,
    ) -> Result<DeleteOutcome, CatalogError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Nom de sous-catégorie requis.".to_string(),
            ));
        }
        let replacement = raw_replacement.map(str::trim).filter(|r| !r.is_empty());
        if replacement == Some(name) {
            return Err(CatalogError::Validation(
                "La sous-catégorie de remplacement doit être différente.".to_string(),
            ));
        }

        let usage = self.products.count_by_category(name).await?;
        let mut reassigned = 0;

        if usage > 0 {
            match replacement {
                // "Vêtements" is the fallback bucket, never registered
                // as a sub-category.
                Some(replacement) if replacement != MODE_CLOTHING_CATEGORY => {
                    self.create_mode_subcategory(replacement).await?;
                    reassigned = self.products.replace_category(name, replacement).await?;
                }
                _ => {
                    reassigned = self
                        .products
                        .replace_category(name, MODE_CLOTHING_CATEGORY)
                        .await?;
                }
            }
        }

        self.store
            .unregister_name(RegistryKind::ModeSubcategories, name)
            .await?;
        Ok(DeleteOutcome { reassigned })
    }

    /// Rename a category, merging when the new name already exists.
    ///
    /// # Errors
    ///
    /// `Validation` on bad input or an unknown category; `Store` on
    /// storage failure.
    pub async fn rename_category(
        &self,
        raw_name: &str,
        raw_next: &str,
    ) -> Result<RenameOutcome, CatalogError> {
        let name = raw_name.trim();
        let next = raw_next.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Nom de catégorie requis.".to_string(),
            ));
        }
        if next.is_empty() {
            return Err(CatalogError::Validation(
                "Nouveau nom de catégorie requis.".to_string(),
            ));
        }

        let existing = self.categories().await?;
        if !existing.iter().any(|c| c == name) {
            return Err(CatalogError::Validation("Catégorie introuvable.".to_string()));
        }
        if name == next {
            return Ok(RenameOutcome {
                reassigned: 0,
                merged: false,
            });
        }

        let merged = existing.iter().any(|c| c == next);
        self.create_category(next).await?;
        let reassigned = self.products.replace_category(name, next).await?;
        self.store
            .unregister_name(RegistryKind::Categories, name)
            .await?;

        Ok(RenameOutcome { reassigned, merged })
    }

    /// Rename a mode sub-category, merging when the new name exists.
    ///
    /// # Errors
    ///
    /// `Validation` on bad input or an unknown sub-category; `Conflict`
    /// when the new name is a top-level mode category; `Store` on
    /// storage failure.
    pub async fn rename_mode_subcategory(
        &self,
        raw_name: &str,
        raw_next: &str,
    ) -> Result<RenameOutcome, CatalogError> {
        let name = raw_name.trim();
        let next = raw_next.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Nom de sous-catégorie requis.".to_string(),
            ));
        }
        if next.is_empty() {
            return Err(CatalogError::Validation(
                "Nouveau nom de sous-catégorie requis.".to_string(),
            ));
        }
        if is_reserved_mode_category(next) {
            return Err(CatalogError::Conflict(
                "Ce nom est réservé à une catégorie principale du mode.".to_string(),
            ));
        }

        let existing = self.mode_subcategories().await?;
        if !existing.iter().any(|c| c == name) {
            return Err(CatalogError::Validation(
                "Sous-catégorie introuvable.".to_string(),
            ));
        }
        if name == next {
            return Ok(RenameOutcome {
                reassigned: 0,
                merged: false,
            });
        }

        let merged = existing.iter().any(|c| c == next);
        self.create_mode_subcategory(next).await?;
        let reassigned = self.products.replace_category(name, next).await?;
        self.store
            .unregister_name(RegistryKind::ModeSubcategories, name)
            .await?;

        Ok(RenameOutcome { reassigned, merged })
    }
}

/// Exact trimmed match against the top-level mode taxonomy.
fn is_reserved_mode_category(name: &str) -> bool {
    MODE_CATEGORIES.iter().any(|c| *c == name)
}
