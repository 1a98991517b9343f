//! Product CRUD over the selected storage backend.

use luxury_market_core::images::normalize_product_images;
use luxury_market_core::options::normalize_color_images;
use luxury_market_core::slug::slugify;
use luxury_market_core::{NewProduct, Product, ProductPatch, Universe};
use rand::Rng;

use super::CatalogError;
use crate::store::Store;

/// Product repository, cheap to clone (shares the backend handle).
#[derive(Clone)]
pub struct ProductRepository {
    store: Store,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// All products in stable storage order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.load_products().await?)
    }

    /// Products of one universe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn list_by_universe(
        &self,
        universe: Universe,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.load_products_by_universe(universe).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.store.find_product_by_id(id).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.store.find_product_by_slug(slug).await?)
    }

    /// Create a product, assigning its id and a unique slug.
    ///
    /// # Errors
    ///
    /// `Validation` when no usable photo remains after normalization or
    /// the price is negative; `Store` on storage failure.
    pub async fn add(&self, input: NewProduct) -> Result<Product, CatalogError> {
        let images = normalize_product_images(&input.images, input.image.as_deref());
        let Some(primary) = images.first().cloned() else {
            return Err(CatalogError::Validation(
                "Au moins une image produit est requise.".to_string(),
            ));
        };
        if input.price < 0 {
            return Err(CatalogError::Validation(
                "Le prix doit être un montant positif.".to_string(),
            ));
        }

        let name = input.name.trim().to_string();
        let slug = self.unique_slug(&name, None).await?;

        let product = Product {
            id: generate_id(),
            slug,
            name,
            price: input.price,
            category: input.category.trim().to_string(),
            universe: input.universe,
            image: primary,
            images,
            description: input.description.trim().to_string(),
            color: clean_color(input.color.as_deref()),
            color_images: normalize_color_images(&input.color_images),
            sizes: input.sizes,
        };

        self.store.insert_product(&product).await?;
        Ok(product)
    }

    /// Apply a partial update; `None` when the id is unknown.
    ///
    /// Renaming regenerates the slug (the record's own id is excluded
    /// from the collision check) and the photo set is re-normalized so
    /// `images[0]` stays the primary photo.
    ///
    /// # Errors
    ///
    /// `Validation` on a negative price; `Store` on storage failure.
    pub async fn update(
        &self,
        id: &str,
        patch: ProductPatch,
    ) -> Result<Option<Product>, CatalogError> {
        let Some(existing) = self.store.find_product_by_id(id).await? else {
            return Ok(None);
        };

        let mut updated = existing.clone();

        if let Some(name) = &patch.name {
            let name = name.trim();
            if !name.is_empty() {
                updated.name = name.to_string();
            }
        }
        if let Some(price) = patch.price {
            if price < 0 {
                return Err(CatalogError::Validation(
                    "Le prix doit être un montant positif.".to_string(),
                ));
            }
            updated.price = price;
        }
        if let Some(category) = &patch.category {
            updated.category = category.trim().to_string();
        }
        if let Some(universe) = patch.universe {
            updated.universe = universe;
        }
        if let Some(description) = &patch.description {
            updated.description = description.trim().to_string();
        }
        if let Some(color) = &patch.color {
            updated.color = clean_color(Some(color));
        }
        if let Some(color_images) = &patch.color_images {
            updated.color_images = normalize_color_images(color_images);
        }
        if let Some(sizes) = patch.sizes {
            updated.sizes = sizes;
        }
        if let Some(image) = &patch.image {
            updated.image = image.trim().to_string();
        }
        if let Some(images) = patch.images {
            updated.images = images;
        }

        let images = normalize_product_images(&updated.images, Some(updated.image.as_str()));
        updated.image = images.first().cloned().unwrap_or_default();
        updated.images = images;

        if updated.name != existing.name {
            updated.slug = self.unique_slug(&updated.name, Some(id)).await?;
        }

        self.store.update_product(&updated).await?;
        Ok(Some(updated))
    }

    /// Remove a product; `false` when the id was unknown.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn delete(&self, id: &str) -> Result<bool, CatalogError> {
        Ok(self.store.delete_product(id).await?)
    }

    /// Number of products whose stored category is exactly `category`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn count_by_category(&self, category: &str) -> Result<u64, CatalogError> {
        Ok(self.store.count_products_by_category(category).await?)
    }

    /// Move every product from `old` to `new`; no-op 0 when equal.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on storage failure.
    pub async fn replace_category(&self, old: &str, new: &str) -> Result<u64, CatalogError> {
        if old == new {
            return Ok(0);
        }
        Ok(self.store.replace_category(old, new).await?)
    }

    /// Derive a slug from `name`, suffixing `-1`, `-2`, … on collision.
    async fn unique_slug(
        &self,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<String, CatalogError> {
        let products = self.store.load_products().await?;
        let base = slugify(name);
        let mut slug = base.clone();
        let mut suffix = 0u32;

        let taken = |candidate: &str| {
            products
                .iter()
                .any(|p| exclude_id.is_none_or(|id| p.id != id) && p.slug == candidate)
        };

        while taken(&slug) {
            suffix += 1;
            slug = format!("{base}-{suffix}");
        }

        Ok(slug)
    }
}

/// Trimmed color string, `None` when blank.
fn clean_color(color: Option<&str>) -> Option<String> {
    color
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
}

/// Opaque product id: millisecond timestamp + random suffix, base36.
///
/// Not sortable, not cryptographically strong; it only has to be unique
/// enough for a single shop's catalog.
fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().unsigned_abs();
    let random: u64 = rand::rng().random();
    format!("{}{}", to_base36(millis), to_base36(random))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or(0);
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn clean_color_drops_blanks() {
        assert_eq!(clean_color(Some(" Noir ")), Some("Noir".to_string()));
        assert_eq!(clean_color(Some("   ")), None);
        assert_eq!(clean_color(None), None);
    }
}
