//! `PostgreSQL` backend.
//!
//! Production storage path. The schema is created lazily: the first
//! operation runs an idempotent migration, memoized in a
//! `tokio::sync::OnceCell` so concurrent cold-start requests share one
//! in-flight migration instead of racing duplicate DDL. A failed
//! migration leaves the cell empty, so the next operation retries.
//!
//! Row mapping is defensive: the JSON columns may hold real JSON values
//! or legacy stringified JSON, and rows predating the `images` column
//! are backfilled from the single `image` field by the migration.

use std::sync::Arc;
use std::time::Duration;

use luxury_market_core::images::normalize_product_images;
use luxury_market_core::options::{ColorImagesMap, normalize_color_images};
use luxury_market_core::Product;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tokio::sync::OnceCell;

use super::{RegistryKind, StoreError};

const PRODUCT_COLUMNS: &str =
    "id, slug, name, price, category, universe, image, images, description, color, color_images, sizes";

/// `PostgreSQL` storage backed by a connection pool.
#[derive(Clone)]
pub struct SqlStore {
    pool: PgPool,
    schema_ready: Arc<OnceCell<()>>,
}

impl SqlStore {
    /// Connect a pool with the usual defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the connection cannot be established.
    pub async fn connect(database_url: &SecretString) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;

        Ok(Self {
            pool,
            schema_ready: Arc::new(OnceCell::new()),
        })
    }

    /// The underlying pool (readiness probe).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the schema migration exactly once per process.
    ///
    /// Concurrent first callers wait on the same in-flight migration; a
    /// failure is not cached, so a later call retries.
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema_ready
            .get_or_try_init(|| migrate(&self.pool))
            .await?;
        Ok(())
    }

    pub(super) async fn load_products(&self) -> Result<Vec<Product>, StoreError> {
        self.ensure_schema().await?;
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_product).collect()
    }

    pub(super) async fn find_product_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        self.ensure_schema().await?;
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_product).transpose()
    }

    pub(super) async fn find_product_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Product>, StoreError> {
        self.ensure_schema().await?;
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_product).transpose()
    }

    pub(super) async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        self.ensure_schema().await?;
        sqlx::query(
            "INSERT INTO products \
             (id, slug, name, price, category, universe, image, images, description, color, color_images, sizes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&product.id)
        .bind(&product.slug)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.universe.as_str())
        .bind(&product.image)
        .bind(serde_json::json!(product.images))
        .bind(&product.description)
        .bind(product.color.as_deref())
        .bind(json_or_null(&product.color_images))
        .bind(json_or_null(&product.sizes))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub(super) async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        self.ensure_schema().await?;
        sqlx::query(
            "UPDATE products SET \
             slug = $2, name = $3, price = $4, category = $5, universe = $6, image = $7, \
             images = $8, description = $9, color = $10, color_images = $11, sizes = $12 \
             WHERE id = $1",
        )
        .bind(&product.id)
        .bind(&product.slug)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.universe.as_str())
        .bind(&product.image)
        .bind(serde_json::json!(product.images))
        .bind(&product.description)
        .bind(product.color.as_deref())
        .bind(json_or_null(&product.color_images))
        .bind(json_or_null(&product.sizes))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub(super) async fn delete_product(&self, id: &str) -> Result<bool, StoreError> {
        self.ensure_schema().await?;
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn count_products_by_category(
        &self,
        category: &str,
    ) -> Result<u64, StoreError> {
        self.ensure_schema().await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category = $1")
                .bind(category)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.unsigned_abs())
    }

    pub(super) async fn replace_category(&self, old: &str, new: &str) -> Result<u64, StoreError> {
        self.ensure_schema().await?;
        let result = sqlx::query("UPDATE products SET category = $2 WHERE category = $1")
            .bind(old)
            .bind(new)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub(super) async fn registered_names(
        &self,
        kind: RegistryKind,
    ) -> Result<Vec<String>, StoreError> {
        self.ensure_schema().await?;
        let names: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT name FROM {} ORDER BY name",
            kind.table_name()
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(super::uniq_sorted(names))
    }

    pub(super) async fn register_name(
        &self,
        kind: RegistryKind,
        name: &str,
    ) -> Result<(), StoreError> {
        self.ensure_schema().await?;
        sqlx::query(&format!(
            "INSERT INTO {} (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
            kind.table_name()
        ))
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub(super) async fn unregister_name(
        &self,
        kind: RegistryKind,
        name: &str,
    ) -> Result<(), StoreError> {
        self.ensure_schema().await?;
        sqlx::query(&format!("DELETE FROM {} WHERE name = $1", kind.table_name()))
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Idempotent schema migration.
///
/// Creates the three tables and backfills the `images` column for rows
/// that predate it (the legacy schema only had the single `image`
/// field). Every statement tolerates re-running.
async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    tracing::info!("running catalog schema migration");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (\
         id TEXT PRIMARY KEY, \
         slug TEXT UNIQUE NOT NULL, \
         name TEXT NOT NULL, \
         price BIGINT NOT NULL, \
         category TEXT NOT NULL, \
         universe TEXT NOT NULL CHECK (universe IN ('mode', 'tout')), \
         image TEXT NOT NULL, \
         images JSONB, \
         description TEXT NOT NULL, \
         color TEXT, \
         color_images JSONB, \
         sizes JSONB)",
    )
    .execute(pool)
    .await?;

    // Additive columns for tables created by the legacy schema.
    sqlx::query("ALTER TABLE products ADD COLUMN IF NOT EXISTS images JSONB")
        .execute(pool)
        .await?;
    sqlx::query("ALTER TABLE products ADD COLUMN IF NOT EXISTS color_images JSONB")
        .execute(pool)
        .await?;

    sqlx::query(
        "UPDATE products SET images = jsonb_build_array(image) \
         WHERE images IS NULL AND image <> ''",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE TABLE IF NOT EXISTS categories (name TEXT PRIMARY KEY)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE TABLE IF NOT EXISTS mode_subcategories (name TEXT PRIMARY KEY)")
        .execute(pool)
        .await?;

    Ok(())
}

/// NULL for empty collections, JSON otherwise (matches the legacy rows).
fn json_or_null<T: serde::Serialize>(value: &T) -> Option<JsonValue> {
    let json = serde_json::json!(value);
    match &json {
        JsonValue::Array(items) if items.is_empty() => None,
        JsonValue::Object(map) if map.is_empty() => None,
        _ => Some(json),
    }
}

/// Map a row onto a `Product`, re-establishing the photo invariants.
fn row_to_product(row: &PgRow) -> Result<Product, StoreError> {
    let universe_raw: String = row.try_get("universe")?;
    let universe = universe_raw
        .parse()
        .map_err(|_| StoreError::Corrupt(format!("unknown universe '{universe_raw}'")))?;

    let image: String = row.try_get("image")?;
    let stored_images = json_string_array(row.try_get("images")?);
    let images = normalize_product_images(&stored_images, Some(image.as_str()));
    let image = images.first().cloned().unwrap_or(image);

    let color: Option<String> = row.try_get("color")?;
    let color = color.filter(|c| !c.trim().is_empty());

    let color_images = normalize_color_images(&json_color_map(row.try_get("color_images")?));

    Ok(Product {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        universe,
        image,
        images,
        description: row.try_get("description")?,
        color,
        color_images,
        sizes: json_string_array(row.try_get("sizes")?),
    })
}

/// Read a JSONB column that should hold an array of strings.
///
/// Tolerates legacy stringified JSON and coerces scalar entries; any
/// other shape maps to an empty list.
fn json_string_array(value: Option<JsonValue>) -> Vec<String> {
    match value {
        Some(JsonValue::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                JsonValue::String(s) => Some(s),
                JsonValue::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(JsonValue::String(raw)) => match serde_json::from_str::<JsonValue>(&raw) {
            Ok(parsed @ JsonValue::Array(_)) => json_string_array(Some(parsed)),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Read a JSONB column that should hold a color → URL-list object.
fn json_color_map(value: Option<JsonValue>) -> ColorImagesMap {
    match value {
        Some(JsonValue::Object(entries)) => entries
            .into_iter()
            .map(|(color, images)| (color, json_string_array(Some(images))))
            .collect(),
        Some(JsonValue::String(raw)) => match serde_json::from_str::<JsonValue>(&raw) {
            Ok(parsed @ JsonValue::Object(_)) => json_color_map(Some(parsed)),
            _ => ColorImagesMap::new(),
        },
        _ => ColorImagesMap::new(),
    }
}
