//! Public catalog route handlers.
//!
//! The shop front filters and labels products against the closed display
//! taxonomy, not the free-text `category` field, so listing and detail
//! endpoints classify through [`luxury_market_core::taxonomy`] here
//! rather than in the client.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use luxury_market_core::options::{color_images_for, parse_color_list};
use luxury_market_core::taxonomy::{
    map_mode_category, map_universe_category, match_mode_subcategory,
};
use luxury_market_core::{Product, Universe};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the public catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{slug}", get(get_product))
        .route("/api/products/{slug}/images", get(get_product_images))
        .route("/api/categories", get(list_categories))
}

/// Catalog listing filters. `category` and `subcategory` name display
/// taxonomy buckets, not stored category strings.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub universe: Option<Universe>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// A product with its display classification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedProduct {
    #[serde(flatten)]
    pub product: Product,
    /// Taxonomy bucket the product is displayed under.
    pub display_category: String,
    /// Clothing sub-category, for `mode` products that resolve to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_subcategory: Option<String>,
    /// Distinct color names parsed from the delimited `color` field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

/// List products with their classification, optionally filtered by
/// universe and taxonomy bucket.
///
/// GET /api/products?universe=mode&category=Vêtements&subcategory=Tshirt
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ClassifiedProduct>>> {
    let products = match query.universe {
        Some(universe) => state.products().list_by_universe(universe).await?,
        None => state.products().list().await?,
    };
    let known_subcategories = state.registry().mode_subcategories().await?;

    let classified = products
        .into_iter()
        .map(|p| classify(p, &known_subcategories))
        .filter(|p| {
            query
                .category
                .as_deref()
                .is_none_or(|c| p.display_category == c)
        })
        .filter(|p| {
            query
                .subcategory
                .as_deref()
                .is_none_or(|s| p.display_subcategory.as_deref() == Some(s))
        })
        .collect();

    Ok(Json(classified))
}

/// Product detail by slug, with its classification.
///
/// GET /api/products/{slug}
async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ClassifiedProduct>> {
    let product = state
        .products()
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Produit introuvable.".to_string()))?;
    let known_subcategories = state.registry().mode_subcategories().await?;

    Ok(Json(classify(product, &known_subcategories)))
}

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub color: Option<String>,
}

/// Gallery photos for a product, narrowed to one color when that color
/// has its own photos.
///
/// GET /api/products/{slug}/images?color=Bleu
async fn get_product_images(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Vec<String>>> {
    let product = state
        .products()
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Produit introuvable.".to_string()))?;

    let images = query
        .color
        .as_deref()
        .map(|color| color_images_for(&product.color_images, color))
        .filter(|images| !images.is_empty())
        .unwrap_or(product.images);

    Ok(Json(images))
}

/// All category names visible on the shop front.
///
/// GET /api/categories
async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.registry().categories().await?))
}

/// Attach the display taxonomy bucket (and clothing sub-category for
/// `mode` products) to a product.
fn classify(product: Product, known_subcategories: &[String]) -> ClassifiedProduct {
    let (display_category, display_subcategory) = match product.universe {
        Universe::Tout => (map_universe_category(&product.category).to_string(), None),
        Universe::Mode => (
            map_mode_category(&product.category).to_string(),
            match_mode_subcategory(&product.category, known_subcategories),
        ),
    };

    let colors = parse_color_list(product.color.as_deref());

    ClassifiedProduct {
        product,
        display_category,
        display_subcategory,
        colors,
    }
}
