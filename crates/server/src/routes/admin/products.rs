//! Admin product CRUD handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use luxury_market_core::images::normalize_product_images;
use luxury_market_core::options::ColorImagesMap;
use luxury_market_core::{NewProduct, Product, ProductPatch, Universe};

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the admin products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/products", get(list).post(create))
        .route(
            "/api/admin/products/{id}",
            axum::routing::put(update).delete(delete),
        )
}

/// Full product list for the admin table.
///
/// GET /api/admin/products
async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products().list().await?))
}

/// Loose create payload; required fields are checked by hand so the
/// client gets one French message instead of a serde rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductRequest {
    name: Option<String>,
    price: Option<i64>,
    category: Option<String>,
    universe: Option<String>,
    image: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    description: Option<String>,
    color: Option<String>,
    #[serde(default)]
    color_images: ColorImagesMap,
    #[serde(default)]
    sizes: Vec<String>,
}

/// Create a product.
///
/// POST /api/admin/products
async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let name = body.name.as_deref().map(str::trim).unwrap_or_default();
    let category = body.category.as_deref().map(str::trim).unwrap_or_default();
    let description = body
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    let has_image = body.image.as_deref().is_some_and(|i| !i.trim().is_empty())
        || body.images.iter().any(|i| !i.trim().is_empty());

    if name.is_empty()
        || body.price.is_none()
        || category.is_empty()
        || body.universe.is_none()
        || !has_image
        || description.is_empty()
    {
        return Err(AppError::BadRequest(
            "Champs requis : name, price, category, universe, image, description.".to_string(),
        ));
    }

    let universe: Universe = body
        .universe
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| AppError::BadRequest("universe doit être 'mode' ou 'tout'.".to_string()))?;

    let input = NewProduct {
        name: name.to_string(),
        price: body.price.unwrap_or_default(),
        category: category.to_string(),
        universe,
        image: body.image.map(|i| i.trim().to_string()),
        images: body.images,
        description: description.to_string(),
        color: body.color,
        color_images: body.color_images,
        sizes: body.sizes,
    };

    Ok(Json(state.products().add(input).await?))
}

/// Loose update payload; invalid universes are ignored rather than
/// rejected, matching the admin form's behavior.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProductRequest {
    name: Option<String>,
    price: Option<i64>,
    category: Option<String>,
    universe: Option<String>,
    image: Option<String>,
    images: Option<Vec<String>>,
    description: Option<String>,
    color: Option<String>,
    color_images: Option<ColorImagesMap>,
    sizes: Option<Vec<String>>,
}

/// Update a product.
///
/// PUT /api/admin/products/{id}
async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let mut body = body.map(|Json(b)| b).unwrap_or_default();

    // Touching the photo set replaces it wholesale: the provided fields
    // are resolved on their own and must leave at least one photo.
    if body.image.is_some() || body.images.is_some() {
        let explicit = body.images.clone().unwrap_or_default();
        let resolved = normalize_product_images(&explicit, body.image.as_deref());
        let Some(primary) = resolved.first() else {
            return Err(AppError::BadRequest(
                "Au moins une image produit est requise.".to_string(),
            ));
        };
        body.image = Some(primary.clone());
        body.images = Some(resolved);
    }

    let patch = ProductPatch {
        name: body.name,
        price: body.price,
        category: body.category,
        universe: body.universe.as_deref().and_then(|u| u.parse().ok()),
        image: body.image,
        images: body.images,
        description: body.description,
        color: body.color,
        color_images: body.color_images,
        sizes: body.sizes,
    };

    state
        .products()
        .update(&id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Produit introuvable.".to_string()))
}

/// Delete a product.
///
/// DELETE /api/admin/products/{id}
async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.products().delete(&id).await? {
        Ok(Json(json!({ "ok": true })))
    } else {
        Err(AppError::NotFound("Produit introuvable.".to_string()))
    }
}
