//! Admin category handlers.
//!
//! Deleting a category that products still reference returns 409 until
//! the client resubmits with a `replacement`; renaming into an existing
//! name merges the two categories.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use luxury_market_core::CategoryInfo;

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the admin categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/categories", get(list).post(create))
        .route(
            "/api/admin/categories/{name}",
            axum::routing::patch(rename).delete(delete),
        )
}

/// Categories with their product usage counts.
///
/// GET /api/admin/categories
async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryInfo>>, AppError> {
    Ok(Json(state.registry().category_infos().await?))
}

#[derive(Debug, Default, Deserialize)]
struct CreateRequest {
    #[serde(default)]
    name: String,
}

/// Register a category. 201 when created, 200 when it already existed.
///
/// POST /api/admin/categories
async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Nom de catégorie requis.".to_string()));
    }

    let outcome = state.registry().create_category(name).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

#[derive(Debug, Default, Deserialize)]
struct RenameRequest {
    name: Option<String>,
}

/// Rename a category, merging when the new name exists.
///
/// PATCH /api/admin/categories/{name}
async fn rename(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let next = body.name.as_deref().map(str::trim).unwrap_or_default();
    if next.is_empty() {
        return Err(AppError::BadRequest(
            "Nouveau nom de catégorie requis.".to_string(),
        ));
    }

    let outcome = state.registry().rename_category(&name, next).await?;
    Ok(Json(json!({
        "ok": true,
        "reassigned": outcome.reassigned,
        "merged": outcome.merged,
    })))
}

#[derive(Debug, Default, Deserialize)]
struct DeleteRequest {
    replacement: Option<String>,
}

/// Delete a category, reassigning its products to `replacement`.
///
/// DELETE /api/admin/categories/{name}
async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let outcome = state
        .registry()
        .delete_category(&name, body.replacement.as_deref())
        .await?;
    Ok(Json(json!({ "ok": true, "reassigned": outcome.reassigned })))
}
