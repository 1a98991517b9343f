//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                             - Liveness check
//! GET  /health/ready                       - Readiness check (storage probe)
//!
//! # Public catalog
//! GET  /api/products                       - Classified listing
//!                                            (?universe=mode|tout&category=..&subcategory=..)
//! GET  /api/products/{slug}                - Product detail with classification
//! GET  /api/products/{slug}/images         - Gallery photos (?color=..)
//! GET  /api/categories                     - Category names
//!
//! # Checkout
//! POST /api/checkout                       - WhatsApp order handoff URL
//!
//! # Admin (session cookie required, 401 otherwise)
//! POST   /api/admin/login                  - Password login, sets cookie
//! POST   /api/admin/logout                 - Clears cookie
//! GET    /api/admin/products               - Full product list
//! POST   /api/admin/products               - Create product
//! PUT    /api/admin/products/{id}          - Update product
//! DELETE /api/admin/products/{id}          - Delete product
//! GET    /api/admin/categories             - Categories with usage counts
//! POST   /api/admin/categories             - Create category
//! PATCH  /api/admin/categories/{name}      - Rename category (merge-aware)
//! DELETE /api/admin/categories/{name}      - Delete category (409 when blocked)
//! GET    /api/admin/mode-subcategories     - Sub-categories with usage counts
//! POST   /api/admin/mode-subcategories     - Create sub-category
//! PATCH  /api/admin/mode-subcategories/{name} - Rename sub-category
//! DELETE /api/admin/mode-subcategories/{name} - Delete sub-category
//! ```

pub mod admin;
pub mod catalog;
pub mod checkout;

use axum::Router;

use crate::state::AppState;

/// Build the application router (health endpoints live in `main`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .merge(checkout::router())
        .merge(admin::router())
}
