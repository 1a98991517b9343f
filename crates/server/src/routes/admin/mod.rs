//! Admin panel API.
//!
//! Every mutation is gated by the [`RequireAdmin`] extractor; auth is
//! checked before any body validation, so an anonymous caller always
//! sees 401 first.
//!
//! [`RequireAdmin`]: crate::middleware::RequireAdmin

pub mod auth;
pub mod categories;
pub mod products;
pub mod subcategories;

use axum::Router;

use crate::state::AppState;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(subcategories::router())
}
