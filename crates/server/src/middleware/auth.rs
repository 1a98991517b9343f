//! Authentication extractor for admin routes.
//!
//! Sessions are stateless: the cookie carries an HMAC-signed token (see
//! [`crate::auth`]), so the extractor only needs the shared secret from
//! the application state. Auth is checked before any other validation.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{StatusCode, header::COOKIE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::{SESSION_COOKIE, verify_session_token};
use crate::state::AppState;

/// Extractor that requires a valid admin session.
///
/// Rejects with `401 {"error": "Non autorisé."}` when the session
/// cookie is missing, malformed, forged or expired.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdmin) -> impl IntoResponse {
///     "only admins get here"
/// }
/// ```
pub struct RequireAdmin;

/// Rejection returned when the admin session is missing or invalid.
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Non autorisé." })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_cookie(parts).ok_or(AdminRejection)?;

        if verify_session_token(state.admin_secret(), &token) {
            Ok(Self)
        } else {
            Err(AdminRejection)
        }
    }
}

/// Pull the session token out of the Cookie header(s).
fn session_cookie(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            (name.trim() == SESSION_COOKIE).then(|| value.trim().to_string())
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(header: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/api/admin/products")
            .header(COOKIE, header)
            .body(())
            .expect("request")
            .into_parts();
        parts
    }

    #[test]
    fn finds_the_session_cookie_among_others() {
        let parts = parts_with_cookie("theme=dark; admin_session=abc.def; lang=fr");
        assert_eq!(session_cookie(&parts), Some("abc.def".to_string()));
    }

    #[test]
    fn missing_cookie_yields_none() {
        let parts = parts_with_cookie("theme=dark");
        assert_eq!(session_cookie(&parts), None);

        let (no_header, ()) = Request::builder()
            .uri("/api/admin/products")
            .body(())
            .expect("request")
            .into_parts();
        assert_eq!(session_cookie(&no_header), None);
    }
}
