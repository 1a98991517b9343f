//! Admin login and logout.
//!
//! Login compares the submitted password against the configured secret
//! and hands back the signed session cookie. Logout only clears the
//! cookie; tokens are stateless, there is nothing to revoke server-side.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{SESSION_COOKIE, SESSION_TTL_MS, create_session_token};
use crate::error::AppError;
use crate::state::AppState;

/// Build the admin auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: String,
}

/// Password login; sets the session cookie.
///
/// POST /api/admin/login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    if body.password != state.admin_secret() {
        return Err(AppError::Unauthorized("Mot de passe incorrect.".to_string()));
    }

    let token = create_session_token(state.admin_secret());
    let cookie = session_cookie(&token, SESSION_TTL_MS / 1000, state.config().cookie_secure());

    Ok(([(SET_COOKIE, cookie)], Json(json!({ "ok": true }))))
}

/// Clears the session cookie.
///
/// POST /api/admin/logout
async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = session_cookie("", 0, state.config().cookie_secure());
    ([(SET_COOKIE, cookie)], Json(json!({ "ok": true })))
}

fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_carries_session_attributes() {
        let cookie = session_cookie("abc.def", 86_400, false);
        assert_eq!(
            cookie,
            "admin_session=abc.def; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400"
        );
    }

    #[test]
    fn secure_attribute_follows_base_url_scheme() {
        let cookie = session_cookie("abc.def", 86_400, true);
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = session_cookie("", 0, false);
        assert!(cookie.starts_with("admin_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
