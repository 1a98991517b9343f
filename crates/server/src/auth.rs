//! Stateless admin session tokens.
//!
//! There is a single shared admin role: a token is a base64url-encoded
//! JSON payload `{"t": <issued-at millis>}` joined by a dot to the hex
//! HMAC-SHA256 of that payload, keyed by the admin password. No server
//! state, no revocation; a token dies when its 24 h TTL elapses or the
//! cookie is discarded.
//!
//! Verification is a total boolean function: malformed base64, a missing
//! signature segment or a non-numeric timestamp are "invalid", never an
//! error. The signature check is constant-time.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "admin_session";

/// Session lifetime in milliseconds (24 hours).
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    /// Issued-at, milliseconds since the Unix epoch.
    t: i64,
}

fn sign(secret: &str, payload: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(payload);
    mac
}

/// Issue a session token with an explicit issue time.
#[must_use]
pub fn create_session_token_at(secret: &str, now_ms: i64) -> String {
    let payload = serde_json::to_string(&TokenPayload { t: now_ms })
        .unwrap_or_else(|_| format!("{{\"t\":{now_ms}}}"));
    let signature = hex::encode(sign(secret, payload.as_bytes()).finalize().into_bytes());
    format!("{}.{}", URL_SAFE_NO_PAD.encode(payload), signature)
}

/// Issue a session token stamped with the current time.
#[must_use]
pub fn create_session_token(secret: &str) -> String {
    create_session_token_at(secret, chrono::Utc::now().timestamp_millis())
}

/// Check a session token against an explicit current time.
#[must_use]
pub fn verify_session_token_at(secret: &str, token: &str, now_ms: i64) -> bool {
    let Some((payload_b64, signature_hex)) = token.split_once('.') else {
        return false;
    };
    if payload_b64.is_empty() || signature_hex.is_empty() {
        return false;
    }

    let Ok(payload) = URL_SAFE_NO_PAD.decode(payload_b64) else {
        return false;
    };
    let Ok(parsed) = serde_json::from_slice::<TokenPayload>(&payload) else {
        return false;
    };
    if now_ms - parsed.t > SESSION_TTL_MS {
        return false;
    }

    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    sign(secret, &payload).verify_slice(&signature).is_ok()
}

/// Check a session token against the current time.
#[must_use]
pub fn verify_session_token(secret: &str, token: &str) -> bool {
    verify_session_token_at(secret, token, chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "s3cret-admin";

    #[test]
    fn fresh_token_verifies() {
        let token = create_session_token(SECRET);
        assert!(verify_session_token(SECRET, &token));
    }

    #[test]
    fn token_expires_after_ttl() {
        let issued = 1_700_000_000_000;
        let token = create_session_token_at(SECRET, issued);

        assert!(verify_session_token_at(SECRET, &token, issued));
        assert!(verify_session_token_at(
            SECRET,
            &token,
            issued + SESSION_TTL_MS
        ));
        assert!(!verify_session_token_at(
            SECRET,
            &token,
            issued + SESSION_TTL_MS + 1
        ));
    }

    #[test]
    fn any_mutation_invalidates_the_token() {
        let issued = 1_700_000_000_000;
        let token = create_session_token_at(SECRET, issued);

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            let original = bytes.get(i).copied().unwrap_or(b'0');
            if let Some(byte) = bytes.get_mut(i) {
                *byte = if original == b'0' { b'1' } else { b'0' };
            }
            let Ok(mutated) = String::from_utf8(bytes) else {
                continue;
            };
            assert!(
                !verify_session_token_at(SECRET, &mutated, issued),
                "mutation at {i} was accepted"
            );
        }
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_session_token(SECRET);
        assert!(!verify_session_token("other-secret", &token));
    }

    #[test]
    fn malformed_tokens_are_invalid_not_errors() {
        let issued = 1_700_000_000_000;
        for token in [
            "",
            ".",
            "nodot",
            "!!!.abcdef",
            "e30.zzzz",                                // payload {} without t
            "bm90LWpzb24.abcdef",                      // payload "not-json"
            "eyJ0IjoiYWJjIn0.abcdef",                  // payload {"t":"abc"}
        ] {
            assert!(!verify_session_token_at(SECRET, token, issued), "{token}");
        }
    }
}
