//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_PASSWORD` - Shared admin secret, also the session signing key
//!   (min 4 chars)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `BASE_URL` - Public URL of the shop (default: http://localhost:3000;
//!   an https URL turns on the Secure cookie attribute)
//! - `DATABASE_URL` / `POSTGRES_URL` - `PostgreSQL` connection string;
//!   presence of a valid one selects the SQL backend
//! - `DATA_DIR` - JSON file storage directory (default: data)
//! - `WHATSAPP_NUMBER` - Destination number for checkout handoff

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 4;

/// Default WhatsApp number for the checkout handoff.
const DEFAULT_WHATSAPP_NUMBER: &str = "221773249642";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where catalog data lives, decided once at startup.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Managed `PostgreSQL` instance (connection string contains a password).
    Postgres(SecretString),
    /// Flat JSON files under this directory (dev/fallback mode).
    File(PathBuf),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the shop
    pub base_url: String,
    /// Shared admin secret (login password and session signing key)
    pub admin_password: SecretString,
    /// Selected storage backend
    pub storage: StorageConfig,
    /// WhatsApp number for the checkout handoff (digits only)
    pub whatsapp_number: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("BASE_URL", "http://localhost:3000");

        let admin_password = get_required_env("ADMIN_PASSWORD")?;
        if admin_password.len() < MIN_ADMIN_PASSWORD_LENGTH {
            return Err(ConfigError::InsecureSecret(
                "ADMIN_PASSWORD".to_string(),
                format!(
                    "must be at least {} characters (got {})",
                    MIN_ADMIN_PASSWORD_LENGTH,
                    admin_password.len()
                ),
            ));
        }

        let storage = storage_from_env();
        let whatsapp_number = digits_only(&get_env_or_default(
            "WHATSAPP_NUMBER",
            DEFAULT_WHATSAPP_NUMBER,
        ));

        Ok(Self {
            host,
            port,
            base_url,
            admin_password: SecretString::from(admin_password),
            storage,
            whatsapp_number,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the Secure attribute.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// The shared admin secret as a str.
    #[must_use]
    pub fn admin_secret(&self) -> &str {
        self.admin_password.expose_secret()
    }
}

/// Pick the storage backend from `DATABASE_URL` / `POSTGRES_URL`.
///
/// An absent or unusable connection string falls back to the JSON file
/// backend under `DATA_DIR`.
fn storage_from_env() -> StorageConfig {
    for key in ["DATABASE_URL", "POSTGRES_URL"] {
        let Ok(raw) = std::env::var(key) else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        match sanitize_connection_string(&raw) {
            Some(url) => return StorageConfig::Postgres(SecretString::from(url)),
            None => {
                tracing::warn!(
                    var = key,
                    "ignoring invalid PostgreSQL connection string, using file storage"
                );
            }
        }
    }

    StorageConfig::File(PathBuf::from(get_env_or_default("DATA_DIR", "data")))
}

/// Clean up a copy-pasted connection string and validate it.
///
/// Accepts values pasted straight from a provider dashboard: a leading
/// `psql` invocation wrapper and surrounding quotes are stripped before
/// URL validation. Returns `None` unless the result parses as a URL with
/// a `postgres`/`postgresql` scheme.
#[must_use]
pub fn sanitize_connection_string(raw: &str) -> Option<String> {
    let mut value = raw.trim();

    if let Some(rest) = value.strip_prefix("psql") {
        value = rest.trim_start();
    }

    loop {
        let stripped = value
            .strip_prefix('\'')
            .and_then(|v| v.strip_suffix('\''))
            .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')));
        match stripped {
            Some(inner) => value = inner.trim(),
            None => break,
        }
    }

    let parsed = Url::parse(value).ok()?;
    matches!(parsed.scheme(), "postgres" | "postgresql").then(|| value.to_string())
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Keep only ASCII digits (phone numbers arrive with spaces and '+').
fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_accepts_plain_urls() {
        assert_eq!(
            sanitize_connection_string("postgres://user:pw@host:5432/db"),
            Some("postgres://user:pw@host:5432/db".to_string())
        );
        assert_eq!(
            sanitize_connection_string("postgresql://host/db?sslmode=require"),
            Some("postgresql://host/db?sslmode=require".to_string())
        );
    }

    #[test]
    fn sanitize_strips_psql_wrapper_and_quotes() {
        assert_eq!(
            sanitize_connection_string("psql 'postgres://user:pw@host/db'"),
            Some("postgres://user:pw@host/db".to_string())
        );
        assert_eq!(
            sanitize_connection_string("\"postgresql://host/db\""),
            Some("postgresql://host/db".to_string())
        );
        assert_eq!(
            sanitize_connection_string("  psql \"postgres://host/db\"  "),
            Some("postgres://host/db".to_string())
        );
    }

    #[test]
    fn sanitize_rejects_other_schemes_and_garbage() {
        assert_eq!(sanitize_connection_string("mysql://host/db"), None);
        assert_eq!(sanitize_connection_string("not a url"), None);
        assert_eq!(sanitize_connection_string(""), None);
        assert_eq!(sanitize_connection_string("psql"), None);
    }

    #[test]
    fn digits_only_strips_formatting() {
        assert_eq!(digits_only("+221 77 324 96 42"), "221773249642");
    }
}
