//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CategoryRegistry, ProductRepository};
use crate::config::ServerConfig;
use crate::store::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the catalog
/// services, which are constructed once at startup around the selected
/// storage backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Store,
    products: ProductRepository,
    registry: CategoryRegistry,
}

impl AppState {
    /// Build the state around a configured storage backend.
    #[must_use]
    pub fn new(config: ServerConfig, store: Store) -> Self {
        let products = ProductRepository::new(store.clone());
        let registry = CategoryRegistry::new(store.clone(), products.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                products,
                registry,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the storage backend (readiness probe).
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the product repository.
    #[must_use]
    pub fn products(&self) -> &ProductRepository {
        &self.inner.products
    }

    /// Get a reference to the category registry.
    #[must_use]
    pub fn registry(&self) -> &CategoryRegistry {
        &self.inner.registry
    }

    /// The shared admin secret.
    #[must_use]
    pub fn admin_secret(&self) -> &str {
        self.inner.config.admin_secret()
    }
}
