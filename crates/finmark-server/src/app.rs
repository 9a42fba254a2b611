//! Application assembly.

use crate::di::{build_catalog_module, CacheResolver, CatalogModule, CatalogResolver};
use finmark_config::AppConfig;
use finmark_core::{HealthCheck, HealthStatus};
use finmark_service::{CacheBackend, CacheHealthCheck, CacheStatsSnapshot, CachedServiceCatalog, ServiceCatalog};
use std::sync::Arc;
use tracing::info;

/// The assembled catalog: DI module, cache backend and the cached catalog
/// that callers use.
pub struct Application {
    config: AppConfig,
    module: Arc<CatalogModule>,
    cache_backend: Arc<dyn CacheBackend>,
    catalog: Arc<CachedServiceCatalog>,
}

impl Application {
    /// Connects the configured cache backend and wraps the catalog with it.
    pub async fn build(config: AppConfig) -> Self {
        let module = build_catalog_module(&config.cache, &config.redis).await;
        let cache_backend = module.cache_backend();
        let catalog = Arc::new(CachedServiceCatalog::from_config(
            module.catalog(),
            Arc::clone(&cache_backend),
            &config.cache,
        ));

        info!(
            cache_enabled = cache_backend.is_enabled(),
            backend = ?config.cache.backend,
            ttl_secs = config.cache.ttl_secs,
            "Service catalog assembled"
        );

        Self {
            config,
            module,
            cache_backend,
            catalog,
        }
    }

    /// The cached catalog.
    pub fn catalog(&self) -> Arc<dyn ServiceCatalog> {
        self.catalog.clone()
    }

    /// The DI module the application was built from.
    pub fn module(&self) -> &Arc<CatalogModule> {
        &self.module
    }

    /// The cache backend in use.
    pub fn cache_backend(&self) -> &Arc<dyn CacheBackend> {
        &self.cache_backend
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Probes the cache backend.
    pub async fn cache_health(&self) -> HealthStatus {
        CacheHealthCheck::new(Arc::clone(&self.cache_backend)).check().await
    }

    /// Cache counters accumulated so far.
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.catalog.stats()
    }

    /// Releases the cache connection. Safe to call more than once.
    pub fn shutdown(&self) {
        let stats = self.cache_stats();
        info!(
            hits = stats.hits,
            misses = stats.misses,
            failures = stats.failures(),
            "Shutting down service catalog"
        );
        self.cache_backend.close();
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("environment", &self.config.app.environment)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
