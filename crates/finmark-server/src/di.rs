//! Dependency injection module using Shaku.
//!
//! `CatalogModule` wires the repository, the catalog and the cache backend.
//! The backend is chosen at build time from configuration: a connected Redis
//! backend, the in-process memory backend, or the disabled Redis component
//! that the module builds by default.

use finmark_config::{CacheBackendKind, CacheConfig, RedisConfig};
use finmark_repository::{InMemoryServiceRepository, ServiceRepository};
use finmark_service::{CacheBackend, MemoryCacheBackend, RedisCacheBackend, ServiceCatalog, ServiceCatalogImpl};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Shaku Module Definition
// ============================================================================

module! {
    pub CatalogModule {
        components = [
            RedisCacheBackend,
            InMemoryServiceRepository,
            ServiceCatalogImpl,
        ],
        providers = [],
    }
}

// ============================================================================
// Module Builder
// ============================================================================

/// Builds the catalog module with the cache backend selected by `cache`.
pub async fn build_catalog_module(cache: &CacheConfig, redis: &RedisConfig) -> Arc<CatalogModule> {
    let builder = CatalogModule::builder();

    let builder = if !cache.enabled {
        info!("Caching disabled by configuration");
        builder
    } else {
        match cache.backend {
            CacheBackendKind::Redis => {
                let backend = RedisCacheBackend::connect(redis).await;
                builder.with_component_override::<dyn CacheBackend>(Box::new(backend))
            }
            CacheBackendKind::Memory => {
                info!("Using in-process memory cache");
                builder.with_component_override::<dyn CacheBackend>(Box::new(MemoryCacheBackend::new()))
            }
        }
    };

    Arc::new(builder.build())
}

// ============================================================================
// Resolver Traits
// ============================================================================

/// Resolves the undecorated catalog.
pub trait CatalogResolver {
    fn catalog(&self) -> Arc<dyn ServiceCatalog>;
}

/// Resolves the repository behind the catalog.
pub trait RepositoryResolver {
    fn service_repository(&self) -> Arc<dyn ServiceRepository>;
}

/// Resolves the cache backend.
pub trait CacheResolver {
    fn cache_backend(&self) -> Arc<dyn CacheBackend>;
}

impl CatalogResolver for CatalogModule {
    fn catalog(&self) -> Arc<dyn ServiceCatalog> {
        HasComponent::<dyn ServiceCatalog>::resolve(self)
    }
}

impl RepositoryResolver for CatalogModule {
    fn service_repository(&self) -> Arc<dyn ServiceRepository> {
        HasComponent::<dyn ServiceRepository>::resolve(self)
    }
}

impl CacheResolver for CatalogModule {
    fn cache_backend(&self) -> Arc<dyn CacheBackend> {
        HasComponent::<dyn CacheBackend>::resolve(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_cache() -> CacheConfig {
        CacheConfig {
            backend: CacheBackendKind::Memory,
            ..CacheConfig::default()
        }
    }

    #[test]
    fn test_module_types_exist() {
        fn _assert_catalog_resolver<T: CatalogResolver>() {}
        fn _assert_repository_resolver<T: RepositoryResolver>() {}
        fn _assert_cache_resolver<T: CacheResolver>() {}

        _assert_catalog_resolver::<CatalogModule>();
        _assert_repository_resolver::<CatalogModule>();
        _assert_cache_resolver::<CatalogModule>();
    }

    #[test]
    fn test_has_component_trait_bounds() {
        fn _assert_has_catalog<T: HasComponent<dyn ServiceCatalog>>() {}
        fn _assert_has_repository<T: HasComponent<dyn ServiceRepository>>() {}
        fn _assert_has_cache<T: HasComponent<dyn CacheBackend>>() {}

        _assert_has_catalog::<CatalogModule>();
        _assert_has_repository::<CatalogModule>();
        _assert_has_cache::<CatalogModule>();
    }

    #[tokio::test]
    async fn test_disabled_cache_resolves_disabled_backend() {
        let cache = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        let module = build_catalog_module(&cache, &RedisConfig::default()).await;

        assert!(!module.cache_backend().is_enabled());
    }

    #[tokio::test]
    async fn test_memory_backend_override() {
        let module = build_catalog_module(&memory_cache(), &RedisConfig::default()).await;
        let backend = module.cache_backend();

        assert!(backend.is_enabled());
        assert!(backend.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_catalog_shares_module_repository() {
        let module = build_catalog_module(&memory_cache(), &RedisConfig::default()).await;
        let repository = module.service_repository();

        let _catalog = module.catalog();
        assert_eq!(
            repository
                .count(finmark_repository::ServiceQuery::all())
                .await
                .unwrap(),
            0
        );
        assert!(Arc::ptr_eq(&repository, &module.service_repository()));
    }
}
