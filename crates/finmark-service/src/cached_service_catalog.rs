//! Caching front for any [`ServiceCatalog`].

use crate::cache::{CacheBackend, CacheStatsSnapshot, MethodCache, OperationDescriptor};
use crate::dto::{CreateServiceRequest, ServiceResponse, UpdateServiceRequest};
use crate::service_catalog::ServiceCatalog;
use async_trait::async_trait;
use finmark_config::CacheConfig;
use finmark_core::{FinmarkResult, Page, PageRequest, ServiceId};
use finmark_repository::ServiceQuery;
use std::sync::Arc;
use std::time::Duration;

/// Operation table for the catalog. Writes flush the cache.
const OPERATIONS: &[OperationDescriptor] = &[
    OperationDescriptor::read("find_services"),
    OperationDescriptor::read("find_service_by_id"),
    OperationDescriptor::mutating("create_service"),
    OperationDescriptor::mutating("update_service"),
    OperationDescriptor::mutating("delete_service"),
];

/// A [`ServiceCatalog`] that memoizes reads of the wrapped catalog.
pub struct CachedServiceCatalog<S: ?Sized = dyn ServiceCatalog> {
    cache: MethodCache<S>,
}

impl<S: ServiceCatalog + ?Sized> CachedServiceCatalog<S> {
    /// Wraps `inner` with the default TTL and backend timeout.
    pub fn new(inner: Arc<S>, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            cache: MethodCache::new(inner, backend, OPERATIONS),
        }
    }

    /// Wraps `inner` using TTL and timeout from configuration.
    pub fn from_config(inner: Arc<S>, backend: Arc<dyn CacheBackend>, config: &CacheConfig) -> Self {
        Self {
            cache: MethodCache::new(inner, backend, OPERATIONS)
                .with_ttl(config.ttl())
                .with_backend_timeout(config.operation_timeout()),
        }
    }

    /// Overrides the entry TTL.
    #[must_use]
    pub fn with_ttl(self, ttl: Duration) -> Self {
        Self {
            cache: self.cache.with_ttl(ttl),
        }
    }

    /// The operations this wrapper dispatches, with their mutation flags.
    pub fn operations() -> &'static [OperationDescriptor] {
        OPERATIONS
    }

    /// The wrapped catalog.
    pub fn inner(&self) -> &Arc<S> {
        self.cache.inner()
    }

    /// Cache counters for this wrapper.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }
}

#[async_trait]
impl<S: ServiceCatalog + ?Sized> ServiceCatalog for CachedServiceCatalog<S> {
    async fn find_services(&self, query: ServiceQuery, page: PageRequest) -> FinmarkResult<Page<ServiceResponse>> {
        self.cache
            .call("find_services", &(query, page), |svc| async move {
                svc.find_services(query, page).await
            })
            .await
    }

    async fn find_service_by_id(&self, id: ServiceId) -> FinmarkResult<Option<ServiceResponse>> {
        self.cache
            .call("find_service_by_id", &(id,), |svc| async move {
                svc.find_service_by_id(id).await
            })
            .await
    }

    async fn create_service(&self, request: CreateServiceRequest) -> FinmarkResult<ServiceResponse> {
        self.cache
            .call("create_service", &(), |svc| async move {
                svc.create_service(request).await
            })
            .await
    }

    async fn update_service(&self, id: ServiceId, request: UpdateServiceRequest) -> FinmarkResult<Option<ServiceResponse>> {
        self.cache
            .call("update_service", &(), |svc| async move {
                svc.update_service(id, request).await
            })
            .await
    }

    async fn delete_service(&self, id: ServiceId) -> FinmarkResult<Option<ServiceResponse>> {
        self.cache
            .call("delete_service", &(), |svc| async move { svc.delete_service(id).await })
            .await
    }
}

impl<S: ?Sized> std::fmt::Debug for CachedServiceCatalog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedServiceCatalog")
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_table_marks_writes() {
        let table = CachedServiceCatalog::<dyn ServiceCatalog>::operations();
        let mutating: Vec<&str> = table.iter().filter(|op| op.is_mutating).map(|op| op.name).collect();
        let reads: Vec<&str> = table.iter().filter(|op| !op.is_mutating).map(|op| op.name).collect();

        assert_eq!(mutating, ["create_service", "update_service", "delete_service"]);
        assert_eq!(reads, ["find_services", "find_service_by_id"]);
    }
}
