//! Generic read-through caching decorator.

use super::stats::{CacheStats, CacheStatsSnapshot, FailureStage};
use super::{cache_keys, CacheBackend};
use finmark_core::{with_timeout, FinmarkError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default lifetime of a cached result.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Default upper bound on any single backend call.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_millis(500);

/// Declares one operation of a wrapped service and whether it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub is_mutating: bool,
}

impl OperationDescriptor {
    /// A read operation; results are memoized.
    #[must_use]
    pub const fn read(name: &'static str) -> Self {
        Self {
            name,
            is_mutating: false,
        }
    }

    /// A mutating operation; the whole store is flushed before it runs.
    #[must_use]
    pub const fn mutating(name: &'static str) -> Self {
        Self {
            name,
            is_mutating: true,
        }
    }
}

/// Wraps a service and routes its operations through a [`CacheBackend`].
///
/// Read operations are served from the cache when possible and populate it
/// on a miss. Mutating operations flush the entire backend, then always run.
/// Cache trouble of any kind (unreachable backend, timeouts, codec errors)
/// degrades to calling the wrapped service directly; only the wrapped
/// service's own errors reach the caller.
///
/// The flush is store-wide: decorators sharing one backend invalidate each
/// other's entries.
pub struct MethodCache<S: ?Sized> {
    inner: Arc<S>,
    backend: Arc<dyn CacheBackend>,
    mutating: HashSet<&'static str>,
    ttl: Duration,
    backend_timeout: Duration,
    stats: CacheStats,
}

impl<S: ?Sized + Send + Sync> MethodCache<S> {
    /// Creates a decorator. The mutating set is taken from `operations` and fixed from here on.
    pub fn new(inner: Arc<S>, backend: Arc<dyn CacheBackend>, operations: &[OperationDescriptor]) -> Self {
        Self {
            inner,
            backend,
            mutating: operations
                .iter()
                .filter(|op| op.is_mutating)
                .map(|op| op.name)
                .collect(),
            ttl: DEFAULT_TTL,
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
            stats: CacheStats::default(),
        }
    }

    /// Overrides the entry TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Overrides the per-call backend timeout.
    #[must_use]
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    /// The wrapped service.
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// The entry TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `operation` was declared mutating.
    pub fn is_mutating(&self, operation: &str) -> bool {
        self.mutating.contains(operation)
    }

    /// Current hit, miss, and failure counters.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Runs `operation` through the cache.
    ///
    /// `args` is the operation's argument tuple and only feeds the cache key;
    /// `invoke` performs the real call on the wrapped service.
    pub async fn call<A, T, E, F, Fut>(&self, operation: &'static str, args: &A, invoke: F) -> Result<T, E>
    where
        A: Serialize + Sync + ?Sized,
        T: Serialize + DeserializeOwned + Send + Sync,
        E: Send,
        F: FnOnce(Arc<S>) -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        if !self.backend.is_enabled() {
            return invoke(Arc::clone(&self.inner)).await;
        }

        if self.is_mutating(operation) {
            self.flush(operation).await;
            return invoke(Arc::clone(&self.inner)).await;
        }

        let key = match cache_keys::method_key(operation, args) {
            Ok(key) => key,
            Err(e) => {
                self.report(FailureStage::Encode, operation, &e);
                self.stats.record_miss(operation);
                return invoke(Arc::clone(&self.inner)).await;
            }
        };

        if let Some(cached) = self.lookup::<T>(operation, &key).await {
            return Ok(cached);
        }

        let result = invoke(Arc::clone(&self.inner)).await?;
        self.populate(operation, &key, &result).await;
        Ok(result)
    }

    async fn flush(&self, operation: &'static str) {
        match with_timeout(self.backend_timeout, || self.backend.flush_all()).await {
            Ok(()) => {
                debug!(operation, "Cache flushed before mutation");
                self.stats.record_flush(operation);
            }
            Err(e) => self.report(FailureStage::Flush, operation, &e),
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, operation: &'static str, key: &str) -> Option<T> {
        let found = match with_timeout(self.backend_timeout, || self.backend.get(key)).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    self.report(FailureStage::Decode, operation, &FinmarkError::from(e));
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                self.report(FailureStage::Get, operation, &e);
                None
            }
        };

        if found.is_some() {
            debug!(operation, key, "Cache hit");
            self.stats.record_hit(operation);
        } else {
            debug!(operation, key, "Cache miss");
            self.stats.record_miss(operation);
        }
        found
    }

    async fn populate<T: Serialize>(&self, operation: &'static str, key: &str, result: &T) {
        let encoded = match serde_json::to_string(result) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.report(FailureStage::Encode, operation, &FinmarkError::from(e));
                return;
            }
        };

        if let Err(e) = with_timeout(self.backend_timeout, || {
            self.backend.set_with_expiry(key, self.ttl, &encoded)
        })
        .await
        {
            self.report(FailureStage::Set, operation, &e);
        }
    }

    fn report(&self, stage: FailureStage, operation: &'static str, error: &FinmarkError) {
        warn!(
            stage = stage.as_str(),
            operation,
            error = %error,
            "Cache {} failed, continuing without cache",
            stage
        );
        self.stats.record_failure(stage, operation);
    }
}

impl<S: ?Sized> fmt::Debug for MethodCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodCache")
            .field("mutating", &self.mutating)
            .field("ttl", &self.ttl)
            .field("backend_timeout", &self.backend_timeout)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCacheBackend, MockCacheBackend};
    use finmark_core::FinmarkResult;
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    impl Counter {
        async fn lookup(&self, id: &str) -> FinmarkResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("value-{id}"))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    const OPS: &[OperationDescriptor] = &[
        OperationDescriptor::read("lookup"),
        OperationDescriptor::mutating("write"),
    ];

    fn decorate(backend: Arc<dyn CacheBackend>) -> (Arc<Counter>, MethodCache<Counter>) {
        let inner = Arc::new(Counter::default());
        let cache = MethodCache::new(Arc::clone(&inner), backend, OPS);
        (inner, cache)
    }

    async fn lookup(cache: &MethodCache<Counter>, id: &'static str) -> FinmarkResult<String> {
        cache
            .call("lookup", &(id,), |svc| async move { svc.lookup(id).await })
            .await
    }

    #[test]
    fn test_mutating_set_comes_from_descriptors() {
        let (_, cache) = decorate(Arc::new(MemoryCacheBackend::new()));
        assert!(cache.is_mutating("write"));
        assert!(!cache.is_mutating("lookup"));
        assert!(!cache.is_mutating("undeclared"));
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }

    #[tokio::test]
    async fn test_disabled_backend_is_bypassed() {
        let mut backend = MockCacheBackend::new();
        backend.expect_is_enabled().return_const(false);
        backend.expect_get().never();
        backend.expect_set_with_expiry().never();
        backend.expect_flush_all().never();

        let (inner, cache) = decorate(Arc::new(backend));
        lookup(&cache, "a").await.unwrap();
        lookup(&cache, "a").await.unwrap();

        assert_eq!(inner.calls(), 2);
        assert_eq!(cache.stats(), CacheStatsSnapshot::default());
    }

    #[tokio::test]
    async fn test_hit_skips_wrapped_service() {
        let mut backend = MockCacheBackend::new();
        backend.expect_is_enabled().return_const(true);
        backend
            .expect_get()
            .with(eq("finmark:cache:lookup-[\"a\"]"))
            .times(1)
            .returning(|_| Ok(Some("\"cached\"".to_string())));
        backend.expect_set_with_expiry().never();

        let (inner, cache) = decorate(Arc::new(backend));
        assert_eq!(lookup(&cache, "a").await.unwrap(), "cached");
        assert_eq!(inner.calls(), 0);
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_miss_populates_with_configured_ttl() {
        let mut backend = MockCacheBackend::new();
        backend.expect_is_enabled().return_const(true);
        backend.expect_get().returning(|_| Ok(None));
        backend
            .expect_set_with_expiry()
            .withf(|key, ttl, value| {
                key == "finmark:cache:lookup-[\"a\"]" && *ttl == Duration::from_secs(5) && value == "\"value-a\""
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (inner, cache) = decorate(Arc::new(backend));
        let cache = cache.with_ttl(Duration::from_secs(5));

        assert_eq!(lookup(&cache, "a").await.unwrap(), "value-a");
        assert_eq!(inner.calls(), 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_treated_as_miss() {
        let mut backend = MockCacheBackend::new();
        backend.expect_is_enabled().return_const(true);
        backend
            .expect_get()
            .returning(|_| Ok(Some("{not json".to_string())));
        backend.expect_set_with_expiry().returning(|_, _, _| Ok(()));

        let (inner, cache) = decorate(Arc::new(backend));
        assert_eq!(lookup(&cache, "a").await.unwrap(), "value-a");
        assert_eq!(inner.calls(), 1);

        let stats = cache.stats();
        assert_eq!(stats.decode_failures, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_get_and_set_failures_are_swallowed() {
        let mut backend = MockCacheBackend::new();
        backend.expect_is_enabled().return_const(true);
        backend
            .expect_get()
            .returning(|_| Err(FinmarkError::cache_unavailable("down")));
        backend
            .expect_set_with_expiry()
            .returning(|_, _, _| Err(FinmarkError::cache_unavailable("down")));

        let (inner, cache) = decorate(Arc::new(backend));
        assert_eq!(lookup(&cache, "a").await.unwrap(), "value-a");

        let stats = cache.stats();
        assert_eq!(inner.calls(), 1);
        assert_eq!(stats.get_failures, 1);
        assert_eq!(stats.set_failures, 1);
    }

    #[tokio::test]
    async fn test_mutation_flushes_then_runs_even_if_flush_fails() {
        let mut backend = MockCacheBackend::new();
        backend.expect_is_enabled().return_const(true);
        backend
            .expect_flush_all()
            .times(1)
            .returning(|| Err(FinmarkError::cache_unavailable("down")));
        backend.expect_get().never();

        let (_, cache) = decorate(Arc::new(backend));
        let result: FinmarkResult<u8> = cache.call("write", &(), |_| async { Ok(7) }).await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(cache.stats().flush_failures, 1);
    }

    #[tokio::test]
    async fn test_wrapped_error_propagates_and_is_not_cached() {
        let backend = Arc::new(MemoryCacheBackend::new());
        let (_, cache) = decorate(Arc::clone(&backend) as Arc<dyn CacheBackend>);

        let result: Result<String, &'static str> = cache
            .call("lookup", &("a",), |_| async { Err("boom") })
            .await;

        assert_eq!(result.unwrap_err(), "boom");
        assert!(backend.is_empty());
    }

    /// Serializes to an error, as a type with a failing `Serialize` impl would.
    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Opaque(u32);

    impl Serialize for Opaque {
        fn serialize<Ser: serde::Serializer>(&self, _: Ser) -> Result<Ser::Ok, Ser::Error> {
            Err(serde::ser::Error::custom("opaque values cannot be encoded"))
        }
    }

    #[tokio::test]
    async fn test_unencodable_result_only_skips_populate() {
        let backend = Arc::new(MemoryCacheBackend::new());
        let (_, cache) = decorate(Arc::clone(&backend) as Arc<dyn CacheBackend>);

        for _ in 0..2 {
            let result: FinmarkResult<Opaque> = cache
                .call("lookup", &("a",), |_| async { Ok(Opaque(3)) })
                .await;
            assert_eq!(result.unwrap(), Opaque(3));
        }

        let stats = cache.stats();
        assert_eq!(stats.encode_failures, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 0);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_unencodable_arguments_bypass_the_backend() {
        let mut backend = MockCacheBackend::new();
        backend.expect_is_enabled().return_const(true);
        backend.expect_get().never();
        backend.expect_set_with_expiry().never();

        let (inner, cache) = decorate(Arc::new(backend));
        let result: FinmarkResult<String> = cache
            .call("lookup", &(Opaque(1),), |svc| async move { svc.lookup("a").await })
            .await;

        assert_eq!(result.unwrap(), "value-a");
        assert_eq!(inner.calls(), 1);
        assert_eq!(cache.stats().encode_failures, 1);
    }

    #[tokio::test]
    async fn test_hit_returns_bit_identical_floats() {
        let (_, cache) = decorate(Arc::new(MemoryCacheBackend::new()));
        let values = [
            f64::from_bits(0x3321_0b19_b82e_5732),
            0.1 + 0.2,
            1_199.99,
            f64::MIN_POSITIVE,
            -2.2250738585072014e-308,
        ];

        for value in values {
            let miss: FinmarkResult<f64> = cache.call("lookup", &(value,), |_| async move { Ok(value) }).await;
            let hit: FinmarkResult<f64> = cache.call("lookup", &(value,), |_| async { Ok(f64::NAN) }).await;

            assert_eq!(miss.unwrap().to_bits(), value.to_bits());
            assert_eq!(hit.unwrap().to_bits(), value.to_bits());
        }
        assert_eq!(cache.stats().hits, values.len() as u64);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out_and_falls_through() {
        struct Stalled;

        #[async_trait::async_trait]
        impl CacheBackend for Stalled {
            async fn get(&self, _: &str) -> FinmarkResult<Option<String>> {
                std::future::pending().await
            }
            async fn set_with_expiry(&self, _: &str, _: Duration, _: &str) -> FinmarkResult<()> {
                std::future::pending().await
            }
            async fn flush_all(&self) -> FinmarkResult<()> {
                std::future::pending().await
            }
            async fn ping(&self) -> FinmarkResult<()> {
                std::future::pending().await
            }
            fn is_enabled(&self) -> bool {
                true
            }
        }

        let (inner, cache) = decorate(Arc::new(Stalled));
        let cache = cache.with_backend_timeout(Duration::from_millis(50));

        assert_eq!(lookup(&cache, "a").await.unwrap(), "value-a");
        let result: FinmarkResult<()> = cache.call("write", &(), |_| async { Ok(()) }).await;
        assert!(result.is_ok());

        let stats = cache.stats();
        assert_eq!(inner.calls(), 1);
        assert_eq!(stats.get_failures, 1);
        assert_eq!(stats.set_failures, 1);
        assert_eq!(stats.flush_failures, 1);
    }
}
