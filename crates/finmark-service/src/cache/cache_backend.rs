//! Cache backend trait.

use async_trait::async_trait;
use finmark_core::{FinmarkResult, HealthCheck, HealthStatus, Interface};
use std::sync::Arc;
use std::time::Duration;

/// A flat key/value store with per-entry expiry.
///
/// Values are opaque strings; encoding is the caller's concern. Every call may
/// fail with `CacheUnavailable` when the store cannot be reached, which is
/// distinct from `Ok(None)` for a missing key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheBackend: Interface + Send + Sync {
    /// Returns the stored value if present and unexpired.
    async fn get(&self, key: &str) -> FinmarkResult<Option<String>>;

    /// Stores a value that stops being retrievable once `ttl` elapses. Overwrites.
    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: &str) -> FinmarkResult<()>;

    /// Removes every entry in the store. Idempotent.
    async fn flush_all(&self) -> FinmarkResult<()>;

    /// Round-trips to the store.
    async fn ping(&self) -> FinmarkResult<()>;

    /// False when no store is configured; callers should skip caching entirely.
    fn is_enabled(&self) -> bool;

    /// Releases connections. Later calls fail with `CacheUnavailable`.
    fn close(&self) {}
}

/// Health check over any cache backend.
pub struct CacheHealthCheck {
    backend: Arc<dyn CacheBackend>,
}

impl CacheHealthCheck {
    /// Creates a health check for the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl HealthCheck for CacheHealthCheck {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.backend.is_enabled() {
            return HealthStatus::Degraded("caching disabled".to_string());
        }
        match self.backend.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}
