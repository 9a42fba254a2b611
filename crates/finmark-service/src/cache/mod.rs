//! Caching infrastructure for the service layer.
//!
//! [`CacheBackend`] abstracts the key/value store (Redis in production, an
//! in-process map for development and tests). [`MethodCache`] is the generic
//! read-through decorator: it memoizes read operations of any wrapped service
//! and flushes the whole store before any mutating operation. Backend failures
//! never reach callers; they are logged, counted, and exported as metrics.

mod cache_backend;
pub mod cache_keys;
mod memory_cache;
mod method_cache;
mod redis_cache;
pub mod stats;

pub use cache_backend::{CacheBackend, CacheHealthCheck};
#[cfg(test)]
pub use cache_backend::MockCacheBackend;
pub use memory_cache::MemoryCacheBackend;
pub use method_cache::{MethodCache, OperationDescriptor, DEFAULT_BACKEND_TIMEOUT, DEFAULT_TTL};
pub use redis_cache::{RedisCacheBackend, RedisCacheBackendParameters};
pub use stats::{CacheStats, CacheStatsSnapshot, FailureStage};
