//! In-process cache backend.

use super::CacheBackend;
use async_trait::async_trait;
use dashmap::DashMap;
use finmark_core::{FinmarkError, FinmarkResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Cache backend holding entries in a concurrent map.
///
/// Expiry is measured on the tokio clock, so tests can advance time with a
/// paused runtime. Expired entries are dropped lazily on lookup.
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    entries: DashMap<String, (String, Instant)>,
    closed: AtomicBool,
}

impl MemoryCacheBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until they are looked up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_open(&self) -> FinmarkResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(FinmarkError::cache_unavailable("Cache backend is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn get(&self, key: &str) -> FinmarkResult<Option<String>> {
        self.ensure_open()?;

        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if entry.1 > now => Some(entry.0.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        if value.is_none() {
            self.entries.remove_if(key, |_, (_, expires_at)| *expires_at <= now);
            debug!("Expired key '{}'", key);
        }
        Ok(value)
    }

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: &str) -> FinmarkResult<()> {
        self.ensure_open()?;
        self.entries
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn flush_all(&self) -> FinmarkResult<()> {
        self.ensure_open()?;
        self.entries.clear();
        Ok(())
    }

    async fn ping(&self) -> FinmarkResult<()> {
        self.ensure_open()
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.entries.clear();
    }
}
