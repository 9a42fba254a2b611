//! Redis-based cache backend.

use super::CacheBackend;
use async_trait::async_trait;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use finmark_config::RedisConfig;
use finmark_core::{FinmarkError, FinmarkResult};
use parking_lot::Mutex;
use redis::AsyncCommands;
use shaku::Component;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How long calls fail fast after a connection attempt has failed.
pub const DEFAULT_RECONNECT_COOLDOWN: Duration = Duration::from_secs(5);

/// Redis-based cache backend over a `deadpool-redis` connection pool.
///
/// Built without a pool (the shaku default, or [`RedisCacheBackend::disabled`])
/// the backend reports itself disabled and the caching decorator bypasses it.
///
/// After a failed connection attempt every call fails immediately until the
/// reconnect cooldown has passed, so an unreachable server costs one connect
/// timeout per cooldown window rather than one per call.
#[derive(Component)]
#[shaku(interface = CacheBackend)]
pub struct RedisCacheBackend {
    /// Redis connection pool.
    #[shaku(default)]
    pool: Option<Pool>,
    /// Set once [`CacheBackend::close`] has run.
    #[shaku(default)]
    closed: AtomicBool,
    /// Calls fail fast until this instant.
    #[shaku(default)]
    retry_at: Mutex<Option<Instant>>,
    #[shaku(default = DEFAULT_RECONNECT_COOLDOWN)]
    reconnect_cooldown: Duration,
}

impl RedisCacheBackend {
    /// Create a backend over an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self {
            pool: Some(pool),
            closed: AtomicBool::new(false),
            retry_at: Mutex::new(None),
            reconnect_cooldown: DEFAULT_RECONNECT_COOLDOWN,
        }
    }

    /// Create a no-op backend (for when caching is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            closed: AtomicBool::new(false),
            retry_at: Mutex::new(None),
            reconnect_cooldown: DEFAULT_RECONNECT_COOLDOWN,
        }
    }

    /// Overrides how long calls fail fast after a connection failure.
    #[must_use]
    pub fn with_reconnect_cooldown(mut self, cooldown: Duration) -> Self {
        self.reconnect_cooldown = cooldown;
        self
    }

    /// Builds the pool and checks the server with `PING`.
    ///
    /// An unreachable server does not fail construction: the warning is
    /// logged and the backend runs degraded, with each call failing once the
    /// pool's connect timeout elapses. Only a pool that cannot be built at all
    /// (for instance a malformed URL) yields a disabled backend.
    pub async fn connect(config: &RedisConfig) -> Self {
        info!(
            host = %config.host,
            port = config.port,
            database = config.database,
            tls = config.tls,
            "Connecting to Redis cache"
        );

        let pool = match Self::create_pool(config) {
            Ok(pool) => pool,
            Err(e) => {
                warn!(error = %e, "Redis cache pool could not be created; caching disabled");
                return Self::disabled();
            }
        };

        let backend = Self::new(pool).with_reconnect_cooldown(config.reconnect_cooldown());
        match backend.ping().await {
            Ok(()) => info!("Redis cache connected"),
            Err(e) => warn!(error = %e, "Redis cache unreachable; running degraded"),
        }
        backend
    }

    fn create_pool(config: &RedisConfig) -> FinmarkResult<Pool> {
        let timeout = config.connect_timeout();

        Config::from_url(config.connection_url())
            .builder()
            .map_err(|e| FinmarkError::Configuration(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size as usize)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| FinmarkError::Configuration(format!("Failed to create Redis pool: {}", e)))
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> FinmarkResult<Connection> {
        if self.closed.load(Ordering::Acquire) {
            return Err(FinmarkError::cache_unavailable("Redis connection is closed"));
        }
        let Some(pool) = &self.pool else {
            return Err(FinmarkError::cache_unavailable("Cache is disabled"));
        };

        let retry_at = *self.retry_at.lock();
        if let Some(retry_at) = retry_at {
            if Instant::now() < retry_at {
                return Err(FinmarkError::cache_unavailable(
                    "Redis unreachable, cooling down before reconnecting",
                ));
            }
        }

        match pool.get().await {
            Ok(conn) => {
                *self.retry_at.lock() = None;
                Ok(conn)
            }
            Err(e) => {
                *self.retry_at.lock() = Some(Instant::now() + self.reconnect_cooldown);
                Err(FinmarkError::cache_unavailable(format!(
                    "Failed to get Redis connection: {}",
                    e
                )))
            }
        }
    }
}

/// Whole seconds for `EX`, rounded up and never below one.
fn expiry_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    async fn get(&self, key: &str) -> FinmarkResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            FinmarkError::cache_unavailable(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: &str) -> FinmarkResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_secs = expiry_secs(ttl);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            FinmarkError::cache_unavailable(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn flush_all(&self) -> FinmarkResult<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|e| FinmarkError::cache_unavailable(format!("Failed to flush cache: {}", e)))?;

        debug!("Flushed cache database");
        Ok(())
    }

    async fn ping(&self) -> FinmarkResult<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(|e| FinmarkError::cache_unavailable(format!("PING failed: {}", e)))?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(pool) = &self.pool {
            pool.close();
            info!("Redis cache connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_backend() {
        let cache = RedisCacheBackend::disabled();
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_backend_calls_fail() {
        let cache = RedisCacheBackend::disabled();
        let err = cache.get("k").await.unwrap_err();
        assert!(matches!(err, FinmarkError::CacheUnavailable(_)));
    }

    #[test]
    fn test_expiry_rounds_up_to_whole_seconds() {
        assert_eq!(expiry_secs(Duration::from_secs(60)), 60);
        assert_eq!(expiry_secs(Duration::from_millis(1500)), 2);
        assert_eq!(expiry_secs(Duration::from_millis(10)), 1);
        assert_eq!(expiry_secs(Duration::ZERO), 1);
    }

    #[tokio::test]
    async fn test_unreachable_server_yields_degraded_backend() {
        let config = RedisConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout_ms: 200,
            ..RedisConfig::default()
        };

        let cache = RedisCacheBackend::connect(&config).await;
        assert!(cache.is_enabled());
        assert!(cache.ping().await.is_err());
        assert!(cache.flush_all().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_connect_fails_fast_until_cooldown_passes() {
        let config = RedisConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout_ms: 200,
            reconnect_cooldown_ms: 100,
            ..RedisConfig::default()
        };
        let cache = RedisCacheBackend::connect(&config).await;

        let err = cache.get("k").await.unwrap_err();
        assert!(err.to_string().contains("cooling down"));
        assert!(cache.set_with_expiry("k", Duration::from_secs(1), "v").await.is_err());

        tokio::time::sleep(Duration::from_millis(150)).await;
        let err = cache.ping().await.unwrap_err();
        assert!(!err.to_string().contains("cooling down"));

        let err = cache.flush_all().await.unwrap_err();
        assert!(err.to_string().contains("cooling down"));
    }

    #[tokio::test]
    async fn test_closed_backend_fails_immediately() {
        let config = RedisConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout_ms: 200,
            ..RedisConfig::default()
        };
        let cache = RedisCacheBackend::connect(&config).await;

        cache.close();
        cache.close();
        let err = cache.get("k").await.unwrap_err();
        assert!(err.to_string().contains("closed"));
    }
}
