//! Server startup utilities.

use finmark_config::AppConfig;
use finmark_core::HealthStatus;
use tracing::{info, warn};

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    _______                           __
   / ____(_)___  ____ ___  ____ ______/ /__
  / /_  / / __ \/ __ `__ \/ __ `/ ___/ //_/
 / __/ / / / / / / / / / / /_/ / /  / ,<
/_/   /_/_/ /_/_/ /_/ /_/\__,_/_/  /_/|_|

                  Service Catalog
    "#);
}

/// Prints the startup summary, including the cache health probe result.
pub fn print_startup_info(config: &AppConfig, cache_health: &HealthStatus) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    if config.cache.enabled {
        info!(
            "Cache:       {:?}, TTL {}s, timeout {}ms",
            config.cache.backend, config.cache.ttl_secs, config.cache.operation_timeout_ms
        );
    } else {
        info!("Cache:       disabled");
    }
    match cache_health {
        HealthStatus::Healthy => info!("Cache health: healthy"),
        HealthStatus::Degraded(reason) => info!("Cache health: degraded ({})", reason),
        HealthStatus::Unhealthy(reason) => warn!("Cache health: unhealthy ({})", reason),
    }
    if config.observability.metrics_enabled {
        info!("Metrics:     http://{}/metrics", config.observability.metrics_addr);
    }
    info!("{}", separator);
}
