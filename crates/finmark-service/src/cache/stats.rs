//! Cache outcome counters.
//!
//! Each [`MethodCache`](super::MethodCache) keeps its own [`CacheStats`] and
//! also publishes the same events through the `metrics` facade, labelled by
//! operation and failure stage.

use metrics::{counter, describe_counter};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metric names for the caching decorator.
pub mod names {
    /// Reads served from the cache.
    pub const CACHE_HITS_TOTAL: &str = "finmark_cache_hits_total";
    /// Reads that reached the wrapped service.
    pub const CACHE_MISSES_TOTAL: &str = "finmark_cache_misses_total";
    /// Backend or codec failures absorbed by the decorator.
    pub const CACHE_FAILURES_TOTAL: &str = "finmark_cache_failures_total";
    /// Whole-store flushes triggered by mutating operations.
    pub const CACHE_FLUSHES_TOTAL: &str = "finmark_cache_flushes_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of reads served from cache");
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of reads that invoked the wrapped service"
    );
    describe_counter!(
        names::CACHE_FAILURES_TOTAL,
        "Total number of swallowed cache failures, by stage"
    );
    describe_counter!(
        names::CACHE_FLUSHES_TOTAL,
        "Total number of successful whole-store flushes"
    );
}

/// Where in the read or write path a cache failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// Backend lookup failed or timed out.
    Get,
    /// Backend store failed or timed out.
    Set,
    /// Backend flush failed or timed out.
    Flush,
    /// Arguments or result could not be serialized.
    Encode,
    /// A stored value could not be deserialized.
    Decode,
}

impl FailureStage {
    /// Returns the label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Flush => "flush",
            Self::Encode => "encode",
            Self::Decode => "decode",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live counters for one decorator instance.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    flushes: AtomicU64,
    get_failures: AtomicU64,
    set_failures: AtomicU64,
    flush_failures: AtomicU64,
    encode_failures: AtomicU64,
    decode_failures: AtomicU64,
}

impl CacheStats {
    /// Records a read served from the cache.
    pub fn record_hit(&self, operation: &'static str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!(names::CACHE_HITS_TOTAL, "operation" => operation).increment(1);
    }

    /// Records a read that had to invoke the wrapped service.
    pub fn record_miss(&self, operation: &'static str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!(names::CACHE_MISSES_TOTAL, "operation" => operation).increment(1);
    }

    /// Records a successful flush.
    pub fn record_flush(&self, operation: &'static str) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        counter!(names::CACHE_FLUSHES_TOTAL, "operation" => operation).increment(1);
    }

    /// Records a swallowed failure.
    pub fn record_failure(&self, stage: FailureStage, operation: &'static str) {
        let slot = match stage {
            FailureStage::Get => &self.get_failures,
            FailureStage::Set => &self.set_failures,
            FailureStage::Flush => &self.flush_failures,
            FailureStage::Encode => &self.encode_failures,
            FailureStage::Decode => &self.decode_failures,
        };
        slot.fetch_add(1, Ordering::Relaxed);
        counter!(
            names::CACHE_FAILURES_TOTAL,
            "stage" => stage.as_str(),
            "operation" => operation
        )
        .increment(1);
    }

    /// Returns a point-in-time copy of the counters.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            get_failures: self.get_failures.load(Ordering::Relaxed),
            set_failures: self.set_failures.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub flushes: u64,
    pub get_failures: u64,
    pub set_failures: u64,
    pub flush_failures: u64,
    pub encode_failures: u64,
    pub decode_failures: u64,
}

impl CacheStatsSnapshot {
    /// Total swallowed failures across all stages.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.get_failures
            + self.set_failures
            + self.flush_failures
            + self.encode_failures
            + self.decode_failures
    }

    /// Fraction of reads served from the cache, if any reads happened.
    #[must_use]
    pub fn hit_ratio(&self) -> Option<f64> {
        let reads = self.hits + self.misses;
        (reads > 0).then(|| self.hits as f64 / reads as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate_by_stage() {
        let stats = CacheStats::default();
        stats.record_hit("find");
        stats.record_miss("find");
        stats.record_miss("find");
        stats.record_failure(FailureStage::Get, "find");
        stats.record_failure(FailureStage::Decode, "find");
        stats.record_failure(FailureStage::Flush, "create");

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 2);
        assert_eq!(snapshot.get_failures, 1);
        assert_eq!(snapshot.decode_failures, 1);
        assert_eq!(snapshot.flush_failures, 1);
        assert_eq!(snapshot.set_failures, 0);
        assert_eq!(snapshot.failures(), 3);
    }

    #[test]
    fn test_hit_ratio() {
        assert_eq!(CacheStatsSnapshot::default().hit_ratio(), None);

        let snapshot = CacheStatsSnapshot {
            hits: 3,
            misses: 1,
            ..CacheStatsSnapshot::default()
        };
        assert_eq!(snapshot.hit_ratio(), Some(0.75));
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(FailureStage::Flush.to_string(), "flush");
        assert_eq!(serde_json::to_string(&FailureStage::Encode).unwrap(), "\"encode\"");
    }
}
