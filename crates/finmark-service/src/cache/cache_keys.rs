//! Cache key derivation.
//!
//! A key is the operation name followed by the canonical JSON encoding of the
//! argument tuple: `finmark:cache:{operation}-{json}`. Object keys are sorted
//! at every depth, so structurally equal arguments always yield the same key
//! whatever field order a serializer happened to emit.

use finmark_core::FinmarkResult;
use serde::Serialize;
use serde_json::{Map, Value};

/// Prefix for all cache keys to namespace them.
pub const CACHE_PREFIX: &str = "finmark:cache";

/// Derives the cache key for an operation invoked with `args`.
///
/// Fails only when the arguments cannot be serialized.
pub fn method_key<A: Serialize + ?Sized>(operation: &str, args: &A) -> FinmarkResult<String> {
    let canonical = canonicalize(serde_json::to_value(args)?);
    Ok(format!(
        "{}:{}-{}",
        CACHE_PREFIX,
        operation,
        serde_json::to_string(&canonical)?
    ))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
