//! Timeout wrapper for async operations.

use crate::FinmarkError;
use std::time::Duration;

/// Wraps an async operation with a timeout.
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> Result<T, FinmarkError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, FinmarkError>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| FinmarkError::Timeout(format!("Operation timed out after {:?}", duration)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_success() {
        let result = with_timeout(Duration::from_secs(1), || async { Ok::<_, FinmarkError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_timeout_exceeded() {
        let result = with_timeout(Duration::from_millis(10), || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, FinmarkError>(42)
        })
        .await;

        assert!(matches!(result, Err(FinmarkError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result = with_timeout(Duration::from_secs(1), || async {
            Err::<u32, _>(FinmarkError::cache_unavailable("refused"))
        })
        .await;

        assert!(matches!(result, Err(FinmarkError::CacheUnavailable(_))));
    }
}
