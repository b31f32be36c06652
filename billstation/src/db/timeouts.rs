//! Database query timeout helpers
//!
//! Wraps store and cache operations so a wedged backend surfaces as a
//! retryable error instead of hanging the request indefinitely.

use std::time::Duration;
use tokio::time::timeout;

use crate::auth::AuthError;

/// Default timeout for database queries (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for timeout operations
#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    /// Operation timed out
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<TimeoutError> for AuthError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(_) => {
                AuthError::CollaboratorUnavailable("credential store".to_string())
            }
            TimeoutError::Database(e) => e.into(),
        }
    }
}

/// Result type for timeout operations
pub type TimeoutResult<T> = Result<T, TimeoutError>;

/// Execute a query with timeout
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> TimeoutResult<T>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(TimeoutError::Database(e)),
        Err(_) => Err(TimeoutError::Timeout(duration)),
    }
}

/// Execute a query with the default timeout (5 seconds)
pub async fn with_default_timeout<F, T>(future: F) -> TimeoutResult<T>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    with_timeout(DEFAULT_QUERY_TIMEOUT, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_maps_to_collaborator_unavailable() {
        let never = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<(), sqlx::Error>(())
        };

        let err = with_timeout(Duration::from_millis(10), never)
            .await
            .unwrap_err();
        assert!(matches!(err, TimeoutError::Timeout(_)));

        let auth_err: AuthError = err.into();
        assert!(auth_err.is_retryable());
    }

    #[tokio::test]
    async fn test_completed_query_passes_through() {
        let result = with_default_timeout(async { Ok::<i32, sqlx::Error>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
