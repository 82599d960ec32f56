// Utility functions for recommendation-service

use crate::error::{AppError, Result};
use std::future::Future;
use std::time::Duration;

/// Run a fallible collaborator call bounded by `duration`.
///
/// Elapsed deadlines map to `AppError::Timeout`; the call's own error passes through.
pub async fn with_timeout<F, T>(duration: Duration, operation: &str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "{} timed out after {:?}",
            operation, duration
        ))),
    }
}
