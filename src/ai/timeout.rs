//! Attempt Timeout Wrapper
//!
//! Bounds each completion exchange so one unresponsive request cannot stall
//! the repair loop. Timeouts surface as `GridsmithError::Timeout` and are
//! accounted like any other network failure.

use std::future::Future;
use std::time::Duration;

use crate::types::{GridsmithError, Result};

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation does not complete within the
/// given duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(GridsmithError::timeout(operation_name, timeout)),
    }
}
