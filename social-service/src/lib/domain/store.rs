use std::future::Future;
use std::time::Duration;

/// Default bound on a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// A store call did not finish within its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeout;

/// Run a store call under a deadline.
///
/// The inner error converts into the caller's error type, and so does an
/// elapsed deadline. Nothing is retried.
pub async fn bounded<T, E, F>(timeout: Duration, operation: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<StoreTimeout>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(StoreTimeout.into()),
    }
}
