//! Deadline races for the few operations that have one.

use std::future::Future;
use std::time::Duration;

use crate::error::CoreError;

/// Limit on a market creation submission.
pub const MARKET_CREATE_TIMEOUT: Duration = Duration::from_secs(30);

pub const MARKET_CREATE_TIMEOUT_MESSAGE: &str =
    "La création du marché prend trop de temps... Vérifiez votre connexion puis réessayez.";

/// Race `fut` against `limit`. On expiry the future is dropped and
/// `CoreError::Timeout(message)` is returned, so callers can tell "took too
/// long" apart from "failed".
pub async fn race_timeout<F, T, E>(fut: F, limit: Duration, message: &str) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<CoreError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(limit_secs = limit.as_secs_f64(), "Operation timed out");
            Err(CoreError::Timeout(message.to_string()).into())
        }
    }
}
