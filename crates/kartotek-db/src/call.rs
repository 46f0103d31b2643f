//! Timeout and retry policy around store calls.
//!
//! Every query runs under an explicit deadline so a hung connection cannot
//! stall a request indefinitely. Reads are retried a bounded number of times
//! on transient transport failures; writes run at most once, since a retried
//! write that already reached the store would apply twice.

use anyhow::{anyhow, Context, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

const STORE_TIMEOUT: Duration = Duration::from_secs(5);
const READ_ATTEMPTS: u32 = 3;

fn is_transient(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut)
}

/// Run an idempotent read, retrying transient failures.
pub(crate) async fn read<T, F, Fut>(what: &'static str, op: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt = 1;
    loop {
        match timeout(STORE_TIMEOUT, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) if attempt < READ_ATTEMPTS && is_transient(&err) => {
                tracing::warn!(
                    "Failed to {} (attempt {}/{}): {}",
                    what,
                    attempt,
                    READ_ATTEMPTS,
                    err
                );
            }
            Ok(Err(err)) => return Err(err).context(format!("Failed to {what}")),
            Err(_) if attempt < READ_ATTEMPTS => {
                tracing::warn!(
                    "Timed out trying to {} (attempt {}/{})",
                    what,
                    attempt,
                    READ_ATTEMPTS
                );
            }
            Err(_) => return Err(anyhow!("Timed out trying to {what}")),
        }
        attempt += 1;
    }
}

/// Run a write once, under the store deadline.
pub(crate) async fn write<T, Fut>(what: &'static str, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(STORE_TIMEOUT, fut).await {
        Ok(result) => result.context(format!("Failed to {what}")),
        Err(_) => Err(anyhow!("Timed out trying to {what}")),
    }
}
