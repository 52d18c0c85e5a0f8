use std::future::Future;

use async_trait::async_trait;
use log::warn;

use super::ledger_mutation::LedgerMutation;
use crate::errors::Result;

/// Applies a [`LedgerMutation`] as one atomic unit.
///
/// Implementations must:
/// - apply every write of the mutation or none of them;
/// - apply an `Update` only while the stored `version` equals the row's
///   `version`, writing `version + 1`; otherwise fail with
///   `Error::ConcurrencyConflict` and roll back;
/// - apply a transaction status update only while that transaction is still
///   `pending`, failing with `Error::ConcurrencyConflict` otherwise;
/// - fail with `Error::NotFound` when an updated row does not exist.
#[async_trait]
pub trait LedgerWriterTrait: Send + Sync {
    async fn commit(&self, mutation: LedgerMutation) -> Result<()>;
}

/// Runs `attempt`, and runs it exactly once more if it lost an optimistic
/// version check. Any other error, or a second conflict, is returned as is.
pub async fn retry_on_conflict<T, F, Fut>(operation: &str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match attempt().await {
        Err(err) if err.is_conflict() => {
            warn!("{} lost a concurrent update, retrying once: {}", operation, err);
            attempt().await
        }
        other => other,
    }
}
