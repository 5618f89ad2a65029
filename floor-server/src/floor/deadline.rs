//! Time bounds for store work
//!
//! Every floor operation runs under a deadline. Transactional operations
//! stage their writes under the deadline and commit after it: on expiry the
//! open transaction is dropped and rolled back, and once the work is staged
//! the commit always runs. A `DeadlineExceeded` result therefore means
//! nothing was written, and a retry cannot apply the same change twice.

use std::future::Future;
use std::time::Duration;

use sqlx::{Sqlite, Transaction};

use super::error::{FloorError, FloorResult, StoreContext};

/// An open transaction holding finished work, plus the operation's result
pub(crate) type Staged<T> = (Transaction<'static, Sqlite>, T);

/// Run `fut` under `deadline`
pub(crate) async fn bounded<T, F>(deadline: Duration, context: &'static str, fut: F) -> FloorResult<T>
where
    F: Future<Output = FloorResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            let after_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(context, after_ms, "Deadline exceeded, nothing written");
            Err(FloorError::DeadlineExceeded { context, after_ms })
        }
    }
}

/// Stage the work under `deadline`, then commit it
pub(crate) async fn bounded_commit<T, F>(
    deadline: Duration,
    context: &'static str,
    fut: F,
) -> FloorResult<T>
where
    F: Future<Output = FloorResult<Staged<T>>>,
{
    let (tx, value) = bounded(deadline, context, fut).await?;
    tx.commit().await.store(context)?;
    Ok(value)
}
