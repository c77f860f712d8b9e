use futures::future::BoxFuture;
use tracing::warn;

use crate::{
    server::error::ServerError,
    store::{QuizStore, QuizTx},
};

/// Runs `f` inside one transaction: commit on `Ok`, rollback on `Err`.
/// The callback's error is returned even if the rollback itself fails.
pub async fn with_txn<T, F>(store: &dyn QuizStore, f: F) -> Result<T, ServerError>
where
    T: Send,
    F: for<'t> FnOnce(&'t mut dyn QuizTx) -> BoxFuture<'t, Result<T, ServerError>> + Send,
{
    let mut tx = store.begin().await?;
    let out = f(tx.as_mut()).await;

    match out {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Failed to roll back transaction: {}", rollback_err);
            }
            Err(e)
        }
    }
}
