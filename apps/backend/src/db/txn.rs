use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::debug;

use super::txn_policy::{self, TxnPolicy};
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Boxed future returned by `with_txn` closures; borrows the transaction.
pub type TxnFuture<'c, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'c>>;

/// Run `f` inside a fresh transaction.
///
/// On `Ok` the transaction is committed (or rolled back under
/// `TxnPolicy::RollbackOnOk`); on `Err` it is rolled back and the original
/// error is returned.
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, R>,
{
    let txn = state.db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            match txn_policy::current() {
                TxnPolicy::CommitOnOk => txn.commit().await?,
                TxnPolicy::RollbackOnOk => {
                    debug!("rolling back successful transaction per policy");
                    txn.rollback().await?
                }
            }
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; the closure's error wins.
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
