use std::future::Future;
use tokio::signal;
use tracing::warn;

use crate::error::{AppError, Result};

/// Run `task` until it finishes or the user interrupts with Ctrl-C.
///
/// Dropping the task future aborts any in-flight platform requests.
pub async fn until_interrupted<F, T>(task: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        result = task => result,
        _ = signal::ctrl_c() => {
            warn!("Interrupted, abandoning in-flight requests");
            Err(AppError::Cancelled)
        }
    }
}
