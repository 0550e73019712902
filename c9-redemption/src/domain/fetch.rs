//! Shared helpers for bounded ledger calls

use std::future::Future;
use std::time::Duration;

use crate::core::{LedgerError, LedgerResult};

/// Run one collaborator call under a deadline
pub(crate) async fn timed<T, F>(limit: Duration, call: F) -> LedgerResult<T>
where
    F: Future<Output = LedgerResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(LedgerError::Timeout(limit)),
    }
}

/// Number of chunks `len` items split into
pub(crate) fn chunk_count(len: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    len.div_ceil(chunk_size)
}
