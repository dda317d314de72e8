use crate::domain::model::TestRecord;
use crate::domain::ports::RecordCaller;
use crate::utils::error::{HarnessError, Result};
use std::sync::Arc;
use tokio::task::JoinSet;

/// ID every call starts from; the procedure should hand back `START_ID + 1`.
pub const START_ID: i64 = 1;

/// Runs `workers` calls concurrently and waits for all of them.
///
/// The first failure aborts the rest of the batch and is returned.
pub async fn run_batch<C>(caller: &Arc<C>, workers: usize) -> Result<()>
where
    C: RecordCaller + 'static,
{
    let mut set = JoinSet::new();

    for worker in 0..workers {
        let caller = Arc::clone(caller);
        set.spawn_blocking(move || call_once(caller.as_ref(), worker));
    }

    while let Some(joined) = set.join_next().await {
        let outcome = joined.map_err(HarnessError::from).and_then(|r| r);
        if let Err(e) = outcome {
            set.abort_all();
            return Err(e);
        }
    }

    Ok(())
}

fn call_once<C: RecordCaller + ?Sized>(caller: &C, worker: usize) -> Result<()> {
    let record = TestRecord::new(START_ID);
    let expected = record.incremented()?;
    let actual = caller.call_increment(record)?;

    if actual != expected {
        return Err(HarnessError::UnexpectedResultError {
            worker,
            expected: expected.id(),
            actual: actual.id(),
        });
    }

    tracing::trace!("worker {} got ID {}", worker, actual.id());
    Ok(())
}
