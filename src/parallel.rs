use anyhow::Context;
use tokio::task::JoinSet;

use crate::runtime::Dispatcher;

/// Runs `operation` for every input concurrently, waits for all of them, then projects
/// the outputs in input order, keeping only projections that return `Some`.
///
/// Operations are spawned as children of this call: the first failure is returned as
/// soon as it is observed, and the remaining children are aborted, as they are when the
/// returned future is dropped. A panicking child panics the caller.
///
/// Must be awaited inside a tokio runtime when `dispatcher` is [`Dispatcher::Inherit`].
pub async fn execute_parallelly<I, R, O, F, Fut, P>(
    inputs: impl IntoIterator<Item = I>,
    dispatcher: &Dispatcher,
    mut operation: F,
    projection: P,
) -> anyhow::Result<Vec<O>>
where
    F: FnMut(I) -> Fut,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    R: Send + 'static,
    P: FnMut(R) -> Option<O>,
{
    let mut children = JoinSet::new();
    let mut slots: Vec<Option<R>> = Vec::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let future = operation(input);
        dispatcher.spawn_into(&mut children, async move { (index, future.await) });
        slots.push(None);
    }
    tracing::debug!(count = slots.len(), "scheduled parallel operations");

    while let Some(joined) = children.join_next().await {
        let (index, output) = match joined {
            Ok(joined) => joined,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => {
                tracing::warn!(error = %err, "parallel operation was cancelled");
                return Err(err).context("parallel operation was cancelled");
            }
        };
        match output {
            Ok(output) => slots[index] = Some(output),
            Err(err) => {
                tracing::warn!(index, error = %err, "parallel operation failed, aborting the rest");
                return Err(err);
            }
        }
    }

    Ok(slots.into_iter().flatten().filter_map(projection).collect())
}
