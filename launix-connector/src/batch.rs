//! Sequential processing of independent work items.

use std::future::Future;
use tracing::warn;

use crate::error::{ConnectorError, ConnectorResult};

/// What to do when one work item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort and return the failure, tagged with the item index.
    #[default]
    Stop,
    /// Record the failure and carry on with the next item.
    Continue,
}

/// Result of one work item under [`FailurePolicy::Continue`].
#[derive(Debug)]
pub enum ItemOutcome<T> {
    Succeeded(T),
    Failed { index: usize, error: ConnectorError },
}

impl<T> ItemOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Succeeded(_))
    }
}

/// Runs `f` over every item in order.
///
/// Under [`FailurePolicy::Stop`] the first failure is returned as
/// [`ConnectorError::Item`]; otherwise every item gets an outcome.
pub async fn run_items<I, T, F, Fut>(
    items: I,
    policy: FailurePolicy,
    mut f: F,
) -> ConnectorResult<Vec<ItemOutcome<T>>>
where
    I: IntoIterator,
    F: FnMut(usize, I::Item) -> Fut,
    Fut: Future<Output = ConnectorResult<T>>,
{
    let mut outcomes = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match f(index, item).await {
            Ok(value) => outcomes.push(ItemOutcome::Succeeded(value)),
            Err(error) => {
                warn!(index, %error, "work item failed");
                match policy {
                    FailurePolicy::Stop => return Err(error.at_item(index)),
                    FailurePolicy::Continue => outcomes.push(ItemOutcome::Failed { index, error }),
                }
            }
        }
    }
    Ok(outcomes)
}
