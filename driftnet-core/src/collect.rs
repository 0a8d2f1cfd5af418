//! Bounded fan-out collection of independent async operations
//!
//! Runs many caller-supplied operations with bounded parallelism and a
//! per-operation deadline, streaming results back in completion order. A
//! failing, hanging, or panicking operation affects only its own slot in the
//! result stream; siblings run to completion undisturbed.

use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::Stream;
use futures::FutureExt;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::config::CollectConfig;

/// Outcome of one collected operation.
///
/// Failures are stream values, not raised errors; a consumer tallies them
/// without one bad operation aborting the batch.
pub type CollectedResult<T> = Result<T, CollectError>;

/// Per-operation failures captured by the collector.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Operation timed out after {limit:?}")]
    Timeout { limit: Duration },

    #[error("Operation panicked: {reason}")]
    Panicked { reason: String },
}

/// Runs sets of independent async operations under shared limits.
///
/// Cheap to construct; one instance per configuration is enough, and each
/// [`collect`](Self::collect) call is an isolated run with its own slots.
#[derive(Debug, Clone)]
pub struct FanOutCollector {
    config: CollectConfig,
}

impl FanOutCollector {
    /// Creates a collector with the given limits.
    pub fn new(config: CollectConfig) -> Self {
        Self { config }
    }

    /// Starts every operation and returns the result stream.
    ///
    /// At most `max_concurrent` operations run at once; admission is FIFO.
    /// Each operation gets its own `op_timeout` deadline. Results arrive in
    /// completion order, one per submitted operation when the stream is
    /// drained fully. A slot is held until the operation's result is handed
    /// to the stream's buffer, so a stalled consumer throttles the run.
    ///
    /// Dropping the returned stream aborts every in-flight operation and
    /// releases all slots; nothing keeps running in the background.
    pub fn collect<I, F, T>(&self, operations: I) -> CollectStream<T>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let limit = self.config.max_concurrent.max(1);
        let op_timeout = self.config.op_timeout;

        let slots = Arc::new(Semaphore::new(limit));
        let (sender, receiver) = mpsc::channel(limit);

        let mut tasks = JoinSet::new();
        let mut submitted = 0usize;
        for operation in operations {
            let slots = slots.clone();
            let sender = sender.clone();
            tasks.spawn(async move {
                // Closed only when the stream is dropped, at which point
                // this task is being aborted anyway.
                let Ok(_permit) = slots.acquire_owned().await else {
                    return;
                };

                let outcome = tokio::time::timeout(
                    op_timeout,
                    AssertUnwindSafe(operation).catch_unwind(),
                )
                .await;
                let result = match outcome {
                    Err(_) => Err(CollectError::Timeout { limit: op_timeout }),
                    Ok(Err(panic)) => Err(CollectError::Panicked {
                        reason: panic_reason(panic.as_ref()),
                    }),
                    Ok(Ok(value)) => Ok(value),
                };

                // The permit stays held across the handoff; a full buffer
                // keeps this slot occupied until the consumer catches up.
                let _ = sender.send(result).await;
            });
            submitted += 1;
        }
        drop(sender);

        tracing::debug!(
            "Collecting {} operations, {} at a time, {:?} each",
            submitted,
            limit,
            op_timeout
        );
        CollectStream {
            receiver,
            _tasks: tasks,
        }
    }
}

/// Completion-ordered stream of [`CollectedResult`]s.
///
/// Owns the spawned tasks: dropping the stream (including before it is
/// drained) aborts everything still running.
pub struct CollectStream<T> {
    receiver: mpsc::Receiver<CollectedResult<T>>,
    // Held for abort-on-drop; results travel the channel, not join handles.
    _tasks: JoinSet<()>,
}

impl<T> Stream for CollectStream<T> {
    type Item = CollectedResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

fn panic_reason(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures::StreamExt;
    use tokio::time::sleep;

    use super::*;

    fn collector(max_concurrent: usize, op_timeout: Duration) -> FanOutCollector {
        FanOutCollector::new(CollectConfig {
            max_concurrent,
            op_timeout,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_yields_one_result_per_operation() {
        let ops = (0..20).map(|n| async move {
            sleep(Duration::from_millis(5)).await;
            n
        });

        let results: Vec<_> = collector(4, Duration::from_secs(1)).collect(ops).collect().await;

        assert_eq!(results.len(), 20);
        let mut values: Vec<i32> = results.into_iter().map(Result::unwrap).collect();
        values.sort_unstable();
        assert_eq!(values, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_arrive_in_completion_order() {
        let delays = [30u64, 10, 20];
        let ops = delays.into_iter().enumerate().map(|(index, millis)| async move {
            sleep(Duration::from_millis(millis)).await;
            index
        });

        let results: Vec<_> = collector(3, Duration::from_secs(1)).collect(ops).collect().await;

        let order: Vec<usize> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_only_the_slow_operation() {
        let ops = vec![
            async {
                sleep(Duration::from_millis(10)).await;
                "fast"
            }
            .boxed(),
            async {
                sleep(Duration::from_secs(3600)).await;
                "hung"
            }
            .boxed(),
            async {
                sleep(Duration::from_millis(20)).await;
                "slower"
            }
            .boxed(),
        ];

        let results: Vec<_> = collector(3, Duration::from_millis(100))
            .collect(ops)
            .collect()
            .await;

        assert_eq!(results.len(), 3);
        let successes: Vec<&str> = results
            .iter()
            .filter_map(|r| r.as_ref().ok().copied())
            .collect();
        assert_eq!(successes, vec!["fast", "slower"]);
        assert!(matches!(
            results[2],
            Err(CollectError::Timeout { limit }) if limit == Duration::from_millis(100)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_is_captured_as_a_result() {
        let ops = vec![
            async { 1u32 }.boxed(),
            async { panic!("boom") }.boxed(),
            async { 3u32 }.boxed(),
        ];

        let results: Vec<_> = collector(3, Duration::from_secs(1)).collect(ops).collect().await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
        let failure = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert!(matches!(
            failure,
            CollectError::Panicked { reason } if reason == "boom"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_never_exceeds_the_limit() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let ops = (0..16).map(|_| {
            let running = running.clone();
            let peak = peak.clone();
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }
        });

        let results: Vec<_> = collector(3, Duration::from_secs(1)).collect(ops).collect().await;

        assert_eq!(results.len(), 16);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_stream_cancels_in_flight_operations() {
        // Each operation holds a clone of this Arc for its whole life; the
        // count returning to 1 means every task future was dropped.
        let alive = Arc::new(());

        let ops = (0..8).map(|n| {
            let alive = alive.clone();
            async move {
                let _alive = alive;
                if n > 0 {
                    sleep(Duration::from_secs(3600)).await;
                }
                n
            }
        });

        let mut stream = collector(8, Duration::from_secs(7200)).collect(ops);
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, 0);

        drop(stream);
        // Give the runtime a moment to process the aborts.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        sleep(Duration::from_millis(10)).await;

        assert_eq!(Arc::strong_count(&alive), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_yields_empty_stream() {
        let ops: Vec<futures::future::BoxFuture<'static, u8>> = Vec::new();

        let results: Vec<_> = collector(4, Duration::from_secs(1)).collect(ops).collect().await;

        assert!(results.is_empty());
    }
}
