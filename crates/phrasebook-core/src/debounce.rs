use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::DebounceError;

/// Forwards a value only after no newer value arrived for `window`.
///
/// A single background task owns the timer. Dropping the debouncer cancels
/// that task and discards whatever is still pending.
pub struct Debouncer<T> {
    input: AsyncSender<T>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn(window: Duration, output: AsyncSender<T>) -> Self {
        Self::with_cancel(window, output, CancellationToken::new())
    }

    /// Same as [`Debouncer::spawn`], stopping as well when `cancel` fires
    pub fn with_cancel(window: Duration, output: AsyncSender<T>, cancel: CancellationToken) -> Self {
        let (input, input_rx) = kanal::unbounded_async();
        tokio::spawn(run(window, input_rx, output, cancel.clone()));
        Self { input, cancel }
    }

    /// Replace the pending value and restart the window
    pub async fn push(&self, value: T) -> Result<(), DebounceError> {
        self.input
            .send(value)
            .await
            .map_err(|_| DebounceError::Closed)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<T>(
    window: Duration,
    input: AsyncReceiver<T>,
    output: AsyncSender<T>,
    cancel: CancellationToken,
) {
    let mut pending: Option<T> = None;
    let timer = tokio::time::sleep(window);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,
            received = input.recv() => match received {
                Ok(value) => {
                    pending = Some(value);
                    timer.as_mut().reset(Instant::now() + window);
                }
                Err(_) => break,
            },
            _ = &mut timer, if pending.is_some() => {
                let Some(value) = pending.take() else { continue };
                // a full output must not keep the task alive past cancellation
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break,
                    sent = output.send(value) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    if pending.is_some() {
        tracing::debug!("Debouncer stopped with a pending value, discarding it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn burst_emits_only_last_value_once() {
        let (tx, rx) = kanal::unbounded_async::<String>();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), tx);
        let start = Instant::now();

        for term in ["c", "ci", "cia", "ciao"] {
            debouncer.push(term.to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let value = rx.recv().await.unwrap();
        assert_eq!(value, "ciao");
        // last push at 300ms, window 300ms
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(700), "{elapsed:?}");

        let second = timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(second.is_err(), "value emitted twice");
    }

    #[tokio::test(start_paused = true)]
    async fn separated_values_are_each_emitted_in_order() {
        let (tx, rx) = kanal::unbounded_async::<u32>();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), tx);

        debouncer.push(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.push(2).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), 1);
        assert_eq!(rx.recv().await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_clears_pending_value() {
        let (tx, rx) = kanal::unbounded_async::<u32>();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), tx);

        debouncer.push(7).await.unwrap();
        drop(debouncer);

        let result = timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(!matches!(result, Ok(Ok(_))), "stale value fired after drop");
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancellation_stops_debouncer() {
        let (tx, rx) = kanal::unbounded_async::<u32>();
        let parent = CancellationToken::new();
        let debouncer = Debouncer::with_cancel(Duration::from_millis(300), tx, parent.child_token());

        debouncer.push(1).await.unwrap();
        parent.cancel();

        let result = timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(!matches!(result, Ok(Ok(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_blocked_send() {
        let (tx, rx) = kanal::bounded_async::<u32>(1);
        tx.send(0).await.unwrap();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), tx);

        debouncer.push(1).await.unwrap();
        // window elapsed, the task is now waiting on the full output
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(rx.sender_count(), 1);

        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(rx.is_disconnected(), "debouncer task still running");
    }
}
