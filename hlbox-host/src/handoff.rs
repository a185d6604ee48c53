//! Single-slot handoff between one producer and one consumer.
//!
//! Bridges a push-style source (a task reading lines, a callback) into a
//! pull-based [`Stream`]. The slot holds at most one value: the producer's
//! [`SlotSender::deliver`] waits until the consumer has taken the previous
//! value, so the producer never runs more than one item ahead.
//!
//! Completion is explicit. The producer ends the exchange with
//! [`SlotSender::close`] or [`SlotSender::fail`]; dropping the sender counts
//! as a close. Consumers iterating the [`Stream`] see only values: a failure
//! is logged and ends the stream. Consumers that need to tell the two apart
//! use [`SlotReceiver::recv`].

use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tracing::error;

/// Outcome of waiting on the slot.
#[derive(Debug)]
pub enum Slot<T, E> {
    /// The producer delivered a value.
    Value(T),
    /// The producer finished normally. No more values follow.
    Closed,
    /// The producer failed. No more values follow.
    Failed(E),
}

impl<T, E> Slot<T, E> {
    /// Returns true for [`Slot::Value`].
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// The consumer dropped its end of the handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerGone;

/// Creates a connected sender/receiver pair.
pub fn channel<T, E>() -> (SlotSender<T, E>, SlotReceiver<T, E>) {
    let (tx, rx) = mpsc::channel(1);
    (SlotSender { tx }, SlotReceiver { rx, done: false })
}

// ============================================================================
// Sender
// ============================================================================

/// Producer end of the handoff.
#[derive(Debug)]
pub struct SlotSender<T, E> {
    tx: mpsc::Sender<Slot<T, E>>,
}

impl<T, E> SlotSender<T, E> {
    /// Fills the slot, waiting while the previous value is still pending.
    pub async fn deliver(&self, value: T) -> Result<(), ConsumerGone> {
        self.tx
            .send(Slot::Value(value))
            .await
            .map_err(|_| ConsumerGone)
    }

    /// Ends the exchange normally.
    pub async fn close(self) {
        // A consumer that already left does not need the notice.
        let _ = self.tx.send(Slot::Closed).await;
    }

    /// Ends the exchange with an error.
    pub async fn fail(self, error: E) {
        let _ = self.tx.send(Slot::Failed(error)).await;
    }

    /// Returns true once the consumer has gone away.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

// ============================================================================
// Receiver
// ============================================================================

/// Consumer end of the handoff. Single-pass: once it reports the end it
/// stays ended.
#[derive(Debug)]
pub struct SlotReceiver<T, E> {
    rx: mpsc::Receiver<Slot<T, E>>,
    done: bool,
}

impl<T, E> SlotReceiver<T, E> {
    /// Waits for the next slot outcome.
    pub async fn recv(&mut self) -> Slot<T, E> {
        if self.done {
            return Slot::Closed;
        }
        let slot = self.rx.recv().await.unwrap_or(Slot::Closed);
        if !slot.is_value() {
            self.finish();
        }
        slot
    }

    /// Returns true once the end of the exchange has been observed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn finish(&mut self) {
        self.done = true;
        self.rx.close();
    }
}

impl<T, E: Display> Stream for SlotReceiver<T, E> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        if self.done {
            return Poll::Ready(None);
        }

        match self.rx.poll_recv(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Slot::Value(value))) => Poll::Ready(Some(value)),
            Poll::Ready(Some(Slot::Failed(e))) => {
                error!(error = %e, "Stream ended with error");
                self.finish();
                Poll::Ready(None)
            }
            Poll::Ready(Some(Slot::Closed) | None) => {
                self.finish();
                Poll::Ready(None)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_values_arrive_in_order() {
        let (tx, rx) = channel::<u32, String>();

        tokio::spawn(async move {
            for i in 0..5 {
                tx.deliver(i).await.unwrap();
            }
            tx.close().await;
        });

        let values: Vec<u32> = rx.collect().await;
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_failure_ends_stream() {
        let (tx, rx) = channel::<u32, String>();

        tokio::spawn(async move {
            tx.deliver(1).await.unwrap();
            tx.fail("boom".to_string()).await;
        });

        let values: Vec<u32> = rx.collect().await;
        assert_eq!(values, vec![1]);
    }

    #[tokio::test]
    async fn test_recv_distinguishes_close_and_failure() {
        let (tx, mut rx) = channel::<u32, String>();
        tokio::spawn(async move {
            tx.deliver(7).await.unwrap();
            tx.fail("boom".to_string()).await;
        });

        assert!(matches!(rx.recv().await, Slot::Value(7)));
        assert!(matches!(rx.recv().await, Slot::Failed(ref e) if e == "boom"));
        assert!(rx.is_done());
        assert!(matches!(rx.recv().await, Slot::Closed));

        let (tx, mut rx) = channel::<u32, String>();
        tokio::spawn(tx.close());
        assert!(matches!(rx.recv().await, Slot::Closed));
    }

    #[tokio::test]
    async fn test_dropped_sender_counts_as_close() {
        let (tx, mut rx) = channel::<u32, String>();
        drop(tx);
        assert!(matches!(rx.recv().await, Slot::Closed));
    }

    #[tokio::test]
    async fn test_producer_waits_for_consumer() {
        let (tx, mut rx) = channel::<u32, String>();

        tx.deliver(1).await.unwrap();
        let second = tokio::time::timeout(Duration::from_millis(50), tx.deliver(2)).await;
        assert!(second.is_err(), "second value must wait for the first to be taken");

        assert!(matches!(rx.recv().await, Slot::Value(1)));
        tx.deliver(3).await.unwrap();
        assert!(matches!(rx.recv().await, Slot::Value(3)));
    }

    #[tokio::test]
    async fn test_deliver_after_consumer_dropped() {
        let (tx, rx) = channel::<u32, String>();
        drop(rx);
        assert!(tx.is_abandoned());
        assert_eq!(tx.deliver(1).await, Err(ConsumerGone));
    }
}
