// ── Reactive state streams ──
//
// Subscription handle over a `watch` channel. Used for both controller
// state and session state: a snapshot at subscribe time, the latest
// value on demand, and change notification via `changed()` or `Stream`.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to a published state value.
///
/// Rapid successive updates collapse: a lagging subscriber observes only
/// the latest value.
pub struct StateStream<T: Clone + Send + Sync + 'static> {
    current: T,
    receiver: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> StateStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<T>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at subscribe time (or at the last `changed()`).
    pub fn current(&self) -> &T {
        &self.current
    }

    /// The latest published value.
    pub fn latest(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new value.
    /// Returns `None` once the publisher has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` that yields the current value first, then
    /// every change.
    pub fn into_stream(self) -> StateWatchStream<T> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StateWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<T>,
}

impl<T: Clone + Send + Sync + 'static> Stream for StateWatchStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    #[tokio::test]
    async fn changed_collapses_to_latest() {
        let (tx, rx) = watch::channel(0_u32);
        let mut stream = StateStream::new(rx);
        assert_eq!(*stream.current(), 0);

        tx.send_replace(1);
        tx.send_replace(2);
        tx.send_replace(3);

        assert_eq!(stream.changed().await, Some(3));
        assert_eq!(*stream.current(), 3);
        assert_eq!(stream.latest(), 3);
    }

    #[tokio::test]
    async fn changed_ends_when_publisher_dropped() {
        let (tx, rx) = watch::channel("a".to_owned());
        let mut stream = StateStream::new(rx);
        drop(tx);
        assert_eq!(stream.changed().await, None);
    }

    #[tokio::test]
    async fn into_stream_yields_current_then_changes() {
        let (tx, rx) = watch::channel(10_u32);
        let mut stream = StateStream::new(rx).into_stream();
        assert_eq!(stream.next().await, Some(10));
        tx.send_replace(11);
        assert_eq!(stream.next().await, Some(11));
    }
}
