// ── Reactive state streams ──
//
// Read-only subscriptions to state owned elsewhere.
//
// - `StateStream` follows a `watch` channel: readers see the latest value
//   and may skip intermediate ones (list state).
// - `SequenceStream` follows a `broadcast` channel: every reader sees every
//   published value in order, or an explicit `Lagged` gap (session changes).

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

/// A subscription to a piece of published state.
///
/// Provides both point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct StateStream<T: Clone + Send + Sync + 'static> {
    current: T,
    receiver: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> StateStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<T>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The value captured at creation time or by the last `changed()`.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// The latest published value (may have changed since creation).
    pub fn latest(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new value.
    /// Returns `None` once the owner has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        let value = self.receiver.borrow_and_update().clone();
        self.current = value.clone();
        Some(value)
    }

    /// Convert into a `Stream` that yields the current value first, then
    /// every subsequent change.
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
        // WatchStream<T> is Unpin regardless of T.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

// ── Ordered event streams ──────────────────────────────────────────

/// Why a [`SequenceStream`] produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The publisher is gone; no more values will arrive.
    #[error("publisher dropped")]
    Closed,

    /// The subscriber fell behind and this many values were overwritten
    /// before it read them. Reading resumes at the oldest buffered value.
    #[error("subscriber lagged; {0} values skipped")]
    Lagged(u64),
}

impl From<broadcast::error::RecvError> for SequenceError {
    fn from(err: broadcast::error::RecvError) -> Self {
        match err {
            broadcast::error::RecvError::Closed => Self::Closed,
            broadcast::error::RecvError::Lagged(n) => Self::Lagged(n),
        }
    }
}

impl From<BroadcastStreamRecvError> for SequenceError {
    fn from(err: BroadcastStreamRecvError) -> Self {
        match err {
            BroadcastStreamRecvError::Lagged(n) => Self::Lagged(n),
        }
    }
}

/// A subscription that yields every published value, in publish order.
///
/// Subscribers created at the same moment observe identical sequences.
pub struct SequenceStream<T: Clone + Send + 'static> {
    current: T,
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone + Send + 'static> SequenceStream<T> {
    /// `current` must be the value published last before `receiver` was
    /// subscribed; callers hold the publisher's write lock while pairing them.
    pub(crate) fn new(current: T, receiver: broadcast::Receiver<T>) -> Self {
        Self { current, receiver }
    }

    /// The value at subscription time or the last one read.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Wait for the next published value.
    pub async fn recv(&mut self) -> Result<T, SequenceError> {
        let value = self.receiver.recv().await?;
        self.current = value.clone();
        Ok(value)
    }

    /// The next value if one is already buffered.
    pub fn try_next(&mut self) -> Option<Result<T, SequenceError>> {
        match self.receiver.try_recv() {
            Ok(value) => {
                self.current = value.clone();
                Some(Ok(value))
            }
            Err(broadcast::error::TryRecvError::Empty) => None,
            Err(broadcast::error::TryRecvError::Closed) => Some(Err(SequenceError::Closed)),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Some(Err(SequenceError::Lagged(n))),
        }
    }

    /// Convert into a `Stream` yielding the current value first, then every
    /// published value (or a `Lagged` gap). Ends when the publisher is gone.
    pub fn into_stream(self) -> SequenceEventStream<T>
    where
        T: Sync,
    {
        SequenceEventStream {
            first: Some(self.current),
            inner: BroadcastStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `broadcast::Receiver`.
pub struct SequenceEventStream<T: Clone + Send + Sync + 'static> {
    first: Option<T>,
    inner: BroadcastStream<T>,
}

impl<T: Clone + Send + Sync + Unpin + 'static> Stream for SequenceEventStream<T> {
    type Item = Result<T, SequenceError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(first) = self.first.take() {
            return Poll::Ready(Some(Ok(first)));
        }
        Pin::new(&mut self.inner)
            .poll_next(cx)
            .map(|item| item.map(|r| r.map_err(SequenceError::from)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequence_delivers_every_value() {
        let (tx, rx) = broadcast::channel(8);
        let mut seq = SequenceStream::new(0_u32, rx);

        for n in 1..=3 {
            tx.send(n).unwrap();
        }
        assert_eq!(seq.recv().await, Ok(1));
        assert_eq!(seq.try_next(), Some(Ok(2)));
        assert_eq!(seq.try_next(), Some(Ok(3)));
        assert_eq!(seq.try_next(), None);
        assert_eq!(*seq.current(), 3);

        drop(tx);
        assert_eq!(seq.recv().await, Err(SequenceError::Closed));
    }

    #[tokio::test]
    async fn sequence_reports_lag() {
        let (tx, rx) = broadcast::channel(2);
        let mut seq = SequenceStream::new(0_u32, rx);
        for n in 1..=5 {
            tx.send(n).unwrap();
        }
        assert_eq!(seq.try_next(), Some(Err(SequenceError::Lagged(3))));
        assert_eq!(seq.try_next(), Some(Ok(4)));
    }

    #[tokio::test]
    async fn sequence_stream_starts_with_current() {
        use futures_util::StreamExt;

        let (tx, rx) = broadcast::channel(4);
        let mut stream = SequenceStream::new("a".to_string(), rx).into_stream();
        tx.send("b".to_string()).unwrap();
        tx.send("c".to_string()).unwrap();

        assert_eq!(stream.next().await, Some(Ok("a".to_string())));
        assert_eq!(stream.next().await, Some(Ok("b".to_string())));
        assert_eq!(stream.next().await, Some(Ok("c".to_string())));
    }

    #[tokio::test]
    async fn changed_tracks_sender() {
        let (tx, rx) = watch::channel(1_u32);
        let mut stream = StateStream::new(rx);
        assert_eq!(*stream.current(), 1);

        tx.send_replace(2);
        assert_eq!(stream.latest(), 2);
        assert_eq!(*stream.current(), 1);

        assert_eq!(stream.changed().await, Some(2));
        assert_eq!(*stream.current(), 2);

        drop(tx);
        assert_eq!(stream.changed().await, None);
    }

    #[tokio::test]
    async fn into_stream_yields_current_then_changes() {
        use futures_util::StreamExt;

        let (tx, rx) = watch::channel("a".to_string());
        let mut stream = StateStream::new(rx).into_stream();
        assert_eq!(stream.next().await.as_deref(), Some("a"));

        tx.send_replace("b".into());
        assert_eq!(stream.next().await.as_deref(), Some("b"));
    }
}
