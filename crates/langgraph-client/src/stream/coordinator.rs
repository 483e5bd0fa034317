//! Stream lifecycle: the background decoder task and the caller-side handles.
//!
//! The decoder task is the only holder of the event sender. It closes the
//! connection, publishes the terminal [`StreamStatus`], and then drops the
//! sender, so the channel closes exactly once and the status is already final
//! by the time a caller sees the end of the channel.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use super::decoder::{FrameDecoder, LineSplitter};
use super::transport::Connection;
use super::{FrameMode, StreamEvent};
use crate::error::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Cancel Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Cooperative cancellation for a stream.
///
/// Cloning yields a handle to the same stream. `cancel` may be called any
/// number of times, before or after the stream has finished.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a fresh, untriggered handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until cancellation is requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream Status
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    /// The decoder is still reading.
    Running,
    /// The server ended the stream.
    Completed,
    /// The stream was cancelled, or its receiver was dropped.
    Cancelled,
    /// A read failed mid-stream.
    Interrupted(String),
}

impl StreamStatus {
    /// Whether the stream has stopped.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamStatus::Running)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event Stream
// ─────────────────────────────────────────────────────────────────────────────

/// Caller side of a running stream.
///
/// Yields [`StreamEvent`]s in wire order via [`recv`](Self::recv) or as a
/// [`futures::Stream`]. Dropping it cancels the stream.
#[derive(Debug)]
pub struct EventStream {
    events: mpsc::Receiver<StreamEvent>,
    cancel: CancelHandle,
    status: watch::Receiver<StreamStatus>,
    strip_metadata: bool,
}

impl EventStream {
    /// Receive the next event, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        let event = self.events.recv().await?;
        Some(self.shape(event))
    }

    /// Cancel the stream.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A handle that can cancel this stream from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> StreamStatus {
        self.status.borrow().clone()
    }

    /// The read failure that ended the stream, if it ended that way.
    pub fn last_error(&self) -> Option<Error> {
        match &*self.status.borrow() {
            StreamStatus::Interrupted(message) => Some(Error::StreamInterrupted(message.clone())),
            _ => None,
        }
    }

    /// Wait for the decoder task to stop and return how it stopped.
    ///
    /// Does not consume events; a full channel stalls the decoder, so drain
    /// or cancel first.
    pub async fn finished(&mut self) -> StreamStatus {
        let terminal = self
            .status
            .wait_for(StreamStatus::is_terminal)
            .await
            .map(|status| status.clone());
        terminal.unwrap_or_else(|_| self.status())
    }

    /// Drain all remaining events and return them with the final status.
    pub async fn collect_all(mut self) -> (Vec<StreamEvent>, StreamStatus) {
        let mut events = Vec::new();
        while let Some(event) = self.recv().await {
            events.push(event);
        }
        let status = self.finished().await;
        (events, status)
    }

    /// Drop the `metadata` field from every event yielded from now on.
    pub fn without_metadata(mut self) -> Self {
        self.strip_metadata = true;
        self
    }

    fn shape(&self, mut event: StreamEvent) -> StreamEvent {
        if self.strip_metadata {
            event.metadata.clear();
        }
        event
    }
}

impl Stream for EventStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.events.poll_recv(cx) {
            Poll::Ready(Some(event)) => Poll::Ready(Some(self.shape(event))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder Task
// ─────────────────────────────────────────────────────────────────────────────

/// Launch the decoder over an open connection.
///
/// Must be called from within a Tokio runtime. Returns immediately.
pub fn spawn_decoder<C>(
    connection: C,
    mode: FrameMode,
    buffer: usize,
    cancel: CancelHandle,
) -> EventStream
where
    C: Connection + 'static,
{
    let (events_tx, events_rx) = mpsc::channel(buffer.max(1));
    let (status_tx, status_rx) = watch::channel(StreamStatus::Running);

    tokio::spawn(run_decoder(
        connection,
        FrameDecoder::new(mode),
        events_tx,
        cancel.clone(),
        status_tx,
    ));

    EventStream {
        events: events_rx,
        cancel,
        status: status_rx,
        strip_metadata: false,
    }
}

async fn run_decoder<C: Connection>(
    mut connection: C,
    mut decoder: FrameDecoder,
    events: mpsc::Sender<StreamEvent>,
    cancel: CancelHandle,
    status: watch::Sender<StreamStatus>,
) {
    let outcome = pump(&mut connection, &mut decoder, &events, &cancel).await;
    connection.close();

    match &outcome {
        StreamStatus::Interrupted(message) => {
            tracing::warn!(error = %message, "Event stream interrupted");
        }
        other => tracing::debug!(status = ?other, "Event stream closed"),
    }

    status.send_replace(outcome);
    drop(events);
}

async fn pump<C: Connection>(
    connection: &mut C,
    decoder: &mut FrameDecoder,
    events: &mpsc::Sender<StreamEvent>,
    cancel: &CancelHandle,
) -> StreamStatus {
    let mut splitter = LineSplitter::new();

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return StreamStatus::Cancelled,
            chunk = connection.next_chunk() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                for line in splitter.push(&bytes) {
                    if let Some(event) = decoder.feed_line(&line) {
                        if !deliver(events, cancel, event).await {
                            return StreamStatus::Cancelled;
                        }
                    }
                }
            }
            Some(Err(Error::StreamInterrupted(message))) => {
                return StreamStatus::Interrupted(message);
            }
            Some(Err(e)) => return StreamStatus::Interrupted(e.to_string()),
            None => {
                let tail = splitter.finish().and_then(|line| decoder.feed_line(&line));
                for event in tail.into_iter().chain(decoder.finish()) {
                    if !deliver(events, cancel, event).await {
                        return StreamStatus::Cancelled;
                    }
                }
                return StreamStatus::Completed;
            }
        }
    }
}

/// Send one event, giving up if the stream is cancelled or the receiver is gone.
async fn deliver(
    events: &mpsc::Sender<StreamEvent>,
    cancel: &CancelHandle,
    event: StreamEvent,
) -> bool {
    if cancel.is_cancelled() {
        return false;
    }

    tracing::trace!(event = %event.event, "Stream event");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = events.send(event) => sent.is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::StreamExt;

    use super::*;
    use crate::error::Result;

    /// Scripted connection that records `close` calls.
    ///
    /// After the script runs out it either ends the body or blocks forever,
    /// the way an idle network read would.
    struct MockConnection {
        script: VecDeque<Result<Bytes>>,
        hang_when_empty: bool,
        closes: Arc<AtomicUsize>,
        closed: bool,
    }

    impl MockConnection {
        fn new(chunks: &[&str]) -> Self {
            Self {
                script: chunks
                    .iter()
                    .map(|c| Ok(Bytes::copy_from_slice(c.as_bytes())))
                    .collect(),
                hang_when_empty: false,
                closes: Arc::new(AtomicUsize::new(0)),
                closed: false,
            }
        }

        fn hanging(mut self) -> Self {
            self.hang_when_empty = true;
            self
        }

        fn then_fail(mut self, message: &str) -> Self {
            self.script
                .push_back(Err(Error::StreamInterrupted(message.to_string())));
            self
        }

        fn close_counter(&self) -> Arc<AtomicUsize> {
            self.closes.clone()
        }
    }

    #[async_trait]
    impl Connection for MockConnection {
        async fn next_chunk(&mut self) -> Option<Result<Bytes>> {
            if self.closed {
                return None;
            }
            match self.script.pop_front() {
                Some(item) => Some(item),
                None if self.hang_when_empty => futures::future::pending().await,
                None => None,
            }
        }

        fn close(&mut self) {
            self.closed = true;
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn event(event: &str, data: &str) -> StreamEvent {
        StreamEvent {
            event: event.to_string(),
            data: data.to_string(),
            metadata: String::new(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_frames() {
        let conn = MockConnection::new(&["event: values\ndata: {\"a\":1}\n\n", "event: end\n\n"]);
        let closes = conn.close_counter();

        let stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new());
        let (events, status) = stream.collect_all().await;

        assert_eq!(
            events,
            vec![event("values", "{\"a\":1}"), event("end", "")]
        );
        assert_eq!(status, StreamStatus::Completed);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_eager_mode_end_to_end() {
        let conn = MockConnection::new(&["event: values\ndata: {\"a\":1}\n\nevent: end\n\n"]);
        let stream = spawn_decoder(conn, FrameMode::Eager, 8, CancelHandle::new());
        let (events, _) = stream.collect_all().await;

        assert_eq!(
            events,
            vec![
                event("values", ""),
                event("", "{\"a\":1}"),
                event("end", ""),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancel_before_any_line() {
        let conn = MockConnection::new(&[]).hanging();
        let closes = conn.close_counter();
        let cancel = CancelHandle::new();
        cancel.cancel();

        let stream = spawn_decoder(conn, FrameMode::Batched, 8, cancel);
        let (events, status) = stream.collect_all().await;

        assert!(events.is_empty());
        assert_eq!(status, StreamStatus::Cancelled);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_unblocks_pending_read() {
        let conn = MockConnection::new(&["data: first\n\n"]).hanging();
        let closes = conn.close_counter();

        let mut stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new());
        assert_eq!(stream.recv().await, Some(event("", "first")));

        stream.cancel();
        let rest = tokio::time::timeout(Duration::from_secs(5), stream.recv())
            .await
            .expect("stream should close after cancel");
        assert_eq!(rest, None);
        assert_eq!(stream.status(), StreamStatus::Cancelled);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let conn = MockConnection::new(&[]).hanging();
        let closes = conn.close_counter();

        let mut stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new());
        let handle = stream.cancel_handle();
        handle.cancel();
        handle.cancel();
        stream.cancel();

        assert_eq!(stream.finished().await, StreamStatus::Cancelled);
        assert!(stream.recv().await.is_none());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_after_completion_is_noop() {
        let conn = MockConnection::new(&["data: x\n\n"]);
        let mut stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new());

        assert_eq!(stream.recv().await, Some(event("", "x")));
        assert!(stream.recv().await.is_none());
        assert_eq!(stream.finished().await, StreamStatus::Completed);

        stream.cancel();
        stream.cancel();
        assert_eq!(stream.status(), StreamStatus::Completed);
        assert!(stream.last_error().is_none());
    }

    #[tokio::test]
    async fn test_no_partial_frame_flushed_on_cancel() {
        let conn = MockConnection::new(&["event: values\ndata: partial\n"]).hanging();
        let stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new());
        let handle = stream.cancel_handle();

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let (events, status) = stream.collect_all().await;
        assert!(events.is_empty());
        assert_eq!(status, StreamStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_read_error_after_one_event() {
        let conn = MockConnection::new(&["event: values\ndata: 1\n\nevent: upd"])
            .then_fail("connection reset");
        let closes = conn.close_counter();

        let mut stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new());
        assert_eq!(stream.recv().await, Some(event("values", "1")));
        assert_eq!(stream.recv().await, None);

        assert!(matches!(stream.status(), StreamStatus::Interrupted(_)));
        let err = stream.last_error().expect("read failure should be recorded");
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_trailing_line_without_newline_is_decoded() {
        let conn = MockConnection::new(&["event: values\n\nevent: end"]);
        let stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new());
        let (events, status) = stream.collect_all().await;

        assert_eq!(events, vec![event("values", ""), event("end", "")]);
        assert_eq!(status, StreamStatus::Completed);
    }

    #[tokio::test]
    async fn test_slow_consumer_sees_every_event_in_order() {
        let chunks: Vec<String> = (0..50).map(|i| format!("data: {i}\n\n")).collect();
        let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let conn = MockConnection::new(&refs);

        let mut stream = spawn_decoder(conn, FrameMode::Batched, 1, CancelHandle::new());
        let mut seen = Vec::new();
        while let Some(event) = stream.next().await {
            if seen.len() % 10 == 0 {
                tokio::task::yield_now().await;
            }
            seen.push(event.data);
        }

        let expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_dropping_stream_cancels_decoder() {
        let conn = MockConnection::new(&[]).hanging();
        let closes = conn.close_counter();
        let stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new());
        let handle = stream.cancel_handle();

        drop(stream);
        assert!(handle.is_cancelled());

        for _ in 0..100 {
            if closes.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_without_metadata() {
        let conn = MockConnection::new(&["event: values\ndata: 1\nmetadata: {\"k\":1}\n\n"]);
        let stream = spawn_decoder(conn, FrameMode::Batched, 8, CancelHandle::new())
            .without_metadata();
        let (events, _) = stream.collect_all().await;
        assert_eq!(events, vec![event("values", "1")]);
    }
}
