// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{Stream, StreamExt};
use nftflow_core::PaginationRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Awaits the next stream item, panicking if the stream ends or stays
/// silent for `timeout_ms`.
pub async fn unwrap_stream<S>(stream: &mut S, timeout_ms: u64) -> S::Item
where
    S: Stream + Unpin,
{
    tokio::select! {
        item = stream.next() => item.expect("stream ended unexpectedly"),
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("timed out after {timeout_ms}ms waiting for a stream item")
        }
    }
}

/// Asserts the stream stays silent for `timeout_ms`.
pub async fn assert_no_element_emitted<S>(stream: &mut S, timeout_ms: u64)
where
    S: Stream + Unpin,
    S::Item: std::fmt::Debug,
{
    tokio::select! {
        item = stream.next() => {
            panic!("unexpected emission, expected no output: {item:?}");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Asserts the stream ends within `timeout_ms`, panicking on any further
/// item.
pub async fn assert_stream_ended<S>(stream: &mut S, timeout_ms: u64)
where
    S: Stream + Unpin,
    S::Item: std::fmt::Debug,
{
    tokio::select! {
        item = stream.next() => {
            if let Some(item) = item {
                panic!("expected end of stream, got: {item:?}");
            }
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("timed out after {timeout_ms}ms waiting for the stream to end")
        }
    }
}

/// An unbounded channel of page requests, receiver side as a stream.
pub fn request_channel() -> (
    mpsc::UnboundedSender<PaginationRequest>,
    UnboundedReceiverStream<PaginationRequest>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, UnboundedReceiverStream::new(rx))
}

/// A generic unbounded test channel; the receiver implements `Stream`.
pub fn test_channel<T>() -> (async_channel::Sender<T>, async_channel::Receiver<T>) {
    async_channel::unbounded()
}
