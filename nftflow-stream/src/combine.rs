// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Latest-value combination of two streams.

use async_stream::stream;
use futures::{pin_mut, Stream, StreamExt};

/// Combines two streams into a stream of their latest values.
///
/// Emits nothing until both streams have produced at least one value, then
/// re-emits the pair on every update from either side. Ends when both
/// sources have ended.
///
/// The pipeline uses this to pair the chain registry with the chain
/// selection and to keep fetch scopes current while requests are in flight.
pub fn combine_latest<A, B, SA, SB>(left: SA, right: SB) -> impl Stream<Item = (A, B)> + Send
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    SA: Stream<Item = A> + Send + 'static,
    SB: Stream<Item = B> + Send + 'static,
{
    stream! {
        pin_mut!(left);
        pin_mut!(right);

        let mut latest_left: Option<A> = None;
        let mut latest_right: Option<B> = None;
        let mut left_done = false;
        let mut right_done = false;

        loop {
            let mut updated = false;

            tokio::select! {
                maybe_left = left.next(), if !left_done => {
                    match maybe_left {
                        Some(value) => {
                            latest_left = Some(value);
                            updated = true;
                        }
                        None => left_done = true,
                    }
                }
                maybe_right = right.next(), if !right_done => {
                    match maybe_right {
                        Some(value) => {
                            latest_right = Some(value);
                            updated = true;
                        }
                        None => right_done = true,
                    }
                }
                else => break,
            }

            if updated {
                if let (Some(a), Some(b)) = (&latest_left, &latest_right) {
                    yield (a.clone(), b.clone());
                }
            }
        }
    }
}
