// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combine-with-previous operator that pairs each value with its predecessor.

use futures::{future::ready, Stream, StreamExt};

/// A value paired with the value that preceded it in the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithPrevious<T> {
    /// The previous value in the stream, if any
    pub previous: Option<T>,
    /// The current value in the stream
    pub current: T,
}

impl<T> WithPrevious<T> {
    pub fn new(previous: Option<T>, current: T) -> Self {
        Self { previous, current }
    }

    /// Returns true if there is a previous value.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Returns references to (previous, current) if a previous value exists.
    pub fn as_pair(&self) -> Option<(&T, &T)> {
        self.previous.as_ref().map(|prev| (prev, &self.current))
    }
}

/// Pairs each stream element with its previous element.
///
/// The first element has `previous = None`; every later element carries the
/// value emitted just before it. A standalone change-detection utility for
/// consumers that need to diff consecutive emissions, e.g. to animate only
/// the collections that actually changed between two batches.
pub fn with_previous_impl<S, T>(stream: S) -> impl Stream<Item = WithPrevious<T>>
where
    S: Stream<Item = T>,
    T: Clone,
{
    stream.scan(None, |state: &mut Option<T>, current: T| {
        let previous = state.take();
        *state = Some(current.clone());
        ready(Some(WithPrevious::new(previous, current)))
    })
}

/// Extension trait providing [`with_previous`](Self::with_previous) on any
/// stream of cloneable items.
pub trait WithPreviousExt<T>: Stream<Item = T> + Sized
where
    T: Clone,
{
    fn with_previous(self) -> impl Stream<Item = WithPrevious<T>> {
        with_previous_impl(self)
    }
}

impl<S, T> WithPreviousExt<T> for S
where
    S: Stream<Item = T>,
    T: Clone,
{
}
