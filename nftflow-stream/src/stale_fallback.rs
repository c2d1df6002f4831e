// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Non-regression combiner: substitute the last known-good value whenever a
//! fresh emission would blank a populated view.

use pin_project::pin_project;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use futures::Stream;
use tracing::debug;

/// Stream adapter holding the last value that satisfied the "real data"
/// predicate.
///
/// On each incoming value `v`:
/// - `is_real(v)` → cache `v` as the new baseline and emit it;
/// - degraded `v` with a cached baseline → emit the baseline instead of `v`;
/// - degraded `v` with no baseline yet → emit `v` as-is.
///
/// The baseline is owned by this adapter alone and only mutated while
/// processing an emission, so a plain field is all the synchronization the
/// single-writer model needs. An error value is never "real data": a
/// transient failure during refresh is masked by the cached baseline, while
/// an error on first load (no baseline) passes through untouched.
#[pin_project]
#[derive(Debug)]
pub struct StaleFallback<S: Stream, F> {
    #[pin]
    stream: S,
    is_real: F,
    last_good: Option<S::Item>,
}

impl<S, F> Stream for StaleFallback<S, F>
where
    S: Stream,
    S::Item: Clone,
    F: Fn(&S::Item) -> bool,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        match ready!(this.stream.poll_next(cx)) {
            Some(item) => {
                if (this.is_real)(&item) {
                    *this.last_good = Some(item.clone());
                    Poll::Ready(Some(item))
                } else if let Some(baseline) = this.last_good.as_ref() {
                    debug!("masking degraded emission with last known-good value");
                    Poll::Ready(Some(baseline.clone()))
                } else {
                    Poll::Ready(Some(item))
                }
            }
            None => Poll::Ready(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}

/// Extension trait providing
/// [`with_stale_fallback`](Self::with_stale_fallback) on any stream of
/// cloneable items.
pub trait StaleFallbackExt: Stream + Sized {
    /// Wraps the stream so degraded emissions are replaced by the last value
    /// for which `is_real` returned `true`.
    fn with_stale_fallback<F>(self, is_real: F) -> StaleFallback<Self, F>
    where
        Self::Item: Clone,
        F: Fn(&Self::Item) -> bool,
    {
        StaleFallback {
            stream: self,
            is_real,
            last_good: None,
        }
    }
}

impl<S: Stream> StaleFallbackExt for S {}
