// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Non-blocking hand-off between two paginated producers sharing one sink.
//!
//! This is not a mutex. The gate never blocks a producer's upstream: it
//! filters which producer's *requests* pass through at a given time, while
//! both producers' outputs are merged into the shared sink unconditionally.
//! A producer that exhausts its own pagination direction flips the phase and
//! re-signals the gate so the pending request immediately reaches the newly
//! active producer.

use async_stream::stream;
use futures::{pin_mut, Stream, StreamExt};
use nftflow_core::PaginationRequest;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Which producer currently holds the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum HandoffPhase {
    /// The user-owned-tokens producer is active. Initial phase.
    UserOwned = 0,
    /// The whole-collection producer is active.
    Available = 1,
}

struct GateInner {
    phase: AtomicU8,
    signal: watch::Sender<()>,
}

/// The soft lock coordinating two producers.
///
/// State is a single-writer phase cell plus an overwrite-latest re-trigger
/// signal: only the producer holding the floor may flip the phase, and the
/// flip happens inside that producer's own event-processing step, so no
/// multi-writer contention exists. Reading the phase on every emission is
/// all the gating filter does; a producer whose phase does not match simply
/// drops the request for itself, leaving it visible to the active producer.
#[derive(Clone)]
pub struct HandoffGate {
    inner: Arc<GateInner>,
}

impl HandoffGate {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(());
        Self {
            inner: Arc::new(GateInner {
                phase: AtomicU8::new(HandoffPhase::UserOwned as u8),
                signal,
            }),
        }
    }

    /// The phase currently holding the floor.
    pub fn current(&self) -> HandoffPhase {
        match self.inner.phase.load(Ordering::Acquire) {
            0 => HandoffPhase::UserOwned,
            _ => HandoffPhase::Available,
        }
    }

    /// Hand the floor to `phase` and wake all gated streams so the pending
    /// request reaches the newly active producer.
    ///
    /// Called by a producer upon observing terminal exhaustion in its own
    /// direction; never blocks.
    pub fn advance_to(&self, phase: HandoffPhase) {
        debug!(?phase, "handing off request floor");
        self.inner.phase.store(phase as u8, Ordering::Release);
        self.inner.signal.send_replace(());
    }

    /// Wraps `requests` so items pass through only while `phase` holds the
    /// floor.
    ///
    /// Requests arriving while the other producer is active are dropped for
    /// this stream, not buffered. When the gate is re-signalled, the latest
    /// request seen is re-delivered, which is how the request that exhausted
    /// one producer gets processed by the other after a hand-off.
    pub fn gate<S>(
        &self,
        requests: S,
        phase: HandoffPhase,
    ) -> impl Stream<Item = PaginationRequest> + Send
    where
        S: Stream<Item = PaginationRequest> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let mut signal = self.inner.signal.subscribe();

        stream! {
            // Wake the gate on subscription so a request already latched by
            // the other producer's gate is not needed for this one to start.
            inner.signal.send_replace(());

            pin_mut!(requests);
            let mut latest: Option<PaginationRequest> = None;
            let mut requests_done = false;

            loop {
                let candidate = tokio::select! {
                    maybe_request = requests.next(), if !requests_done => {
                        match maybe_request {
                            Some(request) => {
                                latest = Some(request);
                                Some(request)
                            }
                            None => {
                                requests_done = true;
                                None
                            }
                        }
                    }
                    changed = signal.changed() => {
                        match changed {
                            Ok(()) => latest,
                            Err(_) => break,
                        }
                    }
                };

                if let Some(request) = candidate {
                    if inner.phase.load(Ordering::Acquire) == phase as u8 {
                        yield request;
                    }
                }
            }
        }
    }
}

impl Default for HandoffGate {
    fn default() -> Self {
        Self::new()
    }
}
