// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The shared page-request hub: one producer side, many paginator
//! subscriptions.

use futures::{future::ready, Stream, StreamExt};
use nftflow_core::PaginationRequest;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

const DEFAULT_CAPACITY: usize = 16;

/// Fans one stream of [`PaginationRequest`]s out to every subscribed
/// paginator.
///
/// Requests are ephemeral intents: a subscriber that falls behind the
/// broadcast buffer skips to the most recent requests instead of replaying
/// the backlog, since fetching pages nobody is waiting for anymore would
/// only waste the remote quota. Late subscribers do not see earlier
/// requests.
#[derive(Clone, Debug)]
pub struct SharedRequests {
    tx: broadcast::Sender<PaginationRequest>,
}

impl SharedRequests {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish one request to all current subscribers.
    pub fn send(&self, request: PaginationRequest) {
        if self.tx.send(request).is_err() {
            debug!(?request, "page request dropped, no active subscribers");
        }
    }

    /// Subscribe to requests published from now on.
    pub fn subscribe(&self) -> impl Stream<Item = PaginationRequest> + Send + Unpin {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|received| {
            ready(match received {
                Ok(request) => Some(request),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "slow request subscriber, resuming at latest");
                    None
                }
            })
        })
    }

    /// Number of currently subscribed request consumers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SharedRequests {
    fn default() -> Self {
        Self::new()
    }
}
