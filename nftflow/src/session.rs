// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Session-scoped pipeline state.

use futures::{pin_mut, StreamExt};
use nftflow_core::{AccountRepository, FetchContext, NftRepository, PipelineTask};
use nftflow_stream::combine_latest;
use tokio::sync::watch;
use tracing::debug;

/// Explicitly owned session state: the fetch context every paginator
/// snapshots per request.
///
/// Created on session start and dropped on logout or account switch. The
/// session feeds a single watch cell from the selected-account and
/// exclusion-filter streams; paginators wait for the context to become
/// ready before their first ownership-scoped fetch. Dropping the session
/// stops the feeder, which in turn ends every paginator waiting on the
/// context.
#[derive(Debug)]
pub struct NftSession {
    context_rx: watch::Receiver<FetchContext>,
    _feeder: PipelineTask,
}

impl NftSession {
    pub fn new(accounts: &dyn AccountRepository, nft: &dyn NftRepository) -> Self {
        let (context_tx, context_rx) = watch::channel(FetchContext::default());
        let account_stream = accounts.selected_account_stream();
        let filter_stream = nft.filters_stream();

        let feeder = PipelineTask::spawn(move |cancel| async move {
            let updates = combine_latest(account_stream, filter_stream);
            pin_mut!(updates);

            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    maybe_update = updates.next() => {
                        match maybe_update {
                            Some((account, excluded_filters)) => {
                                debug!(account = account.id, "rebuilding fetch context");
                                let context = FetchContext::new(Some(account), excluded_filters);
                                if context_tx.send(context).is_err() {
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        Self {
            context_rx,
            _feeder: feeder,
        }
    }

    /// A fresh handle on the session's fetch context.
    pub fn context(&self) -> watch::Receiver<FetchContext> {
        self.context_rx.clone()
    }
}
