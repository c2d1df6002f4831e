// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-chain paginators: turn a stream of page requests into a stream of
//! chain-tagged page results.

use async_stream::stream;
use futures::{pin_mut, Stream, StreamExt};
use nftflow_core::{
    Chain, ChainId, FetchContext, NftError, PagedResponse, PaginationEvent, PaginationRequest,
};
use std::future::Future;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Runs one chain's pagination: one [`PagedResponse`] per request received,
/// in request arrival order.
///
/// The produced sequence is lazy, infinite and never fails: a remote fetch
/// failure is wrapped into the response's `result` and the next request is
/// processed normally. Each request snapshots the latest [`FetchContext`]
/// (account + exclusion filters), so an out-of-band context change restarts
/// the fetch scope for subsequent requests without replaying past ones.
/// Requests arriving before the context is ready wait for it.
pub fn paginate<P, S, F, Fut>(
    chain: Chain,
    requests: S,
    context: watch::Receiver<FetchContext>,
    fetch: F,
) -> impl Stream<Item = PagedResponse<P>> + Send
where
    P: Send + 'static,
    S: Stream<Item = PaginationRequest> + Send + 'static,
    F: Fn(FetchContext, Chain, PaginationRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PaginationEvent<P>, NftError>> + Send,
{
    stream! {
        pin_mut!(requests);

        while let Some(request) = requests.next().await {
            let snapshot = {
                let mut context = context.clone();
                let snapshot = match context.wait_for(FetchContext::is_ready).await {
                    Ok(guard) => guard.clone(),
                    // Context source dropped: the session is gone, stop.
                    Err(_) => break,
                };
                snapshot
            };

            debug!(chain = %chain.id, ?request, "processing page request");
            let result = fetch(snapshot, chain.clone(), request).await;
            if let Err(error) = &result {
                warn!(chain = %chain.id, %error, "page fetch failed");
            }

            yield PagedResponse::new(chain.clone(), request, result);
        }
    }
}

/// The resolved target of a single-chain pipeline: the chain and contract
/// address to page through, or the identity of a selection that could not be
/// resolved.
pub type SelectedTarget = Result<(Chain, String), (ChainId, NftError)>;

/// Single-chain, single-contract paginator whose target arrives (and may
/// change) out-of-band.
///
/// Each request waits for a resolved target, snapshots it, and fetches with
/// the snapshot, so a chain or contract switch applies to subsequent
/// requests only. An unresolvable selection is a caller contract violation:
/// it is surfaced as an error response tagged with the requested chain id
/// rather than silently swallowed.
pub fn paginate_selected<P, S, F, Fut>(
    requests: S,
    target: watch::Receiver<Option<SelectedTarget>>,
    fetch: F,
) -> impl Stream<Item = PagedResponse<P>> + Send
where
    P: Send + 'static,
    S: Stream<Item = PaginationRequest> + Send + 'static,
    F: Fn(Chain, String, PaginationRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PaginationEvent<P>, NftError>> + Send,
{
    stream! {
        pin_mut!(requests);

        while let Some(request) = requests.next().await {
            let resolved = {
                let mut target = target.clone();
                let resolved = match target.wait_for(Option::is_some).await {
                    Ok(guard) => guard.clone(),
                    Err(_) => break,
                };
                resolved
            };
            let Some(resolved) = resolved else {
                continue;
            };

            match resolved {
                Ok((chain, contract_address)) => {
                    debug!(
                        chain = %chain.id,
                        contract = %contract_address,
                        ?request,
                        "processing page request"
                    );
                    let result = fetch(chain.clone(), contract_address, request).await;
                    if let Err(error) = &result {
                        warn!(chain = %chain.id, %error, "page fetch failed");
                    }
                    yield PagedResponse::new(chain, request, result);
                }
                Err((chain_id, error)) => {
                    warn!(%chain_id, %error, "page request against unresolved selection");
                    yield PagedResponse::new(placeholder_chain(chain_id), request, Err(error));
                }
            }
        }
    }
}

// Identity-only tag for responses whose selection never resolved to a
// registry chain.
fn placeholder_chain(chain_id: ChainId) -> Chain {
    let name = chain_id.to_string();
    Chain {
        id: chain_id,
        name,
        supports_nft: false,
        nft_provider_id: None,
    }
}
