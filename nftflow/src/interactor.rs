// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The interactor: composes paginators, fan-out, stale fallback and the
//! hand-off gate per use case.

use futures::stream::BoxStream;
use futures::{pin_mut, Stream, StreamExt};
use nftflow_core::{
    Chain, ChainId, ChainsRepository, ContractsPage, FetchContext, FullCollection,
    LightCollection, Nft, NftCollection, NftError, NftFilter, NftRepository, PagedResponse,
    PaginationEvent, PaginationRequest, PipelineTask, Result, TokensPage,
};
use nftflow_stream::{
    combine_latest, fan_out, paginate_selected, HandoffGate, HandoffPhase, SelectedTarget,
    SharedRequests, StaleFallbackExt,
};
use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::watch;
use tracing::warn;

use crate::session::NftSession;

/// The data/domain layer façade for NFT browsing.
pub struct NftInteractor {
    nft: Arc<dyn NftRepository>,
    chains: Arc<dyn ChainsRepository>,
    session: Arc<NftSession>,
}

impl NftInteractor {
    pub fn new(
        nft: Arc<dyn NftRepository>,
        chains: Arc<dyn ChainsRepository>,
        session: Arc<NftSession>,
    ) -> Self {
        Self {
            nft,
            chains,
            session,
        }
    }

    /// One consolidated list of per-chain collection states per page
    /// request, covering every eligible chain.
    ///
    /// Eligible chains are the registry chains that can actually fetch NFTs,
    /// narrowed to one chain when `chain_selection` carries a selection.
    /// Each request fans out to one paginator per eligible chain; all
    /// outcomes for the request are concatenated into a single emission. A
    /// batch with no successful data is masked by the last emission that had
    /// some, so a populated grid never blanks while a refresh is in flight.
    pub fn user_owned_collections_stream(
        &self,
        requests: impl Stream<Item = PaginationRequest> + Send + 'static,
        chain_selection: impl Stream<Item = Option<ChainId>> + Send + 'static,
    ) -> impl Stream<Item = Vec<NftCollection<LightCollection>>> + Send {
        let registry = self.chains.chains_stream().map(|chains| {
            chains
                .into_iter()
                .filter(Chain::supports_nft_fetching)
                .collect::<Vec<_>>()
        });

        let chain_sets =
            combine_latest(registry, chain_selection).map(|(chains, selection)| match selection {
                Some(chain_id) => chains
                    .into_iter()
                    .filter(|chain| chain.id == chain_id)
                    .collect(),
                None => chains,
            });

        let nft = Arc::clone(&self.nft);
        let fetch = move |ctx: FetchContext, chain: Chain, request: PaginationRequest| {
            let nft = Arc::clone(&nft);
            async move { nft.user_owned_contracts_page(&ctx, &chain, request).await }
        };

        fan_out(chain_sets, requests, self.session.context(), fetch)
            .map(|batch| {
                batch
                    .into_iter()
                    .flat_map(light_collections)
                    .collect::<Vec<_>>()
            })
            .with_stale_fallback(|collections: &Vec<NftCollection<LightCollection>>| {
                collections.iter().any(NftCollection::is_data)
            })
    }

    /// Collection detail for one contract on one chain: the user's own
    /// tokens first, then the rest of the collection.
    ///
    /// Both producers subscribe to the same request stream through the
    /// hand-off gate; the user-owned producer holds the floor until it
    /// reports `AllNextPagesLoaded`, at which point the whole-collection
    /// producer takes over (and hands back on `AllPreviousPagesLoaded`).
    /// Each producer's output passes through its own stale-fallback before
    /// the two are merged into the shared sink, so neither can blank the
    /// view the other populated.
    pub fn collection_tokens_stream(
        &self,
        requests: impl Stream<Item = PaginationRequest> + Send + 'static,
        chain_selection: impl Stream<Item = ChainId> + Send + 'static,
        contract_address: impl Stream<Item = String> + Send + 'static,
    ) -> impl Stream<Item = (NftCollection<FullCollection>, PaginationRequest)> + Send {
        let shared = SharedRequests::new();
        let gate = HandoffGate::new();

        // Gate subscriptions are created before any request is forwarded so
        // neither producer can miss the first request.
        let owned_requests = gate.gate(shared.subscribe(), HandoffPhase::UserOwned);
        let available_requests = gate.gate(shared.subscribe(), HandoffPhase::Available);

        let forward = PipelineTask::spawn({
            let shared = shared.clone();
            move |cancel| async move {
                pin_mut!(requests);
                loop {
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        maybe_request = requests.next() => {
                            match maybe_request {
                                Some(request) => shared.send(request),
                                None => break,
                            }
                        }
                    }
                }
            }
        });

        let (target_tx, target_rx) = watch::channel(None::<SelectedTarget>);
        let resolve = PipelineTask::spawn({
            let chains = Arc::clone(&self.chains);
            move |cancel| async move {
                let eligible = chains.chains_stream().map(|chains| {
                    chains
                        .into_iter()
                        .filter(Chain::supports_nft_fetching)
                        .collect::<Vec<_>>()
                });
                let selections =
                    combine_latest(combine_latest(eligible, chain_selection), contract_address);
                pin_mut!(selections);

                loop {
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        maybe_selection = selections.next() => {
                            let Some(((chains, chain_id), contract_address)) = maybe_selection
                            else {
                                break;
                            };
                            let selected = chains
                                .into_iter()
                                .find(|chain| chain.id == chain_id);
                            let resolved = match selected {
                                Some(chain) => Ok((chain, contract_address)),
                                None => {
                                    warn!(%chain_id, "selected chain is unknown or NFT-incapable");
                                    Err((
                                        chain_id.clone(),
                                        NftError::UnknownChain { chain_id },
                                    ))
                                }
                            };
                            if target_tx.send(Some(resolved)).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        let owned_fetch = {
            let nft = Arc::clone(&self.nft);
            let context = self.session.context();
            move |chain: Chain, contract_address: String, request: PaginationRequest| {
                let nft = Arc::clone(&nft);
                let mut context = context.clone();
                async move {
                    let snapshot = context
                        .wait_for(FetchContext::is_ready)
                        .await
                        .map_err(|_| NftError::transport("session closed"))?
                        .clone();
                    nft.user_owned_tokens_page(&snapshot, &chain, &contract_address, request)
                        .await
                }
            }
        };

        let available_fetch = {
            let nft = Arc::clone(&self.nft);
            move |chain: Chain, contract_address: String, request: PaginationRequest| {
                let nft = Arc::clone(&nft);
                async move {
                    nft.collection_tokens_page(&chain, &contract_address, request)
                        .await
                }
            }
        };

        let owned = paginate_selected(owned_requests, target_rx.clone(), owned_fetch)
            .map({
                let gate = gate.clone();
                move |response| {
                    if matches!(response.result, Ok(PaginationEvent::AllNextPagesLoaded)) {
                        gate.advance_to(HandoffPhase::Available);
                    }
                    full_collection_pair(response)
                }
            })
            .with_stale_fallback(is_data_pair);

        let available = paginate_selected(available_requests, target_rx, available_fetch)
            .map({
                let gate = gate.clone();
                move |response| {
                    if matches!(response.result, Ok(PaginationEvent::AllPreviousPagesLoaded)) {
                        gate.advance_to(HandoffPhase::UserOwned);
                    }
                    full_collection_pair(response)
                }
            })
            .with_stale_fallback(is_data_pair);

        // Output merging is unconditional; gating happens on the request
        // side only, so the sink never blocks either producer.
        PipelineStream {
            inner: futures::stream::select(owned, available).boxed(),
            _tasks: vec![forward, resolve],
        }
    }

    /// Metadata for a single token.
    pub async fn get_nft_details(
        &self,
        chain_id: &ChainId,
        contract_address: &str,
        token_id: &str,
    ) -> Result<Nft> {
        let chain = self.chains.get_chain(chain_id).await?;
        let info = self
            .nft
            .token_metadata(&chain, contract_address, token_id)
            .await?;

        let mut nft = Nft::from_token_info(info, &chain);
        if nft.contract_address.is_none() {
            nft.contract_address = Some(contract_address.to_owned());
        }
        if nft.token_id.is_none() {
            nft.token_id = Some(token_id.to_owned());
        }
        Ok(nft)
    }

    /// Addresses currently owning `token`.
    ///
    /// Fails with [`NftError::MissingField`] before issuing any remote call
    /// when the token lacks its contract address or token id.
    pub async fn get_owners(&self, token: &Nft) -> Result<Vec<String>> {
        let contract_address = token.contract_address.as_deref().ok_or(NftError::MissingField {
            field: "contract_address",
        })?;
        let token_id = token
            .token_id
            .as_deref()
            .ok_or(NftError::MissingField { field: "token_id" })?;

        let chain = self.chains.get_chain(&token.chain_id).await?;
        self.nft
            .token_owners(&chain, contract_address, token_id)
            .await
    }

    /// Toggle one visibility filter. `applied = true` means the filter is in
    /// effect, i.e. removed from the persisted exclusion set.
    pub fn set_filter(&self, filter: NftFilter, applied: bool) {
        self.nft.set_filter_excluded(filter, !applied);
    }

    /// Current applied-state of every filter, re-emitted on each change.
    pub fn filters_stream(&self) -> impl Stream<Item = BTreeMap<NftFilter, bool>> + Send {
        self.nft.filters_stream().map(|excluded| {
            NftFilter::ALL
                .iter()
                .map(|filter| (*filter, !excluded.contains(filter.as_str())))
                .collect()
        })
    }
}

fn is_data_pair(pair: &(NftCollection<FullCollection>, PaginationRequest)) -> bool {
    pair.0.is_data()
}

/// Flattens one chain's contracts-page outcome into its collection cards.
fn light_collections(
    response: PagedResponse<ContractsPage>,
) -> Vec<NftCollection<LightCollection>> {
    let PagedResponse { chain, result, .. } = response;
    let (chain_id, chain_name) = (chain.id, chain.name);

    match result {
        Err(error) => vec![NftCollection::error(chain_id, chain_name, error)],
        Ok(event) => match event.into_page() {
            Some(page) if !page.contracts.is_empty() => page
                .contracts
                .into_iter()
                .map(|contract| {
                    NftCollection::Data(LightCollection::from_contract_info(
                        contract,
                        chain_id.clone(),
                        chain_name.clone(),
                    ))
                })
                .collect(),
            _ => vec![NftCollection::empty(chain_id, chain_name)],
        },
    }
}

fn full_collection_pair(
    response: PagedResponse<TokensPage>,
) -> (NftCollection<FullCollection>, PaginationRequest) {
    let PagedResponse {
        chain,
        request,
        result,
    } = response;

    let collection = match result {
        Err(error) => NftCollection::error(chain.id.clone(), chain.name.clone(), error),
        Ok(event) => match event.into_page() {
            Some(page) if !page.tokens.is_empty() => {
                NftCollection::Data(FullCollection::from_tokens_page(page, &chain))
            }
            _ => NftCollection::empty(chain.id.clone(), chain.name.clone()),
        },
    };

    (collection, request)
}

/// A composed pipeline plus the background tasks keeping it fed; dropping
/// the stream cancels the tasks.
struct PipelineStream<T> {
    inner: BoxStream<'static, T>,
    _tasks: Vec<PipelineTask>,
}

impl<T> Stream for PipelineStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}
