// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scriptable in-memory NFT repository.
//!
//! Page endpoints replay scripted responses in order; a [`Scripted::Never`]
//! entry parks the fetch forever, which is how cancellation tests model a
//! chain that times out or hangs.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use nftflow_core::{
    Chain, ChainId, ContractsPage, FetchContext, NftError, NftFilter, NftRepository,
    PaginationEvent, PaginationRequest, Result, TokenInfo, TokensPage,
};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// One scripted reply for a page endpoint.
pub enum Scripted<P> {
    /// Answer immediately.
    Reply(Result<PaginationEvent<P>>),
    /// Answer after a delay, for arrival-order scrambling.
    ReplyAfter(Duration, Result<PaginationEvent<P>>),
    /// Park forever; only cancellation ends the fetch.
    Never,
}

pub struct MockNftRepository {
    contracts: Mutex<HashMap<ChainId, VecDeque<Scripted<ContractsPage>>>>,
    owned_tokens: Mutex<VecDeque<Scripted<TokensPage>>>,
    collection_tokens: Mutex<VecDeque<Scripted<TokensPage>>>,
    metadata: Mutex<HashMap<String, Result<TokenInfo>>>,
    owners: Mutex<HashMap<String, Result<Vec<String>>>>,
    filters_tx: watch::Sender<BTreeSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockNftRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNftRepository {
    pub fn new() -> Self {
        let (filters_tx, _) = watch::channel(BTreeSet::new());
        Self {
            contracts: Mutex::new(HashMap::new()),
            owned_tokens: Mutex::new(VecDeque::new()),
            collection_tokens: Mutex::new(VecDeque::new()),
            metadata: Mutex::new(HashMap::new()),
            owners: Mutex::new(HashMap::new()),
            filters_tx,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script_contracts(&self, chain_id: ChainId, scripted: Scripted<ContractsPage>) {
        self.contracts
            .lock()
            .entry(chain_id)
            .or_default()
            .push_back(scripted);
    }

    pub fn script_owned_tokens(&self, scripted: Scripted<TokensPage>) {
        self.owned_tokens.lock().push_back(scripted);
    }

    pub fn script_collection_tokens(&self, scripted: Scripted<TokensPage>) {
        self.collection_tokens.lock().push_back(scripted);
    }

    pub fn insert_metadata(
        &self,
        chain_id: &ChainId,
        contract: &str,
        token_id: &str,
        reply: Result<TokenInfo>,
    ) {
        self.metadata
            .lock()
            .insert(point_key(chain_id, contract, token_id), reply);
    }

    pub fn insert_owners(
        &self,
        chain_id: &ChainId,
        contract: &str,
        token_id: &str,
        reply: Result<Vec<String>>,
    ) {
        self.owners
            .lock()
            .insert(point_key(chain_id, contract, token_id), reply);
    }

    /// Every remote call recorded so far, in order.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

async fn play<P>(scripted: Option<Scripted<P>>, endpoint: &str) -> Result<PaginationEvent<P>> {
    match scripted {
        Some(Scripted::Reply(reply)) => reply,
        Some(Scripted::ReplyAfter(delay, reply)) => {
            tokio::time::sleep(delay).await;
            reply
        }
        Some(Scripted::Never) => {
            futures::future::pending::<()>().await;
            unreachable!()
        }
        None => Err(NftError::transport(format!(
            "no scripted response left for {endpoint}"
        ))),
    }
}

fn point_key(chain_id: &ChainId, contract: &str, token_id: &str) -> String {
    format!("{chain_id}:{contract}:{token_id}")
}

#[async_trait]
impl NftRepository for MockNftRepository {
    async fn user_owned_contracts_page(
        &self,
        _ctx: &FetchContext,
        chain: &Chain,
        _request: PaginationRequest,
    ) -> Result<PaginationEvent<ContractsPage>> {
        self.record(format!("user_owned_contracts_page:{}", chain.id));
        let scripted = self
            .contracts
            .lock()
            .get_mut(&chain.id)
            .and_then(VecDeque::pop_front);
        play(scripted, &format!("contracts on {}", chain.id)).await
    }

    async fn user_owned_tokens_page(
        &self,
        _ctx: &FetchContext,
        chain: &Chain,
        contract_address: &str,
        _request: PaginationRequest,
    ) -> Result<PaginationEvent<TokensPage>> {
        self.record(format!(
            "user_owned_tokens_page:{}:{contract_address}",
            chain.id
        ));
        let scripted = self.owned_tokens.lock().pop_front();
        play(scripted, "owned tokens").await
    }

    async fn collection_tokens_page(
        &self,
        chain: &Chain,
        contract_address: &str,
        _request: PaginationRequest,
    ) -> Result<PaginationEvent<TokensPage>> {
        self.record(format!(
            "collection_tokens_page:{}:{contract_address}",
            chain.id
        ));
        let scripted = self.collection_tokens.lock().pop_front();
        play(scripted, "collection tokens").await
    }

    async fn token_metadata(
        &self,
        chain: &Chain,
        contract_address: &str,
        token_id: &str,
    ) -> Result<TokenInfo> {
        self.record(format!("token_metadata:{}:{contract_address}:{token_id}", chain.id));
        self.metadata
            .lock()
            .get(&point_key(&chain.id, contract_address, token_id))
            .cloned()
            .unwrap_or_else(|| {
                Err(NftError::not_found(format!(
                    "token {token_id} under {contract_address}"
                )))
            })
    }

    async fn token_owners(
        &self,
        chain: &Chain,
        contract_address: &str,
        token_id: &str,
    ) -> Result<Vec<String>> {
        self.record(format!("token_owners:{}:{contract_address}:{token_id}", chain.id));
        self.owners
            .lock()
            .get(&point_key(&chain.id, contract_address, token_id))
            .cloned()
            .unwrap_or_else(|| {
                Err(NftError::not_found(format!(
                    "token {token_id} under {contract_address}"
                )))
            })
    }

    fn set_filter_excluded(&self, filter: NftFilter, excluded: bool) {
        self.filters_tx.send_modify(|excluded_set| {
            if excluded {
                excluded_set.insert(filter.as_str().to_owned());
            } else {
                excluded_set.remove(filter.as_str());
            }
        });
    }

    fn filters_stream(&self) -> BoxStream<'static, BTreeSet<String>> {
        WatchStream::new(self.filters_tx.subscribe()).boxed()
    }
}
