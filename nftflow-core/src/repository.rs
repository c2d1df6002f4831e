// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Collaborator traits implemented by the transport and persistence layers.
//!
//! The pipeline is a library consumed by a presentation layer; these traits
//! are its only view of the outside world. Transport concerns (HTTP, JSON,
//! timeouts) live entirely behind [`NftRepository`].

use crate::account::Account;
use crate::chain::{Chain, ChainId};
use crate::context::FetchContext;
use crate::error::Result;
use crate::filter::NftFilter;
use crate::models::{ContractsPage, TokenInfo, TokensPage};
use crate::pagination::{PaginationEvent, PaginationRequest};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::BTreeSet;

/// Read-only access to the chain registry.
#[async_trait]
pub trait ChainsRepository: Send + Sync {
    /// The full registry, re-emitted whenever it changes.
    fn chains_stream(&self) -> BoxStream<'static, Vec<Chain>>;

    /// Resolve one chain by id.
    ///
    /// # Errors
    /// [`NftError::UnknownChain`](crate::NftError::UnknownChain) if the
    /// registry does not know the id.
    async fn get_chain(&self, chain_id: &ChainId) -> Result<Chain>;
}

/// Access to the currently selected meta account.
pub trait AccountRepository: Send + Sync {
    /// The selected account, re-emitted on every account switch.
    fn selected_account_stream(&self) -> BoxStream<'static, Account>;
}

/// The remote NFT data source plus filter persistence.
///
/// Every page method performs exactly one remote fetch and reports either a
/// loaded page or exhaustion in the requested direction. Requests carry only
/// a direction, so the repository keeps the continuation cursor per
/// `(chain, contract)` target; a `Refresh` request resets it.
#[async_trait]
pub trait NftRepository: Send + Sync {
    /// One page of the account's owned NFT contracts on `chain`.
    async fn user_owned_contracts_page(
        &self,
        ctx: &FetchContext,
        chain: &Chain,
        request: PaginationRequest,
    ) -> Result<PaginationEvent<ContractsPage>>;

    /// One page of the account's owned tokens under `contract_address`.
    async fn user_owned_tokens_page(
        &self,
        ctx: &FetchContext,
        chain: &Chain,
        contract_address: &str,
        request: PaginationRequest,
    ) -> Result<PaginationEvent<TokensPage>>;

    /// One page of the whole collection under `contract_address`, not scoped
    /// to any account.
    async fn collection_tokens_page(
        &self,
        chain: &Chain,
        contract_address: &str,
        request: PaginationRequest,
    ) -> Result<PaginationEvent<TokensPage>>;

    /// Metadata for a single token.
    async fn token_metadata(
        &self,
        chain: &Chain,
        contract_address: &str,
        token_id: &str,
    ) -> Result<TokenInfo>;

    /// Addresses currently owning a single token.
    async fn token_owners(
        &self,
        chain: &Chain,
        contract_address: &str,
        token_id: &str,
    ) -> Result<Vec<String>>;

    /// Persist one filter's exclusion state.
    fn set_filter_excluded(&self, filter: NftFilter, excluded: bool);

    /// The set of excluded filter names, re-emitted on every change.
    fn filters_stream(&self) -> BoxStream<'static, BTreeSet<String>>;
}
