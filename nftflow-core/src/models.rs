// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Raw payload models returned by the external NFT provider.
//!
//! These mirror the provider's JSON wire shapes; the repository layer
//! deserializes into them and the domain conversions in
//! [`nft`](crate::nft) lift them into collections.

use crate::pagination::PageCursor;
use serde::{Deserialize, Serialize};

/// Summary of one NFT contract as listed in an owned-contracts page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub address: Option<String>,
    pub title: Option<String>,
    pub total_balance: Option<u32>,
    pub media_thumbnail: Option<String>,
    #[serde(default)]
    pub opensea_slug: Option<String>,
}

/// One token as returned by metadata or collection-page endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub contract_address: Option<String>,
    pub token_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub media_thumbnail: Option<String>,
    pub collection_name: Option<String>,
    pub token_type: Option<String>,
    /// Balance of this token held by the queried account, when the page came
    /// from an ownership-scoped endpoint.
    pub balance: Option<u32>,
}

/// One page of the user's owned NFT contracts on a single chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractsPage {
    #[serde(default)]
    pub contracts: Vec<ContractInfo>,
    #[serde(default)]
    pub next_page: PageCursor,
}

/// One page of tokens for a single contract on a single chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensPage {
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
    #[serde(default)]
    pub next_page: PageCursor,
    #[serde(default)]
    pub previous_page: PageCursor,
}
