// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Domain representations of NFTs and their collections, plus the lifts from
//! the raw provider payloads.

use crate::chain::{Chain, ChainId};
use crate::models::{ContractInfo, TokenInfo, TokensPage};
use crate::pagination::PageCursor;

/// A fully resolved NFT token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nft {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub contract_address: Option<String>,
    pub token_id: Option<String>,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub collection_name: String,
    pub token_type: Option<String>,
    /// `true` when the token came from an ownership-scoped page with a
    /// non-zero balance.
    pub is_user_owned: bool,
}

impl Nft {
    /// Lift a raw token into the domain, tagging it with chain identity.
    pub fn from_token_info(info: TokenInfo, chain: &Chain) -> Self {
        let title = info
            .title
            .clone()
            .or_else(|| {
                info.token_id
                    .as_deref()
                    .map(|id| format!("#{}", short_token_id(id)))
            })
            .unwrap_or_default();

        Self {
            chain_id: chain.id.clone(),
            chain_name: chain.name.clone(),
            contract_address: info.contract_address,
            token_id: info.token_id,
            title,
            description: info.description.unwrap_or_default(),
            thumbnail: info.media_thumbnail,
            collection_name: info.collection_name.unwrap_or_default(),
            token_type: info.token_type,
            is_user_owned: info.balance.is_some_and(|balance| balance > 0),
        }
    }
}

// Hex token ids from the provider can be hundreds of digits; keep titles
// short. Ids are not guaranteed to be ASCII, so truncate on a char boundary.
fn short_token_id(token_id: &str) -> &str {
    let trimmed = token_id.trim_start_matches("0x");
    trimmed
        .char_indices()
        .nth(8)
        .map_or(trimmed, |(index, _)| &trimmed[..index])
}

/// Lightweight view of one owned contract, shown in the collections grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightCollection {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub contract_address: Option<String>,
    pub title: String,
    pub thumbnail: Option<String>,
    pub owned_tokens: u32,
}

impl LightCollection {
    pub fn from_contract_info(info: ContractInfo, chain_id: ChainId, chain_name: String) -> Self {
        let title = info
            .title
            .or_else(|| info.opensea_slug.clone())
            .or_else(|| info.address.clone())
            .unwrap_or_default();

        Self {
            chain_id,
            chain_name,
            contract_address: info.address,
            title,
            thumbnail: info.media_thumbnail,
            owned_tokens: info.total_balance.unwrap_or(0),
        }
    }
}

/// Full view of one contract's tokens, as browsed in the collection detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullCollection {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub contract_address: Option<String>,
    pub collection_name: String,
    pub tokens: Vec<Nft>,
    pub next_page: PageCursor,
    pub previous_page: PageCursor,
}

impl FullCollection {
    /// Lift one tokens page into the domain.
    ///
    /// The first token naming a contract address determines the collection's
    /// address; pages are chain-scoped by construction.
    pub fn from_tokens_page(page: TokensPage, chain: &Chain) -> Self {
        let tokens: Vec<Nft> = page
            .tokens
            .into_iter()
            .map(|info| Nft::from_token_info(info, chain))
            .collect();

        let contract_address = tokens
            .iter()
            .find_map(|token| token.contract_address.clone());

        let collection_name = tokens
            .iter()
            .map(|token| token.collection_name.clone())
            .find(|name| !name.is_empty())
            .unwrap_or_default();

        Self {
            chain_id: chain.id.clone(),
            chain_name: chain.name.clone(),
            contract_address,
            collection_name,
            tokens,
            next_page: page.next_page,
            previous_page: page.previous_page,
        }
    }
}
