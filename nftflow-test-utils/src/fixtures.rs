// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Chain, account and payload fixtures shared by the workspace tests.

use nftflow_core::{
    Account, Chain, ChainId, ContractInfo, ContractsPage, FetchContext, PageCursor, TokenInfo,
    TokensPage,
};
use tokio::sync::watch;

pub fn polkadot() -> Chain {
    Chain {
        id: ChainId::from("polkadot"),
        name: "Polkadot".to_owned(),
        supports_nft: true,
        nft_provider_id: Some("polkadot-mainnet".to_owned()),
    }
}

pub fn moonbeam() -> Chain {
    Chain {
        id: ChainId::from("moonbeam"),
        name: "Moonbeam".to_owned(),
        supports_nft: true,
        nft_provider_id: Some("moonbeam-mainnet".to_owned()),
    }
}

/// A chain without NFT capability, never eligible for fan-out.
pub fn kusama_without_nft() -> Chain {
    Chain {
        id: ChainId::from("kusama"),
        name: "Kusama".to_owned(),
        supports_nft: false,
        nft_provider_id: None,
    }
}

pub fn account_alice() -> Account {
    Account::new(1, "Alice")
        .with_address(polkadot().id, "15oF4u...alice")
        .with_address(moonbeam().id, "0xa11ce...")
}

pub fn contract(address: &str) -> ContractInfo {
    ContractInfo {
        address: Some(address.to_owned()),
        title: Some(format!("Collection {address}")),
        total_balance: Some(1),
        media_thumbnail: None,
        opensea_slug: None,
    }
}

pub fn contracts_page(addresses: &[&str]) -> ContractsPage {
    ContractsPage {
        contracts: addresses.iter().map(|address| contract(address)).collect(),
        next_page: PageCursor::start(),
    }
}

pub fn token(contract_address: &str, token_id: &str) -> TokenInfo {
    TokenInfo {
        contract_address: Some(contract_address.to_owned()),
        token_id: Some(token_id.to_owned()),
        title: Some(format!("Token {token_id}")),
        description: None,
        media_thumbnail: None,
        collection_name: Some(format!("Collection {contract_address}")),
        token_type: Some("ERC721".to_owned()),
        balance: Some(1),
    }
}

pub fn tokens_page(entries: &[(&str, &str)]) -> TokensPage {
    TokensPage {
        tokens: entries
            .iter()
            .map(|(contract_address, token_id)| token(contract_address, token_id))
            .collect(),
        next_page: PageCursor::start(),
        previous_page: PageCursor::start(),
    }
}

/// A fetch context that is already ready (Alice selected, no exclusions).
pub fn ready_context() -> FetchContext {
    FetchContext::new(Some(account_alice()), Default::default())
}

/// A context watch channel seeded with [`ready_context`].
pub fn context_watch() -> (
    watch::Sender<FetchContext>,
    watch::Receiver<FetchContext>,
) {
    watch::channel(ready_context())
}
