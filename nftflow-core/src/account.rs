// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::chain::ChainId;
use std::collections::BTreeMap;

/// The meta account whose ownership scopes user-owned NFT fetches.
///
/// Supplied by the account repository; the pipeline only reads the per-chain
/// address when building a fetch context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: u64,
    pub name: String,
    addresses: BTreeMap<ChainId, String>,
}

impl Account {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            addresses: BTreeMap::new(),
        }
    }

    /// Register the account's address on one chain.
    #[must_use]
    pub fn with_address(mut self, chain_id: ChainId, address: impl Into<String>) -> Self {
        self.addresses.insert(chain_id, address.into());
        self
    }

    /// The account's address on the given chain, if it has one.
    pub fn address_on(&self, chain_id: &ChainId) -> Option<&str> {
        self.addresses.get(chain_id).map(String::as_str)
    }
}
