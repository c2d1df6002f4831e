// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Chain registry model.
//!
//! Chains are loaded once per session from the registry and are read-only to
//! the pipeline; the core never mutates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a blockchain network, cheap to clone and compare.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(Arc<str>);

impl ChainId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One blockchain network as described by the chain registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: ChainId,
    pub name: String,
    /// Whether the chain advertises NFT support at all.
    pub supports_nft: bool,
    /// Identifier of the external NFT data provider for this chain, if any.
    pub nft_provider_id: Option<String>,
}

impl Chain {
    /// Returns `true` if NFT pages can actually be fetched for this chain:
    /// it must advertise NFT support and name a non-empty external provider.
    #[must_use]
    pub fn supports_nft_fetching(&self) -> bool {
        self.supports_nft
            && self
                .nft_provider_id
                .as_deref()
                .is_some_and(|id| !id.is_empty())
    }
}
