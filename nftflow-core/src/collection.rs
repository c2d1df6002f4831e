// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The externally observable unit of the pipeline: one chain's collection
//! state per emission.

use crate::chain::ChainId;
use crate::error::NftError;

/// Per-chain collection state, exactly one variant active per emission.
///
/// `Empty` and `Error` carry chain identity uniformly so consumers can
/// render a chain-scoped placeholder or error card without inspecting the
/// payload type.
#[derive(Clone, Debug, PartialEq)]
pub enum NftCollection<T> {
    /// The chain answered but holds nothing to show (no page data, empty
    /// page, or pagination exhausted).
    Empty {
        chain_id: ChainId,
        chain_name: String,
    },
    /// Successfully fetched collection data.
    Data(T),
    /// The chain's fetch failed; other chains are unaffected.
    Error {
        chain_id: ChainId,
        chain_name: String,
        error: NftError,
    },
}

impl<T> NftCollection<T> {
    pub fn empty(chain_id: ChainId, chain_name: impl Into<String>) -> Self {
        Self::Empty {
            chain_id,
            chain_name: chain_name.into(),
        }
    }

    pub fn error(chain_id: ChainId, chain_name: impl Into<String>, error: NftError) -> Self {
        Self::Error {
            chain_id,
            chain_name: chain_name.into(),
            error,
        }
    }

    /// Whether this emission carries successfully fetched data.
    ///
    /// This is the predicate the stale-fallback combiner keys on: only a
    /// `Data` value may overwrite the cached baseline. `Error` is
    /// deliberately not "real data" so a transient failure never blanks a
    /// previously populated view.
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// The chain this emission belongs to, when identity is carried
    /// alongside the variant rather than inside the payload.
    pub fn chain_id(&self) -> Option<&ChainId> {
        match self {
            Self::Empty { chain_id, .. } | Self::Error { chain_id, .. } => Some(chain_id),
            Self::Data(_) => None,
        }
    }

    /// Maps the `Data` payload, preserving `Empty` and `Error` untouched.
    pub fn map_data<U, F>(self, f: F) -> NftCollection<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Data(data) => NftCollection::Data(f(data)),
            Self::Empty {
                chain_id,
                chain_name,
            } => NftCollection::Empty {
                chain_id,
                chain_name,
            },
            Self::Error {
                chain_id,
                chain_name,
                error,
            } => NftCollection::Error {
                chain_id,
                chain_name,
                error,
            },
        }
    }
}
