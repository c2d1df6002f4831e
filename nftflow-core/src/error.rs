// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error taxonomy for the nftflow pipeline.
//!
//! A single root [`NftError`] covers every failure mode the pipeline can
//! surface. Per-chain fetch failures are caught at the paginator boundary and
//! carried inside a [`PagedResponse`](crate::PagedResponse) rather than
//! terminating any stream; point queries return this error directly.

use crate::chain::ChainId;

/// Root error type for all nftflow operations.
#[derive(Debug, thiserror::Error)]
pub enum NftError {
    /// A remote fetch failed for one chain.
    ///
    /// Scoped to the chain whose fetch failed; it never aborts the aggregate
    /// stream or suppresses other chains' results.
    #[error("transport error: {context}")]
    Transport {
        /// What the pipeline was doing when the transport failed
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A chain selection referenced a chain the registry does not know,
    /// or one that does not support NFT operations.
    ///
    /// This is a caller contract violation and fails fast.
    #[error("chain {chain_id} is not supported or does not support NFT operations")]
    UnknownChain {
        /// The offending chain id
        chain_id: ChainId,
    },

    /// The chain exists but lacks NFT capability.
    ///
    /// An expected steady state, normally represented as
    /// [`NftCollection::Empty`](crate::NftCollection::Empty) rather than
    /// propagated as an error.
    #[error("chain {chain_id} does not support NFTs")]
    NotSupported { chain_id: ChainId },

    /// A contract or token the caller asked for does not exist remotely.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// A point query was issued on a token missing a required field.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

impl NftError {
    /// Create a transport error with the given context.
    pub fn transport(context: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying cause.
    pub fn transport_with(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Returns `true` if this error is scoped to a single chain and should
    /// be rendered as an error card for that chain only.
    #[must_use]
    pub const fn is_chain_scoped(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::NotSupported { .. })
    }
}

impl Clone for NftError {
    fn clone(&self) -> Self {
        match self {
            // The boxed source is not cloneable; fold it into the context.
            Self::Transport { context, source } => Self::Transport {
                context: match source {
                    Some(source) => format!("{context}: {source}"),
                    None => context.clone(),
                },
                source: None,
            },
            Self::UnknownChain { chain_id } => Self::UnknownChain {
                chain_id: chain_id.clone(),
            },
            Self::NotSupported { chain_id } => Self::NotSupported {
                chain_id: chain_id.clone(),
            },
            Self::NotFound { what } => Self::NotFound { what: what.clone() },
            Self::MissingField { field } => Self::MissingField { field },
        }
    }
}

impl PartialEq for NftError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transport { context: a, .. }, Self::Transport { context: b, .. }) => a == b,
            (Self::UnknownChain { chain_id: a }, Self::UnknownChain { chain_id: b }) => a == b,
            (Self::NotSupported { chain_id: a }, Self::NotSupported { chain_id: b }) => a == b,
            (Self::NotFound { what: a }, Self::NotFound { what: b }) => a == b,
            (Self::MissingField { field: a }, Self::MissingField { field: b }) => a == b,
            _ => false,
        }
    }
}

/// Specialized `Result` for nftflow operations.
pub type Result<T> = std::result::Result<T, NftError>;
