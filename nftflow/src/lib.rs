// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The nftflow interactor façade.
//!
//! [`NftInteractor`] composes the pipeline combinators from
//! `nftflow-stream` per use case and is the only surface a presentation
//! layer talks to:
//!
//! - `user_owned_collections_stream` — one consolidated list of per-chain
//!   collection states per page request, across every eligible chain.
//! - `collection_tokens_stream` — single-chain collection detail, with the
//!   user-owned and whole-collection producers alternating through the
//!   hand-off gate.
//! - `get_nft_details` / `get_owners` — point queries.
//! - `set_filter` / `filters_stream` — visibility filter state.
//!
//! Pipelines are scoped to an [`NftSession`], created on session start and
//! dropped on logout or account switch; dropping the session tears every
//! live pipeline down.

pub mod interactor;
pub mod prelude;
pub mod session;

pub use self::interactor::NftInteractor;
pub use self::session::NftSession;
