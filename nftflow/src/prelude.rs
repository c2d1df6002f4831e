// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Convenience re-exports for consumers of the interactor façade.

pub use crate::interactor::NftInteractor;
pub use crate::session::NftSession;

pub use nftflow_core::{
    Account, AccountRepository, Chain, ChainId, ChainsRepository, FetchContext, FullCollection,
    LightCollection, Nft, NftCollection, NftError, NftFilter, NftRepository, PagedResponse,
    PaginationEvent, PaginationRequest, Result,
};
