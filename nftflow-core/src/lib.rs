// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Domain model and collaborator contracts for the nftflow pipeline.
//!
//! This crate holds everything the stream combinators and the interactor
//! agree on: the chain registry model, the pagination protocol exchanged
//! between request producers and per-chain paginators, the `NftCollection`
//! sum type that consumers observe, the error taxonomy, and the repository
//! traits implemented by the transport layer.

pub mod account;
pub mod chain;
pub mod collection;
pub mod context;
pub mod error;
pub mod filter;
pub mod models;
pub mod nft;
pub mod pagination;
pub mod repository;
pub mod task;

pub use self::account::Account;
pub use self::chain::{Chain, ChainId};
pub use self::collection::NftCollection;
pub use self::context::FetchContext;
pub use self::error::{NftError, Result};
pub use self::filter::NftFilter;
pub use self::models::{ContractInfo, ContractsPage, TokenInfo, TokensPage};
pub use self::nft::{FullCollection, LightCollection, Nft};
pub use self::pagination::{PageCursor, PagedResponse, PaginationEvent, PaginationRequest};
pub use self::repository::{AccountRepository, ChainsRepository, NftRepository};
pub use self::task::PipelineTask;
