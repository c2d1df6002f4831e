// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pagination protocol exchanged between request producers and paginators.
//!
//! A consumer emits [`PaginationRequest`]s into a shared request stream; each
//! per-chain paginator answers every request it processes with exactly one
//! [`PaginationEvent`], tagged with chain identity and the originating
//! request as a [`PagedResponse`].

use crate::chain::Chain;
use crate::error::NftError;
use serde::{Deserialize, Serialize};

/// An opaque continuation token for forward or backward pagination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(pub Option<String>);

impl PageCursor {
    pub fn start() -> Self {
        Self(None)
    }

    pub fn at(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    /// `true` if this cursor points past the last page in its direction.
    pub fn is_exhausted(&self) -> bool {
        self.0.is_none()
    }
}

/// Intent emitted by the consumer, forwarded opaquely by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationRequest {
    /// Fetch the page after the current forward cursor.
    NextPage,
    /// Fetch the page before the current backward cursor.
    PreviousPage,
    /// Discard cursors and re-fetch from the beginning.
    Refresh,
}

/// The outcome of processing one `(chain, request)` pair.
///
/// Exactly one event is produced per request a paginator processes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaginationEvent<P> {
    /// A page was fetched successfully; carries the raw payload.
    PageIsLoaded { data: P },
    /// Forward pagination is exhausted for this producer.
    AllNextPagesLoaded,
    /// Backward pagination is exhausted for this producer.
    AllPreviousPagesLoaded,
}

impl<P> PaginationEvent<P> {
    pub const fn is_page(&self) -> bool {
        matches!(self, Self::PageIsLoaded { .. })
    }

    /// The loaded payload, discarding exhaustion events.
    pub fn into_page(self) -> Option<P> {
        match self {
            Self::PageIsLoaded { data } => Some(data),
            _ => None,
        }
    }

    /// Maps the payload of a `PageIsLoaded`, leaving other variants intact.
    pub fn map_page<Q, F>(self, f: F) -> PaginationEvent<Q>
    where
        F: FnOnce(P) -> Q,
    {
        match self {
            Self::PageIsLoaded { data } => PaginationEvent::PageIsLoaded { data: f(data) },
            Self::AllNextPagesLoaded => PaginationEvent::AllNextPagesLoaded,
            Self::AllPreviousPagesLoaded => PaginationEvent::AllPreviousPagesLoaded,
        }
    }
}

/// A chain-tagged fetch outcome: the unit flowing out of every paginator.
///
/// Chain identity is attached once, when the response is built, and is
/// immutable afterwards. The `result` wraps per-chain fetch failures so the
/// response stream itself never fails.
#[derive(Clone, Debug, PartialEq)]
pub struct PagedResponse<P> {
    pub chain: Chain,
    pub request: PaginationRequest,
    pub result: Result<PaginationEvent<P>, NftError>,
}

impl<P> PagedResponse<P> {
    pub fn new(
        chain: Chain,
        request: PaginationRequest,
        result: Result<PaginationEvent<P>, NftError>,
    ) -> Self {
        Self {
            chain,
            request,
            result,
        }
    }

    /// Maps the page payload, preserving chain tag, request and errors.
    pub fn map_page<Q, F>(self, f: F) -> PagedResponse<Q>
    where
        F: FnOnce(P) -> Q,
    {
        PagedResponse {
            chain: self.chain,
            request: self.request,
            result: self.result.map(|event| event.map_page(f)),
        }
    }
}
