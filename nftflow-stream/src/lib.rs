// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream combinators for multi-chain NFT pagination.
//!
//! This crate builds the concurrent, cancellable pipeline the interactor
//! façade composes per use case:
//!
//! - **[`paginate`]**: one per-chain paginator turning page requests into
//!   chain-tagged page results, one result per request, never failing the
//!   stream itself.
//! - **[`fan_out`]**: runs one paginator per currently-eligible chain,
//!   dispatches every request to all of them concurrently, and joins each
//!   request's results into one consolidated batch. Removing a chain cancels
//!   its paginator; in-flight fetches are abandoned without partial output.
//! - **[`StaleFallbackExt::with_stale_fallback`]**: substitutes the last
//!   known-good value whenever a fresh emission would regress to an empty or
//!   failed state.
//! - **[`HandoffGate`]**: lets two paginated producers alternate ownership
//!   of one shared request stream without ever blocking either of them.
//! - **[`SharedRequests`]**: the broadcast hub that fans one request stream
//!   out to every producer.
//!
//! All combinators are cooperative: network fetches are the only suspension
//! points, and dropping a pipeline's output stream cancels every worker it
//! spawned.

pub mod combine;
pub mod fan_out;
pub mod handoff;
pub mod paginator;
pub mod shared;
pub mod stale_fallback;
pub mod with_previous;

pub use self::combine::combine_latest;
pub use self::fan_out::{fan_out, FanOut};
pub use self::handoff::{HandoffGate, HandoffPhase};
pub use self::paginator::{paginate, paginate_selected, SelectedTarget};
pub use self::shared::SharedRequests;
pub use self::stale_fallback::{StaleFallback, StaleFallbackExt};
pub use self::with_previous::{WithPrevious, WithPreviousExt};
