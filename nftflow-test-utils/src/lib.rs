// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the nftflow workspace: scriptable mock repositories,
//! chain and payload fixtures, and timeout-guarded stream assertions.

pub mod fixtures;
pub mod helpers;
pub mod mock_accounts;
pub mod mock_chains;
pub mod mock_nft;

pub use self::helpers::{
    assert_no_element_emitted, assert_stream_ended, request_channel, test_channel, unwrap_stream,
};
pub use self::mock_accounts::MockAccountRepository;
pub use self::mock_chains::MockChainsRepository;
pub use self::mock_nft::{MockNftRepository, Scripted};
