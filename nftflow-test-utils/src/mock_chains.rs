// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use nftflow_core::{Chain, ChainId, ChainsRepository, NftError, Result};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// In-memory chain registry whose chain set can be changed mid-test.
pub struct MockChainsRepository {
    chains_tx: watch::Sender<Vec<Chain>>,
}

impl MockChainsRepository {
    pub fn new(chains: Vec<Chain>) -> Self {
        let (chains_tx, _) = watch::channel(chains);
        Self { chains_tx }
    }

    /// Replace the registry contents; observers see the new set immediately.
    pub fn set_chains(&self, chains: Vec<Chain>) {
        self.chains_tx.send_replace(chains);
    }
}

#[async_trait]
impl ChainsRepository for MockChainsRepository {
    fn chains_stream(&self) -> BoxStream<'static, Vec<Chain>> {
        WatchStream::new(self.chains_tx.subscribe()).boxed()
    }

    async fn get_chain(&self, chain_id: &ChainId) -> Result<Chain> {
        self.chains_tx
            .borrow()
            .iter()
            .find(|chain| &chain.id == chain_id)
            .cloned()
            .ok_or_else(|| NftError::UnknownChain {
                chain_id: chain_id.clone(),
            })
    }
}
