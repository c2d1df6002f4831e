// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use nftflow_core::{
    Chain, ContractsPage, FetchContext, NftError, NftRepository, PaginationEvent,
    PaginationRequest,
};
use nftflow_stream::fan_out;
use nftflow_test_utils::fixtures::{context_watch, contracts_page, moonbeam, polkadot};
use nftflow_test_utils::{
    assert_no_element_emitted, request_channel, test_channel, unwrap_stream, MockNftRepository,
    Scripted,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn contracts_fetch(
    nft: Arc<MockNftRepository>,
) -> impl Fn(
    FetchContext,
    Chain,
    PaginationRequest,
) -> futures::future::BoxFuture<'static, Result<PaginationEvent<ContractsPage>, NftError>>
       + Clone
       + Send
       + Sync
       + 'static {
    move |ctx, chain, request| {
        let nft = Arc::clone(&nft);
        Box::pin(async move { nft.user_owned_contracts_page(&ctx, &chain, request).await })
    }
}

/// Lets the driver absorb a chain-set update before the next request.
async fn settle() {
    sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_fan_out_joins_all_chains_in_chain_set_order() -> anyhow::Result<()> {
    // Arrange - polkadot answers late, moonbeam immediately
    let nft = Arc::new(MockNftRepository::new());
    let polkadot_page = contracts_page(&["0xAAA"]);
    let moonbeam_page = contracts_page(&["0xBBB"]);
    nft.script_contracts(
        polkadot().id,
        Scripted::ReplyAfter(
            Duration::from_millis(50),
            Ok(PaginationEvent::PageIsLoaded {
                data: polkadot_page.clone(),
            }),
        ),
    );
    nft.script_contracts(
        moonbeam().id,
        Scripted::Reply(Ok(PaginationEvent::PageIsLoaded {
            data: moonbeam_page.clone(),
        })),
    );

    let (chains_tx, chain_sets) = test_channel::<Vec<Chain>>();
    let (requests_tx, requests) = request_channel();
    let (_ctx_tx, ctx_rx) = context_watch();
    let mut batches = fan_out(chain_sets, requests, ctx_rx, contracts_fetch(nft));

    // Act
    chains_tx.send(vec![polkadot(), moonbeam()]).await?;
    settle().await;
    requests_tx.send(PaginationRequest::NextPage)?;

    // Assert - one consolidated batch, chain-set order regardless of arrival
    let batch = unwrap_stream(&mut batches, 500).await;
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].chain, polkadot());
    assert_eq!(
        batch[0].result,
        Ok(PaginationEvent::PageIsLoaded {
            data: polkadot_page
        })
    );
    assert_eq!(batch[1].chain, moonbeam());
    assert_eq!(
        batch[1].result,
        Ok(PaginationEvent::PageIsLoaded {
            data: moonbeam_page
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_fan_out_emits_empty_batch_without_eligible_chains() -> anyhow::Result<()> {
    // Arrange
    let nft = Arc::new(MockNftRepository::new());
    let (chains_tx, chain_sets) = test_channel::<Vec<Chain>>();
    let (requests_tx, requests) = request_channel();
    let (_ctx_tx, ctx_rx) = context_watch();
    let mut batches = fan_out(chain_sets, requests, ctx_rx, contracts_fetch(nft));

    // Act
    chains_tx.send(Vec::new()).await?;
    settle().await;
    requests_tx.send(PaginationRequest::Refresh)?;

    // Assert
    let batch = unwrap_stream(&mut batches, 500).await;
    assert!(batch.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_fan_out_keeps_chain_failure_inside_its_batch_entry() -> anyhow::Result<()> {
    // Arrange - one chain fails, the other succeeds
    let nft = Arc::new(MockNftRepository::new());
    nft.script_contracts(
        polkadot().id,
        Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)),
    );
    nft.script_contracts(
        moonbeam().id,
        Scripted::Reply(Err(NftError::transport("provider down"))),
    );

    let (chains_tx, chain_sets) = test_channel::<Vec<Chain>>();
    let (requests_tx, requests) = request_channel();
    let (_ctx_tx, ctx_rx) = context_watch();
    let mut batches = fan_out(chain_sets, requests, ctx_rx, contracts_fetch(nft));

    // Act
    chains_tx.send(vec![polkadot(), moonbeam()]).await?;
    settle().await;
    requests_tx.send(PaginationRequest::NextPage)?;

    // Assert - the failure stays scoped to its slot
    let batch = unwrap_stream(&mut batches, 500).await;
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].result, Ok(PaginationEvent::AllNextPagesLoaded));
    assert!(batch[1].result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_fan_out_removed_chain_is_abandoned_mid_batch() -> anyhow::Result<()> {
    // Arrange - moonbeam's fetch hangs forever
    let nft = Arc::new(MockNftRepository::new());
    nft.script_contracts(
        polkadot().id,
        Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)),
    );
    nft.script_contracts(moonbeam().id, Scripted::Never);

    let (chains_tx, chain_sets) = test_channel::<Vec<Chain>>();
    let (requests_tx, requests) = request_channel();
    let (_ctx_tx, ctx_rx) = context_watch();
    let mut batches = fan_out(chain_sets, requests, ctx_rx, contracts_fetch(nft));

    chains_tx.send(vec![polkadot(), moonbeam()]).await?;
    settle().await;

    // Act - the join stalls on the hung chain
    requests_tx.send(PaginationRequest::NextPage)?;
    assert_no_element_emitted(&mut batches, 100).await;

    // Act - the hung chain leaves the eligible set
    chains_tx.send(vec![polkadot()]).await?;

    // Assert - the batch completes without the abandoned chain, no partial
    // entry for it
    let batch = unwrap_stream(&mut batches, 500).await;
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].chain, polkadot());

    Ok(())
}

#[tokio::test]
async fn test_fan_out_added_chain_joins_subsequent_requests() -> anyhow::Result<()> {
    // Arrange
    let nft = Arc::new(MockNftRepository::new());
    nft.script_contracts(
        polkadot().id,
        Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)),
    );
    nft.script_contracts(
        polkadot().id,
        Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)),
    );
    nft.script_contracts(
        moonbeam().id,
        Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)),
    );

    let (chains_tx, chain_sets) = test_channel::<Vec<Chain>>();
    let (requests_tx, requests) = request_channel();
    let (_ctx_tx, ctx_rx) = context_watch();
    let mut batches = fan_out(chain_sets, requests, ctx_rx, contracts_fetch(nft));

    chains_tx.send(vec![polkadot()]).await?;
    settle().await;

    // Act - first request before the new chain exists
    requests_tx.send(PaginationRequest::NextPage)?;
    let first = unwrap_stream(&mut batches, 500).await;

    chains_tx.send(vec![polkadot(), moonbeam()]).await?;
    settle().await;
    requests_tx.send(PaginationRequest::NextPage)?;
    let second = unwrap_stream(&mut batches, 500).await;

    // Assert
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].chain, moonbeam());

    Ok(())
}
