// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::pin_mut;
use nftflow_core::{
    Chain, ChainId, ContractsPage, FetchContext, NftError, NftRepository, PaginationEvent,
    PaginationRequest, TokensPage,
};
use nftflow_stream::{paginate, paginate_selected, SelectedTarget};
use nftflow_test_utils::fixtures::{contracts_page, polkadot, ready_context, tokens_page};
use nftflow_test_utils::{
    assert_no_element_emitted, request_channel, unwrap_stream, MockNftRepository, Scripted,
};
use std::sync::Arc;
use tokio::sync::watch;

fn contracts_fetch(
    nft: Arc<MockNftRepository>,
) -> impl Fn(
    FetchContext,
    Chain,
    PaginationRequest,
) -> futures::future::BoxFuture<'static, Result<PaginationEvent<ContractsPage>, NftError>>
       + Send
       + Sync
       + 'static {
    move |ctx, chain, request| {
        let nft = Arc::clone(&nft);
        Box::pin(async move { nft.user_owned_contracts_page(&ctx, &chain, request).await })
    }
}

fn collection_fetch(
    nft: Arc<MockNftRepository>,
) -> impl Fn(
    Chain,
    String,
    PaginationRequest,
) -> futures::future::BoxFuture<'static, Result<PaginationEvent<TokensPage>, NftError>>
       + Send
       + Sync
       + 'static {
    move |chain, contract_address, request| {
        let nft = Arc::clone(&nft);
        Box::pin(async move {
            nft.collection_tokens_page(&chain, &contract_address, request)
                .await
        })
    }
}

#[tokio::test]
async fn test_paginate_answers_each_request_in_order() -> anyhow::Result<()> {
    // Arrange - a page, a failure, then forward exhaustion
    let nft = Arc::new(MockNftRepository::new());
    let page = contracts_page(&["0xAAA"]);
    nft.script_contracts(
        polkadot().id,
        Scripted::Reply(Ok(PaginationEvent::PageIsLoaded { data: page.clone() })),
    );
    nft.script_contracts(
        polkadot().id,
        Scripted::Reply(Err(NftError::transport("provider down"))),
    );
    nft.script_contracts(
        polkadot().id,
        Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)),
    );

    let (tx, requests) = request_channel();
    let (_ctx_tx, ctx_rx) = watch::channel(ready_context());
    let responses = paginate(polkadot(), requests, ctx_rx, contracts_fetch(nft));
    pin_mut!(responses);

    // Act
    tx.send(PaginationRequest::NextPage)?;
    tx.send(PaginationRequest::NextPage)?;
    tx.send(PaginationRequest::NextPage)?;

    // Assert - one response per request, in request order, stream survives
    // the mid-sequence failure
    let first = unwrap_stream(&mut responses, 500).await;
    assert_eq!(first.chain, polkadot());
    assert_eq!(first.request, PaginationRequest::NextPage);
    assert_eq!(first.result, Ok(PaginationEvent::PageIsLoaded { data: page }));

    let second = unwrap_stream(&mut responses, 500).await;
    assert!(second.result.is_err());

    let third = unwrap_stream(&mut responses, 500).await;
    assert_eq!(third.result, Ok(PaginationEvent::AllNextPagesLoaded));

    Ok(())
}

#[tokio::test]
async fn test_paginate_waits_for_ready_context() -> anyhow::Result<()> {
    // Arrange - no account selected yet
    let nft = Arc::new(MockNftRepository::new());
    nft.script_contracts(
        polkadot().id,
        Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)),
    );

    let (tx, requests) = request_channel();
    let (ctx_tx, ctx_rx) = watch::channel(FetchContext::default());
    let responses = paginate(polkadot(), requests, ctx_rx, contracts_fetch(Arc::clone(&nft)));
    pin_mut!(responses);

    // Act - the request arrives before the session is ready
    tx.send(PaginationRequest::NextPage)?;

    // Assert - the fetch is held back, no remote call is made
    assert_no_element_emitted(&mut responses, 100).await;
    assert!(nft.recorded_calls().is_empty());

    // Act - an account gets selected
    ctx_tx.send(ready_context())?;

    // Assert - the held request is processed against the fresh context
    let response = unwrap_stream(&mut responses, 500).await;
    assert_eq!(response.result, Ok(PaginationEvent::AllNextPagesLoaded));

    Ok(())
}

#[tokio::test]
async fn test_paginate_snapshots_fresh_context_per_request() -> anyhow::Result<()> {
    // Arrange - a fetch that records the exclusion filters it was given
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let fetch = {
        let seen = Arc::clone(&seen);
        move |ctx: FetchContext, _chain: Chain, _request: PaginationRequest| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(ctx.excluded_filters.clone());
                Ok(PaginationEvent::<ContractsPage>::AllNextPagesLoaded)
            }
        }
    };

    let (tx, requests) = request_channel();
    let (ctx_tx, ctx_rx) = watch::channel(ready_context());
    let responses = paginate(polkadot(), requests, ctx_rx, fetch);
    pin_mut!(responses);

    // Act - first request under the initial context
    tx.send(PaginationRequest::NextPage)?;
    unwrap_stream(&mut responses, 500).await;

    // Act - a filter gets excluded, then a second request arrives
    let mut updated = ready_context();
    updated.excluded_filters.insert("SPAM".to_owned());
    ctx_tx.send(updated)?;
    tx.send(PaginationRequest::NextPage)?;
    unwrap_stream(&mut responses, 500).await;

    // Assert - the change applied to the second request only
    let seen = seen.lock().unwrap();
    assert!(seen[0].is_empty());
    assert!(seen[1].contains("SPAM"));

    Ok(())
}

#[tokio::test]
async fn test_paginate_selected_waits_for_resolved_target() -> anyhow::Result<()> {
    // Arrange
    let nft = Arc::new(MockNftRepository::new());
    nft.script_collection_tokens(Scripted::Reply(Ok(PaginationEvent::PageIsLoaded {
        data: tokens_page(&[("0xAAA", "1")]),
    })));

    let (tx, requests) = request_channel();
    let (target_tx, target_rx) = watch::channel(None::<SelectedTarget>);
    let responses = paginate_selected(requests, target_rx, collection_fetch(Arc::clone(&nft)));
    pin_mut!(responses);

    // Act - request before any selection resolved
    tx.send(PaginationRequest::NextPage)?;
    assert_no_element_emitted(&mut responses, 100).await;

    // Act - the selection resolves
    target_tx.send(Some(Ok((polkadot(), "0xAAA".to_owned()))))?;

    // Assert
    let response = unwrap_stream(&mut responses, 500).await;
    assert_eq!(response.chain, polkadot());
    assert!(response.result.is_ok());
    assert_eq!(
        nft.recorded_calls(),
        vec!["collection_tokens_page:polkadot:0xAAA".to_owned()]
    );

    Ok(())
}

#[tokio::test]
async fn test_paginate_selected_switches_target_for_subsequent_requests() -> anyhow::Result<()> {
    // Arrange
    let nft = Arc::new(MockNftRepository::new());
    nft.script_collection_tokens(Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)));
    nft.script_collection_tokens(Scripted::Reply(Ok(PaginationEvent::AllNextPagesLoaded)));

    let (tx, requests) = request_channel();
    let (target_tx, target_rx) =
        watch::channel::<Option<SelectedTarget>>(Some(Ok((polkadot(), "0xAAA".to_owned()))));
    let responses = paginate_selected(requests, target_rx, collection_fetch(Arc::clone(&nft)));
    pin_mut!(responses);

    // Act - one request per target
    tx.send(PaginationRequest::NextPage)?;
    unwrap_stream(&mut responses, 500).await;

    target_tx.send(Some(Ok((polkadot(), "0xBBB".to_owned()))))?;
    tx.send(PaginationRequest::NextPage)?;
    unwrap_stream(&mut responses, 500).await;

    // Assert - the contract switch applied to the second request only
    assert_eq!(
        nft.recorded_calls(),
        vec![
            "collection_tokens_page:polkadot:0xAAA".to_owned(),
            "collection_tokens_page:polkadot:0xBBB".to_owned(),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_paginate_selected_surfaces_unresolved_selection_as_error() -> anyhow::Result<()> {
    // Arrange - the selection never matched a registry chain
    let nft = Arc::new(MockNftRepository::new());
    let ghost = ChainId::from("ghost");
    let (tx, requests) = request_channel();
    let (_target_tx, target_rx) = watch::channel::<Option<SelectedTarget>>(Some(Err((
        ghost.clone(),
        NftError::UnknownChain {
            chain_id: ghost.clone(),
        },
    ))));

    let responses = paginate_selected(requests, target_rx, collection_fetch(Arc::clone(&nft)));
    pin_mut!(responses);

    // Act
    tx.send(PaginationRequest::NextPage)?;

    // Assert - an error response tagged with the requested chain, no remote call
    let response = unwrap_stream(&mut responses, 500).await;
    assert_eq!(response.chain.id, ghost);
    assert_eq!(
        response.result,
        Err(NftError::UnknownChain { chain_id: ghost })
    );
    assert!(nft.recorded_calls().is_empty());

    Ok(())
}
