// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use nftflow_core::PaginationRequest;
use nftflow_stream::SharedRequests;
use nftflow_test_utils::{assert_no_element_emitted, unwrap_stream};

#[tokio::test]
async fn test_shared_requests_reach_every_subscriber() {
    // Arrange
    let shared = SharedRequests::new();
    let mut first = shared.subscribe();
    let mut second = shared.subscribe();
    assert_eq!(shared.subscriber_count(), 2);

    // Act
    shared.send(PaginationRequest::NextPage);

    // Assert - both subscribers see the request
    assert_eq!(
        unwrap_stream(&mut first, 500).await,
        PaginationRequest::NextPage
    );
    assert_eq!(
        unwrap_stream(&mut second, 500).await,
        PaginationRequest::NextPage
    );
}

#[tokio::test]
async fn test_shared_requests_late_subscriber_misses_earlier_requests() {
    // Arrange
    let shared = SharedRequests::new();
    let mut early = shared.subscribe();

    // Act - one request before the second subscription, one after
    shared.send(PaginationRequest::Refresh);
    let mut late = shared.subscribe();
    shared.send(PaginationRequest::NextPage);

    // Assert - the early subscriber sees both, the late one only the second
    assert_eq!(
        unwrap_stream(&mut early, 500).await,
        PaginationRequest::Refresh
    );
    assert_eq!(
        unwrap_stream(&mut early, 500).await,
        PaginationRequest::NextPage
    );
    assert_eq!(
        unwrap_stream(&mut late, 500).await,
        PaginationRequest::NextPage
    );
    assert_no_element_emitted(&mut late, 100).await;
}

#[tokio::test]
async fn test_shared_requests_send_without_subscribers_is_harmless() {
    // Arrange
    let shared = SharedRequests::new();
    assert_eq!(shared.subscriber_count(), 0);

    // Act - dropped silently, no panic
    shared.send(PaginationRequest::NextPage);

    // Assert - a subscriber created afterwards starts clean
    let mut subscriber = shared.subscribe();
    assert_no_element_emitted(&mut subscriber, 100).await;
}

#[tokio::test]
async fn test_shared_requests_lagged_subscriber_resumes_at_latest() {
    // Arrange - capacity 1 so a second unconsumed request overwrites the first
    let shared = SharedRequests::with_capacity(1);
    let mut slow = shared.subscribe();

    // Act
    shared.send(PaginationRequest::Refresh);
    shared.send(PaginationRequest::NextPage);

    // Assert - the overwritten request is skipped, not replayed
    assert_eq!(
        unwrap_stream(&mut slow, 500).await,
        PaginationRequest::NextPage
    );
    assert_no_element_emitted(&mut slow, 100).await;
}
