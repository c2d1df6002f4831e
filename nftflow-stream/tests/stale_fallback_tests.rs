// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::pin_mut;
use nftflow_stream::StaleFallbackExt;
use nftflow_test_utils::{assert_stream_ended, test_channel, unwrap_stream};

/// "Real data" for these tests is any non-negative number.
static IS_REAL: fn(&i32) -> bool = |value| *value >= 0;

#[tokio::test]
async fn test_stale_fallback_passes_real_values_through() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let result = stream.with_stale_fallback(IS_REAL);
    pin_mut!(result);

    // Act
    tx.send(1).await?;
    tx.send(2).await?;

    // Assert
    assert_eq!(unwrap_stream(&mut result, 500).await, 1);
    assert_eq!(unwrap_stream(&mut result, 500).await, 2);

    Ok(())
}

#[tokio::test]
async fn test_stale_fallback_masks_degraded_value_with_baseline() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let result = stream.with_stale_fallback(IS_REAL);
    pin_mut!(result);

    // Act - a good value, then a degraded one
    tx.send(42).await?;
    tx.send(-1).await?;

    // Assert - the degraded emission is replaced by the cached baseline
    assert_eq!(unwrap_stream(&mut result, 500).await, 42);
    assert_eq!(unwrap_stream(&mut result, 500).await, 42);

    Ok(())
}

#[tokio::test]
async fn test_stale_fallback_passes_degraded_value_without_baseline() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let result = stream.with_stale_fallback(IS_REAL);
    pin_mut!(result);

    // Act - the very first value is already degraded
    tx.send(-7).await?;

    // Assert - nothing to fall back on, the value passes untouched
    assert_eq!(unwrap_stream(&mut result, 500).await, -7);

    Ok(())
}

#[tokio::test]
async fn test_stale_fallback_updates_baseline_on_later_real_value() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let result = stream.with_stale_fallback(IS_REAL);
    pin_mut!(result);

    // Act - good, degraded, better, degraded again
    tx.send(1).await?;
    tx.send(-1).await?;
    tx.send(2).await?;
    tx.send(-2).await?;

    // Assert - the second degraded value is masked by the newer baseline
    assert_eq!(unwrap_stream(&mut result, 500).await, 1);
    assert_eq!(unwrap_stream(&mut result, 500).await, 1);
    assert_eq!(unwrap_stream(&mut result, 500).await, 2);
    assert_eq!(unwrap_stream(&mut result, 500).await, 2);

    Ok(())
}

#[tokio::test]
async fn test_stale_fallback_ends_with_source() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let result = stream.with_stale_fallback(IS_REAL);
    pin_mut!(result);

    // Act
    tx.send(5).await?;
    drop(tx);

    // Assert
    assert_eq!(unwrap_stream(&mut result, 500).await, 5);
    assert_stream_ended(&mut result, 500).await;

    Ok(())
}
