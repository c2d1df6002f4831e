// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background task handle with cooperative cancellation.

use tokio_util::sync::CancellationToken;

/// A spawned pipeline worker that is cancelled when the handle drops.
///
/// The spawned closure receives a [`CancellationToken`] it must monitor;
/// dropping the `PipelineTask` (or calling [`cancel`](Self::cancel)) signals
/// the token so the worker can stop emitting and exit. Workers abandoned
/// mid-fetch must not emit after cancellation.
///
/// # Example
///
/// ```rust
/// use nftflow_core::PipelineTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = PipelineTask::spawn(|cancel| async move {
///     loop {
///         if cancel.is_cancelled() {
///             break;
///         }
///         // Fetch and forward...
///         # break;
///     }
/// });
///
/// drop(task); // worker observes cancellation and exits
/// # }
/// ```
#[derive(Debug)]
pub struct PipelineTask {
    cancel: CancellationToken,
}

impl PipelineTask {
    /// Spawn a worker under a fresh cancellation token.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Spawn a worker under a child of `parent`, so cancelling the parent
    /// also cancels this worker.
    pub fn spawn_child<F, Fut>(parent: &CancellationToken, f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel = parent.child_token();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Request cancellation without waiting for the worker to exit.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PipelineTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
