// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Dynamic fan-out aggregation: one paginator per eligible chain, one
//! consolidated batch per request.
//!
//! The aggregator maintains a worker task per currently-eligible chain, each
//! running [`paginate`] over its own request channel. Every incoming request
//! is dispatched to all live workers concurrently; the batch is the join of
//! all their tagged results, emitted once every still-live worker has
//! answered. Chain-set changes apply immediately: a new chain starts a
//! worker, a removed chain's worker is cancelled and its in-flight fetch is
//! abandoned without contributing a partial result.
//!
//! Fan-out is unbounded (one task per eligible chain): chain counts are tens
//! at most and every task is I/O-bound.

use crate::paginator::paginate;
use futures::{pin_mut, Stream, StreamExt};
use nftflow_core::{
    Chain, FetchContext, NftError, PagedResponse, PaginationEvent, PaginationRequest, PipelineTask,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The aggregated output stream. Dropping it cancels the driver and every
/// per-chain worker it spawned.
#[derive(Debug)]
pub struct FanOut<P> {
    batches: UnboundedReceiverStream<Vec<PagedResponse<P>>>,
    _driver: PipelineTask,
}

impl<P> Stream for FanOut<P> {
    type Item = Vec<PagedResponse<P>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.batches).poll_next(cx)
    }
}

/// Runs one paginator per eligible chain and joins each request's results
/// into one consolidated emission.
///
/// `chain_sets` is the dynamic set of eligible chains; `requests` triggers
/// one fetch per live chain each time it emits. With no eligible chains a
/// request yields an empty batch. Arrival order of per-chain results within
/// a batch is irrelevant; the emitted batch preserves chain-set order.
pub fn fan_out<P, C, R, F, Fut>(
    chain_sets: C,
    requests: R,
    context: watch::Receiver<FetchContext>,
    fetch: F,
) -> FanOut<P>
where
    P: Send + 'static,
    C: Stream<Item = Vec<Chain>> + Send + 'static,
    R: Stream<Item = PaginationRequest> + Send + 'static,
    F: Fn(FetchContext, Chain, PaginationRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<PaginationEvent<P>, NftError>> + Send + 'static,
{
    let (batch_tx, batch_rx) = mpsc::unbounded_channel();
    let driver = PipelineTask::spawn(move |cancel| {
        drive(chain_sets, requests, context, fetch, batch_tx, cancel)
    });

    FanOut {
        batches: UnboundedReceiverStream::new(batch_rx),
        _driver: driver,
    }
}

struct Worker {
    chain: Chain,
    generation: u64,
    request_tx: mpsc::UnboundedSender<PaginationRequest>,
    _task: PipelineTask,
}

enum SlotState<P> {
    Waiting,
    Done(PagedResponse<P>),
    Abandoned,
}

struct Slot<P> {
    generation: u64,
    state: SlotState<P>,
}

/// One request's outstanding join: a slot per worker the request was
/// dispatched to, identified by worker generation so a late response from a
/// cancelled worker can never fill a slot.
struct PendingBatch<P> {
    slots: Vec<Slot<P>>,
}

impl<P> PendingBatch<P> {
    fn complete(&mut self) -> bool {
        self.slots
            .iter()
            .all(|slot| !matches!(slot.state, SlotState::Waiting))
    }

    fn fill(&mut self, generation: u64, response: PagedResponse<P>) -> bool {
        match self
            .slots
            .iter_mut()
            .find(|slot| slot.generation == generation && matches!(slot.state, SlotState::Waiting))
        {
            Some(slot) => {
                slot.state = SlotState::Done(response);
                true
            }
            None => false,
        }
    }

    /// Mark slots whose worker is no longer live as abandoned, so the join
    /// does not stall on a cancelled chain.
    fn abandon_missing(&mut self, workers: &[Worker]) {
        for slot in &mut self.slots {
            let live = workers
                .iter()
                .any(|worker| worker.generation == slot.generation);
            if !live && matches!(slot.state, SlotState::Waiting) {
                slot.state = SlotState::Abandoned;
            }
        }
    }

    fn into_batch(self) -> Vec<PagedResponse<P>> {
        self.slots
            .into_iter()
            .filter_map(|slot| match slot.state {
                SlotState::Done(response) => Some(response),
                _ => None,
            })
            .collect()
    }
}

async fn drive<P, C, R, F, Fut>(
    chain_sets: C,
    requests: R,
    context: watch::Receiver<FetchContext>,
    fetch: F,
    batch_tx: mpsc::UnboundedSender<Vec<PagedResponse<P>>>,
    cancel: CancellationToken,
) where
    P: Send + 'static,
    C: Stream<Item = Vec<Chain>> + Send + 'static,
    R: Stream<Item = PaginationRequest> + Send + 'static,
    F: Fn(FetchContext, Chain, PaginationRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<PaginationEvent<P>, NftError>> + Send + 'static,
{
    pin_mut!(chain_sets);
    pin_mut!(requests);

    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<(u64, PagedResponse<P>)>();
    let mut workers: Vec<Worker> = Vec::new();
    let mut next_generation: u64 = 0;
    let mut pending: Option<PendingBatch<P>> = None;
    let mut chains_done = false;
    let mut requests_done = false;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,

            maybe_chains = chain_sets.next(), if !chains_done => {
                match maybe_chains {
                    Some(chains) => {
                        sync_workers(
                            &mut workers,
                            chains,
                            &mut next_generation,
                            &cancel,
                            &context,
                            &fetch,
                            &result_tx,
                        );
                        if let Some(batch) = &mut pending {
                            batch.abandon_missing(&workers);
                        }
                    }
                    None => chains_done = true,
                }
            }

            maybe_request = requests.next(), if !requests_done && pending.is_none() => {
                match maybe_request {
                    Some(request) => {
                        debug!(?request, chains = workers.len(), "fanning out page request");
                        let mut slots = Vec::with_capacity(workers.len());
                        for worker in &workers {
                            if worker.request_tx.send(request).is_ok() {
                                slots.push(Slot {
                                    generation: worker.generation,
                                    state: SlotState::Waiting,
                                });
                            }
                        }
                        if slots.is_empty() {
                            if batch_tx.send(Vec::new()).is_err() {
                                break;
                            }
                        } else {
                            pending = Some(PendingBatch { slots });
                        }
                    }
                    None => requests_done = true,
                }
            }

            maybe_result = result_rx.recv() => {
                match maybe_result {
                    Some((generation, response)) => {
                        match &mut pending {
                            Some(batch) => {
                                if !batch.fill(generation, response) {
                                    debug!(generation, "dropping response from cancelled worker");
                                }
                            }
                            None => {
                                debug!(generation, "dropping response from cancelled worker");
                            }
                        }
                    }
                    // Unreachable while the driver holds result_tx.
                    None => break,
                }
            }
        }

        if let Some(batch) = pending.take_if(PendingBatch::complete) {
            if batch_tx.send(batch.into_batch()).is_err() {
                break;
            }
        }

        if requests_done && pending.is_none() {
            break;
        }
    }
}

/// Reconcile the worker set with the latest eligible chains: keep workers
/// for chains still present, spawn for new ones, cancel the rest.
fn sync_workers<P, F, Fut>(
    workers: &mut Vec<Worker>,
    chains: Vec<Chain>,
    next_generation: &mut u64,
    parent: &CancellationToken,
    context: &watch::Receiver<FetchContext>,
    fetch: &F,
    result_tx: &mpsc::UnboundedSender<(u64, PagedResponse<P>)>,
) where
    P: Send + 'static,
    F: Fn(FetchContext, Chain, PaginationRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<PaginationEvent<P>, NftError>> + Send + 'static,
{
    let mut kept = Vec::with_capacity(chains.len());

    for chain in chains {
        match workers.iter().position(|worker| worker.chain.id == chain.id) {
            Some(position) => kept.push(workers.remove(position)),
            None => {
                debug!(chain = %chain.id, "starting paginator for added chain");
                let generation = *next_generation;
                *next_generation += 1;
                kept.push(spawn_worker(
                    chain,
                    generation,
                    parent,
                    context.clone(),
                    fetch.clone(),
                    result_tx.clone(),
                ));
            }
        }
    }

    for removed in workers.drain(..) {
        debug!(chain = %removed.chain.id, "cancelling paginator for removed chain");
        // Dropping the worker cancels its task; the token is a child of the
        // driver's, so dropping the whole FanOut has the same effect.
    }

    *workers = kept;
}

fn spawn_worker<P, F, Fut>(
    chain: Chain,
    generation: u64,
    parent: &CancellationToken,
    context: watch::Receiver<FetchContext>,
    fetch: F,
    result_tx: mpsc::UnboundedSender<(u64, PagedResponse<P>)>,
) -> Worker
where
    P: Send + 'static,
    F: Fn(FetchContext, Chain, PaginationRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PaginationEvent<P>, NftError>> + Send + 'static,
{
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let worker_chain = chain.clone();

    let task = PipelineTask::spawn_child(parent, move |cancel| async move {
        let requests = UnboundedReceiverStream::new(request_rx);
        let responses = paginate(worker_chain, requests, context, fetch);
        pin_mut!(responses);

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                maybe_response = responses.next() => {
                    match maybe_response {
                        Some(response) => {
                            if result_tx.send((generation, response)).is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }
    });

    Worker {
        chain,
        generation,
        request_tx,
        _task: task,
    }
}
