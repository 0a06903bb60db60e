// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-worker FIFO queue backed by a tokio channel.
//!
//! Units run one at a time in submission order. A panicking unit is logged
//! and the worker moves on to the next one.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{Work, WorkQueue};
use crate::error::QueueError;

/// Configuration for the serial queue worker.
#[derive(Debug, Clone)]
pub struct SerialQueueConfig {
    /// Run units still queued when shutdown is signalled.
    pub drain_on_shutdown: bool,
}

impl Default for SerialQueueConfig {
    fn default() -> Self {
        Self { drain_on_shutdown: true }
    }
}

/// Submitting half of the serial queue.
pub struct SerialWorkQueue {
    tx: mpsc::UnboundedSender<Work>,
    submitted: AtomicUsize,
    completed: Arc<AtomicUsize>,
}

impl SerialWorkQueue {
    /// Submit work, reporting whether the worker is still accepting it.
    pub fn try_submit(&self, work: Work) -> Result<(), QueueError> {
        self.tx.send(work).map_err(|_| QueueError::Closed)?;
        self.submitted.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Units accepted by the queue.
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::Acquire)
    }

    /// Units the worker has finished running (including ones that panicked).
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl WorkQueue for SerialWorkQueue {
    fn submit(&self, work: Work) {
        if let Err(e) = self.try_submit(work) {
            tracing::warn!(error = %e, "serial queue: dropping unit of work");
        }
    }
}

/// Spawn the worker on `handle`. Returns the queue and the worker's handle.
pub fn spawn_serial_queue(
    handle: &Handle,
    config: SerialQueueConfig,
    shutdown: CancellationToken,
) -> (Arc<SerialWorkQueue>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let completed = Arc::new(AtomicUsize::new(0));
    let queue = Arc::new(SerialWorkQueue {
        tx,
        submitted: AtomicUsize::new(0),
        completed: completed.clone(),
    });
    let worker = handle.spawn(async move {
        worker_loop(rx, completed, config, shutdown).await;
    });
    (queue, worker)
}

async fn worker_loop(
    mut rx: mpsc::UnboundedReceiver<Work>,
    completed: Arc<AtomicUsize>,
    config: SerialQueueConfig,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => {
                tracing::info!("serial queue: shutdown signal received");
                break;
            }
            work = rx.recv() => match work {
                Some(work) => run_unit(work, &completed),
                None => return,
            },
        }
    }

    rx.close();
    if config.drain_on_shutdown {
        let mut drained = 0usize;
        while let Ok(work) = rx.try_recv() {
            run_unit(work, &completed);
            drained += 1;
        }
        tracing::debug!(drained, "serial queue: drained remaining work");
    }
}

fn run_unit(work: Work, completed: &AtomicUsize) {
    if catch_unwind(AssertUnwindSafe(work)).is_err() {
        tracing::error!("serial queue: unit of work panicked");
    }
    completed.fetch_add(1, Ordering::AcqRel);
}
