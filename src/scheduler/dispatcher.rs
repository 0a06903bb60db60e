// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Batching dispatcher: coalesces bursts of batchable calls into one
//! external invocation per window.
//!
//! The first call of a kind opens a window and arms a one-shot timer.
//! Later calls merge into the open window without touching the timer, so a
//! window always closes `delay` after its *first* call. When the timer fires
//! the batch is taken out of the pending map and exactly one unit of work is
//! submitted to the work queue. Calls arriving after that point open a new
//! window, even if the submitted work has not run yet.
//!
//! Closed windows go through an outbox drained by one flusher at a time, so
//! work reaches the queue in the order windows closed even when timers fire
//! on different worker threads. No lock is held while the queue runs.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::pending::{BatchKind, PendingBatch};
use crate::error::AdapterError;
use crate::queue::{Work, WorkQueue};
use crate::tag::TagClient;
use crate::telemetry;

/// Default batch window length.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(10);

/// Configuration for the batching dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Time between the first call of a burst and its flush.
    pub delay: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { delay: DEFAULT_BATCH_DELAY }
    }
}

/// Counters for dispatcher activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatcherStats {
    pub windows_opened: u64,
    pub calls_merged: u64,
    pub flushes: u64,
}

#[derive(Default)]
struct StatCounters {
    windows_opened: AtomicU64,
    calls_merged: AtomicU64,
    flushes: AtomicU64,
}

#[derive(Default)]
struct BatchState {
    open: HashMap<BatchKind, PendingBatch>,
    // Closed windows awaiting submission, in close order.
    outbox: VecDeque<Work>,
    draining: bool,
}

/// State shared with armed timers. Timers keep it alive, so a window armed
/// before the dispatcher is dropped still flushes.
struct Shared {
    state: Mutex<BatchState>,
    client: Arc<dyn TagClient>,
    queue: Arc<dyn WorkQueue>,
    next_window: AtomicU64,
    stats: StatCounters,
}

/// Debounces batchable tag-client calls.
pub struct BatchingDispatcher {
    shared: Arc<Shared>,
    delay: Duration,
    runtime: Handle,
}

impl BatchingDispatcher {
    /// Create a dispatcher scheduling its timers on the current tokio runtime.
    pub fn new(
        client: Arc<dyn TagClient>,
        queue: Arc<dyn WorkQueue>,
        config: DispatcherConfig,
    ) -> Result<Self, AdapterError> {
        let runtime = Handle::try_current().map_err(|_| AdapterError::NoRuntime)?;
        Ok(Self::with_handle(client, queue, config, runtime))
    }

    /// Create a dispatcher scheduling its timers on `runtime`.
    pub fn with_handle(
        client: Arc<dyn TagClient>,
        queue: Arc<dyn WorkQueue>,
        config: DispatcherConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(BatchState::default()),
                client,
                queue,
                next_window: AtomicU64::new(1),
                stats: StatCounters::default(),
            }),
            delay: config.delay,
            runtime,
        }
    }

    /// Debounced `loadTags()`.
    pub fn load_tags(&self) -> &Self {
        self.enqueue(BatchKind::RefreshAll, Vec::new());
        self
    }

    /// Debounced `refresh(targetIds)`. Targets accumulate in call order.
    pub fn refresh<I, S>(&self, target_ids: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets = target_ids.into_iter().map(Into::into).collect();
        self.enqueue(BatchKind::RefreshNamed, targets);
        self
    }

    /// Window length.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a window is currently open for `kind`.
    pub fn is_pending(&self, kind: BatchKind) -> bool {
        self.shared.state.lock().open.contains_key(&kind)
    }

    /// Targets accumulated so far in the open window for `kind`.
    pub fn pending_targets(&self, kind: BatchKind) -> Option<Vec<String>> {
        self.shared
            .state
            .lock()
            .open
            .get(&kind)
            .map(|batch| batch.targets().to_vec())
    }

    pub fn stats(&self) -> DispatcherStats {
        let s = &self.shared.stats;
        DispatcherStats {
            windows_opened: s.windows_opened.load(Ordering::Acquire),
            calls_merged: s.calls_merged.load(Ordering::Acquire),
            flushes: s.flushes.load(Ordering::Acquire),
        }
    }

    fn enqueue(&self, kind: BatchKind, targets: Vec<String>) {
        // Create-or-merge happens under one lock acquisition.
        let mut state = self.shared.state.lock();
        match state.open.entry(kind) {
            Entry::Occupied(mut entry) => {
                let batch = entry.get_mut();
                batch.merge(targets);
                self.shared.stats.calls_merged.fetch_add(1, Ordering::AcqRel);
                telemetry::record_merge(kind);
                tracing::trace!(
                    kind = kind.as_str(),
                    window = batch.window(),
                    calls = batch.calls(),
                    targets = batch.targets().len(),
                    "merged into open window"
                );
            }
            Entry::Vacant(entry) => {
                let window = self.shared.next_window.fetch_add(1, Ordering::AcqRel);
                let mut batch = PendingBatch::open(kind, window, targets);
                batch.arm(self.arm(kind, window));
                entry.insert(batch);
                self.shared.stats.windows_opened.fetch_add(1, Ordering::AcqRel);
                telemetry::record_window_opened(kind);
                tracing::debug!(
                    kind = kind.as_str(),
                    window,
                    delay_ms = self.delay.as_millis() as u64,
                    "opened batch window"
                );
            }
        }
    }

    fn arm(&self, kind: BatchKind, window: u64) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.flush(kind, window);
        })
    }
}

impl std::fmt::Debug for BatchingDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchingDispatcher")
            .field("delay", &self.delay)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Shared {
    fn flush(&self, kind: BatchKind, window: u64) {
        let closed = {
            let mut state = self.state.lock();
            let current = state.open.get(&kind).map_or(false, |open| open.window() == window);
            let batch = if current { state.open.remove(&kind) } else { None };
            batch.map(|batch| {
                let closed = batch.close();
                let summary = (closed.window, closed.calls, closed.targets.len(), closed.open_for_ms);
                // Queued under the same lock that closed the window.
                state.outbox.push_back(closed.into_work(Arc::clone(&self.client)));
                summary
            })
        };
        let Some((window, calls, targets, open_for_ms)) = closed else {
            tracing::warn!(
                kind = kind.as_str(),
                window,
                "timer fired for a window that is not open"
            );
            return;
        };

        self.stats.flushes.fetch_add(1, Ordering::AcqRel);
        telemetry::record_flush(kind, targets);
        tracing::debug!(
            kind = kind.as_str(),
            window,
            calls,
            targets,
            open_for_ms,
            "flushing batch window"
        );
        self.drain();
    }

    /// Submit queued flushes in order. Returns at once if another thread is
    /// already draining; that thread picks up anything queued meanwhile.
    fn drain(&self) {
        {
            let mut state = self.state.lock();
            if state.draining {
                return;
            }
            state.draining = true;
        }
        let mut guard = DrainGuard { state: &self.state, finished: false };
        loop {
            let next = {
                let mut state = guard.state.lock();
                match state.outbox.pop_front() {
                    Some(work) => work,
                    None => {
                        state.draining = false;
                        guard.finished = true;
                        return;
                    }
                }
            };
            self.queue.submit(next);
        }
    }
}

/// Releases the drain flag if a submit unwinds.
struct DrainGuard<'a> {
    state: &'a Mutex<BatchState>,
    finished: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.lock().draining = false;
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
