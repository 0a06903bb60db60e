// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-kind pending batch state.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;

use crate::queue::Work;
use crate::tag::TagClient;

/// Batchable operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// `loadTags()`: no arguments, pure debounce.
    RefreshAll,
    /// `refresh(targetIds)`: target lists are concatenated across calls.
    RefreshNamed,
}

impl BatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RefreshAll => "refresh_all",
            Self::RefreshNamed => "refresh_named",
        }
    }
}

/// An open batch window. At most one exists per kind.
#[derive(Debug)]
pub(crate) struct PendingBatch {
    kind: BatchKind,
    window: u64,
    targets: Vec<String>,
    calls: usize,
    opened_at: Instant,
    // Never aborted: an armed window always flushes.
    timer: Option<JoinHandle<()>>,
}

impl PendingBatch {
    pub(crate) fn open(kind: BatchKind, window: u64, targets: Vec<String>) -> Self {
        let mut batch = Self {
            kind,
            window,
            targets: Vec::new(),
            calls: 0,
            opened_at: Instant::now(),
            timer: None,
        };
        batch.merge(targets);
        batch
    }

    pub(crate) fn arm(&mut self, timer: JoinHandle<()>) {
        self.timer = Some(timer);
    }

    /// Append targets in call order. Duplicates are kept.
    pub(crate) fn merge(&mut self, targets: Vec<String>) {
        if self.kind == BatchKind::RefreshNamed {
            self.targets.extend(targets);
        }
        self.calls += 1;
    }

    pub(crate) fn window(&self) -> u64 {
        self.window
    }

    pub(crate) fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Calls folded into this window so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls
    }

    #[cfg(test)]
    pub(crate) fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub(crate) fn close(self) -> ClosedBatch {
        ClosedBatch {
            kind: self.kind,
            window: self.window,
            targets: self.targets,
            calls: self.calls,
            open_for_ms: self.opened_at.elapsed().as_millis() as u64,
        }
    }
}

/// A batch taken out of the pending map, ready to become one unit of work.
#[derive(Debug)]
pub(crate) struct ClosedBatch {
    pub kind: BatchKind,
    pub window: u64,
    pub targets: Vec<String>,
    pub calls: usize,
    pub open_for_ms: u64,
}

impl ClosedBatch {
    /// The single external call this window produces.
    pub fn into_work(self, client: Arc<dyn TagClient>) -> Work {
        match self.kind {
            BatchKind::RefreshAll => Box::new(move || client.load_tags()),
            BatchKind::RefreshNamed => {
                let targets = self.targets;
                Box::new(move || client.refresh(&targets))
            }
        }
    }
}
