// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Queue that runs each unit of work as soon as it is submitted.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Work, WorkQueue};

/// Runs work on the submitting thread and counts submissions.
#[derive(Debug, Default)]
pub struct InlineQueue {
    submitted: AtomicUsize,
}

impl InlineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total units of work submitted so far.
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::Acquire)
    }
}

impl WorkQueue for InlineQueue {
    fn submit(&self, work: Work) {
        self.submitted.fetch_add(1, Ordering::AcqRel);
        work();
    }
}
