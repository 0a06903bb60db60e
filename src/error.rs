// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Adapter error types.
//!
//! The batching path itself has no error surface: failures raised by the
//! external tag client belong to whoever runs its work queue.

use thiserror::Error;

/// Errors that can occur while constructing or driving the adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("No tokio runtime available to schedule batch timers")]
    NoRuntime,
}

/// Errors reported by the serial work queue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Work queue is closed")]
    Closed,
}
