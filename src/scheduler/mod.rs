// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Call batching for the tag client.
//!
//! Holds at most one open window per batchable operation and turns each
//! closed window into a single unit of work on the client's queue.

mod dispatcher;
mod pending;

pub use dispatcher::{BatchingDispatcher, DispatcherConfig, DispatcherStats, DEFAULT_BATCH_DELAY};
pub use pending::BatchKind;
