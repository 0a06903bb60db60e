// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Work queues that run units of work against the tag client.
//!
//! The external client owns a serial queue; the adapter only ever pushes
//! zero-argument units onto it.

mod inline;
mod serial;

pub use inline::InlineQueue;
pub use serial::{spawn_serial_queue, SerialQueueConfig, SerialWorkQueue};

/// A zero-argument unit of work to run later.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Deferred-execution primitive exposed by the tag client.
///
/// `submit` guarantees the work runs, but not synchronously.
pub trait WorkQueue: Send + Sync + 'static {
    fn submit(&self, work: Work);
}
