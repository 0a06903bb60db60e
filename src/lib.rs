// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! OpenAds AST adapter
//!
//! Sits between application code and a queue-driven ad tag-serving client.
//! Bursts of `loadTags` and `refresh` calls are coalesced into one external
//! call per batch window; everything else is forwarded unchanged.
//!
//! # Batching
//!
//! - The first batchable call of a kind opens a window and arms a timer.
//! - Calls inside the window merge into it (`refresh` targets are
//!   concatenated in call order, duplicates kept).
//! - When the timer fires, exactly one unit of work is pushed onto the
//!   client's work queue and the window closes.
//!
//! ```no_run
//! use std::sync::Arc;
//! use openads_ast::{AstClient, DispatcherConfig, InlineQueue, RecordingTagClient};
//!
//! # async fn demo() -> Result<(), openads_ast::AdapterError> {
//! let tags = Arc::new(RecordingTagClient::new());
//! let adapter = AstClient::new(tags.clone(), Arc::new(InlineQueue::new()), DispatcherConfig::default())?;
//! adapter.refresh(["top"]).refresh(["side", "footer"]).load_tags();
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod queue;
pub mod scheduler;
pub mod tag;
pub mod telemetry;

pub use client::{AstClient, DebugModeParams, OnEventParams, ShowTagParams};
pub use error::{AdapterError, QueueError};
pub use queue::{spawn_serial_queue, InlineQueue, SerialQueueConfig, SerialWorkQueue, Work, WorkQueue};
pub use scheduler::{BatchKind, BatchingDispatcher, DispatcherConfig, DispatcherStats};
pub use tag::{EventCallback, RecordingTagClient, TagCall, TagClient, TagDefinition};
