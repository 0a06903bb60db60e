// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Telemetry for the adapter.
//!
//! Structured logging via `tracing` and counters via the `metrics` facade.
//! The library never installs a metrics exporter.

mod logging;
mod metrics;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use metrics::{record_flush, record_merge, record_passthrough, record_window_opened};
