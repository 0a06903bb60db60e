// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Metric recording through the `metrics` facade.

use crate::scheduler::BatchKind;

pub fn record_window_opened(kind: BatchKind) {
    metrics::counter!("openads_ast_windows_opened_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_merge(kind: BatchKind) {
    metrics::counter!("openads_ast_calls_merged_total", "kind" => kind.as_str()).increment(1);
}

/// Record one flushed window and how many targets it carried.
pub fn record_flush(kind: BatchKind, targets: usize) {
    metrics::counter!("openads_ast_flushes_total", "kind" => kind.as_str()).increment(1);
    metrics::histogram!("openads_ast_flush_targets", "kind" => kind.as_str())
        .record(targets as f64);
}

pub fn record_passthrough(method: &'static str) {
    metrics::counter!("openads_ast_passthrough_total", "method" => method).increment(1);
}
