// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-memory tag client that records every call it receives.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use super::client::{EventCallback, TagClient};
use super::definition::TagDefinition;

/// One call observed by the recording client, with positional arguments
/// captured in the order the external API receives them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum TagCall {
    OnEvent { event: String, target_id: String },
    DefineTag { tag: TagDefinition },
    LoadTags,
    ShowTag { target_id: String },
    Refresh { target_ids: Vec<String> },
}

/// Tag client used by the demo binary and the test-suite.
#[derive(Default)]
pub struct RecordingTagClient {
    debug: AtomicBool,
    calls: Mutex<Vec<TagCall>>,
    listeners: Mutex<HashMap<(String, String), Vec<EventCallback>>>,
}

impl RecordingTagClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the debug flag.
    pub fn debug(&self) -> bool {
        self.debug.load(Ordering::Acquire)
    }

    /// Snapshot of recorded calls, oldest first.
    pub fn calls(&self) -> Vec<TagCall> {
        self.calls.lock().clone()
    }

    /// Arguments of every `refresh` call received, oldest first.
    pub fn refresh_calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                TagCall::Refresh { target_ids } => Some(target_ids.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `loadTags` calls received.
    pub fn load_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, TagCall::LoadTags))
            .count()
    }

    /// Fire every callback registered for `(event, target_id)`.
    /// Returns how many callbacks ran.
    pub fn emit(&self, event: &str, target_id: &str, payload: &serde_json::Value) -> usize {
        // Clone out so callbacks may re-enter the client.
        let callbacks = self
            .listeners
            .lock()
            .get(&(event.to_string(), target_id.to_string()))
            .cloned()
            .unwrap_or_default();
        for cb in &callbacks {
            cb(payload);
        }
        callbacks.len()
    }

    fn record(&self, call: TagCall) {
        self.calls.lock().push(call);
    }
}

impl TagClient for RecordingTagClient {
    fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Release);
    }

    fn on_event(&self, event: &str, target_id: &str, callback: EventCallback) {
        self.listeners
            .lock()
            .entry((event.to_string(), target_id.to_string()))
            .or_default()
            .push(callback);
        self.record(TagCall::OnEvent {
            event: event.to_string(),
            target_id: target_id.to_string(),
        });
    }

    fn define_tag(&self, tag: &TagDefinition) {
        self.record(TagCall::DefineTag { tag: tag.clone() });
    }

    fn load_tags(&self) {
        self.record(TagCall::LoadTags);
    }

    fn show_tag(&self, target_id: &str) {
        self.record(TagCall::ShowTag { target_id: target_id.to_string() });
    }

    fn refresh(&self, target_ids: &[String]) {
        self.record(TagCall::Refresh { target_ids: target_ids.to_vec() });
    }
}
