// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Adapter client exposed to application code.
//!
//! `load_tags` and `refresh` go through the batching dispatcher. Every other
//! method is forwarded as-is: the debug flag is written synchronously, the
//! remaining calls are pushed onto the work queue as one-off units.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::config::EnvConfig;
use crate::error::AdapterError;
use crate::queue::WorkQueue;
use crate::scheduler::{BatchingDispatcher, DispatcherConfig, DispatcherStats};
use crate::tag::{EventCallback, TagClient, TagDefinition};
use crate::telemetry;

/// Parameters for [`AstClient::debug_mode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugModeParams {
    pub enabled: bool,
}

/// Parameters for [`AstClient::on_event`].
#[derive(Clone)]
pub struct OnEventParams {
    pub target_id: String,
    pub event: String,
    pub callback: EventCallback,
}

impl std::fmt::Debug for OnEventParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnEventParams")
            .field("target_id", &self.target_id)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Parameters for [`AstClient::show_tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowTagParams {
    pub target_id: String,
}

/// Application-facing adapter over an external tag client.
///
/// Every method returns `&Self` so calls can be chained in one go.
pub struct AstClient {
    client: Arc<dyn TagClient>,
    queue: Arc<dyn WorkQueue>,
    dispatcher: BatchingDispatcher,
}

impl AstClient {
    /// Create an adapter whose batch timers run on the current tokio runtime.
    pub fn new(
        client: Arc<dyn TagClient>,
        queue: Arc<dyn WorkQueue>,
        config: DispatcherConfig,
    ) -> Result<Self, AdapterError> {
        let runtime = Handle::try_current().map_err(|_| AdapterError::NoRuntime)?;
        Ok(Self::with_handle(client, queue, config, runtime))
    }

    /// Create an adapter whose batch timers run on `runtime`.
    pub fn with_handle(
        client: Arc<dyn TagClient>,
        queue: Arc<dyn WorkQueue>,
        config: DispatcherConfig,
        runtime: Handle,
    ) -> Self {
        let dispatcher =
            BatchingDispatcher::with_handle(client.clone(), queue.clone(), config, runtime);
        Self { client, queue, dispatcher }
    }

    /// Create an adapter from loaded configuration, applying the initial
    /// debug flag.
    pub fn from_config(
        client: Arc<dyn TagClient>,
        queue: Arc<dyn WorkQueue>,
        config: &EnvConfig,
    ) -> Result<Self, AdapterError> {
        let adapter = Self::new(client, queue, config.dispatcher.clone())?;
        if config.debug {
            adapter.debug_mode(DebugModeParams { enabled: true });
        }
        Ok(adapter)
    }

    /// Set the client's debug flag. Takes effect immediately.
    pub fn debug_mode(&self, params: DebugModeParams) -> &Self {
        tracing::debug!(enabled = params.enabled, "debugMode");
        telemetry::record_passthrough("debug_mode");
        self.client.set_debug(params.enabled);
        self
    }

    /// Subscribe `callback` to `event` on `target_id`.
    ///
    /// The client receives `(event, target_id, callback)` in that order.
    pub fn on_event(&self, params: OnEventParams) -> &Self {
        tracing::debug!(event = %params.event, target_id = %params.target_id, "onEvent");
        let OnEventParams { target_id, event, callback } = params;
        self.forward("on_event", move |client| {
            client.on_event(&event, &target_id, callback)
        });
        self
    }

    /// Define a tag. The definition reaches the client unchanged.
    pub fn define_tag(&self, tag: TagDefinition) -> &Self {
        tracing::debug!(target_id = tag.target_id().unwrap_or_default(), "defineTag");
        self.forward("define_tag", move |client| client.define_tag(&tag));
        self
    }

    /// Debounced `loadTags()`.
    pub fn load_tags(&self) -> &Self {
        self.dispatcher.load_tags();
        self
    }

    /// Show the tag for `target_id`.
    pub fn show_tag(&self, params: ShowTagParams) -> &Self {
        tracing::debug!(target_id = %params.target_id, "showTag");
        let ShowTagParams { target_id } = params;
        self.forward("show_tag", move |client| client.show_tag(&target_id));
        self
    }

    /// Debounced `refresh(targetIds)`; target lists accumulate across calls
    /// in the same window.
    pub fn refresh<I, S>(&self, target_ids: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatcher.refresh(target_ids);
        self
    }

    pub fn dispatcher(&self) -> &BatchingDispatcher {
        &self.dispatcher
    }

    pub fn stats(&self) -> DispatcherStats {
        self.dispatcher.stats()
    }

    fn forward<F>(&self, method: &'static str, call: F)
    where
        F: FnOnce(&dyn TagClient) + Send + 'static,
    {
        telemetry::record_passthrough(method);
        let client = Arc::clone(&self.client);
        self.queue.submit(Box::new(move || call(client.as_ref())));
    }
}
