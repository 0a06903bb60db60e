// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Collaborator trait for the external tag-serving client.

use std::sync::Arc;

use super::definition::TagDefinition;

/// Callback registered for a tag event. Receives the event payload verbatim.
pub type EventCallback = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Calls consumed from the external tag-serving client.
///
/// Argument order mirrors the external API and is part of the contract.
/// Implementations own their own failure handling.
pub trait TagClient: Send + Sync + 'static {
    /// Mutable debug flag. Written synchronously, never through the queue.
    fn set_debug(&self, enabled: bool);

    /// `onEvent(event, targetId, callback)`.
    fn on_event(&self, event: &str, target_id: &str, callback: EventCallback);

    /// `defineTag(tagConfig)`.
    fn define_tag(&self, tag: &TagDefinition);

    /// `loadTags()`.
    fn load_tags(&self);

    /// `showTag(targetId)`.
    fn show_tag(&self, target_id: &str);

    /// `refresh(targetIdList)`.
    fn refresh(&self, target_ids: &[String]);
}
