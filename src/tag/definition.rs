// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tag definition object passed verbatim to `defineTag`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slot definition handed to the external client.
///
/// The object is kept as-is: member ids may be numbers or strings, `sizes`
/// may be a single `[w, h]` pair or a list of pairs, and explicit empty or
/// null fields are preserved. Accessors read the well-known keys without
/// constraining their shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagDefinition {
    fields: Map<String, Value>,
}

impl TagDefinition {
    /// Minimal definition for a single target slot.
    pub fn new(target_id: impl Into<String>) -> Self {
        let target_id: String = target_id.into();
        Self::default().with("targetId", target_id)
    }

    /// Set `key`, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn target_id(&self) -> Option<&str> {
        self.fields.get("targetId").and_then(Value::as_str)
    }

    pub fn member(&self) -> Option<&Value> {
        self.fields.get("member")
    }

    pub fn inv_code(&self) -> Option<&Value> {
        self.fields.get("invCode")
    }

    pub fn sizes(&self) -> Option<&Value> {
        self.fields.get("sizes")
    }

    pub fn keywords(&self) -> Option<&Value> {
        self.fields.get("keywords")
    }

    pub fn native(&self) -> Option<&Value> {
        self.fields.get("native")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The whole object as the client receives it.
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for TagDefinition {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<TagDefinition> for Value {
    fn from(tag: TagDefinition) -> Self {
        Value::Object(tag.fields)
    }
}
