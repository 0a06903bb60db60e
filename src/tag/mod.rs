// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! External tag-serving client surface.
//!
//! The adapter never implements tag serving itself. It drives a `TagClient`
//! through a `WorkQueue`, reproducing the positional argument order the
//! external API expects.

mod client;
mod definition;
mod recording;

pub use client::{EventCallback, TagClient};
pub use definition::TagDefinition;
pub use recording::{RecordingTagClient, TagCall};
