// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Adapter configuration loading from environment variables.
//!
//! All configuration values are loaded from `OPENADS_AST_*` environment
//! variables with sensible defaults. Invalid values fall back to defaults
//! without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `OPENADS_AST_DEBOUNCE_MS` | 10 | Batch window length (ms), max 1000 |
//! | `OPENADS_AST_DEBUG` | false | Initial tag client debug flag |
//! | `OPENADS_AST_LOG_LEVEL` | info | Log filter directive |
//! | `OPENADS_AST_LOG_FORMAT` | json | `json` or `pretty` |
//! | `OPENADS_AST_DRAIN_ON_SHUTDOWN` | true | Run queued work on shutdown |

use std::time::Duration;

use serde::Serialize;

use crate::queue::SerialQueueConfig;
use crate::scheduler::{DispatcherConfig, DEFAULT_BATCH_DELAY};
use crate::telemetry::{LogConfig, LogFormat};

/// Upper bound for the batch window.
const MAX_DEBOUNCE_MS: u64 = 1000;

/// Effective configuration summary (serializable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub debounce_ms: u64,
    pub debug: bool,
    pub log_level: String,
    pub log_format: String,
    pub drain_on_shutdown: bool,
}

/// All adapter configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub dispatcher: DispatcherConfig,
    pub debug: bool,
    pub log: LogConfig,
    pub serial_queue: SerialQueueConfig,
}

/// Parse a `u64` env var, returning `default` on missing or invalid.
fn parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Parse a boolean env var. Accepts `1/0`, `true/false`, `yes/no`, `on/off`.
fn parse_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

fn load_dispatcher_config() -> DispatcherConfig {
    let default_ms = DEFAULT_BATCH_DELAY.as_millis() as u64;
    let delay_ms = parse_u64("OPENADS_AST_DEBOUNCE_MS", default_ms).min(MAX_DEBOUNCE_MS);
    DispatcherConfig { delay: Duration::from_millis(delay_ms) }
}

fn load_log_config() -> LogConfig {
    let defaults = LogConfig::default();
    let level = std::env::var("OPENADS_AST_LOG_LEVEL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(defaults.level);
    let format = std::env::var("OPENADS_AST_LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or(defaults.format);
    LogConfig { format, level }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EnvConfig {
    EnvConfig {
        dispatcher: load_dispatcher_config(),
        debug: parse_bool("OPENADS_AST_DEBUG", false),
        log: load_log_config(),
        serial_queue: SerialQueueConfig {
            drain_on_shutdown: parse_bool("OPENADS_AST_DRAIN_ON_SHUTDOWN", true),
        },
    }
}

impl EnvConfig {
    /// Return a serializable summary of all effective values.
    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            debounce_ms: self.dispatcher.delay.as_millis() as u64,
            debug: self.debug,
            log_level: self.log.level.clone(),
            log_format: self.log.format.as_str().to_string(),
            drain_on_shutdown: self.serial_queue.drain_on_shutdown,
        }
    }
}
