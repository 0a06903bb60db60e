// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for the `openads-ast` binary.
//!
//! ## Usage
//!
//! ```bash
//! openads-ast simulate refresh:top refresh:side load wait:50 refresh:top
//! openads-ast config show
//! openads-ast config defaults
//! ```

pub mod config_cmd;
pub mod simulate;

use thiserror::Error;

use crate::error::AdapterError;

pub use simulate::{parse_steps, run_simulation, SimulationReport, Step};

/// Errors surfaced by CLI subcommands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("No simulation steps given")]
    NoSteps,

    #[error("Invalid step '{step}': {reason}")]
    InvalidStep { step: String, reason: String },

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("Queue worker failed: {0}")]
    Worker(String),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoSteps | Self::InvalidStep { .. } => 2,
            Self::Adapter(_) | Self::Worker(_) | Self::Encode(_) => 1,
        }
    }
}
