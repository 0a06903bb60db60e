// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! `simulate` subcommand: drive an adapter over a recording tag client.
//!
//! Steps run in order on one task, so consecutive steps without a `wait`
//! land in the same batch window.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::CliError;
use crate::client::{AstClient, DebugModeParams, OnEventParams, ShowTagParams};
use crate::config::EnvConfig;
use crate::queue::{spawn_serial_queue, SerialWorkQueue};
use crate::scheduler::DispatcherStats;
use crate::tag::{RecordingTagClient, TagCall, TagDefinition};

/// Upper bound on waiting for the queue to go idle after the last step.
const IDLE_TIMEOUT: Duration = Duration::from_secs(2);

/// One simulated application call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Load,
    Refresh(Vec<String>),
    Show(String),
    Define(String),
    On { event: String, target_id: String },
    Debug(bool),
    Wait(u64),
}

impl FromStr for Step {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CliError::InvalidStep {
            step: s.to_string(),
            reason: reason.to_string(),
        };
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        match (name, arg) {
            ("load", None) => Ok(Self::Load),
            // Ids are opaque: empty segments are kept.
            ("refresh", Some(list)) => Ok(Self::Refresh(list.split(',').map(str::to_string).collect())),
            ("refresh", None) => Ok(Self::Refresh(Vec::new())),
            ("show", Some(id)) if !id.is_empty() => Ok(Self::Show(id.to_string())),
            ("define", Some(id)) if !id.is_empty() => Ok(Self::Define(id.to_string())),
            ("on", Some(rest)) => match rest.split_once(':') {
                Some((event, target)) if !event.is_empty() && !target.is_empty() => Ok(Self::On {
                    event: event.to_string(),
                    target_id: target.to_string(),
                }),
                _ => Err(invalid("expected on:<event>:<target>")),
            },
            ("debug", Some("on")) => Ok(Self::Debug(true)),
            ("debug", Some("off")) => Ok(Self::Debug(false)),
            ("debug", _) => Err(invalid("expected debug:on or debug:off")),
            ("wait", Some(ms)) => ms
                .parse::<u64>()
                .map(Self::Wait)
                .map_err(|_| invalid("expected wait:<milliseconds>")),
            ("show" | "define", _) => Err(invalid("missing target id")),
            _ => Err(invalid("unknown step")),
        }
    }
}

/// Parse CLI arguments into steps.
pub fn parse_steps(args: &[String]) -> Result<Vec<Step>, CliError> {
    if args.is_empty() {
        return Err(CliError::NoSteps);
    }
    args.iter().map(|a| a.parse()).collect()
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub calls: Vec<TagCall>,
    pub stats: DispatcherStats,
    pub debug: bool,
}

/// Run `steps` against a fresh adapter and return what the client saw.
pub async fn run_simulation(config: &EnvConfig, steps: &[Step]) -> Result<SimulationReport, CliError> {
    let tags = Arc::new(RecordingTagClient::new());
    let shutdown = CancellationToken::new();
    let (queue, worker) =
        spawn_serial_queue(&Handle::current(), config.serial_queue.clone(), shutdown.clone());
    let adapter = AstClient::from_config(tags.clone(), queue.clone(), config)?;

    for step in steps {
        apply(&adapter, step).await;
    }

    // Let the last open windows close, then wait for their work to run.
    tokio::time::sleep(config.dispatcher.delay + Duration::from_millis(1)).await;
    wait_idle(&queue, IDLE_TIMEOUT).await;

    shutdown.cancel();
    worker.await.map_err(|e| CliError::Worker(e.to_string()))?;

    Ok(SimulationReport {
        calls: tags.calls(),
        stats: adapter.stats(),
        debug: tags.debug(),
    })
}

/// Entry point for `openads-ast simulate`. Prints one JSON line per call.
pub async fn run(config: &EnvConfig, args: &[String]) -> Result<(), CliError> {
    let steps = parse_steps(args)?;
    let report = run_simulation(config, &steps).await?;
    for call in &report.calls {
        println!("{}", serde_json::to_string(call)?);
    }
    eprintln!("{}", serde_json::to_string(&report.stats)?);
    Ok(())
}

async fn apply(adapter: &AstClient, step: &Step) {
    match step {
        Step::Load => {
            adapter.load_tags();
        }
        Step::Refresh(targets) => {
            adapter.refresh(targets.iter().cloned());
        }
        Step::Show(id) => {
            adapter.show_tag(ShowTagParams { target_id: id.clone() });
        }
        Step::Define(id) => {
            adapter.define_tag(TagDefinition::new(id.clone()));
        }
        Step::On { event, target_id } => {
            let (event_name, target) = (event.clone(), target_id.clone());
            adapter.on_event(OnEventParams {
                target_id: target_id.clone(),
                event: event.clone(),
                callback: Arc::new(move |payload: &serde_json::Value| {
                    tracing::info!(event = %event_name, target_id = %target, %payload, "tag event");
                }),
            });
        }
        Step::Debug(enabled) => {
            adapter.debug_mode(DebugModeParams { enabled: *enabled });
        }
        Step::Wait(ms) => tokio::time::sleep(Duration::from_millis(*ms)).await,
    }
}

async fn wait_idle(queue: &SerialWorkQueue, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    let poll_interval = Duration::from_millis(1);

    while queue.completed() < queue.submitted() {
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(
                submitted = queue.submitted(),
                completed = queue.completed(),
                "simulate: queue did not go idle"
            );
            return;
        }
        tokio::time::sleep(poll_interval).await;
    }
}
