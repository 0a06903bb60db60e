// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults.

use crate::config::{self, EffectiveConfig, EnvConfig};

/// Print effective config as key-value pairs to stdout.
pub fn run_show() {
    let cfg = config::load().effective_config();
    print_config(&cfg);
}

/// Print default config values (no env overrides) to stdout.
pub fn run_defaults() {
    print_config(&EnvConfig::default().effective_config());
}

/// Render config as `KEY=value` lines.
pub fn render(cfg: &EffectiveConfig) -> Vec<String> {
    vec![
        format!("OPENADS_AST_DEBOUNCE_MS={}", cfg.debounce_ms),
        format!("OPENADS_AST_DEBUG={}", cfg.debug),
        format!("OPENADS_AST_LOG_LEVEL={}", cfg.log_level),
        format!("OPENADS_AST_LOG_FORMAT={}", cfg.log_format),
        format!("OPENADS_AST_DRAIN_ON_SHUTDOWN={}", cfg.drain_on_shutdown),
    ]
}

fn print_config(cfg: &EffectiveConfig) {
    for line in render(cfg) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let lines = render(&EnvConfig::default().effective_config());
        assert_eq!(
            lines,
            vec![
                "OPENADS_AST_DEBOUNCE_MS=10",
                "OPENADS_AST_DEBUG=false",
                "OPENADS_AST_LOG_LEVEL=info",
                "OPENADS_AST_LOG_FORMAT=json",
                "OPENADS_AST_DRAIN_ON_SHUTDOWN=true",
            ]
        );
    }
}
