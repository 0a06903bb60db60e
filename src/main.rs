// Copyright 2024-2026 OpenAds Contributors
// SPDX-License-Identifier: Apache-2.0

//! openads-ast entry point.
//!
//! ## CLI Subcommands
//!
//! - `openads-ast simulate <steps...>` - Drive the adapter against a recording client
//! - `openads-ast config show|defaults` - Print configuration
//! - `openads-ast version` / `help`

use std::process::ExitCode;

use openads_ast::cli::{config_cmd, simulate};
use openads_ast::config;
use openads_ast::telemetry::{init_logging, LogError};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match command {
        "simulate" => {
            let cfg = config::load();
            match init_logging(&cfg.log) {
                Ok(()) | Err(LogError::AlreadyInitialized) => {}
                Err(e) => {
                    eprintln!("Logging setup failed: {}", e);
                    return ExitCode::from(2u8);
                }
            }
            match simulate::run(&cfg, &args[2..]).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("simulate: {}", e);
                    ExitCode::from(e.exit_code())
                }
            }
        }
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => {
                    config_cmd::run_show();
                    ExitCode::SUCCESS
                }
                "defaults" => {
                    config_cmd::run_defaults();
                    ExitCode::SUCCESS
                }
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_usage();
                    ExitCode::FAILURE
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("openads-ast {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "openads-ast - call-batching adapter for ad tag clients v{}

USAGE:
    openads-ast [COMMAND] [ARGS]

COMMANDS:
    simulate     Run adapter calls against a recording tag client
    config       Show configuration (show, defaults)
    version      Show version information
    help         Show this help message

SIMULATE STEPS:
    load                 Debounced loadTags()
    refresh:a,b          Debounced refresh([a, b]); empty ids are kept
    show:ID              showTag(ID)
    define:ID            defineTag({{targetId: ID}})
    on:EVENT:ID          onEvent(EVENT, ID, callback)
    debug:on|off         Set the debug flag
    wait:MS              Sleep before the next step

EXAMPLES:
    openads-ast simulate refresh:t1 refresh:t2,t3 wait:50 refresh:t4
    openads-ast simulate load load load show:top
    openads-ast config show

ENVIRONMENT:
    OPENADS_AST_DEBOUNCE_MS        Batch window in milliseconds (default: 10)
    OPENADS_AST_DEBUG              Initial debug flag (default: false)
    OPENADS_AST_LOG_LEVEL          Log filter (default: info)
    OPENADS_AST_LOG_FORMAT         json or pretty (default: json)
    OPENADS_AST_DRAIN_ON_SHUTDOWN  Run queued work on shutdown (default: true)

EXIT CODES:
    0  Success
    1  Runtime failure
    2  Invalid arguments or configuration
",
        version
    );
}
