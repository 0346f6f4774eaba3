// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # patchgate CLI
//!
//! Command-line front end for the patch policy evaluator.
//!
//! ## Commands
//!
//! - `patchgate check <PATCH>` - Validate a JSON Patch against the policy
//! - `patchgate apply <PATCH> <DOCUMENT>` - Validate, then apply the patch
//! - `patchgate policy validate|show` - Policy manifest management
//!
//! The policy manifest is taken from `--policy`, then `PATCHGATE_POLICY_PATH`,
//! then `./patchgate-policy.yaml`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use patchgate_cli::commands::{self, ApplyArgs, CheckArgs, PolicyCommand};

/// patchgate - Policy gate for JSON Patch documents
#[derive(Parser)]
#[command(name = "patchgate")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to policy manifest (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PATCHGATE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a patch against the policy
    #[command(name = "check")]
    Check(CheckArgs),

    /// Validate a patch and apply it to a document
    #[command(name = "apply")]
    Apply(ApplyArgs),

    /// Policy manifest management
    #[command(name = "policy")]
    Policy {
        #[command(subcommand)]
        command: PolicyCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Check(args) => commands::check::handle_command(args, cli.policy),
        Commands::Apply(args) => commands::apply::handle_command(args, cli.policy),
        Commands::Policy { command } => commands::policy::handle_command(command, cli.policy),
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
