// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `patchgate apply` - validate a patch, then apply it to a document

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use super::{load_evaluator, read_input};

#[derive(Args)]
pub struct ApplyArgs {
    /// JSON Patch file
    #[arg(value_name = "PATCH")]
    pub patch: PathBuf,

    /// JSON document to patch
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Write the patched document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Treat the policy as an allow-list regardless of the manifest mode
    #[arg(long)]
    pub allowlist: bool,
}

pub fn handle_command(args: ApplyArgs, policy_path: Option<PathBuf>) -> Result<()> {
    let evaluator = load_evaluator(policy_path, args.allowlist)?;
    let patch = read_input(&args.patch)?;
    let document = read_input(&args.document)?;

    let patched = evaluator
        .apply(&patch, &document)
        .with_context(|| format!("Failed to apply {}", args.patch.display()))?;

    let patched: Value =
        serde_json::from_slice(&patched).context("Patched document is not valid JSON")?;
    let rendered = serde_json::to_string_pretty(&patched)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Patched document written to {}", path.display());
            eprintln!(
                "{}",
                format!("✓ Patched document written: {}", path.display()).green()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
