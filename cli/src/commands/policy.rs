// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Policy manifest management commands
//!
//! Commands: validate, show

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use patchgate_core::PolicyManifest;

#[derive(Subcommand)]
pub enum PolicyCommand {
    /// Validate a policy manifest
    Validate {
        /// Path to manifest (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Show the rules of the active policy in evaluation order
    Show,
}

pub fn handle_command(command: PolicyCommand, policy_override: Option<PathBuf>) -> Result<()> {
    match command {
        PolicyCommand::Validate { file } => validate(file.or(policy_override)),
        PolicyCommand::Show => show(policy_override),
    }
}

fn validate(policy_path: Option<PathBuf>) -> Result<()> {
    println!("Validating policy manifest...");

    let manifest = PolicyManifest::load(policy_path).context("Policy validation failed")?;

    println!(
        "{}",
        format!(
            "✓ Policy '{}' is valid ({} rules)",
            manifest.metadata.name,
            manifest.spec.rules.len()
        )
        .green()
    );

    Ok(())
}

fn show(policy_path: Option<PathBuf>) -> Result<()> {
    let manifest = PolicyManifest::load(policy_path).context("Failed to load policy manifest")?;

    println!("{} {}", "Policy:".bold(), manifest.metadata.name);
    if let Some(version) = &manifest.metadata.version {
        println!("  Version: {}", version);
    }
    println!("  Mode: {}", manifest.mode());
    println!();

    println!("{}", "Rules (first match wins):".bold());
    if manifest.spec.rules.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (index, rule) in manifest.spec.rules.iter().enumerate() {
        let operations: Vec<_> = rule.operations.iter().map(|op| op.as_str()).collect();
        let decision = if rule.deny { "deny".red() } else { "allow".green() };
        println!(
            "  {}. {} [{}] {}",
            index + 1,
            rule.path,
            operations.join(", "),
            decision
        );
    }

    Ok(())
}
