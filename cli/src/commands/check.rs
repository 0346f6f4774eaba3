// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `patchgate check` - validate a patch without applying it

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::{load_evaluator, read_input};

#[derive(Args)]
pub struct CheckArgs {
    /// JSON Patch file to validate
    #[arg(value_name = "PATCH")]
    pub patch: PathBuf,

    /// Treat the policy as an allow-list regardless of the manifest mode
    #[arg(long)]
    pub allowlist: bool,
}

pub fn handle_command(args: CheckArgs, policy_path: Option<PathBuf>) -> Result<()> {
    let evaluator = load_evaluator(policy_path, args.allowlist)?;
    let patch = read_input(&args.patch)?;

    evaluator
        .validate(&patch)
        .with_context(|| format!("Patch {} rejected", args.patch.display()))?;

    println!(
        "{}",
        format!("✓ Patch accepted ({} mode)", evaluator.mode()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{temp_file, MANIFEST};

    fn check(patch: &str, allowlist: bool) -> Result<()> {
        let manifest = temp_file(MANIFEST);
        let patch = temp_file(patch);
        handle_command(
            CheckArgs {
                patch: patch.path().to_path_buf(),
                allowlist,
            },
            Some(manifest.path().to_path_buf()),
        )
    }

    #[test]
    fn test_check_accepts_allowed_patch() {
        assert!(check(r#"[{"op":"replace","path":"/a","value":1}]"#, false).is_ok());
        assert!(check(r#"[{"op":"add","path":"/b","value":1}]"#, false).is_ok());
    }

    #[test]
    fn test_check_rejects_denied_patch() {
        let err = check(r#"[{"op":"remove","path":"/locked/x"}]"#, false).unwrap_err();
        assert!(format!("{:#}", err).contains("/locked/x is not allowed"));
    }

    #[test]
    fn test_check_allowlist_override() {
        let err = check(r#"[{"op":"add","path":"/b","value":1}]"#, true).unwrap_err();
        assert!(format!("{:#}", err).contains("not covered"));
    }
}
