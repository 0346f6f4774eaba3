// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the patchgate CLI

pub mod apply;
pub mod check;
pub mod policy;

pub use self::apply::ApplyArgs;
pub use self::check::CheckArgs;
pub use self::policy::PolicyCommand;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use patchgate_core::{EvaluationMode, PatchEvaluator, PolicyManifest};

/// Load the manifest and build an evaluator in the manifest's mode, unless
/// `allowlist` forces allow-list interpretation.
pub fn load_evaluator(policy_path: Option<PathBuf>, allowlist: bool) -> Result<PatchEvaluator> {
    let manifest = PolicyManifest::load(policy_path).context("Failed to load policy manifest")?;
    let policy = manifest.compile().context("Failed to compile policy")?;

    let mode = if allowlist {
        EvaluationMode::AllowList
    } else {
        manifest.mode()
    };

    tracing::debug!(
        policy = %manifest.metadata.name,
        rules = policy.len(),
        %mode,
        "Policy loaded"
    );

    Ok(PatchEvaluator::new(policy).with_mode(mode))
}

pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub const MANIFEST: &str = r#"
apiVersion: patchgate/v1
kind: PatchPolicy
metadata:
  name: cli-test
spec:
  rules:
    - operations: [replace]
      path: "^/a$"
    - operations: [replace, remove]
      path: "^/locked"
      deny: true
"#;

    pub fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }
}
