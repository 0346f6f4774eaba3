// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # JSON Patch Applier
//!
//! Default [`PatchApplier`] backed by the `json-patch` crate. RFC 6902
//! semantics (`test` mismatches, missing paths for `remove`/`replace`, array
//! index rules) are entirely the crate's; nothing here re-implements them.

use anyhow::Context;
use serde_json::Value;

use crate::domain::patch_applier::PatchApplier;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPatchApplier;

impl JsonPatchApplier {
    pub fn new() -> Self {
        Self
    }

    /// Apply `patch` to an in-memory document.
    ///
    /// `json_patch::patch` rolls back on failure, so `document` is left
    /// untouched when an error is returned.
    pub fn apply_value(&self, patch: &[u8], document: &mut Value) -> anyhow::Result<()> {
        let operations: json_patch::Patch =
            serde_json::from_slice(patch).context("Failed to decode JSON patch")?;

        json_patch::patch(document, &operations.0).context("Failed to apply JSON patch")?;

        Ok(())
    }
}

impl PatchApplier for JsonPatchApplier {
    fn apply_patch(&self, patch: &[u8], document: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut target: Value =
            serde_json::from_slice(document).context("Failed to decode target document")?;

        self.apply_value(patch, &mut target)?;

        serde_json::to_vec(&target).context("Failed to encode patched document")
    }
}
