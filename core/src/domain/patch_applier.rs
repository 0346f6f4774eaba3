// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

/// Applies an already-validated JSON Patch to a document.
///
/// Receives the batch exactly as the caller submitted it. Implementations
/// apply operations in order and either return the fully patched document or
/// fail without exposing a partially patched one. Failures are passed back to
/// the caller unchanged.
pub trait PatchApplier: Send + Sync {
    fn apply_patch(&self, patch: &[u8], document: &[u8]) -> anyhow::Result<Vec<u8>>;
}
