// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Patch Evaluator
//!
//! Entry point for callers. Binds a [`Policy`] to an [`EvaluationMode`] and a
//! [`PatchApplier`].
//!
//! ## Processing Pipeline
//!
//! ```text
//! patch bytes
//!   └─ PatchEvaluator::validate          ← decode, then every operation in order
//!         └─ Policy::evaluate(op, mode)  ← first rejection aborts the batch
//!   └─ PatchEvaluator::apply             ← only after the whole batch passed
//!         └─ PatchApplier::apply_patch(raw bytes, document)
//! ```
//!
//! The mode is fixed at construction via [`PatchEvaluator::with_mode`] or
//! changed through [`PatchEvaluator::set_mode`], which needs exclusive access.
//! Hosts that need both modes concurrently hold two evaluators over one
//! (cheaply cloned) policy.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::domain::operation::{Operation, PatchBatch};
use crate::domain::patch_applier::PatchApplier;
use crate::domain::policy::{EvaluationMode, Policy};
use crate::domain::violation::PolicyViolation;
use crate::infrastructure::json_patch_applier::JsonPatchApplier;

#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// The batch is not a JSON array of patch operations.
    #[error("malformed patch batch: {0}")]
    Decode(#[source] serde_json::Error),

    /// Operation `index` of the batch failed the policy.
    #[error("operation {index} rejected: {violation}")]
    Rejected {
        index: usize,
        #[source]
        violation: PolicyViolation,
    },

    /// Failure reported by the patch applier, surfaced unchanged.
    #[error(transparent)]
    Application(anyhow::Error),
}

impl EvaluatorError {
    pub fn violation(&self) -> Option<&PolicyViolation> {
        match self {
            EvaluatorError::Rejected { violation, .. } => Some(violation),
            _ => None,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, EvaluatorError::Rejected { .. })
    }
}

/// Policy-bound validator for patch batches.
#[derive(Clone)]
pub struct PatchEvaluator {
    policy: Policy,
    mode: EvaluationMode,
    applier: Arc<dyn PatchApplier>,
}

impl PatchEvaluator {
    /// Deny-list evaluator applying patches with [`JsonPatchApplier`].
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            mode: EvaluationMode::default(),
            applier: Arc::new(JsonPatchApplier::new()),
        }
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_applier(mut self, applier: Arc<dyn PatchApplier>) -> Self {
        self.applier = applier;
        self
    }

    /// Switch interpretation for all subsequent calls.
    pub fn set_mode(&mut self, mode: EvaluationMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Decide a single operation.
    pub fn evaluate(&self, operation: &Operation) -> Result<(), PolicyViolation> {
        self.policy.evaluate(operation, self.mode)
    }

    /// Decode `patch` and check every operation against the policy.
    ///
    /// # Errors
    ///
    /// - [`EvaluatorError::Decode`] if `patch` is not a valid batch
    /// - [`EvaluatorError::Rejected`] for the first operation the policy rejects
    pub fn validate(&self, patch: &[u8]) -> Result<(), EvaluatorError> {
        let batch = PatchBatch::from_slice(patch).map_err(EvaluatorError::Decode)?;
        self.validate_operations(batch.operations())
    }

    /// Check already-decoded operations in order, stopping at the first rejection.
    pub fn validate_operations(&self, operations: &[Operation]) -> Result<(), EvaluatorError> {
        for (index, operation) in operations.iter().enumerate() {
            self.evaluate(operation)
                .map_err(|violation| EvaluatorError::Rejected { index, violation })?;
        }

        debug!(operations = operations.len(), mode = %self.mode, "Patch batch accepted");
        Ok(())
    }

    /// Validate `patch`, then apply it to `document`.
    ///
    /// The applier is never invoked unless every operation is accepted.
    ///
    /// # Errors
    ///
    /// Any [`EvaluatorError`] from [`Self::validate`], or
    /// [`EvaluatorError::Application`] carrying the applier's failure.
    pub fn apply(&self, patch: &[u8], document: &[u8]) -> Result<Vec<u8>, EvaluatorError> {
        self.validate(patch)?;

        self.applier
            .apply_patch(patch, document)
            .map_err(EvaluatorError::Application)
    }

    /// [`Self::apply`] for documents already held as JSON values.
    pub fn apply_value(&self, patch: &[u8], document: &Value) -> Result<Value, EvaluatorError> {
        let bytes = serde_json::to_vec(document)
            .map_err(|e| EvaluatorError::Application(e.into()))?;
        let patched = self.apply(patch, &bytes)?;

        serde_json::from_slice(&patched).map_err(|e| EvaluatorError::Application(e.into()))
    }
}

impl fmt::Debug for PatchEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchEvaluator")
            .field("policy", &self.policy)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
