// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Pure policy types: nothing in this layer performs I/O except
//! [`policy_config`], which reads manifests from disk.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Operations, rules, policies and their evaluation

pub mod operation;
pub mod rule;
pub mod policy;
pub mod violation;
pub mod patch_applier;
pub mod policy_config;

pub use operation::{Operation, OperationKind, PatchBatch};
pub use patch_applier::PatchApplier;
pub use policy::{EvaluationMode, Policy, PolicyBuilder, PolicyError};
pub use policy_config::{PolicyConfigError, PolicyManifest};
pub use rule::{AdmitPredicate, CompiledRule, PatchRule};
pub use violation::PolicyViolation;
