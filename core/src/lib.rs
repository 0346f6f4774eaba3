// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # patchgate core
//!
//! Policy evaluation gate for JSON Patch (RFC 6902) document mutations.
//!
//! Answers one question: given a proposed batch of patch operations, may the
//! caller apply all of them? Each operation is matched against an ordered
//! [`domain::policy::Policy`] (first match wins) under either deny-list or
//! allow-list interpretation, and the batch is rejected on the first failing
//! operation.
//!
//! # Architecture
//!
//! - **domain** — operations, rules, policies, violations, policy manifests
//! - **application** — [`application::evaluator::PatchEvaluator`], the validate/apply entry point
//! - **infrastructure** — [`infrastructure::json_patch_applier::JsonPatchApplier`]

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::evaluator::{EvaluatorError, PatchEvaluator};
pub use domain::*;
pub use infrastructure::json_patch_applier::JsonPatchApplier;
