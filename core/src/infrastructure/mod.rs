// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure
//!
//! Adapters for collaborators the domain only knows through traits.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Implements [`crate::domain::PatchApplier`] on top of `json-patch`

pub mod json_patch_applier;
