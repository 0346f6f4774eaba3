// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Composes policy validation with patch application

pub mod evaluator;
