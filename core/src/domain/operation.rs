// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Patch Operations
//!
//! Wire model for a JSON Patch batch: an ordered array of objects carrying
//! `op`, `path` and an optional `value`. Decoding is strict about the shape
//! (array of objects, known `op` names) and lenient about extra members such
//! as `from`, which the policy never inspects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The fixed set of JSON Patch operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Add,
        OperationKind::Remove,
        OperationKind::Replace,
        OperationKind::Move,
        OperationKind::Copy,
        OperationKind::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Remove => "remove",
            OperationKind::Replace => "replace",
            OperationKind::Move => "move",
            OperationKind::Copy => "copy",
            OperationKind::Test => "test",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown patch operation '{}'", s))
    }
}

/// One proposed mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub op: OperationKind,
    /// JSON Pointer into the target document (e.g. `/a/b`).
    pub path: String,
    /// Payload for kinds that carry one. An explicit `null` decodes as `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Operation {
    pub fn new(op: OperationKind, path: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// Ordered sequence of operations decoded from the wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchBatch(Vec<Operation>);

impl PatchBatch {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self(operations)
    }

    /// Decode a batch from its JSON encoding.
    ///
    /// # Errors
    ///
    /// Fails when the bytes are not a JSON array of operation objects or an
    /// `op` name is not one of the six recognized kinds.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl<'a> IntoIterator for &'a PatchBatch {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
