// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Reasons an individual operation is rejected by a policy.

use thiserror::Error;

use super::operation::OperationKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// The matched rule does not list the operation's kind.
    #[error("{op} is not in the list of acceptable operations for {path}")]
    OperationNotAcceptable { op: OperationKind, path: String },

    #[error("{path} is not allowed")]
    PathDenied { path: String },

    /// The matched rule's admission predicate returned false.
    #[error("{path} is not allowed by the admission predicate")]
    PredicateDenied { path: String },

    /// Allow-list mode only: no rule matched the path.
    #[error("{path} is not covered by policy")]
    NotCovered { path: String },
}

impl PolicyViolation {
    /// Path of the offending operation.
    pub fn path(&self) -> &str {
        match self {
            PolicyViolation::OperationNotAcceptable { path, .. }
            | PolicyViolation::PathDenied { path }
            | PolicyViolation::PredicateDenied { path }
            | PolicyViolation::NotCovered { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let violation = PolicyViolation::OperationNotAcceptable {
            op: OperationKind::Replace,
            path: "/a/b".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "replace is not in the list of acceptable operations for /a/b"
        );
        assert_eq!(violation.path(), "/a/b");

        let violation = PolicyViolation::NotCovered { path: "/a/c".to_string() };
        assert_eq!(violation.to_string(), "/a/c is not covered by policy");
    }
}
