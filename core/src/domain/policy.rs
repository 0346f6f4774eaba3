// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Patch Policy
//!
//! An ordered, immutable list of compiled rules. For each operation the rules
//! are scanned in declared order and the first rule whose pattern matches the
//! operation path is the only one consulted.
//!
//! ## Decision Order
//!
//! Within the matched rule, kind acceptance is always checked first. After
//! that the two modes differ:
//!
//! | Step | Deny-list (default) | Allow-list |
//! |------|---------------------|------------|
//! | 1 | kind not accepted → `OperationNotAcceptable` | same |
//! | 2 | `deny` → `PathDenied` | predicate false → `PredicateDenied` |
//! | 3 | predicate false → `PredicateDenied` | `deny` → `PathDenied` |
//! | no match | accept | `NotCovered` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

use super::operation::Operation;
use super::rule::{CompiledRule, PatchRule};
use super::violation::PolicyViolation;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid path pattern '{pattern}' in rule {index}: {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// How a policy's rules are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Every path is permitted unless a matching rule restricts it.
    #[default]
    DenyList,
    /// A path must match some rule to be permitted.
    AllowList,
}

impl EvaluationMode {
    pub fn from_whitelist(whitelist: bool) -> Self {
        if whitelist {
            EvaluationMode::AllowList
        } else {
            EvaluationMode::DenyList
        }
    }

    pub fn is_allowlist(&self) -> bool {
        matches!(self, EvaluationMode::AllowList)
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationMode::DenyList => f.write_str("denylist"),
            EvaluationMode::AllowList => f.write_str("allowlist"),
        }
    }
}

/// Compiled rule set. Cheap to clone; clones share the same rules.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    rules: Arc<Vec<CompiledRule>>,
}

impl Policy {
    /// Compile every rule's path pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidPattern`] for the first rule whose
    /// pattern does not compile. No policy is produced in that case.
    pub fn new(rules: Vec<PatchRule>) -> Result<Self, PolicyError> {
        let compiled = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                let pattern = rule.path.clone();
                CompiledRule::compile(rule).map_err(|source| PolicyError::InvalidPattern {
                    index,
                    pattern,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rules = compiled.len(), "Compiled patch policy");

        Ok(Self {
            rules: Arc::new(compiled),
        })
    }

    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Rules in declared order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule whose pattern matches `path`, with its position.
    pub fn matching_rule(&self, path: &str) -> Option<(usize, &CompiledRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches_path(path))
    }

    /// Decide a single operation under `mode`.
    pub fn evaluate(&self, operation: &Operation, mode: EvaluationMode) -> Result<(), PolicyViolation> {
        let path = operation.path.as_str();

        let Some((index, rule)) = self.matching_rule(path) else {
            trace!(path, %mode, "No rule matched");
            return match mode {
                EvaluationMode::DenyList => Ok(()),
                EvaluationMode::AllowList => Err(PolicyViolation::NotCovered {
                    path: path.to_string(),
                }),
            };
        };

        trace!(path, rule = index, pattern = rule.pattern(), %mode, "Rule matched");

        if !rule.accepts(operation.op) {
            return Err(PolicyViolation::OperationNotAcceptable {
                op: operation.op,
                path: path.to_string(),
            });
        }

        let value = operation.value.as_ref();
        match mode {
            EvaluationMode::DenyList => {
                if rule.is_denied() {
                    return Err(PolicyViolation::PathDenied { path: path.to_string() });
                }
                if !rule.admits(path, value) {
                    return Err(PolicyViolation::PredicateDenied { path: path.to_string() });
                }
            }
            EvaluationMode::AllowList => {
                if !rule.admits(path, value) {
                    return Err(PolicyViolation::PredicateDenied { path: path.to_string() });
                }
                if rule.is_denied() {
                    return Err(PolicyViolation::PathDenied { path: path.to_string() });
                }
            }
        }

        Ok(())
    }
}

/// Incremental construction of a [`Policy`].
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    rules: Vec<PatchRule>,
}

impl PolicyBuilder {
    pub fn rule(mut self, rule: PatchRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = PatchRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn build(self) -> Result<Policy, PolicyError> {
        Policy::new(self.rules)
    }
}
