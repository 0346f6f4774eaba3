// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Patch Rules
//!
//! A [`PatchRule`] is the caller-facing descriptor: accepted operation kinds,
//! a path pattern (standard regular expression, unanchored), a `deny` flag and
//! an optional admission predicate. [`CompiledRule`] is the same clause with
//! its pattern compiled; it only exists inside a [`super::policy::Policy`].

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::operation::OperationKind;

/// Dynamic admission check over `(path, value)`.
///
/// Must be a pure function: policies are shared across threads and
/// evaluators, and evaluation order inside a batch is not a contract.
pub type AdmitPredicate = Arc<dyn Fn(&str, Option<&Value>) -> bool + Send + Sync>;

/// Rule descriptor as supplied by the caller.
#[derive(Clone)]
pub struct PatchRule {
    /// Operation kinds this rule accepts. Empty means none.
    pub operations: Vec<OperationKind>,
    /// Regular expression matched anywhere in the operation path.
    pub path: String,
    pub deny: bool,
    pub admit: Option<AdmitPredicate>,
}

impl PatchRule {
    pub fn new(
        operations: impl IntoIterator<Item = OperationKind>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            operations: operations.into_iter().collect(),
            path: path.into(),
            deny: false,
            admit: None,
        }
    }

    /// Mark every operation reaching this rule as rejected.
    pub fn denied(mut self) -> Self {
        self.deny = true;
        self
    }

    pub fn with_admit<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.admit = Some(Arc::new(predicate));
        self
    }
}

impl fmt::Debug for PatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchRule")
            .field("operations", &self.operations)
            .field("path", &self.path)
            .field("deny", &self.deny)
            .field("admit", &self.admit.is_some())
            .finish()
    }
}

/// A rule whose path pattern has been compiled.
#[derive(Clone)]
pub struct CompiledRule {
    matcher: Regex,
    operations: Vec<OperationKind>,
    deny: bool,
    admit: Option<AdmitPredicate>,
}

impl CompiledRule {
    pub(crate) fn compile(rule: PatchRule) -> Result<Self, regex::Error> {
        let matcher = Regex::new(&rule.path)?;
        Ok(Self {
            matcher,
            operations: rule.operations,
            deny: rule.deny,
            admit: rule.admit,
        })
    }

    /// Source text of the path pattern.
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn operations(&self) -> &[OperationKind] {
        &self.operations
    }

    pub fn is_denied(&self) -> bool {
        self.deny
    }

    pub fn has_admit(&self) -> bool {
        self.admit.is_some()
    }

    pub fn matches_path(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    pub fn accepts(&self, kind: OperationKind) -> bool {
        self.operations.contains(&kind)
    }

    /// `true` when there is no predicate or the predicate admits the pair.
    pub fn admits(&self, path: &str, value: Option<&Value>) -> bool {
        match &self.admit {
            Some(predicate) => predicate(path, value),
            None => true,
        }
    }
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("pattern", &self.pattern())
            .field("operations", &self.operations)
            .field("deny", &self.deny)
            .field("admit", &self.admit.is_some())
            .finish()
    }
}
