// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Policy Manifest Types
//
// Declarative, file-based form of a patch policy:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Evaluation mode
// - Ordered rule list (operations, path pattern, deny flag)
//
// Admission predicates are code and cannot be declared here; hosts attach
// them through `Policy::builder` instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::operation::OperationKind;
use super::policy::{EvaluationMode, Policy, PolicyError};
use super::rule::PatchRule;

pub const API_VERSION: &str = "patchgate/v1";
pub const KIND: &str = "PatchPolicy";
pub const POLICY_PATH_ENV: &str = "PATCHGATE_POLICY_PATH";
pub const DEFAULT_POLICY_FILE: &str = "./patchgate-policy.yaml";

#[derive(Debug, Error)]
pub enum PolicyConfigError {
    #[error("Failed to read policy manifest {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid policy manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid apiVersion: '{0}'. Must be 'patchgate/v1'")]
    InvalidApiVersion(String),

    #[error("Invalid kind: '{0}'. Must be 'PatchPolicy'")]
    InvalidKind(String),

    #[error("metadata.name cannot be empty")]
    MissingName,

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("No policy manifest found (set --policy, PATCHGATE_POLICY_PATH or create ./patchgate-policy.yaml)")]
    NotFound,
}

/// Top-level policy manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyManifest {
    /// API version (must be "patchgate/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "PatchPolicy")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: PolicySpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySpec {
    /// `denylist` (default) or `allowlist`
    #[serde(default)]
    pub mode: EvaluationMode,

    /// Rules in evaluation order
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub operations: Vec<OperationKind>,

    /// Regular expression matched against operation paths
    pub path: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deny: bool,
}

impl From<&RuleSpec> for PatchRule {
    fn from(spec: &RuleSpec) -> Self {
        let rule = PatchRule::new(spec.operations.iter().copied(), spec.path.clone());
        if spec.deny {
            rule.denied()
        } else {
            rule
        }
    }
}

impl PolicyManifest {
    /// Load a manifest from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PolicyConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a manifest from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PolicyConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, PolicyConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover the manifest file using precedence order
    /// 1. Explicit path (returned as-is, even if missing, so loading reports it)
    /// 2. PATCHGATE_POLICY_PATH environment variable
    /// 3. ./patchgate-policy.yaml (working directory)
    pub fn discover(cli_path: Option<PathBuf>) -> Option<PathBuf> {
        if cli_path.is_some() {
            return cli_path;
        }

        if let Ok(path) = std::env::var(POLICY_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from(DEFAULT_POLICY_FILE);
        if cwd.exists() {
            return Some(cwd);
        }

        None
    }

    /// Discover, load and validate a manifest.
    pub fn load(cli_path: Option<PathBuf>) -> Result<Self, PolicyConfigError> {
        let path = Self::discover(cli_path).ok_or(PolicyConfigError::NotFound)?;
        tracing::info!("Loading policy manifest from {:?}", path);

        let manifest = Self::from_yaml_file(&path)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Structural validation plus a trial compilation of every rule.
    pub fn validate(&self) -> Result<(), PolicyConfigError> {
        if self.api_version != API_VERSION {
            return Err(PolicyConfigError::InvalidApiVersion(self.api_version.clone()));
        }

        if self.kind != KIND {
            return Err(PolicyConfigError::InvalidKind(self.kind.clone()));
        }

        if self.metadata.name.trim().is_empty() {
            return Err(PolicyConfigError::MissingName);
        }

        for (index, rule) in self.spec.rules.iter().enumerate() {
            if rule.operations.is_empty() {
                tracing::warn!(
                    rule = index,
                    path = %rule.path,
                    "Rule lists no operations and will reject every matching operation"
                );
            }
        }

        self.compile().map(|_| ())
    }

    /// Compile the rules into a [`Policy`].
    pub fn compile(&self) -> Result<Policy, PolicyConfigError> {
        let rules = self.spec.rules.iter().map(PatchRule::from).collect();
        Ok(Policy::new(rules)?)
    }

    pub fn mode(&self) -> EvaluationMode {
        self.spec.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
apiVersion: patchgate/v1
kind: PatchPolicy
metadata:
  name: profile-edits
spec:
  mode: allowlist
  rules:
    - operations: [replace, add]
      path: "^/profile/.*"
    - operations: [remove]
      path: "^/id$"
      deny: true
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = PolicyManifest::from_yaml_str(MANIFEST).unwrap();

        assert_eq!(manifest.metadata.name, "profile-edits");
        assert_eq!(manifest.mode(), EvaluationMode::AllowList);
        assert_eq!(manifest.spec.rules.len(), 2);
        assert_eq!(
            manifest.spec.rules[0].operations,
            vec![OperationKind::Replace, OperationKind::Add]
        );
        assert!(manifest.spec.rules[1].deny);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_mode_defaults_to_denylist() {
        let manifest = PolicyManifest::from_yaml_str(
            "apiVersion: patchgate/v1\nkind: PatchPolicy\nmetadata:\n  name: empty\nspec: {}\n",
        )
        .unwrap();
        assert_eq!(manifest.mode(), EvaluationMode::DenyList);
        assert!(manifest.compile().unwrap().is_empty());
    }

    #[test]
    fn test_compile_preserves_order_and_deny() {
        let policy = PolicyManifest::from_yaml_str(MANIFEST).unwrap().compile().unwrap();
        assert_eq!(policy.rules()[0].pattern(), "^/profile/.*");
        assert!(!policy.rules()[0].is_denied());
        assert!(policy.rules()[1].is_denied());
    }

    #[test]
    fn test_unknown_operation_rejected() {
        let yaml = MANIFEST.replace("[remove]", "[delete]");
        assert!(matches!(
            PolicyManifest::from_yaml_str(&yaml),
            Err(PolicyConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_validate_api_version_and_kind() {
        let mut manifest = PolicyManifest::from_yaml_str(MANIFEST).unwrap();
        manifest.api_version = "patchgate/v0".to_string();
        assert!(matches!(
            manifest.validate(),
            Err(PolicyConfigError::InvalidApiVersion(_))
        ));

        let mut manifest = PolicyManifest::from_yaml_str(MANIFEST).unwrap();
        manifest.kind = "NodeConfig".to_string();
        assert!(matches!(manifest.validate(), Err(PolicyConfigError::InvalidKind(_))));

        let mut manifest = PolicyManifest::from_yaml_str(MANIFEST).unwrap();
        manifest.metadata.name = " ".to_string();
        assert!(matches!(manifest.validate(), Err(PolicyConfigError::MissingName)));
    }

    #[test]
    fn test_validate_reports_bad_pattern() {
        let yaml = MANIFEST.replace("^/id$", "^/id(");
        let manifest = PolicyManifest::from_yaml_str(&yaml).unwrap();
        match manifest.validate() {
            Err(PolicyConfigError::Policy(PolicyError::InvalidPattern { index, .. })) => {
                assert_eq!(index, 1)
            }
            other => panic!("expected pattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_yaml_roundtrip_keeps_rules() {
        let manifest = PolicyManifest::from_yaml_str(MANIFEST).unwrap();
        let yaml = manifest.to_yaml_string().unwrap();
        let decoded = PolicyManifest::from_yaml_str(&yaml).unwrap();
        assert_eq!(decoded.spec.rules, manifest.spec.rules);
        assert_eq!(decoded.mode(), manifest.mode());
    }
}
