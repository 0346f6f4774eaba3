// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Loading policy manifests from disk and evaluating patches with them.

use patchgate_core::policy_config::PolicyConfigError;
use patchgate_core::{EvaluationMode, PatchEvaluator, PolicyManifest, PolicyViolation};
use std::io::Write;
use tempfile::NamedTempFile;

const MANIFEST: &str = r#"
apiVersion: patchgate/v1
kind: PatchPolicy
metadata:
  name: user-profile
  labels:
    team: identity
spec:
  mode: allowlist
  rules:
    - operations: [remove, replace]
      path: "^/id$"
      deny: true
    - operations: [replace, add]
      path: "^/profile/"
"#;

fn write_manifest(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_explicit_path() {
    let file = write_manifest(MANIFEST);
    let manifest = PolicyManifest::load(Some(file.path().to_path_buf())).unwrap();

    assert_eq!(manifest.metadata.name, "user-profile");
    assert_eq!(manifest.mode(), EvaluationMode::AllowList);
    assert_eq!(
        manifest.metadata.labels.as_ref().and_then(|l| l.get("team")).map(String::as_str),
        Some("identity")
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");

    assert!(matches!(
        PolicyManifest::load(Some(missing)),
        Err(PolicyConfigError::Io { .. })
    ));
}

#[test]
fn test_load_rejects_invalid_manifest() {
    let file = write_manifest(&MANIFEST.replace("kind: PatchPolicy", "kind: Something"));
    assert!(matches!(
        PolicyManifest::load(Some(file.path().to_path_buf())),
        Err(PolicyConfigError::InvalidKind(_))
    ));

    let file = write_manifest("apiVersion: [unterminated");
    assert!(matches!(
        PolicyManifest::from_yaml_file(file.path()),
        Err(PolicyConfigError::Yaml(_))
    ));
}

#[test]
fn test_manifest_drives_evaluator() {
    let file = write_manifest(MANIFEST);
    let manifest = PolicyManifest::from_yaml_file(file.path()).unwrap();
    let evaluator = PatchEvaluator::new(manifest.compile().unwrap()).with_mode(manifest.mode());

    assert!(evaluator
        .validate(br#"[{"op":"replace","path":"/profile/name","value":"Ada"}]"#)
        .is_ok());

    let err = evaluator
        .validate(br#"[{"op":"replace","path":"/id","value":7}]"#)
        .unwrap_err();
    assert!(matches!(err.violation(), Some(PolicyViolation::PathDenied { .. })));

    let err = evaluator
        .validate(br#"[{"op":"add","path":"/id","value":7}]"#)
        .unwrap_err();
    assert!(matches!(
        err.violation(),
        Some(PolicyViolation::OperationNotAcceptable { .. })
    ));

    let err = evaluator
        .validate(br#"[{"op":"add","path":"/settings/theme","value":"dark"}]"#)
        .unwrap_err();
    assert!(matches!(err.violation(), Some(PolicyViolation::NotCovered { .. })));
}
