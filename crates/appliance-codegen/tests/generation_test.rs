//! End-to-end generation from a document on disk.

use std::path::{Path, PathBuf};

use appliance_codegen::{
  generator::{codegen::Visibility, orchestrator::Orchestrator},
  utils::load_document,
};

fn fixture() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/appliance.json")
}

fn compact(code: &str) -> String {
  code.chars().filter(|c| !c.is_whitespace()).collect()
}

#[tokio::test]
async fn test_generate_from_fixture() {
  let document = load_document(&fixture(), &[] as &[PathBuf]).await.unwrap();
  let output = Orchestrator::new(document, Visibility::Public)
    .generate("fixtures/appliance.json")
    .unwrap();

  assert_eq!(output.stats.namespaces_generated, 3);
  assert_eq!(output.stats.skipped_count(), 0);
  assert_eq!(output.stats.cycles_detected, 0);
  assert_eq!(output.files.len(), 13);

  for file in &output.files {
    syn::parse_file(&file.code).unwrap_or_else(|err| panic!("{} does not parse: {err}", file.path.display()));
  }
}

#[tokio::test]
async fn test_overrides_are_applied_in_order() {
  let dir = tempfile::tempdir().unwrap();
  let first = dir.path().join("first.yaml");
  let second = dir.path().join("second.json");
  tokio::fs::write(
    &first,
    r"
schemas:
  interface:
    type: object
    params:
      - name: mode
        type: string
        values_patch:
          add: [hybrid]
          remove: [trunk]
      - name: description
        type: string
        max_length: 64
",
  )
  .await
  .unwrap();
  tokio::fs::write(
    &second,
    r#"{ "schemas": { "interface": { "type": "object", "params": [{ "name": "description", "type": "string", "max_length": 128 }] } } }"#,
  )
  .await
  .unwrap();

  let document = load_document(&fixture(), &[first, second]).await.unwrap();
  let output = Orchestrator::new(document, Visibility::Public)
    .with_only(["Interface"])
    .generate("fixtures/appliance.json")
    .unwrap();

  let resource = output
    .files
    .iter()
    .find(|file| file.path == Path::new("network/interface_resource.rs"))
    .map(|file| compact(&file.code))
    .unwrap();
  assert!(resource.contains(r#"string_validator::one_of(["access","hybrid"])"#), "{resource}");
  assert!(resource.contains("string_validator::length_at_most(128)"), "{resource}");
}

#[tokio::test]
async fn test_invalid_override_reports_path() {
  let dir = tempfile::tempdir().unwrap();
  let broken = dir.path().join("broken.json");
  tokio::fs::write(&broken, r#"{ "schemas": { "system": { "type": "int" } } }"#)
    .await
    .unwrap();

  let err = load_document(&fixture(), &[&broken]).await.unwrap_err();
  let message = format!("{err:#}");
  assert!(message.contains("failed to apply override"), "{message}");
  assert!(message.contains("cannot merge a int override into object field 'system'"), "{message}");
}

#[tokio::test]
async fn test_missing_document() {
  let err = load_document(Path::new("does/not/exist.json"), &[] as &[PathBuf])
    .await
    .unwrap_err();
  assert!(err.to_string().contains("failed to open does/not/exist.json"));
}
