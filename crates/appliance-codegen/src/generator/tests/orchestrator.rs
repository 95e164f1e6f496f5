use std::path::Path;

use crate::{
  generator::{
    codegen::Visibility,
    ir::SpecDocument,
    metrics::GenerationWarning,
    orchestrator::{GenerationOutput, Orchestrator, SHARED_CLIENT_FILE},
    tests::support::{assert_code_contains, assert_code_lacks, attribute_block},
  },
  utils::SpecFormat,
};

const FIXTURE: &[u8] = include_bytes!("../../../fixtures/appliance.json");

fn document() -> SpecDocument {
  let mut document = SpecFormat::Json.parse(FIXTURE).unwrap();
  document.normalize();
  document.validate().unwrap();
  document
}

fn file<'a>(output: &'a GenerationOutput, path: &str) -> &'a str {
  output
    .files
    .iter()
    .find(|file| file.path == Path::new(path))
    .map(|file| file.code.as_str())
    .unwrap_or_else(|| {
      let paths: Vec<_> = output.files.iter().map(|file| file.path.display().to_string()).collect();
      panic!("{path} not generated, got {paths:?}")
    })
}

fn paths(output: &GenerationOutput) -> Vec<String> {
  output
    .files
    .iter()
    .map(|file| file.path.display().to_string())
    .collect()
}

#[test]
fn test_generate_lays_out_modules() {
  let output = Orchestrator::new(document(), Visibility::default())
    .generate("/path/to/appliance.json")
    .unwrap();

  assert_eq!(
    paths(&output),
    vec![
      "mod.rs",
      "monitoring/mod.rs",
      "monitoring/snmp_user_client.rs",
      "monitoring/snmp_user_resource.rs",
      "network/interface_client.rs",
      "network/interface_resource.rs",
      "network/mod.rs",
      "network/shared_client.rs",
      "shared/mod.rs",
      "shared/shared_client.rs",
      "system/mod.rs",
      "system/system_client.rs",
      "system/system_resource.rs",
    ]
  );
  assert!(output.stats.warnings.is_empty(), "{:?}", output.stats.warnings);
  assert_eq!(output.stats.namespaces_generated, 3);

  for file in &output.files {
    assert!(file.code.starts_with("//! AUTO-GENERATED CODE - DO NOT EDIT!"));
    assert!(file.code.contains("//! Source: /path/to/appliance.json"));
  }

  let root = file(&output, "mod.rs");
  assert_code_contains(root, "pub mod monitoring; pub mod network; pub mod shared; pub mod system;");

  let network = file(&output, "network/mod.rs");
  assert_code_contains(network, "mod interface_client; mod interface_resource; mod shared_client;");
  assert_code_contains(network, "pub use shared_client::*;");
}

#[test]
fn test_client_structs() {
  let output = Orchestrator::new(document(), Visibility::default())
    .generate("appliance.json")
    .unwrap();
  let system = file(&output, "system/system_client.rs");

  assert_code_contains(system, "use serde::{Deserialize, Serialize};");
  assert_code_contains(system, "use crate::network::Dns;");
  assert_code_contains(system, "#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)] pub struct System {");
  assert_code_contains(
    system,
    r#"#[serde(rename = "adminPassword", default, skip_serializing_if = "Option::is_none")] pub admin_password: Option<String>,"#,
  );
  assert_code_contains(system, "pub hostname: String,");
  assert_code_contains(system, "pub ntp_servers: Option<Vec<String>>,");
  assert_code_contains(
    system,
    r#"pub fn admin_password_encrypted_key(&self) -> String { "solo|encrypted|adminPassword".to_string() }"#,
  );
  assert_code_contains(system, "pub type SystemReadOutput = System;");
  assert_code_contains(system, "pub request: Option<System>,");
  assert_code_contains(system, r#"pub const METHOD: &'static str = "PUT";"#);
  assert_code_lacks(system, "use crate::system::");

  let interface = file(&output, "network/interface_client.rs");
  assert_code_contains(interface, "use crate::shared::IpAddress;");
  assert_code_contains(interface, "pub primary: Option<IpAddress>,");
  assert_code_contains(interface, "pub secondary: Option<Vec<IpAddress>>,");
  assert_code_contains(interface, "pub vlan: Option<i64>,");
  assert_code_contains(interface, "pub counters: Option<InterfaceCounters>,");
  assert_code_contains(interface, "pub struct InterfaceCounters {");
  assert_code_contains(interface, r#"format!("/api/interfaces/{}/counters/reset", self.name)"#);
  assert_code_contains(interface, "pub struct InterfaceResetCountersInput {");
  assert_code_contains(interface, "pub force: Option<bool>,");

  let snmp = file(&output, "monitoring/snmp_user_client.rs");
  assert_code_contains(snmp, "pub r#static: Option<bool>,");
  assert_code_contains(
    snmp,
    r#"format!("with_param_value|plaintext|user|{}|auth_key", self.user.as_str())"#,
  );
  assert_code_contains(snmp, "pub type SnmpUserListOutput = Vec<SnmpUser>;");
  assert_code_contains(snmp, "Self::URI_TEMPLATE.to_string()");
}

#[test]
fn test_resource_attributes() {
  let output = Orchestrator::new(document(), Visibility::default())
    .generate("appliance.json")
    .unwrap();

  let system = file(&output, "system/system_resource.rs");
  assert_code_contains(system, "use appliance_resource::prelude::*;");
  assert_code_contains(system, "pub fn system_attributes() -> Vec<Attribute> {");
  assert_code_contains(system, "pub const SYSTEM_SLUG: &str =");
  assert!(attribute_block(system, "uptime").starts_with(r#"Attribute::int64("uptime").computed()"#));
  assert!(attribute_block(system, "admin_password").contains(".optional().sensitive()"));
  assert!(attribute_block(system, "ntp_servers").contains(".validators([list_validator::size_between(1,4)])"));
  assert!(attribute_block(system, "hostname").contains(".validators([string_validator::length_at_most(63)])"));
  assert!(!attribute_block(system, "hostname").contains(".computed()"));

  let interface = file(&output, "network/interface_resource.rs");
  assert!(attribute_block(interface, "name").contains(".optional().requires_replace()"));
  assert!(attribute_block(interface, "vlan").contains("int64_validator::between(1,4094)"));
  assert!(attribute_block(interface, "mode").contains(r#"string_validator::one_of(["access","trunk"])"#));
  assert_code_contains(
    interface,
    r#"Attribute::list_nested("secondary", vec![Attribute::string("ip").optional()"#,
  );
  assert!(attribute_block(interface, "counters").contains(r#"Attribute::single_nested("counters""#));

  let snmp = file(&output, "monitoring/snmp_user_resource.rs");
  assert!(attribute_block(snmp, "auth_key").contains(".sensitive()"));
  for member in ["dhcp", "static"] {
    assert!(
      attribute_block(snmp, member).contains(r#"object_validator::exactly_one_of(["dhcp","static"])"#),
      "{member}"
    );
  }
}

#[test]
fn test_shared_types_group_by_module() {
  let output = Orchestrator::new(document(), Visibility::default())
    .generate("appliance.json")
    .unwrap();

  let shared = file(&output, &format!("shared/{SHARED_CLIENT_FILE}"));
  assert_code_contains(shared, "/// IPv4 address with prefix length.");
  assert_code_contains(shared, "pub struct IpAddress {");

  let network = file(&output, &format!("network/{SHARED_CLIENT_FILE}"));
  assert_code_contains(network, "use crate::shared::IpAddress;");
  assert_code_contains(network, "pub struct Dns {");
  assert_code_contains(network, "pub servers: Option<Vec<IpAddress>>,");
  assert_eq!(output.stats.shared_types_generated, 2);
}

#[test]
fn test_only_filters_namespaces_and_shared_types() {
  let output = Orchestrator::new(document(), Visibility::default())
    .with_only(["Interface", "Firewall"])
    .generate("appliance.json")
    .unwrap();

  assert_eq!(
    paths(&output),
    vec![
      "mod.rs",
      "network/interface_client.rs",
      "network/interface_resource.rs",
      "network/mod.rs",
      "shared/mod.rs",
      "shared/shared_client.rs",
    ]
  );
  assert_eq!(
    output.stats.warnings,
    vec![GenerationWarning::UnknownNamespace {
      namespace: "Firewall".to_string()
    }]
  );
}

#[test]
fn test_crate_visibility() {
  let output = Orchestrator::new(document(), Visibility::Crate)
    .with_only(["System"])
    .generate("appliance.json")
    .unwrap();

  assert_code_contains(file(&output, "system/system_client.rs"), "pub(crate) struct System {");
  assert_code_contains(file(&output, "system/mod.rs"), "pub(crate) use system_client::*;");
  assert_code_contains(file(&output, "mod.rs"), "pub(crate) mod system;");
}

#[test]
fn test_slugs_are_distinct_and_stable() {
  let first = Orchestrator::new(document(), Visibility::default());
  let second = Orchestrator::new(document(), Visibility::default());

  let slugs: Vec<_> = first.namespaces().iter().map(|ns| ns.slug.clone().unwrap()).collect();
  let again: Vec<_> = second.namespaces().iter().map(|ns| ns.slug.clone().unwrap()).collect();
  assert_eq!(slugs, again);

  let mut unique = slugs.clone();
  unique.sort();
  unique.dedup();
  assert_eq!(unique.len(), slugs.len());
  assert!(slugs.iter().all(|slug| slug.len() == 6));

  let output = first.generate("appliance.json").unwrap();
  assert_code_contains(
    file(&output, "system/system_resource.rs"),
    &format!(r#"pub const SYSTEM_SLUG: &str = "{}";"#, slugs[0]),
  );
}

#[test]
fn test_kind_mismatch_aborts_only_that_namespace() {
  let mut document = document();
  let broken: SpecDocument = SpecFormat::Json
    .parse(
      br#"{
        "schemas": {
          "route": {
            "type": "object",
            "params": [{ "name": "gateways", "type": "array", "ref": "address", "element": { "type": "string" } }]
          }
        },
        "namespaces": [{ "name": "Route", "schema": "route" }]
      }"#,
    )
    .unwrap();
  document.apply_override(broken).unwrap();
  document.normalize();

  let output = Orchestrator::new(document, Visibility::default())
    .generate("appliance.json")
    .unwrap();

  assert!(paths(&output).iter().all(|path| !path.starts_with("route/")));
  assert!(paths(&output).contains(&"system/system_client.rs".to_string()));
  assert_eq!(output.stats.skipped_count(), 1);
  assert!(output.stats.warnings.iter().any(|warning| matches!(
    warning,
    GenerationWarning::NamespaceFailed { namespace, error } if namespace == "Route" && error.contains("resolves to object, expected array")
  )));
}

#[test]
fn test_dependencies_of_namespace() {
  let orchestrator = Orchestrator::new(document(), Visibility::default());
  let interface = &orchestrator.namespaces()[1];
  let dependencies = orchestrator.dependencies_of(interface).unwrap();
  assert_eq!(dependencies.into_iter().collect::<Vec<_>>(), vec!["address", "vlan_id"]);
}

#[test]
fn test_document_names_become_valid_identifiers() {
  let mut document: SpecDocument = SpecFormat::Json
    .parse(
      br#"{
        "schemas": {
          "endpoint": {
            "type": "object",
            "class": "Address Object",
            "module": "network-objects",
            "params": [{ "name": "host", "type": "string" }]
          },
          "token": {
            "type": "object",
            "params": [
              { "name": "label", "type": "string", "required": true },
              { "name": "peer", "type": "object", "ref": "endpoint" }
            ]
          },
          "edge": {
            "type": "object",
            "params": [{ "name": "type", "type": "string" }]
          }
        },
        "namespaces": [
          {
            "name": "2FA_SLUG",
            "schema": "token",
            "create": { "method": "POST", "uri": "/api/tokens", "body": { "type": "object", "ref": "token" } }
          },
          { "name": "Edge", "schema": "edge", "module": "edge-config" }
        ]
      }"#,
    )
    .unwrap();
  document.normalize();
  document.validate().unwrap();

  let output = Orchestrator::new(document, Visibility::default())
    .generate("appliance.json")
    .unwrap();

  assert_eq!(output.stats.skipped_count(), 0, "{:?}", output.stats.warnings);
  assert_eq!(
    paths(&output),
    vec![
      "_2_fa_slug/_2_fa_slug_client.rs",
      "_2_fa_slug/_2_fa_slug_resource.rs",
      "_2_fa_slug/mod.rs",
      "edge_config/edge_client.rs",
      "edge_config/edge_resource.rs",
      "edge_config/mod.rs",
      "mod.rs",
      "network_objects/mod.rs",
      "network_objects/shared_client.rs",
    ]
  );
  for generated in &output.files {
    syn::parse_file(&generated.code).unwrap_or_else(|err| panic!("{} does not parse: {err}", generated.path.display()));
  }

  let client = file(&output, "_2_fa_slug/_2_fa_slug_client.rs");
  assert_code_contains(client, "use crate::network_objects::AddressObject;");
  assert_code_contains(client, "Option<AddressObject>");
  assert_code_contains(file(&output, "network_objects/shared_client.rs"), "struct AddressObject");

  let resource = file(&output, "_2_fa_slug/_2_fa_slug_resource.rs");
  assert_code_contains(resource, "_2_FA_SLUG_SLUG: &str");
  assert_code_contains(resource, "fn _2_fa_slug_attributes()");

  assert_code_contains(file(&output, "mod.rs"), "mod network_objects;");
  assert_code_contains(file(&output, "edge_config/mod.rs"), "mod edge_resource;");
}
