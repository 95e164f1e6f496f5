use crate::{
  generator::{
    error::SchemaError,
    ir::{NodeKind, SpecDocument},
  },
  utils::SpecFormat,
};

const BASE: &str = r#"{
  "schemas": {
    "interface": {
      "type": "object",
      "params": [
        { "name": "name", "type": "string", "required": true },
        { "name": "mtu", "type": "int", "default": 1500 }
      ]
    }
  },
  "namespaces": [
    {
      "name": "Interface",
      "schema": "interface",
      "read": {
        "uri": "/api/interfaces/{name}",
        "path_params": [{ "name": "name", "type": "string" }],
        "output": { "type": "object", "ref": "interface" }
      }
    }
  ]
}"#;

fn base() -> SpecDocument {
  SpecFormat::Json.parse(BASE.as_bytes()).unwrap()
}

#[test]
fn test_normalize_fills_implicit_names() {
  let mut document = base();
  assert!(document.schemas["interface"].name.is_empty());

  document.normalize();
  assert_eq!(document.schemas["interface"].name, "interface");
  assert_eq!(document.namespace("Interface").unwrap().read.as_ref().unwrap().name, "read");
  assert!(document.validate().is_ok());
}

#[test]
fn test_override_extends_schema_and_namespaces() {
  let overlay = SpecFormat::Yaml
    .parse(
      br"
schemas:
  interface:
    type: object
    params:
      - name: mtu
        type: int
        description: Maximum transmission unit.
      - name: enabled
        type: bool
  vlan:
    type: int
namespaces:
  - name: Interface
    module: network
  - name: Vlan
    schema: vlan
",
    )
    .unwrap();

  let mut document = base();
  document.apply_override(overlay).unwrap();
  document.normalize();

  let interface = document.schemas["interface"].as_object().unwrap();
  assert_eq!(interface.names().collect::<Vec<_>>(), vec!["name", "mtu", "enabled"]);
  assert_eq!(
    interface.get("mtu").unwrap().description.as_deref(),
    Some("Maximum transmission unit.")
  );
  assert!(interface.get("mtu").unwrap().has_default());
  assert_eq!(document.schemas["vlan"].kind(), NodeKind::Int);

  assert_eq!(document.namespaces.len(), 2);
  assert_eq!(document.namespace("Interface").unwrap().module_name(), "network");
  assert_eq!(document.namespace("Vlan").unwrap().schema, "vlan");
}

#[test]
fn test_override_rejects_kind_change() {
  let overlay = SpecFormat::Json
    .parse(br#"{ "schemas": { "interface": { "type": "array", "element": { "type": "string" } } } }"#)
    .unwrap();

  let mut document = base();
  let err = document.apply_override(overlay).unwrap_err();
  assert!(matches!(
    err,
    SchemaError::VariantMismatch {
      base: NodeKind::Object,
      overlay: NodeKind::Array,
      ..
    }
  ));
}

#[test]
fn test_validate_reports_undeclared_path_parameter() {
  let mut document = SpecFormat::Json
    .parse(br#"{ "namespaces": [{ "name": "Vlan", "read": { "uri": "/api/vlans/{id}" } }] }"#)
    .unwrap();
  document.normalize();

  let err = document.validate().unwrap_err();
  assert!(err.to_string().contains("undeclared path parameter 'id'"), "{err}");
}

#[test]
fn test_parse_rejects_unknown_type() {
  let err = SpecFormat::Json
    .parse(br#"{ "schemas": { "x": { "type": "decimal" } } }"#)
    .unwrap_err();
  assert!(err.to_string().contains("decimal"), "{err}");
}

#[test]
fn test_format_from_extension() {
  assert_eq!(SpecFormat::from_extension("yaml"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_extension("yml"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_extension("json"), SpecFormat::Json);
  assert_eq!(SpecFormat::from_extension("txt"), SpecFormat::Json);
}

#[test]
fn test_into_parts_freezes_registry() {
  let mut document = base();
  document.normalize();
  let (registry, namespaces) = document.into_parts();

  assert!(registry.get("interface").is_some());
  assert_eq!(namespaces.len(), 1);
}

#[test]
fn test_validate_rejects_non_finite_floats() {
  let mut document = SpecFormat::Yaml
    .parse(
      br#"
schemas:
  link:
    type: object
    params:
      - name: loss
        type: float
        max: .inf
"#,
    )
    .unwrap();
  document.normalize();

  let err = document.validate().unwrap_err();
  assert!(matches!(err, SchemaError::NonFiniteNumber { bound: "max", .. }), "{err}");
  assert!(err.to_string().contains("link.loss"), "{err}");

  let mut document = SpecFormat::Yaml
    .parse(
      br#"
schemas:
  link:
    type: float
    values: [0.5, .nan]
"#,
    )
    .unwrap();
  document.normalize();
  assert!(matches!(
    document.validate().unwrap_err(),
    SchemaError::NonFiniteNumber { bound: "value", .. }
  ));
}
