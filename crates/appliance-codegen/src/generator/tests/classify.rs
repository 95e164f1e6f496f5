use crate::generator::{
  classify::{ClientRepr, Exposure, FieldUsage, UsageIndex, classify},
  error::SchemaError,
  ir::{BoolSpec, DefaultValue, FieldPath, Function, IntSpec, Namespace, Node},
  tests::support::{array, int, object, object_ref, read_only, reference, registry, required, string},
};

fn with_default(name: &str, default: i64) -> Node {
  Node::new(name, IntSpec::builder().default(default).build())
}

fn exposure(node: &Node, usage: FieldUsage) -> Result<Exposure, SchemaError> {
  classify(node, node, usage, &FieldPath::new(&node.name))
}

#[test]
fn test_usage_index() {
  let usage = UsageIndex::from_sets(["name", "mtu"], ["mtu", "counters"]);
  assert_eq!(usage.usage("name"), FieldUsage::InputOnly);
  assert_eq!(usage.usage("mtu"), FieldUsage::InputOutput);
  assert_eq!(usage.usage("counters"), FieldUsage::OutputOnly);
  assert_eq!(usage.usage("unused"), FieldUsage::InputOnly);
}

#[test]
fn test_list_output_element_counts_as_output() {
  let registry = registry([(
    "item",
    object("", [required(string("name")), read_only(int("uptime")), int("weight")]),
  )]);
  let namespace = Namespace::builder()
    .name("Item")
    .schema("item")
    .create(
      Function::builder()
        .name("create")
        .body(object("body", [required(string("name")), int("weight")]))
        .build(),
    )
    .list(
      Function::builder()
        .name("list")
        .output(array("items", object_ref("", "item")))
        .build(),
    )
    .build();

  let usage = UsageIndex::for_namespace(&namespace, &registry).unwrap();
  assert_eq!(usage.usage("name"), FieldUsage::InputOutput);
  assert_eq!(usage.usage("weight"), FieldUsage::InputOutput);
  assert_eq!(usage.usage("uptime"), FieldUsage::OutputOnly);

  let uptime = read_only(int("uptime"));
  assert_eq!(exposure(&uptime, usage.usage("uptime")).unwrap(), Exposure::Computed);
}

#[test]
fn test_array_body_element_counts_as_input() {
  let registry = registry([("item", object("", [string("name"), int("weight")]))]);
  let namespace = Namespace::builder()
    .name("Item")
    .schema("item")
    .create(
      Function::builder()
        .name("bulk_create")
        .body(array("items", object_ref("", "item")))
        .build(),
    )
    .build();

  let usage = UsageIndex::for_namespace(&namespace, &registry).unwrap();
  assert_eq!(usage.usage("name"), FieldUsage::InputOnly);
  assert_eq!(usage.usage("weight"), FieldUsage::InputOnly);
}

#[test]
fn test_input_only_exposure() {
  assert_eq!(
    exposure(&required(string("name")), FieldUsage::InputOnly).unwrap(),
    Exposure::Required
  );
  assert_eq!(
    exposure(&required(with_default("mtu", 1500)), FieldUsage::InputOnly).unwrap(),
    Exposure::OptionalComputed {
      default: DefaultValue::Int(1500)
    }
  );
  assert_eq!(
    exposure(&with_default("mtu", 1500), FieldUsage::InputOnly).unwrap(),
    Exposure::OptionalComputed {
      default: DefaultValue::Int(1500)
    }
  );
  assert_eq!(exposure(&string("alias"), FieldUsage::InputOnly).unwrap(), Exposure::Optional);

  let err = exposure(&required(read_only(string("id"))), FieldUsage::InputOnly).unwrap_err();
  assert!(matches!(err, SchemaError::RequiredReadOnly { .. }));
}

#[test]
fn test_input_output_never_optional_computed() {
  let echoed = exposure(&required(with_default("mtu", 1500)), FieldUsage::InputOutput).unwrap();
  assert_eq!(echoed, Exposure::Optional);
  assert!(!echoed.is_computed());

  assert_eq!(
    exposure(&read_only(int("uptime")), FieldUsage::InputOutput).unwrap(),
    Exposure::Computed
  );
}

#[test]
fn test_output_only_exposure() {
  assert_eq!(exposure(&int("uptime"), FieldUsage::OutputOnly).unwrap(), Exposure::Computed);
  assert_eq!(
    exposure(&required(read_only(int("uptime"))), FieldUsage::OutputOnly).unwrap(),
    Exposure::Computed
  );

  let err = exposure(&required(int("uptime")), FieldUsage::OutputOnly).unwrap_err();
  assert_eq!(
    err,
    SchemaError::RequiredOutputOnly {
      path: FieldPath::new("uptime")
    }
  );
}

#[test]
fn test_default_falls_back_to_canonical() {
  let canonical = with_default("vlan_id", 1);
  let declared = required(reference("vlan", "vlan_id", IntSpec::default()));

  let exposure = classify(&declared, &canonical, FieldUsage::InputOnly, &FieldPath::new("vlan")).unwrap();
  assert_eq!(exposure.default_value(), Some(&DefaultValue::Int(1)));
  assert!(exposure.is_optional());
}

#[test]
fn test_client_repr() {
  let name = required(string("name"));
  assert_eq!(ClientRepr::for_node(&name, &name), ClientRepr::Value);

  let enabled = required(Node::new("enabled", BoolSpec::builder().default(true).build()));
  assert_eq!(ClientRepr::for_node(&enabled, &enabled), ClientRepr::Optional);

  let alias = string("alias");
  assert!(ClientRepr::for_node(&alias, &alias).is_optional());
}
