use std::collections::BTreeSet;

use crate::generator::{
  error::SchemaError,
  ir::{ArraySpec, FieldPath, IntSpec, NodeKind, ObjectSpec, ReferenceMode, StringSpec},
  tests::support::{array, int, object, object_ref, reference, registry, string},
};

#[test]
fn test_resolve_returns_declaration_without_reference() {
  let registry = registry([]);
  let node = string("hostname");
  assert!(std::ptr::eq(registry.resolve(&node).unwrap(), &node));
}

#[test]
fn test_resolve_follows_reference() {
  let registry = registry([("address", object("", [string("ip")]))]);
  let node = object_ref("primary", "address");

  let canonical = registry.resolve(&node).unwrap();
  assert_eq!(canonical.name, "address");
  assert!(canonical.as_object().unwrap().contains("ip"));
}

#[test]
fn test_resolve_never_returns_another_kind() {
  let registry = registry([
    ("port", int("")),
    ("name", string("")),
    ("address", object("", [string("ip")])),
    ("tags", array("", string(""))),
  ]);

  let declarations = [
    reference("a", "port", StringSpec::default()),
    reference("b", "name", IntSpec::default()),
    reference("c", "address", ArraySpec::builder().element(string("")).build()),
    reference("d", "tags", ObjectSpec::default()),
  ];
  for node in &declarations {
    match registry.resolve(node) {
      Ok(canonical) => assert_eq!(canonical.kind(), node.kind()),
      Err(err) => assert!(matches!(err, SchemaError::KindMismatch { .. }), "{err}"),
    }
  }

  for (id, node) in [
    ("port", reference("a", "port", IntSpec::default())),
    ("address", object_ref("b", "address")),
  ] {
    assert_eq!(registry.resolve(&node).unwrap().kind(), registry.get(id).unwrap().kind());
  }
}

#[test]
fn test_array_referencing_object_is_a_kind_mismatch() {
  let registry = registry([("address", object("", [string("ip")]))]);
  let node = reference("addresses", "address", ArraySpec::builder().element(string("")).build());

  let err = registry.resolve_at(&FieldPath::new("addresses"), &node).unwrap_err();
  assert_eq!(
    err,
    SchemaError::KindMismatch {
      path: FieldPath::new("addresses"),
      reference: "address".to_string(),
      expected: NodeKind::Array,
      found: NodeKind::Object,
    }
  );
}

#[test]
fn test_unknown_and_chained_references_fail() {
  let registry = registry([
    ("address", object("", [string("ip")])),
    ("alias", object_ref("", "address")),
  ]);

  let err = registry.resolve(&object_ref("x", "missing")).unwrap_err();
  assert!(matches!(err, SchemaError::UnknownReference { ref reference, .. } if reference == "missing"));

  let err = registry.resolve(&object_ref("x", "alias")).unwrap_err();
  assert!(matches!(err, SchemaError::ChainedReference { ref target, .. } if target == "address"));
}

#[test]
fn test_collect_opaque_stops_at_references() {
  let registry = registry([
    ("address", object("", [string("ip"), int("prefix")])),
    (
      "interface",
      object("", [string("name"), object_ref("primary", "address"), array("mtu_list", int(""))]),
    ),
  ]);
  let root = registry.get("interface").unwrap();

  let collected = registry.collect(root, ReferenceMode::Opaque).unwrap();
  let paths: Vec<String> = collected.iter().map(|entry| entry.path.to_string()).collect();
  assert_eq!(paths, ["<root>", "mtu_list", "mtu_list", "name", "primary"]);

  let primary = collected.iter().find(|entry| entry.path == FieldPath::new("primary")).unwrap();
  assert!(primary.opaque);
  assert_eq!(primary.depth, 1);
  assert_eq!(primary.canonical.name, "address");
}

#[test]
fn test_collect_expanded_descends_into_references() {
  let registry = registry([
    ("address", object("", [string("ip")])),
    ("interface", object("", [object_ref("primary", "address")])),
  ]);
  let root = registry.get("interface").unwrap();

  let collected = registry.collect(root, ReferenceMode::Expanded).unwrap();
  assert!(collected.iter().all(|entry| !entry.opaque));
  assert!(
    collected
      .iter()
      .any(|entry| entry.path == FieldPath::from_iter(["primary", "ip"]) && entry.depth == 2)
  );
}

#[test]
fn test_collect_expanded_rejects_cycles() {
  let registry = registry([
    ("node", object("", [string("label"), object_ref("child", "node")])),
    ("tree", object("", [object_ref("root", "node")])),
  ]);

  let tree = registry.get("tree").unwrap();
  let err = registry.collect(tree, ReferenceMode::Expanded).unwrap_err();
  assert!(matches!(err, SchemaError::ReferenceCycle { ref reference, .. } if reference == "node"));

  assert!(registry.collect(tree, ReferenceMode::Opaque).is_ok());
}

#[test]
fn test_dependencies_lists_opaque_references() {
  let registry = registry([
    ("address", object("", [string("ip")])),
    ("vlan", int("")),
    (
      "interface",
      object(
        "",
        [
          object_ref("primary", "address"),
          reference("vlan", "vlan", IntSpec::default()),
          object("stats", [object_ref("peer", "address")]),
        ],
      ),
    ),
  ]);

  let deps = registry.dependencies(registry.get("interface").unwrap()).unwrap();
  assert_eq!(deps, BTreeSet::from(["address".to_string(), "vlan".to_string()]));
  assert_eq!(
    registry.dependencies_of("interface"),
    Some(&BTreeSet::from(["address".to_string(), "vlan".to_string()]))
  );
}

#[test]
fn test_cycles_and_reachability() {
  let registry = registry([
    ("a", object("", [object_ref("next", "b")])),
    ("b", object("", [object_ref("next", "a")])),
    ("c", object("", [object_ref("self_ref", "c")])),
    ("d", object("", [object_ref("target", "a")])),
    ("e", object("", [string("value")])),
  ]);

  let mut cycles: Vec<Vec<String>> = registry
    .cycles()
    .into_iter()
    .map(|mut cycle| {
      cycle.sort();
      cycle
    })
    .collect();
  cycles.sort();
  assert_eq!(cycles, [vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);

  let reachable = registry.reachable(["d"]);
  assert_eq!(
    reachable,
    BTreeSet::from(["a".to_string(), "b".to_string(), "d".to_string()])
  );
  assert_eq!(registry.reachable(["e"]), BTreeSet::from(["e".to_string()]));
}
