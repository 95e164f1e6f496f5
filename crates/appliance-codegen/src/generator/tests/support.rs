use std::collections::BTreeMap;

use crate::generator::ir::{
  ArraySpec, BoolSpec, FloatSpec, HashProfile, IntSpec, Node, NodeSpec, ObjectSpec, SchemaRegistry, StringSpec,
};

pub(crate) fn string(name: &str) -> Node {
  Node::new(name, StringSpec::default())
}

pub(crate) fn int(name: &str) -> Node {
  Node::new(name, IntSpec::default())
}

pub(crate) fn float(name: &str) -> Node {
  Node::new(name, FloatSpec::default())
}

pub(crate) fn boolean(name: &str) -> Node {
  Node::new(name, BoolSpec::default())
}

pub(crate) fn hashed(name: &str, hashing: HashProfile) -> Node {
  Node::new(name, StringSpec::builder().hashing(hashing).build())
}

pub(crate) fn object(name: &str, children: impl IntoIterator<Item = Node>) -> Node {
  Node::new(name, ObjectSpec::try_from_params(children).unwrap())
}

pub(crate) fn array(name: &str, element: Node) -> Node {
  Node::new(name, ArraySpec::builder().element(element).build())
}

/// A declaration standing for the registry entry `id`.
pub(crate) fn reference(name: &str, id: &str, spec: impl Into<NodeSpec>) -> Node {
  let mut node = Node::new(name, spec);
  node.reference = Some(id.to_string());
  node
}

pub(crate) fn object_ref(name: &str, id: &str) -> Node {
  reference(name, id, ObjectSpec::default())
}

pub(crate) fn required(mut node: Node) -> Node {
  node.required = true;
  node
}

pub(crate) fn read_only(mut node: Node) -> Node {
  node.read_only = true;
  node
}

/// Registry whose entries are named after their ids, as a loaded document would be.
pub(crate) fn registry<'a>(entries: impl IntoIterator<Item = (&'a str, Node)>) -> SchemaRegistry {
  SchemaRegistry::new(
    entries
      .into_iter()
      .map(|(id, mut node)| {
        if node.name.is_empty() {
          node.name = id.to_string();
        }
        (id.to_string(), node)
      })
      .collect::<BTreeMap<_, _>>(),
  )
}

/// Generated code with all whitespace removed, so assertions survive formatting.
pub(crate) fn compact(code: &str) -> String {
  code.chars().filter(|c| !c.is_whitespace()).collect()
}

pub(crate) fn assert_code_contains(code: &str, expected: &str) {
  assert!(
    compact(code).contains(&compact(expected)),
    "expected generated code to contain:\n{expected}\n\ngot:\n{code}"
  );
}

pub(crate) fn assert_code_lacks(code: &str, unexpected: &str) {
  assert!(
    !compact(code).contains(&compact(unexpected)),
    "expected generated code not to contain:\n{unexpected}\n\ngot:\n{code}"
  );
}

/// The builder chain of the attribute named `name`, from its constructor up to
/// the next attribute, with whitespace removed.
pub(crate) fn attribute_block(code: &str, name: &str) -> String {
  let code = compact(code);
  let needle = format!("(\"{name}\"");
  let start = code
    .match_indices(&needle)
    .map(|(index, _)| index)
    .next()
    .unwrap_or_else(|| panic!("attribute {name} not found in:\n{code}"));
  let start = code[..start].rfind("Attribute::").unwrap_or(start);
  let rest = &code[start..];
  let end = rest[1..].find("Attribute::").map_or(rest.len(), |index| index + 1);
  rest[..end].to_string()
}
