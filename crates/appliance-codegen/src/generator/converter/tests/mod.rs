
use crate::generator::{
  imports::TypeIndex,
  ir::{Namespace, SchemaRegistry},
};

pub(super) fn namespace(name: &str, schema: &str) -> Namespace {
  let mut namespace = Namespace::builder().name(name).schema(schema).build();
  namespace.slug = Some("abc123".to_string());
  namespace
}

pub(super) fn type_index(registry: &SchemaRegistry, namespaces: &[Namespace]) -> TypeIndex {
  TypeIndex::build(registry, namespaces)
}
