//! Shared type names and the `use` block of generated client files.

use std::collections::{BTreeMap, BTreeSet};

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use super::{
  ast::TypeNameToken,
  ir::{Namespace, SchemaRegistry},
};
use crate::naming::identifiers::to_rust_module_name;

/// Module receiving object entries no namespace manages.
pub const SHARED_MODULE: &str = "shared";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedType {
  pub module: String,
  pub class: TypeNameToken,
}

/// Where every object entry of the registry is declared, and under which name.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
  types: BTreeMap<String, SharedType>,
  owned: BTreeSet<String>,
}

impl TypeIndex {
  /// An entry lives in the module of the first namespace managing it, else in
  /// its own `module`, else in [`SHARED_MODULE`].
  #[must_use]
  pub fn build(registry: &SchemaRegistry, namespaces: &[Namespace]) -> Self {
    let mut owners = BTreeMap::new();
    for namespace in namespaces {
      owners
        .entry(namespace.schema.as_str())
        .or_insert_with(|| namespace.module_name());
    }

    let mut index = Self::default();
    for (id, node) in registry.entries() {
      let Some(object) = node.as_object() else {
        continue;
      };
      let class = object
        .class_name
        .as_deref()
        .map_or_else(|| TypeNameToken::from_raw(id), TypeNameToken::from_declared);
      let module = match owners.get(id) {
        Some(module) => {
          index.owned.insert(id.to_string());
          module.clone()
        }
        None => node
          .module
          .as_deref()
          .filter(|module| !module.is_empty())
          .map_or_else(|| SHARED_MODULE.to_string(), to_rust_module_name),
      };
      index.types.insert(id.to_string(), SharedType { module, class });
    }
    index
  }

  #[must_use]
  pub fn get(&self, id: &str) -> Option<&SharedType> {
    self.types.get(id)
  }

  #[must_use]
  pub fn class_of(&self, id: &str) -> TypeNameToken {
    self
      .types
      .get(id)
      .map_or_else(|| TypeNameToken::from_raw(id), |shared| shared.class.clone())
  }

  /// Object entries not managed by any namespace.
  pub fn unowned(&self) -> impl Iterator<Item = &str> {
    self
      .types
      .keys()
      .filter(|id| !self.owned.contains(*id))
      .map(String::as_str)
  }
}

/// Deduplicated `use crate::<module>::<Class>;` lines for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
  entries: BTreeSet<(String, String)>,
}

impl ImportSet {
  /// Imports for `dependencies`, skipping types declared in `current_module`.
  #[must_use]
  pub fn from_dependencies<'d>(
    dependencies: impl IntoIterator<Item = &'d String>,
    index: &TypeIndex,
    current_module: &str,
  ) -> Self {
    let entries = dependencies
      .into_iter()
      .filter_map(|id| index.get(id))
      .filter(|shared| shared.module != current_module)
      .map(|shared| (shared.module.clone(), shared.class.to_string()))
      .collect();
    Self { entries }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

impl ToTokens for ImportSet {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    for (module, class) in &self.entries {
      let module = format_ident!("{}", module);
      let class = format_ident!("{}", class);
      quote! { use crate::#module::#class; }.to_tokens(tokens);
    }
  }
}
