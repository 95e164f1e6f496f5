use std::{
  collections::{BTreeMap, BTreeSet},
  sync::LazyLock,
};

use bon::Builder;
use http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::{
  node::{Node, ObjectSpec, ParameterLocation},
  path::FieldPath,
  registry::SchemaRegistry,
};
use crate::{
  generator::error::{SchemaError, SchemaResult},
  naming::{identifiers::to_rust_module_name, slug::SlugLedger},
};

static URI_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid regex"));

/// Name given to the request body inside an itemized input object.
pub const REQUEST_BODY_NAME: &str = "request";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
  Create,
  Read,
  Update,
  Delete,
  List,
  Other,
}

/// One API call: method, URI template, parameters and payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
pub struct Function {
  #[serde(default)]
  #[builder(into, default)]
  pub name: String,
  #[serde(default, with = "method_serde", skip_serializing_if = "Option::is_none")]
  pub method: Option<Method>,
  #[serde(default)]
  #[builder(into, default)]
  pub uri: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  #[builder(default)]
  pub path_params: Vec<Node>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  #[builder(default)]
  pub query_params: Vec<Node>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub body: Option<Node>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output: Option<Node>,
}

impl Function {
  /// HTTP method, `GET` when the document leaves it out.
  #[must_use]
  pub fn http_method(&self) -> Method {
    self.method.clone().unwrap_or(Method::GET)
  }

  /// Placeholder names in the URI template, in order of appearance.
  pub fn placeholders(&self) -> impl Iterator<Item = &str> {
    URI_PLACEHOLDER
      .captures_iter(&self.uri)
      .filter_map(|captures| captures.get(1))
      .map(|found| found.as_str())
  }

  pub fn validate(&self) -> SchemaResult<()> {
    for param in self.placeholders() {
      if !self.path_params.iter().any(|node| node.name == param) {
        return Err(SchemaError::UnknownPathParameter {
          function: self.name.clone(),
          uri: self.uri.clone(),
          param: param.to_string(),
        });
      }
    }

    let path = FieldPath::new(&self.name);
    for node in self.path_params.iter().chain(&self.query_params) {
      node.validate(&path.join(&node.name))?;
    }
    for node in self.body.iter().chain(&self.output) {
      node.validate(&path)?;
    }
    Ok(())
  }

  /// Folds path parameters, query parameters and the body (as `request`) into one
  /// object. Every child carries its location tag.
  pub fn itemize_input(&self) -> SchemaResult<Node> {
    let located = self
      .path_params
      .iter()
      .map(|node| (ParameterLocation::Path, node.clone()))
      .chain(
        self
          .query_params
          .iter()
          .map(|node| (ParameterLocation::Query, node.clone())),
      )
      .chain(self.body.iter().map(|node| {
        let mut body = node.clone();
        body.name = REQUEST_BODY_NAME.to_string();
        (ParameterLocation::Body, body)
      }));

    let mut object = ObjectSpec::default();
    let mut seen = BTreeMap::new();
    for (location, mut node) in located {
      if let Some(first) = seen.get(&node.name) {
        return Err(SchemaError::InputNameCollision {
          function: self.name.clone(),
          name: node.name,
          first: *first,
          second: location,
        });
      }
      seen.insert(node.name.clone(), location);
      node.location = Some(location);
      object.insert_at(&FieldPath::new(&self.name), node)?;
    }

    Ok(Node::new(self.name.clone(), object))
  }

  /// Parameter names plus top-level body fields.
  pub fn input_names(&self, registry: &SchemaRegistry) -> SchemaResult<BTreeSet<String>> {
    let mut names: BTreeSet<String> = self
      .path_params
      .iter()
      .chain(&self.query_params)
      .map(|node| node.name.clone())
      .collect();
    if let Some(body) = &self.body {
      names.extend(top_level_names(registry, body)?);
    }
    Ok(names)
  }

  pub fn output_names(&self, registry: &SchemaRegistry) -> SchemaResult<BTreeSet<String>> {
    match &self.output {
      Some(output) => top_level_names(registry, output),
      None => Ok(BTreeSet::new()),
    }
  }

  pub fn merge(&mut self, overlay: Function) -> SchemaResult<()> {
    if !overlay.name.is_empty() {
      self.name = overlay.name;
    }
    if overlay.method.is_some() {
      self.method = overlay.method;
    }
    if !overlay.uri.is_empty() {
      self.uri = overlay.uri;
    }

    let path = FieldPath::new(&self.name);
    merge_params(&path, &mut self.path_params, overlay.path_params)?;
    merge_params(&path, &mut self.query_params, overlay.query_params)?;
    merge_slot(&path, &mut self.body, overlay.body)?;
    merge_slot(&path, &mut self.output, overlay.output)
  }
}

/// Field names of an object payload, or of the element object of an array payload
/// such as a `list` output.
fn top_level_names(registry: &SchemaRegistry, node: &Node) -> SchemaResult<BTreeSet<String>> {
  let canonical = registry.resolve(node)?;
  let object = match canonical.as_array() {
    Some(array) => registry.resolve(&array.element)?.as_object(),
    None => canonical.as_object(),
  };
  Ok(
    object
      .map(|object| object.names().map(str::to_string).collect())
      .unwrap_or_default(),
  )
}

fn merge_params(path: &FieldPath, base: &mut Vec<Node>, overlay: Vec<Node>) -> SchemaResult<()> {
  for node in overlay {
    match base.iter_mut().find(|existing| existing.name == node.name) {
      Some(existing) => {
        let child_path = path.join(&node.name);
        existing.merge_at(&child_path, node)?;
      }
      None => base.push(node),
    }
  }
  Ok(())
}

fn merge_slot(path: &FieldPath, base: &mut Option<Node>, overlay: Option<Node>) -> SchemaResult<()> {
  match (base.as_mut(), overlay) {
    (Some(existing), Some(node)) => existing.merge_at(path, node),
    (None, Some(node)) => {
      *base = Some(node);
      Ok(())
    }
    (_, None) => Ok(()),
  }
}

/// The operations exposed for one schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
pub struct Namespace {
  #[builder(into)]
  pub name: String,
  /// Registry id of the schema the namespace manages.
  #[serde(default)]
  #[builder(into, default)]
  pub schema: String,
  /// Output module, defaults to the `snake_case` namespace name.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[builder(into)]
  pub module: Option<String>,
  /// Short identifier assigned once per run.
  #[serde(skip)]
  pub slug: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub create: Option<Function>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub read: Option<Function>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub update: Option<Function>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub delete: Option<Function>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub list: Option<Function>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  #[builder(default)]
  pub functions: BTreeMap<String, Function>,
}

impl Namespace {
  /// Well-known functions first, in CRUD-then-list order, then the named ones.
  #[must_use]
  pub fn functions(&self) -> Vec<(OperationKind, &Function)> {
    [
      (OperationKind::Create, &self.create),
      (OperationKind::Read, &self.read),
      (OperationKind::Update, &self.update),
      (OperationKind::Delete, &self.delete),
      (OperationKind::List, &self.list),
    ]
    .into_iter()
    .filter_map(|(kind, function)| function.as_ref().map(|function| (kind, function)))
    .chain(self.functions.values().map(|function| (OperationKind::Other, function)))
    .collect()
  }

  /// Fills in function names the document left implicit.
  pub fn normalize(&mut self) {
    for (kind, slot) in [
      (OperationKind::Create, &mut self.create),
      (OperationKind::Read, &mut self.read),
      (OperationKind::Update, &mut self.update),
      (OperationKind::Delete, &mut self.delete),
      (OperationKind::List, &mut self.list),
    ] {
      if let Some(function) = slot
        && function.name.is_empty()
      {
        function.name = kind.to_string();
      }
    }
    for (key, function) in &mut self.functions {
      if function.name.is_empty() {
        function.name.clone_from(key);
      }
    }
  }

  /// Output module, always a valid module name.
  #[must_use]
  pub fn module_name(&self) -> String {
    let module = self.module.as_deref().filter(|module| !module.is_empty());
    to_rust_module_name(module.unwrap_or(&self.name))
  }

  /// Stem of the generated `<stem>_client.rs` and `<stem>_resource.rs` files.
  #[must_use]
  pub fn file_stem(&self) -> String {
    to_rust_module_name(&self.name)
  }

  pub fn assign_slug(&mut self, ledger: &mut SlugLedger) -> &str {
    self.slug.insert(ledger.assign(&self.name))
  }

  pub fn validate(&self) -> SchemaResult<()> {
    for (_, function) in self.functions() {
      function.validate()?;
    }
    Ok(())
  }

  pub fn input_names(&self, registry: &SchemaRegistry) -> SchemaResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for (_, function) in self.functions() {
      names.extend(function.input_names(registry)?);
    }
    Ok(names)
  }

  pub fn output_names(&self, registry: &SchemaRegistry) -> SchemaResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for (_, function) in self.functions() {
      names.extend(function.output_names(registry)?);
    }
    Ok(names)
  }

  pub fn merge(&mut self, overlay: Namespace) -> SchemaResult<()> {
    if !overlay.schema.is_empty() {
      self.schema = overlay.schema;
    }
    if overlay.module.as_deref().is_some_and(|module| !module.is_empty()) {
      self.module = overlay.module;
    }

    for (base, function) in [
      (&mut self.create, overlay.create),
      (&mut self.read, overlay.read),
      (&mut self.update, overlay.update),
      (&mut self.delete, overlay.delete),
      (&mut self.list, overlay.list),
    ] {
      merge_function(base, function)?;
    }
    for (key, function) in overlay.functions {
      match self.functions.get_mut(&key) {
        Some(existing) => existing.merge(function)?,
        None => {
          self.functions.insert(key, function);
        }
      }
    }
    Ok(())
  }
}

fn merge_function(base: &mut Option<Function>, overlay: Option<Function>) -> SchemaResult<()> {
  match (base.as_mut(), overlay) {
    (Some(existing), Some(function)) => existing.merge(function),
    (None, Some(function)) => {
      *base = Some(function);
      Ok(())
    }
    (_, None) => Ok(()),
  }
}

mod method_serde {
  use std::str::FromStr;

  use http::Method;
  use serde::{Deserialize, Deserializer, Serializer, de::Error};

  #[allow(clippy::ref_option)]
  pub(super) fn serialize<S: Serializer>(method: &Option<Method>, serializer: S) -> Result<S::Ok, S::Error> {
    match method {
      Some(method) => serializer.serialize_str(method.as_str()),
      None => serializer.serialize_none(),
    }
  }

  pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Method>, D::Error> {
    Option::<String>::deserialize(deserializer)?
      .map(|raw| Method::from_str(&raw.to_ascii_uppercase()).map_err(D::Error::custom))
      .transpose()
  }
}
