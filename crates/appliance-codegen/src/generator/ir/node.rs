use std::{
  collections::BTreeSet,
  fmt::{Display, Formatter},
};

use bon::Builder;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::{hashing::HashProfile, path::FieldPath};
use crate::{
  generator::error::{SchemaError, SchemaResult},
  naming::identifiers::{to_pascal_display_name, to_snake_display_name},
};

/// Where an operation parameter travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParameterLocation {
  Path,
  Query,
  Body,
}

/// Variant tag of a [`NodeSpec`], used for kind checks and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
  Bool,
  Int,
  Float,
  String,
  Array,
  Object,
}

/// Static default carried by a scalar node.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
}

impl Display for DefaultValue {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Bool(value) => write!(f, "{value}"),
      Self::Int(value) => write!(f, "{value}"),
      Self::Float(value) => write!(f, "{value}"),
      Self::String(value) => write!(f, "{value:?}"),
    }
  }
}

/// One element of the schema IR.
///
/// Identity and flags are shared by every variant; the variant payload lives in
/// [`NodeSpec`]. A node never points at its parent: upward navigation is done with a
/// [`NodeCursor`](super::NodeCursor) built while walking the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Node {
  /// Internal (wire) name.
  #[serde(default)]
  #[builder(into, default)]
  pub name: String,
  /// Registry id of the canonical node this one stands for.
  #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
  #[builder(into)]
  pub reference: Option<String>,
  /// Short name of the module owning the generated type.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[builder(into)]
  pub module: Option<String>,
  #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
  pub location: Option<ParameterLocation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[builder(into)]
  pub description: Option<String>,
  #[serde(default)]
  #[builder(default)]
  pub required: bool,
  #[serde(default)]
  #[builder(default)]
  pub read_only: bool,
  /// Changing the value forces the resource to be replaced.
  #[serde(default)]
  #[builder(default)]
  pub replace_on_change: bool,
  #[serde(flatten)]
  #[builder(into)]
  pub spec: NodeSpec,
}

impl Node {
  #[must_use]
  pub fn new(name: impl Into<String>, spec: impl Into<NodeSpec>) -> Self {
    Self::builder().name(name).spec(spec).build()
  }

  #[must_use]
  pub fn kind(&self) -> NodeKind {
    self.spec.kind()
  }

  /// `snake_case` display name.
  #[must_use]
  pub fn snake_name(&self) -> String {
    to_snake_display_name(&self.name)
  }

  /// `PascalCase` display name.
  #[must_use]
  pub fn pascal_name(&self) -> String {
    to_pascal_display_name(&self.name)
  }

  #[must_use]
  pub fn is_reference(&self) -> bool {
    self.reference.as_deref().is_some_and(|id| !id.is_empty())
  }

  #[must_use]
  pub fn reference_id(&self) -> Option<&str> {
    self.reference.as_deref().filter(|id| !id.is_empty())
  }

  #[must_use]
  pub fn default_value(&self) -> Option<DefaultValue> {
    self.spec.default_value()
  }

  #[must_use]
  pub fn has_default(&self) -> bool {
    self.spec.default_value().is_some()
  }

  #[must_use]
  pub fn is_encrypted(&self) -> bool {
    self.as_string().is_some_and(StringSpec::is_encrypted)
  }

  #[must_use]
  pub fn as_object(&self) -> Option<&ObjectSpec> {
    match &self.spec {
      NodeSpec::Object(spec) => Some(spec),
      _ => None,
    }
  }

  pub fn as_object_mut(&mut self) -> Option<&mut ObjectSpec> {
    match &mut self.spec {
      NodeSpec::Object(spec) => Some(spec),
      _ => None,
    }
  }

  #[must_use]
  pub fn as_array(&self) -> Option<&ArraySpec> {
    match &self.spec {
      NodeSpec::Array(spec) => Some(spec),
      _ => None,
    }
  }

  #[must_use]
  pub fn as_string(&self) -> Option<&StringSpec> {
    match &self.spec {
      NodeSpec::String(spec) => Some(spec),
      _ => None,
    }
  }

  /// Every reference id mentioned anywhere below (and including) this node.
  pub fn collect_reference_ids(&self, ids: &mut BTreeSet<String>) {
    if let Some(id) = self.reference_id() {
      ids.insert(id.to_string());
    }
    match &self.spec {
      NodeSpec::Array(spec) => spec.element.collect_reference_ids(ids),
      NodeSpec::Object(spec) => {
        for child in spec.children() {
          child.collect_reference_ids(ids);
        }
      }
      NodeSpec::Bool(_) | NodeSpec::Int(_) | NodeSpec::Float(_) | NodeSpec::String(_) => {}
    }
  }

  /// Checks object invariants (group membership) and float bounds through the
  /// whole subtree.
  pub fn validate(&self, path: &FieldPath) -> SchemaResult<()> {
    match &self.spec {
      NodeSpec::Object(spec) => {
        spec.validate_groups(path)?;
        for child in spec.children() {
          child.validate(&path.join(&child.name))?;
        }
        Ok(())
      }
      NodeSpec::Array(spec) => spec.element.validate(path),
      NodeSpec::Float(spec) => spec.validate_finite(path),
      NodeSpec::Bool(_) | NodeSpec::Int(_) | NodeSpec::String(_) => Ok(()),
    }
  }
}

/// Variant payload of a [`Node`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeSpec {
  Bool(BoolSpec),
  Int(IntSpec),
  Float(FloatSpec),
  String(StringSpec),
  Array(ArraySpec),
  Object(ObjectSpec),
}

impl NodeSpec {
  #[must_use]
  pub fn kind(&self) -> NodeKind {
    match self {
      Self::Bool(_) => NodeKind::Bool,
      Self::Int(_) => NodeKind::Int,
      Self::Float(_) => NodeKind::Float,
      Self::String(_) => NodeKind::String,
      Self::Array(_) => NodeKind::Array,
      Self::Object(_) => NodeKind::Object,
    }
  }

  #[must_use]
  pub fn default_value(&self) -> Option<DefaultValue> {
    match self {
      Self::Bool(spec) => spec.default.map(DefaultValue::Bool),
      Self::Int(spec) => spec.default.map(DefaultValue::Int),
      Self::Float(spec) => spec.default.map(DefaultValue::Float),
      Self::String(spec) => spec.default.clone().map(DefaultValue::String),
      Self::Array(_) | Self::Object(_) => None,
    }
  }
}

impl From<BoolSpec> for NodeSpec {
  fn from(spec: BoolSpec) -> Self {
    Self::Bool(spec)
  }
}

impl From<IntSpec> for NodeSpec {
  fn from(spec: IntSpec) -> Self {
    Self::Int(spec)
  }
}

impl From<FloatSpec> for NodeSpec {
  fn from(spec: FloatSpec) -> Self {
    Self::Float(spec)
  }
}

impl From<StringSpec> for NodeSpec {
  fn from(spec: StringSpec) -> Self {
    Self::String(spec)
  }
}

impl From<ArraySpec> for NodeSpec {
  fn from(spec: ArraySpec) -> Self {
    Self::Array(spec)
  }
}

impl From<ObjectSpec> for NodeSpec {
  fn from(spec: ObjectSpec) -> Self {
    Self::Object(spec)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct BoolSpec {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<bool>,
  /// Any-typed value; the client side holds it as raw JSON.
  #[serde(default)]
  #[builder(default)]
  pub opaque: bool,
}

pub type IntSpec = NumberSpec<i64>;
pub type FloatSpec = NumberSpec<f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
pub struct NumberSpec<T> {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min: Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max: Option<T>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  #[builder(default)]
  pub values: Vec<T>,
}

impl FloatSpec {
  /// Rejects infinities and NaN, which YAML documents can spell as `.inf` or `.nan`.
  pub fn validate_finite(&self, path: &FieldPath) -> SchemaResult<()> {
    let bounds = [("default", self.default), ("min", self.min), ("max", self.max)]
      .into_iter()
      .filter_map(|(bound, value)| value.map(|value| (bound, value)))
      .chain(self.values.iter().map(|value| ("value", *value)));

    for (bound, value) in bounds {
      if !value.is_finite() {
        return Err(SchemaError::NonFiniteNumber {
          path: path.clone(),
          bound,
          value: value.to_string(),
        });
      }
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct StringSpec {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[builder(into)]
  pub default: Option<String>,
  #[serde(default)]
  #[builder(default)]
  pub sensitive: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_length: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_length: Option<u64>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  #[builder(default)]
  pub values: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[builder(into)]
  pub regex: Option<String>,
  #[serde(default, skip_serializing_if = "HashProfile::is_plaintext")]
  #[builder(default)]
  pub hashing: HashProfile,
  /// Only meaningful on override documents: edits applied to the base `values`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub values_patch: Option<ValuesPatch>,
}

impl StringSpec {
  #[must_use]
  pub fn is_encrypted(&self) -> bool {
    !self.hashing.is_plaintext()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct ValuesPatch {
  #[serde(default)]
  #[builder(default)]
  pub add: Vec<String>,
  #[serde(default)]
  #[builder(default)]
  pub remove: Vec<String>,
}

impl ValuesPatch {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.add.is_empty() && self.remove.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ArraySpec {
  #[builder(into)]
  pub element: Box<Node>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_items: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_items: Option<u64>,
  #[serde(default)]
  #[builder(default)]
  pub unordered: bool,
}

/// Named children of an object node.
///
/// Children keep their declaration order; renderers sort them by display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObjectSpec", into = "RawObjectSpec")]
pub struct ObjectSpec {
  params: IndexMap<String, Node>,
  groups: Vec<Vec<String>>,
  pub class_name: Option<String>,
}

impl ObjectSpec {
  pub fn try_from_params(params: impl IntoIterator<Item = Node>) -> SchemaResult<Self> {
    let mut spec = Self::default();
    for node in params {
      spec.insert_at(&FieldPath::root(), node)?;
    }
    Ok(spec)
  }

  pub fn insert_at(&mut self, path: &FieldPath, node: Node) -> SchemaResult<()> {
    if self.params.contains_key(&node.name) {
      return Err(SchemaError::DuplicateField {
        path: path.clone(),
        name: node.name,
      });
    }
    self.params.insert(node.name.clone(), node);
    Ok(())
  }

  /// Registers a mutually-exclusive group; every member must already be a child.
  pub fn add_group(&mut self, path: &FieldPath, members: Vec<String>) -> SchemaResult<()> {
    if let Some(member) = members.iter().find(|member| !self.params.contains_key(*member)) {
      return Err(SchemaError::UnknownGroupMember {
        path: path.clone(),
        member: member.clone(),
      });
    }
    if !self.groups.contains(&members) {
      self.groups.push(members);
    }
    Ok(())
  }

  pub fn validate_groups(&self, path: &FieldPath) -> SchemaResult<()> {
    for member in self.groups.iter().flatten() {
      if !self.params.contains_key(member) {
        return Err(SchemaError::UnknownGroupMember {
          path: path.clone(),
          member: member.clone(),
        });
      }
    }
    Ok(())
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&Node> {
    self.params.get(name)
  }

  pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
    self.params.get_mut(name)
  }

  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.params.contains_key(name)
  }

  /// Children in declaration order.
  pub fn children(&self) -> impl Iterator<Item = &Node> {
    self.params.values()
  }

  /// Children ordered by `snake_case` display name, then internal name.
  #[must_use]
  pub fn sorted_children(&self) -> Vec<&Node> {
    self
      .params
      .values()
      .sorted_by_cached_key(|node| (node.snake_name(), node.name.clone()))
      .collect()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.params.keys().map(String::as_str)
  }

  #[must_use]
  pub fn groups(&self) -> &[Vec<String>] {
    &self.groups
  }

  /// The mutually-exclusive group a child belongs to, if any.
  #[must_use]
  pub fn group_of(&self, name: &str) -> Option<&[String]> {
    self
      .groups
      .iter()
      .find(|group| group.iter().any(|member| member == name))
      .map(Vec::as_slice)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.params.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.params.is_empty()
  }

  pub(super) fn take_params(&mut self) -> IndexMap<String, Node> {
    std::mem::take(&mut self.params)
  }

  pub(super) fn take_groups(&mut self) -> Vec<Vec<String>> {
    std::mem::take(&mut self.groups)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawObjectSpec {
  #[serde(default)]
  params: Vec<Node>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  one_of: Vec<Vec<String>>,
  #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
  class_name: Option<String>,
}

impl TryFrom<RawObjectSpec> for ObjectSpec {
  type Error = SchemaError;

  fn try_from(raw: RawObjectSpec) -> Result<Self, Self::Error> {
    let root = FieldPath::root();
    let mut spec = Self::try_from_params(raw.params)?;
    for group in raw.one_of {
      spec.add_group(&root, group)?;
    }
    spec.class_name = raw.class_name.filter(|name| !name.is_empty());
    Ok(spec)
  }
}

impl From<ObjectSpec> for RawObjectSpec {
  fn from(spec: ObjectSpec) -> Self {
    Self {
      params: spec.params.into_values().collect(),
      one_of: spec.groups,
      class_name: spec.class_name,
    }
  }
}
