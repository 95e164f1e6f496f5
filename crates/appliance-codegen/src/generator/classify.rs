//! Per-target field exposure.
//!
//! The resource target distinguishes required, optional and computed
//! attributes from how a field is used across a namespace's functions. The
//! client target only decides between a plain value and an `Option`.

use std::collections::BTreeSet;

use strum::Display;

use super::{
  error::{SchemaError, SchemaResult},
  ir::{DefaultValue, FieldPath, Namespace, Node, SchemaRegistry},
};

/// Where a top-level field of a schema travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FieldUsage {
  InputOnly,
  OutputOnly,
  InputOutput,
}

/// Top-level field names sent to and returned by a namespace's functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageIndex {
  input: BTreeSet<String>,
  output: BTreeSet<String>,
}

impl UsageIndex {
  pub fn for_namespace(namespace: &Namespace, registry: &SchemaRegistry) -> SchemaResult<Self> {
    Ok(Self {
      input: namespace.input_names(registry)?,
      output: namespace.output_names(registry)?,
    })
  }

  #[must_use]
  pub fn from_sets(
    input: impl IntoIterator<Item = impl Into<String>>,
    output: impl IntoIterator<Item = impl Into<String>>,
  ) -> Self {
    Self {
      input: input.into_iter().map(Into::into).collect(),
      output: output.into_iter().map(Into::into).collect(),
    }
  }

  /// Usage of the top-level field `name`. Fields found in neither set count as
  /// input only.
  #[must_use]
  pub fn usage(&self, name: &str) -> FieldUsage {
    match (self.input.contains(name), self.output.contains(name)) {
      (true, true) => FieldUsage::InputOutput,
      (false, true) => FieldUsage::OutputOnly,
      (true, false) | (false, false) => FieldUsage::InputOnly,
    }
  }
}

/// How a field is exposed by the resource target.
#[derive(Debug, Clone, PartialEq)]
pub enum Exposure {
  Required,
  Optional,
  /// Optional for the caller, filled with `default` when left unset.
  OptionalComputed { default: DefaultValue },
  Computed,
}

impl Exposure {
  #[must_use]
  pub fn is_optional(&self) -> bool {
    matches!(self, Self::Optional | Self::OptionalComputed { .. })
  }

  #[must_use]
  pub fn is_computed(&self) -> bool {
    matches!(self, Self::Computed | Self::OptionalComputed { .. })
  }

  #[must_use]
  pub fn default_value(&self) -> Option<&DefaultValue> {
    match self {
      Self::OptionalComputed { default } => Some(default),
      Self::Required | Self::Optional | Self::Computed => None,
    }
  }
}

/// Classifies a field for the resource target.
///
/// Flags come from the node as declared; the default falls back to the
/// canonical node when the declaration is a reference.
pub fn classify(node: &Node, canonical: &Node, usage: FieldUsage, path: &FieldPath) -> SchemaResult<Exposure> {
  let default = node.default_value().or_else(|| canonical.default_value());

  match usage {
    FieldUsage::InputOnly => match (node.required, node.read_only, default) {
      (true, true, _) => Err(SchemaError::RequiredReadOnly { path: path.clone() }),
      (true, false, None) => Ok(Exposure::Required),
      (_, _, Some(default)) => Ok(Exposure::OptionalComputed { default }),
      (false, _, None) => Ok(Exposure::Optional),
    },
    // Sent and echoed back: never optional+computed.
    FieldUsage::InputOutput if node.read_only => Ok(Exposure::Computed),
    FieldUsage::InputOutput => Ok(Exposure::Optional),
    FieldUsage::OutputOnly if node.required && !node.read_only => {
      Err(SchemaError::RequiredOutputOnly { path: path.clone() })
    }
    FieldUsage::OutputOnly => Ok(Exposure::Computed),
  }
}

/// How the client target holds a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRepr {
  Value,
  Optional,
}

impl ClientRepr {
  #[must_use]
  pub fn for_node(node: &Node, canonical: &Node) -> Self {
    if node.required && !node.has_default() && !canonical.has_default() {
      Self::Value
    } else {
      Self::Optional
    }
  }

  #[must_use]
  pub fn is_optional(self) -> bool {
    matches!(self, Self::Optional)
  }
}
