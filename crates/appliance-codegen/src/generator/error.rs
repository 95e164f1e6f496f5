use super::ir::{FieldPath, NodeKind, ParameterLocation};

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Failure raised while building, merging, resolving or rendering the schema IR.
///
/// Every variant carries the field path it was raised at so the surrounding tool
/// can report `schema / field / message` before giving up on the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
  #[error("duplicate field '{name}' in '{path}'")]
  DuplicateField { path: FieldPath, name: String },

  #[error("cannot merge a {overlay} override into {base} field '{path}'")]
  VariantMismatch {
    path: FieldPath,
    base: NodeKind,
    overlay: NodeKind,
  },

  #[error("invalid hashing profile: {reason}")]
  InvalidHashProfile { reason: String },

  #[error("field '{path}' has a non-finite {bound} ({value})")]
  NonFiniteNumber {
    path: FieldPath,
    bound: &'static str,
    value: String,
  },

  #[error("mutually exclusive group in '{path}' names unknown field '{member}'")]
  UnknownGroupMember { path: FieldPath, member: String },

  #[error("uri '{uri}' of function '{function}' uses undeclared path parameter '{param}'")]
  UnknownPathParameter {
    function: String,
    uri: String,
    param: String,
  },

  #[error("unknown reference '{reference}' at '{path}'")]
  UnknownReference { path: FieldPath, reference: String },

  #[error("reference '{reference}' at '{path}' resolves to {found}, expected {expected}")]
  KindMismatch {
    path: FieldPath,
    reference: String,
    expected: NodeKind,
    found: NodeKind,
  },

  #[error("reference '{reference}' at '{path}' points at an entry that itself references '{target}'")]
  ChainedReference {
    path: FieldPath,
    reference: String,
    target: String,
  },

  #[error("reference '{reference}' at '{path}' expands into itself")]
  ReferenceCycle { path: FieldPath, reference: String },

  #[error("schema root '{path}' must be an object, found {found}")]
  RootNotObject { path: FieldPath, found: NodeKind },

  #[error("field '{path}' is required input but marked read-only")]
  RequiredReadOnly { path: FieldPath },

  #[error("field '{path}' is required but never accepted as input")]
  RequiredOutputOnly { path: FieldPath },

  #[error("input '{name}' of function '{function}' is declared as both {first} and {second}")]
  InputNameCollision {
    function: String,
    name: String,
    first: ParameterLocation,
    second: ParameterLocation,
  },

  #[error("field '{path}' has no active hashing profile")]
  NotEncrypted { path: FieldPath },

  #[error("hashing ancestor depth for '{path}' must be at least 1")]
  InvalidAncestorDepth { path: FieldPath },

  #[error("hashing ancestor depth {depth} exceeds the tree depth at '{path}'")]
  AncestorDepthExceeded { path: FieldPath, depth: usize },

  #[error("field '{path}' hashes with sibling '{sibling}' but its parent is not an object")]
  ParentNotObject { path: FieldPath, sibling: String },

  #[error("field '{path}' hashes with sibling '{sibling}' which does not exist")]
  SiblingNotFound { path: FieldPath, sibling: String },

  #[error("field '{path}' hashes with sibling '{sibling}' which is {found}, expected string")]
  SiblingNotString {
    path: FieldPath,
    sibling: String,
    found: NodeKind,
  },
}

impl SchemaError {
  /// Field path the error was raised at, when it has one.
  #[must_use]
  pub fn path(&self) -> Option<&FieldPath> {
    match self {
      Self::DuplicateField { path, .. }
      | Self::VariantMismatch { path, .. }
      | Self::NonFiniteNumber { path, .. }
      | Self::UnknownGroupMember { path, .. }
      | Self::UnknownReference { path, .. }
      | Self::KindMismatch { path, .. }
      | Self::ChainedReference { path, .. }
      | Self::ReferenceCycle { path, .. }
      | Self::RootNotObject { path, .. }
      | Self::RequiredReadOnly { path }
      | Self::RequiredOutputOnly { path }
      | Self::NotEncrypted { path }
      | Self::InvalidAncestorDepth { path }
      | Self::AncestorDepthExceeded { path, .. }
      | Self::ParentNotObject { path, .. }
      | Self::SiblingNotFound { path, .. }
      | Self::SiblingNotString { path, .. } => Some(path),
      Self::InvalidHashProfile { .. } | Self::UnknownPathParameter { .. } | Self::InputNameCollision { .. } => None,
    }
  }
}
