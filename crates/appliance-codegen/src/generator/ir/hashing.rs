//! Lookup keys for sensitive fields.
//!
//! Generated clients keep previously seen plaintext and the stored encrypted
//! value for every hashed field in an external store. The store is keyed by the
//! strings derived here, so derivation must be deterministic: the same field in
//! the same tree yields the same key on every run.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::{cursor::NodeCursor, node::NodeKind, path::FieldPath, registry::SchemaRegistry};
use crate::generator::{
  ast::FieldNameToken,
  classify::ClientRepr,
  error::{SchemaError, SchemaResult},
};

pub const KEY_SEPARATOR: char = '|';

const SOLO_TAG: &str = "solo";
const WITH_PARENT_NAME_TAG: &str = "with_parent_name";
const WITH_PARAM_VALUE_TAG: &str = "with_param_value";

/// Policy used to disambiguate the storage key of a sensitive string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawHashProfile", into = "RawHashProfile")]
pub enum HashProfile {
  #[default]
  Plaintext,
  /// The field is the only hashed field of its schema.
  Solo,
  /// Prefix the key with the name of the ancestor `depth` levels up.
  WithAncestor { depth: usize },
  /// Prefix the key with the run-time value of a sibling string field.
  WithSiblingValue { field: String },
}

impl HashProfile {
  #[must_use]
  pub fn is_plaintext(&self) -> bool {
    matches!(self, Self::Plaintext)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawHashProfile {
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  solo: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  with_parent_name: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  with_param_value: Option<String>,
}

impl TryFrom<RawHashProfile> for HashProfile {
  type Error = SchemaError;

  fn try_from(raw: RawHashProfile) -> Result<Self, Self::Error> {
    let mut active = Vec::with_capacity(1);
    if raw.solo {
      active.push(Self::Solo);
    }
    if let Some(depth) = raw.with_parent_name {
      active.push(Self::WithAncestor { depth });
    }
    if let Some(field) = raw.with_param_value {
      active.push(Self::WithSiblingValue { field });
    }

    match active.len() {
      1 => Ok(active.remove(0)),
      0 => Err(SchemaError::InvalidHashProfile {
        reason: "no policy is active".to_string(),
      }),
      count => Err(SchemaError::InvalidHashProfile {
        reason: format!("{count} policies are active, expected exactly one"),
      }),
    }
  }
}

impl From<HashProfile> for RawHashProfile {
  fn from(profile: HashProfile) -> Self {
    match profile {
      HashProfile::Plaintext => Self::default(),
      HashProfile::Solo => Self {
        solo: true,
        ..Self::default()
      },
      HashProfile::WithAncestor { depth } => Self {
        with_parent_name: Some(depth),
        ..Self::default()
      },
      HashProfile::WithSiblingValue { field } => Self {
        with_param_value: Some(field),
        ..Self::default()
      },
    }
  }
}

/// Which stored value a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum KeyKind {
  /// The last plaintext value sent by the caller.
  Plaintext,
  /// The encrypted value echoed back by the appliance.
  Encrypted,
}

impl KeyKind {
  pub const ALL: [Self; 2] = [Self::Plaintext, Self::Encrypted];
}

/// Derived storage key for a hashed field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EncryptionKey {
  Static(String),
  /// Needs the run-time value of a sibling field to complete.
  Dynamic(SiblingValueKey),
}

impl EncryptionKey {
  /// Key string for a given sibling value. Static keys ignore `sibling_value`.
  #[must_use]
  pub fn render(&self, sibling_value: Option<&str>) -> String {
    match self {
      Self::Static(key) => key.clone(),
      Self::Dynamic(key) => key.render(sibling_value),
    }
  }

  #[must_use]
  pub fn as_static(&self) -> Option<&str> {
    match self {
      Self::Static(key) => Some(key),
      Self::Dynamic(_) => None,
    }
  }
}

/// Expression rendering the key from `self`, for use inside a generated method.
impl ToTokens for EncryptionKey {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    match self {
      Self::Static(key) => quote! { #key.to_string() }.to_tokens(tokens),
      Self::Dynamic(key) => key.to_tokens(tokens),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiblingValueKey {
  pub prefix: String,
  /// Internal name of the sibling field.
  pub sibling: String,
  /// Whether the client holds the sibling as `Option<String>`.
  pub sibling_optional: bool,
  pub field: String,
}

impl SiblingValueKey {
  #[must_use]
  pub fn render(&self, sibling_value: Option<&str>) -> String {
    format!(
      "{prefix}{KEY_SEPARATOR}{value}{KEY_SEPARATOR}{field}",
      prefix = self.prefix,
      value = sibling_value.unwrap_or_default(),
      field = self.field,
    )
  }
}

impl ToTokens for SiblingValueKey {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let template = format!(
      "{prefix}{KEY_SEPARATOR}{{}}{KEY_SEPARATOR}{field}",
      prefix = escape_format(&self.prefix),
      field = escape_format(&self.field),
    );
    let sibling = FieldNameToken::from_raw(&self.sibling);
    let value = if self.sibling_optional {
      quote! { self.#sibling.as_deref().unwrap_or_default() }
    } else {
      quote! { self.#sibling.as_str() }
    };
    quote! { format!(#template, #value) }.to_tokens(tokens);
  }
}

fn escape_format(input: &str) -> String {
  input.replace('{', "{{").replace('}', "}}")
}

/// Derives the storage key of the hashed string at `cursor`.
///
/// The registry resolves a referenced sibling so the generated accessor matches
/// how the client struct holds it.
pub fn derive_key(registry: &SchemaRegistry, cursor: &NodeCursor<'_>, kind: KeyKind) -> SchemaResult<EncryptionKey> {
  let path = cursor.path();
  let field = cursor.internal_name();
  let profile = cursor
    .canonical()
    .as_string()
    .map(|spec| &spec.hashing)
    .filter(|profile| !profile.is_plaintext())
    .ok_or_else(|| SchemaError::NotEncrypted { path: path.clone() })?;

  match profile {
    HashProfile::Plaintext => Err(SchemaError::NotEncrypted { path }),
    HashProfile::Solo => Ok(EncryptionKey::Static(join_key(&[SOLO_TAG, kind.as_ref(), field]))),
    HashProfile::WithAncestor { depth } => {
      let ancestor = walk_ancestors(cursor, *depth, &path)?;
      Ok(EncryptionKey::Static(join_key(&[
        WITH_PARENT_NAME_TAG,
        kind.as_ref(),
        ancestor,
        field,
      ])))
    }
    HashProfile::WithSiblingValue { field: sibling } => {
      let parent = cursor.parent();
      let object = parent
        .map(NodeCursor::canonical)
        .and_then(|node| node.as_object())
        .ok_or_else(|| SchemaError::ParentNotObject {
          path: path.clone(),
          sibling: sibling.clone(),
        })?;
      let sibling_node = object.get(sibling).ok_or_else(|| SchemaError::SiblingNotFound {
        path: path.clone(),
        sibling: sibling.clone(),
      })?;
      if sibling_node.kind() != NodeKind::String {
        return Err(SchemaError::SiblingNotString {
          path,
          sibling: sibling.clone(),
          found: sibling_node.kind(),
        });
      }

      let sibling_path = parent
        .map_or_else(FieldPath::root, NodeCursor::path)
        .join(&sibling_node.name);
      let sibling_canonical = registry.resolve_at(&sibling_path, sibling_node)?;

      Ok(EncryptionKey::Dynamic(SiblingValueKey {
        prefix: join_key(&[WITH_PARAM_VALUE_TAG, kind.as_ref(), &sibling_node.name]),
        sibling: sibling_node.name.clone(),
        sibling_optional: ClientRepr::for_node(sibling_node, sibling_canonical).is_optional(),
        field: field.to_string(),
      }))
    }
  }
}

fn walk_ancestors<'a>(cursor: &NodeCursor<'a>, depth: usize, path: &FieldPath) -> SchemaResult<&'a str> {
  if depth == 0 {
    return Err(SchemaError::InvalidAncestorDepth { path: path.clone() });
  }

  let mut current = cursor.parent();
  for _ in 1..depth {
    current = current.and_then(NodeCursor::parent);
  }

  current
    .map(NodeCursor::internal_name)
    .ok_or_else(|| SchemaError::AncestorDepthExceeded {
      path: path.clone(),
      depth,
    })
}

fn join_key(parts: &[&str]) -> String {
  let mut key = String::new();
  for (index, part) in parts.iter().enumerate() {
    if index > 0 {
      key.push(KEY_SEPARATOR);
    }
    key.push_str(part);
  }
  key
}
