use std::fmt::{Display, Formatter};

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident};

use crate::naming::identifiers::{to_declared_type_name, to_rust_field_name, to_rust_type_name};

/// Field or method identifier, possibly raw (`r#type`).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldNameToken(String);

impl FieldNameToken {
  /// Sanitizes an internal name into a `snake_case` identifier.
  #[must_use]
  pub fn from_raw(name: &str) -> Self {
    Self(to_rust_field_name(name))
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Identifier text without a raw prefix, for building derived names.
  #[must_use]
  pub fn unraw(&self) -> &str {
    self.0.strip_prefix("r#").unwrap_or(&self.0)
  }

  /// Derived identifier `<self><suffix>`, e.g. `password_plaintext_key`.
  #[must_use]
  pub fn with_suffix(&self, suffix: &str) -> Self {
    Self(format!("{}{suffix}", self.unraw()))
  }
}

impl Display for FieldNameToken {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl ToTokens for FieldNameToken {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    format_ident!("{}", self.0).to_tokens(tokens);
  }
}

/// Struct or alias identifier in `PascalCase`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeNameToken(String);

impl TypeNameToken {
  #[must_use]
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  #[must_use]
  pub fn from_raw(name: &str) -> Self {
    Self(to_rust_type_name(name))
  }

  /// A name the document chose (an object `class`), kept as written when valid.
  #[must_use]
  pub fn from_declared(name: &str) -> Self {
    Self(to_declared_type_name(name))
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// `<self><Child>` for a struct nested under this one.
  #[must_use]
  pub fn nested(&self, child: &str) -> Self {
    Self(format!("{}{}", self.0, to_rust_type_name(child)))
  }
}

impl Display for TypeNameToken {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl ToTokens for TypeNameToken {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    format_ident!("{}", self.0).to_tokens(tokens);
  }
}

impl PartialEq<&str> for TypeNameToken {
  fn eq(&self, other: &&str) -> bool {
    self.0 == *other
  }
}
