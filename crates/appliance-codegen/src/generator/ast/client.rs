use std::collections::BTreeSet;

use bon::Builder;
use http::Method;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use super::{Documentation, FieldNameToken, TypeNameToken};
use crate::generator::ir::{EncryptionKey, KeyKind, ParameterLocation};

/// Rust type of a client field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientType {
  Bool,
  Int,
  Float,
  String,
  /// Any-typed value.
  Json,
  Named(TypeNameToken),
  List(Box<ClientType>),
}

impl ClientType {
  #[must_use]
  pub fn list(element: ClientType) -> Self {
    Self::List(Box::new(element))
  }
}

impl ToTokens for ClientType {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ty = match self {
      Self::Bool => quote! { bool },
      Self::Int => quote! { i64 },
      Self::Float => quote! { f64 },
      Self::String => quote! { String },
      Self::Json => quote! { serde_json::Value },
      Self::Named(name) => quote! { #name },
      Self::List(element) => quote! { Vec<#element> },
    };
    ty.to_tokens(tokens);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ClientField {
  pub name: FieldNameToken,
  /// Name on the wire, used for `serde(rename)` when it differs.
  #[builder(into)]
  pub wire_name: String,
  #[builder(default)]
  pub docs: Documentation,
  pub rust_type: ClientType,
  #[builder(default)]
  pub optional: bool,
  pub location: Option<ParameterLocation>,
}

impl ClientField {
  #[must_use]
  pub fn needs_rename(&self) -> bool {
    self.name.unraw() != self.wire_name
  }
}

/// Accessor returning the store key of an encrypted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMethod {
  pub name: FieldNameToken,
  pub kind: KeyKind,
  pub key: EncryptionKey,
}

impl KeyMethod {
  #[must_use]
  pub fn new(field: &FieldNameToken, kind: KeyKind, key: EncryptionKey) -> Self {
    Self {
      name: field.with_suffix(&format!("_{kind}_key")),
      kind,
      key,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct ClientStruct {
  pub name: TypeNameToken,
  #[builder(default)]
  pub docs: Documentation,
  #[builder(default)]
  pub fields: Vec<ClientField>,
  #[builder(default)]
  pub key_methods: Vec<KeyMethod>,
}

/// Placeholder in a URI template bound to an input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParam {
  pub placeholder: String,
  pub field: FieldNameToken,
  pub optional: bool,
}

/// Input struct of one function, carrying its method and URI template.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct InputStruct {
  pub def: ClientStruct,
  pub method: Method,
  #[builder(into)]
  pub uri_template: String,
  #[builder(default)]
  pub uri_params: Vec<UriParam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDef {
  Alias {
    name: TypeNameToken,
    docs: Documentation,
    target: ClientType,
  },
  Struct(ClientStruct),
}

impl OutputDef {
  #[must_use]
  pub fn name(&self) -> &TypeNameToken {
    match self {
      Self::Alias { name, .. } => name,
      Self::Struct(def) => &def.name,
    }
  }
}

/// Everything the client target emits for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientModule {
  pub structs: Vec<ClientStruct>,
  pub inputs: Vec<InputStruct>,
  pub outputs: Vec<OutputDef>,
  /// Registry ids of shared types referenced by name.
  pub dependencies: BTreeSet<String>,
}

impl ClientModule {
  #[must_use]
  pub fn struct_count(&self) -> usize {
    self.structs.len()
      + self.inputs.len()
      + self
        .outputs
        .iter()
        .filter(|output| matches!(output, OutputDef::Struct(_)))
        .count()
  }

  #[must_use]
  pub fn key_method_count(&self) -> usize {
    self
      .structs
      .iter()
      .chain(self.inputs.iter().map(|input| &input.def))
      .chain(self.outputs.iter().filter_map(|output| match output {
        OutputDef::Struct(def) => Some(def),
        OutputDef::Alias { .. } => None,
      }))
      .map(|def| def.key_methods.len())
      .sum()
  }

  pub fn extend(&mut self, other: ClientModule) {
    self.structs.extend(other.structs);
    self.inputs.extend(other.inputs);
    self.outputs.extend(other.outputs);
    self.dependencies.extend(other.dependencies);
  }
}
