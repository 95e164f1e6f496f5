use bon::Builder;
use proc_macro2::{Literal as LitToken, TokenStream};
use quote::{ToTokens, format_ident, quote};

use super::{Documentation, FieldNameToken};
use crate::generator::{classify::Exposure, ir::DefaultValue};

/// Element type of a plain (non-nested) list attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
  Bool,
  Int64,
  Float64,
  String,
  /// Objects nested below a list of lists, held as raw JSON.
  Json,
  List(Box<ElementType>),
}

impl ToTokens for ElementType {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ty = match self {
      Self::Bool => quote! { ElementType::Bool },
      Self::Int64 => quote! { ElementType::Int64 },
      Self::Float64 => quote! { ElementType::Float64 },
      Self::String => quote! { ElementType::String },
      Self::Json => quote! { ElementType::Json },
      Self::List(element) => quote! { ElementType::list(#element) },
    };
    ty.to_tokens(tokens);
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
  Bool,
  Int64,
  Float64,
  String,
  SingleNested(Vec<AttributeDef>),
  ListNested(Vec<AttributeDef>),
  List(ElementType),
}

/// Validator module a constraint is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorFamily {
  Int64,
  Float64,
  String,
  List,
}

impl ValidatorFamily {
  fn module(self) -> proc_macro2::Ident {
    match self {
      Self::Int64 => format_ident!("int64_validator"),
      Self::Float64 => format_ident!("float64_validator"),
      Self::String => format_ident!("string_validator"),
      Self::List => format_ident!("list_validator"),
    }
  }

  /// Function names for (both bounds, lower only, upper only).
  fn range_functions(self) -> [&'static str; 3] {
    match self {
      Self::Int64 | Self::Float64 => ["between", "at_least", "at_most"],
      Self::String => ["length_between", "length_at_least", "length_at_most"],
      Self::List => ["size_between", "size_at_least", "size_at_most"],
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
  Int(i64),
  Float(f64),
  Size(u64),
  Str(String),
}

impl ToTokens for Literal {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    match self {
      Self::Int(value) => LitToken::i64_unsuffixed(*value).to_tokens(tokens),
      Self::Float(value) if value.is_finite() => LitToken::f64_unsuffixed(*value).to_tokens(tokens),
      Self::Float(value) if value.is_nan() => quote! { f64::NAN }.to_tokens(tokens),
      Self::Float(value) if value.is_sign_negative() => quote! { f64::NEG_INFINITY }.to_tokens(tokens),
      Self::Float(_) => quote! { f64::INFINITY }.to_tokens(tokens),
      Self::Size(value) => LitToken::u64_unsuffixed(*value).to_tokens(tokens),
      Self::Str(value) => value.to_tokens(tokens),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
  Range {
    family: ValidatorFamily,
    min: Option<Literal>,
    max: Option<Literal>,
  },
  OneOf {
    family: ValidatorFamily,
    values: Vec<Literal>,
  },
  RegexMatches(String),
  ExactlyOneOf(Vec<String>),
}

impl Validator {
  /// A range validator, or `None` when neither bound is set.
  #[must_use]
  pub fn range(family: ValidatorFamily, min: Option<Literal>, max: Option<Literal>) -> Option<Self> {
    (min.is_some() || max.is_some()).then_some(Self::Range { family, min, max })
  }
}

impl ToTokens for Validator {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let call = match self {
      Self::Range { family, min, max } => {
        let module = family.module();
        let [between, at_least, at_most] = family.range_functions();
        match (min, max) {
          (Some(min), Some(max)) => {
            let function = format_ident!("{}", between);
            quote! { #module::#function(#min, #max) }
          }
          (Some(min), None) => {
            let function = format_ident!("{}", at_least);
            quote! { #module::#function(#min) }
          }
          (None, Some(max)) => {
            let function = format_ident!("{}", at_most);
            quote! { #module::#function(#max) }
          }
          (None, None) => TokenStream::new(),
        }
      }
      Self::OneOf { family, values } => {
        let module = family.module();
        quote! { #module::one_of([#(#values),*]) }
      }
      Self::RegexMatches(pattern) => quote! { string_validator::regex_matches(#pattern) },
      Self::ExactlyOneOf(members) => quote! { object_validator::exactly_one_of([#(#members),*]) },
    };
    call.to_tokens(tokens);
  }
}

/// One attribute of a resource schema.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct AttributeDef {
  /// `snake_case` display name.
  #[builder(into)]
  pub name: String,
  pub kind: AttributeKind,
  pub exposure: Exposure,
  #[builder(default)]
  pub docs: Documentation,
  #[builder(default)]
  pub sensitive: bool,
  #[builder(default)]
  pub requires_replace: bool,
  #[builder(default)]
  pub unordered: bool,
  #[builder(default)]
  pub validators: Vec<Validator>,
  #[builder(default)]
  pub element_validators: Vec<Validator>,
}

impl AttributeDef {
  /// Attributes in this subtree, including this one.
  #[must_use]
  pub fn count(&self) -> usize {
    1 + match &self.kind {
      AttributeKind::SingleNested(children) | AttributeKind::ListNested(children) => {
        children.iter().map(Self::count).sum()
      }
      AttributeKind::Bool
      | AttributeKind::Int64
      | AttributeKind::Float64
      | AttributeKind::String
      | AttributeKind::List(_) => 0,
    }
  }
}

impl ToTokens for AttributeDef {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = &self.name;
    let constructor = match &self.kind {
      AttributeKind::Bool => quote! { Attribute::bool(#name) },
      AttributeKind::Int64 => quote! { Attribute::int64(#name) },
      AttributeKind::Float64 => quote! { Attribute::float64(#name) },
      AttributeKind::String => quote! { Attribute::string(#name) },
      AttributeKind::SingleNested(children) => quote! { Attribute::single_nested(#name, vec![#(#children),*]) },
      AttributeKind::ListNested(children) => quote! { Attribute::list_nested(#name, vec![#(#children),*]) },
      AttributeKind::List(element) => quote! { Attribute::list(#name, #element) },
    };

    let mut chain = Vec::new();
    match &self.exposure {
      Exposure::Required => chain.push(quote! { .required() }),
      Exposure::Optional => chain.push(quote! { .optional() }),
      Exposure::OptionalComputed { default } => {
        let default = default_tokens(default);
        chain.push(quote! { .optional().computed().default_value(#default) });
      }
      Exposure::Computed => chain.push(quote! { .computed() }),
    }
    if self.sensitive {
      chain.push(quote! { .sensitive() });
    }
    if self.requires_replace {
      chain.push(quote! { .requires_replace() });
    }
    if self.unordered {
      chain.push(quote! { .unordered() });
    }
    if !self.validators.is_empty() {
      let validators = &self.validators;
      chain.push(quote! { .validators([#(#validators),*]) });
    }
    if !self.element_validators.is_empty() {
      let validators = &self.element_validators;
      chain.push(quote! { .element_validators([#(#validators),*]) });
    }
    if !self.docs.is_empty() {
      let text = self.docs.text();
      chain.push(quote! { .description(#text) });
    }

    quote! { #constructor #(#chain)* }.to_tokens(tokens);
  }
}

fn default_tokens(value: &DefaultValue) -> TokenStream {
  match value {
    DefaultValue::Bool(flag) => quote! { #flag },
    DefaultValue::Int(number) => Literal::Int(*number).to_token_stream(),
    DefaultValue::Float(number) => Literal::Float(*number).to_token_stream(),
    DefaultValue::String(text) => quote! { #text },
  }
}

/// Attribute list for one schema, rendered as `fn <name>_attributes()`.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ResourceSchema {
  pub function: FieldNameToken,
  #[builder(into)]
  pub slug: String,
  #[builder(default)]
  pub docs: Documentation,
  #[builder(default)]
  pub attributes: Vec<AttributeDef>,
}

impl ResourceSchema {
  #[must_use]
  pub fn attribute_count(&self) -> usize {
    self.attributes.iter().map(AttributeDef::count).sum()
  }

  /// `<NAMESPACE>_SLUG`, the constant holding the slug.
  #[must_use]
  pub fn slug_const(&self) -> String {
    let stem = self.function.unraw();
    let stem = stem.strip_suffix("_attributes").unwrap_or(stem);
    format!("{}_SLUG", stem.to_ascii_uppercase())
  }
}
