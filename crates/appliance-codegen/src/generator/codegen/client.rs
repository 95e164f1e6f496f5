use proc_macro2::TokenStream;
use quote::quote;

use super::Visibility;
use crate::generator::{
  ast::{ClientField, ClientModule, ClientStruct, InputStruct, OutputDef, UriParam},
  imports::ImportSet,
};

/// Client source for one module: serde structs, input types and output types.
pub(crate) fn generate(module: &ClientModule, imports: &ImportSet, visibility: Visibility) -> TokenStream {
  let serde_use = (module.struct_count() > 0).then(|| quote! { use serde::{Deserialize, Serialize}; });
  let structs = module.structs.iter().map(|def| generate_struct(def, visibility));
  let inputs = module.inputs.iter().map(|input| generate_input(input, visibility));
  let outputs = module.outputs.iter().map(|output| generate_output(output, visibility));

  quote! {
    #serde_use
    #imports

    #(#structs)*
    #(#inputs)*
    #(#outputs)*
  }
}

pub(crate) fn generate_struct(def: &ClientStruct, visibility: Visibility) -> TokenStream {
  let name = &def.name;
  let docs = &def.docs;
  let vis = visibility.to_tokens();
  let fields = def.fields.iter().map(|field| generate_field(field, visibility));
  let key_methods = generate_key_methods(def, visibility);

  quote! {
    #docs
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #vis struct #name {
      #(#fields),*
    }
    #key_methods
  }
}

fn generate_field(field: &ClientField, visibility: Visibility) -> TokenStream {
  let name = &field.name;
  let docs = &field.docs;
  let vis = visibility.to_tokens();
  let rust_type = &field.rust_type;

  let mut serde_args = Vec::new();
  if field.needs_rename() {
    let wire_name = &field.wire_name;
    serde_args.push(quote! { rename = #wire_name });
  }
  if field.optional {
    serde_args.push(quote! { default, skip_serializing_if = "Option::is_none" });
  }
  let serde_attr = (!serde_args.is_empty()).then(|| quote! { #[serde(#(#serde_args),*)] });

  let type_tokens = if field.optional {
    quote! { Option<#rust_type> }
  } else {
    quote! { #rust_type }
  };

  quote! {
    #docs
    #serde_attr
    #vis #name: #type_tokens
  }
}

fn generate_key_methods(def: &ClientStruct, visibility: Visibility) -> TokenStream {
  if def.key_methods.is_empty() {
    return quote! {};
  }

  let name = &def.name;
  let vis = visibility.to_tokens();
  let methods = def.key_methods.iter().map(|method| {
    let ident = &method.name;
    let key = &method.key;
    let doc = format!(" Store key of the {} value.", method.kind);
    quote! {
      #[doc = #doc]
      #[must_use]
      #vis fn #ident(&self) -> String {
        #key
      }
    }
  });

  quote! {
    impl #name {
      #(#methods)*
    }
  }
}

fn generate_input(input: &InputStruct, visibility: Visibility) -> TokenStream {
  let def = generate_struct(&input.def, visibility);
  let name = &input.def.name;
  let vis = visibility.to_tokens();
  let method = input.method.as_str();
  let template = &input.uri_template;
  let uri = uri_expression(&input.uri_template, &input.uri_params);

  quote! {
    #def

    impl #name {
      #vis const METHOD: &'static str = #method;
      #vis const URI_TEMPLATE: &'static str = #template;

      /// URI with path placeholders filled in.
      #[must_use]
      #vis fn uri(&self) -> String {
        #uri
      }
    }
  }
}

/// `format!` call replacing each bound placeholder with its field. Unbound
/// placeholders stay literal.
fn uri_expression(template: &str, params: &[UriParam]) -> TokenStream {
  if params.is_empty() {
    return quote! { Self::URI_TEMPLATE.to_string() };
  }

  let mut format_string = String::with_capacity(template.len());
  let mut args = Vec::new();
  let mut rest = template;
  while let Some(open) = rest.find('{') {
    format_string.push_str(&escape_braces(&rest[..open]));
    let after = &rest[open + 1..];
    let Some(close) = after.find('}') else {
      format_string.push_str(&escape_braces(&rest[open..]));
      rest = "";
      break;
    };

    let placeholder = &after[..close];
    match params.iter().find(|param| param.placeholder == placeholder) {
      Some(param) => {
        let field = &param.field;
        format_string.push_str("{}");
        args.push(if param.optional {
          quote! { self.#field.as_ref().map(ToString::to_string).unwrap_or_default() }
        } else {
          quote! { self.#field }
        });
      }
      None => format_string.push_str(&escape_braces(&rest[open..=open + close + 1])),
    }
    rest = &after[close + 1..];
  }
  format_string.push_str(&escape_braces(rest));

  quote! { format!(#format_string, #(#args),*) }
}

fn escape_braces(input: &str) -> String {
  input.replace('{', "{{").replace('}', "}}")
}

fn generate_output(output: &OutputDef, visibility: Visibility) -> TokenStream {
  match output {
    OutputDef::Struct(def) => generate_struct(def, visibility),
    OutputDef::Alias { name, docs, target } => {
      let vis = visibility.to_tokens();
      quote! {
        #docs
        #vis type #name = #target;
      }
    }
  }
}
