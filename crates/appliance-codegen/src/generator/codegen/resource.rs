use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::Visibility;
use crate::generator::ast::ResourceSchema;

/// Resource source for one namespace: its slug and attribute list.
pub(crate) fn generate(schema: &ResourceSchema, visibility: Visibility) -> TokenStream {
  let vis = visibility.to_tokens();
  let function = &schema.function;
  let docs = &schema.docs;
  let attributes = &schema.attributes;
  let slug = &schema.slug;
  let slug_const = format_ident!("{}", schema.slug_const());

  quote! {
    use appliance_resource::prelude::*;

    /// Short identifier of this resource.
    #vis const #slug_const: &str = #slug;

    #docs
    #[must_use]
    #vis fn #function() -> Vec<Attribute> {
      vec![
        #(#attributes),*
      ]
    }
  }
}
