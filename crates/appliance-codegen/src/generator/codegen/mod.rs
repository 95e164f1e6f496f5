use anyhow::Context;
use proc_macro2::TokenStream;
use quote::quote;

pub mod client;
pub mod resource;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
  #[default]
  Public,
  Crate,
  File,
}

impl Visibility {
  #[must_use]
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "public" => Some(Visibility::Public),
      "crate" => Some(Visibility::Crate),
      "file" => Some(Visibility::File),
      _ => None,
    }
  }

  pub(crate) fn to_tokens(self) -> TokenStream {
    match self {
      Visibility::Public => quote! { pub },
      Visibility::Crate => quote! { pub(crate) },
      Visibility::File => quote! {},
    }
  }
}

/// Parses generated tokens as a file and pretty-prints them.
pub(crate) fn format_tokens(tokens: TokenStream) -> anyhow::Result<String> {
  let syntax_tree = syn::parse2::<syn::File>(tokens).context("generated code is not valid Rust")?;
  Ok(prettyplease::unparse(&syntax_tree))
}
