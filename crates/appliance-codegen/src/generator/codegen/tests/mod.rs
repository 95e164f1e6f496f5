
use crate::generator::codegen::format_tokens;

pub(super) fn render(tokens: proc_macro2::TokenStream) -> String {
  format_tokens(tokens).unwrap()
}
