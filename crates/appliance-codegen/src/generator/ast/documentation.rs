use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

/// Doc comment lines attached to a generated item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
  lines: Vec<String>,
}

impl Documentation {
  /// Splits free text on real and escaped newlines.
  #[must_use]
  pub fn from_raw(input: &str) -> Self {
    Self {
      lines: input.replace("\\n", "\n").lines().map(str::trim_end).map(String::from).collect(),
    }
  }

  #[must_use]
  pub fn from_optional(desc: Option<&str>) -> Self {
    desc.map_or_else(Self::default, Self::from_raw)
  }

  #[must_use]
  pub fn from_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      lines: lines.into_iter().map(Into::into).collect(),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  #[must_use]
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  /// Appends a paragraph, separated from existing lines by a blank one.
  pub fn push_paragraph(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
    let mut lines = lines.into_iter().map(Into::into).peekable();
    if lines.peek().is_none() {
      return;
    }
    if !self.lines.is_empty() {
      self.lines.push(String::new());
    }
    self.lines.extend(lines);
  }

  /// Joined text, for targets taking a description string.
  #[must_use]
  pub fn text(&self) -> String {
    self.lines.join("\n")
  }
}

impl ToTokens for Documentation {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    if self.lines.is_empty() {
      return;
    }
    let doc_lines = self.lines.iter().map(|line| {
      let line = format!(" {line}");
      quote! { #[doc = #line] }
    });
    quote! { #(#doc_lines)* }.to_tokens(tokens);
  }
}

impl<S: Into<String>> FromIterator<S> for Documentation {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self::from_lines(iter)
  }
}
