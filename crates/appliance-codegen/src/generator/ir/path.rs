use std::fmt::{Display, Formatter};

/// Dotted location of a field inside a schema tree, e.g. `address.settings.fqdn`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
  #[must_use]
  pub fn root() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn new(segment: impl Into<String>) -> Self {
    Self(vec![segment.into()])
  }

  #[must_use]
  pub fn join(&self, segment: impl Into<String>) -> Self {
    let mut segments = self.0.clone();
    segments.push(segment.into());
    Self(segments)
  }
}

impl Display for FieldPath {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if self.0.is_empty() {
      return f.write_str("<root>");
    }
    f.write_str(&self.0.join("."))
  }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
  fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}
