use super::{node::Node, path::FieldPath};

/// Position of a node inside a tree walk.
///
/// Holds the node as declared (for its name and flags), the canonical node it
/// resolves to (for its structure) and a borrowed link to the enclosing cursor.
/// Links only ever point upward and live no longer than the walk.
#[derive(Debug, Clone, Copy)]
pub struct NodeCursor<'a> {
  node: &'a Node,
  canonical: &'a Node,
  parent: Option<&'a NodeCursor<'a>>,
}

impl<'a> NodeCursor<'a> {
  #[must_use]
  pub fn root(node: &'a Node) -> Self {
    Self::resolved_root(node, node)
  }

  #[must_use]
  pub fn resolved_root(node: &'a Node, canonical: &'a Node) -> Self {
    Self {
      node,
      canonical,
      parent: None,
    }
  }

  #[must_use]
  pub fn child<'b>(&'b self, node: &'b Node) -> NodeCursor<'b> {
    self.resolved_child(node, node)
  }

  #[must_use]
  pub fn resolved_child<'b>(&'b self, node: &'b Node, canonical: &'b Node) -> NodeCursor<'b> {
    NodeCursor {
      node,
      canonical,
      parent: Some(self),
    }
  }

  #[must_use]
  pub fn node(&self) -> &'a Node {
    self.node
  }

  #[must_use]
  pub fn canonical(&self) -> &'a Node {
    self.canonical
  }

  #[must_use]
  pub fn parent(&self) -> Option<&'a NodeCursor<'a>> {
    self.parent
  }

  /// Internal name of this position. Anonymous array elements borrow the name of
  /// the array holding them.
  #[must_use]
  pub fn internal_name(&self) -> &'a str {
    if self.node.name.is_empty()
      && let Some(parent) = self.parent
    {
      return parent.internal_name();
    }
    &self.node.name
  }

  /// Path of internal names from the walk root down to this cursor.
  #[must_use]
  pub fn path(&self) -> FieldPath {
    let mut names = Vec::new();
    let mut current = Some(self);
    while let Some(cursor) = current {
      if cursor.parent.is_some() && !cursor.node.name.is_empty() {
        names.push(cursor.node.name.as_str());
      }
      current = cursor.parent;
    }
    names.into_iter().rev().collect()
  }
}
