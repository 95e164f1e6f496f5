use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{node::Node, operation::Namespace, path::FieldPath, registry::SchemaRegistry};
use crate::generator::error::SchemaResult;

/// Top-level shape of a base or override document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
  /// Shared schema entries keyed by reference id.
  #[serde(default)]
  pub schemas: BTreeMap<String, Node>,
  #[serde(default)]
  pub namespaces: Vec<Namespace>,
}

impl SpecDocument {
  /// Merges an override document in place. Entries and namespaces unknown to the
  /// base are appended.
  pub fn apply_override(&mut self, overlay: SpecDocument) -> SchemaResult<()> {
    for (id, node) in overlay.schemas {
      match self.schemas.get_mut(&id) {
        Some(existing) => existing.merge_at(&FieldPath::new(&id), node)?,
        None => {
          self.schemas.insert(id, node);
        }
      }
    }

    for namespace in overlay.namespaces {
      match self.namespaces.iter_mut().find(|existing| existing.name == namespace.name) {
        Some(existing) => existing.merge(namespace)?,
        None => self.namespaces.push(namespace),
      }
    }
    Ok(())
  }

  /// Fills implicit names: schema entries without a name take their id, functions
  /// take their slot or key.
  pub fn normalize(&mut self) {
    for (id, node) in &mut self.schemas {
      if node.name.is_empty() {
        node.name.clone_from(id);
      }
    }
    for namespace in &mut self.namespaces {
      namespace.normalize();
    }
  }

  pub fn validate(&self) -> SchemaResult<()> {
    for (id, node) in &self.schemas {
      node.validate(&FieldPath::new(id))?;
    }
    for namespace in &self.namespaces {
      namespace.validate()?;
    }
    Ok(())
  }

  #[must_use]
  pub fn namespace(&self, name: &str) -> Option<&Namespace> {
    self.namespaces.iter().find(|namespace| namespace.name == name)
  }

  /// Splits the document into its frozen registry and the namespaces to render.
  #[must_use]
  pub fn into_parts(self) -> (SchemaRegistry, Vec<Namespace>) {
    (SchemaRegistry::new(self.schemas), self.namespaces)
  }
}
