use std::collections::{BTreeMap, BTreeSet};

use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap, visit::Dfs};

use super::{
  node::{Node, NodeSpec},
  path::FieldPath,
};
use crate::generator::error::{SchemaError, SchemaResult};

/// How [`SchemaRegistry::collect`] treats references below the top node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceMode {
  /// Referenced nodes are emitted as a single opaque entry and not descended into.
  Opaque,
  /// Referenced nodes are replaced by the fields of their canonical target.
  Expanded,
}

/// One position produced by a flattening walk.
#[derive(Debug, Clone)]
pub struct CollectedNode<'a> {
  pub path: FieldPath,
  pub node: &'a Node,
  pub canonical: &'a Node,
  pub depth: usize,
  /// A reference left unexpanded in [`ReferenceMode::Opaque`].
  pub opaque: bool,
}

/// Read-only map from reference id to canonical node.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
  entries: BTreeMap<String, Node>,
  dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaRegistry {
  #[must_use]
  pub fn new(entries: BTreeMap<String, Node>) -> Self {
    let dependencies = entries
      .iter()
      .map(|(id, node)| {
        let mut ids = BTreeSet::new();
        node.collect_reference_ids(&mut ids);
        (id.clone(), ids)
      })
      .collect();
    Self { entries, dependencies }
  }

  #[must_use]
  pub fn get(&self, id: &str) -> Option<&Node> {
    self.entries.get(id)
  }

  pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
    self.entries.iter().map(|(id, node)| (id.as_str(), node))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Reference ids mentioned anywhere inside the entry `id`.
  #[must_use]
  pub fn dependencies_of(&self, id: &str) -> Option<&BTreeSet<String>> {
    self.dependencies.get(id)
  }

  /// Canonical node for `node`. Resolution is a single hop.
  pub fn resolve<'a>(&'a self, node: &'a Node) -> SchemaResult<&'a Node> {
    let path = if node.name.is_empty() {
      FieldPath::root()
    } else {
      FieldPath::new(&node.name)
    };
    self.resolve_at(&path, node)
  }

  pub fn resolve_at<'a>(&'a self, path: &FieldPath, node: &'a Node) -> SchemaResult<&'a Node> {
    let Some(id) = node.reference_id() else {
      return Ok(node);
    };

    let target = self.entries.get(id).ok_or_else(|| SchemaError::UnknownReference {
      path: path.clone(),
      reference: id.to_string(),
    })?;

    if target.kind() != node.kind() {
      return Err(SchemaError::KindMismatch {
        path: path.clone(),
        reference: id.to_string(),
        expected: node.kind(),
        found: target.kind(),
      });
    }

    if let Some(next) = target.reference_id() {
      return Err(SchemaError::ChainedReference {
        path: path.clone(),
        reference: id.to_string(),
        target: next.to_string(),
      });
    }

    Ok(target)
  }

  /// Pre-order flattening of `root`, children visited by display name.
  ///
  /// The top node always expands into its canonical target. Below the top,
  /// `mode` decides whether references are descended into.
  pub fn collect<'a>(&'a self, root: &'a Node, mode: ReferenceMode) -> SchemaResult<Vec<CollectedNode<'a>>> {
    let mut collector = Collector {
      registry: self,
      mode,
      stack: Vec::new(),
      entries: Vec::new(),
    };

    let path = FieldPath::root();
    let canonical = self.resolve_at(&path, root)?;
    if let Some(id) = root.reference_id() {
      collector.stack.push(id);
    }
    collector.push(&path, root, canonical, 0, false);
    collector.descend(canonical, &path, 0)?;
    Ok(collector.entries)
  }

  /// Reference ids a declaration emitted for `root` depends on.
  pub fn dependencies(&self, root: &Node) -> SchemaResult<BTreeSet<String>> {
    Ok(
      self
        .collect(root, ReferenceMode::Opaque)?
        .into_iter()
        .filter(|entry| entry.opaque)
        .filter_map(|entry| entry.node.reference_id().map(str::to_string))
        .collect(),
    )
  }

  /// Groups of entries that reference each other, directly or transitively.
  #[must_use]
  pub fn cycles(&self) -> Vec<Vec<String>> {
    let mut graph = DiGraphMap::<&str, ()>::new();
    for (id, deps) in &self.dependencies {
      graph.add_node(id.as_str());
      for dep in deps {
        graph.add_edge(id.as_str(), dep.as_str(), ());
      }
    }

    kosaraju_scc(&graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
      .map(|scc| scc.into_iter().map(String::from).collect())
      .collect()
  }

  /// `roots` plus every entry transitively referenced from them.
  #[must_use]
  pub fn reachable<'a>(&self, roots: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let graph = DiGraphMap::<&str, ()>::from_edges(
      self
        .dependencies
        .iter()
        .flat_map(|(id, deps)| deps.iter().map(move |dep| (id.as_str(), dep.as_str()))),
    );

    let mut reachable = BTreeSet::new();
    for root in roots {
      reachable.insert(root.to_string());
      if graph.contains_node(root) {
        let mut dfs = Dfs::new(&graph, root);
        while let Some(id) = dfs.next(&graph) {
          reachable.insert(id.to_string());
        }
      }
    }
    reachable
  }
}

struct Collector<'a> {
  registry: &'a SchemaRegistry,
  mode: ReferenceMode,
  stack: Vec<&'a str>,
  entries: Vec<CollectedNode<'a>>,
}

impl<'a> Collector<'a> {
  fn descend(&mut self, canonical: &'a Node, path: &FieldPath, depth: usize) -> SchemaResult<()> {
    match &canonical.spec {
      NodeSpec::Object(spec) => {
        for child in spec.sorted_children() {
          self.visit(child, path.join(&child.name), depth + 1)?;
        }
        Ok(())
      }
      NodeSpec::Array(spec) => self.visit(&spec.element, path.clone(), depth + 1),
      NodeSpec::Bool(_) | NodeSpec::Int(_) | NodeSpec::Float(_) | NodeSpec::String(_) => Ok(()),
    }
  }

  fn visit(&mut self, node: &'a Node, path: FieldPath, depth: usize) -> SchemaResult<()> {
    let canonical = self.registry.resolve_at(&path, node)?;
    let Some(id) = node.reference_id() else {
      self.push(&path, node, canonical, depth, false);
      return self.descend(canonical, &path, depth);
    };

    match self.mode {
      ReferenceMode::Opaque => {
        self.push(&path, node, canonical, depth, true);
        Ok(())
      }
      ReferenceMode::Expanded => {
        if self.stack.contains(&id) {
          return Err(SchemaError::ReferenceCycle {
            path,
            reference: id.to_string(),
          });
        }
        self.stack.push(id);
        self.push(&path, node, canonical, depth, false);
        self.descend(canonical, &path, depth)?;
        self.stack.pop();
        Ok(())
      }
    }
  }

  fn push(&mut self, path: &FieldPath, node: &'a Node, canonical: &'a Node, depth: usize, opaque: bool) {
    self.entries.push(CollectedNode {
      path: path.clone(),
      node,
      canonical,
      depth,
      opaque,
    });
  }
}
