//! Orchestration of one generation run.
//!
//! The [`Orchestrator`] owns the frozen registry, the namespaces to render and
//! the slug ledger. Slugs are assigned once, sequentially, in document order.
//! Namespaces are then rendered concurrently: each task reads the shared
//! registry and owns its output buffers, so a failing namespace only loses its
//! own files.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use appliance_codegen::{generator::orchestrator::Orchestrator, utils::load_document};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let document = load_document(Path::new("appliance.json"), &["overrides.yaml"]).await?;
//! let orchestrator = Orchestrator::new(document, Default::default());
//! let output = orchestrator.generate("appliance.json")?;
//!
//! for file in &output.files {
//!   println!("{}", file.path.display());
//! }
//! # Ok(())
//! # }
//! ```

use std::{
  collections::{BTreeMap, BTreeSet},
  path::PathBuf,
};

use anyhow::Context;
use quote::{format_ident, quote};
use rayon::prelude::*;

use super::{
  ast::{ClientModule, ResourceSchema},
  classify::UsageIndex,
  codegen::{self, Visibility, format_tokens},
  converter::{ClientConverter, ResourceConverter},
  error::SchemaResult,
  imports::{ImportSet, TypeIndex},
  ir::{Namespace, SchemaRegistry, SpecDocument},
  metrics::{GenerationStats, GenerationWarning},
};
use crate::naming::slug::SlugLedger;

/// File name of the client source holding a module's shared types.
pub const SHARED_CLIENT_FILE: &str = "shared_client.rs";

pub struct Orchestrator {
  registry: SchemaRegistry,
  namespaces: Vec<Namespace>,
  index: TypeIndex,
  visibility: Visibility,
  only: Option<BTreeSet<String>>,
}

/// One generated source file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub path: PathBuf,
  pub code: String,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
  pub files: Vec<GeneratedFile>,
  pub stats: GenerationStats,
}

/// Client and resource sources of one namespace.
#[derive(Debug)]
struct RenderedNamespace {
  module: String,
  stem: String,
  client_module: ClientModule,
  resource: ResourceSchema,
  client: String,
  resource_code: String,
}

impl Orchestrator {
  /// Freezes the document into a registry and assigns every namespace its slug.
  #[must_use]
  pub fn new(document: SpecDocument, visibility: Visibility) -> Self {
    let (registry, mut namespaces) = document.into_parts();
    let mut ledger = SlugLedger::new();
    for namespace in &mut namespaces {
      namespace.assign_slug(&mut ledger);
    }
    let index = TypeIndex::build(&registry, &namespaces);

    Self {
      registry,
      namespaces,
      index,
      visibility,
      only: None,
    }
  }

  /// Restricts rendering to the named namespaces.
  #[must_use]
  pub fn with_only(mut self, only: impl IntoIterator<Item = impl Into<String>>) -> Self {
    let only: BTreeSet<String> = only.into_iter().map(Into::into).collect();
    self.only = (!only.is_empty()).then_some(only);
    self
  }

  #[must_use]
  pub fn registry(&self) -> &SchemaRegistry {
    &self.registry
  }

  #[must_use]
  pub fn namespaces(&self) -> &[Namespace] {
    &self.namespaces
  }

  /// Registry ids the namespace's schema struct refers to by name.
  pub fn dependencies_of(&self, namespace: &Namespace) -> SchemaResult<BTreeSet<String>> {
    match self.registry.get(&namespace.schema) {
      Some(root) => self.registry.dependencies(root),
      None => Ok(BTreeSet::new()),
    }
  }

  /// Renders every selected namespace plus the shared client types.
  ///
  /// Failures of a single namespace or shared type are recorded as skipped items
  /// in the returned statistics; only formatting of the module files aborts the
  /// run.
  pub fn generate(&self, source_path: &str) -> anyhow::Result<GenerationOutput> {
    let mut stats = GenerationStats::default();
    stats.record_cycles(self.registry.cycles());

    let selected = self.selected(&mut stats);
    let mut files = Vec::new();
    let mut modules: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (namespace, result) in self.render_all(&selected) {
      match result {
        Ok(rendered) => {
          stats.record_namespace(&rendered.client_module, &rendered.resource);
          let client_stem = format!("{}_client", rendered.stem);
          let resource_stem = format!("{}_resource", rendered.stem);
          let dir = PathBuf::from(&rendered.module);
          files.push(GeneratedFile {
            path: dir.join(format!("{client_stem}.rs")),
            code: with_header(&rendered.client, source_path),
          });
          files.push(GeneratedFile {
            path: dir.join(format!("{resource_stem}.rs")),
            code: with_header(&rendered.resource_code, source_path),
          });
          modules
            .entry(rendered.module)
            .or_default()
            .extend([client_stem, resource_stem]);
        }
        Err(err) => stats.record_warning(GenerationWarning::NamespaceFailed {
          namespace: namespace.name.clone(),
          error: format!("{err:#}"),
        }),
      }
    }

    for (module, code) in self.render_shared(&selected, &mut stats) {
      files.push(GeneratedFile {
        path: PathBuf::from(&module).join(SHARED_CLIENT_FILE),
        code: with_header(&code, source_path),
      });
      modules
        .entry(module)
        .or_default()
        .insert(SHARED_CLIENT_FILE.trim_end_matches(".rs").to_string());
    }

    files.extend(self.mod_files(&modules, source_path)?);
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(GenerationOutput { files, stats })
  }

  fn selected(&self, stats: &mut GenerationStats) -> Vec<&Namespace> {
    let Some(only) = &self.only else {
      return self.namespaces.iter().collect();
    };

    for name in only {
      if !self.namespaces.iter().any(|namespace| &namespace.name == name) {
        stats.record_warning(GenerationWarning::UnknownNamespace {
          namespace: name.clone(),
        });
      }
    }
    self
      .namespaces
      .iter()
      .filter(|namespace| only.contains(&namespace.name))
      .collect()
  }

  fn render_all<'n>(&self, selected: &[&'n Namespace]) -> Vec<(&'n Namespace, anyhow::Result<RenderedNamespace>)> {
    selected
      .par_iter()
      .map(|namespace| (*namespace, self.render_namespace(namespace)))
      .collect()
  }

  fn render_namespace(&self, namespace: &Namespace) -> anyhow::Result<RenderedNamespace> {
    let context = || format!("namespace '{}' (schema '{}')", namespace.name, namespace.schema);

    let usage = UsageIndex::for_namespace(namespace, &self.registry).with_context(context)?;
    let resource = ResourceConverter::new(&self.registry, &usage)
      .convert(namespace)
      .with_context(context)?;

    let mut converter = ClientConverter::new(&self.registry, &self.index);
    converter.convert_namespace(namespace).with_context(context)?;
    let client_module = converter.finish();

    let module = namespace.module_name();
    let imports = ImportSet::from_dependencies(&client_module.dependencies, &self.index, &module);
    let client = format_tokens(codegen::client::generate(&client_module, &imports, self.visibility)).with_context(context)?;
    let resource_code = format_tokens(codegen::resource::generate(&resource, self.visibility)).with_context(context)?;

    Ok(RenderedNamespace {
      module,
      stem: namespace.file_stem(),
      client_module,
      resource,
      client,
      resource_code,
    })
  }

  /// Client sources of object entries no namespace manages, one per module.
  fn render_shared(&self, selected: &[&Namespace], stats: &mut GenerationStats) -> Vec<(String, String)> {
    let wanted = self.only.as_ref().map(|_| {
      let mut roots = BTreeSet::new();
      for namespace in selected {
        roots.insert(namespace.schema.clone());
        for (_, function) in namespace.functions() {
          for node in function
            .path_params
            .iter()
            .chain(&function.query_params)
            .chain(&function.body)
            .chain(&function.output)
          {
            node.collect_reference_ids(&mut roots);
          }
        }
      }
      self.registry.reachable(roots.iter().map(String::as_str))
    });

    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for id in self.index.unowned() {
      if wanted.as_ref().is_some_and(|wanted| !wanted.contains(id)) {
        continue;
      }
      if let Some(shared) = self.index.get(id) {
        grouped.entry(shared.module.as_str()).or_default().push(id);
      }
    }

    let mut rendered = Vec::with_capacity(grouped.len());
    for (module, ids) in grouped {
      let mut client = ClientModule::default();
      for id in ids {
        let mut converter = ClientConverter::new(&self.registry, &self.index);
        match converter.convert_entry(id) {
          Ok(()) => client.extend(converter.finish()),
          Err(err) => stats.record_warning(GenerationWarning::SharedTypeFailed {
            schema: id.to_string(),
            error: err.to_string(),
          }),
        }
      }
      if client.structs.is_empty() {
        continue;
      }

      let imports = ImportSet::from_dependencies(&client.dependencies, &self.index, module);
      match format_tokens(codegen::client::generate(&client, &imports, self.visibility)) {
        Ok(code) => {
          stats.record_shared(&client);
          rendered.push((module.to_string(), code));
        }
        Err(err) => stats.record_warning(GenerationWarning::SharedTypeFailed {
          schema: module.to_string(),
          error: format!("{err:#}"),
        }),
      }
    }
    rendered
  }

  /// `mod.rs` per module directory plus the root `mod.rs` declaring them.
  fn mod_files(&self, modules: &BTreeMap<String, BTreeSet<String>>, source_path: &str) -> anyhow::Result<Vec<GeneratedFile>> {
    let vis = self.visibility.to_tokens();
    let mut files = Vec::with_capacity(modules.len() + 1);

    for (module, stems) in modules {
      let idents: Vec<_> = stems.iter().map(|stem| format_ident!("{}", stem)).collect();
      let code = quote! {
        #(mod #idents;)*

        #(#vis use #idents::*;)*
      };
      files.push(GeneratedFile {
        path: PathBuf::from(module).join("mod.rs"),
        code: with_header(&format_tokens(code).with_context(|| format!("module '{module}'"))?, source_path),
      });
    }

    if !modules.is_empty() {
      let idents = modules.keys().map(|module| format_ident!("{}", module));
      let code = quote! { #(#vis mod #idents;)* };
      files.push(GeneratedFile {
        path: PathBuf::from("mod.rs"),
        code: with_header(&format_tokens(code).context("root module")?, source_path),
      });
    }
    Ok(files)
  }
}

fn with_header(code: &str, source_path: &str) -> String {
  format!(
    r"//! AUTO-GENERATED CODE - DO NOT EDIT!
//!
//! Source: {source_path}
//! Generated by `appliance-codegen` {version}

{code}",
    version = env!("CARGO_PKG_VERSION"),
  )
}
