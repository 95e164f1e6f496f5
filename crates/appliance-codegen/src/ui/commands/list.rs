use anyhow::Context;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::ui::{Colors, DocumentArgs, colors::table_color, term_width};
use appliance_codegen::{
  generator::{ir::Namespace, orchestrator::Orchestrator},
  utils::load_document,
};

/// `name METHOD uri` per function, one per line.
fn describe_functions(namespace: &Namespace) -> String {
  namespace
    .functions()
    .into_iter()
    .map(|(_, function)| format!("{} {} {}", function.name, function.http_method(), function.uri))
    .collect::<Vec<_>>()
    .join("\n")
}

pub async fn list_namespaces(args: &DocumentArgs, colors: &Colors) -> anyhow::Result<()> {
  let document = load_document(&args.input, &args.overrides).await?;
  let orchestrator = Orchestrator::new(document, Default::default());

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["NAMESPACE", "SLUG", "SCHEMA", "FUNCTIONS", "DEPENDS ON"] {
    header.add_cell(Cell::new(title).fg(table_color(colors.label())));
  }
  table.set_header(header);

  let mut namespaces: Vec<_> = orchestrator.namespaces().iter().collect();
  namespaces.sort_by(|a, b| a.name.cmp(&b.name));

  for namespace in namespaces {
    let dependencies = orchestrator
      .dependencies_of(namespace)
      .with_context(|| format!("namespace '{}'", namespace.name))?;
    let dependencies: Vec<_> = dependencies.into_iter().collect();

    let mut row = Row::new();
    row.add_cell(
      Cell::new(&namespace.name)
        .fg(table_color(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(namespace.slug.as_deref().unwrap_or_default())
        .fg(table_color(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(&namespace.schema).fg(table_color(colors.primary())));
    row.add_cell(Cell::new(describe_functions(namespace)).fg(table_color(colors.info())));
    row.add_cell(Cell::new(dependencies.join(", ")).fg(table_color(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
