use std::{collections::BTreeSet, path::PathBuf};

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::ui::{Colors, GenerateCommand};
use appliance_codegen::{
  generator::{
    codegen::Visibility,
    metrics::GenerationStats,
    orchestrator::{GeneratedFile, Orchestrator},
  },
  utils::load_document,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub overrides: Vec<PathBuf>,
  pub output: PathBuf,
  pub visibility: Visibility,
  pub verbose: bool,
  pub quiet: bool,
  pub only: Option<BTreeSet<String>>,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      document,
      output,
      visibility,
      verbose,
      quiet,
      only,
    } = command;

    let Some(visibility) = Visibility::parse(&visibility) else {
      anyhow::bail!("Invalid visibility '{visibility}': expected public, crate or file");
    };
    if verbose && quiet {
      anyhow::bail!("--verbose and --quiet cannot be used together");
    }
    let only = only
      .map(|names| {
        names
          .into_iter()
          .map(|name| name.trim().to_string())
          .filter(|name| !name.is_empty())
          .collect::<BTreeSet<_>>()
      })
      .filter(|names| !names.is_empty());

    Ok(Self {
      input: document.input,
      overrides: document.overrides,
      output,
      visibility,
      verbose,
      quiet,
      only,
    })
  }

  async fn write_files(&self, files: &[GeneratedFile]) -> anyhow::Result<()> {
    for file in files {
      let path = self.output.join(&file.path);
      if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
          .await
          .with_context(|| format!("creating {}", parent.display()))?;
      }
      tokio::fs::write(&path, &file.code)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn detail(&self, message: &str) {
    if self.config.verbose {
      self.info(&message.with(self.colors.info()).to_string());
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading schema document from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
    for path in &self.config.overrides {
      self.detail(&format!("Applying override: {}", path.display()));
    }
  }

  fn log_generating(&self, orchestrator: &Orchestrator) {
    self.info(
      &format!(
        "Generating {} namespaces from {} schema entries...",
        orchestrator.namespaces().len(),
        orchestrator.registry().len()
      )
      .with(self.colors.primary())
      .to_string(),
    );
    if let Some(only) = &self.config.only {
      let names: Vec<_> = only.iter().map(String::as_str).collect();
      self.detail(&format!("Restricted to: {}", names.join(", ")));
    }
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Namespaces generated:", stats.namespaces_generated.to_string());
    self.stat("Functions converted:", stats.functions_converted.to_string());
    self.stat("Structs generated:", stats.structs_generated.to_string());
    if stats.shared_types_generated > 0 {
      self.stat("", format!("{} shared", stats.shared_types_generated));
    }
    self.stat("Attributes generated:", stats.attributes_generated.to_string());
    if stats.encrypted_fields > 0 {
      self.stat("Encrypted fields:", stats.encrypted_fields.to_string());
    }
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      if !warning.is_skipped_item() && !self.config.verbose {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self, files: &[GeneratedFile]) {
    self.info(
      &format!("Writing {} files to: {}", files.len(), self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
    for file in files {
      self.detail(&file.path.display().to_string());
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated client and resource sources".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = load_document(&config.input, &config.overrides).await?;

  let mut orchestrator = Orchestrator::new(document, config.visibility);
  if let Some(only) = &config.only {
    orchestrator = orchestrator.with_only(only.iter().cloned());
  }
  logger.log_generating(&orchestrator);

  let source_path = config.input.display().to_string();
  let output = orchestrator.generate(&source_path)?;
  logger.print_statistics(&output.stats);

  logger.log_writing(&output.files);
  config.write_files(&output.files).await?;

  logger.log_success();
  Ok(())
}
