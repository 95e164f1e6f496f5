use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "appliance-codegen")]
#[command(author, version, about = "Typed client and resource schema generator for appliance APIs")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from a schema document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate client and resource sources for every namespace
  Generate(GenerateCommand),
}

/// Base document plus the overrides merged on top of it, in order.
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
  /// Path to the base JSON or YAML document
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Override documents applied after the base (repeatable)
  #[arg(short = 'O', long = "override", value_name = "FILE")]
  pub overrides: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  #[command(flatten)]
  pub document: DocumentArgs,

  /// Directory receiving one sub-directory per module
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Visibility level for generated items (public, crate or file)
  #[arg(long, value_name = "VISIBILITY", default_value = "public")]
  pub visibility: String,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,

  /// Generate only these namespaces (comma-separated names)
  #[arg(long, value_name = "NAMES", value_delimiter = ',')]
  pub only: Option<Vec<String>>,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List namespaces with their slugs, schemas and functions
  Namespaces(DocumentArgs),
}
