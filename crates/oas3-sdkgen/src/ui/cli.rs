use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::generator::config::{DEFAULT_CLIENT_CLASS_NAME, DEFAULT_CLIENT_NAMESPACE_NAME, DEFAULT_OUTPUT_PATH, TargetLanguage};

#[derive(Parser, Debug)]
#[command(name = "oas3-sdkgen")]
#[command(author, version, about = "OpenAPI client SDK generator", styles = Colors::clap_styles())]
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
  /// List information from an OpenAPI description
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate a client SDK from an OpenAPI description
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateCommand {
  /// Path to the OpenAPI description (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory the generated sources are written to
  #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_PATH)]
  pub output: PathBuf,

  /// Target language
  #[arg(short, long, value_enum, default_value_t = TargetLanguage::CSharp)]
  pub language: TargetLanguage,

  /// Name of the generated client class
  #[arg(short = 'c', long, value_name = "NAME", default_value = DEFAULT_CLIENT_CLASS_NAME)]
  pub class_name: String,

  /// Root namespace of the generated code
  #[arg(short = 'n', long, value_name = "NAME", default_value = DEFAULT_CLIENT_NAMESPACE_NAME)]
  pub namespace_name: String,

  /// Generate models with a backing store
  #[arg(short = 'b', long, default_value_t = false)]
  pub backing_store: bool,

  /// Keep properties not described by the schema in an additional data map
  #[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
  pub additional_data: bool,

  /// Preferred structured content types with their weight, e.g. `application/json;q=1`
  #[arg(short = 'm', long = "structured-mime-types", value_name = "MIME")]
  pub structured_mime_types: Vec<String>,

  /// Glob of paths to include, e.g. `/todos/**`; may be repeated
  #[arg(long = "include-path", value_name = "GLOB")]
  pub include_paths: Vec<String>,

  /// Glob of paths to exclude; exclusions win over inclusions
  #[arg(long = "exclude-path", value_name = "GLOB")]
  pub exclude_paths: Vec<String>,

  /// Base URL of the API, instead of the first server of the description
  #[arg(long, value_name = "URL")]
  pub api_root_url: Option<String>,

  /// Remove the output directory before generating
  #[arg(long, default_value_t = false)]
  pub clean_output: bool,

  /// Maximum number of files written concurrently
  #[arg(short = 'j', long, value_name = "N")]
  pub max_parallelism: Option<usize>,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false, conflicts_with = "quiet")]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations with their URL templates
  Operations {
    /// Path to the OpenAPI description (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
  /// Print the URI space tree of the described paths
  Tree {
    /// Path to the OpenAPI description (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
