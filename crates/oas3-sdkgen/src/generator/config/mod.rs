mod mime_types;

use std::{collections::BTreeSet, num::NonZeroUsize, path::PathBuf, sync::LazyLock};

use bon::Builder;
use clap::ValueEnum;
use regex::Regex;
use strum::{Display, EnumIter};

pub use mime_types::StructuredMimeTypes;

use super::{
  comparer::PathPatterns,
  errors::{GenerationError, GenerationResult},
};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_CLIENT_CLASS_NAME: &str = "ApiClient";
pub const DEFAULT_CLIENT_NAMESPACE_NAME: &str = "ApiSdk";
pub const MODELS_NAMESPACE_SEGMENT: &str = "models";

static CLASS_NAME_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("class name regex is valid"));
static NAMESPACE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("namespace name regex is valid")
});

/// Languages the writers can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, EnumIter, ValueEnum)]
pub enum TargetLanguage {
  #[default]
  #[strum(to_string = "CSharp")]
  #[value(name = "csharp")]
  CSharp,
  #[strum(to_string = "Java")]
  Java,
  #[strum(to_string = "TypeScript")]
  #[value(name = "typescript")]
  TypeScript,
  #[strum(to_string = "Python")]
  Python,
  #[strum(to_string = "Go")]
  Go,
  /// `.http` request snippets instead of a client library.
  #[strum(to_string = "HTTP")]
  Http,
}

/// Everything a single generation run needs besides the document itself.
#[derive(Debug, Clone, Builder)]
pub struct GenerationConfig {
  #[builder(default)]
  pub language: TargetLanguage,
  #[builder(default = PathBuf::from(DEFAULT_OUTPUT_PATH), into)]
  pub output_path: PathBuf,
  #[builder(default = DEFAULT_CLIENT_CLASS_NAME.to_string(), into)]
  pub client_class_name: String,
  #[builder(default = DEFAULT_CLIENT_NAMESPACE_NAME.to_string(), into)]
  pub client_namespace_name: String,
  #[builder(default)]
  pub uses_backing_store: bool,
  #[builder(default = true)]
  pub include_additional_data: bool,
  #[builder(default)]
  pub structured_mime_types: StructuredMimeTypes,
  #[builder(default)]
  pub include_patterns: BTreeSet<String>,
  #[builder(default)]
  pub exclude_patterns: BTreeSet<String>,
  #[builder(into)]
  pub api_root_url: Option<String>,
  #[builder(default)]
  pub clean_output: bool,
  #[builder(default = default_parallelism())]
  pub max_degree_of_parallelism: usize,
}

impl Default for GenerationConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl GenerationConfig {
  pub fn models_namespace_name(&self) -> String {
    format!("{}.{MODELS_NAMESPACE_SEGMENT}", self.client_namespace_name)
  }

  /// Rejects configurations the pipeline cannot start with.
  pub fn validate(&self) -> GenerationResult<()> {
    if self.client_class_name.trim().is_empty() {
      return Err(GenerationError::InvalidConfiguration {
        option: "client_class_name",
        reason: "must not be empty".to_string(),
      });
    }
    if !CLASS_NAME_RE.is_match(&self.client_class_name) {
      return Err(GenerationError::InvalidConfiguration {
        option: "client_class_name",
        reason: format!("'{}' is not a valid class name", self.client_class_name),
      });
    }
    if !NAMESPACE_NAME_RE.is_match(&self.client_namespace_name) {
      return Err(GenerationError::InvalidConfiguration {
        option: "client_namespace_name",
        reason: format!("'{}' is not a valid namespace name", self.client_namespace_name),
      });
    }
    if self.structured_mime_types.is_empty() {
      return Err(GenerationError::InvalidConfiguration {
        option: "structured_mime_types",
        reason: "at least one content type is required".to_string(),
      });
    }
    if self.max_degree_of_parallelism == 0 {
      return Err(GenerationError::InvalidConfiguration {
        option: "max_degree_of_parallelism",
        reason: "must be greater than zero".to_string(),
      });
    }
    if self.output_path.as_os_str().is_empty() {
      return Err(GenerationError::InvalidConfiguration {
        option: "output_path",
        reason: "must not be empty".to_string(),
      });
    }
    self.path_patterns()?;
    Ok(())
  }

  pub fn path_patterns(&self) -> GenerationResult<PathPatterns> {
    PathPatterns::new(&self.include_patterns, &self.exclude_patterns)
  }
}

fn default_parallelism() -> usize {
  std::thread::available_parallelism().map_or(4, NonZeroUsize::get)
}

#[cfg(test)]
mod tests;
