use std::path::PathBuf;

use thiserror::Error;

use super::config::TargetLanguage;

/// Typed failures raised by every layer of the generation pipeline.
///
/// Only the orchestrator decides whether a failure aborts the run or is recorded and skipped.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("the document does not declare any path")]
  EmptyDocument,

  #[error("invalid configuration for '{option}': {reason}")]
  InvalidConfiguration { option: &'static str, reason: String },

  #[error("invalid path pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },

  #[error("invalid schema '{schema}': {reason}")]
  InvalidSchema { schema: String, reason: String },

  #[error("discriminator value '{value}' of schema '{schema}' maps to unknown schema '{target}'")]
  UnresolvableDiscriminator {
    schema: String,
    value: String,
    target: String,
  },

  #[error("schema '{schema}' is mapped as a subtype of '{base}' but does not derive from it")]
  UnreachableBaseType { schema: String, base: String },

  #[error("{language} cannot express type '{type_name}' used by '{element}'")]
  UnsupportedType {
    language: TargetLanguage,
    type_name: String,
    element: String,
  },

  #[error("cannot add {kind} '{name}' to '{parent}': a sibling {existing} already uses that name")]
  NameCollision {
    parent: String,
    name: String,
    kind: String,
    existing: String,
  },

  #[error("{kind} '{child}' cannot be owned by '{parent}'")]
  InvalidOwner {
    parent: String,
    child: String,
    kind: String,
  },

  #[error("i/o failure on '{}': {source}", path.display())]
  Environment {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("generation was cancelled")]
  Cancelled,
}

impl GenerationError {
  pub(crate) fn invalid_schema(schema: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::InvalidSchema {
      schema: schema.into(),
      reason: reason.into(),
    }
  }

  pub(crate) fn environment(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Environment {
      path: path.into(),
      source,
    }
  }

  /// Emission failures only abort the file being written.
  pub fn is_emission_error(&self) -> bool {
    matches!(self, Self::UnsupportedType { .. })
  }
}

pub type GenerationResult<T> = Result<T, GenerationError>;
