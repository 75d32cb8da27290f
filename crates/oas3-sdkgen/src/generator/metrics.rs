use std::path::PathBuf;

use strum::Display;

/// Counters collected over one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub request_builders_generated: usize,
  pub models_generated: usize,
  pub enums_generated: usize,
  pub composed_types_generated: usize,
  pub interfaces_generated: usize,
  pub operations_converted: usize,
  pub files_written: usize,
  pub files_failed: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_request_builder(&mut self) {
    self.request_builders_generated += 1;
  }

  pub fn record_model(&mut self) {
    self.models_generated += 1;
  }

  pub fn record_enum(&mut self) {
    self.enums_generated += 1;
  }

  pub fn record_composed_type(&mut self) {
    self.composed_types_generated += 1;
  }

  pub fn record_interface(&mut self) {
    self.interfaces_generated += 1;
  }

  pub fn record_operation(&mut self) {
    self.operations_converted += 1;
  }

  pub fn record_file_written(&mut self) {
    self.files_written += 1;
  }

  pub fn record_file_failed(&mut self, path: PathBuf, error: String) {
    self.files_failed += 1;
    self.warnings.push(GenerationWarning::FileEmissionFailed {
      file: path.display().to_string(),
      error,
    });
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }

  /// Classes, enums and interfaces emitted into the model.
  pub fn types_generated(&self) -> usize {
    self.request_builders_generated
      + self.models_generated
      + self.enums_generated
      + self.composed_types_generated
      + self.interfaces_generated
  }
}

/// Problems that do not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Failed to resolve schema '{schema_name}': {error}")]
  SchemaResolutionFailed { schema_name: String, error: String },
  #[strum(to_string = "'{method} {path}' has no structured content type among {content_types}, using a stream")]
  UnstructuredContent {
    method: String,
    path: String,
    content_types: String,
  },
  #[strum(to_string = "Schema '{schema_name}': {message}")]
  SchemaFallback { schema_name: String, message: String },
  #[strum(to_string = "Failed to write '{file}': {error}")]
  FileEmissionFailed { file: String, error: String },
}

impl GenerationWarning {
  /// Warnings that mean some output is missing.
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::FileEmissionFailed { .. })
  }
}
