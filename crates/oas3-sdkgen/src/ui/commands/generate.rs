use std::{path::PathBuf, sync::LazyLock};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use num_format::{CustomFormat, Grouping, ToFormattedString};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
  generator::{
    config::{GenerationConfig, StructuredMimeTypes},
    metrics::GenerationStats,
    orchestrator::{GenerationOutcome, GenerationStatus, Orchestrator},
  },
  ui::{Colors, cli::GenerateCommand},
  utils::spec::SpecLoader,
};

static COUNT_FORMAT: LazyLock<CustomFormat> = LazyLock::new(|| {
  CustomFormat::builder()
    .grouping(Grouping::Standard)
    .separator(",")
    .build()
    .expect("count format is valid")
});

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

fn format_count(count: usize) -> String {
  count.to_formatted_string(&*COUNT_FORMAT)
}

/// Everything the `generate` command needs, resolved from its flags.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub verbose: bool,
  pub quiet: bool,
  pub generation: GenerationConfig,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      language,
      class_name,
      namespace_name,
      backing_store,
      additional_data,
      structured_mime_types,
      include_paths,
      exclude_paths,
      api_root_url,
      clean_output,
      max_parallelism,
      verbose,
      quiet,
    } = command;

    let structured_mime_types = if structured_mime_types.is_empty() {
      StructuredMimeTypes::default()
    } else {
      StructuredMimeTypes::parse(&structured_mime_types)?
    };

    let generation = GenerationConfig::builder()
      .language(language)
      .output_path(output)
      .client_class_name(class_name)
      .client_namespace_name(namespace_name)
      .uses_backing_store(backing_store)
      .include_additional_data(additional_data)
      .structured_mime_types(structured_mime_types)
      .include_patterns(include_paths.into_iter().collect())
      .exclude_patterns(exclude_paths.into_iter().collect())
      .maybe_api_root_url(api_root_url)
      .clean_output(clean_output)
      .maybe_max_degree_of_parallelism(max_parallelism)
      .build();

    if let Err(error) = generation.validate() {
      anyhow::bail!("{error}");
    }

    Ok(Self {
      input,
      verbose,
      quiet,
      generation,
    })
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
      &format!("Loading OpenAPI description from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    let generation = &self.config.generation;
    self.info(
      &format!(
        "Generating {} client '{}' in namespace '{}'...",
        generation.language, generation.client_class_name, generation.client_namespace_name
      )
      .with(self.colors.primary())
      .to_string(),
    );
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Types generated:", format_count(stats.types_generated()));
    self.stat("", format!("{} request builders", format_count(stats.request_builders_generated)));
    self.stat("", format!("{} models", format_count(stats.models_generated)));
    self.stat("", format!("{} enums", format_count(stats.enums_generated)));
    if stats.composed_types_generated > 0 {
      self.stat("", format!("{} composed types", format_count(stats.composed_types_generated)));
    }
    if stats.interfaces_generated > 0 {
      self.stat("", format!("{} interfaces", format_count(stats.interfaces_generated)));
    }
    self.stat("Operations converted:", format_count(stats.operations_converted));
    self.stat("Files written:", format_count(stats.files_written));
    if stats.files_failed > 0 {
      self.stat("Files failed:", format_count(stats.files_failed));
    }
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", format_count(stats.warnings.len()));
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", format_count(stats.cycles_detected));

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

      let (label, color) = if warning.is_skipped_item() {
        ("Skipped:", self.colors.failure())
      } else {
        ("Warning:", self.colors.warning())
      };
      eprintln!(
        "{} {}",
        label.with(color),
        format!("{warning}").with(self.colors.primary())
      );
    }
  }

  /// Final status line; failures are already reported by the pipeline itself.
  fn log_outcome(&self, outcome: &GenerationOutcome) {
    let output = self.config.generation.output_path.display();
    let message = match outcome.status {
      GenerationStatus::Success => format!("Successfully generated client in {output}"),
      GenerationStatus::PartialFailure => format!(
        "Generated client in {output}, {} file(s) could not be written",
        format_count(outcome.stats.files_failed)
      ),
      GenerationStatus::Cancelled => "Generation cancelled".to_string(),
      GenerationStatus::Failed => format!("Generation failed (exit code {})", outcome.exit_code()),
    };

    let colored = message.with(self.colors.status(outcome.status));
    match outcome.status {
      GenerationStatus::Failed => eprintln!("{} {colored}", format_timestamp().with(self.colors.timestamp())),
      _ if self.config.quiet => {}
      _ => {
        println!();
        println!("{} {colored}", format_timestamp().with(self.colors.timestamp()));
      }
    }
  }
}

/// Loads the description, runs the pipeline and returns the process exit code.
pub async fn generate_code(
  config: GenerateConfig,
  colors: &Colors,
  cancellation: CancellationToken,
) -> anyhow::Result<i32> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let loader = SpecLoader::open(&config.input).await?;
  debug!(format = ?loader.format(), "parsing description");
  let spec = loader.parse()?;

  logger.log_generating();
  let orchestrator = Orchestrator::new(spec, config.generation.clone());
  let outcome = orchestrator.generate(cancellation).await;

  logger.print_statistics(&outcome.stats);
  logger.log_outcome(&outcome);
  Ok(outcome.exit_code())
}
