//! Pipeline driver for client generation.
//!
//! The `Orchestrator` owns one parsed document plus its configuration and runs the two
//! phases of a generation:
//!
//! 1. model building (URI space tree, path filtering, resolution, refinement, ordering),
//!    sequential and all-or-nothing;
//! 2. emission, where every top-level declaration is rendered and written to its own file by
//!    a bounded pool of tasks.
//!
//! It is the only layer that decides whether a failure aborts the run or only costs one file,
//! and it maps the result to a process exit code.
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(spec: oas3::Spec) {
//! let config = GenerationConfig::builder().language(TargetLanguage::Go).output_path("./sdk").build();
//! let outcome = Orchestrator::new(spec, config).generate(CancellationToken::new()).await;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Instant,
};

use oas3::Spec;
use strum::Display;
use tokio::{sync::Semaphore, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::generator::{
  codedom::{CodeDom, ElementId},
  config::GenerationConfig,
  errors::{GenerationError, GenerationResult},
  metrics::GenerationStats,
  order,
  refiner::refine,
  resolver::ModelResolver,
  uri_space::UriSpaceTree,
  writers::{LanguageWriter, ModelIndex},
};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GenerationStatus {
  #[strum(to_string = "success")]
  Success,
  /// Every file was attempted but at least one could not be rendered.
  #[strum(to_string = "completed with failures")]
  PartialFailure,
  #[strum(to_string = "failed")]
  Failed,
  #[strum(to_string = "cancelled")]
  Cancelled,
}

impl GenerationStatus {
  pub fn exit_code(self) -> i32 {
    match self {
      Self::Success => 0,
      Self::Failed => 1,
      Self::PartialFailure => 2,
      Self::Cancelled => 130,
    }
  }
}

/// Result of [`Orchestrator::generate`].
#[derive(Debug)]
pub struct GenerationOutcome {
  pub status: GenerationStatus,
  pub stats: GenerationStats,
  /// The failure that stopped the run, for `Failed` and `Cancelled`.
  pub error: Option<GenerationError>,
}

impl GenerationOutcome {
  pub fn exit_code(&self) -> i32 {
    self.status.exit_code()
  }

  fn finished(stats: GenerationStats) -> Self {
    let status = if stats.files_failed > 0 {
      GenerationStatus::PartialFailure
    } else {
      GenerationStatus::Success
    };
    Self {
      status,
      stats,
      error: None,
    }
  }

  fn aborted(error: GenerationError, stats: GenerationStats) -> Self {
    let status = match error {
      GenerationError::Cancelled => GenerationStatus::Cancelled,
      _ => GenerationStatus::Failed,
    };
    Self {
      status,
      stats,
      error: Some(error),
    }
  }
}

/// The finished, read-only code model of one run.
#[derive(Debug)]
pub(crate) struct PreparedModel {
  pub(crate) dom: CodeDom,
  pub(crate) index: ModelIndex,
  pub(crate) stats: GenerationStats,
}

/// Drives one generation run for a parsed document.
pub struct Orchestrator {
  spec: Spec,
  config: GenerationConfig,
}

impl Orchestrator {
  pub fn new(spec: Spec, config: GenerationConfig) -> Self {
    Self { spec, config }
  }

  pub fn config(&self) -> &GenerationConfig {
    &self.config
  }

  /// Runs both phases and reports how the run ended.
  ///
  /// Failures are logged here and never propagated; `cancellation` is checked before each
  /// class is emitted. Files already written by a cancelled run stay on disk.
  pub async fn generate(&self, cancellation: CancellationToken) -> GenerationOutcome {
    let started = Instant::now();
    let outcome = match self.prepare(&cancellation) {
      Ok(PreparedModel { dom, index, mut stats }) => match self.emit(dom, index, &mut stats, &cancellation).await {
        Ok(()) => GenerationOutcome::finished(stats),
        Err(error) => GenerationOutcome::aborted(error, stats),
      },
      Err(error) => GenerationOutcome::aborted(error, GenerationStats::default()),
    };

    match (&outcome.status, &outcome.error) {
      (GenerationStatus::Cancelled, _) => warn!("generation cancelled"),
      (GenerationStatus::Failed, Some(error)) => error!(%error, "generation failed"),
      (status, _) => info!(
        %status,
        files = outcome.stats.files_written,
        failed = outcome.stats.files_failed,
        elapsed_ms = started.elapsed().as_millis(),
        "generation finished"
      ),
    }
    outcome
  }

  /// Phase one: builds the ordered code model without touching the file system.
  ///
  /// # Errors
  /// Configuration, input and resolution failures; resolution is all-or-nothing.
  pub(crate) fn prepare(&self, cancellation: &CancellationToken) -> GenerationResult<PreparedModel> {
    self.config.validate()?;

    let started = Instant::now();
    let tree = UriSpaceTree::from_spec(&self.spec).ok_or(GenerationError::EmptyDocument)?;
    let patterns = self.config.path_patterns()?;
    let tree = tree.filtered(&patterns).ok_or(GenerationError::EmptyDocument)?;
    debug!(
      nodes = tree.len(),
      operations = tree.operation_count(),
      elapsed_ms = started.elapsed().as_millis(),
      "uri space tree ready"
    );
    if cancellation.is_cancelled() {
      return Err(GenerationError::Cancelled);
    }

    let started = Instant::now();
    let resolution = ModelResolver::new(&self.spec, &self.config, &tree).resolve()?;
    let mut dom = resolution.dom;
    let mut stats = resolution.stats;
    debug!(
      elements = dom.len(),
      elapsed_ms = started.elapsed().as_millis(),
      "code model resolved"
    );

    refine(&mut dom, self.config.language, &mut stats)?;
    order::apply(&mut dom, self.config.language);
    let index = ModelIndex::build(&dom);
    if cancellation.is_cancelled() {
      return Err(GenerationError::Cancelled);
    }

    Ok(PreparedModel { dom, index, stats })
  }

  /// Phase two: renders and writes one file per declaration.
  ///
  /// Unsupported types only cost their file; environment failures stop the run once the
  /// writes already in flight are done.
  async fn emit(
    &self,
    dom: CodeDom,
    index: ModelIndex,
    stats: &mut GenerationStats,
    cancellation: &CancellationToken,
  ) -> GenerationResult<()> {
    let writer = Arc::new(LanguageWriter::new(&self.config));
    let root = writer.segmenter().root().to_path_buf();
    prepare_output_directory(&root, self.config.clean_output).await?;

    let declarations = writer.declarations(&dom);
    debug!(
      files = declarations.len(),
      workers = self.config.max_degree_of_parallelism,
      output = %root.display(),
      "emitting declarations"
    );

    let dom = Arc::new(dom);
    let index = Arc::new(index);
    let permits = Arc::new(Semaphore::new(self.config.max_degree_of_parallelism));
    let mut tasks = JoinSet::new();
    let mut stopped = None;

    for declaration in declarations {
      if cancellation.is_cancelled() {
        stopped = Some(GenerationError::Cancelled);
        break;
      }
      let acquired = tokio::select! {
        () = cancellation.cancelled() => None,
        permit = Arc::clone(&permits).acquire_owned() => permit.ok(),
      };
      let Some(permit) = acquired else {
        stopped = Some(GenerationError::Cancelled);
        break;
      };

      let writer = Arc::clone(&writer);
      let dom = Arc::clone(&dom);
      let index = Arc::clone(&index);
      tasks.spawn(async move {
        let _permit = permit;
        emit_declaration(&writer, &dom, &index, declaration).await
      });

      while let Some(joined) = tasks.try_join_next() {
        if let Err(error) = collect(joined, stats) {
          stopped.get_or_insert(error);
        }
      }
      if stopped.is_some() {
        break;
      }
    }

    while let Some(joined) = tasks.join_next().await {
      if let Err(error) = collect(joined, stats) {
        stopped.get_or_insert(error);
      }
    }

    match stopped {
      Some(error) => Err(error),
      None => Ok(()),
    }
  }
}

/// Creates the output root, wiping it first when asked to.
async fn prepare_output_directory(root: &Path, clean: bool) -> GenerationResult<()> {
  if clean && tokio::fs::try_exists(root).await.unwrap_or(false) {
    debug!(output = %root.display(), "cleaning output directory");
    tokio::fs::remove_dir_all(root)
      .await
      .map_err(|source| GenerationError::environment(root, source))?;
  }
  tokio::fs::create_dir_all(root)
    .await
    .map_err(|source| GenerationError::environment(root, source))
}

/// Outcome of one emission task: the file it targeted and whether it was written.
type Emitted = (PathBuf, GenerationResult<()>);

async fn emit_declaration(writer: &LanguageWriter, dom: &CodeDom, index: &ModelIndex, declaration: ElementId) -> Emitted {
  let path = writer.segmenter().path_for(dom, declaration);
  let result = async {
    let file = writer.render(dom, index, declaration)?;
    writer.segmenter().ensure_directory(&file.path).await?;
    tokio::fs::write(&file.path, file.content)
      .await
      .map_err(|source| GenerationError::environment(&file.path, source))
  }
  .await;
  (path, result)
}

/// Books a finished task into `stats`, returning the failure that must stop the run.
fn collect(joined: Result<Emitted, tokio::task::JoinError>, stats: &mut GenerationStats) -> GenerationResult<()> {
  let (path, result) = match joined {
    Ok(emitted) => emitted,
    Err(join_error) if join_error.is_panic() => std::panic::resume_unwind(join_error.into_panic()),
    Err(_) => return Err(GenerationError::Cancelled),
  };

  match result {
    Ok(()) => {
      stats.record_file_written();
      Ok(())
    }
    Err(error) if error.is_emission_error() => {
      warn!(path = %path.display(), %error, "skipping file");
      stats.record_file_failed(path, error.to_string());
      Ok(())
    }
    Err(error) => Err(error),
  }
}
