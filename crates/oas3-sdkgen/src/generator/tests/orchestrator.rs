use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::generator::{
  config::{GenerationConfig, TargetLanguage},
  errors::GenerationError,
  orchestrator::{GenerationStatus, Orchestrator},
  tests::support::{get_operation, parse_spec, spec_with_paths},
  writers::GENERATED_BANNER,
};

fn todo_api() -> oas3::Spec {
  oas3::from_json(include_str!("../../../fixtures/todo_api.json")).expect("todo fixture parses")
}

fn billing_api() -> oas3::Spec {
  oas3::from_json(include_str!("../../../fixtures/billing_api.json")).expect("billing fixture parses")
}

fn config_for(language: TargetLanguage, output: &Path) -> GenerationConfig {
  GenerationConfig::builder()
    .language(language)
    .output_path(output)
    .max_degree_of_parallelism(2)
    .build()
}

/// Every file below `root`, keyed by its path relative to `root`.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
  let mut files = BTreeMap::new();
  let mut pending = vec![root.to_path_buf()];
  while let Some(dir) = pending.pop() {
    for entry in std::fs::read_dir(&dir).expect("output directory is readable") {
      let path = entry.expect("directory entry").path();
      if path.is_dir() {
        pending.push(path);
      } else {
        let content = std::fs::read_to_string(&path).expect("generated file is utf-8");
        let relative = path.strip_prefix(root).expect("file below root").to_path_buf();
        files.insert(relative, content);
      }
    }
  }
  files
}

#[tokio::test]
async fn csharp_run_writes_one_file_per_declaration() {
  let temp = tempfile::tempdir().expect("temp dir");
  let orchestrator = Orchestrator::new(todo_api(), config_for(TargetLanguage::CSharp, temp.path()));

  let outcome = orchestrator.generate(CancellationToken::new()).await;

  assert_eq!(outcome.status, GenerationStatus::Success, "{:?}", outcome.error);
  assert_eq!(outcome.exit_code(), 0);
  for expected in [
    "ApiClient.cs",
    "Todos/TodosRequestBuilder.cs",
    "Todos/Item/TodosItemRequestBuilder.cs",
    "Models/Todo.cs",
    "Models/Priority.cs",
    "Models/Problem.cs",
  ] {
    assert!(temp.path().join(expected).is_file(), "missing {expected}");
  }

  let files = snapshot(temp.path());
  assert_eq!(outcome.stats.files_written, files.len());
  assert_eq!(outcome.stats.files_failed, 0);

  let todo = &files[&PathBuf::from("Models/Todo.cs")];
  assert!(todo.starts_with("// <auto-generated/>"));
  assert!(todo.contains(GENERATED_BANNER));
  assert!(todo.contains("\"title\""));
  assert!(todo.contains("\"dueAt\""));
}

#[tokio::test]
async fn reruns_are_byte_identical() {
  let first = tempfile::tempdir().expect("temp dir");
  let second = tempfile::tempdir().expect("temp dir");

  for language in [TargetLanguage::Go, TargetLanguage::Python] {
    let one = Orchestrator::new(todo_api(), config_for(language, first.path()))
      .generate(CancellationToken::new())
      .await;
    let two = Orchestrator::new(
      todo_api(),
      GenerationConfig::builder()
        .language(language)
        .output_path(second.path())
        .max_degree_of_parallelism(8)
        .build(),
    )
    .generate(CancellationToken::new())
    .await;

    assert_eq!(one.status, GenerationStatus::Success, "{language}: {:?}", one.error);
    assert_eq!(two.status, GenerationStatus::Success, "{language}: {:?}", two.error);
    assert_eq!(snapshot(first.path()), snapshot(second.path()), "{language}");
  }
}

#[tokio::test]
async fn unsupported_types_only_cost_their_file() {
  let temp = tempfile::tempdir().expect("temp dir");
  let orchestrator = Orchestrator::new(billing_api(), config_for(TargetLanguage::TypeScript, temp.path()));

  let outcome = orchestrator.generate(CancellationToken::new()).await;

  assert_eq!(outcome.status, GenerationStatus::PartialFailure);
  assert_eq!(outcome.exit_code(), 2);
  assert_eq!(outcome.stats.files_failed, 1);
  assert!(outcome.stats.files_written > 0);
  assert!(temp.path().join("models/customer.ts").is_file());
  assert!(!temp.path().join("models/invoice.ts").exists());
  assert!(outcome.stats.warnings.iter().any(|warning| {
    warning.is_skipped_item() && warning.to_string().contains("invoice.ts")
  }));
}

#[tokio::test]
async fn csharp_accepts_decimals() {
  let temp = tempfile::tempdir().expect("temp dir");
  let outcome = Orchestrator::new(billing_api(), config_for(TargetLanguage::CSharp, temp.path()))
    .generate(CancellationToken::new())
    .await;

  assert_eq!(outcome.status, GenerationStatus::Success, "{:?}", outcome.error);
  assert!(temp.path().join("Models/Invoice.cs").is_file());
}

#[tokio::test]
async fn invalid_configuration_fails_before_writing() {
  let temp = tempfile::tempdir().expect("temp dir");
  let output = temp.path().join("sdk");
  let config = GenerationConfig::builder()
    .output_path(&output)
    .client_class_name("")
    .build();

  let outcome = Orchestrator::new(todo_api(), config).generate(CancellationToken::new()).await;

  assert_eq!(outcome.exit_code(), 1);
  assert!(matches!(
    outcome.error,
    Some(GenerationError::InvalidConfiguration {
      option: "client_class_name",
      ..
    })
  ));
  assert!(!output.exists());
}

#[tokio::test]
async fn documents_without_paths_are_fatal() {
  let temp = tempfile::tempdir().expect("temp dir");
  let spec = parse_spec(json!({
    "openapi": "3.1.0",
    "info": { "title": "Empty", "version": "1.0.0" },
    "paths": {}
  }));

  let outcome = Orchestrator::new(spec, config_for(TargetLanguage::Java, temp.path()))
    .generate(CancellationToken::new())
    .await;

  assert_eq!(outcome.status, GenerationStatus::Failed);
  assert!(matches!(outcome.error, Some(GenerationError::EmptyDocument)));
}

#[tokio::test]
async fn excluding_every_path_leaves_nothing_to_generate() {
  let temp = tempfile::tempdir().expect("temp dir");
  let config = GenerationConfig::builder()
    .output_path(temp.path())
    .exclude_patterns(["/".to_string(), "/**".to_string()].into())
    .build();

  let outcome = Orchestrator::new(todo_api(), config).generate(CancellationToken::new()).await;

  assert_eq!(outcome.exit_code(), 1);
  assert!(matches!(outcome.error, Some(GenerationError::EmptyDocument)));
}

#[tokio::test]
async fn include_patterns_limit_the_generated_builders() {
  let temp = tempfile::tempdir().expect("temp dir");
  let config = GenerationConfig::builder()
    .language(TargetLanguage::Java)
    .output_path(temp.path())
    .include_patterns(["/todos/**".to_string(), "/todos".to_string()].into())
    .build();

  let outcome = Orchestrator::new(todo_api(), config).generate(CancellationToken::new()).await;

  assert_eq!(outcome.status, GenerationStatus::Success, "{:?}", outcome.error);
  assert!(temp.path().join("todos/TodosRequestBuilder.java").is_file());
  assert!(!temp.path().join("users").exists());
}

#[tokio::test]
async fn cancelled_runs_exit_with_130_and_write_nothing() {
  let temp = tempfile::tempdir().expect("temp dir");
  let output = temp.path().join("sdk");
  let cancellation = CancellationToken::new();
  cancellation.cancel();

  let outcome = Orchestrator::new(todo_api(), config_for(TargetLanguage::CSharp, &output))
    .generate(cancellation)
    .await;

  assert_eq!(outcome.status, GenerationStatus::Cancelled);
  assert_eq!(outcome.exit_code(), 130);
  assert!(matches!(outcome.error, Some(GenerationError::Cancelled)));
  assert_eq!(outcome.stats.files_written, 0);
  assert!(!output.exists());
}

#[tokio::test]
async fn unwritable_output_is_an_environment_failure() {
  let temp = tempfile::tempdir().expect("temp dir");
  let blocker = temp.path().join("taken");
  std::fs::write(&blocker, "not a directory").expect("blocker file");

  let outcome = Orchestrator::new(todo_api(), config_for(TargetLanguage::Go, &blocker))
    .generate(CancellationToken::new())
    .await;

  assert_eq!(outcome.exit_code(), 1);
  assert!(matches!(outcome.error, Some(GenerationError::Environment { .. })));
}

#[tokio::test]
async fn clean_output_removes_stale_files() {
  let temp = tempfile::tempdir().expect("temp dir");
  let stale = temp.path().join("Stale.cs");
  std::fs::write(&stale, "// left over").expect("stale file");

  let keep = Orchestrator::new(todo_api(), config_for(TargetLanguage::CSharp, temp.path()))
    .generate(CancellationToken::new())
    .await;
  assert_eq!(keep.status, GenerationStatus::Success);
  assert!(stale.exists());

  let config = GenerationConfig::builder()
    .output_path(temp.path())
    .clean_output(true)
    .build();
  let clean = Orchestrator::new(todo_api(), config).generate(CancellationToken::new()).await;

  assert_eq!(clean.status, GenerationStatus::Success, "{:?}", clean.error);
  assert!(!stale.exists());
  assert!(temp.path().join("ApiClient.cs").is_file());
}

#[tokio::test]
async fn http_mode_writes_snippets_for_builders_with_operations() {
  let temp = tempfile::tempdir().expect("temp dir");
  let outcome = Orchestrator::new(todo_api(), config_for(TargetLanguage::Http, temp.path()))
    .generate(CancellationToken::new())
    .await;

  assert_eq!(outcome.status, GenerationStatus::Success, "{:?}", outcome.error);
  let files = snapshot(temp.path());
  assert!(files.keys().all(|path| path.extension().is_some_and(|ext| ext == "http")));

  let todos = &files[&PathBuf::from("todos/todosRequestBuilder.http")];
  assert!(todos.contains("@url = https://api.example.com/v1"));
  assert!(todos.contains("GET {{url}}/todos"));
  assert!(todos.contains("POST {{url}}/todos HTTP/1.1"));
  assert!(!files.keys().any(|path| path.to_string_lossy().contains("models")));
}

#[test]
fn prepare_builds_the_model_without_touching_disk() {
  let spec = spec_with_paths(json!({ "/todos": get_operation() }));
  let config = GenerationConfig::builder()
    .language(TargetLanguage::Go)
    .output_path("does/not/exist")
    .build();

  let prepared = Orchestrator::new(spec, config)
    .prepare(&CancellationToken::new())
    .expect("model builds");

  assert!(prepared.dom.len() > 1);
  assert!(prepared.stats.request_builders_generated >= 2);
  assert!(!Path::new("does/not/exist").exists());
}

#[test]
fn exit_codes_follow_the_status() {
  assert_eq!(GenerationStatus::Success.exit_code(), 0);
  assert_eq!(GenerationStatus::Failed.exit_code(), 1);
  assert_eq!(GenerationStatus::PartialFailure.exit_code(), 2);
  assert_eq!(GenerationStatus::Cancelled.exit_code(), 130);
}
