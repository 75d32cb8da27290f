use std::path::PathBuf;

use crate::generator::{
  config::TargetLanguage,
  writers::{Conventions, PathSegmenter},
};

fn segmenter(language: TargetLanguage) -> PathSegmenter {
  PathSegmenter::new("out", "ApiSdk", Conventions::for_language(language))
}

#[test]
fn client_namespace_maps_to_the_output_root() {
  assert_eq!(
    segmenter(TargetLanguage::CSharp).path("ApiSdk", "ApiClient"),
    PathBuf::from("out/ApiClient.cs")
  );
  assert_eq!(
    segmenter(TargetLanguage::TypeScript).path("ApiSdk", "ApiClient"),
    PathBuf::from("out/apiClient.ts")
  );
}

#[test]
fn namespace_segments_become_cased_directories() {
  let cases = [
    (TargetLanguage::CSharp, "out/Todos/Item/TodosItemRequestBuilder.cs"),
    (TargetLanguage::Java, "out/todos/item/TodosItemRequestBuilder.java"),
    (TargetLanguage::Python, "out/todos/item/todos_item_request_builder.py"),
    (TargetLanguage::Go, "out/todos/item/todos_item_request_builder.go"),
  ];
  for (language, expected) in cases {
    assert_eq!(
      segmenter(language).path("ApiSdk.todos.item", "TodosItemRequestBuilder"),
      PathBuf::from(expected),
      "{language}"
    );
  }
}

#[test]
fn foreign_namespaces_are_kept_whole() {
  assert_eq!(
    segmenter(TargetLanguage::Java).directory_segments("Other.models"),
    vec!["other".to_string(), "models".to_string()]
  );
}

#[tokio::test]
async fn ensure_directory_creates_missing_parents() {
  let temp = tempfile::tempdir().expect("temp dir");
  let segmenter = PathSegmenter::new(temp.path(), "ApiSdk", Conventions::for_language(TargetLanguage::Go));
  let path = segmenter.path("ApiSdk.todos.item", "TodosItemRequestBuilder");

  segmenter.ensure_directory(&path).await.expect("directories are created");
  assert!(path.parent().is_some_and(std::path::Path::is_dir));

  segmenter.ensure_directory(&path).await.expect("existing directories are accepted");
}
