use super::{assert_contains_all, render};
use crate::generator::{config::TargetLanguage, tests::support::todo_spec};

#[test]
fn models_expose_accessors_instead_of_fields() {
  let content = render(&todo_spec(), TargetLanguage::Java, "ApiSdk.models.Todo");

  assert_contains_all(
    &content,
    &[
      "package apisdk.models;",
      "@jakarta.annotation.Generated(\"com.microsoft.kiota\")",
      "public class Todo implements AdditionalDataHolder, Parsable {",
      "public String getTitle() {",
      "public void setTitle(",
      "public static Todo createFromDiscriminatorValue(",
      "deserializerMap",
    ],
  );
  assert!(!content.contains("public String title;"));
}

#[test]
fn executors_return_synchronously() {
  let content = render(&todo_spec(), TargetLanguage::Java, "ApiSdk.todos.TodosRequestBuilder");

  assert_contains_all(
    &content,
    &[
      "package apisdk.todos;",
      "import apisdk.models.Todo;",
      "public java.util.List<Todo> get(",
      "sendCollection(requestInfo, errorMapping, Todo::createFromDiscriminatorValue)",
      "errorMapping.put(\"4XX\", Problem::createFromDiscriminatorValue);",
      "@QueryParameter(name = \"%24top\")",
    ],
  );
}

#[test]
fn item_builders_are_reached_through_indexers() {
  let content = render(&todo_spec(), TargetLanguage::Java, "ApiSdk.todos.TodosRequestBuilder");
  assert!(content.contains("public TodosItemRequestBuilder byId("), "{content}");
}
