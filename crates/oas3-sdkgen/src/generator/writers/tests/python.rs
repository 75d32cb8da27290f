use super::{assert_contains_all, render};
use crate::generator::{config::TargetLanguage, tests::support::todo_spec};

#[test]
fn models_are_dataclasses() {
  let content = render(&todo_spec(), TargetLanguage::Python, "ApiSdk.models.Todo");

  assert_contains_all(
    &content,
    &[
      "from __future__ import annotations",
      "@dataclass",
      "class Todo(AdditionalDataHolder, Parsable):",
      "def create_from_discriminator_value(",
      "def get_field_deserializers(self) -> dict[str, Callable[[ParseNode], None]]:",
      "\"due-date\"",
    ],
  );
}

#[test]
fn executors_are_coroutines() {
  let content = render(&todo_spec(), TargetLanguage::Python, "ApiSdk.todos.TodosRequestBuilder");

  assert_contains_all(
    &content,
    &[
      "async def get(",
      "async def post(",
      "def to_get_request_information(",
      "error_mapping: dict[str, type[ParsableFactory]] = {",
      "def get_query_parameter(self, original_name: str) -> str:",
    ],
  );
  assert!(!content.contains("@dataclass\nclass TodosRequestBuilder"));
}
