use serde_json::json;

use super::{assert_contains_all, render, try_render};
use crate::generator::{
  config::{GenerationConfig, TargetLanguage},
  errors::GenerationError,
  tests::support::{spec_with, todo_spec},
};

#[test]
fn models_are_structs_behind_interfaces() {
  let content = render(&todo_spec(), TargetLanguage::Go, "ApiSdk.models.Todo");

  assert_contains_all(
    &content,
    &[
      "package models",
      "\t\"time\"",
      "s \"github.com/microsoft/kiota-abstractions-go/serialization\"",
      "type Todo struct {",
      "func NewTodo() *Todo {",
      "func CreateTodoFromDiscriminatorValue(parseNode s.ParseNode) (s.Parsable, error) {",
      "func (m *Todo) GetFieldDeserializers() map[string]func(s.ParseNode) error {",
      "res[\"due-date\"] = func(n s.ParseNode) error {",
      "func (m *Todo) Serialize(writer s.SerializationWriter) error {",
      "func (m *Todo) GetTitle() *string {",
      "func (m *Todo) SetTitle(value *string) {",
    ],
  );
  assert!(!content.contains("\"context\""), "models do not import context");
}

#[test]
fn model_interfaces_list_the_accessors() {
  let content = render(&todo_spec(), TargetLanguage::Go, "ApiSdk.models.Todoable");

  assert_contains_all(
    &content,
    &[
      "type Todoable interface {",
      "s.AdditionalDataHolder",
      "s.Parsable",
      "GetTitle() *string",
      "SetTitle(value *string)",
    ],
  );
}

#[test]
fn request_builders_take_a_context() {
  let content = render(&todo_spec(), TargetLanguage::Go, "ApiSdk.todos.TodosRequestBuilder");

  assert_contains_all(
    &content,
    &[
      "package todos",
      "\t\"context\"",
      "abs \"github.com/microsoft/kiota-abstractions-go\"",
      "imodels \"apisdk/models\"",
      "func NewTodosRequestBuilderInternal(pathParameters map[string]string, requestAdapter abs.RequestAdapter) *TodosRequestBuilder {",
      "func (m *TodosRequestBuilder) Get(ctx context.Context",
      "([]imodels.Todoable, error)",
      "\"4XX\": imodels.CreateProblemFromDiscriminatorValue,",
      "abs.NewRequestInformationWithMethodAndUrlTemplateAndPathParameters(abs.GET, m.urlTemplate, m.pathParameters)",
      "func (m *TodosRequestBuilder) ById(id *string) *itodositem.TodosItemRequestBuilder {",
      "itodositem \"apisdk/todos/item\"",
      "`uriparametername:\"%24top\"`",
    ],
  );
}

#[test]
fn decimals_cannot_be_expressed() {
  let spec = spec_with(
    json!({ "/prices": { "get": { "responses": { "200": { "description": "ok", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Price" } } } } } } } }),
    json!({ "Price": { "type": "object", "properties": { "amount": { "type": "number", "format": "decimal" } } } }),
  );
  let config = GenerationConfig::builder().language(TargetLanguage::Go).build();

  let result = try_render(&spec, &config, "ApiSdk.models.Price");
  assert!(
    matches!(result, Err(GenerationError::UnsupportedType { language: TargetLanguage::Go, .. })),
    "{result:?}"
  );
}
