use serde_json::json;

use super::{assert_contains_all, render, try_render};
use crate::generator::{
  config::{GenerationConfig, TargetLanguage},
  errors::GenerationError,
  tests::support::{spec_with, todo_spec},
};

#[test]
fn models_are_interfaces_with_free_functions() {
  let content = render(&todo_spec(), TargetLanguage::TypeScript, "ApiSdk.models.Todo");

  assert_contains_all(
    &content,
    &[
      "/* eslint-disable */",
      "from '@microsoft/kiota-abstractions';",
      "export interface Todo extends AdditionalDataHolder, Parsable {",
      "export function createTodoFromDiscriminatorValue(",
      "export function deserializeIntoTodo(",
      "export function serializeTodo(",
    ],
  );
  assert!(!content.contains("export class Todo"));
}

#[test]
fn request_builders_import_models_by_relative_module() {
  let content = render(&todo_spec(), TargetLanguage::TypeScript, "ApiSdk.todos.TodosRequestBuilder");

  assert_contains_all(
    &content,
    &[
      "from '../models/todo.js';",
      "export class TodosRequestBuilder {",
      "public async get(",
      "public async post(",
      "\"4XX\": createProblemFromDiscriminatorValue as ParsableFactory<Parsable>,",
      "new RequestInformation(HttpMethod.GET",
    ],
  );
}

#[test]
fn decimals_cannot_be_expressed() {
  let spec = spec_with(
    json!({ "/prices": { "get": { "responses": { "200": { "description": "ok", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Price" } } } } } } } }),
    json!({ "Price": { "type": "object", "properties": { "amount": { "type": "number", "format": "decimal" } } } }),
  );
  let config = GenerationConfig::builder().language(TargetLanguage::TypeScript).build();

  let error = try_render(&spec, &config, "ApiSdk.models.Price").expect_err("decimal is rejected");
  let GenerationError::UnsupportedType {
    language, type_name, ..
  } = &error
  else {
    panic!("unexpected failure: {error}");
  };
  assert_eq!(*language, TargetLanguage::TypeScript);
  assert_eq!(type_name, "Decimal");
  assert!(error.is_emission_error());
}
