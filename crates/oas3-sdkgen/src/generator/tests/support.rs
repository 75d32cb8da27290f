use oas3::Spec;
use serde_json::{Value, json};

use crate::generator::{
  codedom::{CodeDom, ElementId},
  config::GenerationConfig,
  resolver::{ModelResolver, Resolution},
  uri_space::UriSpaceTree,
};

pub(crate) fn parse_spec(document: Value) -> Spec {
  serde_json::from_value(document).expect("test document should deserialize")
}

/// A 3.1 document with the given `paths` and `components.schemas`.
pub(crate) fn spec_with(paths: Value, schemas: Value) -> Spec {
  parse_spec(json!({
    "openapi": "3.1.0",
    "info": { "title": "Test API", "version": "1.0.0" },
    "servers": [{ "url": "https://api.example.com/v1/" }],
    "paths": paths,
    "components": { "schemas": schemas }
  }))
}

pub(crate) fn spec_with_paths(paths: Value) -> Spec {
  spec_with(paths, json!({}))
}

/// `{ "get": { "responses": { "200": { "description": "ok" } } } }`
pub(crate) fn get_operation() -> Value {
  json!({ "get": { "responses": { "200": { "description": "ok" } } } })
}

/// Resolves `spec` into a code model for `config`.
pub(crate) fn resolve_model(spec: &Spec, config: &GenerationConfig) -> Resolution {
  let tree = UriSpaceTree::from_spec(spec).expect("document declares paths");
  ModelResolver::new(spec, config, &tree)
    .resolve()
    .expect("resolution succeeds")
}

/// A class or interface by its dotted namespace plus nesting chain.
pub(crate) fn declaration(dom: &CodeDom, qualified: &str) -> ElementId {
  dom
    .ids()
    .find(|id| dom.element(*id).is_type_declaration() && dom.qualified_name(*id) == qualified)
    .unwrap_or_else(|| panic!("no declaration named {qualified}"))
}

/// A 3.1 document with one collection, one item path and a `Todo` component.
pub(crate) fn todo_spec() -> Spec {
  spec_with(
    json!({
      "/": get_operation(),
      "/todos": {
        "get": {
          "parameters": [{ "name": "$top", "in": "query", "schema": { "type": "integer" } }],
          "responses": {
            "200": {
              "description": "ok",
              "content": { "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Todo" } } } }
            }
          }
        },
        "post": {
          "requestBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Todo" } } } },
          "responses": {
            "201": { "description": "created", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Todo" } } } },
            "4XX": { "description": "error", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Problem" } } } }
          }
        }
      },
      "/todos/{id}": {
        "get": {
          "responses": {
            "200": { "description": "ok", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Todo" } } } }
          }
        },
        "delete": { "responses": { "204": { "description": "gone" } } }
      }
    }),
    json!({
      "Todo": {
        "type": "object",
        "properties": {
          "id": { "type": "string" },
          "title": { "type": "string" },
          "done": { "type": "boolean" },
          "due-date": { "type": "string", "format": "date-time" },
          "priority": { "type": "string", "enum": ["low", "high"] }
        }
      },
      "Problem": { "type": "object", "properties": { "message": { "type": "string" } } }
    }),
  )
}
