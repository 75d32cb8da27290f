use serde_json::json;

use super::{child, find, names_of, resolve};
use crate::generator::{
  codedom::{ClassKind, CollectionKind, ElementTag, ParameterKind, Primitive, PropertyKind},
  metrics::GenerationWarning,
  tests::support::{spec_with, spec_with_paths},
};

#[test]
fn query_parameters_get_their_own_class() {
  let spec = spec_with_paths(json!({
    "/todos": {
      "get": {
        "parameters": [
          { "name": "$top", "in": "query", "schema": { "type": "integer" } },
          { "name": "status", "in": "query", "required": true, "schema": { "type": "string", "enum": ["open", "done"] } },
          { "name": "tags", "in": "query", "schema": { "type": "array", "items": { "type": "string" } } },
          { "name": "x-trace", "in": "header", "schema": { "type": "string" } }
        ],
        "responses": { "200": { "description": "ok" } }
      }
    }
  }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let todos = find(dom, "ApiSdk.todos.TodosRequestBuilder");
  let query = child(dom, todos, "TodosRequestBuilderGetQueryParameters", ElementTag::Class);

  assert_eq!(dom.element(query).class_kind(), Some(ClassKind::QueryParameters));
  assert_eq!(names_of(dom, query, ElementTag::Property), vec!["top", "status", "tags"]);

  let top = dom.element(child(dom, query, "top", ElementTag::Property)).as_property().unwrap();
  assert_eq!(top.kind, PropertyKind::QueryParameter);
  assert_eq!(top.wire_name.as_deref(), Some("%24top"));
  assert_eq!(top.ty.as_primitive(), Some(Primitive::Int32));

  let status = dom.element(child(dom, query, "status", ElementTag::Property)).as_property().unwrap();
  let status_enum = status.ty.definition_id().expect("status is an enum");
  assert_eq!(dom.element(status_enum).class_kind(), Some(ClassKind::Enum));

  let tags = dom.element(child(dom, query, "tags", ElementTag::Property)).as_property().unwrap();
  assert_eq!(tags.ty.as_primitive(), Some(Primitive::String));
  assert_eq!(tags.ty.collection, CollectionKind::Array);

  let configuration = child(dom, todos, "TodosRequestBuilderGetRequestConfiguration", ElementTag::Class);
  assert_eq!(
    names_of(dom, configuration, ElementTag::Property),
    vec!["headers", "options", "queryParameters"]
  );
}

#[test]
fn operations_without_query_parameters_skip_the_class() {
  let spec = spec_with_paths(json!({ "/todos": { "delete": { "responses": { "204": { "description": "gone" } } } } }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let todos = find(dom, "ApiSdk.todos.TodosRequestBuilder");
  let delete = dom.element(child(dom, todos, "delete", ElementTag::Method)).as_method().unwrap();

  assert_eq!(
    names_of(dom, todos, ElementTag::Class),
    vec!["TodosRequestBuilderDeleteRequestConfiguration"]
  );
  assert!(delete.return_type.is_void());
  assert!(delete.is_async);
}

#[test]
fn error_responses_become_mappings() {
  let spec = spec_with(
    json!({
      "/todos": {
        "get": {
          "responses": {
            "200": { "description": "ok", "content": { "application/json": { "schema": { "type": "array", "items": { "type": "string" } } } } },
            "404": { "description": "missing", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Problem" } } } },
            "default": { "description": "error", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Problem" } } } }
          }
        }
      }
    }),
    json!({ "Problem": { "type": "object", "properties": { "message": { "type": "string" } } } }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let todos = find(dom, "ApiSdk.todos.TodosRequestBuilder");
  let problem = find(dom, "ApiSdk.models.Problem");
  let get = dom.element(child(dom, todos, "get", ElementTag::Method)).as_method().unwrap();

  assert_eq!(
    get.error_mappings.keys().map(String::as_str).collect::<Vec<_>>(),
    vec!["404", "4XX", "5XX"]
  );
  assert!(get.error_mappings.values().all(|ty| ty.definition_id() == Some(problem)));
  assert!(dom.element(problem).as_class().unwrap().is_error);
  assert_eq!(get.return_type.as_primitive(), Some(Primitive::String));
  assert_eq!(get.return_type.collection, CollectionKind::Complex);

  let generator = dom
    .element(child(dom, todos, "toGetRequestInformation", ElementTag::Method))
    .as_method()
    .unwrap();
  assert_eq!(generator.accepted_response_types, vec!["application/json"]);
}

#[test]
fn inline_request_bodies_are_named_after_the_operation() {
  let spec = spec_with_paths(json!({
    "/todos": {
      "post": {
        "requestBody": {
          "required": true,
          "content": {
            "application/json": { "schema": { "type": "object", "properties": { "title": { "type": "string" } } } },
            "text/plain": { "schema": { "type": "string" } }
          }
        },
        "responses": { "201": { "description": "created" } }
      }
    }
  }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let todos = find(dom, "ApiSdk.todos.TodosRequestBuilder");
  let post = child(dom, todos, "post", ElementTag::Method);
  let body = dom.element(child(dom, post, "body", ElementTag::Parameter)).as_parameter().unwrap();
  let body_class = body.ty.definition_id().expect("body is a model");

  assert_eq!(body.kind, ParameterKind::RequestBody);
  assert_eq!(dom.qualified_name(body_class), "ApiSdk.todos.TodosPostRequestBody");
  assert_eq!(
    dom.element(post).as_method().unwrap().request_body_content_type.as_deref(),
    Some("application/json")
  );
  assert!(dom.element(post).as_method().unwrap().return_type.is_void());
  assert_eq!(names_of(dom, post, ElementTag::Parameter), vec!["body", "requestConfiguration"]);
}

#[test]
fn binary_bodies_and_responses_use_streams() {
  let spec = spec_with_paths(json!({
    "/files": {
      "put": {
        "requestBody": { "content": { "application/pdf": { "schema": { "type": "string", "format": "binary" } } } },
        "responses": { "200": { "description": "ok", "content": { "application/pdf": {} } } }
      }
    }
  }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let files = find(dom, "ApiSdk.files.FilesRequestBuilder");
  let put = child(dom, files, "put", ElementTag::Method);
  let def = dom.element(put).as_method().unwrap();
  let body = dom.element(child(dom, put, "body", ElementTag::Parameter)).as_parameter().unwrap();

  assert_eq!(def.return_type.as_primitive(), Some(Primitive::Stream));
  assert_eq!(body.ty.as_primitive(), Some(Primitive::Stream));
  assert_eq!(def.request_body_content_type.as_deref(), Some("application/pdf"));
  assert!(resolution.stats.warnings.iter().any(|warning| matches!(
    warning,
    GenerationWarning::UnstructuredContent { path, .. } if path == "/files"
  )));

  let generator = dom
    .element(child(dom, files, "toPutRequestInformation", ElementTag::Method))
    .as_method()
    .unwrap();
  assert_eq!(generator.accepted_response_types, vec!["application/pdf"]);
}

#[test]
fn plain_text_responses_return_strings() {
  let spec = spec_with_paths(json!({
    "/ping": { "get": { "responses": { "200": { "description": "ok", "content": { "text/html": {}, "text/plain": {} } } } } }
  }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let ping = find(dom, "ApiSdk.ping.PingRequestBuilder");
  let get = dom.element(child(dom, ping, "get", ElementTag::Method)).as_method().unwrap();

  assert_eq!(get.return_type.as_primitive(), Some(Primitive::String));
}
