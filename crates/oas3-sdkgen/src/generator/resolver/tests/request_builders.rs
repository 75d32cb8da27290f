use serde_json::json;

use super::{child, find, names_of, resolve, resolve_with};
use crate::generator::{
  codedom::{ElementTag, MethodKind, ParameterKind, PropertyKind},
  config::GenerationConfig,
  tests::support::{get_operation, spec_with, spec_with_paths},
};

#[test]
fn todos_produce_collection_and_item_builders() {
  let spec = spec_with(
    json!({
      "/": get_operation(),
      "/todos/{id}": {
        "get": {
          "responses": {
            "200": {
              "description": "ok",
              "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Todo" } } }
            }
          }
        }
      }
    }),
    json!({ "Todo": { "type": "object", "properties": { "id": { "type": "string" }, "title": { "type": "string" } } } }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let client = find(dom, "ApiSdk.ApiClient");
  let todos = find(dom, "ApiSdk.todos.TodosRequestBuilder");
  let item = find(dom, "ApiSdk.todos.item.TodosItemRequestBuilder");

  assert_eq!(resolution.root, client);
  let navigation = dom.element(child(dom, client, "todos", ElementTag::Property)).as_property().unwrap();
  assert_eq!(navigation.kind, PropertyKind::RequestBuilder);
  assert_eq!(navigation.ty.definition_id(), Some(todos));

  let indexer = child(dom, todos, "Todos-indexer", ElementTag::Indexer);
  assert_eq!(dom.element(indexer).as_indexer().unwrap().return_type.definition_id(), Some(item));
  assert_eq!(dom.element(indexer).as_indexer().unwrap().path_segment, "todos");
  assert_eq!(names_of(dom, indexer, ElementTag::Parameter), vec!["id"]);

  let template = dom.element(child(dom, item, "urlTemplate", ElementTag::Property)).as_property().unwrap();
  assert_eq!(template.default_value.as_deref(), Some("{+baseurl}/todos/{id}"));
  assert_eq!(
    names_of(dom, item, ElementTag::Method),
    vec!["constructor", "constructor", "withUrl", "get", "toGetRequestInformation"]
  );
  assert_eq!(resolution.stats.request_builders_generated, 3);
  assert_eq!(resolution.stats.operations_converted, 2);
}

#[test]
fn client_gets_the_first_server_as_base_url() {
  let spec = spec_with_paths(json!({ "/todos": get_operation() }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let constructor = child(dom, resolution.root, "constructor", ElementTag::Method);
  let def = dom.element(constructor).as_method().unwrap();

  assert_eq!(def.kind, MethodKind::ClientConstructor);
  assert_eq!(def.base_url.as_deref(), Some("https://api.example.com/v1"));
  assert_eq!(names_of(dom, constructor, ElementTag::Parameter), vec!["requestAdapter"]);
  assert!(dom.find_child_of_kind(resolution.root, "withUrl", ElementTag::Method).is_none());
  assert_eq!(
    dom.element(resolution.root).documentation.as_deref(),
    Some("The main entry point of the SDK, exposes the configuration and the fluent API.")
  );
}

#[test]
fn configured_root_url_and_names_win() {
  let spec = spec_with_paths(json!({ "/todos": get_operation() }));
  let config = GenerationConfig::builder()
    .client_class_name("TodoClient")
    .client_namespace_name("Acme.Todo")
    .api_root_url("https://override.example.com")
    .build();

  let resolution = resolve_with(&spec, &config);
  let dom = &resolution.dom;
  let client = find(dom, "Acme.Todo.TodoClient");
  let constructor = dom.element(child(dom, client, "constructor", ElementTag::Method)).as_method().unwrap();

  assert_eq!(constructor.base_url.as_deref(), Some("https://override.example.com"));
  find(dom, "Acme.Todo.todos.TodosRequestBuilder");
}

#[test]
fn backing_store_factory_is_optional_on_the_client() {
  let spec = spec_with_paths(json!({ "/todos": get_operation() }));
  let config = GenerationConfig::builder().uses_backing_store(true).build();

  let resolution = resolve_with(&spec, &config);
  let dom = &resolution.dom;
  let constructor = child(dom, resolution.root, "constructor", ElementTag::Method);
  let store = child(dom, constructor, "backingStore", ElementTag::Parameter);
  let def = dom.element(store).as_parameter().unwrap();

  assert_eq!(def.kind, ParameterKind::BackingStore);
  assert!(def.optional);
}

#[test]
fn user_id_segment_yields_a_normalized_indexer() {
  let spec = spec_with_paths(json!({
    "/users/{user-id}": {
      "parameters": [
        { "name": "user-id", "in": "path", "required": true, "description": "The user key", "schema": { "type": "string" } }
      ],
      "get": { "responses": { "200": { "description": "ok" } } }
    }
  }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let users = find(dom, "ApiSdk.users.UsersRequestBuilder");
  let item = find(dom, "ApiSdk.users.item.UserItemRequestBuilder");
  let indexer = dom
    .children_of_kind(users, ElementTag::Indexer)
    .next()
    .expect("users has an indexer");
  let parameter = child(dom, indexer, "userId", ElementTag::Parameter);
  let def = dom.element(parameter).as_parameter().unwrap();

  assert_eq!(dom.element(indexer).as_indexer().unwrap().return_type.definition_id(), Some(item));
  assert_eq!(def.serialization_name.as_deref(), Some("user%2Did"));
  assert_eq!(dom.element(parameter).documentation.as_deref(), Some("The user key"));

  let constructor = dom
    .children_of_kind(item, ElementTag::Method)
    .find(|id| dom.element(*id).method_kind() == Some(MethodKind::Constructor))
    .unwrap();
  let path = child(dom, constructor, "userId", ElementTag::Parameter);
  assert!(dom.element(path).as_parameter().unwrap().optional);
}

#[test]
fn multi_parameter_segments_become_methods() {
  let spec = spec_with_paths(json!({
    "/reports/getStats(period='{period}')": {
      "get": {
        "parameters": [{ "name": "period", "in": "path", "required": true, "schema": { "type": "integer" } }],
        "responses": { "200": { "description": "ok" } }
      }
    }
  }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let reports = find(dom, "ApiSdk.reports.ReportsRequestBuilder");
  let method = child(dom, reports, "getStatsWithPeriod", ElementTag::Method);
  let def = dom.element(method).as_method().unwrap();

  assert_eq!(def.kind, MethodKind::RequestBuilderWithParameters);
  let period = dom.element(child(dom, method, "period", ElementTag::Parameter)).as_parameter().unwrap();
  assert_eq!(period.kind, ParameterKind::Path);
  assert!(!period.optional);
  assert_eq!(
    period.ty.as_primitive(),
    Some(crate::generator::codedom::Primitive::Int32)
  );
}

#[test]
fn raw_url_constructor_drops_path_parameters() {
  let spec = spec_with_paths(json!({ "/todos": get_operation() }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let todos = find(dom, "ApiSdk.todos.TodosRequestBuilder");
  let raw = dom
    .children_of_kind(todos, ElementTag::Method)
    .find(|id| dom.element(*id).method_kind() == Some(MethodKind::RawUrlConstructor))
    .unwrap();

  assert_eq!(names_of(dom, raw, ElementTag::Parameter), vec!["rawUrl", "requestAdapter"]);
}

#[test]
fn navigation_steps_aside_for_builder_members() {
  let spec = spec_with_paths(json!({
    "/reports": get_operation(),
    "/reports/withUrl": get_operation()
  }));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let reports = find(dom, "ApiSdk.reports.ReportsRequestBuilder");

  let navigation = dom
    .element(child(dom, reports, "withUrl1", ElementTag::Property))
    .as_property()
    .unwrap();
  assert_eq!(navigation.kind, PropertyKind::RequestBuilder);
  let with_url = dom.element(child(dom, reports, "withUrl", ElementTag::Method)).as_method().unwrap();
  assert_eq!(with_url.kind, MethodKind::RawUrlBuilder);
}
