use http::Method;
use serde_json::json;

use crate::generator::{
  tests::support::{get_operation, spec_with_paths},
  uri_space::{UriSpaceTree, sanitize_parameter_name_for_url_template, sanitize_path_for_url_template},
};

#[test]
fn template_variable_names_are_escaped() {
  assert_eq!(sanitize_parameter_name_for_url_template("{user-id}"), "user%2Did");
  assert_eq!(sanitize_parameter_name_for_url_template("api.version"), "api%2Eversion");
  assert_eq!(sanitize_parameter_name_for_url_template("~name"), "%7Ename");
  assert_eq!(sanitize_parameter_name_for_url_template("$select"), "%24select");
  assert_eq!(sanitize_parameter_name_for_url_template("snake_case"), "snake_case");
  assert_eq!(sanitize_path_for_url_template("/users/{user-id}/items/{id}"), "/users/{user%2Did}/items/{id}");
}

#[test]
fn templates_without_query_parameters() {
  let spec = spec_with_paths(json!({ "/": get_operation(), "/todos/{id}": get_operation() }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();

  assert_eq!(tree.url_template(UriSpaceTree::ROOT, None, &spec), "{+baseurl}");
  assert_eq!(
    tree.url_template(tree.find("/todos/{id}").unwrap(), None, &spec),
    "{+baseurl}/todos/{id}"
  );
}

#[test]
fn optional_query_parameters_expand_sorted() {
  let spec = spec_with_paths(json!({
    "/todos": {
      "get": {
        "parameters": [
          { "name": "top", "in": "query", "schema": { "type": "integer" }, "explode": false },
          { "name": "filter", "in": "query", "schema": { "type": "string" } },
          { "name": "$select", "in": "query", "schema": { "type": "array", "items": { "type": "string" } } }
        ],
        "responses": { "200": { "description": "ok" } }
      }
    }
  }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();
  let todos = tree.find("/todos").unwrap();

  assert_eq!(
    tree.url_template(todos, None, &spec),
    "{+baseurl}/todos{?%24select*,filter*,top}"
  );
}

#[test]
fn required_query_parameters_come_first() {
  let spec = spec_with_paths(json!({
    "/search": {
      "parameters": [{ "name": "q", "in": "query", "required": true, "schema": { "type": "string" } }],
      "get": {
        "parameters": [{ "name": "page", "in": "query", "schema": { "type": "integer" } }],
        "responses": { "200": { "description": "ok" } }
      },
      "post": {
        "parameters": [{ "name": "dry-run", "in": "query", "schema": { "type": "boolean" } }],
        "responses": { "200": { "description": "ok" } }
      }
    }
  }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();
  let search = tree.find("/search").unwrap();

  assert_eq!(
    tree.url_template(search, None, &spec),
    "{+baseurl}/search?q={q}{&dry%2Drun*,page*}"
  );
  assert_eq!(
    tree.url_template(search, Some(&Method::GET), &spec),
    "{+baseurl}/search?q={q}{&page*}"
  );
  assert!(tree.query_parameters(search, None, &spec).iter().any(|parameter| parameter.required));
}

#[test]
fn duplicate_query_parameters_keep_the_first_declaration() {
  let spec = spec_with_paths(json!({
    "/todos": {
      "parameters": [{ "name": "limit", "in": "query", "required": true, "schema": { "type": "integer" } }],
      "get": {
        "parameters": [{ "name": "limit", "in": "query", "schema": { "type": "integer" } }],
        "responses": { "200": { "description": "ok" } }
      }
    }
  }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();
  let parameters = tree.query_parameters(tree.find("/todos").unwrap(), None, &spec);

  assert_eq!(parameters.len(), 1);
  assert!(parameters[0].required);
}

#[test]
fn segment_parameters_use_declarations_from_descendants() {
  let spec = spec_with_paths(json!({
    "/users/{user-id}/messages": {
      "parameters": [{
        "name": "user-id",
        "in": "path",
        "required": true,
        "description": "The user key",
        "schema": { "type": "string" }
      }],
      "get": { "responses": { "200": { "description": "ok" } } }
    }
  }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();
  let user = tree.find("/users/{user-id}").unwrap();

  let parameters = tree.segment_parameters(user, &spec);
  assert_eq!(parameters.len(), 1);
  assert_eq!(parameters[0].name, "user-id");
  assert_eq!(parameters[0].description.as_deref(), Some("The user key"));
  assert_eq!(parameters[0].serialization_name(), "user%2Did");

  let messages = tree.find("/users/{user-id}/messages").unwrap();
  assert_eq!(tree.path_parameters(messages, &spec).len(), 1);
}
