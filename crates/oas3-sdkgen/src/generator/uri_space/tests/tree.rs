use serde_json::json;

use crate::generator::{
  comparer::PathPatterns,
  tests::support::{get_operation, spec_with_paths},
  uri_space::UriSpaceTree,
};

fn patterns(include: &[&str], exclude: &[&str]) -> PathPatterns {
  let include = include.iter().map(|value| (*value).to_string()).collect::<Vec<_>>();
  let exclude = exclude.iter().map(|value| (*value).to_string()).collect::<Vec<_>>();
  PathPatterns::new(&include, &exclude).unwrap()
}

#[test]
fn empty_path_list_builds_nothing() {
  let spec = spec_with_paths(json!({}));

  assert!(UriSpaceTree::from_spec(&spec).is_none());
}

#[test]
fn every_input_path_is_reproduced_exactly_once() {
  let inputs = [
    "/",
    "/todos",
    "/todos/{id}",
    "/todos/{id}/tags",
    "/users/{user-id}/mail-folders/",
    "/reports/getStats(period='{period}')",
  ];
  let paths = inputs
    .iter()
    .map(|path| ((*path).to_string(), get_operation()))
    .collect::<serde_json::Map<_, _>>();
  let spec = spec_with_paths(serde_json::Value::Object(paths));

  let tree = UriSpaceTree::from_spec(&spec).unwrap();
  let mut rebuilt = tree
    .operation_nodes()
    .into_iter()
    .map(|id| tree.full_path(id))
    .collect::<Vec<_>>();
  rebuilt.sort();
  let mut expected = inputs.iter().map(ToString::to_string).collect::<Vec<_>>();
  expected.sort();

  assert_eq!(rebuilt, expected);
  for id in tree.walk() {
    assert_eq!(tree.full_path(id), tree.node(id).path());
  }
}

#[test]
fn root_path_attaches_to_the_root_node() {
  let spec = spec_with_paths(json!({ "/": get_operation(), "/todos": get_operation() }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();

  assert!(tree.root().has_operations());
  assert_eq!(tree.root().path(), "/");
  assert_eq!(tree.find("/"), Some(UriSpaceTree::ROOT));
}

#[test]
fn segments_are_shared_and_case_sensitive() {
  let spec = spec_with_paths(json!({
    "/todos": get_operation(),
    "/todos/{id}": get_operation(),
    "/Todos": get_operation(),
  }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();

  assert_eq!(tree.root().children().count(), 2);
  let todos = tree.find("/todos").unwrap();
  assert_eq!(tree.node(todos).children().count(), 1);
  assert_ne!(tree.find("/Todos"), Some(todos));
  assert_eq!(tree.len(), 4);
}

#[test]
fn intermediate_segments_have_no_operations() {
  let spec = spec_with_paths(json!({ "/a/b/c": get_operation() }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();

  let b = tree.find("/a/b").unwrap();
  assert!(!tree.node(b).has_operations());
  assert_eq!(tree.operation_nodes(), vec![tree.find("/a/b/c").unwrap()]);
}

#[test]
fn parameter_segments_are_recognized_syntactically() {
  let spec = spec_with_paths(json!({
    "/todos/{id}": get_operation(),
    "/files/{name}.json": get_operation(),
    "/reports/range(start={start},end={end})": get_operation(),
  }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();

  let item = tree.node(tree.find("/todos/{id}").unwrap());
  assert!(item.is_single_parameter_segment());
  assert!(item.belongs_to_item_namespace());

  let with_extension = tree.node(tree.find("/files/{name}.json").unwrap());
  assert!(with_extension.is_single_parameter_segment());

  let range = tree.node(tree.find("/reports/range(start={start},end={end})").unwrap());
  assert!(range.is_multi_parameter_segment());
  assert!(!range.is_single_parameter_segment());
}

#[test]
fn operations_are_listed_in_method_order() {
  let spec = spec_with_paths(json!({
    "/todos": {
      "post": { "responses": { "201": { "description": "created" } } },
      "get": { "responses": { "200": { "description": "ok" } } },
    }
  }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();
  let node = tree.node(tree.find("/todos").unwrap());

  let methods = node
    .operations()
    .into_iter()
    .map(|(method, _)| method.to_string())
    .collect::<Vec<_>>();
  assert_eq!(methods, vec!["GET", "POST"]);
}

#[test]
fn filtering_rebuilds_from_retained_operations() {
  let spec = spec_with_paths(json!({
    "/todos": {
      "get": { "responses": { "200": { "description": "ok" } } },
      "post": { "responses": { "201": { "description": "created" } } },
    },
    "/users": get_operation(),
    "/users/{id}": get_operation(),
  }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();

  let filtered = tree.filtered(&patterns(&["/todos"], &["/todos#POST"])).unwrap();
  let todos = filtered.find("/todos").unwrap();
  assert_eq!(filtered.node(todos).operations().len(), 1);
  assert!(filtered.find("/users").is_none());

  assert!(tree.filtered(&patterns(&["/nothing"], &[])).is_none());
}

#[test]
fn render_lists_methods_per_segment() {
  let spec = spec_with_paths(json!({ "/todos": get_operation(), "/todos/{id}": get_operation() }));
  let tree = UriSpaceTree::from_spec(&spec).unwrap();

  assert_eq!(tree.render(), "/\n  todos [GET]\n    {id} [GET]\n");
  assert_eq!(tree.operation_count(), 2);
}
