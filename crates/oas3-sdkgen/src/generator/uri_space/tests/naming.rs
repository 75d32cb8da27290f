use serde_json::json;

use crate::generator::{
  tests::support::{get_operation, spec_with_paths},
  uri_space::{UriSpaceTree, cleanup_parameters_from_path},
};

fn tree_for(paths: &[&str]) -> UriSpaceTree {
  let paths = paths
    .iter()
    .map(|path| ((*path).to_string(), get_operation()))
    .collect::<serde_json::Map<_, _>>();
  UriSpaceTree::from_spec(&spec_with_paths(serde_json::Value::Object(paths))).unwrap()
}

#[test]
fn parameters_become_with_fragments() {
  assert_eq!(cleanup_parameters_from_path("{id}"), "WithId");
  assert_eq!(
    cleanup_parameters_from_path("getStats(period='{period}')"),
    "getStatsWithPeriod"
  );
  assert_eq!(
    cleanup_parameters_from_path("range(start={start},end={end})"),
    "rangeWithStartWithEnd"
  );
  assert_eq!(cleanup_parameters_from_path("byIds(ids=@ids)"), "byIdsWithIds");
  assert_eq!(cleanup_parameters_from_path("todos"), "todos");
}

#[test]
fn namespaces_follow_the_path() {
  let tree = tree_for(&["/todos/{id}", "/users/{user-id}/mail-folders", "/models", "/Item", "/json"]);

  assert_eq!(tree.namespace_name(UriSpaceTree::ROOT, "ApiSdk"), "ApiSdk");
  assert_eq!(
    tree.namespace_name(tree.find("/todos/{id}").unwrap(), "ApiSdk"),
    "ApiSdk.todos.item"
  );
  assert_eq!(
    tree.namespace_name(tree.find("/users/{user-id}/mail-folders").unwrap(), "ApiSdk"),
    "ApiSdk.users.item.mailFolders"
  );
  assert_eq!(
    tree.namespace_name(tree.find("/models").unwrap(), "ApiSdk"),
    "ApiSdk.modelsRequests"
  );
  assert_eq!(tree.namespace_name(tree.find("/Item").unwrap(), "ApiSdk"), "ApiSdk.Item_Escaped");
  assert_eq!(tree.namespace_name(tree.find("/json").unwrap(), ""), "jsonEscaped");
}

#[test]
fn item_classes_fall_back_to_the_previous_segment() {
  let tree = tree_for(&["/todos/{id}"]);
  let item = tree.find("/todos/{id}").unwrap();

  assert_eq!(
    tree.request_builder_class_name(item, "ItemRequestBuilder"),
    "TodosItemRequestBuilder"
  );
}

#[test]
fn item_classes_strip_trailing_id() {
  let tree = tree_for(&["/users/{user-id}", "/messages/{messageId1}"]);

  assert_eq!(
    tree.request_builder_class_name(tree.find("/users/{user-id}").unwrap(), "ItemRequestBuilder"),
    "UserItemRequestBuilder"
  );
  assert_eq!(
    tree.request_builder_class_name(tree.find("/messages/{messageId1}").unwrap(), "ItemRequestBuilder"),
    "WithMessageItemRequestBuilder"
  );
}

#[test]
fn collection_classes_and_navigation_names() {
  let tree = tree_for(&["/todos", "/mail-folders", "/reports/getStats(period='{period}')"]);

  let todos = tree.find("/todos").unwrap();
  assert_eq!(tree.navigation_name(todos, ""), "todos");
  assert_eq!(tree.request_builder_class_name(todos, "RequestBuilder"), "TodosRequestBuilder");

  let folders = tree.find("/mail-folders").unwrap();
  assert_eq!(tree.navigation_name(folders, ""), "mailFolders");

  let stats = tree.find("/reports/getStats(period='{period}')").unwrap();
  assert_eq!(tree.navigation_name(stats, ""), "getStatsWithPeriod");
  assert_eq!(
    tree.request_builder_class_name(stats, "RequestBuilder"),
    "GetStatsWithPeriodRequestBuilder"
  );
}

#[test]
fn http_verb_segments_get_a_path_suffix() {
  let tree = tree_for(&["/items/delete", "/items/get"]);

  assert_eq!(tree.navigation_name(tree.find("/items/delete").unwrap(), ""), "deletePath");
  assert_eq!(tree.navigation_name(tree.find("/items/get").unwrap(), ""), "getPath");
}

#[test]
fn file_extensions_are_skipped_in_class_names() {
  let tree = tree_for(&["/reports/summary.json", "/files/{name}.json"]);

  let summary = tree.find("/reports/summary.json").unwrap();
  assert_eq!(tree.class_name(summary, "Response"), "SummaryResponse");
  assert_eq!(tree.navigation_name(summary, ""), "summaryJson");

  let file = tree.find("/files/{name}.json").unwrap();
  assert_eq!(
    tree.request_builder_class_name(file, "ItemRequestBuilder"),
    "WithNameItemRequestBuilder"
  );
}

#[test]
fn trailing_slash_nodes_have_a_name() {
  let tree = tree_for(&["/todos/"]);
  let slash = tree.find("/todos/").unwrap();

  assert_eq!(tree.navigation_name(slash, ""), "slash");
  assert_eq!(tree.namespace_name(slash, "ApiSdk"), "ApiSdk.todos");
}

#[test]
fn value_segments_become_content() {
  let tree = tree_for(&["/photo/$value"]);

  assert_eq!(tree.navigation_name(tree.find("/photo/$value").unwrap(), ""), "Content");
}
