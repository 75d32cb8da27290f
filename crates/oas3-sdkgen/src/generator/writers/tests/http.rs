use std::collections::BTreeMap;

use super::{assert_contains_all, emitted, render};
use crate::generator::{config::TargetLanguage, tests::support::todo_spec, writers::http::snippet_url};

#[test]
fn only_builders_with_operations_get_a_snippet() {
  let files = emitted(&todo_spec(), TargetLanguage::Http);

  assert!(files.contains(&"ApiSdk.todos.TodosRequestBuilder".to_string()), "{files:?}");
  assert!(files.contains(&"ApiSdk.todos.item.TodosItemRequestBuilder".to_string()), "{files:?}");
  assert!(!files.iter().any(|name| name.starts_with("ApiSdk.models")), "{files:?}");
}

#[test]
fn collection_snippet_lists_every_operation() {
  let content = render(&todo_spec(), TargetLanguage::Http, "ApiSdk.todos.TodosRequestBuilder");

  assert_contains_all(
    &content,
    &[
      "@url = https://api.example.com/v1",
      "# {+baseurl}/todos{?%24top}",
      "@top = ",
      "GET {{url}}/todos?$top={{top}} HTTP/1.1",
      "POST {{url}}/todos HTTP/1.1",
      "Content-Type: application/json",
      "\"title\": \"string\"",
      "\"done\": false",
      "\"priority\": \"low\"",
      "###",
    ],
  );
}

#[test]
fn item_snippet_declares_path_variables() {
  let content = render(&todo_spec(), TargetLanguage::Http, "ApiSdk.todos.item.TodosItemRequestBuilder");

  assert_contains_all(
    &content,
    &["@id = ", "GET {{url}}/todos/{{id}} HTTP/1.1", "DELETE {{url}}/todos/{{id}} HTTP/1.1"],
  );
}

#[test]
fn template_variables_become_snippet_variables() {
  let names = BTreeMap::from([
    ("%24skip".to_string(), "skip".to_string()),
    ("filter".to_string(), "filter".to_string()),
  ]);

  assert_eq!(
    snippet_url("{+baseurl}/users/{user%2Did}/posts{?%24skip,filter*}", &names),
    "{{url}}/users/{{userId}}/posts?$skip={{skip}}&filter={{filter}}"
  );
  assert_eq!(snippet_url("{+baseurl}/health", &BTreeMap::new()), "{{url}}/health");
}

#[test]
fn query_parameters_of_other_operations_are_left_out() {
  let names = BTreeMap::from([("filter".to_string(), "filter".to_string())]);

  assert_eq!(
    snippet_url("{+baseurl}/posts{?%24skip,filter}", &names),
    "{{url}}/posts?filter={{filter}}"
  );
  assert_eq!(snippet_url("{+baseurl}/posts{?%24skip}", &BTreeMap::new()), "{{url}}/posts");
}
