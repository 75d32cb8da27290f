use super::{imports, no_stats, refined_for};
use crate::generator::{
  codedom::ElementTag,
  config::{GenerationConfig, TargetLanguage},
  refiner::refine,
  tests::support::{declaration, resolve_model, todo_spec},
};

#[test]
fn request_builders_import_models_and_runtime_types() {
  let resolution = refined_for(&todo_spec(), TargetLanguage::CSharp);
  let dom = &resolution.dom;
  let todos = declaration(dom, "ApiSdk.todos.TodosRequestBuilder");
  let imported = imports(dom, todos);

  for expected in [
    "ApiSdk.models.Todo",
    "ApiSdk.models.Problem",
    "ApiSdk.todos.item.TodosItemRequestBuilder",
    "RequestAdapter",
    "RequestInformation",
    "ErrorMappings",
  ] {
    assert!(imported.iter().any(|name| name == expected), "missing {expected} in {imported:?}");
  }
}

#[test]
fn nested_classes_hoist_their_references() {
  let resolution = refined_for(&todo_spec(), TargetLanguage::Java);
  let dom = &resolution.dom;
  let todos = declaration(dom, "ApiSdk.todos.TodosRequestBuilder");
  let configuration = dom
    .find_child_of_kind(todos, "TodosRequestBuilderGetRequestConfiguration", ElementTag::Class)
    .unwrap();

  assert_eq!(dom.children_of_kind(configuration, ElementTag::Using).count(), 0);
  assert!(imports(dom, todos).iter().any(|name| name == "RequestOption"));
  assert!(imports(dom, todos).iter().any(|name| name == "RequestHeaders"));
}

#[test]
fn same_namespace_imports_depend_on_the_file_layout() {
  let csharp = refined_for(&todo_spec(), TargetLanguage::CSharp);
  let todo = declaration(&csharp.dom, "ApiSdk.models.Todo");
  assert!(!imports(&csharp.dom, todo).iter().any(|name| name == "ApiSdk.models.TodoPriority"));

  let typescript = refined_for(&todo_spec(), TargetLanguage::TypeScript);
  let todo = declaration(&typescript.dom, "ApiSdk.models.Todo");
  assert!(imports(&typescript.dom, todo).iter().any(|name| name == "ApiSdk.models.TodoPriority"));
}

#[test]
fn errors_import_the_exception_base() {
  let resolution = refined_for(&todo_spec(), TargetLanguage::Python);
  let problem = declaration(&resolution.dom, "ApiSdk.models.Problem");

  assert!(imports(&resolution.dom, problem).iter().any(|name| name == "ApiException"));
}

#[test]
fn http_snippets_get_no_imports() {
  let spec = todo_spec();
  let config = GenerationConfig::builder()
    .language(TargetLanguage::Http)
    .build();
  let mut resolution = resolve_model(&spec, &config);
  let mut stats = no_stats();
  refine(&mut resolution.dom, TargetLanguage::Http, &mut stats).unwrap();

  assert!(resolution.dom.ids().all(|id| resolution.dom.element(id).tag() != ElementTag::Using));
}
