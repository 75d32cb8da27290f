use super::{method_names, refined, refined_for};
use crate::generator::{
  codedom::{ElementTag, MethodKind, ParameterKind},
  config::{GenerationConfig, TargetLanguage},
  tests::support::{declaration, todo_spec},
};

#[test]
fn java_models_get_accessor_pairs() {
  let resolution = refined_for(&todo_spec(), TargetLanguage::Java);
  let dom = &resolution.dom;
  let todo = declaration(dom, "ApiSdk.models.Todo");

  let methods = method_names(dom, todo);
  for expected in ["getId", "setId", "getTitle", "setTitle", "getDueDate", "setDueDate", "getAdditionalData"] {
    assert!(methods.iter().any(|name| name == expected), "missing {expected} in {methods:?}");
  }

  let getter = dom.find_child_of_kind(todo, "getTitle", ElementTag::Method).unwrap();
  let title = dom.find_child_of_kind(todo, "title", ElementTag::Property).unwrap();
  let def = dom.element(getter).as_method().unwrap();
  assert_eq!(def.kind, MethodKind::Getter);
  assert_eq!(def.target, Some(title));

  let setter = dom.find_child_of_kind(todo, "setTitle", ElementTag::Method).unwrap();
  let value = dom.children_of_kind(setter, ElementTag::Parameter).next().unwrap();
  assert_eq!(dom.name(value), "value");
  assert_eq!(dom.element(value).as_parameter().unwrap().kind, ParameterKind::SetterValue);
  assert!(dom.element(setter).as_method().unwrap().return_type.is_void());
}

#[test]
fn backing_store_is_read_only() {
  let config = GenerationConfig::builder()
    .language(TargetLanguage::Go)
    .uses_backing_store(true)
    .build();
  let resolution = refined(&todo_spec(), &config);
  let dom = &resolution.dom;
  let todo = declaration(dom, "ApiSdk.models.Todo");

  assert!(dom.find_child_of_kind(todo, "getBackingStore", ElementTag::Method).is_some());
  assert!(dom.find_child_of_kind(todo, "setBackingStore", ElementTag::Method).is_none());
}

#[test]
fn other_languages_keep_plain_properties() {
  for language in [TargetLanguage::CSharp, TargetLanguage::TypeScript, TargetLanguage::Python] {
    let resolution = refined_for(&todo_spec(), language);
    let dom = &resolution.dom;
    let todo = declaration(dom, "ApiSdk.models.Todo");

    assert_eq!(
      method_names(dom, todo),
      vec!["createFromDiscriminatorValue", "getFieldDeserializers", "serialize"],
      "{language}"
    );
  }
}
