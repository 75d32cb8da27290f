use crate::generator::{
  codedom::{
    ClassDef, ClassKind, CodeDom, CodeType, ElementKind, ElementTag, MethodDef, MethodKind, ParameterDef, ParameterKind,
    Primitive, PropertyDef, PropertyKind,
  },
  errors::GenerationError,
};

fn model(dom: &mut CodeDom, namespace: &str, name: &str) -> crate::generator::codedom::ElementId {
  let ns = dom.find_or_add_namespace(namespace).unwrap();
  dom
    .add_child(ns, name, ElementKind::Class(ClassDef::new(ClassKind::Model)))
    .unwrap()
}

fn property(primitive: Primitive) -> ElementKind {
  ElementKind::Property(PropertyDef::new(PropertyKind::Custom, CodeType::primitive(primitive)))
}

#[test]
fn namespaces_nest_by_dotted_name() {
  let mut dom = CodeDom::new();
  let item = dom.find_or_add_namespace("ApiSdk.todos.item").unwrap();

  assert_eq!(dom.name(item), "ApiSdk.todos.item");
  let todos = dom.element(item).parent().unwrap();
  assert_eq!(dom.name(todos), "ApiSdk.todos");
  assert_eq!(dom.find_or_add_namespace("ApiSdk.todos.item").unwrap(), item);
  assert_eq!(dom.find_namespace("ApiSdk.todos"), Some(todos));
}

#[test]
fn classes_get_a_block_end() {
  let mut dom = CodeDom::new();
  let todo = model(&mut dom, "ApiSdk.models", "Todo");

  let tags = dom
    .children(todo)
    .iter()
    .map(|child| dom.element(*child).tag())
    .collect::<Vec<_>>();
  assert_eq!(tags, vec![ElementTag::BlockEnd]);
  assert_eq!(dom.type_declarations(), vec![todo]);
}

#[test]
fn lookup_is_case_insensitive() {
  let mut dom = CodeDom::new();
  let todo = model(&mut dom, "ApiSdk.models", "Todo");
  let title = dom.add_child(todo, "title", property(Primitive::String)).unwrap();

  assert_eq!(dom.find_child_by_name(todo, "TITLE"), Some(title));
  assert_eq!(dom.find_child_of_kind(todo, "Title", ElementTag::Property), Some(title));
  assert_eq!(dom.find_child_of_kind(todo, "title", ElementTag::Method), None);
}

#[test]
fn incompatible_siblings_collide() {
  let mut dom = CodeDom::new();
  let todo = model(&mut dom, "ApiSdk.models", "Todo");
  dom.add_child(todo, "id", property(Primitive::String)).unwrap();

  let err = dom
    .add_child(
      todo,
      "Id",
      ElementKind::Method(MethodDef::new(MethodKind::Getter, CodeType::string())),
    )
    .unwrap_err();

  assert!(matches!(
    err,
    GenerationError::NameCollision { ref name, ref kind, ref existing, .. }
      if name == "Id" && kind == "Method" && existing == "Property"
  ));
}

#[test]
fn overloaded_methods_are_allowed() {
  let mut dom = CodeDom::new();
  let builder = model(&mut dom, "ApiSdk", "ApiClient");
  let method = || ElementKind::Method(MethodDef::new(MethodKind::Custom, CodeType::void()));

  let first = dom.add_child(builder, "send", method()).unwrap();
  let second = dom.add_child(builder, "send", method()).unwrap();

  assert_ne!(first, second);
  assert_eq!(dom.children_of_kind(builder, ElementTag::Method).count(), 2);
}

#[test]
fn owners_are_validated() {
  let mut dom = CodeDom::new();
  let ns = dom.find_or_add_namespace("ApiSdk").unwrap();

  let err = dom.add_child(ns, "loose", property(Primitive::Int32)).unwrap_err();
  assert!(matches!(err, GenerationError::InvalidOwner { ref kind, .. } if kind == "Property"));

  let color = dom
    .add_child(ns, "Color", ElementKind::Class(ClassDef::new(ClassKind::Enum)))
    .unwrap();
  assert!(dom.add_child(color, "red", property(Primitive::String)).is_err());
}

#[test]
fn parents_are_found_by_kind() {
  let mut dom = CodeDom::new();
  let todo = model(&mut dom, "ApiSdk.models", "Todo");
  let method = dom
    .add_child(
      todo,
      "serialize",
      ElementKind::Method(MethodDef::new(MethodKind::Serializer, CodeType::void())),
    )
    .unwrap();
  let writer = dom
    .add_child(
      method,
      "writer",
      ElementKind::Parameter(ParameterDef::new(ParameterKind::Serializer, CodeType::string())),
    )
    .unwrap();

  assert_eq!(dom.immediate_parent_of_kind(writer, ElementTag::Class), Some(todo));
  assert_eq!(dom.immediate_parent_of_kind(writer, ElementTag::Method), Some(method));
  assert_eq!(dom.name(dom.namespace_of(writer)), "ApiSdk.models");
  assert_eq!(dom.immediate_parent_of_kind(todo, ElementTag::Class), None);
  assert_eq!(dom.qualified_name(writer), "ApiSdk.models.Todo.serialize.writer");
}

#[test]
fn inheritance_helpers_follow_base_classes() {
  let mut dom = CodeDom::new();
  let animal = model(&mut dom, "ApiSdk.models", "Animal");
  let cat = model(&mut dom, "ApiSdk.models", "Cat");
  dom.add_child(animal, "name", property(Primitive::String)).unwrap();
  dom.add_child(cat, "lives", property(Primitive::Int32)).unwrap();
  dom.class_mut(cat).unwrap().base_class = Some(animal);

  let names = dom
    .inherited_properties(cat)
    .into_iter()
    .map(|id| dom.name(id).to_string())
    .collect::<Vec<_>>();
  assert_eq!(names, vec!["lives", "name"]);
}

#[test]
fn documentation_is_flattened() {
  let mut dom = CodeDom::new();
  let todo = model(&mut dom, "ApiSdk.models", "Todo");

  dom.document(todo, Some("  A task\nto do  "));
  assert_eq!(dom.element(todo).documentation.as_deref(), Some("A task to do"));
  dom.document(todo, Some("   "));
  assert_eq!(dom.element(todo).documentation, None);
}
