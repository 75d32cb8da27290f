use crate::generator::{
  codedom::{
    Abstraction, ClassDef, ClassKind, CodeDom, CodeType, ConstantDef, ElementId, ElementKind, MethodDef, MethodKind,
    PropertyDef, PropertyKind, UsingDef,
  },
  config::TargetLanguage,
  order,
};

fn names(dom: &CodeDom, id: ElementId) -> Vec<String> {
  dom
    .children(id)
    .iter()
    .map(|child| format!("{}:{}", dom.element(*child).tag(), dom.name(*child)))
    .collect()
}

fn builder(dom: &mut CodeDom) -> ElementId {
  let ns = dom.find_or_add_namespace("ApiSdk.todos").unwrap();
  let class = dom
    .add_child(ns, "TodosRequestBuilder", ElementKind::Class(ClassDef::new(ClassKind::RequestBuilder)))
    .unwrap();
  let method = |kind| ElementKind::Method(MethodDef::new(kind, CodeType::void()));
  dom.add_child(class, "get", method(MethodKind::RequestExecutor)).unwrap();
  dom
    .add_child(class, "TodosRequestBuilderGetQueryParameters", ElementKind::Class(ClassDef::new(ClassKind::QueryParameters)))
    .unwrap();
  dom.add_child(class, "constructor", method(MethodKind::Constructor)).unwrap();
  dom
    .add_child(
      class,
      "urlTemplate",
      ElementKind::Property(PropertyDef::new(PropertyKind::UrlTemplate, CodeType::string())),
    )
    .unwrap();
  dom
    .add_child(class, "", ElementKind::Using(UsingDef::External(Abstraction::RequestAdapter)))
    .unwrap();
  class
}

#[test]
fn block_end_closes_every_class() {
  let mut dom = CodeDom::new();
  let class = builder(&mut dom);

  order::apply(&mut dom, TargetLanguage::CSharp);

  assert_eq!(
    names(&dom, class),
    vec![
      "Using:",
      "Property:urlTemplate",
      "Method:constructor",
      "Method:get",
      "Class:TodosRequestBuilderGetQueryParameters",
      "BlockEnd:",
    ]
  );
}

#[test]
fn go_emits_methods_after_nested_types() {
  let mut dom = CodeDom::new();
  let class = builder(&mut dom);

  order::apply(&mut dom, TargetLanguage::Go);

  assert_eq!(
    names(&dom, class),
    vec![
      "Using:",
      "Property:urlTemplate",
      "Class:TodosRequestBuilderGetQueryParameters",
      "Method:constructor",
      "Method:get",
      "BlockEnd:",
    ]
  );
}

#[test]
fn ordering_is_idempotent() {
  let mut dom = CodeDom::new();
  let class = builder(&mut dom);

  order::apply(&mut dom, TargetLanguage::Java);
  let first = names(&dom, class);
  order::apply(&mut dom, TargetLanguage::Java);

  assert_eq!(names(&dom, class), first);
}

#[test]
fn enum_members_keep_declaration_order() {
  let mut dom = CodeDom::new();
  let ns = dom.find_or_add_namespace("ApiSdk.models").unwrap();
  let color = dom
    .add_child(ns, "Color", ElementKind::Class(ClassDef::new(ClassKind::Enum)))
    .unwrap();
  for value in ["red", "green", "blue"] {
    dom
      .add_child(
        color,
        value,
        ElementKind::Constant(ConstantDef {
          value: value.to_string(),
        }),
      )
      .unwrap();
  }

  order::apply(&mut dom, TargetLanguage::TypeScript);

  assert_eq!(
    names(&dom, color),
    vec!["Constant:red", "Constant:green", "Constant:blue", "BlockEnd:"]
  );
}
