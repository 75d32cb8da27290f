use crate::generator::{
  codedom::{
    Abstraction, ClassDef, ClassKind, CodeDom, CodeType, ElementId, ElementKind, IndexerDef, MethodDef, MethodKind,
    ParameterDef, ParameterKind, PropertyDef, PropertyKind, UsingDef,
  },
  order::{ElementComparer, MethodPlacement, ParameterComparer},
};

struct Fixture {
  dom: CodeDom,
  class: ElementId,
  nested: ElementId,
  using: ElementId,
  property: ElementId,
  indexer: ElementId,
  method: ElementId,
}

fn fixture() -> Fixture {
  let mut dom = CodeDom::new();
  let ns = dom.find_or_add_namespace("ApiSdk").unwrap();
  let class = dom
    .add_child(ns, "Class", ElementKind::Class(ClassDef::new(ClassKind::RequestBuilder)))
    .unwrap();
  let using = dom
    .add_child(class, "", ElementKind::Using(UsingDef::External(Abstraction::RequestAdapter)))
    .unwrap();
  let property = dom
    .add_child(
      class,
      "prop",
      ElementKind::Property(PropertyDef::new(PropertyKind::Custom, CodeType::string())),
    )
    .unwrap();
  let indexer = dom
    .add_child(
      class,
      "",
      ElementKind::Indexer(IndexerDef {
        return_type: CodeType::string(),
        path_segment: "items".to_string(),
      }),
    )
    .unwrap();
  let method = dom
    .add_child(
      class,
      "Method",
      ElementKind::Method(MethodDef::new(MethodKind::Custom, CodeType::string())),
    )
    .unwrap();
  dom
    .add_child(
      method,
      "param",
      ElementKind::Parameter(ParameterDef::new(ParameterKind::Custom, CodeType::string())),
    )
    .unwrap();
  let nested = dom
    .add_child(class, "Class", ElementKind::Class(ClassDef::new(ClassKind::QueryParameters)))
    .unwrap();
  Fixture {
    dom,
    class,
    nested,
    using,
    property,
    indexer,
    method,
  }
}

#[test]
fn missing_elements_sort_first() {
  let f = fixture();
  let comparer = ElementComparer::default();

  assert_eq!(comparer.compare(&f.dom, None, None), 0);
  assert_eq!(comparer.compare(&f.dom, None, Some(f.class)), -1);
  assert_eq!(comparer.compare(&f.dom, Some(f.class), None), 1);
}

#[test]
fn weights_combine_kind_name_and_parameters() {
  let f = fixture();
  let comparer = ElementComparer::new(MethodPlacement::BeforeTypes);

  assert_eq!(comparer.compare(&f.dom, Some(f.using), Some(f.property)), -10_100);
  assert_eq!(comparer.compare(&f.dom, Some(f.indexer), Some(f.property)), 9_900);
  assert_eq!(comparer.compare(&f.dom, Some(f.method), Some(f.property)), 9_901);
  assert_eq!(comparer.compare(&f.dom, Some(f.method), Some(f.nested)), -9_899);
}

#[test]
fn methods_after_types_moves_methods_past_nested_classes() {
  let f = fixture();
  let comparer = ElementComparer::new(MethodPlacement::AfterTypes);

  assert_eq!(comparer.compare(&f.dom, Some(f.method), Some(f.property)), 9_901);
  assert_eq!(comparer.compare(&f.dom, Some(f.method), Some(f.nested)), 10_101);
}

#[test]
fn constructors_come_first_among_methods() {
  let mut dom = CodeDom::new();
  let ns = dom.find_or_add_namespace("ApiSdk").unwrap();
  let class = dom
    .add_child(ns, "ApiClient", ElementKind::Class(ClassDef::new(ClassKind::RequestBuilder)))
    .unwrap();
  let method = |kind| ElementKind::Method(MethodDef::new(kind, CodeType::void()));
  let raw = dom.add_child(class, "constructor", method(MethodKind::RawUrlConstructor)).unwrap();
  let client = dom.add_child(class, "constructor", method(MethodKind::ClientConstructor)).unwrap();
  let get = dom.add_child(class, "get", method(MethodKind::RequestExecutor)).unwrap();
  let comparer = ElementComparer::default();

  assert_eq!(comparer.compare(&dom, Some(client), Some(raw)), -1_000);
  assert!(comparer.compare(&dom, Some(raw), Some(get)) < 0);
}

#[test]
fn parameters_order_required_then_kind_then_name() {
  let mut dom = CodeDom::new();
  let ns = dom.find_or_add_namespace("ApiSdk").unwrap();
  let class = dom
    .add_child(ns, "ApiClient", ElementKind::Class(ClassDef::new(ClassKind::RequestBuilder)))
    .unwrap();
  let method = dom
    .add_child(
      class,
      "get",
      ElementKind::Method(MethodDef::new(MethodKind::RequestExecutor, CodeType::void())),
    )
    .unwrap();
  let parameter = |kind, optional| {
    let mut def = ParameterDef::new(kind, CodeType::string());
    def.optional = optional;
    ElementKind::Parameter(def)
  };
  let adapter = dom
    .add_child(method, "param1", parameter(ParameterKind::RequestAdapter, false))
    .unwrap();
  let config = dom
    .add_child(method, "param2", parameter(ParameterKind::RequestConfiguration, false))
    .unwrap();
  let optional = dom
    .add_child(method, "body", parameter(ParameterKind::Custom, true))
    .unwrap();

  assert_eq!(ParameterComparer.compare(&dom, Some(adapter), Some(config)), -110);
  assert_eq!(ParameterComparer.compare(&dom, Some(config), Some(adapter)), 110);
  assert_eq!(ParameterComparer.compare(&dom, Some(config), Some(config)), 0);
  assert_eq!(ParameterComparer.compare(&dom, Some(optional), Some(adapter)), 1_000 - 100 - 10);
}
