use crate::generator::codedom::{
  Abstraction, ClassDef, ClassKind, CodeDom, CodeType, CollectionKind, DiscriminatorInfo, ElementKind, Primitive,
};

#[test]
fn types_referencing_the_same_definition_are_equal() {
  let mut dom = CodeDom::new();
  let ns = dom.find_or_add_namespace("ApiSdk.models").unwrap();
  let todo = dom
    .add_child(ns, "Todo", ElementKind::Class(ClassDef::new(ClassKind::Model)))
    .unwrap();

  assert_eq!(CodeType::definition(todo), CodeType::definition(todo));
  assert_ne!(
    CodeType::definition(todo),
    CodeType::definition(todo).collection_of(CollectionKind::Complex)
  );
  assert_eq!(CodeType::definition(todo).definition_id(), Some(todo));
}

#[test]
fn constructors_set_sensible_nullability() {
  assert!(CodeType::primitive(Primitive::Int64).nullable);
  assert!(!CodeType::abstraction(Abstraction::RequestAdapter).nullable);
  assert!(CodeType::void().is_void());
  assert!(!CodeType::string().non_null().nullable);
  assert!(CodeType::string().collection_of(CollectionKind::Array).is_collection());
}

#[test]
fn discriminator_values_are_case_insensitive_and_sorted() {
  let mut dom = CodeDom::new();
  let ns = dom.find_or_add_namespace("ApiSdk.models").unwrap();
  let cat = dom
    .add_child(ns, "Cat", ElementKind::Class(ClassDef::new(ClassKind::Model)))
    .unwrap();
  let dog = dom
    .add_child(ns, "Dog", ElementKind::Class(ClassDef::new(ClassKind::Model)))
    .unwrap();

  let mut info = DiscriminatorInfo::new("petType");
  info.add_mapping("dog", CodeType::definition(dog));
  info.add_mapping("Cat", CodeType::definition(cat));
  info.add_mapping("CAT", CodeType::definition(dog));

  assert_eq!(info.len(), 2);
  assert_eq!(info.select("cat"), Some(&CodeType::definition(cat)));
  assert_eq!(info.select("bird"), None);
  let values = info.mappings().map(|(value, _)| value).collect::<Vec<_>>();
  assert_eq!(values, vec!["Cat", "dog"]);
}
