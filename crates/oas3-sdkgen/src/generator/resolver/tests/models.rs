use serde_json::json;

use super::{child, classes_named, find, names_of, resolve, resolve_error, resolve_with};
use crate::generator::{
  codedom::{ClassKind, CollectionKind, ComposedKind, ElementTag, Primitive},
  config::GenerationConfig,
  errors::GenerationError,
  tests::support::spec_with,
};

fn ok_with(schema: serde_json::Value) -> serde_json::Value {
  json!({
    "description": "ok",
    "content": { "application/json": { "schema": schema } }
  })
}

fn get_returning(schema: serde_json::Value) -> serde_json::Value {
  json!({ "get": { "responses": { "200": ok_with(schema) } } })
}

#[test]
fn todo_model_keeps_wire_names() {
  let spec = spec_with(
    json!({ "/todos/{id}": get_returning(json!({ "$ref": "#/components/schemas/Todo" })) }),
    json!({
      "Todo": {
        "type": "object",
        "properties": {
          "id": { "type": "string" },
          "title": { "type": "string" },
          "due-date": { "type": "string", "format": "date-time" }
        }
      }
    }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let todo = find(dom, "ApiSdk.models.Todo");

  assert_eq!(dom.element(todo).class_kind(), Some(ClassKind::Model));
  let title = dom.element(child(dom, todo, "title", ElementTag::Property)).as_property().unwrap();
  assert_eq!(title.wire_name.as_deref(), Some("title"));
  assert_eq!(title.ty.as_primitive(), Some(Primitive::String));

  let due = dom.element(child(dom, todo, "dueDate", ElementTag::Property)).as_property().unwrap();
  assert_eq!(due.wire_name.as_deref(), Some("due-date"));
  assert_eq!(due.ty.as_primitive(), Some(Primitive::DateTime));

  assert!(dom.find_child_of_kind(todo, "additionalData", ElementTag::Property).is_some());
  assert_eq!(
    names_of(dom, todo, ElementTag::Method),
    vec!["createFromDiscriminatorValue", "getFieldDeserializers", "serialize"]
  );
  assert_eq!(resolution.stats.models_generated, 1);
}

#[test]
fn identical_inline_shapes_share_one_class() {
  let shape = json!({ "type": "object", "properties": { "name": { "type": "string" } } });
  let spec = spec_with(
    json!({ "/first": get_returning(shape.clone()), "/second": get_returning(shape) }),
    json!({}),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let first = find(dom, "ApiSdk.first.FirstRequestBuilder");
  let second = find(dom, "ApiSdk.second.SecondRequestBuilder");
  let first_type = dom.element(child(dom, first, "get", ElementTag::Method)).as_method().unwrap().return_type;
  let second_type = dom.element(child(dom, second, "get", ElementTag::Method)).as_method().unwrap().return_type;

  assert_eq!(first_type.definition_id(), second_type.definition_id());
  assert_eq!(dom.name(first_type.definition_id().unwrap()), "FirstGetResponse");
  assert_eq!(resolution.stats.models_generated, 1);
}

#[test]
fn component_names_win_over_inline_names() {
  let spec = spec_with(
    json!({
      "/first": get_returning(json!({ "type": "object", "properties": { "name": { "type": "string" } } })),
      "/second": get_returning(json!({ "$ref": "#/components/schemas/Pet" }))
    }),
    json!({ "Pet": { "type": "object", "description": "A pet", "properties": { "name": { "type": "string" } } } }),
  );

  let resolution = resolve(&spec);

  assert_eq!(classes_named(&resolution.dom, "Pet"), 1);
  assert_eq!(classes_named(&resolution.dom, "FirstGetResponse"), 0);
}

#[test]
fn self_references_point_at_the_class_under_construction() {
  let spec = spec_with(
    json!({ "/nodes": get_returning(json!({ "$ref": "#/components/schemas/Node" })) }),
    json!({
      "Node": {
        "type": "object",
        "properties": {
          "parent": { "$ref": "#/components/schemas/Node" },
          "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
        }
      }
    }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let node = find(dom, "ApiSdk.models.Node");
  let parent = dom.element(child(dom, node, "parent", ElementTag::Property)).as_property().unwrap();
  let children = dom.element(child(dom, node, "children", ElementTag::Property)).as_property().unwrap();

  assert_eq!(parent.ty.definition_id(), Some(node));
  assert_eq!(children.ty.definition_id(), Some(node));
  assert_eq!(children.ty.collection, CollectionKind::Complex);
  assert_eq!(classes_named(dom, "Node"), 1);
  assert_eq!(resolution.stats.cycle_details, vec![vec!["Node".to_string()]]);
}

#[test]
fn mutual_references_terminate() {
  let spec = spec_with(
    json!({ "/authors": get_returning(json!({ "$ref": "#/components/schemas/Author" })) }),
    json!({
      "Author": { "type": "object", "properties": { "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } } } },
      "Book": { "type": "object", "properties": { "author": { "$ref": "#/components/schemas/Author" } } }
    }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let author = find(dom, "ApiSdk.models.Author");
  let book = find(dom, "ApiSdk.models.Book");
  let back = dom.element(child(dom, book, "author", ElementTag::Property)).as_property().unwrap();

  assert_eq!(back.ty.definition_id(), Some(author));
  assert_eq!(resolution.stats.cycles_detected, 1);
  assert_eq!(
    resolution.stats.cycle_details,
    vec![vec!["Author".to_string(), "Book".to_string()]]
  );
}

fn animals(mapping: serde_json::Value, extra: serde_json::Value) -> oas3::Spec {
  let mut schemas = json!({
    "Animal": {
      "type": "object",
      "required": ["petType"],
      "properties": { "petType": { "type": "string" } },
      "discriminator": { "propertyName": "petType", "mapping": mapping }
    },
    "Cat": {
      "allOf": [
        { "$ref": "#/components/schemas/Animal" },
        { "type": "object", "properties": { "meows": { "type": "boolean" } } }
      ]
    },
    "Dog": {
      "allOf": [
        { "$ref": "#/components/schemas/Animal" },
        { "type": "object", "properties": { "barks": { "type": "boolean" } } }
      ]
    }
  });
  if let (Some(schemas), Some(extra)) = (schemas.as_object_mut(), extra.as_object()) {
    schemas.extend(extra.clone());
  }
  spec_with(
    json!({ "/animals": get_returning(json!({ "$ref": "#/components/schemas/Animal" })) }),
    schemas,
  )
}

#[test]
fn discriminator_selects_mapped_subtypes() {
  let spec = animals(
    json!({ "cat": "#/components/schemas/Cat", "dog": "#/components/schemas/Dog" }),
    json!({}),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let animal = find(dom, "ApiSdk.models.Animal");
  let cat = find(dom, "ApiSdk.models.Cat");
  let dog = find(dom, "ApiSdk.models.Dog");
  let info = dom.element(animal).as_class().unwrap().discriminator.clone().unwrap();

  assert_eq!(info.property_name, "petType");
  assert_eq!(info.select("cat").and_then(|ty| ty.definition_id()), Some(cat));
  assert_eq!(info.select("DOG").and_then(|ty| ty.definition_id()), Some(dog));
  assert!(info.select("fish").is_none());
  assert_eq!(info.len(), 2);
  assert_eq!(dom.class_base(cat), Some(animal));
  assert!(dom.find_child_of_kind(cat, "meows", ElementTag::Property).is_some());
  assert!(dom.find_child_of_kind(cat, "petType", ElementTag::Property).is_none());
  assert!(dom.find_child_of_kind(cat, "additionalData", ElementTag::Property).is_none());
}

#[test]
fn unmapped_derived_types_are_added_under_their_name() {
  let spec = animals(json!({ "cat": "#/components/schemas/Cat" }), json!({}));

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let animal = find(dom, "ApiSdk.models.Animal");
  let dog = find(dom, "ApiSdk.models.Dog");
  let info = dom.element(animal).as_class().unwrap().discriminator.clone().unwrap();

  assert_eq!(info.select("Dog").and_then(|ty| ty.definition_id()), Some(dog));
  assert_eq!(
    info.mappings().map(|(value, _)| value.to_string()).collect::<Vec<_>>(),
    vec!["cat", "Dog"]
  );
}

#[test]
fn unknown_discriminator_target_is_rejected() {
  let spec = animals(json!({ "fish": "#/components/schemas/Fish" }), json!({}));

  let error = resolve_error(&spec);

  assert!(matches!(
    error,
    GenerationError::UnresolvableDiscriminator { ref schema, ref value, .. } if schema == "Animal" && value == "fish"
  ));
}

#[test]
fn mapped_subtype_must_derive_from_the_base() {
  let spec = animals(
    json!({ "rock": "#/components/schemas/Rock" }),
    json!({ "Rock": { "type": "object", "properties": { "weight": { "type": "number" } } } }),
  );

  let error = resolve_error(&spec);

  assert!(matches!(
    error,
    GenerationError::UnreachableBaseType { ref schema, ref base } if schema == "Rock" && base == "Animal"
  ));
}

#[test]
fn conflicting_shapes_are_invalid() {
  let spec = spec_with(
    json!({ "/broken": get_returning(json!({ "$ref": "#/components/schemas/Broken" })) }),
    json!({ "Broken": { "type": "string", "properties": { "name": { "type": "string" } } } }),
  );

  let error = resolve_error(&spec);

  assert!(matches!(error, GenerationError::InvalidSchema { ref schema, .. } if schema == "Broken"));
}

#[test]
fn invalid_property_schemas_name_the_property() {
  let spec = spec_with(
    json!({ "/holders": get_returning(json!({ "$ref": "#/components/schemas/Holder" })) }),
    json!({
      "Holder": {
        "type": "object",
        "properties": { "list": { "type": "array", "properties": { "x": { "type": "string" } } } }
      }
    }),
  );

  let error = resolve_error(&spec);

  assert!(matches!(error, GenerationError::InvalidSchema { ref schema, .. } if schema == "Holder.list"));
}

#[test]
fn enum_members_keep_declaration_order() {
  let spec = spec_with(
    json!({ "/tasks": get_returning(json!({ "$ref": "#/components/schemas/Status" })) }),
    json!({ "Status": { "type": "string", "enum": ["open", "closed", "in-progress"] } }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let status = find(dom, "ApiSdk.models.Status");
  let values = dom
    .children_of_kind(status, ElementTag::Constant)
    .map(|id| (dom.name(id).to_string(), dom.element(id).as_constant().unwrap().value.clone()))
    .collect::<Vec<_>>();

  assert_eq!(dom.element(status).class_kind(), Some(ClassKind::Enum));
  assert_eq!(
    values,
    vec![
      ("Open".to_string(), "open".to_string()),
      ("Closed".to_string(), "closed".to_string()),
      ("InProgress".to_string(), "in-progress".to_string()),
    ]
  );
  assert_eq!(resolution.stats.enums_generated, 1);
}

#[test]
fn one_of_without_shared_base_becomes_a_union() {
  let spec = spec_with(
    json!({ "/pets": get_returning(json!({ "$ref": "#/components/schemas/Pet" })) }),
    json!({
      "Pet": { "oneOf": [ { "$ref": "#/components/schemas/Cat" }, { "$ref": "#/components/schemas/Dog" }, { "type": "null" } ] },
      "Cat": { "type": "object", "properties": { "meows": { "type": "boolean" } } },
      "Dog": { "type": "object", "properties": { "barks": { "type": "boolean" } } }
    }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let pet = find(dom, "ApiSdk.models.Pet");

  assert_eq!(
    dom.element(pet).class_kind(),
    Some(ClassKind::ComposedType(ComposedKind::Union))
  );
  assert_eq!(names_of(dom, pet, ElementTag::Property), vec!["cat", "dog"]);
  assert_eq!(resolution.stats.composed_types_generated, 1);
}

#[test]
fn one_of_sharing_a_discriminated_base_uses_the_base() {
  let mut spec = animals(
    json!({ "cat": "#/components/schemas/Cat", "dog": "#/components/schemas/Dog" }),
    json!({ "Pet": { "oneOf": [ { "$ref": "#/components/schemas/Cat" }, { "$ref": "#/components/schemas/Dog" } ] } }),
  );
  let replacement = spec_with(
    json!({ "/pets": get_returning(json!({ "$ref": "#/components/schemas/Pet" })) }),
    json!({}),
  );
  spec.paths = replacement.paths;

  let resolution = resolve(&spec);
  let dom = &resolution.dom;

  assert_eq!(classes_named(dom, "Pet"), 0);
  let builder = find(dom, "ApiSdk.pets.PetsRequestBuilder");
  let get = dom.element(child(dom, builder, "get", ElementTag::Method)).as_method().unwrap();
  assert_eq!(get.return_type.definition_id(), Some(find(dom, "ApiSdk.models.Animal")));
}

#[test]
fn backing_store_follows_the_flag() {
  let spec = spec_with(
    json!({ "/todos": get_returning(json!({ "$ref": "#/components/schemas/Todo" })) }),
    json!({ "Todo": { "type": "object", "properties": { "id": { "type": "string" } } } }),
  );

  let without = resolve(&spec);
  let todo = find(&without.dom, "ApiSdk.models.Todo");
  assert!(without.dom.find_child_of_kind(todo, "backingStore", ElementTag::Property).is_none());

  let config = GenerationConfig::builder().uses_backing_store(true).build();
  let with = resolve_with(&spec, &config);
  let todo = find(&with.dom, "ApiSdk.models.Todo");
  let store = with.dom.find_child_of_kind(todo, "backingStore", ElementTag::Property);
  assert!(store.is_some_and(|id| with.dom.element(id).as_property().is_some_and(|def| def.read_only)));
}

#[test]
fn additional_data_can_be_disabled() {
  let spec = spec_with(
    json!({ "/todos": get_returning(json!({ "$ref": "#/components/schemas/Todo" })) }),
    json!({ "Todo": { "type": "object", "properties": { "id": { "type": "string" } } } }),
  );
  let config = GenerationConfig::builder().include_additional_data(false).build();

  let resolution = resolve_with(&spec, &config);
  let todo = find(&resolution.dom, "ApiSdk.models.Todo");

  assert!(resolution.dom.find_child_of_kind(todo, "additionalData", ElementTag::Property).is_none());
}

#[test]
fn dotted_component_names_nest_namespaces() {
  let spec = spec_with(
    json!({ "/users": get_returning(json!({ "$ref": "#/components/schemas/microsoft.graph.user" })) }),
    json!({ "microsoft.graph.user": { "type": "object", "properties": { "id": { "type": "string" } } } }),
  );

  let resolution = resolve(&spec);

  find(&resolution.dom, "ApiSdk.models.microsoft.graph.User");
}

#[test]
fn union_members_referring_back_to_the_union_reuse_it() {
  let spec = spec_with(
    json!({ "/shapes": get_returning(json!({ "$ref": "#/components/schemas/Alpha" })) }),
    json!({
      "Alpha": { "oneOf": [ { "$ref": "#/components/schemas/Circle" }, { "$ref": "#/components/schemas/Group" } ] },
      "Circle": { "type": "object", "properties": { "radius": { "type": "number" } } },
      "Group": {
        "type": "object",
        "properties": { "children": { "type": "array", "items": { "$ref": "#/components/schemas/Alpha" } } }
      }
    }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let alpha = find(dom, "ApiSdk.models.Alpha");
  let group = find(dom, "ApiSdk.models.Group");
  let children = dom.element(child(dom, group, "children", ElementTag::Property)).as_property().unwrap();

  assert_eq!(
    dom.element(alpha).class_kind(),
    Some(ClassKind::ComposedType(ComposedKind::Union))
  );
  assert_eq!(children.ty.definition_id(), Some(alpha));
  assert_eq!(children.ty.collection, CollectionKind::Complex);
  assert_eq!(classes_named(dom, "Alpha"), 1);
  assert_eq!(names_of(dom, alpha, ElementTag::Property), vec!["circle", "group"]);
}

#[test]
fn union_cycles_through_a_shared_base_point_at_the_base() {
  let spec = spec_with(
    json!({ "/shapes": get_returning(json!({ "$ref": "#/components/schemas/Alpha" })) }),
    json!({
      "Alpha": { "oneOf": [ { "$ref": "#/components/schemas/Circle" }, { "$ref": "#/components/schemas/Group" } ] },
      "Figure": {
        "type": "object",
        "required": ["kind"],
        "properties": { "kind": { "type": "string" } },
        "discriminator": { "propertyName": "kind" }
      },
      "Circle": {
        "allOf": [
          { "$ref": "#/components/schemas/Figure" },
          { "type": "object", "properties": { "radius": { "type": "number" } } }
        ]
      },
      "Group": {
        "allOf": [
          { "$ref": "#/components/schemas/Figure" },
          {
            "type": "object",
            "properties": { "children": { "type": "array", "items": { "$ref": "#/components/schemas/Alpha" } } }
          }
        ]
      }
    }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let figure = find(dom, "ApiSdk.models.Figure");
  let group = find(dom, "ApiSdk.models.Group");
  let children = dom.element(child(dom, group, "children", ElementTag::Property)).as_property().unwrap();

  assert_eq!(classes_named(dom, "Alpha"), 0);
  assert_eq!(children.ty.definition_id(), Some(figure));
  let builder = find(dom, "ApiSdk.shapes.ShapesRequestBuilder");
  let get = dom.element(child(dom, builder, "get", ElementTag::Method)).as_method().unwrap();
  assert_eq!(get.return_type.definition_id(), Some(figure));
}

#[test]
fn collections_of_themselves_become_untyped_collections() {
  let spec = spec_with(
    json!({ "/nested": get_returning(json!({ "$ref": "#/components/schemas/Nested" })) }),
    json!({ "Nested": { "type": "array", "items": { "$ref": "#/components/schemas/Nested" } } }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let builder = find(dom, "ApiSdk.nested.NestedRequestBuilder");
  let get = dom.element(child(dom, builder, "get", ElementTag::Method)).as_method().unwrap();

  assert_eq!(get.return_type.as_primitive(), Some(Primitive::UntypedNode));
  assert_eq!(get.return_type.collection, CollectionKind::Complex);
}

#[test]
fn collections_met_again_through_their_items_keep_the_item_type() {
  let spec = spec_with(
    json!({ "/forests": get_returning(json!({ "$ref": "#/components/schemas/Forest" })) }),
    json!({
      "Forest": { "type": "array", "items": { "$ref": "#/components/schemas/Tree" } },
      "Tree": { "type": "object", "properties": { "children": { "$ref": "#/components/schemas/Forest" } } }
    }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let tree = find(dom, "ApiSdk.models.Tree");
  let children = dom.element(child(dom, tree, "children", ElementTag::Property)).as_property().unwrap();

  assert_eq!(children.ty.definition_id(), Some(tree));
  assert_eq!(children.ty.collection, CollectionKind::Complex);
}

#[test]
fn properties_named_like_model_methods_are_renamed() {
  let spec = spec_with(
    json!({ "/jobs": get_returning(json!({ "$ref": "#/components/schemas/Job" })) }),
    json!({
      "Job": {
        "type": "object",
        "properties": {
          "serialize": { "type": "boolean" },
          "getFieldDeserializers": { "type": "string" }
        }
      }
    }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let job = find(dom, "ApiSdk.models.Job");

  let serialize = dom.element(child(dom, job, "serialize1", ElementTag::Property)).as_property().unwrap();
  assert_eq!(serialize.wire_name.as_deref(), Some("serialize"));
  let deserializers = dom
    .element(child(dom, job, "getFieldDeserializers1", ElementTag::Property))
    .as_property()
    .unwrap();
  assert_eq!(deserializers.wire_name.as_deref(), Some("getFieldDeserializers"));
  assert_eq!(
    names_of(dom, job, ElementTag::Method),
    vec!["createFromDiscriminatorValue", "getFieldDeserializers", "serialize"]
  );
}

#[test]
fn nullable_type_lists_stay_nullable_primitives() {
  let spec = spec_with(
    json!({ "/notes": get_returning(json!({ "$ref": "#/components/schemas/Note" })) }),
    json!({ "Note": { "type": "object", "properties": { "text": { "type": ["string", "null"] } } } }),
  );

  let resolution = resolve(&spec);
  let dom = &resolution.dom;
  let note = find(dom, "ApiSdk.models.Note");
  let text = dom.element(child(dom, note, "text", ElementTag::Property)).as_property().unwrap();

  assert_eq!(text.ty.as_primitive(), Some(Primitive::String));
  assert!(text.ty.nullable);
}
