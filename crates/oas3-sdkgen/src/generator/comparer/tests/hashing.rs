use oas3::spec::ObjectSchema;
use serde_json::json;

use crate::generator::comparer::{CanonicalSchema, SchemaKey};

fn schema(value: serde_json::Value) -> ObjectSchema {
  serde_json::from_value(value).expect("schema should deserialize")
}

#[test]
fn property_declaration_order_does_not_change_the_key() {
  let a = schema(json!({
    "type": "object",
    "required": ["id", "title"],
    "properties": { "id": { "type": "string" }, "title": { "type": "string" } }
  }));
  let b = schema(json!({
    "type": "object",
    "required": ["title", "id"],
    "properties": { "title": { "type": "string" }, "id": { "type": "string" } }
  }));

  assert_eq!(SchemaKey::of(&a).unwrap(), SchemaKey::of(&b).unwrap());
}

#[test]
fn documentation_keywords_are_ignored() {
  let plain = schema(json!({ "type": "object", "properties": { "name": { "type": "string" } } }));
  let documented = schema(json!({
    "type": "object",
    "title": "Named",
    "description": "Something with a name",
    "properties": { "name": { "type": "string", "description": "the name", "example": "rex" } }
  }));

  assert_eq!(SchemaKey::of(&plain).unwrap(), SchemaKey::of(&documented).unwrap());
}

#[test]
fn properties_named_like_keywords_still_count() {
  let with_title = schema(json!({ "type": "object", "properties": { "title": { "type": "string" } } }));
  let with_name = schema(json!({ "type": "object", "properties": { "name": { "type": "string" } } }));

  let canonical = CanonicalSchema::from_schema(&with_title).unwrap();
  assert!(canonical.as_str().contains("\"title\""));
  assert_ne!(SchemaKey::of(&with_title).unwrap(), SchemaKey::of(&with_name).unwrap());
}

#[test]
fn different_property_types_produce_different_keys() {
  let string = schema(json!({ "type": "object", "properties": { "id": { "type": "string" } } }));
  let integer = schema(json!({ "type": "object", "properties": { "id": { "type": "integer" } } }));

  assert_ne!(SchemaKey::of(&string).unwrap(), SchemaKey::of(&integer).unwrap());
}

#[test]
fn references_are_compared_by_target() {
  let pet = schema(json!({ "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }));
  let pet_again = schema(json!({ "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }));
  let owner = schema(json!({ "type": "array", "items": { "$ref": "#/components/schemas/Owner" } }));

  assert_eq!(SchemaKey::of(&pet).unwrap(), SchemaKey::of(&pet_again).unwrap());
  assert_ne!(SchemaKey::of(&pet).unwrap(), SchemaKey::of(&owner).unwrap());
}

#[test]
fn format_and_discriminator_name_are_case_insensitive() {
  let lower = schema(json!({
    "type": "string",
    "format": "date-time",
  }));
  let upper = schema(json!({
    "type": "string",
    "format": "Date-Time",
  }));
  assert_eq!(SchemaKey::of(&lower).unwrap(), SchemaKey::of(&upper).unwrap());

  let a = schema(json!({ "type": "object", "discriminator": { "propertyName": "petType" } }));
  let b = schema(json!({ "type": "object", "discriminator": { "propertyName": "PETTYPE" } }));
  assert_eq!(SchemaKey::of(&a).unwrap(), SchemaKey::of(&b).unwrap());
}

#[test]
fn canonical_form_is_stable() {
  let value = schema(json!({ "type": "object", "properties": { "b": { "type": "string" }, "a": { "type": "integer" } } }));
  let first = CanonicalSchema::from_schema(&value).unwrap();
  let second = CanonicalSchema::from_schema(&value).unwrap();

  assert_eq!(first, second);
  assert_eq!(first.key(), second.key());
}
