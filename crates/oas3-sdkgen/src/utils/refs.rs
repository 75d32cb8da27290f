use oas3::spec::{ObjectOrReference, ObjectSchema, Ref};

const SCHEMA_COMPONENT_PREFIX: &str = "#/components/schemas/";

/// Name of the schema component a `$ref` points at.
///
/// Only local component references (`#/components/schemas/User`) are understood; external
/// documents and other component kinds yield `None`.
pub(crate) fn parse_schema_ref_path(ref_path: &str) -> Option<String> {
  if !ref_path.starts_with(SCHEMA_COMPONENT_PREFIX) {
    return None;
  }
  ref_path.parse::<Ref>().ok().map(|component| component.name)
}

pub(crate) fn extract_schema_ref_name(schema: &ObjectOrReference<ObjectSchema>) -> Option<String> {
  match schema {
    ObjectOrReference::Ref { ref_path, .. } => parse_schema_ref_path(ref_path),
    ObjectOrReference::Object(_) => None,
  }
}
