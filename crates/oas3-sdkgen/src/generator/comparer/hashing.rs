use std::{cmp::Ordering, fmt, hash::Hash};

use json_canon::to_string as to_canonical_json;
use oas3::spec::ObjectSchema;
use serde_json::Value;

use crate::generator::errors::{GenerationError, GenerationResult};

/// Keywords that document a schema without changing its shape.
const IGNORED_KEYWORDS: [&str; 10] = [
  "description",
  "title",
  "example",
  "examples",
  "externalDocs",
  "deprecated",
  "readOnly",
  "writeOnly",
  "xml",
  "$comment",
];

/// Keywords whose value is a map of name to schema.
const SCHEMA_MAP_KEYWORDS: [&str; 3] = ["properties", "patternProperties", "$defs"];
/// Keywords whose value is a single schema.
const SCHEMA_KEYWORDS: [&str; 4] = ["items", "additionalProperties", "not", "contains"];
/// Keywords whose value is a list of schemas.
const SCHEMA_LIST_KEYWORDS: [&str; 4] = ["allOf", "oneOf", "anyOf", "prefixItems"];

/// Opaque representation of a schema's canonical form.
///
/// Two schemas that differ only in documentation, property declaration order, or the order of
/// `required`/`type`/`enum` entries produce equal values. Nested `$ref`s are kept as references,
/// so self-referencing schemas canonicalize without expanding.
#[derive(Debug, Clone, Eq)]
pub(crate) struct CanonicalSchema(String);

impl CanonicalSchema {
  pub(crate) fn from_schema(schema: &ObjectSchema) -> GenerationResult<Self> {
    let mut value = serde_json::to_value(schema)
      .map_err(|e| GenerationError::invalid_schema(schema_label(schema), format!("cannot be serialized: {e}")))?;

    normalize_schema(&mut value);

    let canonical_json = to_canonical_json(&value)
      .map_err(|e| GenerationError::invalid_schema(schema_label(schema), format!("cannot be canonicalized: {e}")))?;

    Ok(CanonicalSchema(canonical_json))
  }

  /// BLAKE3 digest of the canonical form, used as the deduplication cache key.
  pub(crate) fn key(&self) -> SchemaKey {
    SchemaKey(blake3::hash(self.0.as_bytes()).to_hex().to_string())
  }

  pub(crate) fn as_str(&self) -> &str {
    &self.0
  }
}

impl PartialEq for CanonicalSchema {
  fn eq(&self, other: &Self) -> bool {
    self.0 == other.0
  }
}

impl PartialOrd for CanonicalSchema {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for CanonicalSchema {
  fn cmp(&self, other: &Self) -> Ordering {
    self.0.cmp(&other.0)
  }
}

impl Hash for CanonicalSchema {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    let hash = blake3::hash(self.0.as_bytes());
    hash.as_bytes().hash(state);
  }
}

/// Structural identity of a schema shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SchemaKey(String);

impl SchemaKey {
  pub(crate) fn of(schema: &ObjectSchema) -> GenerationResult<Self> {
    Ok(CanonicalSchema::from_schema(schema)?.key())
  }
}

impl fmt::Display for SchemaKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0[..12.min(self.0.len())])
  }
}

fn schema_label(schema: &ObjectSchema) -> String {
  schema.title.clone().unwrap_or_else(|| "<inline>".to_string())
}

/// Strips documentation keywords and sorts order-independent arrays, descending only
/// into keywords that hold subschemas so property names are never mistaken for keywords.
fn normalize_schema(value: &mut Value) {
  let Value::Object(map) = value else {
    return;
  };

  map.retain(|key, _| !IGNORED_KEYWORDS.contains(&key.as_str()) && !key.starts_with("x-"));

  for keyword in ["required", "type", "enum"] {
    if let Some(Value::Array(arr)) = map.get_mut(keyword) {
      sort_string_array_in_place(arr);
    }
  }

  if let Some(Value::String(format)) = map.get_mut("format") {
    *format = format.to_ascii_lowercase();
  }

  if let Some(Value::Object(discriminator)) = map.get_mut("discriminator")
    && let Some(Value::String(property_name)) = discriminator.get_mut("propertyName")
  {
    *property_name = property_name.to_ascii_lowercase();
  }

  for keyword in SCHEMA_MAP_KEYWORDS {
    if let Some(Value::Object(schemas)) = map.get_mut(keyword) {
      schemas.values_mut().for_each(normalize_schema);
    }
  }

  for keyword in SCHEMA_KEYWORDS {
    if let Some(schema) = map.get_mut(keyword) {
      normalize_schema(schema);
    }
  }

  for keyword in SCHEMA_LIST_KEYWORDS {
    if let Some(Value::Array(schemas)) = map.get_mut(keyword) {
      schemas.iter_mut().for_each(normalize_schema);
    }
  }
}

/// Sorts a JSON array in-place if all elements are strings; otherwise leaves it unchanged.
fn sort_string_array_in_place(arr: &mut Vec<Value>) {
  let mut strings: Vec<String> = arr.iter().filter_map(|v| v.as_str().map(String::from)).collect();

  if strings.len() == arr.len() {
    strings.sort_unstable();
    *arr = strings.into_iter().map(Value::String).collect();
  }
}
