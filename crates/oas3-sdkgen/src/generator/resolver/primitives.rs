use oas3::spec::{ObjectSchema, SchemaType};

use crate::{generator::codedom::Primitive, utils::SchemaExt};

/// Scalar mapping by `type` and `format`. `None` when the schema is not a scalar.
pub(crate) fn primitive_for(schema: &ObjectSchema) -> Option<Primitive> {
  let format = schema.format.as_deref().map(str::to_ascii_lowercase);
  let format = format.as_deref();

  match schema.single_type() {
    Some(SchemaType::String) => Some(match format {
      Some("date-time") => Primitive::DateTime,
      Some("date") => Primitive::Date,
      Some("time") => Primitive::Time,
      Some("duration") => Primitive::Duration,
      Some("uuid") => Primitive::Guid,
      Some("byte" | "base64") => Primitive::Binary,
      Some("binary") => Primitive::Stream,
      Some("decimal") => Primitive::Decimal,
      _ => Primitive::String,
    }),
    Some(SchemaType::Integer) => Some(match format {
      Some("int64") => Primitive::Int64,
      Some("int8" | "uint8") => Primitive::Int8,
      _ => Primitive::Int32,
    }),
    Some(SchemaType::Number) => Some(match format {
      Some("float") => Primitive::Float32,
      Some("decimal") => Primitive::Decimal,
      Some("int32") => Primitive::Int32,
      Some("int64") => Primitive::Int64,
      Some("int8" | "uint8") => Primitive::Int8,
      _ => Primitive::Float64,
    }),
    Some(SchemaType::Boolean) => Some(Primitive::Boolean),
    Some(SchemaType::Array | SchemaType::Object | SchemaType::Null) => None,
    None if schema.schema_type.is_none() && schema.properties.is_empty() => format.and_then(primitive_for_format),
    None => None,
  }
}

/// Typeless schemas that only declare a `format`.
fn primitive_for_format(format: &str) -> Option<Primitive> {
  Some(match format {
    "date-time" => Primitive::DateTime,
    "date" => Primitive::Date,
    "time" => Primitive::Time,
    "duration" => Primitive::Duration,
    "uuid" => Primitive::Guid,
    "byte" | "base64" => Primitive::Binary,
    "binary" => Primitive::Stream,
    "decimal" => Primitive::Decimal,
    "int64" => Primitive::Int64,
    "int32" => Primitive::Int32,
    "float" => Primitive::Float32,
    "double" => Primitive::Float64,
    _ => return None,
  })
}
