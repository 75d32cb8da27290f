use oas3::spec::{ObjectOrReference, ObjectSchema, Schema, SchemaType, SchemaTypeSet};

/// Shape queries over `ObjectSchema` used while mapping schemas onto the code model.
pub(crate) trait SchemaExt {
  /// Declared types with `null` removed.
  fn non_null_types(&self) -> Vec<SchemaType>;

  /// The only non-null declared type, if exactly one is declared.
  fn single_type(&self) -> Option<SchemaType>;

  /// `type: [T, "null"]` or `type: "null"`.
  fn is_nullable(&self) -> bool;

  fn is_null(&self) -> bool;

  fn is_array(&self) -> bool;

  /// Declares properties or `type: object`.
  fn is_object(&self) -> bool;

  fn has_union(&self) -> bool;

  fn has_intersection(&self) -> bool;

  /// Schema without any type information (`{}`).
  fn is_untyped(&self) -> bool;

  /// String values of `enum`, in declaration order, `null` entries skipped.
  fn string_enum_values(&self) -> Vec<String>;

  fn items_schema(&self) -> Option<&ObjectOrReference<ObjectSchema>>;

  /// `additionalProperties: false`.
  fn forbids_additional_properties(&self) -> bool;

  /// Description, falling back to the title.
  fn documentation(&self) -> Option<&str>;
}

impl SchemaExt for ObjectSchema {
  fn non_null_types(&self) -> Vec<SchemaType> {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(SchemaType::Null)) | None => vec![],
      Some(SchemaTypeSet::Single(single)) => vec![*single],
      Some(SchemaTypeSet::Multiple(types)) => types.iter().copied().filter(|t| *t != SchemaType::Null).collect(),
    }
  }

  fn single_type(&self) -> Option<SchemaType> {
    match self.non_null_types().as_slice() {
      [single] => Some(*single),
      _ => None,
    }
  }

  fn is_nullable(&self) -> bool {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(single)) => *single == SchemaType::Null,
      Some(SchemaTypeSet::Multiple(types)) => types.contains(&SchemaType::Null),
      None => false,
    }
  }

  fn is_null(&self) -> bool {
    matches!(&self.schema_type, Some(SchemaTypeSet::Single(SchemaType::Null)))
  }

  fn is_array(&self) -> bool {
    match self.single_type() {
      Some(SchemaType::Array) => true,
      None => self.items.is_some() && self.properties.is_empty(),
      Some(_) => false,
    }
  }

  fn is_object(&self) -> bool {
    self.single_type() == Some(SchemaType::Object) || !self.properties.is_empty()
  }

  fn has_union(&self) -> bool {
    !self.one_of.is_empty() || !self.any_of.is_empty()
  }

  fn has_intersection(&self) -> bool {
    !self.all_of.is_empty()
  }

  fn is_untyped(&self) -> bool {
    self.schema_type.is_none()
      && self.format.is_none()
      && self.properties.is_empty()
      && self.items.is_none()
      && self.enum_values.is_empty()
      && !self.has_union()
      && !self.has_intersection()
  }

  fn string_enum_values(&self) -> Vec<String> {
    self
      .enum_values
      .iter()
      .filter_map(|value| value.as_str().map(ToString::to_string))
      .collect()
  }

  fn items_schema(&self) -> Option<&ObjectOrReference<ObjectSchema>> {
    match self.items.as_deref()? {
      Schema::Object(inner) => Some(&**inner),
      Schema::Boolean(_) => None,
    }
  }

  fn forbids_additional_properties(&self) -> bool {
    matches!(self.additional_properties.as_ref(), Some(Schema::Boolean(allowed)) if !allowed.0)
  }

  fn documentation(&self) -> Option<&str> {
    self
      .description
      .as_deref()
      .or(self.title.as_deref())
      .map(str::trim)
      .filter(|text| !text.is_empty())
  }
}
