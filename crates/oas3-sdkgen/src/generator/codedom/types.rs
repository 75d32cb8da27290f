use strum::Display;

use super::ElementId;

/// Scalar types every target maps to its own spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub(crate) enum Primitive {
  String,
  Boolean,
  Int8,
  Int32,
  Int64,
  Float32,
  Float64,
  Decimal,
  DateTime,
  Date,
  Time,
  Duration,
  Guid,
  /// Base64 encoded payload (`format: byte`).
  Binary,
  /// Raw body (`format: binary`, non-structured content types).
  Stream,
  Void,
  /// Untyped JSON value.
  UntypedNode,
}

/// Types provided by the runtime libraries the generated code depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub(crate) enum Abstraction {
  RequestAdapter,
  RequestInformation,
  RequestOption,
  RequestHeaders,
  ParseNode,
  SerializationWriter,
  BackingStore,
  BackingStoreFactory,
  /// Map of path parameter name to value.
  PathParameters,
  /// Map of unknown wire keys to values.
  AdditionalData,
  /// Factory that maps a status code to an error type.
  ErrorMappings,
  /// Base type for generated error models.
  ApiException,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TypeRef {
  Primitive(Primitive),
  Abstraction(Abstraction),
  /// A class, interface or enum declared elsewhere in the model.
  Definition(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum CollectionKind {
  #[default]
  None,
  /// Fixed array (`T[]` style).
  Array,
  /// List-like collection.
  Complex,
}

/// A reference to a type plus the decorations writers need.
///
/// Equality is by value: two types pointing at the same definition are equal no matter
/// which schema occurrence produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CodeType {
  pub(crate) reference: TypeRef,
  pub(crate) nullable: bool,
  pub(crate) collection: CollectionKind,
}

impl CodeType {
  pub(crate) fn primitive(primitive: Primitive) -> Self {
    Self {
      reference: TypeRef::Primitive(primitive),
      nullable: true,
      collection: CollectionKind::None,
    }
  }

  pub(crate) fn abstraction(abstraction: Abstraction) -> Self {
    Self {
      reference: TypeRef::Abstraction(abstraction),
      nullable: false,
      collection: CollectionKind::None,
    }
  }

  pub(crate) fn definition(id: ElementId) -> Self {
    Self {
      reference: TypeRef::Definition(id),
      nullable: true,
      collection: CollectionKind::None,
    }
  }

  pub(crate) fn void() -> Self {
    Self {
      reference: TypeRef::Primitive(Primitive::Void),
      nullable: false,
      collection: CollectionKind::None,
    }
  }

  pub(crate) fn string() -> Self {
    Self::primitive(Primitive::String)
  }

  #[must_use]
  pub(crate) fn non_null(mut self) -> Self {
    self.nullable = false;
    self
  }

  #[must_use]
  pub(crate) fn with_nullable(mut self, nullable: bool) -> Self {
    self.nullable = nullable;
    self
  }

  #[must_use]
  pub(crate) fn collection_of(mut self, kind: CollectionKind) -> Self {
    self.collection = kind;
    self
  }

  pub(crate) fn is_collection(&self) -> bool {
    self.collection != CollectionKind::None
  }

  pub(crate) fn definition_id(&self) -> Option<ElementId> {
    match self.reference {
      TypeRef::Definition(id) => Some(id),
      _ => None,
    }
  }

  pub(crate) fn as_primitive(&self) -> Option<Primitive> {
    match self.reference {
      TypeRef::Primitive(primitive) => Some(primitive),
      _ => None,
    }
  }

  pub(crate) fn is_void(&self) -> bool {
    self.as_primitive() == Some(Primitive::Void)
  }
}
