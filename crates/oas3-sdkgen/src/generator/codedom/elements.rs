use std::collections::BTreeMap;

use http::Method;
use strum::{Display, EnumDiscriminants};

use super::{CodeType, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub(crate) enum Access {
  #[default]
  Public,
  Protected,
  Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(crate) enum ClassKind {
  Model,
  RequestBuilder,
  QueryParameters,
  RequestConfiguration,
  /// Constant-bearing enumeration.
  Enum,
  /// Wrapper holding one member per `oneOf`/`anyOf` alternative.
  ComposedType(ComposedKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(crate) enum ComposedKind {
  /// `oneOf`: exactly one alternative is set.
  Union,
  /// `anyOf`: several alternatives may be set.
  Intersection,
}

/// Wire-value to subtype dispatch table of a polymorphic base class.
///
/// Values compare case-insensitively and iterate sorted by their lower-cased form so
/// writers emit the same branch order on every run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DiscriminatorInfo {
  pub(crate) property_name: String,
  mappings: BTreeMap<String, (String, CodeType)>,
}

impl DiscriminatorInfo {
  pub(crate) fn new(property_name: impl Into<String>) -> Self {
    Self {
      property_name: property_name.into(),
      mappings: BTreeMap::new(),
    }
  }

  /// Registers `value`; an existing mapping for the same value wins.
  pub(crate) fn add_mapping(&mut self, value: &str, target: CodeType) {
    self
      .mappings
      .entry(value.to_lowercase())
      .or_insert_with(|| (value.to_string(), target));
  }

  pub(crate) fn select(&self, value: &str) -> Option<&CodeType> {
    self.mappings.get(&value.to_lowercase()).map(|(_, target)| target)
  }

  pub(crate) fn mappings(&self) -> impl Iterator<Item = (&str, &CodeType)> {
    self.mappings.values().map(|(value, target)| (value.as_str(), target))
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.mappings.is_empty()
  }

  pub(crate) fn len(&self) -> usize {
    self.mappings.len()
  }
}

#[derive(Debug, Clone)]
pub(crate) struct ClassDef {
  pub(crate) kind: ClassKind,
  pub(crate) base_class: Option<ElementId>,
  pub(crate) implements: Vec<ElementId>,
  pub(crate) discriminator: Option<DiscriminatorInfo>,
  /// Error models derive from the runtime's API exception type.
  pub(crate) is_error: bool,
}

impl ClassDef {
  pub(crate) fn new(kind: ClassKind) -> Self {
    Self {
      kind,
      base_class: None,
      implements: vec![],
      discriminator: None,
      is_error: false,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(crate) enum InterfaceKind {
  /// Contract extracted from a model class.
  Model,
}

#[derive(Debug, Clone)]
pub(crate) struct InterfaceDef {
  pub(crate) kind: InterfaceKind,
  pub(crate) original_class: Option<ElementId>,
  pub(crate) extends: Vec<ElementId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(crate) enum PropertyKind {
  Custom,
  AdditionalData,
  BackingStore,
  RequestBuilder,
  UrlTemplate,
  PathParameters,
  RequestAdapter,
  QueryParameter,
  QueryParameters,
  Headers,
  Options,
}

#[derive(Debug, Clone)]
pub(crate) struct PropertyDef {
  pub(crate) kind: PropertyKind,
  pub(crate) ty: CodeType,
  /// Exact wire key, independent of the language-cased member name.
  pub(crate) wire_name: Option<String>,
  pub(crate) read_only: bool,
  pub(crate) default_value: Option<String>,
  pub(crate) access: Access,
}

impl PropertyDef {
  pub(crate) fn new(kind: PropertyKind, ty: CodeType) -> Self {
    Self {
      kind,
      ty,
      wire_name: None,
      read_only: false,
      default_value: None,
      access: Access::Public,
    }
  }

  pub(crate) fn is_serialized(&self) -> bool {
    matches!(self.kind, PropertyKind::Custom)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub(crate) enum MethodKind {
  ClientConstructor,
  Constructor,
  RawUrlConstructor,
  RawUrlBuilder,
  RequestExecutor,
  RequestGenerator,
  RequestBuilderWithParameters,
  Getter,
  Setter,
  Factory,
  Deserializer,
  Serializer,
  Custom,
}

#[derive(Debug, Clone)]
pub(crate) struct MethodDef {
  pub(crate) kind: MethodKind,
  pub(crate) return_type: CodeType,
  pub(crate) is_async: bool,
  pub(crate) is_static: bool,
  pub(crate) access: Access,
  pub(crate) http_method: Option<Method>,
  /// Content type used to serialize the body of request generators.
  pub(crate) request_body_content_type: Option<String>,
  /// `Accept` header values, highest priority first.
  pub(crate) accepted_response_types: Vec<String>,
  /// Status code (`404`, `4XX`) to error model.
  pub(crate) error_mappings: BTreeMap<String, CodeType>,
  /// Base URL handed to the client constructor.
  pub(crate) base_url: Option<String>,
  /// Property or class a generated accessor is bound to.
  pub(crate) target: Option<ElementId>,
}

impl MethodDef {
  pub(crate) fn new(kind: MethodKind, return_type: CodeType) -> Self {
    Self {
      kind,
      return_type,
      is_async: false,
      is_static: false,
      access: Access::Public,
      http_method: None,
      request_body_content_type: None,
      accepted_response_types: vec![],
      error_mappings: BTreeMap::new(),
      base_url: None,
      target: None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub(crate) enum ParameterKind {
  Custom,
  PathParameters,
  Path,
  RawUrl,
  RequestAdapter,
  RequestBody,
  RequestConfiguration,
  ParseNode,
  Serializer,
  SetterValue,
  BackingStore,
}

#[derive(Debug, Clone)]
pub(crate) struct ParameterDef {
  pub(crate) kind: ParameterKind,
  pub(crate) ty: CodeType,
  pub(crate) optional: bool,
  /// Name used in URL templates when it differs from the symbol.
  pub(crate) serialization_name: Option<String>,
  pub(crate) default_value: Option<String>,
}

impl ParameterDef {
  pub(crate) fn new(kind: ParameterKind, ty: CodeType) -> Self {
    Self {
      kind,
      ty,
      optional: false,
      serialization_name: None,
      default_value: None,
    }
  }
}

#[derive(Debug, Clone)]
pub(crate) struct IndexerDef {
  pub(crate) return_type: CodeType,
  /// Namespace segment of the collection the indexer belongs to.
  pub(crate) path_segment: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ConstantDef {
  /// Wire value of the enum member.
  pub(crate) value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UsingDef {
  /// A type generated in another namespace.
  Declaration(ElementId),
  /// A runtime abstraction, spelled per language.
  External(super::Abstraction),
}

#[derive(Debug, Clone, EnumDiscriminants)]
#[strum_discriminants(name(ElementTag), derive(Display, Hash, PartialOrd, Ord))]
pub(crate) enum ElementKind {
  Namespace,
  Class(ClassDef),
  Interface(InterfaceDef),
  Property(PropertyDef),
  Method(MethodDef),
  Parameter(ParameterDef),
  Indexer(IndexerDef),
  Constant(ConstantDef),
  Using(UsingDef),
  BlockEnd,
}

impl ElementKind {
  pub(crate) fn tag(&self) -> ElementTag {
    ElementTag::from(self)
  }

  /// Tags `self` may own as children.
  pub(crate) fn accepts(&self, child: ElementTag) -> bool {
    match self {
      Self::Namespace => matches!(child, ElementTag::Namespace | ElementTag::Class | ElementTag::Interface),
      Self::Class(def) if def.kind == ClassKind::Enum => {
        matches!(child, ElementTag::Constant | ElementTag::Using | ElementTag::BlockEnd)
      }
      Self::Class(_) => matches!(
        child,
        ElementTag::Property
          | ElementTag::Method
          | ElementTag::Indexer
          | ElementTag::Class
          | ElementTag::Using
          | ElementTag::BlockEnd
      ),
      Self::Interface(_) => matches!(
        child,
        ElementTag::Property | ElementTag::Method | ElementTag::Using | ElementTag::BlockEnd
      ),
      Self::Method(_) | Self::Indexer(_) => child == ElementTag::Parameter,
      Self::Property(_) | Self::Parameter(_) | Self::Constant(_) | Self::Using(_) | Self::BlockEnd => false,
    }
  }

  /// Elements whose names are not symbols and never collide.
  pub(crate) fn is_unnamed(tag: ElementTag) -> bool {
    matches!(tag, ElementTag::Using | ElementTag::BlockEnd)
  }

  /// Same-named siblings allowed to coexist, disambiguated by the writer.
  pub(crate) fn compatible(existing: ElementTag, added: ElementTag) -> bool {
    matches!(
      (existing, added),
      (ElementTag::Method, ElementTag::Method)
        | (ElementTag::Indexer, ElementTag::Indexer)
        | (ElementTag::Namespace, ElementTag::Namespace)
    )
  }
}
