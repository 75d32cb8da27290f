//! Renders the ordered code model into source files.
//!
//! Every language shares one traversal ([`render_element`]) and differs only by its
//! [`Conventions`] and a [`LanguageRenderer`] strategy that writes individual elements.

mod code_writer;
mod conventions;
mod csharp;
mod go;
mod http;
mod java;
mod python;
mod segmenter;
mod typescript;

#[cfg(test)]
mod tests;

use std::{
  collections::{BTreeMap, BTreeSet},
  path::PathBuf,
};

pub(crate) use code_writer::CodeWriter;
pub(crate) use conventions::{Casing, Conventions};
pub(crate) use segmenter::PathSegmenter;
use tracing::trace;

use crate::generator::{
  codedom::{
    Abstraction, ClassDef, ClassKind, CodeDom, CodeType, CollectionKind, ComposedKind, ElementId, ElementKind, ElementTag,
    MethodDef, MethodKind, ParameterDef, ParameterKind, Primitive, PropertyDef, PropertyKind, TypeRef, UsingDef,
  },
  config::{GenerationConfig, TargetLanguage},
  errors::{GenerationError, GenerationResult},
};

pub(crate) const GENERATED_BANNER: &str = "Code generated by oas3-sdkgen. DO NOT EDIT.";
/// Path parameter key under which raw URL builders store the URL.
pub(crate) const RAW_URL_KEY: &str = "request-raw-url";
/// URL template placeholder filled with the client base URL.
pub(crate) const BASE_URL_KEY: &str = "baseurl";

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderedFile {
  pub(crate) path: PathBuf,
  pub(crate) content: String,
}

/// Lookups shared by every file of one run.
#[derive(Debug, Clone, Default)]
pub(crate) struct ModelIndex {
  /// Model class to the interface extracted from it.
  interfaces: BTreeMap<ElementId, ElementId>,
}

impl ModelIndex {
  pub(crate) fn build(dom: &CodeDom) -> Self {
    let interfaces = dom
      .ids()
      .filter_map(|id| {
        let def = dom.element(id).as_interface()?;
        def.original_class.map(|class| (class, id))
      })
      .collect();
    Self { interfaces }
  }

  pub(crate) fn interface_of(&self, class: ElementId) -> Option<ElementId> {
    self.interfaces.get(&class).copied()
  }
}

/// What a renderer sees while writing one file.
pub(crate) struct RenderContext<'a> {
  pub(crate) dom: &'a CodeDom,
  pub(crate) conventions: &'a Conventions,
  pub(crate) index: &'a ModelIndex,
  pub(crate) root_namespace: &'a str,
  /// The top-level declaration the file is written for.
  pub(crate) declaration: ElementId,
}

impl RenderContext<'_> {
  pub(crate) fn language(&self) -> TargetLanguage {
    self.conventions.language
  }

  pub(crate) fn name(&self, id: ElementId) -> &str {
    self.dom.name(id)
  }

  pub(crate) fn documentation(&self, id: ElementId) -> Option<&str> {
    self.dom.element(id).documentation.as_deref()
  }

  pub(crate) fn is_deprecated(&self, id: ElementId) -> bool {
    self.dom.element(id).deprecated
  }

  /// Type name of a declaration, prefixed by its owners when the language requires it.
  pub(crate) fn declared_name(&self, id: ElementId) -> String {
    let name = self.conventions.type_name(self.dom.name(id));
    match self.dom.element(id).parent() {
      Some(parent) if self.conventions.qualifies_nested_types && self.dom.element(parent).is_type_declaration() => {
        format!("{}.{name}", self.declared_name(parent))
      }
      _ => name,
    }
  }

  pub(crate) fn member_name(&self, id: ElementId) -> String {
    self.conventions.member_name(self.dom.name(id))
  }

  pub(crate) fn parameter_name(&self, id: ElementId) -> String {
    self.conventions.parameter_name(self.dom.name(id))
  }

  /// Dotted namespace of the element's file.
  pub(crate) fn namespace_name(&self, id: ElementId) -> &str {
    self.dom.name(self.dom.namespace_of(id))
  }

  /// Namespace segments below the client namespace.
  pub(crate) fn relative_namespace(&self, id: ElementId) -> Vec<&str> {
    let namespace = self.namespace_name(id);
    let relative = if namespace == self.root_namespace {
      ""
    } else {
      namespace
        .strip_prefix(self.root_namespace)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(namespace)
    };
    relative.split('.').filter(|segment| !segment.is_empty()).collect()
  }

  pub(crate) fn class_def(&self, id: ElementId) -> Option<&ClassDef> {
    self.dom.element(id).as_class()
  }

  pub(crate) fn property_def(&self, id: ElementId) -> Option<&PropertyDef> {
    self.dom.element(id).as_property()
  }

  pub(crate) fn method_def(&self, id: ElementId) -> Option<&MethodDef> {
    self.dom.element(id).as_method()
  }

  pub(crate) fn parameter_def(&self, id: ElementId) -> Option<&ParameterDef> {
    self.dom.element(id).as_parameter()
  }

  pub(crate) fn parameters(&self, id: ElementId) -> Vec<ElementId> {
    self.dom.children_of_kind(id, ElementTag::Parameter).collect()
  }

  pub(crate) fn parameter_of_kind(&self, id: ElementId, kind: ParameterKind) -> Option<ElementId> {
    self
      .dom
      .children_of_kind(id, ElementTag::Parameter)
      .find(|child| self.parameter_def(*child).is_some_and(|def| def.kind == kind))
  }

  pub(crate) fn properties(&self, id: ElementId) -> Vec<ElementId> {
    self.dom.children_of_kind(id, ElementTag::Property).collect()
  }

  pub(crate) fn property_of_kind(&self, id: ElementId, kind: PropertyKind) -> Option<ElementId> {
    self
      .dom
      .children_of_kind(id, ElementTag::Property)
      .find(|child| self.property_def(*child).is_some_and(|def| def.kind == kind))
  }

  /// Properties exchanged on the wire, in declaration order.
  pub(crate) fn serialized_properties(&self, id: ElementId) -> Vec<ElementId> {
    self
      .dom
      .children_of_kind(id, ElementTag::Property)
      .filter(|child| self.property_def(*child).is_some_and(PropertyDef::is_serialized))
      .collect()
  }

  /// Exact wire key of a property, independent of its member name.
  pub(crate) fn wire_name(&self, id: ElementId) -> String {
    self
      .property_def(id)
      .and_then(|def| def.wire_name.clone())
      .unwrap_or_else(|| self.dom.name(id).to_string())
  }

  /// URL template key of a path parameter.
  pub(crate) fn serialization_name(&self, id: ElementId) -> String {
    self
      .parameter_def(id)
      .and_then(|def| def.serialization_name.clone())
      .unwrap_or_else(|| self.dom.name(id).to_string())
  }

  /// Owner class of a member.
  pub(crate) fn owner(&self, id: ElementId) -> Option<ElementId> {
    self.dom.element(id).parent().filter(|parent| self.dom.element(*parent).is_type_declaration())
  }

  pub(crate) fn is_enum(&self, id: ElementId) -> bool {
    self.dom.element(id).class_kind() == Some(ClassKind::Enum)
  }

  /// Using elements of the file, declarations first.
  pub(crate) fn usings(&self) -> (Vec<ElementId>, Vec<Abstraction>) {
    let mut declarations = vec![];
    let mut abstractions = vec![];
    for child in self.dom.children_of_kind(self.declaration, ElementTag::Using) {
      match &self.dom.element(child).kind {
        ElementKind::Using(UsingDef::Declaration(target)) => declarations.push(*target),
        ElementKind::Using(UsingDef::External(abstraction)) => abstractions.push(*abstraction),
        _ => {}
      }
    }
    (declarations, abstractions)
  }
}

impl RenderContext<'_> {
  /// Whether `class` or one of its ancestors stores its values in a backing store.
  pub(crate) fn is_backed(&self, class: ElementId) -> bool {
    self
      .dom
      .inherited_properties(class)
      .into_iter()
      .any(|property| self.property_def(property).is_some_and(|def| def.kind == PropertyKind::BackingStore))
  }

  /// Request generator paired with an executor of the same HTTP method.
  pub(crate) fn generator_for(&self, executor: ElementId) -> Option<ElementId> {
    let method = self.method_def(executor)?.http_method.clone()?;
    let owner = self.owner(executor)?;
    self.dom.children_of_kind(owner, ElementTag::Method).find(|sibling| {
      self
        .method_def(*sibling)
        .is_some_and(|def| def.kind == MethodKind::RequestGenerator && def.http_method.as_ref() == Some(&method))
    })
  }

  /// Query parameters class referenced by a request configuration class.
  pub(crate) fn query_parameters_class(&self, configuration: ElementId) -> Option<ElementId> {
    let property = self.property_of_kind(configuration, PropertyKind::QueryParameters)?;
    self.property_def(property)?.ty.definition_id()
  }

  /// Request configuration class a request method takes.
  pub(crate) fn configuration_class(&self, method: ElementId) -> Option<ElementId> {
    let parameter = self.parameter_of_kind(method, ParameterKind::RequestConfiguration)?;
    self.parameter_def(parameter)?.ty.definition_id()
  }

  /// Upper-case HTTP verb of a request method.
  pub(crate) fn http_verb(&self, method: ElementId) -> String {
    self
      .method_def(method)
      .and_then(|def| def.http_method.as_ref())
      .map_or_else(|| "GET".to_string(), |verb| verb.as_str().to_uppercase())
  }

  /// Accessor name of a navigation indexer: `byId` for a parameter named `id`.
  pub(crate) fn indexer_method_name(&self, indexer: ElementId) -> String {
    let parameter = self
      .dom
      .children_of_kind(indexer, ElementTag::Parameter)
      .next()
      .map_or("id", |parameter| self.dom.name(parameter));
    self.conventions.member_name(&format!("by{}", Casing::Pascal.apply(parameter)))
  }

  /// Getter or setter of the owner bound to `property`.
  pub(crate) fn accessor_for(&self, property: ElementId, kind: MethodKind) -> Option<ElementId> {
    let owner = self.owner(property)?;
    self.dom.children_of_kind(owner, ElementTag::Method).find(|method| {
      self
        .method_def(*method)
        .is_some_and(|def| def.kind == kind && def.target == Some(property))
    })
  }

  /// Every type referenced by the file of the current declaration.
  pub(crate) fn referenced_types(&self) -> Vec<CodeType> {
    let mut types = vec![];
    for id in std::iter::once(self.declaration).chain(self.dom.descendants(self.declaration)) {
      match &self.dom.element(id).kind {
        ElementKind::Property(def) => types.push(def.ty),
        ElementKind::Method(def) => {
          types.push(def.return_type);
          types.extend(def.error_mappings.values().copied());
        }
        ElementKind::Parameter(def) => types.push(def.ty),
        ElementKind::Indexer(def) => types.push(def.return_type),
        _ => {}
      }
    }
    types
  }

  /// Scalars referenced by the file, for languages importing them from libraries.
  pub(crate) fn primitives_used(&self) -> BTreeSet<Primitive> {
    self.referenced_types().iter().filter_map(CodeType::as_primitive).collect()
  }

  pub(crate) fn base_url(&self, constructor: ElementId) -> Option<&str> {
    self.method_def(constructor)?.base_url.as_deref()
  }

  /// Default value of the URL template property of a request builder.
  pub(crate) fn url_template(&self, class: ElementId) -> String {
    self
      .property_of_kind(class, PropertyKind::UrlTemplate)
      .and_then(|property| self.property_def(property)?.default_value.clone())
      .unwrap_or_default()
  }
}

/// Members of a composed type grouped by how they are matched on the wire.
#[derive(Debug, Clone)]
pub(crate) struct ComposedLayout {
  pub(crate) kind: ComposedKind,
  /// Wire name of the discriminator property.
  pub(crate) discriminator: Option<String>,
  /// Discriminator value to the member property it selects.
  pub(crate) mapped: Vec<(String, ElementId)>,
  /// Single object members.
  pub(crate) objects: Vec<ElementId>,
  /// Scalars, enums and collections, probed in declaration order.
  pub(crate) others: Vec<ElementId>,
  /// Object members instantiated when neither a mapping nor a probe matched.
  pub(crate) fallback: Vec<ElementId>,
}

impl ComposedLayout {
  pub(crate) fn of(ctx: &RenderContext<'_>, class: ElementId) -> Option<Self> {
    let def = ctx.class_def(class)?;
    let ClassKind::ComposedType(kind) = def.kind else {
      return None;
    };
    let members = ctx.properties(class);

    let mut mapped = vec![];
    if let Some(discriminator) = &def.discriminator {
      for (value, ty) in discriminator.mappings() {
        let member = members.iter().copied().find(|member| {
          ctx
            .property_def(*member)
            .is_some_and(|property| !property.ty.is_collection() && property.ty.definition_id() == ty.definition_id())
        });
        if let Some(member) = member {
          mapped.push((value.to_string(), member));
        }
      }
    }

    let mut objects = vec![];
    let mut others = vec![];
    for member in members {
      let Some(property) = ctx.property_def(member) else {
        continue;
      };
      let is_object = matches!(ValueShape::of(ctx.dom, &property.ty), ValueShape::Object(_));
      if is_object && !property.ty.is_collection() {
        objects.push(member);
      } else {
        others.push(member);
      }
    }

    let unmapped = objects
      .iter()
      .copied()
      .filter(|object| !mapped.iter().any(|(_, member)| member == object));
    let fallback = match kind {
      ComposedKind::Union => unmapped.take(1).collect(),
      ComposedKind::Intersection => unmapped.collect(),
    };

    Some(Self {
      kind,
      discriminator: def.discriminator.as_ref().map(|info| info.property_name.clone()),
      mapped,
      objects,
      others,
      fallback,
    })
  }

  pub(crate) fn has_mappings(&self) -> bool {
    self.discriminator.is_some() && !self.mapped.is_empty()
  }
}

/// How a value is read from a parse node or written to a serialization writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueShape {
  Primitive(Primitive),
  Enum(ElementId),
  Object(ElementId),
  Untyped,
}

impl ValueShape {
  pub(crate) fn of(dom: &CodeDom, ty: &CodeType) -> Self {
    match ty.reference {
      TypeRef::Primitive(Primitive::UntypedNode) => Self::Untyped,
      TypeRef::Primitive(primitive) => Self::Primitive(primitive),
      TypeRef::Definition(id) if dom.element(id).class_kind() == Some(ClassKind::Enum) => Self::Enum(id),
      TypeRef::Definition(id) => Self::Object(id),
      TypeRef::Abstraction(_) => Self::Untyped,
    }
  }

  /// Language neutral accessor stem (`StringValue`, `CollectionOfObjectValues`).
  pub(crate) fn accessor_stem(self, collection: bool) -> &'static str {
    match (self, collection) {
      (Self::Primitive(_), true) => "CollectionOfPrimitiveValues",
      (Self::Enum(_), true) => "CollectionOfEnumValues",
      (Self::Object(_) | Self::Untyped, true) => "CollectionOfObjectValues",
      (Self::Enum(_), false) => "EnumValue",
      (Self::Object(_) | Self::Untyped, false) => "ObjectValue",
      (Self::Primitive(primitive), false) => primitive_stem(primitive),
    }
  }
}

fn primitive_stem(primitive: Primitive) -> &'static str {
  match primitive {
    Primitive::String => "StringValue",
    Primitive::Boolean => "BoolValue",
    Primitive::Int8 => "SbyteValue",
    Primitive::Int32 => "IntValue",
    Primitive::Int64 => "LongValue",
    Primitive::Float32 => "FloatValue",
    Primitive::Float64 => "DoubleValue",
    Primitive::Decimal => "DecimalValue",
    Primitive::DateTime => "DateTimeOffsetValue",
    Primitive::Date => "DateValue",
    Primitive::Time => "TimeValue",
    Primitive::Duration => "TimeSpanValue",
    Primitive::Guid => "GuidValue",
    Primitive::Binary | Primitive::Stream => "ByteArrayValue",
    Primitive::Void | Primitive::UntypedNode => "ObjectValue",
  }
}

/// Which request adapter entry point an executor calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseShape {
  NoContent,
  Primitive,
  PrimitiveCollection,
  Enum,
  EnumCollection,
  Object,
  ObjectCollection,
}

impl ResponseShape {
  pub(crate) fn of(dom: &CodeDom, ty: &CodeType) -> Self {
    if ty.is_void() {
      return Self::NoContent;
    }
    match (ValueShape::of(dom, ty), ty.is_collection()) {
      (ValueShape::Primitive(_), false) => Self::Primitive,
      (ValueShape::Primitive(_), true) => Self::PrimitiveCollection,
      (ValueShape::Enum(_), false) => Self::Enum,
      (ValueShape::Enum(_), true) => Self::EnumCollection,
      (ValueShape::Object(_) | ValueShape::Untyped, false) => Self::Object,
      (ValueShape::Object(_) | ValueShape::Untyped, true) => Self::ObjectCollection,
    }
  }
}

/// Writes the elements of one target language.
pub(crate) trait LanguageRenderer: Send + Sync {
  /// Spelling of a scalar; `None` when the language cannot express it without losing
  /// precision.
  fn primitive_name(&self, primitive: Primitive) -> Option<&'static str>;

  fn abstraction_name(&self, abstraction: Abstraction) -> &'static str;

  fn definition_name(&self, ctx: &RenderContext<'_>, id: ElementId) -> String {
    ctx.declared_name(id)
  }

  /// Adds nullability and collection decorations to a base type name.
  fn decorate(&self, base: String, ty: &CodeType) -> String;

  /// Target spelling of `ty` as used by `element`.
  ///
  /// # Errors
  /// [`GenerationError::UnsupportedType`] when the scalar has no faithful spelling.
  fn type_name(&self, ctx: &RenderContext<'_>, ty: &CodeType, element: ElementId) -> GenerationResult<String> {
    let base = match ty.reference {
      TypeRef::Primitive(primitive) => self
        .primitive_name(primitive)
        .ok_or_else(|| GenerationError::UnsupportedType {
          language: ctx.language(),
          type_name: primitive.to_string(),
          element: ctx.dom.qualified_name(element),
        })?
        .to_string(),
      TypeRef::Abstraction(abstraction) => self.abstraction_name(abstraction).to_string(),
      TypeRef::Definition(id) => self.definition_name(ctx, id),
    };
    Ok(self.decorate(base, ty))
  }

  /// Banner, package declaration and imports.
  fn write_prologue(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()>;

  fn write_epilogue(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter) -> GenerationResult<()> {
    Ok(())
  }

  /// Opens a class, enum or interface.
  fn write_type_start(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()>;

  /// Called once the field-like members of a type are written.
  fn write_members_end(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter, _id: ElementId) -> GenerationResult<()> {
    Ok(())
  }

  /// Closes the type `owner`.
  fn write_block_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId) -> GenerationResult<()>;

  fn write_property(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()>;

  fn write_method(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()>;

  fn write_indexer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()>;

  fn write_constant(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()>;

  /// Whether `id` gets a file of its own.
  fn emits(&self, dom: &CodeDom, id: ElementId) -> bool {
    dom.element(id).is_type_declaration()
  }

  fn render_file(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    self.write_prologue(ctx, out)?;
    render_element(ctx, self, out, ctx.declaration)?;
    self.write_epilogue(ctx, out)
  }
}

/// Writes `id` and everything below it in sibling order.
pub(crate) fn render_element<R>(ctx: &RenderContext<'_>, renderer: &R, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()>
where
  R: LanguageRenderer + ?Sized,
{
  match &ctx.dom.element(id).kind {
    ElementKind::Class(_) | ElementKind::Interface(_) => render_type(ctx, renderer, out, id),
    ElementKind::Property(_) => renderer.write_property(ctx, out, id),
    ElementKind::Method(_) => renderer.write_method(ctx, out, id),
    ElementKind::Indexer(_) => renderer.write_indexer(ctx, out, id),
    ElementKind::Constant(_) => renderer.write_constant(ctx, out, id),
    ElementKind::Namespace | ElementKind::Parameter(_) | ElementKind::Using(_) | ElementKind::BlockEnd => Ok(()),
  }
}

fn render_type<R>(ctx: &RenderContext<'_>, renderer: &R, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()>
where
  R: LanguageRenderer + ?Sized,
{
  renderer.write_type_start(ctx, out, id)?;

  let mut deferred = vec![];
  let mut members_open = true;
  for child in ctx.dom.children(id) {
    let tag = ctx.dom.element(*child).tag();
    if members_open && !matches!(tag, ElementTag::Property | ElementTag::Using) {
      renderer.write_members_end(ctx, out, id)?;
      members_open = false;
    }
    match tag {
      ElementTag::Class | ElementTag::Interface if !ctx.conventions.nests_types => deferred.push(*child),
      ElementTag::BlockEnd => renderer.write_block_end(ctx, out, id)?,
      _ => render_element(ctx, renderer, out, *child)?,
    }
  }

  for nested in deferred {
    out.blank();
    render_type(ctx, renderer, out, nested)?;
  }
  Ok(())
}

/// Renders declarations of one language into files.
pub(crate) struct LanguageWriter {
  conventions: Conventions,
  renderer: Box<dyn LanguageRenderer>,
  segmenter: PathSegmenter,
  root_namespace: String,
}

impl LanguageWriter {
  pub(crate) fn new(config: &GenerationConfig) -> Self {
    let conventions = Conventions::for_language(config.language);
    let renderer: Box<dyn LanguageRenderer> = match config.language {
      TargetLanguage::CSharp => Box::new(csharp::CSharpRenderer),
      TargetLanguage::Java => Box::new(java::JavaRenderer),
      TargetLanguage::TypeScript => Box::new(typescript::TypeScriptRenderer),
      TargetLanguage::Python => Box::new(python::PythonRenderer),
      TargetLanguage::Go => Box::new(go::GoRenderer),
      TargetLanguage::Http => Box::new(http::HttpRenderer),
    };
    let segmenter = PathSegmenter::new(
      config.output_path.clone(),
      config.client_namespace_name.clone(),
      conventions.clone(),
    );
    Self {
      conventions,
      renderer,
      segmenter,
      root_namespace: config.client_namespace_name.clone(),
    }
  }

  pub(crate) fn segmenter(&self) -> &PathSegmenter {
    &self.segmenter
  }

  /// Top-level declarations that get a file, in model order.
  pub(crate) fn declarations(&self, dom: &CodeDom) -> Vec<ElementId> {
    dom
      .type_declarations()
      .into_iter()
      .filter(|id| self.renderer.emits(dom, *id))
      .collect()
  }

  /// Renders the file of `declaration`.
  ///
  /// # Errors
  /// [`GenerationError::UnsupportedType`] when a member uses a type the language cannot
  /// express; only this file is affected.
  pub(crate) fn render(&self, dom: &CodeDom, index: &ModelIndex, declaration: ElementId) -> GenerationResult<RenderedFile> {
    let ctx = RenderContext {
      dom,
      conventions: &self.conventions,
      index,
      root_namespace: &self.root_namespace,
      declaration,
    };
    let mut out = CodeWriter::new(self.conventions.indent);
    self.renderer.render_file(&ctx, &mut out)?;

    let path = self.segmenter.path_for(dom, declaration);
    trace!(path = %path.display(), "rendered declaration");
    let mut content = out.finish();
    if !content.ends_with('\n') {
      content.push('\n');
    }
    Ok(RenderedFile { path, content })
  }
}

/// Splits documentation into trimmed, non-empty lines.
pub(crate) fn doc_lines(text: &str) -> Vec<&str> {
  text.lines().map(str::trim).filter(|line| !line.is_empty()).collect()
}

/// Quotes `value` as a double-quoted string literal.
pub(crate) fn quoted(value: &str) -> String {
  let mut result = String::with_capacity(value.len() + 2);
  result.push('"');
  for c in value.chars() {
    match c {
      '"' => result.push_str("\\\""),
      '\\' => result.push_str("\\\\"),
      '\n' => result.push_str("\\n"),
      '\r' => result.push_str("\\r"),
      '\t' => result.push_str("\\t"),
      _ => result.push(c),
    }
  }
  result.push('"');
  result
}

/// The item type of a collection, or the type itself, without nullability.
pub(crate) fn element_type(ty: &CodeType) -> CodeType {
  CodeType {
    reference: ty.reference,
    nullable: false,
    collection: CollectionKind::None,
  }
}
