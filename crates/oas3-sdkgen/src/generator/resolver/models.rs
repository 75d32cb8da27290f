use std::collections::BTreeSet;

use oas3::spec::{ObjectOrReference, ObjectSchema, SchemaType};
use tracing::trace;

use super::{InlineContext, ModelResolver, primitives::primitive_for};
use crate::{
  generator::{
    codedom::{
      Abstraction, ClassKind, CodeType, CollectionKind, ComposedKind, ConstantDef, DiscriminatorInfo, ElementId,
      ElementKind, MethodDef, MethodKind, ParameterDef, ParameterKind, Primitive, PropertyDef, PropertyKind, TypeRef,
    },
    comparer::SchemaKey,
    errors::{GenerationError, GenerationResult},
    metrics::GenerationWarning,
  },
  naming::identifiers::{cleanup_symbol_name, ensure_unique, to_first_character_lower_case, to_first_character_upper_case},
  utils::{SchemaExt, extract_schema_ref_name, parse_schema_ref_path},
};

pub(crate) const FACTORY_METHOD_NAME: &str = "createFromDiscriminatorValue";
pub(crate) const DESERIALIZER_METHOD_NAME: &str = "getFieldDeserializers";
pub(crate) const SERIALIZER_METHOD_NAME: &str = "serialize";
pub(crate) const ADDITIONAL_DATA_PROPERTY_NAME: &str = "additionalData";
pub(crate) const BACKING_STORE_PROPERTY_NAME: &str = "backingStore";
const MEMBER_SUFFIX: &str = "Member";
const MODEL_METHOD_NAMES: [&str; 3] = [FACTORY_METHOD_NAME, DESERIALIZER_METHOD_NAME, SERIALIZER_METHOD_NAME];

/// Member name for a wire key: `@odata.type` becomes `odataType`.
pub(crate) fn property_name(wire_name: &str) -> String {
  to_first_character_lower_case(&cleanup_symbol_name(wire_name))
}

fn enum_member_name(value: &str) -> String {
  let cleaned = cleanup_symbol_name(value);
  if cleaned.is_empty() {
    return "Empty".to_string();
  }
  to_first_character_upper_case(&cleaned)
}

impl ModelResolver<'_> {
  /// Maps a schema occurrence onto a type, declaring classes as needed.
  pub(super) fn resolve_schema(
    &mut self,
    schema: &ObjectOrReference<ObjectSchema>,
    context: &InlineContext,
  ) -> GenerationResult<CodeType> {
    match schema {
      ObjectOrReference::Ref { ref_path, .. } => {
        let name = parse_schema_ref_path(ref_path).ok_or_else(|| {
          GenerationError::invalid_schema(ref_path.as_str(), "only local schema components can be referenced")
        })?;
        self.resolve_component(&name)
      }
      ObjectOrReference::Object(inline) => self.resolve_object_schema(inline, context, None),
    }
  }

  /// Resolves a component once; later references reuse the declaration.
  pub(super) fn resolve_component(&mut self, name: &str) -> GenerationResult<CodeType> {
    let declared = self.by_component.get(name).or_else(|| {
      self
        .aliases
        .get(name)
        .and_then(|target| self.by_component.get(target))
    });
    if let Some(id) = declared {
      return Ok(CodeType::definition(*id));
    }
    let schema = self
      .registry
      .get(name)
      .cloned()
      .ok_or_else(|| GenerationError::invalid_schema(name, "referenced component does not exist"))?;

    if self.in_progress.contains(name) {
      if schema.is_array() {
        trace!(schema = name, "collection refers to itself");
        return Ok(self.recursive_collection(&schema));
      }
      return Err(GenerationError::invalid_schema(
        name,
        "schema only refers to itself without declaring a shape",
      ));
    }
    self.in_progress.insert(name.to_string());
    let context = self.component_context(name)?;
    let resolved = self.resolve_object_schema(&schema, &context, Some(name));
    self.in_progress.remove(name);
    resolved
  }

  /// A collection met again while its items are still resolving. Items already declared
  /// keep their type, anything else nests and becomes untyped.
  fn recursive_collection(&self, schema: &ObjectSchema) -> CodeType {
    let items = schema
      .items_schema()
      .and_then(extract_schema_ref_name)
      .and_then(|name| self.by_component.get(&name).copied());
    match items {
      Some(id) => CodeType::definition(id).collection_of(CollectionKind::Complex),
      None => CodeType::primitive(Primitive::UntypedNode).collection_of(CollectionKind::Complex),
    }
  }

  /// Resolves `component` through the declaration of `target`; references to `component`
  /// met along the way point at that declaration.
  fn resolve_as_alias<F>(
    &mut self,
    component: Option<&str>,
    target: Option<String>,
    resolve: F,
  ) -> GenerationResult<CodeType>
  where
    F: FnOnce(&mut Self) -> GenerationResult<CodeType>,
  {
    let alias = component.zip(target);
    if let Some((component, target)) = &alias {
      self.aliases.insert((*component).to_string(), target.clone());
    }
    let resolved = resolve(self);
    if let Some((component, _)) = alias {
      self.aliases.remove(component);
    }
    resolved
  }

  /// Components live in the models namespace; dotted names add sub-namespaces.
  fn component_context(&mut self, name: &str) -> GenerationResult<InlineContext> {
    let mut parts = name
      .split('.')
      .filter(|part| !part.is_empty())
      .map(cleanup_symbol_name)
      .collect::<Vec<_>>();
    let class_name = to_first_character_upper_case(&parts.pop().unwrap_or_else(|| cleanup_symbol_name(name)));

    let mut namespace = self.config.models_namespace_name();
    for part in parts {
      namespace.push('.');
      namespace.push_str(&part);
    }
    let namespace = self.dom.find_or_add_namespace(&namespace)?;
    Ok(InlineContext::new(namespace, class_name))
  }

  pub(super) fn resolve_object_schema(
    &mut self,
    schema: &ObjectSchema,
    context: &InlineContext,
    component: Option<&str>,
  ) -> GenerationResult<CodeType> {
    let label = component.unwrap_or(&context.name);
    let nullable = SchemaExt::is_nullable(schema);

    let enum_values = schema.string_enum_values();
    if !enum_values.is_empty() && matches!(schema.single_type(), None | Some(SchemaType::String)) {
      return self.enum_type(schema, &enum_values, context, component);
    }

    if schema.is_array() {
      if !schema.properties.is_empty() {
        return Err(GenerationError::invalid_schema(
          label,
          "declares type array but also object properties",
        ));
      }
      return self.collection_type(schema, context);
    }

    if schema.is_untyped() && schema.discriminator.is_none() {
      trace!(schema = label, "schema without constraints");
      return Ok(CodeType::primitive(Primitive::UntypedNode));
    }

    let types = schema.non_null_types();
    if let Some(scalar) = schema.single_type()
      && !matches!(scalar, SchemaType::Object)
      && !schema.properties.is_empty()
    {
      return Err(GenerationError::invalid_schema(
        label,
        format!("declares type {} but also object properties", scalar_name(scalar)),
      ));
    }
    if types.len() > 1 {
      self.stats.record_warning(GenerationWarning::SchemaFallback {
        schema_name: label.to_string(),
        message: "several non-null types are declared, falling back to an untyped node".to_string(),
      });
      return Ok(CodeType::primitive(Primitive::UntypedNode));
    }

    if let Some(primitive) = primitive_for(schema) {
      return Ok(CodeType::primitive(primitive));
    }

    if schema.has_union() && schema.properties.is_empty() {
      return self.composed_type(schema, context, component);
    }

    if schema.has_intersection() {
      if schema.all_of.len() == 1
        && schema.properties.is_empty()
        && schema.discriminator.is_none()
        && let Some(member) = schema.all_of.first()
      {
        return self
          .resolve_as_alias(component, extract_schema_ref_name(member), |resolver| {
            resolver.resolve_schema(member, context)
          })
          .map(|ty| if nullable { ty.with_nullable(true) } else { ty });
      }
      return self.model_type(schema, context, component);
    }

    let free_form = schema.properties.is_empty()
      && schema.discriminator.is_none()
      && schema.additional_properties.is_some()
      && !schema.forbids_additional_properties();
    if (schema.is_object() && !free_form) || schema.discriminator.is_some() {
      return self.model_type(schema, context, component);
    }

    trace!(schema = label, "untyped schema");
    Ok(CodeType::primitive(Primitive::UntypedNode))
  }

  fn collection_type(&mut self, schema: &ObjectSchema, context: &InlineContext) -> GenerationResult<CodeType> {
    let items = match schema.items_schema() {
      Some(items) => self.resolve_schema(items, context)?,
      None => CodeType::primitive(Primitive::UntypedNode),
    };
    if items.is_collection() {
      return Ok(CodeType::primitive(Primitive::UntypedNode).collection_of(CollectionKind::Complex));
    }
    Ok(items.collection_of(CollectionKind::Complex))
  }

  fn cached(&mut self, key: &SchemaKey, component: Option<&str>) -> Option<CodeType> {
    let id = *self.by_shape.get(key)?;
    if let Some(component) = component {
      self.by_component.insert(component.to_string(), id);
    }
    trace!(class = %self.dom.name(id), %key, "reusing structurally identical class");
    Some(CodeType::definition(id))
  }

  fn enum_type(
    &mut self,
    schema: &ObjectSchema,
    values: &[String],
    context: &InlineContext,
    component: Option<&str>,
  ) -> GenerationResult<CodeType> {
    let key = SchemaKey::of(schema)?;
    if let Some(cached) = self.cached(&key, component) {
      return Ok(cached);
    }

    let id = self.declare_class(context, ClassKind::Enum, Some(key), component)?;
    self.dom.document(id, schema.documentation());
    self.dom.element_mut(id).deprecated = schema.deprecated.unwrap_or(false);

    for value in values {
      let name = ensure_unique(&enum_member_name(value), |candidate| {
        self.dom.find_child_by_name(id, candidate).is_some()
      });
      self.dom.add_child(
        id,
        name,
        ElementKind::Constant(ConstantDef {
          value: value.clone(),
        }),
      )?;
    }
    self.stats.record_enum();
    Ok(CodeType::definition(id))
  }

  fn model_type(
    &mut self,
    schema: &ObjectSchema,
    context: &InlineContext,
    component: Option<&str>,
  ) -> GenerationResult<CodeType> {
    let key = SchemaKey::of(schema)?;
    if let Some(cached) = self.cached(&key, component) {
      return Ok(cached);
    }

    let class = self.declare_class(context, ClassKind::Model, Some(key), component)?;
    self.dom.document(class, schema.documentation());
    self.dom.element_mut(class).deprecated = schema.deprecated.unwrap_or(false);
    self.stats.record_model();

    let label = component.map_or_else(|| context.name.clone(), ToString::to_string);
    let base_name = self.base_component(schema, component);
    let mut flattened = vec![];

    for member in &schema.all_of {
      let member_name = extract_schema_ref_name(member);
      if member_name.is_some() && member_name == base_name {
        continue;
      }
      match member {
        ObjectOrReference::Ref { .. } => {
          let Some(name) = member_name else {
            return Err(GenerationError::invalid_schema(
              label.as_str(),
              "allOf member is not a local schema component",
            ));
          };
          let resolved = self.registry.get(&name).cloned().ok_or_else(|| {
            GenerationError::invalid_schema(label.as_str(), format!("allOf member '{name}' does not exist"))
          })?;
          flattened.push(resolved);
        }
        ObjectOrReference::Object(inline) => flattened.push(inline.clone()),
      }
    }

    if let Some(base_name) = &base_name {
      let base = self.resolve_component(base_name)?;
      let Some(base_id) = base.definition_id().filter(|id| self.is_model(*id)) else {
        return Err(GenerationError::invalid_schema(
          label.as_str(),
          format!("allOf base '{base_name}' is not an object schema"),
        ));
      };
      if base_id != class
        && let Some(def) = self.dom.class_mut(class)
      {
        def.base_class = Some(base_id);
      }
    }
    flattened.push(schema.clone());

    let inherited = self.dom.class_base(class).is_some();
    for member in &flattened {
      self.add_model_properties(class, member, &label)?;
    }
    self.add_model_infrastructure(class, inherited, schema.forbids_additional_properties())?;
    self.add_model_methods(class)?;

    if let Some(discriminator) = &schema.discriminator {
      let info = self.discriminator_info(
        &discriminator.property_name,
        discriminator.mapping.iter().flatten(),
        component,
        &label,
        true,
      )?;
      if let Some(def) = self.dom.class_mut(class) {
        def.discriminator = Some(info);
      }
    }

    Ok(CodeType::definition(class))
  }

  /// The `allOf` member that becomes the base class: the only component reference, or
  /// among several the one declaring a discriminator.
  fn base_component(&self, schema: &ObjectSchema, component: Option<&str>) -> Option<String> {
    let references = schema
      .all_of
      .iter()
      .filter_map(extract_schema_ref_name)
      .filter(|name| Some(name.as_str()) != component)
      .collect::<Vec<_>>();
    match references.as_slice() {
      [] => None,
      [single] => Some(single.clone()),
      several => several
        .iter()
        .find(|name| self.registry.get(name).is_some_and(|parent| parent.discriminator.is_some()))
        .cloned(),
    }
  }

  fn is_model(&self, id: ElementId) -> bool {
    self.dom.element(id).class_kind() == Some(ClassKind::Model)
  }

  fn add_model_properties(&mut self, class: ElementId, schema: &ObjectSchema, label: &str) -> GenerationResult<()> {
    let class_name = self.dom.name(class).to_string();
    for (wire_name, property_schema) in &schema.properties {
      if self.has_wire_property(class, wire_name) {
        continue;
      }
      let context = InlineContext::new(
        self.dom.namespace_of(class),
        format!("{class_name}{}", to_first_character_upper_case(&cleanup_symbol_name(wire_name))),
      );
      let ty = self.resolve_schema(property_schema, &context).map_err(|error| match error {
        GenerationError::InvalidSchema { reason, .. } => {
          GenerationError::invalid_schema(format!("{label}.{wire_name}"), reason)
        }
        other => other,
      })?;

      let name = self.unique_member_name(class, &property_name(wire_name));
      let mut def = PropertyDef::new(PropertyKind::Custom, ty);
      def.wire_name = Some(wire_name.clone());

      let (documentation, deprecated) = match property_schema {
        ObjectOrReference::Object(inline) => {
          def.read_only = inline.read_only.unwrap_or(false);
          (inline.documentation().map(ToString::to_string), inline.deprecated.unwrap_or(false))
        }
        ObjectOrReference::Ref { .. } => (None, false),
      };
      let id = self.dom.add_child(class, name, ElementKind::Property(def))?;
      self.dom.document(id, documentation.as_deref());
      self.dom.element_mut(id).deprecated = deprecated;
    }
    Ok(())
  }

  fn has_wire_property(&self, class: ElementId, wire_name: &str) -> bool {
    self
      .dom
      .children(class)
      .iter()
      .filter_map(|child| self.dom.element(*child).as_property())
      .any(|property| property.wire_name.as_deref() == Some(wire_name))
  }

  /// Additional data and backing store holders live on the root of a hierarchy only.
  fn add_model_infrastructure(&mut self, class: ElementId, inherited: bool, closed: bool) -> GenerationResult<()> {
    if inherited {
      return Ok(());
    }
    if self.config.include_additional_data && !closed {
      let name = self.unique_member_name(class, ADDITIONAL_DATA_PROPERTY_NAME);
      let id = self.dom.add_child(
        class,
        name,
        ElementKind::Property(PropertyDef::new(
          PropertyKind::AdditionalData,
          CodeType::abstraction(Abstraction::AdditionalData),
        )),
      )?;
      self.dom.document(
        id,
        Some("Stores additional data not described in the OpenAPI description found when deserializing."),
      );
    }
    if self.config.uses_backing_store {
      let name = self.unique_member_name(class, BACKING_STORE_PROPERTY_NAME);
      let mut def = PropertyDef::new(PropertyKind::BackingStore, CodeType::abstraction(Abstraction::BackingStore));
      def.read_only = true;
      let id = self.dom.add_child(class, name, ElementKind::Property(def))?;
      self.dom.document(id, Some("Stores model information."));
    }
    Ok(())
  }

  fn add_model_methods(&mut self, class: ElementId) -> GenerationResult<()> {
    let mut factory = MethodDef::new(MethodKind::Factory, CodeType::definition(class).non_null());
    factory.is_static = true;
    let factory = self.dom.add_child(class, FACTORY_METHOD_NAME, ElementKind::Method(factory))?;
    self.dom.add_child(
      factory,
      "parseNode",
      ElementKind::Parameter(ParameterDef::new(
        ParameterKind::ParseNode,
        CodeType::abstraction(Abstraction::ParseNode),
      )),
    )?;
    self.dom.document(
      factory,
      Some("Creates a new instance of the appropriate class based on discriminator value"),
    );

    let deserializer = self.dom.add_child(
      class,
      DESERIALIZER_METHOD_NAME,
      ElementKind::Method(MethodDef::new(MethodKind::Deserializer, CodeType::void())),
    )?;
    self.dom.document(deserializer, Some("The deserialization information for the current model"));

    let serializer = self.dom.add_child(
      class,
      SERIALIZER_METHOD_NAME,
      ElementKind::Method(MethodDef::new(MethodKind::Serializer, CodeType::void())),
    )?;
    self.dom.add_child(
      serializer,
      "writer",
      ElementKind::Parameter(ParameterDef::new(
        ParameterKind::Serializer,
        CodeType::abstraction(Abstraction::SerializationWriter),
      )),
    )?;
    self.dom.document(serializer, Some("Serializes information the current object"));
    Ok(())
  }

  /// Builds the dispatch table of a discriminated class.
  ///
  /// Explicit mappings come first; components deriving from `component` through `allOf`
  /// are added under their own name when no explicit value targets them.
  fn discriminator_info<'m, I>(
    &mut self,
    property_name: &str,
    mapping: I,
    component: Option<&str>,
    label: &str,
    require_descent: bool,
  ) -> GenerationResult<DiscriminatorInfo>
  where
    I: IntoIterator<Item = (&'m String, &'m String)>,
  {
    let mut info = DiscriminatorInfo::new(property_name);
    let mut mapped = vec![];

    for (value, target) in mapping {
      let Some(target_name) = parse_schema_ref_path(target)
        .or_else(|| self.registry.contains(target).then(|| target.clone()))
        .filter(|name| self.registry.contains(name))
      else {
        return Err(GenerationError::UnresolvableDiscriminator {
          schema: label.to_string(),
          value: value.clone(),
          target: target.clone(),
        });
      };

      if require_descent
        && let Some(base) = component
        && !self.registry.descends_from(&target_name, base)
      {
        return Err(GenerationError::UnreachableBaseType {
          schema: target_name,
          base: base.to_string(),
        });
      }

      let ty = self.resolve_component(&target_name)?;
      info.add_mapping(value, ty.with_nullable(true));
      mapped.push(target_name);
    }

    if let Some(base) = component {
      let derived = self
        .registry
        .derived_types(base)
        .into_iter()
        .filter(|name| !mapped.iter().any(|mapped| mapped.as_str() == *name))
        .map(ToString::to_string)
        .collect::<Vec<_>>();
      for name in derived {
        let ty = self.resolve_component(&name)?;
        info.add_mapping(&name, ty);
      }
    }
    Ok(info)
  }

  fn composed_type(
    &mut self,
    schema: &ObjectSchema,
    context: &InlineContext,
    component: Option<&str>,
  ) -> GenerationResult<CodeType> {
    let (kind, members) = if schema.one_of.is_empty() {
      (ComposedKind::Intersection, &schema.any_of)
    } else {
      (ComposedKind::Union, &schema.one_of)
    };
    let members = members.iter().filter(|member| !is_null_member(member)).collect::<Vec<_>>();

    if let [single] = members.as_slice() {
      return self
        .resolve_as_alias(component, extract_schema_ref_name(single), |resolver| {
          resolver.resolve_schema(single, context)
        })
        .map(|ty| ty.with_nullable(true));
    }
    if members.is_empty() {
      return Ok(CodeType::primitive(Primitive::UntypedNode));
    }

    let key = SchemaKey::of(schema)?;
    if let Some(cached) = self.cached(&key, component) {
      return Ok(cached);
    }

    if (schema.discriminator.is_none() || kind == ComposedKind::Union)
      && let Some(base) = self.shared_discriminated_base(&members)
    {
      trace!(%base, "alternatives share a discriminated base");
      let resolved = self.resolve_as_alias(component, Some(base.clone()), |resolver| {
        resolver.resolve_component(&base)
      })?;
      if let Some(component) = component
        && let Some(id) = resolved.definition_id()
      {
        self.by_component.insert(component.to_string(), id);
      }
      return Ok(resolved);
    }

    let label = component.map_or_else(|| context.name.clone(), ToString::to_string);
    let class = self.declare_class(context, ClassKind::ComposedType(kind), Some(key), component)?;
    self.dom.document(class, schema.documentation());
    self.stats.record_composed_type();

    let mut member_types = Vec::with_capacity(members.len());
    for (index, member) in members.iter().enumerate() {
      let member_context = context.with_suffix(&format!("{MEMBER_SUFFIX}{}", index + 1));
      member_types.push(self.resolve_schema(member, &member_context)?);
    }

    for ty in &member_types {
      let name = self.unique_member_name(class, &self.member_name(ty));
      self.dom.add_child(
        class,
        name,
        ElementKind::Property(PropertyDef::new(PropertyKind::Custom, ty.with_nullable(true))),
      )?;
    }
    self.add_model_methods(class)?;

    if let Some(discriminator) = &schema.discriminator {
      let mut info = self.discriminator_info(
        &discriminator.property_name,
        discriminator.mapping.iter().flatten(),
        None,
        &label,
        false,
      )?;
      for member in &members {
        if let Some(name) = extract_schema_ref_name(member)
          && info.select(&name).is_none()
          && !info
            .mappings()
            .any(|(_, ty)| ty.definition_id().as_ref() == self.by_component.get(&name))
        {
          let ty = self.resolve_component(&name)?;
          info.add_mapping(&name, ty);
        }
      }
      if let Some(def) = self.dom.class_mut(class) {
        def.discriminator = Some(info);
      }
    }

    Ok(CodeType::definition(class))
  }

  /// Closest discriminated component every alternative derives from (or is). Only
  /// alternatives referencing components take part.
  fn shared_discriminated_base(&self, members: &[&ObjectOrReference<ObjectSchema>]) -> Option<String> {
    let names = members
      .iter()
      .map(|member| extract_schema_ref_name(member))
      .collect::<Option<Vec<_>>>()?;

    let mut visited = BTreeSet::new();
    let mut candidate = names.first().cloned();
    while let Some(name) = candidate {
      if !visited.insert(name.clone()) {
        break;
      }
      let schema = self.registry.get(&name)?;
      if schema.discriminator.is_some()
        && schema.is_object()
        && names.iter().all(|member| self.registry.descends_from(member, &name))
      {
        return Some(name);
      }
      candidate = self.base_component(schema, Some(name.as_str()));
    }
    None
  }

  /// Member names step aside for the serialization methods every model carries.
  fn unique_member_name(&self, class: ElementId, name: &str) -> String {
    ensure_unique(name, |candidate| {
      MODEL_METHOD_NAMES.contains(&candidate) || self.dom.find_child_by_name(class, candidate).is_some()
    })
  }

  fn member_name(&self, ty: &CodeType) -> String {
    let base = match ty.reference {
      TypeRef::Definition(id) => to_first_character_lower_case(self.dom.name(id)),
      TypeRef::Primitive(primitive) => to_first_character_lower_case(&primitive.to_string()),
      TypeRef::Abstraction(abstraction) => to_first_character_lower_case(&abstraction.to_string()),
    };
    if ty.is_collection() { format!("{base}Collection") } else { base }
  }
}

fn is_null_member(member: &ObjectOrReference<ObjectSchema>) -> bool {
  matches!(member, ObjectOrReference::Object(inline) if inline.is_null())
}

fn scalar_name(schema_type: SchemaType) -> &'static str {
  match schema_type {
    SchemaType::String => "string",
    SchemaType::Integer => "integer",
    SchemaType::Number => "number",
    SchemaType::Boolean => "boolean",
    SchemaType::Array => "array",
    SchemaType::Object => "object",
    SchemaType::Null => "null",
  }
}
