use std::collections::BTreeSet;

use itertools::Itertools;

use super::{
  BASE_URL_KEY, CodeWriter, ComposedLayout, GENERATED_BANNER, LanguageRenderer, RAW_URL_KEY, RenderContext, ResponseShape,
  ValueShape, doc_lines, element_type, quoted,
};
use crate::generator::{
  codedom::{
    Abstraction, Access, ClassKind, CodeType, ComposedKind, ElementId, ElementKind, ElementTag, MethodKind,
    ParameterKind, Primitive, PropertyKind,
  },
  errors::GenerationResult,
};

const NONNULL: &str = "@jakarta.annotation.Nonnull";
const NULLABLE: &str = "@jakarta.annotation.Nullable";
const CONSUMER_OF_PARSE_NODE: &str = "java.util.function.Consumer<ParseNode>";

pub(crate) struct JavaRenderer;

fn access(access: Access) -> &'static str {
  match access {
    Access::Public => "public",
    Access::Protected => "protected",
    Access::Private => "private",
  }
}

fn package(dotted: &str) -> String {
  dotted.to_lowercase()
}

fn abstraction_import(abstraction: Abstraction) -> &'static str {
  match abstraction {
    Abstraction::RequestAdapter => "com.microsoft.kiota.RequestAdapter",
    Abstraction::RequestInformation => "com.microsoft.kiota.RequestInformation",
    Abstraction::RequestOption => "com.microsoft.kiota.RequestOption",
    Abstraction::RequestHeaders => "com.microsoft.kiota.RequestHeaders",
    Abstraction::ParseNode => "com.microsoft.kiota.serialization.ParseNode",
    Abstraction::SerializationWriter => "com.microsoft.kiota.serialization.SerializationWriter",
    Abstraction::BackingStore => "com.microsoft.kiota.store.BackingStore",
    Abstraction::BackingStoreFactory => "com.microsoft.kiota.store.BackingStoreFactory",
    Abstraction::PathParameters => "java.util.HashMap",
    Abstraction::AdditionalData => "java.util.Map",
    Abstraction::ErrorMappings => "com.microsoft.kiota.serialization.ParsableFactory",
    Abstraction::ApiException => "com.microsoft.kiota.ApiException",
  }
}

fn primitive_import(primitive: Primitive) -> Option<&'static str> {
  match primitive {
    Primitive::Decimal => Some("java.math.BigDecimal"),
    Primitive::DateTime => Some("java.time.OffsetDateTime"),
    Primitive::Date => Some("java.time.LocalDate"),
    Primitive::Time => Some("java.time.LocalTime"),
    Primitive::Duration => Some("com.microsoft.kiota.PeriodAndDuration"),
    Primitive::Guid => Some("java.util.UUID"),
    Primitive::Stream => Some("java.io.InputStream"),
    Primitive::UntypedNode => Some("com.microsoft.kiota.serialization.UntypedNode"),
    _ => None,
  }
}

/// Parse node and serialization writer accessor stem of a scalar.
fn value_stem(primitive: Primitive) -> &'static str {
  match primitive {
    Primitive::String => "StringValue",
    Primitive::Boolean => "BooleanValue",
    Primitive::Int8 => "ByteValue",
    Primitive::Int32 => "IntegerValue",
    Primitive::Int64 => "LongValue",
    Primitive::Float32 => "FloatValue",
    Primitive::Float64 => "DoubleValue",
    Primitive::Decimal => "BigDecimalValue",
    Primitive::DateTime => "OffsetDateTimeValue",
    Primitive::Date => "LocalDateValue",
    Primitive::Time => "LocalTimeValue",
    Primitive::Duration => "PeriodAndDurationValue",
    Primitive::Guid => "UUIDValue",
    Primitive::Binary | Primitive::Stream => "ByteArrayValue",
    Primitive::Void | Primitive::UntypedNode => "ObjectValue",
  }
}

fn write_javadoc(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, parameters: &[ElementId]) {
  let documented = parameters
    .iter()
    .filter_map(|parameter| ctx.documentation(*parameter).map(|text| (*parameter, text)))
    .collect::<Vec<_>>();
  let summary = ctx.documentation(id);
  if summary.is_none() && documented.is_empty() {
    return;
  }
  out.line("/**");
  if let Some(text) = summary {
    for line in doc_lines(text) {
      out.line(format!(" * {}", line.replace("*/", "*&#47;")));
    }
  }
  for (parameter, text) in documented {
    out.line(format!(
      " * @param {} {}",
      ctx.parameter_name(parameter),
      doc_lines(text).join(" ").replace("*/", "*&#47;")
    ));
  }
  if ctx.is_deprecated(id) {
    out.line(" * @deprecated");
  }
  out.line(" */");
}

fn write_deprecated(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
  if ctx.is_deprecated(id) {
    out.line("@Deprecated");
  }
}

fn branch(out: &mut CodeWriter, first: &mut bool, condition: &str) {
  if *first {
    out.open(format!("if ({condition}) {{"));
  } else {
    out.open(format!("}} else if ({condition}) {{"));
  }
  *first = false;
}

impl JavaRenderer {
  fn element_name(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    self.type_name(ctx, &element_type(ty), id)
  }

  fn factory(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    Ok(format!("{}::createFromDiscriminatorValue", self.element_name(ctx, ty, id)?))
  }

  fn read_value(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId, node: &str) -> GenerationResult<String> {
    let shape = ValueShape::of(ctx.dom, ty);
    let element = self.element_name(ctx, ty, id)?;
    Ok(match (shape, ty.is_collection()) {
      (ValueShape::Primitive(primitive), false) => format!("{node}.get{}()", value_stem(primitive)),
      (ValueShape::Primitive(_), true) => format!("{node}.getCollectionOfPrimitiveValues({element}.class)"),
      (ValueShape::Enum(_), false) => format!("{node}.getEnumValue({element}::forValue)"),
      (ValueShape::Enum(_), true) => format!("{node}.getCollectionOfEnumValues({element}::forValue)"),
      (ValueShape::Object(_) | ValueShape::Untyped, false) => {
        format!("{node}.getObjectValue({})", self.factory(ctx, ty, id)?)
      }
      (ValueShape::Object(_) | ValueShape::Untyped, true) => {
        format!("{node}.getCollectionOfObjectValues({})", self.factory(ctx, ty, id)?)
      }
    })
  }

  fn write_value(ctx: &RenderContext<'_>, ty: &CodeType, key: &str, value: &str) -> String {
    let shape = ValueShape::of(ctx.dom, ty);
    let stem = match shape {
      ValueShape::Primitive(primitive) if !ty.is_collection() => value_stem(primitive),
      _ => shape.accessor_stem(ty.is_collection()),
    };
    format!("writer.write{stem}({key}, {value});")
  }

  /// Reads the current value of a model property.
  fn read_property(ctx: &RenderContext<'_>, property: ElementId) -> String {
    match ctx.accessor_for(property, MethodKind::Getter) {
      Some(getter) => format!("this.{}()", ctx.member_name(getter)),
      None => format!("this.{}", ctx.member_name(property)),
    }
  }

  fn assign_property(ctx: &RenderContext<'_>, receiver: &str, property: ElementId, value: &str) -> String {
    if let Some(setter) = ctx.accessor_for(property, MethodKind::Setter) {
      return format!("{receiver}.{}({value});", ctx.member_name(setter));
    }
    if ctx.owner(property).is_some_and(|owner| ctx.is_backed(owner)) {
      return format!("{receiver}.backingStore.set({}, {value});", quoted(&ctx.wire_name(property)));
    }
    format!("{receiver}.{} = {value};", ctx.member_name(property))
  }

  fn parameter_list(&self, ctx: &RenderContext<'_>, parameters: &[ElementId]) -> GenerationResult<String> {
    let mut rendered = vec![];
    for parameter in parameters {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      let annotation = if def.optional || def.ty.nullable { NULLABLE } else { NONNULL };
      let ty = match def.kind {
        ParameterKind::RequestConfiguration => format!(
          "java.util.function.Consumer<{}>",
          self.type_name(ctx, &def.ty.non_null(), *parameter)?
        ),
        _ => self.type_name(ctx, &def.ty, *parameter)?,
      };
      rendered.push(format!("{annotation} final {ty} {}", ctx.parameter_name(*parameter)));
    }
    Ok(rendered.join(", "))
  }

  fn required_parameters(ctx: &RenderContext<'_>, id: ElementId) -> Vec<ElementId> {
    ctx
      .parameters(id)
      .into_iter()
      .filter(|parameter| ctx.parameter_def(*parameter).is_some_and(|def| !def.optional))
      .collect()
  }

  fn write_null_checks(ctx: &RenderContext<'_>, out: &mut CodeWriter, parameters: &[ElementId]) {
    for parameter in parameters {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      if !def.optional && !def.ty.nullable {
        out.line(format!("Objects.requireNonNull({});", ctx.parameter_name(*parameter)));
      }
    }
  }

  /// Java has no default arguments: methods with optional parameters get an overload
  /// without them that passes `null`.
  fn write_overload(
    &self,
    ctx: &RenderContext<'_>,
    out: &mut CodeWriter,
    id: ElementId,
    annotation: Option<&str>,
    signature_start: &str,
    delegate: &str,
  ) -> GenerationResult<()> {
    let all = ctx.parameters(id);
    let required = Self::required_parameters(ctx, id);
    if required.len() == all.len() {
      return Ok(());
    }
    write_javadoc(ctx, out, id, &required);
    write_deprecated(ctx, out, id);
    if let Some(annotation) = annotation {
      out.line(annotation);
    }
    out.open(format!("{signature_start}({}) {{", self.parameter_list(ctx, &required)?));
    let arguments = all
      .iter()
      .map(|parameter| {
        if required.contains(parameter) {
          ctx.parameter_name(*parameter)
        } else {
          "null".to_string()
        }
      })
      .join(", ");
    out.line(delegate.replace("{arguments}", &arguments));
    out.close("}");
    Ok(())
  }

  fn write_constructor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, kind: MethodKind) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let class_name = ctx.conventions.type_name(ctx.name(owner));
    let adapter = ctx
      .parameter_of_kind(id, ParameterKind::RequestAdapter)
      .map_or_else(|| "requestAdapter".to_string(), |parameter| ctx.parameter_name(parameter));

    if kind != MethodKind::ClientConstructor {
      self.write_overload(ctx, out, id, None, &format!("public {class_name}"), "this({arguments});")?;
    }
    let parameters = ctx.parameters(id);
    write_javadoc(ctx, out, id, &parameters);
    out.open(format!("public {class_name}({}) {{", self.parameter_list(ctx, &parameters)?));
    Self::write_null_checks(ctx, out, &parameters);
    match kind {
      MethodKind::ClientConstructor => {
        out.line("this.pathParameters = new HashMap<>();");
        out.line(format!("this.requestAdapter = {adapter};"));
        if let Some(base_url) = ctx.base_url(id) {
          out.open("if (requestAdapter.getBaseUrl() == null || requestAdapter.getBaseUrl().isEmpty()) {");
          out.line(format!("requestAdapter.setBaseUrl({});", quoted(base_url)));
          out.close("}");
        }
        out.line(format!(
          "this.pathParameters.put({}, requestAdapter.getBaseUrl());",
          quoted(BASE_URL_KEY)
        ));
        if let Some(store) = ctx.parameter_of_kind(id, ParameterKind::BackingStore) {
          out.line(format!("requestAdapter.enableBackingStore({});", ctx.parameter_name(store)));
        }
      }
      MethodKind::Constructor => {
        let path_parameters = ctx
          .parameter_of_kind(id, ParameterKind::PathParameters)
          .map_or_else(|| "pathParameters".to_string(), |parameter| ctx.parameter_name(parameter));
        out.line(format!("this.pathParameters = new HashMap<>({path_parameters});"));
        for parameter in &parameters {
          if ctx.parameter_def(*parameter).is_some_and(|def| def.kind == ParameterKind::Path) {
            let name = ctx.parameter_name(*parameter);
            out.line(format!(
              "if ({name} != null) this.pathParameters.put({}, {name});",
              quoted(&ctx.serialization_name(*parameter))
            ));
          }
        }
        out.line(format!("this.requestAdapter = {adapter};"));
      }
      _ => {
        let raw_url = ctx
          .parameter_of_kind(id, ParameterKind::RawUrl)
          .map_or_else(|| "rawUrl".to_string(), |parameter| ctx.parameter_name(parameter));
        out.line("this.pathParameters = new HashMap<>();");
        out.line(format!("this.pathParameters.put({}, {raw_url});", quoted(RAW_URL_KEY)));
        out.line(format!("this.requestAdapter = {adapter};"));
      }
    }
    out.close("}");
    Ok(())
  }

  fn write_executor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    let shape = ResponseShape::of(ctx.dom, &def.return_type);
    let (return_type, annotation) = match shape {
      ResponseShape::NoContent => ("void".to_string(), None),
      _ => (self.type_name(ctx, &def.return_type, id)?, Some(NULLABLE)),
    };
    let signature = format!("public {return_type} {name}");
    let call = if shape == ResponseShape::NoContent {
      format!("{name}({{arguments}});")
    } else {
      format!("return {name}({{arguments}});")
    };
    self.write_overload(ctx, out, id, annotation, &signature, &call)?;

    let parameters = ctx.parameters(id);
    write_javadoc(ctx, out, id, &parameters);
    write_deprecated(ctx, out, id);
    if let Some(annotation) = annotation {
      out.line(annotation);
    }
    out.open(format!("{signature}({}) {{", self.parameter_list(ctx, &parameters)?));
    let generator = ctx
      .generator_for(id)
      .map_or_else(|| "toRequestInformation".to_string(), |generator| ctx.member_name(generator));
    let arguments = parameters
      .iter()
      .map(|parameter| ctx.parameter_name(*parameter))
      .join(", ");
    out.line(format!("final RequestInformation requestInfo = {generator}({arguments});"));
    out.line(
      "final HashMap<String, ParsableFactory<? extends Parsable>> errorMapping = new HashMap<String, ParsableFactory<? extends Parsable>>();",
    );
    for (code, ty) in &def.error_mappings {
      out.line(format!("errorMapping.put({}, {});", quoted(code), self.factory(ctx, ty, id)?));
    }

    let ty = &def.return_type;
    match shape {
      ResponseShape::NoContent => out.line("this.requestAdapter.sendPrimitive(requestInfo, errorMapping, Void.class);"),
      ResponseShape::Primitive => out.line(format!(
        "return this.requestAdapter.sendPrimitive(requestInfo, errorMapping, {}.class);",
        self.element_name(ctx, ty, id)?
      )),
      ResponseShape::PrimitiveCollection => out.line(format!(
        "return this.requestAdapter.sendPrimitiveCollection(requestInfo, errorMapping, {}.class);",
        self.element_name(ctx, ty, id)?
      )),
      ResponseShape::Enum => out.line(format!(
        "return this.requestAdapter.sendEnum(requestInfo, errorMapping, {}::forValue);",
        self.element_name(ctx, ty, id)?
      )),
      ResponseShape::EnumCollection => out.line(format!(
        "return this.requestAdapter.sendEnumCollection(requestInfo, errorMapping, {}::forValue);",
        self.element_name(ctx, ty, id)?
      )),
      ResponseShape::Object => out.line(format!(
        "return this.requestAdapter.send(requestInfo, errorMapping, {});",
        self.factory(ctx, ty, id)?
      )),
      ResponseShape::ObjectCollection => out.line(format!(
        "return this.requestAdapter.sendCollection(requestInfo, errorMapping, {});",
        self.factory(ctx, ty, id)?
      )),
    }
    out.close("}");
    Ok(())
  }

  fn write_generator(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    let signature = format!("public RequestInformation {name}");
    self.write_overload(
      ctx,
      out,
      id,
      Some(NONNULL),
      &signature,
      &format!("return {name}({{arguments}});"),
    )?;

    let parameters = ctx.parameters(id);
    write_javadoc(ctx, out, id, &parameters);
    write_deprecated(ctx, out, id);
    out.line(NONNULL);
    out.open(format!("{signature}({}) {{", self.parameter_list(ctx, &parameters)?));
    Self::write_null_checks(ctx, out, &parameters);
    out.line(format!(
      "final RequestInformation requestInfo = new RequestInformation(HttpMethod.{}, urlTemplate, pathParameters);",
      ctx.http_verb(id)
    ));

    if let Some(parameter) = ctx.parameter_of_kind(id, ParameterKind::RequestConfiguration)
      && let Some(configuration) = ctx.configuration_class(id)
    {
      let name = ctx.parameter_name(parameter);
      let configuration_name = ctx.declared_name(configuration);
      out.open(format!("if ({name} != null) {{"));
      out.line(format!("final {configuration_name} requestConfig = new {configuration_name}();"));
      out.line(format!("{name}.accept(requestConfig);"));
      out.line("requestInfo.headers.putAll(requestConfig.headers);");
      out.line("requestInfo.addRequestOptions(requestConfig.options);");
      if ctx.query_parameters_class(configuration).is_some() {
        out.line("requestInfo.addQueryParameters(requestConfig.queryParameters);");
      }
      out.close("}");
    }
    if !def.accepted_response_types.is_empty() {
      out.line(format!(
        "requestInfo.headers.tryAdd(\"Accept\", {});",
        quoted(&def.accepted_response_types.join(", "))
      ));
    }
    if let Some(body) = ctx.parameter_of_kind(id, ParameterKind::RequestBody)
      && let Some(body_def) = ctx.parameter_def(body)
    {
      let name = ctx.parameter_name(body);
      let content_type = quoted(def.request_body_content_type.as_deref().unwrap_or("application/octet-stream"));
      let line = match ValueShape::of(ctx.dom, &body_def.ty) {
        ValueShape::Primitive(Primitive::Stream) => format!("requestInfo.setStreamContent({name}, {content_type});"),
        ValueShape::Primitive(_) if body_def.ty.is_collection() => {
          format!("requestInfo.setContentFromScalarCollection(requestAdapter, {content_type}, {name});")
        }
        ValueShape::Primitive(_) => format!("requestInfo.setContentFromScalar(requestAdapter, {content_type}, {name});"),
        ValueShape::Enum(_) if body_def.ty.is_collection() => {
          format!("requestInfo.setContentFromEnumCollection(requestAdapter, {content_type}, {name});")
        }
        ValueShape::Enum(_) => format!("requestInfo.setContentFromEnum(requestAdapter, {content_type}, {name});"),
        ValueShape::Object(_) | ValueShape::Untyped if body_def.ty.is_collection() => format!(
          "requestInfo.setContentFromParsable(requestAdapter, {content_type}, {name}.toArray(new {}[0]));",
          self.element_name(ctx, &body_def.ty, body)?
        ),
        ValueShape::Object(_) | ValueShape::Untyped => {
          format!("requestInfo.setContentFromParsable(requestAdapter, {content_type}, {name});")
        }
      };
      out.line(line);
    }
    out.line("return requestInfo;");
    out.close("}");
    Ok(())
  }

  fn write_factory(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let class_name = ctx.declared_name(owner);
    let node = ctx
      .parameter_of_kind(id, ParameterKind::ParseNode)
      .map_or_else(|| "parseNode".to_string(), |parameter| ctx.parameter_name(parameter));
    let parameters = ctx.parameters(id);
    write_javadoc(ctx, out, id, &parameters);
    out.line(NONNULL);
    out.open(format!(
      "public static {class_name} {}({}) {{",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?
    ));
    out.line(format!("Objects.requireNonNull({node});"));

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      self.write_composed_factory(ctx, out, &layout, &class_name, &node)?;
      out.close("}");
      return Ok(());
    }

    if let Some(info) = ctx
      .class_def(owner)
      .and_then(|def| def.discriminator.as_ref())
      .filter(|info| !info.is_empty())
    {
      out.line(format!(
        "final ParseNode mappingValueNode = {node}.getChildNode({});",
        quoted(&info.property_name)
      ));
      out.open("if (mappingValueNode != null) {");
      out.line("final String mappingValue = mappingValueNode.getStringValue();");
      out.open("switch (mappingValue) {");
      for (value, ty) in info.mappings() {
        out.line(format!(
          "case {}: return new {}();",
          quoted(value),
          self.element_name(ctx, ty, id)?
        ));
      }
      out.close("}");
      out.close("}");
    }
    out.line(format!("return new {class_name}();"));
    out.close("}");
    Ok(())
  }

  fn write_composed_factory(
    &self,
    ctx: &RenderContext<'_>,
    out: &mut CodeWriter,
    layout: &ComposedLayout,
    class_name: &str,
    node: &str,
  ) -> GenerationResult<()> {
    out.line(format!("final {class_name} result = new {class_name}();"));
    if let Some(discriminator) = layout.discriminator.as_deref().filter(|_| layout.has_mappings()) {
      out.line(format!(
        "final ParseNode mappingValueNode = {node}.getChildNode({});",
        quoted(discriminator)
      ));
      out.line("final String mappingValue = mappingValueNode == null ? null : mappingValueNode.getStringValue();");
    }
    let mut first = true;
    if layout.has_mappings() {
      for (value, member) in &layout.mapped {
        let Some(def) = ctx.property_def(*member) else {
          continue;
        };
        branch(out, &mut first, &format!("{}.equalsIgnoreCase(mappingValue)", quoted(value)));
        out.line(Self::assign_property(
          ctx,
          "result",
          *member,
          &format!("new {}()", self.element_name(ctx, &def.ty, *member)?),
        ));
        out.dedent();
      }
    }
    for member in &layout.others {
      let Some(def) = ctx.property_def(*member) else {
        continue;
      };
      let read = self.read_value(ctx, &def.ty, *member, node)?;
      branch(out, &mut first, &format!("{read} != null"));
      out.line(Self::assign_property(ctx, "result", *member, &read));
      out.dedent();
    }
    if !layout.fallback.is_empty() {
      if !first {
        out.open("} else {");
      }
      for member in &layout.fallback {
        let Some(def) = ctx.property_def(*member) else {
          continue;
        };
        out.line(Self::assign_property(
          ctx,
          "result",
          *member,
          &format!("new {}()", self.element_name(ctx, &def.ty, *member)?),
        ));
      }
      if !first {
        out.dedent();
      }
    }
    if !first {
      out.line("}");
    }
    out.line("return result;");
    Ok(())
  }

  fn write_deserializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let base = ctx.dom.class_base(owner);
    write_javadoc(ctx, out, id, &[]);
    if base.is_some() {
      out.line("@Override");
    }
    out.line(NONNULL);
    out.open(format!(
      "public Map<String, {CONSUMER_OF_PARSE_NODE}> {}() {{",
      ctx.member_name(id)
    ));

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      match layout.kind {
        ComposedKind::Union => {
          let mut first = true;
          for member in &layout.objects {
            let value = Self::read_property(ctx, *member);
            branch(out, &mut first, &format!("{value} != null"));
            out.line(format!("return {value}.getFieldDeserializers();"));
            out.dedent();
          }
          if !first {
            out.line("}");
          }
          out.line("return new HashMap<String, java.util.function.Consumer<ParseNode>>();");
        }
        ComposedKind::Intersection => {
          let members = layout
            .objects
            .iter()
            .map(|member| Self::read_property(ctx, *member))
            .join(", ");
          out.line(format!("return ParseNodeHelper.mergeDeserializersForIntersectionWrapper({members});"));
        }
      }
      out.close("}");
      return Ok(());
    }

    let properties = ctx.serialized_properties(owner);
    let capacity = if base.is_some() {
      "super.getFieldDeserializers()".to_string()
    } else {
      properties.len().to_string()
    };
    out.line(format!(
      "final HashMap<String, {CONSUMER_OF_PARSE_NODE}> deserializerMap = new HashMap<String, {CONSUMER_OF_PARSE_NODE}>({capacity});"
    ));
    for property in properties {
      let Some(def) = ctx.property_def(property) else {
        continue;
      };
      let read = self.read_value(ctx, &def.ty, property, "n")?;
      out.line(format!(
        "deserializerMap.put({}, (n) -> {{ {} }});",
        quoted(&ctx.wire_name(property)),
        Self::assign_property(ctx, "this", property, &read)
      ));
    }
    out.line("return deserializerMap;");
    out.close("}");
    Ok(())
  }

  fn write_serializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let base = ctx.dom.class_base(owner);
    let parameters = ctx.parameters(id);
    write_javadoc(ctx, out, id, &parameters);
    if base.is_some() {
      out.line("@Override");
    }
    out.open(format!(
      "public void {}({}) {{",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?
    ));
    out.line("Objects.requireNonNull(writer);");

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      let mut first = true;
      let chained = match layout.kind {
        ComposedKind::Union => ctx.properties(owner),
        ComposedKind::Intersection => layout.others.clone(),
      };
      for member in chained {
        let Some(def) = ctx.property_def(member) else {
          continue;
        };
        let value = Self::read_property(ctx, member);
        branch(out, &mut first, &format!("{value} != null"));
        out.line(Self::write_value(ctx, &def.ty, "null", &value));
        out.dedent();
      }
      if layout.kind == ComposedKind::Intersection && !layout.objects.is_empty() {
        let members = layout
          .objects
          .iter()
          .map(|member| Self::read_property(ctx, *member))
          .join(", ");
        if !first {
          out.open("} else {");
        }
        out.line(format!("writer.writeObjectValue(null, {members});"));
        if !first {
          out.dedent();
        }
      }
      if !first {
        out.line("}");
      }
      out.close("}");
      return Ok(());
    }

    if base.is_some() {
      out.line("super.serialize(writer);");
    }
    for property in ctx.serialized_properties(owner) {
      let Some(def) = ctx.property_def(property) else {
        continue;
      };
      if def.read_only {
        continue;
      }
      out.line(Self::write_value(
        ctx,
        &def.ty,
        &quoted(&ctx.wire_name(property)),
        &Self::read_property(ctx, property),
      ));
    }
    if let Some(additional) = ctx.property_of_kind(owner, PropertyKind::AdditionalData) {
      out.line(format!("writer.writeAdditionalData({});", Self::read_property(ctx, additional)));
    }
    out.close("}");
    Ok(())
  }

  fn write_accessor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, kind: MethodKind) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let Some(target) = def.target else {
      return Ok(());
    };
    let Some(property) = ctx.property_def(target) else {
      return Ok(());
    };
    let backed = ctx.owner(id).is_some_and(|owner| ctx.is_backed(owner));
    let field = ctx.member_name(target);
    let store_key = quoted(&ctx.wire_name(target));
    let parameters = ctx.parameters(id);
    write_javadoc(ctx, out, id, &parameters);
    write_deprecated(ctx, out, id);

    if kind == MethodKind::Getter {
      let return_type = self.type_name(ctx, &def.return_type, id)?;
      out.line(if def.return_type.nullable { NULLABLE } else { NONNULL });
      out.open(format!("public {return_type} {}() {{", ctx.member_name(id)));
      match property.kind {
        PropertyKind::Custom if backed => out.line(format!("return this.backingStore.get({store_key});")),
        PropertyKind::AdditionalData if backed => {
          out.line(format!("{return_type} value = this.backingStore.get({store_key});"));
          out.open("if (value == null) {");
          out.line("value = new HashMap<>();");
          out.line(format!("this.backingStore.set({store_key}, value);"));
          out.close("}");
          out.line("return value;");
        }
        _ => out.line(format!("return this.{field};")),
      }
    } else {
      out.open(format!(
        "public void {}({}) {{",
        ctx.member_name(id),
        self.parameter_list(ctx, &parameters)?
      ));
      let value = parameters
        .first()
        .map_or_else(|| "value".to_string(), |parameter| ctx.parameter_name(*parameter));
      if backed && matches!(property.kind, PropertyKind::Custom | PropertyKind::AdditionalData) {
        out.line(format!("this.backingStore.set({store_key}, {value});"));
      } else {
        out.line(format!("this.{field} = {value};"));
      }
    }
    out.close("}");
    Ok(())
  }

  fn write_with_parameters(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let return_type = self.type_name(ctx, &def.return_type, id)?;
    let parameters = ctx.parameters(id);
    write_javadoc(ctx, out, id, &parameters);
    write_deprecated(ctx, out, id);
    out.line(NONNULL);
    out.open(format!(
      "public {return_type} {}({}) {{",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?
    ));
    out.line("final HashMap<String, Object> urlTplParams = new HashMap<String, Object>(this.pathParameters);");
    for parameter in &parameters {
      let name = ctx.parameter_name(*parameter);
      out.line(format!(
        "if ({name} != null) urlTplParams.put({}, {name});",
        quoted(&ctx.serialization_name(*parameter))
      ));
    }
    out.line(format!("return new {return_type}(urlTplParams, requestAdapter);"));
    out.close("}");
    Ok(())
  }

  /// Constructor of a model that initializes its additional data and backing store.
  fn write_model_constructor(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
    let additional = ctx.property_of_kind(id, PropertyKind::AdditionalData);
    let store = ctx.property_of_kind(id, PropertyKind::BackingStore);
    if additional.is_none() && store.is_none() {
      return;
    }
    out.blank();
    out.line("/**");
    out.line(format!(
      " * Instantiates a new {{@link {}}} and sets the default values.",
      ctx.conventions.type_name(ctx.name(id))
    ));
    out.line(" */");
    out.open(format!("public {}() {{", ctx.conventions.type_name(ctx.name(id))));
    if let Some(store) = store {
      out.line(format!(
        "this.{} = BackingStoreFactorySingleton.instance.createBackingStore();",
        ctx.member_name(store)
      ));
    }
    if let Some(additional) = additional {
      out.line(Self::assign_property(ctx, "this", additional, "new HashMap<>()"));
    }
    out.close("}");
  }

  fn write_query_parameters_map(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
    out.blank();
    out.line("/**");
    out.line(" * Extracts the query parameters into a map for the URI template parsing.");
    out.line(" */");
    out.line("@Override");
    out.line(NONNULL);
    out.open("public Map<String, Object> toQueryParameters() {");
    out.line("final Map<String, Object> allQueryParams = new HashMap<>();");
    for property in ctx.properties(id) {
      out.line(format!(
        "allQueryParams.put({}, {});",
        quoted(&ctx.wire_name(property)),
        ctx.member_name(property)
      ));
    }
    out.line("return allQueryParams;");
    out.close("}");
  }

  fn write_enum_members(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
    let name = ctx.conventions.type_name(ctx.name(id));
    out.line("public final String value;");
    out.open(format!("{name}(final String value) {{"));
    out.line("this.value = value;");
    out.close("}");
    out.line(NONNULL);
    out.open("public String getValue() {");
    out.line("return this.value;");
    out.close("}");
    out.line(NULLABLE);
    out.open(format!("public static {name} forValue({NONNULL} final String searchValue) {{"));
    out.line("Objects.requireNonNull(searchValue);");
    out.open("switch(searchValue) {");
    for constant in ctx.dom.children_of_kind(id, ElementTag::Constant) {
      if let Some(def) = ctx.dom.element(constant).as_constant() {
        out.line(format!("case {}: return {};", quoted(&def.value), ctx.member_name(constant)));
      }
    }
    out.line("default: return null;");
    out.close("}");
    out.close("}");
  }
}

impl LanguageRenderer for JavaRenderer {
  fn primitive_name(&self, primitive: Primitive) -> Option<&'static str> {
    Some(match primitive {
      Primitive::String => "String",
      Primitive::Boolean => "Boolean",
      Primitive::Int8 => "Byte",
      Primitive::Int32 => "Integer",
      Primitive::Int64 => "Long",
      Primitive::Float32 => "Float",
      Primitive::Float64 => "Double",
      Primitive::Decimal => "BigDecimal",
      Primitive::DateTime => "OffsetDateTime",
      Primitive::Date => "LocalDate",
      Primitive::Time => "LocalTime",
      Primitive::Duration => "PeriodAndDuration",
      Primitive::Guid => "UUID",
      Primitive::Binary => "byte[]",
      Primitive::Stream => "InputStream",
      Primitive::Void => "void",
      Primitive::UntypedNode => "UntypedNode",
    })
  }

  fn abstraction_name(&self, abstraction: Abstraction) -> &'static str {
    match abstraction {
      Abstraction::RequestAdapter => "RequestAdapter",
      Abstraction::RequestInformation => "RequestInformation",
      Abstraction::RequestOption => "RequestOption",
      Abstraction::RequestHeaders => "RequestHeaders",
      Abstraction::ParseNode => "ParseNode",
      Abstraction::SerializationWriter => "SerializationWriter",
      Abstraction::BackingStore => "BackingStore",
      Abstraction::BackingStoreFactory => "BackingStoreFactory",
      Abstraction::PathParameters => "HashMap<String, Object>",
      Abstraction::AdditionalData => "Map<String, Object>",
      Abstraction::ErrorMappings => "HashMap<String, ParsableFactory<? extends Parsable>>",
      Abstraction::ApiException => "ApiException",
    }
  }

  fn decorate(&self, base: String, ty: &CodeType) -> String {
    if ty.is_collection() {
      format!("java.util.List<{base}>")
    } else {
      base
    }
  }

  fn write_prologue(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    out.line(format!("// {GENERATED_BANNER}"));
    let own_package = package(ctx.namespace_name(ctx.declaration));
    out.line(format!("package {own_package};"));
    out.blank();

    let mut imports = BTreeSet::from(["java.util.HashMap", "java.util.Map", "java.util.Objects"]);
    match ctx.dom.element(ctx.declaration).class_kind() {
      Some(ClassKind::Enum) => {
        imports.insert("com.microsoft.kiota.serialization.ValuedEnum");
      }
      Some(ClassKind::RequestBuilder) => {
        imports.extend([
          "com.microsoft.kiota.HttpMethod",
          "com.microsoft.kiota.QueryParameter",
          "com.microsoft.kiota.QueryParameters",
          "com.microsoft.kiota.RequestAdapter",
          "com.microsoft.kiota.RequestInformation",
          "com.microsoft.kiota.RequestOption",
          "com.microsoft.kiota.serialization.Parsable",
          "com.microsoft.kiota.serialization.ParsableFactory",
        ]);
      }
      Some(ClassKind::ComposedType(_)) => {
        imports.extend([
          "com.microsoft.kiota.serialization.ComposedTypeWrapper",
          "com.microsoft.kiota.serialization.Parsable",
          "com.microsoft.kiota.serialization.ParseNode",
          "com.microsoft.kiota.serialization.ParseNodeHelper",
          "com.microsoft.kiota.serialization.SerializationWriter",
        ]);
      }
      _ => {
        imports.extend([
          "com.microsoft.kiota.serialization.AdditionalDataHolder",
          "com.microsoft.kiota.serialization.Parsable",
          "com.microsoft.kiota.serialization.ParseNode",
          "com.microsoft.kiota.serialization.SerializationWriter",
        ]);
        if ctx.is_backed(ctx.declaration) {
          imports.extend([
            "com.microsoft.kiota.store.BackedModel",
            "com.microsoft.kiota.store.BackingStoreFactorySingleton",
          ]);
        }
      }
    }
    let (declarations, abstractions) = ctx.usings();
    let mut owned = BTreeSet::new();
    for declaration in declarations {
      let target = package(ctx.namespace_name(declaration));
      if target != own_package {
        owned.insert(format!("{target}.{}", ctx.conventions.type_name(ctx.name(declaration))));
      }
    }
    imports.extend(abstractions.into_iter().map(abstraction_import));
    imports.extend(ctx.primitives_used().into_iter().filter_map(primitive_import));

    let mut all = imports.into_iter().map(ToString::to_string).collect::<BTreeSet<_>>();
    all.extend(owned);
    for import in all {
      out.line(format!("import {import};"));
    }
    out.blank();
    Ok(())
  }

  fn write_type_start(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    out.blank();
    write_javadoc(ctx, out, id, &[]);
    write_deprecated(ctx, out, id);
    out.line("@jakarta.annotation.Generated(\"com.microsoft.kiota\")");
    let name = ctx.conventions.type_name(ctx.name(id));
    let nested = ctx.owner(id).is_some();
    let modifiers = if nested { "public static" } else { "public" };

    match &ctx.dom.element(id).kind {
      ElementKind::Interface(def) => {
        let mut extends = def
          .extends
          .iter()
          .map(|parent| self.definition_name(ctx, *parent))
          .collect::<Vec<_>>();
        extends.push("Parsable".to_string());
        out.open(format!("public interface {name} extends {} {{", extends.join(", ")));
      }
      ElementKind::Class(def) => {
        let mut extends = None;
        let mut implements = vec![];
        match def.kind {
          ClassKind::Enum => {
            out.open(format!("public enum {name} implements ValuedEnum {{"));
            return Ok(());
          }
          ClassKind::Model => {
            if let Some(base) = def.base_class {
              extends = Some(self.definition_name(ctx, base));
            } else if def.is_error {
              extends = Some("ApiException".to_string());
            }
            if ctx.property_of_kind(id, PropertyKind::AdditionalData).is_some() {
              implements.push("AdditionalDataHolder".to_string());
            }
            if ctx.property_of_kind(id, PropertyKind::BackingStore).is_some() {
              implements.push("BackedModel".to_string());
            }
            if def.base_class.is_none() {
              implements.push("Parsable".to_string());
            }
          }
          ClassKind::ComposedType(_) => {
            implements.push("ComposedTypeWrapper".to_string());
            implements.push("Parsable".to_string());
          }
          ClassKind::QueryParameters => implements.push("QueryParameters".to_string()),
          ClassKind::RequestBuilder | ClassKind::RequestConfiguration => {}
        }
        implements.extend(def.implements.iter().map(|interface| self.definition_name(ctx, *interface)));
        let mut header = format!("{modifiers} class {name}");
        if let Some(extends) = extends {
          header.push_str(&format!(" extends {extends}"));
        }
        if !implements.is_empty() {
          header.push_str(&format!(" implements {}", implements.join(", ")));
        }
        out.open(format!("{header} {{"));
      }
      _ => {}
    }
    Ok(())
  }

  fn write_members_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    match ctx.dom.element(id).class_kind() {
      Some(ClassKind::Model) => Self::write_model_constructor(ctx, out, id),
      Some(ClassKind::QueryParameters) => Self::write_query_parameters_map(ctx, out, id),
      _ => {}
    }
    Ok(())
  }

  fn write_block_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId) -> GenerationResult<()> {
    if ctx.is_enum(owner) {
      Self::write_enum_members(ctx, out, owner);
    }
    out.close("}");
    Ok(())
  }

  fn write_property(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.property_def(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    let ty = self.type_name(ctx, &def.ty, id)?;
    let backed = ctx.owner(id).is_some_and(|owner| ctx.is_backed(owner));

    match def.kind {
      PropertyKind::Custom | PropertyKind::AdditionalData if backed => {}
      PropertyKind::Custom | PropertyKind::AdditionalData | PropertyKind::BackingStore => {
        write_javadoc(ctx, out, id, &[]);
        out.line(format!("private {ty} {name};"));
      }
      PropertyKind::QueryParameter => {
        write_javadoc(ctx, out, id, &[]);
        write_deprecated(ctx, out, id);
        let wire = ctx.wire_name(id);
        if wire != ctx.name(id) {
          out.line(format!("@QueryParameter(name = {})", quoted(&wire)));
        }
        out.line(NULLABLE);
        out.line(format!("public {ty} {name};"));
      }
      PropertyKind::RequestBuilder => {
        write_javadoc(ctx, out, id, &[]);
        write_deprecated(ctx, out, id);
        out.line(NONNULL);
        out.open(format!("public {ty} {name}() {{"));
        out.line(format!("return new {ty}(pathParameters, requestAdapter);"));
        out.close("}");
      }
      PropertyKind::UrlTemplate => {
        let template = def.default_value.as_deref().unwrap_or_default();
        out.line(format!("{} final {ty} {name} = {};", access(def.access), quoted(template)));
      }
      PropertyKind::RequestAdapter | PropertyKind::PathParameters => {
        write_javadoc(ctx, out, id, &[]);
        out.line(format!("{} final {ty} {name};", access(def.access)));
      }
      PropertyKind::Headers => {
        write_javadoc(ctx, out, id, &[]);
        out.line(format!("public {ty} {name} = new {ty}();"));
      }
      PropertyKind::Options => {
        write_javadoc(ctx, out, id, &[]);
        out.line(format!("public {ty} {name} = new java.util.ArrayList<>();"));
      }
      PropertyKind::QueryParameters => {
        write_javadoc(ctx, out, id, &[]);
        out.line(NULLABLE);
        out.line(format!("public {ty} {name} = new {ty}();"));
      }
    }
    Ok(())
  }

  fn write_method(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    out.blank();
    match def.kind {
      kind @ (MethodKind::ClientConstructor | MethodKind::Constructor | MethodKind::RawUrlConstructor) => {
        self.write_constructor(ctx, out, id, kind)
      }
      MethodKind::RawUrlBuilder => {
        let return_type = self.type_name(ctx, &def.return_type, id)?;
        let parameters = ctx.parameters(id);
        write_javadoc(ctx, out, id, &parameters);
        write_deprecated(ctx, out, id);
        out.line(NONNULL);
        out.open(format!(
          "public {return_type} {}({}) {{",
          ctx.member_name(id),
          self.parameter_list(ctx, &parameters)?
        ));
        Self::write_null_checks(ctx, out, &parameters);
        let raw_url = ctx
          .parameter_of_kind(id, ParameterKind::RawUrl)
          .map_or_else(|| "rawUrl".to_string(), |parameter| ctx.parameter_name(parameter));
        out.line(format!("return new {return_type}({raw_url}, requestAdapter);"));
        out.close("}");
        Ok(())
      }
      MethodKind::RequestExecutor => self.write_executor(ctx, out, id),
      MethodKind::RequestGenerator => self.write_generator(ctx, out, id),
      MethodKind::RequestBuilderWithParameters => self.write_with_parameters(ctx, out, id),
      MethodKind::Factory => self.write_factory(ctx, out, id),
      MethodKind::Deserializer => self.write_deserializer(ctx, out, id),
      MethodKind::Serializer => self.write_serializer(ctx, out, id),
      kind @ (MethodKind::Getter | MethodKind::Setter) => self.write_accessor(ctx, out, id, kind),
      MethodKind::Custom => {
        let return_type = self.type_name(ctx, &def.return_type, id)?;
        let parameters = ctx.parameters(id);
        write_javadoc(ctx, out, id, &parameters);
        out.open(format!(
          "{} {return_type} {}({}) {{",
          access(def.access),
          ctx.member_name(id),
          self.parameter_list(ctx, &parameters)?
        ));
        out.line("throw new UnsupportedOperationException();");
        out.close("}");
        Ok(())
      }
    }
  }

  fn write_indexer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.dom.element(id).as_indexer() else {
      return Ok(());
    };
    let return_type = self.type_name(ctx, &def.return_type, id)?;
    let Some(parameter) = ctx.parameters(id).first().copied() else {
      return Ok(());
    };
    let Some(parameter_def) = ctx.parameter_def(parameter) else {
      return Ok(());
    };
    let name = ctx.parameter_name(parameter);
    let ty = self.type_name(ctx, &parameter_def.ty.non_null(), parameter)?;

    out.blank();
    out.line("/**");
    out.line(format!(
      " * Gets an item from the {}.{} collection",
      package(ctx.root_namespace),
      def.path_segment
    ));
    if let Some(text) = ctx.documentation(parameter) {
      out.line(format!(" * @param {name} {}", doc_lines(text).join(" ")));
    }
    out.line(" */");
    write_deprecated(ctx, out, id);
    out.line(NONNULL);
    out.open(format!(
      "public {return_type} {}({NONNULL} final {ty} {name}) {{",
      ctx.indexer_method_name(id)
    ));
    out.line(format!("Objects.requireNonNull({name});"));
    out.line("final HashMap<String, Object> urlTplParams = new HashMap<String, Object>(this.pathParameters);");
    out.line(format!(
      "urlTplParams.put({}, {name});",
      quoted(&ctx.serialization_name(parameter))
    ));
    out.line(format!("return new {return_type}(urlTplParams, requestAdapter);"));
    out.close("}");
    Ok(())
  }

  fn write_constant(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.dom.element(id).as_constant() else {
      return Ok(());
    };
    let is_last = ctx
      .owner(id)
      .and_then(|owner| ctx.dom.children_of_kind(owner, ElementTag::Constant).last())
      .is_none_or(|last| last == id);
    let separator = if is_last { ";" } else { "," };
    out.line(format!("{}({}){separator}", ctx.member_name(id), quoted(&def.value)));
    Ok(())
  }
}
