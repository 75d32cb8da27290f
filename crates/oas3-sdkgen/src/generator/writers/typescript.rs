use std::collections::BTreeSet;

use itertools::Itertools;

use super::{
  BASE_URL_KEY, CodeWriter, ComposedLayout, GENERATED_BANNER, LanguageRenderer, RAW_URL_KEY, RenderContext, ResponseShape,
  ValueShape, doc_lines, element_type, quoted,
};
use crate::generator::{
  codedom::{
    Abstraction, ClassKind, CodeType, ElementId, ElementTag, MethodKind, ParameterKind, Primitive,
    PropertyKind, TypeRef,
  },
  errors::GenerationResult,
};

const ABSTRACTIONS_MODULE: &str = "@microsoft/kiota-abstractions";
const DESERIALIZERS: &str = "Record<string, (node: ParseNode) => void>";

pub(crate) struct TypeScriptRenderer;

fn write_jsdoc(out: &mut CodeWriter, text: Option<&str>, deprecated: bool) {
  let lines = text.map(doc_lines).unwrap_or_default();
  if lines.is_empty() && !deprecated {
    return;
  }
  out.line("/**");
  for line in lines {
    out.line(format!(" * {}", line.replace("*/", "*\\/")));
  }
  if deprecated {
    out.line(" * @deprecated");
  }
  out.line(" */");
}

fn jsdoc(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
  write_jsdoc(out, ctx.documentation(id), ctx.is_deprecated(id));
}

/// Names a runtime abstraction is imported under, when it is not a structural type.
fn abstraction_imports(abstraction: Abstraction) -> &'static [&'static str] {
  match abstraction {
    Abstraction::RequestAdapter => &["type RequestAdapter"],
    Abstraction::RequestInformation => &["RequestInformation"],
    Abstraction::RequestOption => &["type RequestOption"],
    Abstraction::ParseNode => &["type ParseNode"],
    Abstraction::SerializationWriter => &["type SerializationWriter"],
    Abstraction::BackingStore => &["type BackingStore"],
    Abstraction::BackingStoreFactory => &["type BackingStoreFactory"],
    Abstraction::ErrorMappings => &["type Parsable", "type ParsableFactory"],
    Abstraction::ApiException => &["ApiError"],
    Abstraction::RequestHeaders | Abstraction::PathParameters | Abstraction::AdditionalData => &[],
  }
}

/// Parse node accessor stem; every JSON number is a `number`.
fn value_stem(primitive: Primitive) -> &'static str {
  match primitive {
    Primitive::String | Primitive::Binary => "StringValue",
    Primitive::Boolean => "BooleanValue",
    Primitive::Int8
    | Primitive::Int32
    | Primitive::Int64
    | Primitive::Float32
    | Primitive::Float64
    | Primitive::Decimal => "NumberValue",
    Primitive::DateTime => "DateValue",
    Primitive::Date => "DateOnlyValue",
    Primitive::Time => "TimeOnlyValue",
    Primitive::Duration => "DurationValue",
    Primitive::Guid => "GuidValue",
    Primitive::Stream => "ByteArrayValue",
    Primitive::Void | Primitive::UntypedNode => "ObjectValue",
  }
}

/// `typeof` result of a scalar, used to probe composed values.
fn type_of(primitive: Primitive) -> Option<&'static str> {
  match primitive {
    Primitive::String | Primitive::Binary => Some("string"),
    Primitive::Boolean => Some("boolean"),
    Primitive::Int8 | Primitive::Int32 | Primitive::Int64 | Primitive::Float32 | Primitive::Float64 => Some("number"),
    _ => None,
  }
}

impl TypeScriptRenderer {
  fn element_name(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    self.type_name(ctx, &element_type(ty), id)
  }

  fn factory_name(ctx: &RenderContext<'_>, ty: &CodeType) -> String {
    match ty.reference {
      TypeRef::Definition(id) => format!("create{}FromDiscriminatorValue", ctx.declared_name(id)),
      _ => "createUntypedNodeFromDiscriminatorValue".to_string(),
    }
  }

  fn serializer_name(ctx: &RenderContext<'_>, ty: &CodeType) -> String {
    match ty.reference {
      TypeRef::Definition(id) => format!("serialize{}", ctx.declared_name(id)),
      _ => "serializeUntypedNode".to_string(),
    }
  }

  fn deserializer_name(ctx: &RenderContext<'_>, id: ElementId) -> String {
    format!("deserializeInto{}", ctx.declared_name(id))
  }

  fn enum_object(ctx: &RenderContext<'_>, id: ElementId) -> String {
    format!("{}Object", ctx.declared_name(id))
  }

  fn mapper_name(ctx: &RenderContext<'_>, query: ElementId) -> String {
    format!("{}Mapper", ctx.conventions.member_name(ctx.name(query)))
  }

  /// ES module path of `target` relative to the file being written.
  fn module_path(ctx: &RenderContext<'_>, target: ElementId) -> String {
    let directories = |id| {
      ctx
        .relative_namespace(id)
        .into_iter()
        .map(|segment| ctx.conventions.directory_name(segment))
        .collect::<Vec<_>>()
    };
    let from = directories(ctx.declaration);
    let to = directories(target);
    let common = from.iter().zip(&to).take_while(|(left, right)| left == right).count();

    let mut parts = vec![];
    if from.len() == common {
      parts.push(".".to_string());
    } else {
      parts.extend(std::iter::repeat_n("..".to_string(), from.len() - common));
    }
    parts.extend(to[common..].iter().cloned());
    parts.push(ctx.conventions.file_casing.apply(ctx.name(target)));
    format!("{}.js", parts.join("/"))
  }

  /// Symbols a file imports from the module of `target`.
  fn declaration_symbols(ctx: &RenderContext<'_>, target: ElementId) -> Vec<String> {
    let name = ctx.declared_name(target);
    match ctx.dom.element(target).class_kind() {
      Some(ClassKind::Model | ClassKind::ComposedType(_)) => vec![
        format!("create{name}FromDiscriminatorValue"),
        format!("deserializeInto{name}"),
        format!("serialize{name}"),
        format!("type {name}"),
      ],
      Some(ClassKind::Enum) => vec![format!("{name}Object"), format!("type {name}")],
      Some(_) => vec![name],
      None => vec![format!("type {name}")],
    }
  }

  fn read_value(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    let shape = ValueShape::of(ctx.dom, ty);
    Ok(match (shape, ty.is_collection()) {
      (ValueShape::Primitive(primitive), false) => format!("n.get{}()", value_stem(primitive)),
      (ValueShape::Primitive(_), true) => {
        format!("n.getCollectionOfPrimitiveValues<{}>()", self.element_name(ctx, ty, id)?)
      }
      (ValueShape::Enum(target), false) => format!(
        "n.getEnumValue<{}>({})",
        self.element_name(ctx, ty, id)?,
        Self::enum_object(ctx, target)
      ),
      (ValueShape::Enum(target), true) => format!(
        "n.getCollectionOfEnumValues<{}>({})",
        self.element_name(ctx, ty, id)?,
        Self::enum_object(ctx, target)
      ),
      (ValueShape::Object(_) | ValueShape::Untyped, false) => format!(
        "n.getObjectValue<{}>({})",
        self.element_name(ctx, ty, id)?,
        Self::factory_name(ctx, ty)
      ),
      (ValueShape::Object(_) | ValueShape::Untyped, true) => format!(
        "n.getCollectionOfObjectValues<{}>({})",
        self.element_name(ctx, ty, id)?,
        Self::factory_name(ctx, ty)
      ),
    })
  }

  fn write_value(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId, key: &str, value: &str) -> GenerationResult<String> {
    let shape = ValueShape::of(ctx.dom, ty);
    Ok(match (shape, ty.is_collection()) {
      (ValueShape::Primitive(primitive), false) => format!("writer.write{}({key}, {value});", value_stem(primitive)),
      (ValueShape::Primitive(_), true) => format!(
        "writer.writeCollectionOfPrimitiveValues<{}>({key}, {value});",
        self.element_name(ctx, ty, id)?
      ),
      (ValueShape::Enum(_), false) => {
        format!("writer.writeEnumValue<{}>({key}, {value});", self.element_name(ctx, ty, id)?)
      }
      (ValueShape::Enum(_), true) => format!(
        "writer.writeEnumValue<{}>({key}, ...({value} ?? []));",
        self.element_name(ctx, ty, id)?
      ),
      (ValueShape::Object(_) | ValueShape::Untyped, false) => format!(
        "writer.writeObjectValue<{}>({key}, {value}, {});",
        self.element_name(ctx, ty, id)?,
        Self::serializer_name(ctx, ty)
      ),
      (ValueShape::Object(_) | ValueShape::Untyped, true) => format!(
        "writer.writeCollectionOfObjectValues<{}>({key}, {value}, {});",
        self.element_name(ctx, ty, id)?,
        Self::serializer_name(ctx, ty)
      ),
    })
  }

  fn parameter_list(&self, ctx: &RenderContext<'_>, parameters: &[ElementId]) -> GenerationResult<String> {
    let mut rendered = vec![];
    for parameter in parameters {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      let name = ctx.parameter_name(*parameter);
      let ty = self.type_name(ctx, &def.ty.non_null(), *parameter)?;
      if def.optional || def.ty.nullable {
        rendered.push(format!("{name}?: {ty} | undefined"));
      } else {
        rendered.push(format!("{name}: {ty}"));
      }
    }
    Ok(rendered.join(", "))
  }

  fn write_method_docs(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
    let parameters = ctx
      .parameters(id)
      .into_iter()
      .filter_map(|parameter| ctx.documentation(parameter).map(|text| (parameter, text)))
      .collect::<Vec<_>>();
    let summary = ctx.documentation(id).map(doc_lines).unwrap_or_default();
    if summary.is_empty() && parameters.is_empty() && !ctx.is_deprecated(id) {
      return;
    }
    out.line("/**");
    for line in summary {
      out.line(format!(" * {}", line.replace("*/", "*\\/")));
    }
    for (parameter, text) in parameters {
      out.line(format!(
        " * @param {} {}",
        ctx.parameter_name(parameter),
        doc_lines(text).join(" ").replace("*/", "*\\/")
      ));
    }
    if ctx.is_deprecated(id) {
      out.line(" * @deprecated");
    }
    out.line(" */");
  }

  fn write_constructor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, kind: MethodKind) -> GenerationResult<()> {
    let adapter = ctx
      .parameter_of_kind(id, ParameterKind::RequestAdapter)
      .map_or_else(|| "requestAdapter".to_string(), |parameter| ctx.parameter_name(parameter));
    Self::write_method_docs(ctx, out, id);

    if kind == MethodKind::ClientConstructor {
      out.open(format!(
        "public constructor({}) {{",
        self.parameter_list(ctx, &ctx.parameters(id))?
      ));
      out.line(format!("this.requestAdapter = {adapter};"));
      if let Some(base_url) = ctx.base_url(id) {
        out.open(format!("if (!{adapter}.baseUrl) {{"));
        out.line(format!("{adapter}.baseUrl = {};", quoted(base_url)));
        out.close("}");
      }
      out.line(format!(
        "this.pathParameters = {{ {}: {adapter}.baseUrl }};",
        quoted(BASE_URL_KEY)
      ));
      if let Some(store) = ctx.parameter_of_kind(id, ParameterKind::BackingStore) {
        out.line(format!("{adapter}.enableBackingStore({});", ctx.parameter_name(store)));
      }
      out.close("}");
      return Ok(());
    }

    // One constructor takes either the path parameters or a raw URL; optional path
    // parameters trail the adapter.
    let path_parameters = ctx
      .parameter_of_kind(id, ParameterKind::PathParameters)
      .map_or_else(|| "pathParameters".to_string(), |parameter| ctx.parameter_name(parameter));
    let placeholders = ctx
      .parameters(id)
      .into_iter()
      .filter(|parameter| ctx.parameter_def(*parameter).is_some_and(|def| def.kind == ParameterKind::Path))
      .collect::<Vec<_>>();
    let mut signature = vec![
      format!("{path_parameters}: Record<string, unknown> | string"),
      format!("{adapter}: RequestAdapter"),
    ];
    for parameter in &placeholders {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      signature.push(format!(
        "{}?: {} | undefined",
        ctx.parameter_name(*parameter),
        self.type_name(ctx, &def.ty.non_null(), *parameter)?
      ));
    }
    out.open(format!("public constructor({}) {{", signature.join(", ")));
    out.line(format!("this.requestAdapter = {adapter};"));
    out.open(format!("if (typeof {path_parameters} === \"string\") {{"));
    out.line(format!("this.pathParameters = {{ {}: {path_parameters} }};", quoted(RAW_URL_KEY)));
    out.dedent();
    out.open("} else {");
    out.line(format!("this.pathParameters = {{ ...{path_parameters} }};"));
    for parameter in &placeholders {
      let name = ctx.parameter_name(*parameter);
      out.line(format!(
        "if ({name} !== undefined) this.pathParameters[{}] = {name};",
        quoted(&ctx.serialization_name(*parameter))
      ));
    }
    out.close("}");
    out.close("}");
    Ok(())
  }

  fn write_executor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let shape = ResponseShape::of(ctx.dom, &def.return_type);
    let return_type = match shape {
      ResponseShape::NoContent => "Promise<void>".to_string(),
      _ => format!("Promise<{} | undefined>", self.type_name(ctx, &def.return_type.non_null(), id)?),
    };
    let parameters = ctx.parameters(id);
    Self::write_method_docs(ctx, out, id);
    out.open(format!(
      "public async {}({}): {return_type} {{",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?
    ));
    let generator = ctx
      .generator_for(id)
      .map_or_else(|| "toRequestInformation".to_string(), |generator| ctx.member_name(generator));
    let arguments = parameters
      .iter()
      .map(|parameter| ctx.parameter_name(*parameter))
      .join(", ");
    out.line(format!("const requestInfo = this.{generator}({arguments});"));
    let error_mapping = if def.error_mappings.is_empty() {
      "undefined"
    } else {
      out.open("const errorMapping = {");
      for (code, ty) in &def.error_mappings {
        out.line(format!(
          "{}: {} as ParsableFactory<Parsable>,",
          quoted(code),
          Self::factory_name(ctx, ty)
        ));
      }
      out.close("} as Record<string, ParsableFactory<Parsable>>;");
      "errorMapping"
    };

    let ty = &def.return_type;
    let call = match shape {
      ResponseShape::NoContent => format!("sendNoResponseContent(requestInfo, {error_mapping})"),
      ResponseShape::Primitive | ResponseShape::PrimitiveCollection => {
        let element = self.element_name(ctx, ty, id)?;
        let response_type = match ty.as_primitive() {
          Some(Primitive::Stream) => "ArrayBuffer".to_string(),
          _ => element.clone(),
        };
        let method = if shape == ResponseShape::Primitive {
          "sendPrimitive"
        } else {
          "sendCollectionOfPrimitive"
        };
        format!("{method}<{element}>(requestInfo, {}, {error_mapping})", quoted(&response_type))
      }
      ResponseShape::Enum | ResponseShape::EnumCollection => {
        let method = if shape == ResponseShape::Enum {
          "sendEnum"
        } else {
          "sendCollectionOfEnum"
        };
        let target = ty.definition_id().map(|target| Self::enum_object(ctx, target)).unwrap_or_default();
        format!(
          "{method}<{}>(requestInfo, {target}, {error_mapping})",
          self.element_name(ctx, ty, id)?
        )
      }
      ResponseShape::Object | ResponseShape::ObjectCollection => {
        let method = if shape == ResponseShape::Object { "send" } else { "sendCollection" };
        format!(
          "{method}<{}>(requestInfo, {}, {error_mapping})",
          self.element_name(ctx, ty, id)?,
          Self::factory_name(ctx, ty)
        )
      }
    };
    out.line(format!("return this.requestAdapter.{call};"));
    out.close("}");
    Ok(())
  }

  fn write_generator(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let parameters = ctx.parameters(id);
    Self::write_method_docs(ctx, out, id);
    out.open(format!(
      "public {}({}): RequestInformation {{",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?
    ));
    out.line(format!(
      "const requestInfo = new RequestInformation(HttpMethod.{}, this.urlTemplate, this.pathParameters);",
      ctx.http_verb(id)
    ));
    if let Some(parameter) = ctx.parameter_of_kind(id, ParameterKind::RequestConfiguration) {
      let name = ctx.parameter_name(parameter);
      out.open(format!("if ({name}) {{"));
      out.line(format!("requestInfo.headers.addAllRaw({name}.headers ?? {{}});"));
      out.line(format!("requestInfo.addRequestOptions({name}.options);"));
      if let Some(query) = ctx.configuration_class(id).and_then(|class| ctx.query_parameters_class(class)) {
        out.line(format!(
          "requestInfo.setQueryStringParametersFromRawObject({name}.queryParameters, {});",
          Self::mapper_name(ctx, query)
        ));
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
        ValueShape::Primitive(_) | ValueShape::Enum(_) => {
          format!("requestInfo.setContentFromScalar(this.requestAdapter, {content_type}, {name});")
        }
        ValueShape::Object(_) | ValueShape::Untyped => format!(
          "requestInfo.setContentFromParsable(this.requestAdapter, {content_type}, {name}, {});",
          Self::serializer_name(ctx, &body_def.ty)
        ),
      };
      out.line(line);
    }
    out.line("return requestInfo;");
    out.close("}");
    Ok(())
  }

  fn write_path_builder(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, return_type: &CodeType) -> GenerationResult<()> {
    let return_type = self.type_name(ctx, &return_type.non_null(), id)?;
    let parameters = ctx.parameters(id);
    out.line("const urlTplParams: Record<string, unknown> = { ...this.pathParameters };");
    for parameter in &parameters {
      let name = ctx.parameter_name(*parameter);
      let optional = ctx.parameter_def(*parameter).is_some_and(|def| def.optional || def.ty.nullable);
      let assignment = format!("urlTplParams[{}] = {name};", quoted(&ctx.serialization_name(*parameter)));
      if optional {
        out.line(format!("if ({name} !== undefined) {assignment}"));
      } else {
        out.line(assignment);
      }
    }
    out.line(format!("return new {return_type}(urlTplParams, this.requestAdapter);"));
    Ok(())
  }

  fn write_factory(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId, id: ElementId) -> GenerationResult<()> {
    let name = ctx.declared_name(owner);
    let node = ctx
      .parameter_of_kind(id, ParameterKind::ParseNode)
      .map_or_else(|| "parseNode".to_string(), |parameter| ctx.parameter_name(parameter));
    out.blank();
    Self::write_method_docs(ctx, out, id);
    out.open(format!(
      "export function create{name}FromDiscriminatorValue({node}: ParseNode | undefined): ((instance?: Parsable) => {DESERIALIZERS}) {{"
    ));
    out.line(format!("if (!{node}) throw new Error(\"{node} cannot be undefined\");"));

    let mut branches = vec![];
    let mut property = None;
    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      if layout.has_mappings() {
        property = layout.discriminator.clone();
        for (value, member) in &layout.mapped {
          if let Some(target) = ctx.property_def(*member).and_then(|def| def.ty.definition_id()) {
            branches.push((value.clone(), target));
          }
        }
      }
    } else if let Some(info) = ctx
      .class_def(owner)
      .and_then(|def| def.discriminator.as_ref())
      .filter(|info| !info.is_empty())
    {
      property = Some(info.property_name.clone());
      for (value, ty) in info.mappings() {
        if let Some(target) = ty.definition_id() {
          branches.push((value.to_string(), target));
        }
      }
    }

    if let Some(property) = property {
      out.line(format!("const mappingValueNode = {node}.getChildNode({});", quoted(&property)));
      out.open("if (mappingValueNode) {");
      out.line("const mappingValue = mappingValueNode.getStringValue();");
      out.open("if (mappingValue) {");
      out.open("switch (mappingValue) {");
      for (value, target) in branches {
        out.open(format!("case {}:", quoted(&value)));
        out.line(format!("return {};", Self::deserializer_name(ctx, target)));
        out.dedent();
      }
      out.close("}");
      out.close("}");
      out.close("}");
    }
    out.line(format!("return {};", Self::deserializer_name(ctx, owner)));
    out.close("}");
    Ok(())
  }

  fn write_deserializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId, id: ElementId) -> GenerationResult<()> {
    let name = ctx.declared_name(owner);
    let value = ctx.conventions.member_name(&name);
    out.blank();
    Self::write_method_docs(ctx, out, id);
    out.open(format!(
      "export function deserializeInto{name}({value}: Partial<{name}> | undefined = {{}}): {DESERIALIZERS} {{"
    ));
    out.open("return {");
    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      for member in &layout.objects {
        if let Some(def) = ctx.property_def(*member)
          && let Some(target) = def.ty.definition_id()
        {
          out.line(format!(
            "...{}({value} as {}),",
            Self::deserializer_name(ctx, target),
            ctx.declared_name(target)
          ));
        }
      }
    } else {
      if let Some(base) = ctx.dom.class_base(owner) {
        out.line(format!("...{}({value}),", Self::deserializer_name(ctx, base)));
      }
      if ctx.property_of_kind(owner, PropertyKind::BackingStore).is_some() {
        out.line(format!("\"backingStoreEnabled\": n => {{ {value}.backingStoreEnabled = true; }},"));
      }
      for property in ctx.serialized_properties(owner) {
        let Some(def) = ctx.property_def(property) else {
          continue;
        };
        out.line(format!(
          "{}: n => {{ {value}.{} = {}; }},",
          quoted(&ctx.wire_name(property)),
          ctx.member_name(property),
          self.read_value(ctx, &def.ty, property)?
        ));
      }
    }
    out.close("};");
    out.close("}");
    Ok(())
  }

  fn write_serializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId, id: ElementId) -> GenerationResult<()> {
    let name = ctx.declared_name(owner);
    let value = ctx.conventions.member_name(&name);
    let writer = ctx
      .parameter_of_kind(id, ParameterKind::Serializer)
      .map_or_else(|| "writer".to_string(), |parameter| ctx.parameter_name(parameter));
    out.blank();
    Self::write_method_docs(ctx, out, id);
    out.open(format!(
      "export function serialize{name}({writer}: SerializationWriter, {value}: Partial<{name}> | undefined | null = {{}}): void {{"
    ));
    out.line(format!("if (!{value}) return;"));

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      let mut probed = BTreeSet::new();
      for member in &layout.others {
        let Some(def) = ctx.property_def(*member) else {
          continue;
        };
        let (check, cast) = match def.ty.as_primitive() {
          _ if def.ty.is_collection() => ("Array.isArray", None),
          Some(primitive) => match type_of(primitive) {
            Some(kind) => (kind, Some(kind)),
            None => continue,
          },
          None => continue,
        };
        if !probed.insert(check) {
          continue;
        }
        let condition = match cast {
          Some(kind) => format!("typeof {value} === {}", quoted(kind)),
          None => format!("Array.isArray({value})"),
        };
        let element = self.type_name(ctx, &def.ty.non_null(), *member)?;
        out.open(format!("if ({condition}) {{"));
        out.line(self.write_value(ctx, &def.ty, *member, "undefined", &format!("{value} as {element}"))?);
        out.line("return;");
        out.close("}");
      }
      for member in &layout.objects {
        if let Some(def) = ctx.property_def(*member)
          && let Some(target) = def.ty.definition_id()
        {
          out.line(format!(
            "{}({writer}, {value} as {});",
            Self::serializer_name(ctx, &def.ty),
            ctx.declared_name(target)
          ));
        }
      }
      out.close("}");
      return Ok(());
    }

    if let Some(base) = ctx.dom.class_base(owner) {
      out.line(format!(
        "{}({writer}, {value});",
        Self::serializer_name(ctx, &CodeType::definition(base))
      ));
    }
    for property in ctx.serialized_properties(owner) {
      let Some(def) = ctx.property_def(property) else {
        continue;
      };
      if def.read_only {
        continue;
      }
      out.line(self.write_value(
        ctx,
        &def.ty,
        property,
        &quoted(&ctx.wire_name(property)),
        &format!("{value}.{}", ctx.member_name(property)),
      )?);
    }
    if let Some(additional) = ctx.property_of_kind(owner, PropertyKind::AdditionalData) {
      out.line(format!(
        "{writer}.writeAdditionalData({value}.{});",
        ctx.member_name(additional)
      ));
    }
    out.close("}");
    Ok(())
  }

  /// Model functions live next to the interface rather than inside it.
  fn write_model_functions(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId) -> GenerationResult<()> {
    for method in ctx.dom.children_of_kind(owner, ElementTag::Method) {
      match ctx.method_def(method).map(|def| def.kind) {
        Some(MethodKind::Factory) => self.write_factory(ctx, out, owner, method)?,
        Some(MethodKind::Deserializer) => self.write_deserializer(ctx, out, owner, method)?,
        Some(MethodKind::Serializer) => self.write_serializer(ctx, out, owner, method)?,
        _ => {}
      }
    }
    Ok(())
  }

  fn is_model(ctx: &RenderContext<'_>, id: ElementId) -> bool {
    matches!(
      ctx.dom.element(id).class_kind(),
      Some(ClassKind::Model | ClassKind::ComposedType(_))
    )
  }
}

impl LanguageRenderer for TypeScriptRenderer {
  fn primitive_name(&self, primitive: Primitive) -> Option<&'static str> {
    match primitive {
      Primitive::String | Primitive::Binary => Some("string"),
      Primitive::Boolean => Some("boolean"),
      Primitive::Int8 | Primitive::Int32 | Primitive::Int64 | Primitive::Float32 | Primitive::Float64 => Some("number"),
      Primitive::Decimal => None,
      Primitive::DateTime => Some("Date"),
      Primitive::Date => Some("DateOnly"),
      Primitive::Time => Some("TimeOnly"),
      Primitive::Duration => Some("Duration"),
      Primitive::Guid => Some("Guid"),
      Primitive::Stream => Some("ArrayBuffer"),
      Primitive::Void => Some("void"),
      Primitive::UntypedNode => Some("UntypedNode"),
    }
  }

  fn abstraction_name(&self, abstraction: Abstraction) -> &'static str {
    match abstraction {
      Abstraction::RequestAdapter => "RequestAdapter",
      Abstraction::RequestInformation => "RequestInformation",
      Abstraction::RequestOption => "RequestOption",
      Abstraction::RequestHeaders => "Record<string, string | string[]>",
      Abstraction::ParseNode => "ParseNode",
      Abstraction::SerializationWriter => "SerializationWriter",
      Abstraction::BackingStore => "BackingStore",
      Abstraction::BackingStoreFactory => "BackingStoreFactory",
      Abstraction::PathParameters | Abstraction::AdditionalData => "Record<string, unknown>",
      Abstraction::ErrorMappings => "Record<string, ParsableFactory<Parsable>>",
      Abstraction::ApiException => "ApiError",
    }
  }

  fn decorate(&self, base: String, ty: &CodeType) -> String {
    if ty.is_collection() { format!("{base}[]") } else { base }
  }

  fn write_prologue(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    out.line("/* tslint:disable */");
    out.line("/* eslint-disable */");
    out.line(format!("// {GENERATED_BANNER}"));

    let mut runtime = BTreeSet::new();
    match ctx.dom.element(ctx.declaration).class_kind() {
      Some(ClassKind::Model | ClassKind::ComposedType(_)) => {
        runtime.extend(["type Parsable", "type ParseNode", "type SerializationWriter"]);
        if ctx.property_of_kind(ctx.declaration, PropertyKind::AdditionalData).is_some() {
          runtime.insert("type AdditionalDataHolder");
        }
        if ctx.property_of_kind(ctx.declaration, PropertyKind::BackingStore).is_some() {
          runtime.insert("type BackedModel");
        }
      }
      Some(ClassKind::RequestBuilder) => {
        runtime.extend(["HttpMethod", "RequestInformation", "type RequestAdapter", "type RequestOption"]);
      }
      _ => {}
    }
    let (declarations, abstractions) = ctx.usings();
    for abstraction in abstractions {
      runtime.extend(abstraction_imports(abstraction));
    }
    for primitive in ctx.primitives_used() {
      match primitive {
        Primitive::Date => {
          runtime.insert("DateOnly");
        }
        Primitive::Time => {
          runtime.insert("TimeOnly");
        }
        Primitive::Duration => {
          runtime.insert("Duration");
        }
        Primitive::UntypedNode => {
          runtime.extend(["createUntypedNodeFromDiscriminatorValue", "serializeUntypedNode", "type UntypedNode"]);
        }
        _ => {}
      }
    }

    let sort_key = |symbol: &&str| symbol.trim_start_matches("type ").to_lowercase();
    let mut imports = vec![];
    if ctx.primitives_used().contains(&Primitive::Guid) {
      imports.push(("guid-typescript".to_string(), vec!["type Guid".to_string()]));
    }
    let mut runtime = runtime.into_iter().collect::<Vec<_>>();
    runtime.sort_by_key(sort_key);
    if !runtime.is_empty() {
      imports.push((
        ABSTRACTIONS_MODULE.to_string(),
        runtime.into_iter().map(ToString::to_string).collect(),
      ));
    }
    let mut local = declarations
      .into_iter()
      .map(|target| (Self::module_path(ctx, target), Self::declaration_symbols(ctx, target)))
      .collect::<Vec<_>>();
    local.sort();
    imports.extend(local);

    for (module, symbols) in imports {
      out.line(format!("import {{ {} }} from '{module}';", symbols.join(", ")));
    }
    out.blank();
    Ok(())
  }

  fn write_type_start(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    out.blank();
    let name = ctx.declared_name(id);
    let Some(def) = ctx.class_def(id) else {
      jsdoc(ctx, out, id);
      out.open(format!("export interface {name} {{"));
      return Ok(());
    };

    match def.kind {
      ClassKind::Enum => {
        jsdoc(ctx, out, id);
        out.open(format!("export const {name}Object = {{"));
      }
      ClassKind::ComposedType(_) => {
        let mut members = vec![];
        for property in ctx.properties(id) {
          if let Some(property_def) = ctx.property_def(property) {
            let member = self.type_name(ctx, &property_def.ty.non_null(), property)?;
            if !members.contains(&member) {
              members.push(member);
            }
          }
        }
        jsdoc(ctx, out, id);
        out.line(format!("export type {name} = {};", members.join(" | ")));
      }
      ClassKind::Model => {
        let mut extends = vec![];
        if let Some(base) = def.base_class {
          extends.push(ctx.declared_name(base));
        } else if def.is_error {
          extends.push("ApiError".to_string());
        }
        if ctx.property_of_kind(id, PropertyKind::AdditionalData).is_some() {
          extends.push("AdditionalDataHolder".to_string());
        }
        if ctx.property_of_kind(id, PropertyKind::BackingStore).is_some() {
          extends.push("BackedModel".to_string());
        }
        if def.base_class.is_none() {
          extends.push("Parsable".to_string());
        }
        jsdoc(ctx, out, id);
        out.open(format!("export interface {name} extends {} {{", extends.join(", ")));
      }
      ClassKind::QueryParameters | ClassKind::RequestConfiguration => {
        jsdoc(ctx, out, id);
        out.open(format!("export interface {name} {{"));
      }
      ClassKind::RequestBuilder => {
        jsdoc(ctx, out, id);
        out.open(format!("export class {name} {{"));
      }
    }
    Ok(())
  }

  fn write_block_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId) -> GenerationResult<()> {
    match ctx.dom.element(owner).class_kind() {
      Some(ClassKind::Enum) => {
        out.close("} as const;");
        let name = ctx.declared_name(owner);
        out.line(format!("export type {name} = (typeof {name}Object)[keyof typeof {name}Object];"));
      }
      Some(ClassKind::ComposedType(_)) => self.write_model_functions(ctx, out, owner)?,
      Some(ClassKind::Model) => {
        out.close("}");
        self.write_model_functions(ctx, out, owner)?;
      }
      Some(ClassKind::QueryParameters) => {
        out.close("}");
        out.blank();
        out.line("/**");
        out.line(" * Mapper for query parameters from symbol name to serialization name represented as a constant.");
        out.line(" */");
        out.open(format!(
          "const {}: Record<string, string> = {{",
          Self::mapper_name(ctx, owner)
        ));
        for property in ctx.properties(owner) {
          out.line(format!(
            "{}: {},",
            quoted(&ctx.member_name(property)),
            quoted(&ctx.wire_name(property))
          ));
        }
        out.close("};");
      }
      _ => out.close("}"),
    }
    Ok(())
  }

  fn write_property(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.property_def(id) else {
      return Ok(());
    };
    if ctx
      .owner(id)
      .is_some_and(|owner| matches!(ctx.dom.element(owner).class_kind(), Some(ClassKind::ComposedType(_))))
    {
      return Ok(());
    }
    let name = ctx.member_name(id);
    let ty = self.type_name(ctx, &def.ty.non_null(), id)?;
    match def.kind {
      PropertyKind::Custom => {
        jsdoc(ctx, out, id);
        let nullable = if def.ty.nullable { " | null" } else { "" };
        out.line(format!("{name}?: {ty}{nullable};"));
      }
      PropertyKind::AdditionalData => {
        jsdoc(ctx, out, id);
        out.line(format!("{name}?: {ty};"));
      }
      PropertyKind::BackingStore => {
        out.line("/**");
        out.line(" * Stores model information.");
        out.line(" */");
        out.line("backingStoreEnabled?: boolean | null;");
      }
      PropertyKind::QueryParameter | PropertyKind::Headers | PropertyKind::Options | PropertyKind::QueryParameters => {
        jsdoc(ctx, out, id);
        out.line(format!("{name}?: {ty};"));
      }
      PropertyKind::RequestBuilder => {
        out.blank();
        jsdoc(ctx, out, id);
        out.open(format!("public get {name}(): {ty} {{"));
        out.line(format!("return new {ty}(this.pathParameters, this.requestAdapter);"));
        out.close("}");
      }
      PropertyKind::UrlTemplate => {
        jsdoc(ctx, out, id);
        out.line(format!(
          "private readonly {name}: {ty} = {};",
          quoted(def.default_value.as_deref().unwrap_or_default())
        ));
      }
      PropertyKind::RequestAdapter | PropertyKind::PathParameters => {
        jsdoc(ctx, out, id);
        out.line(format!("private readonly {name}: {ty};"));
      }
    }
    Ok(())
  }

  fn write_method(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    if ctx.owner(id).is_some_and(|owner| Self::is_model(ctx, owner)) {
      return Ok(());
    }
    match def.kind {
      // The path parameter constructor accepts raw URLs too.
      MethodKind::RawUrlConstructor => Ok(()),
      kind @ (MethodKind::ClientConstructor | MethodKind::Constructor) => {
        out.blank();
        self.write_constructor(ctx, out, id, kind)
      }
      MethodKind::RequestExecutor => {
        out.blank();
        self.write_executor(ctx, out, id)
      }
      MethodKind::RequestGenerator => {
        out.blank();
        self.write_generator(ctx, out, id)
      }
      MethodKind::RawUrlBuilder => {
        let return_type = self.type_name(ctx, &def.return_type.non_null(), id)?;
        let raw_url = ctx
          .parameter_of_kind(id, ParameterKind::RawUrl)
          .map_or_else(|| "rawUrl".to_string(), |parameter| ctx.parameter_name(parameter));
        out.blank();
        Self::write_method_docs(ctx, out, id);
        out.open(format!("public {}({raw_url}: string): {return_type} {{", ctx.member_name(id)));
        out.line(format!("return new {return_type}({raw_url}, this.requestAdapter);"));
        out.close("}");
        Ok(())
      }
      MethodKind::RequestBuilderWithParameters => {
        let return_type = self.type_name(ctx, &def.return_type.non_null(), id)?;
        out.blank();
        Self::write_method_docs(ctx, out, id);
        out.open(format!(
          "public {}({}): {return_type} {{",
          ctx.member_name(id),
          self.parameter_list(ctx, &ctx.parameters(id))?
        ));
        self.write_path_builder(ctx, out, id, &def.return_type)?;
        out.close("}");
        Ok(())
      }
      _ => {
        let return_type = self.type_name(ctx, &def.return_type, id)?;
        out.blank();
        Self::write_method_docs(ctx, out, id);
        out.open(format!(
          "public {}({}): {return_type} {{",
          ctx.member_name(id),
          self.parameter_list(ctx, &ctx.parameters(id))?
        ));
        out.line("throw new Error(\"Method not implemented.\");");
        out.close("}");
        Ok(())
      }
    }
  }

  fn write_indexer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.dom.element(id).as_indexer() else {
      return Ok(());
    };
    out.blank();
    Self::write_method_docs(ctx, out, id);
    out.open(format!(
      "public {}({}): {} {{",
      ctx.indexer_method_name(id),
      self.parameter_list(ctx, &ctx.parameters(id))?,
      self.type_name(ctx, &def.return_type.non_null(), id)?
    ));
    self.write_path_builder(ctx, out, id, &def.return_type)?;
    out.close("}");
    Ok(())
  }

  fn write_constant(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.dom.element(id).as_constant() else {
      return Ok(());
    };
    jsdoc(ctx, out, id);
    out.line(format!("{}: {},", ctx.conventions.type_name(ctx.name(id)), quoted(&def.value)));
    Ok(())
  }
}
