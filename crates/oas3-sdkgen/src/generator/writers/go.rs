use std::collections::BTreeMap;

use inflections::Inflect;
use itertools::Itertools;

use super::{
  BASE_URL_KEY, Casing, CodeWriter, ComposedLayout, GENERATED_BANNER, LanguageRenderer, RAW_URL_KEY, RenderContext,
  ResponseShape, ValueShape, doc_lines, quoted, render_element,
};
use crate::generator::{
  codedom::{
    Abstraction, ClassKind, CodeType, ComposedKind, ElementId, ElementKind, ElementTag, MethodKind, ParameterKind,
    Primitive, PropertyKind, TypeRef,
  },
  errors::{GenerationError, GenerationResult},
};

const ABSTRACTIONS_PATH: &str = "github.com/microsoft/kiota-abstractions-go";
const SERIALIZATION_PATH: &str = "github.com/microsoft/kiota-abstractions-go/serialization";
const STORE_PATH: &str = "github.com/microsoft/kiota-abstractions-go/store";
const DESERIALIZERS: &str = "map[string]func(s.ParseNode) error";

pub(crate) struct GoRenderer;

/// Parse node and serialization writer stem of a scalar.
fn value_stem(primitive: Primitive) -> &'static str {
  match primitive {
    Primitive::String => "StringValue",
    Primitive::Boolean => "BoolValue",
    Primitive::Int8 => "Int8Value",
    Primitive::Int32 => "Int32Value",
    Primitive::Int64 => "Int64Value",
    Primitive::Float32 => "Float32Value",
    Primitive::Float64 | Primitive::Decimal => "Float64Value",
    Primitive::DateTime => "TimeValue",
    Primitive::Date => "DateOnlyValue",
    Primitive::Time => "TimeOnlyValue",
    Primitive::Duration => "ISODurationValue",
    Primitive::Guid => "UUIDValue",
    Primitive::Binary | Primitive::Stream => "ByteArrayValue",
    Primitive::Void | Primitive::UntypedNode => "ObjectValue",
  }
}

/// Type name the request adapter and parse node expect for primitive collections.
fn primitive_tag(primitive: Primitive) -> &'static str {
  match primitive {
    Primitive::String => "string",
    Primitive::Boolean => "bool",
    Primitive::Int8 => "int8",
    Primitive::Int32 => "int32",
    Primitive::Int64 => "int64",
    Primitive::Float32 => "float32",
    Primitive::Float64 | Primitive::Decimal => "float64",
    Primitive::DateTime => "time",
    Primitive::Date => "dateonly",
    Primitive::Time => "timeonly",
    Primitive::Duration => "isoduration",
    Primitive::Guid => "uuid",
    Primitive::Binary => "base64",
    Primitive::Stream | Primitive::Void | Primitive::UntypedNode => "[]byte",
  }
}

fn write_comment(out: &mut CodeWriter, symbol: &str, text: Option<&str>, deprecated: bool) {
  let lines = text.map(doc_lines).unwrap_or_default();
  if let Some((first, rest)) = lines.split_first() {
    let mut chars = first.chars();
    let first = match chars.next() {
      Some(initial) => format!("{}{}", initial.to_lowercase(), chars.as_str()),
      None => String::new(),
    };
    out.line(format!("// {symbol} {first}"));
    for line in rest {
      out.line(format!("// {line}"));
    }
  }
  if deprecated {
    out.line("// Deprecated: ");
  }
}

/// Whether `body` refers to package `alias` as a qualifier.
fn uses_package(body: &str, alias: &str) -> bool {
  let needle = format!("{alias}.");
  body.match_indices(&needle).any(|(index, _)| {
    body[..index]
      .chars()
      .next_back()
      .is_none_or(|previous| !(previous.is_alphanumeric() || previous == '_' || previous == '.'))
  })
}

impl GoRenderer {
  /// Package name of the file holding `id`.
  fn package_name(ctx: &RenderContext<'_>, id: ElementId) -> String {
    ctx
      .relative_namespace(id)
      .last()
      .map(|segment| ctx.conventions.directory_name(segment))
      .unwrap_or_else(|| {
        ctx
          .root_namespace
          .rsplit('.')
          .next()
          .unwrap_or(ctx.root_namespace)
          .to_lowercase()
      })
  }

  fn import_path(ctx: &RenderContext<'_>, id: ElementId) -> String {
    let mut path = ctx.root_namespace.to_lowercase().replace('.', "/");
    for segment in ctx.relative_namespace(id) {
      path.push('/');
      path.push_str(&ctx.conventions.directory_name(segment));
    }
    path
  }

  fn import_alias(ctx: &RenderContext<'_>, id: ElementId) -> String {
    let segments = ctx
      .relative_namespace(id)
      .into_iter()
      .map(|segment| segment.to_lowercase())
      .collect::<String>();
    format!("i{}", if segments.is_empty() { Self::package_name(ctx, id) } else { segments })
  }

  /// `symbol` as seen from the file being written.
  fn qualify(ctx: &RenderContext<'_>, target: ElementId, symbol: &str) -> String {
    if ctx.dom.namespace_of(target) == ctx.dom.namespace_of(ctx.declaration) {
      symbol.to_string()
    } else {
      format!("{}.{symbol}", Self::import_alias(ctx, target))
    }
  }

  fn field_name(ctx: &RenderContext<'_>, id: ElementId) -> String {
    ctx.conventions.escape(&Casing::Camel.apply(ctx.name(id)))
  }

  fn type_label(ctx: &RenderContext<'_>, id: ElementId) -> String {
    ctx.conventions.type_name(ctx.name(id))
  }

  fn is_interface_type(ctx: &RenderContext<'_>, id: ElementId) -> bool {
    ctx.dom.element(id).as_interface().is_some() || ctx.index.interface_of(id).is_some()
  }

  fn factory_name(ctx: &RenderContext<'_>, ty: &CodeType) -> String {
    match ty.reference {
      TypeRef::Definition(id) => Self::qualify(ctx, id, &format!("Create{}FromDiscriminatorValue", Self::type_label(ctx, id))),
      _ => "s.CreateUntypedNodeFromDiscriminatorValue".to_string(),
    }
  }

  fn enum_parser(ctx: &RenderContext<'_>, id: ElementId) -> String {
    Self::qualify(ctx, id, &format!("Parse{}", Self::type_label(ctx, id)))
  }

  /// Type of a single item, without the collection.
  fn item_type(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    let mut item = *ty;
    item.collection = Default::default();
    self.type_name(ctx, &item, id)
  }

  /// Bare type of a value item, without pointer or collection.
  fn value_type(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    Ok(self.item_type(ctx, ty, id)?.trim_start_matches('*').to_string())
  }

  fn getter_call(ctx: &RenderContext<'_>, property: ElementId) -> String {
    match ctx.accessor_for(property, MethodKind::Getter) {
      Some(getter) => format!("m.{}()", ctx.member_name(getter)),
      None => format!("m.{}", Self::field_name(ctx, property)),
    }
  }

  fn setter_call(ctx: &RenderContext<'_>, receiver: &str, property: ElementId, value: &str) -> String {
    match ctx.accessor_for(property, MethodKind::Setter) {
      Some(setter) => format!("{receiver}.{}({value})", ctx.member_name(setter)),
      None => format!("{receiver}.{} = {value}", Self::field_name(ctx, property)),
    }
  }

  fn write_error_return(out: &mut CodeWriter, value: &str) {
    out.open("if err != nil {");
    out.line(format!("return {value}"));
    out.close("}");
  }

  /// Reads the value of `ty` from `n` and hands it to `assign`.
  fn write_read(
    &self,
    ctx: &RenderContext<'_>,
    out: &mut CodeWriter,
    ty: &CodeType,
    id: ElementId,
    assign: &dyn Fn(&str) -> String,
  ) -> GenerationResult<()> {
    let shape = ValueShape::of(ctx.dom, ty);
    let call = match (shape, ty.is_collection()) {
      (ValueShape::Primitive(primitive), false) => format!("n.Get{}()", value_stem(primitive)),
      (ValueShape::Primitive(primitive), true) => {
        format!("n.GetCollectionOfPrimitiveValues({})", quoted(primitive_tag(primitive)))
      }
      (ValueShape::Enum(target), false) => format!("n.GetEnumValue({})", Self::enum_parser(ctx, target)),
      (ValueShape::Enum(target), true) => format!("n.GetCollectionOfEnumValues({})", Self::enum_parser(ctx, target)),
      (ValueShape::Object(_) | ValueShape::Untyped, false) => format!("n.GetObjectValue({})", Self::factory_name(ctx, ty)),
      (ValueShape::Object(_) | ValueShape::Untyped, true) => {
        format!("n.GetCollectionOfObjectValues({})", Self::factory_name(ctx, ty))
      }
    };
    out.line(format!("val, err := {call}"));
    Self::write_error_return(out, "err");
    out.open("if val != nil {");
    match (shape, ty.is_collection()) {
      (ValueShape::Primitive(_), false) => out.line(assign("val")),
      (ValueShape::Enum(_) | ValueShape::Object(_) | ValueShape::Untyped, false) => {
        out.line(assign(&format!("val.({})", self.item_type(ctx, ty, id)?)));
      }
      (ValueShape::Primitive(_) | ValueShape::Enum(_), true) => {
        let value = self.value_type(ctx, ty, id)?;
        out.line(format!("res := make([]{value}, len(val))"));
        out.open("for i, v := range val {");
        out.open("if v != nil {");
        out.line(format!("res[i] = *(v.(*{value}))"));
        out.close("}");
        out.close("}");
        out.line(assign("res"));
      }
      (ValueShape::Object(_) | ValueShape::Untyped, true) => {
        let item = self.item_type(ctx, ty, id)?;
        out.line(format!("res := make([]{item}, len(val))"));
        out.open("for i, v := range val {");
        out.open("if v != nil {");
        out.line(format!("res[i] = v.({item})"));
        out.close("}");
        out.close("}");
        out.line(assign("res"));
      }
    }
    out.close("}");
    out.line("return nil");
    Ok(())
  }

  /// Writes `value` under `key`, returning early on failure.
  fn write_write(ctx: &RenderContext<'_>, out: &mut CodeWriter, ty: &CodeType, key: &str, value: &str) {
    let shape = ValueShape::of(ctx.dom, ty);
    match (shape, ty.is_collection()) {
      (ValueShape::Primitive(primitive), false) => {
        out.open("{");
        out.line(format!("err := writer.Write{}({key}, {value})", value_stem(primitive)));
      }
      (ValueShape::Primitive(primitive), true) => {
        out.open("{");
        out.line(format!("err := writer.WriteCollectionOf{}s({key}, {value})", value_stem(primitive)));
      }
      (ValueShape::Enum(_), false) => {
        out.open(format!("if {value} != nil {{"));
        out.line(format!("cast := (*{value}).String()"));
        out.line(format!("err := writer.WriteStringValue({key}, &cast)"));
      }
      (ValueShape::Enum(target), true) => {
        out.open(format!("if {value} != nil {{"));
        out.line(format!(
          "err := writer.WriteCollectionOfStringValues({key}, {}({value}))",
          Self::qualify(ctx, target, &format!("Serialize{}", Self::type_label(ctx, target)))
        ));
      }
      (ValueShape::Object(_) | ValueShape::Untyped, false) => {
        out.open("{");
        out.line(format!("err := writer.WriteObjectValue({key}, {value})"));
      }
      (ValueShape::Object(_) | ValueShape::Untyped, true) => {
        out.open(format!("if {value} != nil {{"));
        out.line(format!("cast := make([]s.Parsable, len({value}))"));
        out.open(format!("for i, v := range {value} {{"));
        out.open("if v != nil {");
        out.line("cast[i] = v.(s.Parsable)");
        out.close("}");
        out.close("}");
        out.line(format!("err := writer.WriteCollectionOfObjectValues({key}, cast)"));
      }
    }
    Self::write_error_return(out, "err");
    out.close("}");
  }

  fn parameter_list(&self, ctx: &RenderContext<'_>, parameters: &[ElementId]) -> GenerationResult<Vec<String>> {
    let mut rendered = vec![];
    for parameter in parameters {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      rendered.push(format!(
        "{} {}",
        ctx.parameter_name(*parameter),
        self.type_name(ctx, &def.ty, *parameter)?
      ));
    }
    Ok(rendered)
  }

  fn receiver(ctx: &RenderContext<'_>, id: ElementId) -> String {
    ctx
      .owner(id)
      .map(|owner| format!("(m *{}) ", Self::type_label(ctx, owner)))
      .unwrap_or_default()
  }

  fn write_model_struct_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.class_def(id) else {
      return Ok(());
    };
    let name = Self::type_label(ctx, id);
    out.blank();
    out.line(format!("// New{name} instantiates a new {name} and sets the default values."));
    out.open(format!("func New{name}() *{name} {{"));
    match def.base_class {
      Some(base) => {
        let base_name = Self::type_label(ctx, base);
        out.open(format!("m := &{name}{{"));
        out.line(format!(
          "{base_name}: *{}(),",
          Self::qualify(ctx, base, &format!("New{base_name}"))
        ));
        out.close("}");
      }
      None if def.is_error => {
        out.open(format!("m := &{name}{{"));
        out.line("ApiError: *abs.NewApiError(),");
        out.close("}");
      }
      None => out.line(format!("m := &{name}{{}}")),
    }
    if let Some(store) = ctx.property_of_kind(id, PropertyKind::BackingStore) {
      out.line(format!("m.{} = store.BackingStoreFactoryInstance()", Self::field_name(ctx, store)));
    }
    if let Some(additional) = ctx.property_of_kind(id, PropertyKind::AdditionalData) {
      out.line(Self::setter_call(ctx, "m", additional, "make(map[string]any)"));
    }
    out.line("return m");
    out.close("}");

    if def.is_error && def.base_class.is_none() {
      out.blank();
      out.line("// Error the primary error message.");
      out.open(format!("func (m *{name}) Error() string {{"));
      out.line("return m.ApiError.Error()");
      out.close("}");
    }
    Ok(())
  }

  fn write_navigation(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.property_def(id) else {
      return Ok(());
    };
    let Some(target) = def.ty.definition_id() else {
      return Ok(());
    };
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    out.blank();
    write_comment(out, &name, ctx.documentation(id), ctx.is_deprecated(id));
    out.open(format!(
      "func (m *{}) {name}() {} {{",
      Self::type_label(ctx, owner),
      self.type_name(ctx, &def.ty, id)?
    ));
    out.line(format!(
      "return {}(m.pathParameters, m.requestAdapter)",
      Self::qualify(ctx, target, &format!("New{}Internal", Self::type_label(ctx, target)))
    ));
    out.close("}");
    Ok(())
  }

  fn write_constructor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, kind: MethodKind) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let name = Self::type_label(ctx, owner);
    let adapter = ctx
      .parameter_of_kind(id, ParameterKind::RequestAdapter)
      .map_or_else(|| "requestAdapter".to_string(), |parameter| ctx.parameter_name(parameter));

    match kind {
      MethodKind::ClientConstructor => {
        let parameters = ctx.parameters(id);
        write_comment(out, &format!("New{name}"), ctx.documentation(id), false);
        out.open(format!(
          "func New{name}({}) *{name} {{",
          self.parameter_list(ctx, &parameters)?.join(", ")
        ));
        if let Some(base_url) = ctx.base_url(id) {
          out.open(format!("if {adapter}.GetBaseUrl() == \"\" {{"));
          out.line(format!("{adapter}.SetBaseUrl({})", quoted(base_url)));
          out.close("}");
        }
        out.line(format!(
          "m := &{name}{{urlTemplate: {}, requestAdapter: {adapter}, pathParameters: make(map[string]string)}}",
          quoted(&ctx.url_template(owner))
        ));
        out.line(format!("m.pathParameters[{}] = {adapter}.GetBaseUrl()", quoted(BASE_URL_KEY)));
        if let Some(store) = ctx.parameter_of_kind(id, ParameterKind::BackingStore) {
          out.line(format!("{adapter}.EnableBackingStore({})", ctx.parameter_name(store)));
        }
        out.line("return m");
        out.close("}");
      }
      MethodKind::Constructor => {
        let path_parameters = ctx
          .parameter_of_kind(id, ParameterKind::PathParameters)
          .map_or_else(|| "pathParameters".to_string(), |parameter| ctx.parameter_name(parameter));
        write_comment(out, &format!("New{name}Internal"), ctx.documentation(id), false);
        out.open(format!(
          "func New{name}Internal({path_parameters} map[string]string, {adapter} abs.RequestAdapter) *{name} {{"
        ));
        out.line("urlParams := make(map[string]string)");
        out.open(format!("for key, value := range {path_parameters} {{"));
        out.line("urlParams[key] = value");
        out.close("}");
        out.line(format!(
          "return &{name}{{urlTemplate: {}, requestAdapter: {adapter}, pathParameters: urlParams}}",
          quoted(&ctx.url_template(owner))
        ));
        out.close("}");
      }
      _ => {
        let raw_url = ctx
          .parameter_of_kind(id, ParameterKind::RawUrl)
          .map_or_else(|| "rawUrl".to_string(), |parameter| ctx.parameter_name(parameter));
        write_comment(out, &format!("New{name}"), ctx.documentation(id), false);
        out.open(format!(
          "func New{name}({raw_url} string, {adapter} abs.RequestAdapter) *{name} {{"
        ));
        out.line("urlParams := make(map[string]string)");
        out.line(format!("urlParams[{}] = {raw_url}", quoted(RAW_URL_KEY)));
        out.line(format!("return New{name}Internal(urlParams, {adapter})"));
        out.close("}");
      }
    }
    Ok(())
  }

  fn write_executor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    let shape = ResponseShape::of(ctx.dom, &def.return_type);
    let parameters = ctx.parameters(id);
    let mut signature = vec!["ctx context.Context".to_string()];
    signature.extend(self.parameter_list(ctx, &parameters)?);
    let (returns, failure) = match shape {
      ResponseShape::NoContent => ("error".to_string(), "err"),
      _ => (format!("({}, error)", self.type_name(ctx, &def.return_type, id)?), "nil, err"),
    };

    write_comment(out, &name, ctx.documentation(id), ctx.is_deprecated(id));
    out.open(format!(
      "func {}{name}({}) {returns} {{",
      Self::receiver(ctx, id),
      signature.join(", ")
    ));
    let generator = ctx
      .generator_for(id)
      .map_or_else(|| "ToRequestInformation".to_string(), |generator| ctx.member_name(generator));
    let mut arguments = vec!["ctx".to_string()];
    arguments.extend(parameters.iter().map(|parameter| ctx.parameter_name(*parameter)));
    out.line(format!("requestInfo, err := m.{generator}({})", arguments.join(", ")));
    Self::write_error_return(out, failure);
    if def.error_mappings.is_empty() {
      out.line("var errorMapping abs.ErrorMappings");
    } else {
      out.open("errorMapping := abs.ErrorMappings{");
      for (code, ty) in &def.error_mappings {
        out.line(format!("{}: {},", quoted(code), Self::factory_name(ctx, ty)));
      }
      out.close("}");
    }

    let ty = &def.return_type;
    match shape {
      ResponseShape::NoContent => {
        out.line("err = m.requestAdapter.SendNoContent(ctx, requestInfo, errorMapping)");
        Self::write_error_return(out, "err");
        out.line("return nil");
      }
      ResponseShape::Primitive => {
        let tag = ty.as_primitive().map_or("string", primitive_tag);
        out.line(format!(
          "res, err := m.requestAdapter.SendPrimitive(ctx, requestInfo, {}, errorMapping)",
          quoted(tag)
        ));
        Self::write_error_return(out, failure);
        out.open("if res == nil {");
        out.line("return nil, nil");
        out.close("}");
        out.line(format!("return res.({}), nil", self.type_name(ctx, ty, id)?));
      }
      ResponseShape::Enum | ResponseShape::Object => {
        let call = match (shape, ty.definition_id()) {
          (ResponseShape::Enum, Some(target)) => format!("SendEnum(ctx, requestInfo, {}, errorMapping)", Self::enum_parser(ctx, target)),
          _ => format!("Send(ctx, requestInfo, {}, errorMapping)", Self::factory_name(ctx, ty)),
        };
        out.line(format!("res, err := m.requestAdapter.{call}"));
        Self::write_error_return(out, failure);
        out.open("if res == nil {");
        out.line("return nil, nil");
        out.close("}");
        out.line(format!("return res.({}), nil", self.type_name(ctx, ty, id)?));
      }
      ResponseShape::PrimitiveCollection | ResponseShape::EnumCollection | ResponseShape::ObjectCollection => {
        let call = match (shape, ty.definition_id()) {
          (ResponseShape::PrimitiveCollection, _) => format!(
            "SendPrimitiveCollection(ctx, requestInfo, {}, errorMapping)",
            quoted(ty.as_primitive().map_or("string", primitive_tag))
          ),
          (ResponseShape::EnumCollection, Some(target)) => format!(
            "SendEnumCollection(ctx, requestInfo, {}, errorMapping)",
            Self::enum_parser(ctx, target)
          ),
          _ => format!("SendCollection(ctx, requestInfo, {}, errorMapping)", Self::factory_name(ctx, ty)),
        };
        out.line(format!("res, err := m.requestAdapter.{call}"));
        Self::write_error_return(out, failure);
        let (element, conversion) = if shape == ResponseShape::ObjectCollection {
          let item = self.item_type(ctx, ty, id)?;
          (item.clone(), format!("v.({item})"))
        } else {
          let value = self.value_type(ctx, ty, id)?;
          (value.clone(), format!("*(v.(*{value}))"))
        };
        out.line(format!("val := make([]{element}, len(res))"));
        out.open("for i, v := range res {");
        out.open("if v != nil {");
        out.line(format!("val[i] = {conversion}"));
        out.close("}");
        out.close("}");
        out.line("return val, nil");
      }
    }
    out.close("}");
    Ok(())
  }

  fn write_generator(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    let parameters = ctx.parameters(id);
    let mut signature = vec!["ctx context.Context".to_string()];
    signature.extend(self.parameter_list(ctx, &parameters)?);
    write_comment(out, &name, ctx.documentation(id), ctx.is_deprecated(id));
    out.open(format!(
      "func {}{name}({}) (*abs.RequestInformation, error) {{",
      Self::receiver(ctx, id),
      signature.join(", ")
    ));
    out.line(format!(
      "requestInfo := abs.NewRequestInformationWithMethodAndUrlTemplateAndPathParameters(abs.{}, m.urlTemplate, m.pathParameters)",
      ctx.http_verb(id)
    ));
    if let Some(parameter) = ctx.parameter_of_kind(id, ParameterKind::RequestConfiguration) {
      let config = ctx.parameter_name(parameter);
      out.open(format!("if {config} != nil {{"));
      if ctx.configuration_class(id).and_then(|class| ctx.query_parameters_class(class)).is_some() {
        out.open(format!("if {config}.QueryParameters != nil {{"));
        out.line(format!("requestInfo.AddQueryParameters(*({config}.QueryParameters))"));
        out.close("}");
      }
      out.line(format!("requestInfo.Headers.AddAll({config}.Headers)"));
      out.line(format!("requestInfo.AddRequestOptions({config}.Options)"));
      out.close("}");
    }
    if !def.accepted_response_types.is_empty() {
      out.line(format!(
        "requestInfo.Headers.TryAdd(\"Accept\", {})",
        quoted(&def.accepted_response_types.join(", "))
      ));
    }
    if let Some(body) = ctx.parameter_of_kind(id, ParameterKind::RequestBody)
      && let Some(body_def) = ctx.parameter_def(body)
    {
      let name = ctx.parameter_name(body);
      let content_type = quoted(def.request_body_content_type.as_deref().unwrap_or("application/octet-stream"));
      let collection = body_def.ty.is_collection();
      match ValueShape::of(ctx.dom, &body_def.ty) {
        ValueShape::Primitive(Primitive::Stream) => {
          out.line(format!("requestInfo.SetStreamContentAndContentType({name}, {content_type})"));
        }
        ValueShape::Object(_) | ValueShape::Untyped if collection => {
          out.line(format!("cast := make([]s.Parsable, len({name}))"));
          out.open(format!("for i, v := range {name} {{"));
          out.open("if v != nil {");
          out.line("cast[i] = v.(s.Parsable)");
          out.close("}");
          out.close("}");
          out.line(format!(
            "err := requestInfo.SetContentFromParsableCollection(ctx, m.requestAdapter, {content_type}, cast)"
          ));
          Self::write_error_return(out, "nil, err");
        }
        ValueShape::Object(_) | ValueShape::Untyped => {
          out.line(format!(
            "err := requestInfo.SetContentFromParsable(ctx, m.requestAdapter, {content_type}, {name})"
          ));
          Self::write_error_return(out, "nil, err");
        }
        ValueShape::Enum(_) if !collection => {
          out.line(format!("cast := (*{name}).String()"));
          out.line(format!(
            "err := requestInfo.SetContentFromScalar(ctx, m.requestAdapter, {content_type}, &cast)"
          ));
          Self::write_error_return(out, "nil, err");
        }
        _ if collection => {
          out.line(format!("cast := make([]any, len({name}))"));
          out.open(format!("for i, v := range {name} {{"));
          out.line("cast[i] = v");
          out.close("}");
          out.line(format!(
            "err := requestInfo.SetContentFromScalarCollection(ctx, m.requestAdapter, {content_type}, cast)"
          ));
          Self::write_error_return(out, "nil, err");
        }
        _ => {
          out.line(format!(
            "err := requestInfo.SetContentFromScalar(ctx, m.requestAdapter, {content_type}, {name})"
          ));
          Self::write_error_return(out, "nil, err");
        }
      }
    }
    out.line("return requestInfo, nil");
    out.close("}");
    Ok(())
  }

  fn write_path_builder(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, name: &str, return_type: &CodeType) -> GenerationResult<()> {
    let Some(target) = return_type.definition_id() else {
      return Ok(());
    };
    let parameters = ctx.parameters(id);
    write_comment(out, name, ctx.documentation(id), ctx.is_deprecated(id));
    out.open(format!(
      "func {}{name}({}) {} {{",
      Self::receiver(ctx, id),
      self.parameter_list(ctx, &parameters)?.join(", "),
      self.type_name(ctx, return_type, id)?
    ));
    out.line("urlTplParams := make(map[string]string)");
    out.open("for key, value := range m.pathParameters {");
    out.line("urlTplParams[key] = value");
    out.close("}");
    for parameter in &parameters {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      let name = ctx.parameter_name(*parameter);
      let key = quoted(&ctx.serialization_name(*parameter));
      match def.ty.as_primitive() {
        Some(Primitive::String) if !def.ty.is_collection() => {
          out.open(format!("if {name} != nil {{"));
          out.line(format!("urlTplParams[{key}] = *{name}"));
          out.close("}");
        }
        _ if def.ty.is_collection() => {
          out.open(format!("if {name} != nil {{"));
          out.line(format!("urlTplParams[{key}] = fmt.Sprint({name})"));
          out.close("}");
        }
        _ => {
          out.open(format!("if {name} != nil {{"));
          out.line(format!("urlTplParams[{key}] = fmt.Sprint(*{name})"));
          out.close("}");
        }
      }
    }
    out.line(format!(
      "return {}(urlTplParams, m.requestAdapter)",
      Self::qualify(ctx, target, &format!("New{}Internal", Self::type_label(ctx, target)))
    ));
    out.close("}");
    Ok(())
  }

  fn write_factory(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let name = Self::type_label(ctx, owner);
    let node = ctx
      .parameter_of_kind(id, ParameterKind::ParseNode)
      .map_or_else(|| "parseNode".to_string(), |parameter| ctx.parameter_name(parameter));
    let symbol = format!("Create{name}FromDiscriminatorValue");
    write_comment(out, &symbol, ctx.documentation(id), false);
    out.open(format!("func {symbol}({node} s.ParseNode) (s.Parsable, error) {{"));

    let layout = ComposedLayout::of(ctx, owner);
    let (discriminator, branches) = match &layout {
      Some(layout) if layout.has_mappings() => (
        layout.discriminator.clone(),
        layout
          .mapped
          .iter()
          .filter_map(|(value, member)| {
            let ty = ctx.property_def(*member)?.ty;
            let target = ty.definition_id()?;
            Some((value.clone(), Some(*member), target))
          })
          .collect::<Vec<_>>(),
      ),
      Some(_) => (None, vec![]),
      None => match ctx
        .class_def(owner)
        .and_then(|def| def.discriminator.as_ref())
        .filter(|info| !info.is_empty())
      {
        Some(info) => (
          Some(info.property_name.clone()),
          info
            .mappings()
            .filter_map(|(value, ty)| Some((value.to_string(), None, ty.definition_id()?)))
            .collect(),
        ),
        None => (None, vec![]),
      },
    };

    if layout.is_some() {
      out.line(format!("result := New{name}()"));
    }
    if let Some(discriminator) = discriminator {
      out.open(format!("if {node} != nil {{"));
      out.line(format!("mappingValueNode, err := {node}.GetChildNode({})", quoted(&discriminator)));
      Self::write_error_return(out, "nil, err");
      out.open("if mappingValueNode != nil {");
      out.line("mappingValue, err := mappingValueNode.GetStringValue()");
      Self::write_error_return(out, "nil, err");
      out.open("if mappingValue != nil {");
      out.open("switch *mappingValue {");
      for (value, member, target) in branches {
        out.open(format!("case {}:", quoted(&value)));
        let constructor = format!(
          "{}()",
          Self::qualify(ctx, target, &format!("New{}", Self::type_label(ctx, target)))
        );
        match member {
          Some(member) => {
            out.line(Self::setter_call(ctx, "result", member, &constructor));
            out.line("return result, nil");
          }
          None => out.line(format!("return {constructor}, nil")),
        }
        out.dedent();
      }
      out.close("}");
      out.close("}");
      out.close("}");
      out.close("}");
    }

    if let Some(layout) = &layout {
      let mut first = true;
      for member in &layout.others {
        let Some(def) = ctx.property_def(*member) else {
          continue;
        };
        let getter = match (ValueShape::of(ctx.dom, &def.ty), def.ty.is_collection()) {
          (ValueShape::Primitive(primitive), false) => format!("{node}.Get{}()", value_stem(primitive)),
          (ValueShape::Enum(target), false) => format!("{node}.GetEnumValue({})", Self::enum_parser(ctx, target)),
          (ValueShape::Object(_) | ValueShape::Untyped, true) => {
            format!("{node}.GetCollectionOfObjectValues({})", Self::factory_name(ctx, &def.ty))
          }
          _ => continue,
        };
        let keyword = if first { "if" } else { "} else if" };
        first = false;
        out.open(format!("{keyword} val, err := {getter}; val != nil {{"));
        Self::write_error_return(out, "nil, err");
        let value = match (ValueShape::of(ctx.dom, &def.ty), def.ty.is_collection()) {
          (ValueShape::Primitive(_), false) => "val".to_string(),
          (_, false) => format!("val.({})", self.item_type(ctx, &def.ty, *member)?),
          _ => {
            let item = self.item_type(ctx, &def.ty, *member)?;
            out.line(format!("cast := make([]{item}, len(val))"));
            out.open("for i, v := range val {");
            out.open("if v != nil {");
            out.line(format!("cast[i] = v.({item})"));
            out.close("}");
            out.close("}");
            "cast".to_string()
          }
        };
        out.line(Self::setter_call(ctx, "result", *member, &value));
        out.dedent();
      }
      if !layout.fallback.is_empty() {
        if !first {
          out.open("} else {");
        }
        for member in &layout.fallback {
          if let Some(target) = ctx.property_def(*member).and_then(|def| def.ty.definition_id()) {
            let constructor = format!(
              "{}()",
              Self::qualify(ctx, target, &format!("New{}", Self::type_label(ctx, target)))
            );
            out.line(Self::setter_call(ctx, "result", *member, &constructor));
          }
        }
        if !first {
          out.dedent();
        }
      }
      if !first {
        out.line("}");
      }
      out.line("return result, nil");
    } else {
      out.line(format!("return New{name}(), nil"));
    }
    out.close("}");
    Ok(())
  }

  fn write_deserializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    write_comment(out, &name, ctx.documentation(id), false);
    out.open(format!("func {}{name}() {DESERIALIZERS} {{", Self::receiver(ctx, id)));

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      match layout.kind {
        ComposedKind::Union => {
          for member in &layout.objects {
            let value = Self::getter_call(ctx, *member);
            out.open(format!("if {value} != nil {{"));
            out.line(format!("return {value}.GetFieldDeserializers()"));
            out.close("}");
          }
          out.line(format!("return make({DESERIALIZERS})"));
        }
        ComposedKind::Intersection => {
          let members = layout
            .objects
            .iter()
            .map(|member| Self::getter_call(ctx, *member))
            .join(", ");
          out.line(format!("return s.MergeDeserializersForIntersectionWrapper({members})"));
        }
      }
      out.close("}");
      return Ok(());
    }

    match ctx.dom.class_base(owner) {
      Some(base) => out.line(format!("res := m.{}.GetFieldDeserializers()", Self::type_label(ctx, base))),
      None => out.line(format!("res := make({DESERIALIZERS})")),
    }
    for property in ctx.serialized_properties(owner) {
      let Some(def) = ctx.property_def(property) else {
        continue;
      };
      out.open(format!("res[{}] = func(n s.ParseNode) error {{", quoted(&ctx.wire_name(property))));
      self.write_read(ctx, out, &def.ty, property, &|value| Self::setter_call(ctx, "m", property, value))?;
      out.close("}");
    }
    out.line("return res");
    out.close("}");
    Ok(())
  }

  fn write_serializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    let writer = ctx
      .parameter_of_kind(id, ParameterKind::Serializer)
      .map_or_else(|| "writer".to_string(), |parameter| ctx.parameter_name(parameter));
    write_comment(out, &name, ctx.documentation(id), false);
    out.open(format!(
      "func {}{name}({writer} s.SerializationWriter) error {{",
      Self::receiver(ctx, id)
    ));

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      let chained = match layout.kind {
        ComposedKind::Union => ctx.properties(owner),
        ComposedKind::Intersection => layout.others.clone(),
      };
      let mut first = true;
      for member in chained {
        let Some(def) = ctx.property_def(member) else {
          continue;
        };
        let value = Self::getter_call(ctx, member);
        let keyword = if first { "if" } else { "} else if" };
        first = false;
        out.open(format!("{keyword} {value} != nil {{"));
        let mut body = CodeWriter::new(ctx.conventions.indent);
        Self::write_write(ctx, &mut body, &def.ty, "\"\"", &value);
        for line in body.finish().lines() {
          out.line(line);
        }
        out.dedent();
      }
      if layout.kind == ComposedKind::Intersection && !layout.objects.is_empty() {
        let members = layout
          .objects
          .iter()
          .map(|member| Self::getter_call(ctx, *member))
          .join(", ");
        if !first {
          out.open("} else {");
        }
        out.line(format!("err := {writer}.WriteObjectValue(\"\", nil, {members})"));
        Self::write_error_return(out, "err");
        if !first {
          out.dedent();
        }
      }
      if !first {
        out.line("}");
      }
      out.line("return nil");
      out.close("}");
      return Ok(());
    }

    if let Some(base) = ctx.dom.class_base(owner) {
      out.line(format!("err := m.{}.Serialize({writer})", Self::type_label(ctx, base)));
      Self::write_error_return(out, "err");
    }
    for property in ctx.serialized_properties(owner) {
      let Some(def) = ctx.property_def(property) else {
        continue;
      };
      if def.read_only {
        continue;
      }
      Self::write_write(
        ctx,
        out,
        &def.ty,
        &quoted(&ctx.wire_name(property)),
        &Self::getter_call(ctx, property),
      );
    }
    if let Some(additional) = ctx.property_of_kind(owner, PropertyKind::AdditionalData) {
      out.open("{");
      out.line(format!(
        "err := {writer}.WriteAdditionalData({})",
        Self::getter_call(ctx, additional)
      ));
      Self::write_error_return(out, "err");
      out.close("}");
    }
    out.line("return nil");
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
    let name = ctx.member_name(id);
    let in_interface = ctx
      .dom
      .element(id)
      .parent()
      .is_some_and(|parent| ctx.dom.element(parent).as_interface().is_some());
    let ty = self.type_name(ctx, &property.ty, id)?;
    let value = ctx
      .parameters(id)
      .first()
      .map_or_else(|| "value".to_string(), |parameter| ctx.parameter_name(*parameter));
    let signature = if kind == MethodKind::Getter {
      format!("{name}() {ty}")
    } else {
      format!("{name}({value} {ty})")
    };
    if in_interface {
      out.line(signature);
      return Ok(());
    }

    let owner = ctx.owner(id).unwrap_or(ctx.declaration);
    let backed = ctx.is_backed(owner) && matches!(property.kind, PropertyKind::Custom | PropertyKind::AdditionalData);
    let key = quoted(&ctx.wire_name(target));
    write_comment(out, &name, ctx.documentation(id), ctx.is_deprecated(id));
    out.open(format!("func {}{signature} {{", Self::receiver(ctx, id)));
    match (kind, backed) {
      (MethodKind::Getter, true) => {
        out.line(format!("val, err := m.GetBackingStore().Get({key})"));
        out.open("if err != nil {");
        out.line("panic(err)");
        out.close("}");
        out.open("if val != nil {");
        out.line(format!("return val.({ty})"));
        out.close("}");
        out.line("return nil");
      }
      (MethodKind::Getter, false) => out.line(format!("return m.{}", Self::field_name(ctx, target))),
      (_, true) => {
        out.line(format!("err := m.GetBackingStore().Set({key}, {value})"));
        out.open("if err != nil {");
        out.line("panic(err)");
        out.close("}");
      }
      (_, false) => out.line(format!("m.{} = {value}", Self::field_name(ctx, target))),
    }
    out.close("}");
    Ok(())
  }

  fn write_enum_end(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
    let name = Self::type_label(ctx, id);
    let constants = ctx
      .dom
      .children_of_kind(id, ElementTag::Constant)
      .filter_map(|constant| Some((Self::constant_name(ctx, constant), ctx.dom.element(constant).as_constant()?.value.clone())))
      .collect::<Vec<_>>();
    out.close(")");
    out.blank();
    out.open(format!("func (i {name}) String() string {{"));
    let values = constants.iter().map(|(_, value)| quoted(value)).collect::<Vec<_>>().join(", ");
    out.line(format!("return []string{{{values}}}[i]"));
    out.close("}");
    out.blank();
    out.open(format!("func Parse{name}(v string) (any, error) {{"));
    if let Some((first, _)) = constants.first() {
      out.line(format!("result := {first}"));
    }
    out.open("switch v {");
    for (constant, value) in &constants {
      out.open(format!("case {}:", quoted(value)));
      out.line(format!("result = {constant}"));
      out.dedent();
    }
    out.open("default:");
    out.line("return nil, nil");
    out.dedent();
    out.close("}");
    out.line("return &result, nil");
    out.close("}");
    out.blank();
    out.open(format!("func Serialize{name}(values []{name}) []string {{"));
    out.line("result := make([]string, len(values))");
    out.open("for i, v := range values {");
    out.line("result[i] = v.String()");
    out.close("}");
    out.line("return result");
    out.close("}");
  }

  fn constant_name(ctx: &RenderContext<'_>, id: ElementId) -> String {
    let owner = ctx.owner(id).map(|owner| ctx.name(owner).to_uppercase()).unwrap_or_default();
    format!("{}_{owner}", ctx.name(id).to_constant_case())
  }
}

impl LanguageRenderer for GoRenderer {
  fn primitive_name(&self, primitive: Primitive) -> Option<&'static str> {
    match primitive {
      Primitive::String => Some("string"),
      Primitive::Boolean => Some("bool"),
      Primitive::Int8 => Some("int8"),
      Primitive::Int32 => Some("int32"),
      Primitive::Int64 => Some("int64"),
      Primitive::Float32 => Some("float32"),
      Primitive::Float64 => Some("float64"),
      Primitive::Decimal => None,
      Primitive::DateTime => Some("time.Time"),
      Primitive::Date => Some("s.DateOnly"),
      Primitive::Time => Some("s.TimeOnly"),
      Primitive::Duration => Some("s.ISODuration"),
      Primitive::Guid => Some("uuid.UUID"),
      Primitive::Binary | Primitive::Stream => Some("[]byte"),
      Primitive::Void => Some(""),
      Primitive::UntypedNode => Some("s.UntypedNodeable"),
    }
  }

  fn abstraction_name(&self, abstraction: Abstraction) -> &'static str {
    match abstraction {
      Abstraction::RequestAdapter => "abs.RequestAdapter",
      Abstraction::RequestInformation => "*abs.RequestInformation",
      Abstraction::RequestOption => "abs.RequestOption",
      Abstraction::RequestHeaders => "*abs.RequestHeaders",
      Abstraction::ParseNode => "s.ParseNode",
      Abstraction::SerializationWriter => "s.SerializationWriter",
      Abstraction::BackingStore => "store.BackingStore",
      Abstraction::BackingStoreFactory => "store.BackingStoreFactory",
      Abstraction::PathParameters => "map[string]string",
      Abstraction::AdditionalData => "map[string]any",
      Abstraction::ErrorMappings => "abs.ErrorMappings",
      Abstraction::ApiException => "abs.ApiError",
    }
  }

  fn definition_name(&self, ctx: &RenderContext<'_>, id: ElementId) -> String {
    let target = ctx.index.interface_of(id).unwrap_or(id);
    Self::qualify(ctx, target, &Self::type_label(ctx, target))
  }

  fn decorate(&self, base: String, ty: &CodeType) -> String {
    if ty.is_collection() { format!("[]{base}") } else { base }
  }

  /// Scalars, enums and classes travel by pointer; interfaces, byte slices and
  /// collections by value.
  fn type_name(&self, ctx: &RenderContext<'_>, ty: &CodeType, element: ElementId) -> GenerationResult<String> {
    let (base, pointer) = match ty.reference {
      TypeRef::Primitive(primitive) => {
        let name = self.primitive_name(primitive).ok_or_else(|| GenerationError::UnsupportedType {
          language: ctx.language(),
          type_name: primitive.to_string(),
          element: ctx.dom.qualified_name(element),
        })?;
        let by_value = matches!(
          primitive,
          Primitive::Binary | Primitive::Stream | Primitive::Void | Primitive::UntypedNode
        );
        (name.to_string(), !by_value)
      }
      TypeRef::Abstraction(abstraction) => (self.abstraction_name(abstraction).to_string(), false),
      TypeRef::Definition(id) => (self.definition_name(ctx, id), !Self::is_interface_type(ctx, id)),
    };
    Ok(if ty.is_collection() {
      format!("[]{base}")
    } else if pointer {
      format!("*{base}")
    } else {
      base
    })
  }

  fn render_file(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    let mut body = CodeWriter::new(ctx.conventions.indent);
    render_element(ctx, self, &mut body, ctx.declaration)?;
    let body = body.finish();

    self.write_prologue(ctx, out)?;
    let mut imports = BTreeMap::new();
    for (alias, path) in [
      ("abs", ABSTRACTIONS_PATH),
      ("s", SERIALIZATION_PATH),
      ("store", STORE_PATH),
      ("uuid", "github.com/google/uuid"),
    ] {
      if uses_package(&body, alias) {
        imports.insert(path.to_string(), Some(alias.to_string()));
      }
    }
    for package in ["context", "fmt", "time"] {
      if uses_package(&body, package) {
        imports.insert(package.to_string(), None);
      }
    }
    let (declarations, _) = ctx.usings();
    for target in declarations {
      let alias = Self::import_alias(ctx, target);
      if ctx.dom.namespace_of(target) != ctx.dom.namespace_of(ctx.declaration) && uses_package(&body, &alias) {
        imports.insert(Self::import_path(ctx, target), Some(alias));
      }
    }
    if !imports.is_empty() {
      out.open("import (");
      for (path, alias) in imports {
        match alias {
          Some(alias) => out.line(format!("{alias} {}", quoted(&path))),
          None => out.line(quoted(&path)),
        }
      }
      out.close(")");
      out.blank();
    }
    out.lines(&body);
    Ok(())
  }

  fn write_prologue(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    out.line(format!("// {GENERATED_BANNER}"));
    out.blank();
    out.line(format!("package {}", Self::package_name(ctx, ctx.declaration)));
    out.blank();
    Ok(())
  }

  fn write_type_start(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    out.blank();
    let name = Self::type_label(ctx, id);
    write_comment(out, &name, ctx.documentation(id), ctx.is_deprecated(id));
    match &ctx.dom.element(id).kind {
      ElementKind::Interface(def) => {
        out.open(format!("type {name} interface {{"));
        for parent in &def.extends {
          out.line(Self::qualify(ctx, *parent, &Self::type_label(ctx, *parent)));
        }
        if let Some(class) = def.original_class {
          if ctx.property_of_kind(class, PropertyKind::AdditionalData).is_some() {
            out.line("s.AdditionalDataHolder");
          }
          if ctx.property_of_kind(class, PropertyKind::BackingStore).is_some() {
            out.line("store.BackedModel");
          }
          if def.extends.is_empty() {
            out.line("s.Parsable");
          }
        }
      }
      ElementKind::Class(def) if def.kind == ClassKind::Enum => {
        out.line(format!("type {name} int"));
        out.blank();
        out.open("const (");
      }
      ElementKind::Class(def) => {
        out.open(format!("type {name} struct {{"));
        if let Some(base) = def.base_class {
          out.line(Self::qualify(ctx, base, &Self::type_label(ctx, base)));
        } else if def.is_error {
          out.line("abs.ApiError");
        }
      }
      _ => {}
    }
    Ok(())
  }

  fn write_members_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(kind) = ctx.dom.element(id).class_kind() else {
      return Ok(());
    };
    if kind == ClassKind::Enum {
      return Ok(());
    }
    out.close("}");
    match kind {
      ClassKind::Model => self.write_model_struct_end(ctx, out, id)?,
      ClassKind::ComposedType(_) => {
        let name = Self::type_label(ctx, id);
        out.blank();
        out.line(format!("// New{name} instantiates a new {name} and sets the default values."));
        out.open(format!("func New{name}() *{name} {{"));
        out.line(format!("return &{name}{{}}"));
        out.close("}");
        out.blank();
        out.line("// GetIsComposedType determines if the current object is a wrapper for a composed type");
        out.open(format!("func (m *{name}) GetIsComposedType() bool {{"));
        out.line("return true");
        out.close("}");
      }
      ClassKind::RequestBuilder => {
        for property in ctx.properties(id) {
          if ctx.property_def(property).is_some_and(|def| def.kind == PropertyKind::RequestBuilder) {
            self.write_navigation(ctx, out, property)?;
          }
        }
      }
      _ => {}
    }
    Ok(())
  }

  fn write_block_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId) -> GenerationResult<()> {
    match &ctx.dom.element(owner).kind {
      ElementKind::Interface(_) => out.close("}"),
      ElementKind::Class(def) if def.kind == ClassKind::Enum => Self::write_enum_end(ctx, out, owner),
      _ => {}
    }
    Ok(())
  }

  fn write_property(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.property_def(id) else {
      return Ok(());
    };
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let backed = ctx.is_backed(owner);
    let comment = |out: &mut CodeWriter| {
      if let Some(text) = ctx.documentation(id) {
        for line in doc_lines(text) {
          out.line(format!("// {line}"));
        }
      }
    };
    match def.kind {
      PropertyKind::RequestBuilder => {}
      PropertyKind::Custom | PropertyKind::AdditionalData if backed => {}
      PropertyKind::Custom
      | PropertyKind::AdditionalData
      | PropertyKind::BackingStore
      | PropertyKind::UrlTemplate
      | PropertyKind::RequestAdapter
      | PropertyKind::PathParameters => {
        comment(out);
        out.line(format!(
          "{} {}",
          Self::field_name(ctx, id),
          self.type_name(ctx, &def.ty, id)?
        ));
      }
      PropertyKind::QueryParameter => {
        comment(out);
        out.line(format!(
          "{} {} `uriparametername:{}`",
          ctx.member_name(id),
          self.type_name(ctx, &def.ty, id)?,
          quoted(&ctx.wire_name(id))
        ));
      }
      PropertyKind::Headers | PropertyKind::QueryParameters => {
        comment(out);
        let ty = self.type_name(ctx, &def.ty, id)?;
        let ty = if ty.starts_with('*') { ty } else { format!("*{ty}") };
        out.line(format!("{} {ty}", ctx.member_name(id)));
      }
      PropertyKind::Options => {
        comment(out);
        out.line(format!("{} {}", ctx.member_name(id), self.type_name(ctx, &def.ty, id)?));
      }
    }
    Ok(())
  }

  fn write_method(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let in_interface = ctx
      .dom
      .element(id)
      .parent()
      .is_some_and(|parent| ctx.dom.element(parent).as_interface().is_some());
    if !in_interface {
      out.blank();
    }
    match def.kind {
      kind @ (MethodKind::ClientConstructor | MethodKind::Constructor | MethodKind::RawUrlConstructor) => {
        self.write_constructor(ctx, out, id, kind)
      }
      MethodKind::RequestExecutor => self.write_executor(ctx, out, id),
      MethodKind::RequestGenerator => self.write_generator(ctx, out, id),
      MethodKind::Factory => self.write_factory(ctx, out, id),
      MethodKind::Deserializer => self.write_deserializer(ctx, out, id),
      MethodKind::Serializer => self.write_serializer(ctx, out, id),
      kind @ (MethodKind::Getter | MethodKind::Setter) => self.write_accessor(ctx, out, id, kind),
      MethodKind::RequestBuilderWithParameters => {
        self.write_path_builder(ctx, out, id, &ctx.member_name(id), &def.return_type)
      }
      MethodKind::RawUrlBuilder => {
        let name = ctx.member_name(id);
        let raw_url = ctx
          .parameter_of_kind(id, ParameterKind::RawUrl)
          .map_or_else(|| "rawUrl".to_string(), |parameter| ctx.parameter_name(parameter));
        let Some(target) = def.return_type.definition_id() else {
          return Ok(());
        };
        write_comment(out, &name, ctx.documentation(id), ctx.is_deprecated(id));
        out.open(format!(
          "func {}{name}({raw_url} string) {} {{",
          Self::receiver(ctx, id),
          self.type_name(ctx, &def.return_type, id)?
        ));
        out.line(format!(
          "return {}({raw_url}, m.requestAdapter)",
          Self::qualify(ctx, target, &format!("New{}", Self::type_label(ctx, target)))
        ));
        out.close("}");
        Ok(())
      }
      MethodKind::Custom => {
        let name = ctx.member_name(id);
        write_comment(out, &name, ctx.documentation(id), false);
        out.open(format!(
          "func {}{name}({}) {} {{",
          Self::receiver(ctx, id),
          self.parameter_list(ctx, &ctx.parameters(id))?.join(", "),
          self.type_name(ctx, &def.return_type, id)?
        ));
        out.line("panic(\"not implemented\")");
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
    self.write_path_builder(ctx, out, id, &ctx.indexer_method_name(id), &def.return_type)
  }

  fn write_constant(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let name = Self::constant_name(ctx, id);
    let is_first = ctx
      .owner(id)
      .and_then(|owner| ctx.dom.children_of_kind(owner, ElementTag::Constant).next())
      .is_none_or(|first| first == id);
    if let Some(text) = ctx.documentation(id) {
      for line in doc_lines(text) {
        out.line(format!("// {line}"));
      }
    }
    if is_first {
      let owner = ctx.owner(id).map(|owner| Self::type_label(ctx, owner)).unwrap_or_default();
      out.line(format!("{name} {owner} = iota"));
    } else {
      out.line(name);
    }
    Ok(())
  }
}
