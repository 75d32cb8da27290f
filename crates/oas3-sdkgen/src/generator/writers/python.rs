use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use super::{
  BASE_URL_KEY, CodeWriter, ComposedLayout, GENERATED_BANNER, LanguageRenderer, RAW_URL_KEY, RenderContext, ResponseShape,
  ValueShape, doc_lines, element_type, quoted,
};
use crate::generator::{
  codedom::{
    Abstraction, ClassKind, CodeType, ComposedKind, ElementId, ElementTag, MethodKind, ParameterKind, Primitive,
    PropertyKind,
  },
  errors::GenerationResult,
};

const SERIALIZATION_MODULE: &str = "kiota_abstractions.serialization";
const STORE_MODULE: &str = "kiota_abstractions.store";

pub(crate) struct PythonRenderer;

fn abstraction_import(abstraction: Abstraction) -> Option<(&'static str, &'static str)> {
  Some(match abstraction {
    Abstraction::RequestAdapter => ("kiota_abstractions.request_adapter", "RequestAdapter"),
    Abstraction::RequestInformation => ("kiota_abstractions.request_information", "RequestInformation"),
    Abstraction::RequestOption => ("kiota_abstractions.request_option", "RequestOption"),
    Abstraction::RequestHeaders => ("kiota_abstractions.headers_collection", "HeadersCollection"),
    Abstraction::ParseNode => (SERIALIZATION_MODULE, "ParseNode"),
    Abstraction::SerializationWriter => (SERIALIZATION_MODULE, "SerializationWriter"),
    Abstraction::BackingStore => (STORE_MODULE, "BackingStore"),
    Abstraction::BackingStoreFactory => (STORE_MODULE, "BackingStoreFactory"),
    Abstraction::ErrorMappings => (SERIALIZATION_MODULE, "ParsableFactory"),
    Abstraction::ApiException => ("kiota_abstractions.api_error", "APIError"),
    Abstraction::PathParameters | Abstraction::AdditionalData => return None,
  })
}

/// Parse node and serialization writer stem (`get_str_value`, `write_str_value`).
fn value_stem(primitive: Primitive) -> &'static str {
  match primitive {
    Primitive::String => "str_value",
    Primitive::Boolean => "bool_value",
    Primitive::Int8 | Primitive::Int32 | Primitive::Int64 => "int_value",
    Primitive::Float32 | Primitive::Float64 | Primitive::Decimal => "float_value",
    Primitive::DateTime => "datetime_value",
    Primitive::Date => "date_value",
    Primitive::Time => "time_value",
    Primitive::Duration => "timedelta_value",
    Primitive::Guid => "uuid_value",
    Primitive::Binary | Primitive::Stream => "bytes_value",
    Primitive::Void | Primitive::UntypedNode => "object_value",
  }
}

fn write_docstring(out: &mut CodeWriter, lines: &[String]) {
  if lines.is_empty() {
    return;
  }
  out.line("\"\"\"");
  for line in lines {
    out.line(line.replace("\"\"\"", "\\\"\\\"\\\""));
  }
  out.line("\"\"\"");
}

impl PythonRenderer {
  fn element_name(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    self.type_name(ctx, &element_type(ty), id)
  }

  /// Relative module of `target` as seen from the file being written.
  fn module_path(ctx: &RenderContext<'_>, target: ElementId) -> String {
    let packages = |id| {
      ctx
        .relative_namespace(id)
        .into_iter()
        .map(|segment| ctx.conventions.directory_name(segment))
        .collect::<Vec<_>>()
    };
    let from = packages(ctx.declaration);
    let to = packages(target);
    let common = from.iter().zip(&to).take_while(|(left, right)| left == right).count();
    let mut rest = to[common..].to_vec();
    rest.push(ctx.conventions.file_casing.apply(ctx.name(target)));
    format!("{}{}", ".".repeat(1 + from.len() - common), rest.join("."))
  }

  fn import_line(ctx: &RenderContext<'_>, target: ElementId) -> String {
    format!(
      "from {} import {}",
      Self::module_path(ctx, target),
      ctx.conventions.type_name(ctx.name(target))
    )
  }

  /// Imports of declarations needed at run time, placed inside the method body so
  /// modules that reference each other still load.
  fn write_local_imports(ctx: &RenderContext<'_>, out: &mut CodeWriter, types: impl IntoIterator<Item = CodeType>) {
    let targets = types
      .into_iter()
      .filter_map(|ty| ty.definition_id())
      .filter_map(|target| ctx.dom.top_level_declaration(target))
      .filter(|target| *target != ctx.declaration)
      .collect::<BTreeSet<_>>();
    let mut lines = targets.into_iter().map(|target| Self::import_line(ctx, target)).collect::<Vec<_>>();
    if lines.is_empty() {
      return;
    }
    lines.sort();
    for line in lines {
      out.line(line);
    }
    out.blank();
  }

  fn read_value(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    let shape = ValueShape::of(ctx.dom, ty);
    let element = self.element_name(ctx, ty, id)?;
    Ok(match (shape, ty.is_collection()) {
      (ValueShape::Primitive(primitive), false) => format!("n.get_{}()", value_stem(primitive)),
      (ValueShape::Primitive(_), true) => format!("n.get_collection_of_primitive_values({element})"),
      (ValueShape::Enum(_), false) => format!("n.get_enum_value({element})"),
      (ValueShape::Enum(_), true) => format!("n.get_collection_of_enum_values({element})"),
      (ValueShape::Object(_) | ValueShape::Untyped, false) => format!("n.get_object_value({element})"),
      (ValueShape::Object(_) | ValueShape::Untyped, true) => format!("n.get_collection_of_object_values({element})"),
    })
  }

  fn write_value(ctx: &RenderContext<'_>, ty: &CodeType, key: &str, value: &str) -> String {
    let method = match (ValueShape::of(ctx.dom, ty), ty.is_collection()) {
      (ValueShape::Primitive(primitive), false) => format!("write_{}", value_stem(primitive)),
      (ValueShape::Primitive(_), true) => "write_collection_of_primitive_values".to_string(),
      (ValueShape::Enum(_), false) => "write_enum_value".to_string(),
      (ValueShape::Enum(_), true) => "write_collection_of_enum_values".to_string(),
      (ValueShape::Object(_) | ValueShape::Untyped, false) => "write_object_value".to_string(),
      (ValueShape::Object(_) | ValueShape::Untyped, true) => "write_collection_of_object_values".to_string(),
    };
    format!("writer.{method}({key}, {value})")
  }

  fn parameter_list(&self, ctx: &RenderContext<'_>, parameters: &[ElementId]) -> GenerationResult<String> {
    let mut rendered = vec!["self".to_string()];
    for parameter in parameters {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      let name = ctx.parameter_name(*parameter);
      if def.optional {
        let ty = self.type_name(ctx, &def.ty.with_nullable(true), *parameter)?;
        rendered.push(format!("{name}: {ty} = None"));
      } else {
        rendered.push(format!("{name}: {}", self.type_name(ctx, &def.ty, *parameter)?));
      }
    }
    Ok(rendered.join(", "))
  }

  fn method_docs(ctx: &RenderContext<'_>, id: ElementId, returns: Option<&str>) -> Vec<String> {
    let mut lines = ctx
      .documentation(id)
      .map(doc_lines)
      .unwrap_or_default()
      .into_iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>();
    for parameter in ctx.parameters(id) {
      if let Some(text) = ctx.documentation(parameter) {
        lines.push(format!("param {}: {}", ctx.parameter_name(parameter), doc_lines(text).join(" ")));
      }
    }
    if let Some(returns) = returns {
      lines.push(format!("Returns: {returns}"));
    }
    lines
  }

  fn write_null_guards(ctx: &RenderContext<'_>, out: &mut CodeWriter, parameters: &[ElementId]) {
    for parameter in parameters {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      if !def.optional && !def.ty.nullable {
        let name = ctx.parameter_name(*parameter);
        out.line(format!("if {name} is None:"));
        out.indent();
        out.line(format!("raise TypeError(\"{name} cannot be null.\")"));
        out.dedent();
      }
    }
  }

  fn write_constructor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, kind: MethodKind) -> GenerationResult<()> {
    let adapter = ctx
      .parameter_of_kind(id, ParameterKind::RequestAdapter)
      .map_or_else(|| "request_adapter".to_string(), |parameter| ctx.parameter_name(parameter));

    if kind == MethodKind::ClientConstructor {
      let parameters = ctx.parameters(id);
      out.open(format!("def __init__({}) -> None:", self.parameter_list(ctx, &parameters)?));
      write_docstring(out, &Self::method_docs(ctx, id, None));
      Self::write_null_guards(ctx, out, &parameters);
      out.line(format!("self.request_adapter = {adapter}"));
      if let Some(base_url) = ctx.base_url(id) {
        out.open("if not self.request_adapter.base_url:");
        out.line(format!("self.request_adapter.base_url = {}", quoted(base_url)));
        out.dedent();
      }
      out.line(format!(
        "self.path_parameters: dict[str, Any] = {{{}: self.request_adapter.base_url}}",
        quoted(BASE_URL_KEY)
      ));
      if let Some(store) = ctx.parameter_of_kind(id, ParameterKind::BackingStore) {
        out.line(format!("self.request_adapter.enable_backing_store({})", ctx.parameter_name(store)));
      }
      out.dedent();
      return Ok(());
    }

    let path_parameters = ctx
      .parameter_of_kind(id, ParameterKind::PathParameters)
      .map_or_else(|| "path_parameters".to_string(), |parameter| ctx.parameter_name(parameter));
    let placeholders = ctx
      .parameters(id)
      .into_iter()
      .filter(|parameter| ctx.parameter_def(*parameter).is_some_and(|def| def.kind == ParameterKind::Path))
      .collect::<Vec<_>>();
    let mut signature = vec![
      "self".to_string(),
      format!("{path_parameters}: Union[str, dict[str, Any]]"),
      format!("{adapter}: RequestAdapter"),
    ];
    for parameter in &placeholders {
      let Some(def) = ctx.parameter_def(*parameter) else {
        continue;
      };
      signature.push(format!(
        "{}: {} = None",
        ctx.parameter_name(*parameter),
        self.type_name(ctx, &def.ty.with_nullable(true), *parameter)?
      ));
    }
    out.open(format!("def __init__({}) -> None:", signature.join(", ")));
    write_docstring(out, &Self::method_docs(ctx, id, None));
    out.line(format!("self.request_adapter = {adapter}"));
    out.open(format!("if isinstance({path_parameters}, str):"));
    out.line(format!(
      "self.path_parameters: dict[str, Any] = {{{}: {path_parameters}}}",
      quoted(RAW_URL_KEY)
    ));
    out.dedent();
    out.open("else:");
    out.line(format!("self.path_parameters = dict({path_parameters})"));
    for parameter in &placeholders {
      let name = ctx.parameter_name(*parameter);
      out.open(format!("if {name} is not None:"));
      out.line(format!(
        "self.path_parameters[{}] = {name}",
        quoted(&ctx.serialization_name(*parameter))
      ));
      out.dedent();
    }
    out.dedent();
    out.dedent();
    Ok(())
  }

  fn write_executor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let shape = ResponseShape::of(ctx.dom, &def.return_type);
    let return_type = match shape {
      ResponseShape::NoContent => "None".to_string(),
      _ => self.type_name(ctx, &def.return_type.with_nullable(true), id)?,
    };
    let parameters = ctx.parameters(id);
    out.open(format!(
      "async def {}({}) -> {return_type}:",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?
    ));
    write_docstring(out, &Self::method_docs(ctx, id, Some(&return_type)));
    let generator = ctx
      .generator_for(id)
      .map_or_else(|| "to_request_information".to_string(), |generator| ctx.member_name(generator));
    let arguments = parameters
      .iter()
      .map(|parameter| ctx.parameter_name(*parameter))
      .join(", ");
    out.line(format!("request_info = self.{generator}({arguments})"));

    let ty = &def.return_type;
    let mut runtime_types = def.error_mappings.values().copied().collect::<Vec<_>>();
    runtime_types.push(*ty);
    Self::write_local_imports(ctx, out, runtime_types);

    out.open("error_mapping: dict[str, type[ParsableFactory]] = {");
    for (code, error) in &def.error_mappings {
      out.line(format!("{}: {},", quoted(code), self.element_name(ctx, error, id)?));
    }
    out.close("}");
    out.open("if not self.request_adapter:");
    out.line("raise Exception(\"Http core is null\")");
    out.dedent();

    let call = match shape {
      ResponseShape::NoContent => "send_no_response_content_async(request_info, error_mapping)".to_string(),
      ResponseShape::Primitive | ResponseShape::Enum => format!(
        "send_primitive_async(request_info, {}, error_mapping)",
        quoted(&self.element_name(ctx, ty, id)?)
      ),
      ResponseShape::PrimitiveCollection | ResponseShape::EnumCollection => format!(
        "send_primitive_collection_async(request_info, {}, error_mapping)",
        self.element_name(ctx, ty, id)?
      ),
      ResponseShape::Object => format!(
        "send_async(request_info, {}, error_mapping)",
        self.element_name(ctx, ty, id)?
      ),
      ResponseShape::ObjectCollection => format!(
        "send_collection_async(request_info, {}, error_mapping)",
        self.element_name(ctx, ty, id)?
      ),
    };
    out.line(format!("return await self.request_adapter.{call}"));
    out.dedent();
    Ok(())
  }

  fn write_generator(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let parameters = ctx.parameters(id);
    out.open(format!(
      "def {}({}) -> RequestInformation:",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?
    ));
    write_docstring(out, &Self::method_docs(ctx, id, Some("RequestInformation")));
    if let Some(body) = ctx.parameter_of_kind(id, ParameterKind::RequestBody) {
      Self::write_null_guards(ctx, out, &[body]);
    }
    out.line(format!(
      "request_info = RequestInformation(Method.{}, self.url_template, self.path_parameters)",
      ctx.http_verb(id)
    ));
    if let Some(parameter) = ctx.parameter_of_kind(id, ParameterKind::RequestConfiguration) {
      let name = ctx.parameter_name(parameter);
      out.open(format!("if {name}:"));
      out.line(format!("request_info.headers.add_all({name}.headers)"));
      out.line(format!("request_info.add_request_options({name}.options)"));
      if ctx.configuration_class(id).and_then(|class| ctx.query_parameters_class(class)).is_some() {
        out.line(format!(
          "request_info.set_query_string_parameters_from_raw_object({name}.query_parameters)"
        ));
      }
      out.dedent();
    }
    if !def.accepted_response_types.is_empty() {
      out.line(format!(
        "request_info.headers.try_add(\"Accept\", {})",
        quoted(&def.accepted_response_types.join(", "))
      ));
    }
    if let Some(body) = ctx.parameter_of_kind(id, ParameterKind::RequestBody)
      && let Some(body_def) = ctx.parameter_def(body)
    {
      let name = ctx.parameter_name(body);
      let content_type = quoted(def.request_body_content_type.as_deref().unwrap_or("application/octet-stream"));
      let line = match ValueShape::of(ctx.dom, &body_def.ty) {
        ValueShape::Primitive(Primitive::Stream) => format!("request_info.set_stream_content({name}, {content_type})"),
        ValueShape::Primitive(_) | ValueShape::Enum(_) => {
          format!("request_info.set_content_from_scalar(self.request_adapter, {content_type}, {name})")
        }
        ValueShape::Object(_) | ValueShape::Untyped => {
          format!("request_info.set_content_from_parsable(self.request_adapter, {content_type}, {name})")
        }
      };
      out.line(line);
    }
    out.line("return request_info");
    out.dedent();
    Ok(())
  }

  fn write_factory(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let class_name = ctx.declared_name(owner);
    let node = ctx
      .parameter_of_kind(id, ParameterKind::ParseNode)
      .map_or_else(|| "parse_node".to_string(), |parameter| ctx.parameter_name(parameter));
    let parameters = ctx.parameters(id);
    out.line("@staticmethod");
    out.open(format!(
      "def {}({}) -> {class_name}:",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?.trim_start_matches("self, ")
    ));
    write_docstring(out, &Self::method_docs(ctx, id, Some(&class_name)));
    Self::write_null_guards(ctx, out, &parameters);

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      return self.write_composed_factory(ctx, out, &layout, &class_name, &node);
    }

    if let Some(info) = ctx
      .class_def(owner)
      .and_then(|def| def.discriminator.as_ref())
      .filter(|info| !info.is_empty())
    {
      out.open("try:");
      out.line(format!(
        "mapping_value = {node}.get_child_node({}).get_str_value()",
        quoted(&info.property_name)
      ));
      out.dedent();
      out.open("except AttributeError:");
      out.line("mapping_value = None");
      out.dedent();
      for (value, ty) in info.mappings() {
        let Some(target) = ty.definition_id() else {
          continue;
        };
        out.open(format!(
          "if mapping_value and mapping_value.casefold() == {}.casefold():",
          quoted(value)
        ));
        if ctx.dom.top_level_declaration(target) != Some(ctx.declaration) {
          out.line(Self::import_line(ctx, target));
          out.blank();
        }
        out.line(format!("return {}()", ctx.declared_name(target)));
        out.dedent();
      }
    }
    out.line(format!("return {class_name}()"));
    out.dedent();
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
    let members = layout
      .mapped
      .iter()
      .map(|(_, member)| *member)
      .chain(layout.others.iter().copied())
      .chain(layout.fallback.iter().copied())
      .filter_map(|member| ctx.property_def(member).map(|def| def.ty))
      .collect::<Vec<_>>();
    Self::write_local_imports(ctx, out, members);
    out.line(format!("result = {class_name}()"));
    if let Some(discriminator) = layout.discriminator.as_deref().filter(|_| layout.has_mappings()) {
      out.open("try:");
      out.line(format!(
        "mapping_value = {node}.get_child_node({}).get_str_value()",
        quoted(discriminator)
      ));
      out.dedent();
      out.open("except AttributeError:");
      out.line("mapping_value = None");
      out.dedent();
    }

    let mut first = true;
    let mut branch = |out: &mut CodeWriter, condition: &str| {
      out.open(format!("{} {condition}:", if first { "if" } else { "elif" }));
      first = false;
    };
    if layout.has_mappings() {
      for (value, member) in &layout.mapped {
        let Some(def) = ctx.property_def(*member) else {
          continue;
        };
        branch(
          out,
          &format!("mapping_value and mapping_value.casefold() == {}.casefold()", quoted(value)),
        );
        out.line(format!(
          "result.{} = {}()",
          ctx.member_name(*member),
          self.element_name(ctx, &def.ty, *member)?
        ));
        out.dedent();
      }
    }
    for member in &layout.others {
      let Some(def) = ctx.property_def(*member) else {
        continue;
      };
      let read = self.read_value(ctx, &def.ty, *member)?.replacen("n.", &format!("{node}."), 1);
      let name = ctx.member_name(*member);
      branch(out, &format!("{name}_value := {read}"));
      out.line(format!("result.{name} = {name}_value"));
      out.dedent();
    }
    let has_branches = !first;
    if !layout.fallback.is_empty() {
      if has_branches {
        out.open("else:");
      }
      for member in &layout.fallback {
        let Some(def) = ctx.property_def(*member) else {
          continue;
        };
        out.line(format!(
          "result.{} = {}()",
          ctx.member_name(*member),
          self.element_name(ctx, &def.ty, *member)?
        ));
      }
      if has_branches {
        out.dedent();
      }
    }
    out.line("return result");
    out.dedent();
    Ok(())
  }

  fn write_deserializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    out.open(format!(
      "def {}(self) -> dict[str, Callable[[ParseNode], None]]:",
      ctx.member_name(id)
    ));
    write_docstring(
      out,
      &Self::method_docs(ctx, id, Some("dict[str, Callable[[ParseNode], None]]")),
    );

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      match layout.kind {
        ComposedKind::Union => {
          for member in &layout.objects {
            let name = ctx.member_name(*member);
            out.open(format!("if self.{name}:"));
            out.line(format!("return self.{name}.get_field_deserializers()"));
            out.dedent();
          }
          out.line("return {}");
        }
        ComposedKind::Intersection => {
          let members = layout
            .objects
            .iter()
            .map(|member| format!("self.{}", ctx.member_name(*member)))
            .join(", ");
          out.line(format!(
            "return ParseNodeHelper.merge_deserializers_for_intersection_wrapper({members})"
          ));
        }
      }
      out.dedent();
      return Ok(());
    }

    let properties = ctx.serialized_properties(owner);
    Self::write_local_imports(
      ctx,
      out,
      properties
        .iter()
        .filter_map(|property| ctx.property_def(*property).map(|def| def.ty)),
    );
    out.open("fields: dict[str, Callable[[Any], None]] = {");
    for property in properties {
      let Some(def) = ctx.property_def(property) else {
        continue;
      };
      out.line(format!(
        "{}: lambda n : setattr(self, '{}', {}),",
        quoted(&ctx.wire_name(property)),
        ctx.member_name(property),
        self.read_value(ctx, &def.ty, property)?
      ));
    }
    out.close("}");
    if ctx.dom.class_base(owner).is_some() {
      out.line("super_fields = super().get_field_deserializers()");
      out.line("fields.update(super_fields)");
    }
    out.line("return fields");
    out.dedent();
    Ok(())
  }

  fn write_serializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let parameters = ctx.parameters(id);
    out.open(format!(
      "def {}({}) -> None:",
      ctx.member_name(id),
      self.parameter_list(ctx, &parameters)?
    ));
    write_docstring(out, &Self::method_docs(ctx, id, Some("None")));
    Self::write_null_guards(ctx, out, &parameters);

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
        let value = format!("self.{}", ctx.member_name(member));
        out.open(format!("{} {value}:", if first { "if" } else { "elif" }));
        out.line(Self::write_value(ctx, &def.ty, "None", &value));
        out.dedent();
        first = false;
      }
      if layout.kind == ComposedKind::Intersection && !layout.objects.is_empty() {
        let members = layout
          .objects
          .iter()
          .map(|member| format!("self.{}", ctx.member_name(*member)))
          .join(", ");
        if first {
          out.line(format!("writer.write_object_value(None, {members})"));
        } else {
          out.open("else:");
          out.line(format!("writer.write_object_value(None, {members})"));
          out.dedent();
        }
      }
      out.dedent();
      return Ok(());
    }

    if ctx.dom.class_base(owner).is_some() {
      out.line("super().serialize(writer)");
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
        &format!("self.{}", ctx.member_name(property)),
      ));
    }
    if let Some(additional) = ctx.property_of_kind(owner, PropertyKind::AdditionalData) {
      out.line(format!("writer.write_additional_data_value(self.{})", ctx.member_name(additional)));
    }
    out.dedent();
    Ok(())
  }

  fn write_path_builder(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, return_type: &CodeType) -> GenerationResult<()> {
    let parameters = ctx.parameters(id);
    Self::write_null_guards(ctx, out, &parameters);
    Self::write_local_imports(ctx, out, [*return_type]);
    out.line("url_tpl_params = self.path_parameters.copy()");
    for parameter in &parameters {
      let name = ctx.parameter_name(*parameter);
      let assignment = format!("url_tpl_params[{}] = {name}", quoted(&ctx.serialization_name(*parameter)));
      if ctx.parameter_def(*parameter).is_some_and(|def| def.optional || def.ty.nullable) {
        out.open(format!("if {name} is not None:"));
        out.line(assignment);
        out.dedent();
      } else {
        out.line(assignment);
      }
    }
    out.line(format!(
      "return {}(url_tpl_params, self.request_adapter)",
      self.type_name(ctx, &return_type.non_null(), id)?
    ));
    Ok(())
  }

  fn write_query_parameter_mapper(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
    out.blank();
    out.open("def get_query_parameter(self, original_name: str) -> str:");
    write_docstring(
      out,
      &[
        "Maps the query parameters names to their encoded names for the URI template parsing.".to_string(),
        "param original_name: The original query parameter name in the class.".to_string(),
        "Returns: str".to_string(),
      ],
    );
    out.open("if original_name is None:");
    out.line("raise TypeError(\"original_name cannot be null.\")");
    out.dedent();
    for property in ctx.properties(id) {
      let member = ctx.member_name(property);
      let wire = ctx.wire_name(property);
      if member != wire {
        out.open(format!("if original_name == {}:", quoted(&member)));
        out.line(format!("return {}", quoted(&wire)));
        out.dedent();
      }
    }
    out.line("return original_name");
    out.dedent();
  }

  fn has_members(ctx: &RenderContext<'_>, id: ElementId) -> bool {
    ctx.dom.children(id).iter().any(|child| {
      !matches!(
        ctx.dom.element(*child).tag(),
        ElementTag::Using | ElementTag::BlockEnd
      )
    })
  }
}

impl LanguageRenderer for PythonRenderer {
  fn primitive_name(&self, primitive: Primitive) -> Option<&'static str> {
    Some(match primitive {
      Primitive::String => "str",
      Primitive::Boolean => "bool",
      Primitive::Int8 | Primitive::Int32 | Primitive::Int64 => "int",
      Primitive::Float32 | Primitive::Float64 => "float",
      Primitive::Decimal => "Decimal",
      Primitive::DateTime => "datetime.datetime",
      Primitive::Date => "datetime.date",
      Primitive::Time => "datetime.time",
      Primitive::Duration => "datetime.timedelta",
      Primitive::Guid => "UUID",
      Primitive::Binary | Primitive::Stream => "bytes",
      Primitive::Void => "None",
      Primitive::UntypedNode => "UntypedNode",
    })
  }

  fn abstraction_name(&self, abstraction: Abstraction) -> &'static str {
    match abstraction {
      Abstraction::RequestAdapter => "RequestAdapter",
      Abstraction::RequestInformation => "RequestInformation",
      Abstraction::RequestOption => "RequestOption",
      Abstraction::RequestHeaders => "HeadersCollection",
      Abstraction::ParseNode => "ParseNode",
      Abstraction::SerializationWriter => "SerializationWriter",
      Abstraction::BackingStore => "BackingStore",
      Abstraction::BackingStoreFactory => "BackingStoreFactory",
      Abstraction::PathParameters | Abstraction::AdditionalData => "dict[str, Any]",
      Abstraction::ErrorMappings => "dict[str, type[ParsableFactory]]",
      Abstraction::ApiException => "APIError",
    }
  }

  fn decorate(&self, base: String, ty: &CodeType) -> String {
    let base = if ty.is_collection() { format!("list[{base}]") } else { base };
    if ty.nullable && base != "None" {
      format!("Optional[{base}]")
    } else {
      base
    }
  }

  fn write_prologue(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    out.line(format!("# {GENERATED_BANNER}"));
    out.line("from __future__ import annotations");

    let declaration = ctx.declaration;
    let kind = ctx.dom.element(declaration).class_kind();
    let mut plain = BTreeSet::new();
    let mut modules: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut add = |module: &'static str, symbol: &'static str| {
      modules.entry(module).or_default().insert(symbol);
    };
    add("typing", "Any");
    add("typing", "Optional");
    add("typing", "TYPE_CHECKING");
    add("typing", "Union");

    match kind {
      Some(ClassKind::Enum) => add("enum", "Enum"),
      Some(ClassKind::RequestBuilder) => {
        add("dataclasses", "dataclass");
        add("dataclasses", "field");
        add("kiota_abstractions.method", "Method");
        add("kiota_abstractions.request_adapter", "RequestAdapter");
        add("kiota_abstractions.request_information", "RequestInformation");
        add("kiota_abstractions.request_option", "RequestOption");
        add("kiota_abstractions.headers_collection", "HeadersCollection");
        add(SERIALIZATION_MODULE, "Parsable");
        add(SERIALIZATION_MODULE, "ParsableFactory");
      }
      Some(ClassKind::ComposedType(composed)) => {
        add("dataclasses", "dataclass");
        add("typing", "Callable");
        add(SERIALIZATION_MODULE, "ComposedTypeWrapper");
        add(SERIALIZATION_MODULE, "Parsable");
        add(SERIALIZATION_MODULE, "ParseNode");
        add(SERIALIZATION_MODULE, "SerializationWriter");
        if composed == ComposedKind::Intersection {
          add(SERIALIZATION_MODULE, "ParseNodeHelper");
        }
      }
      _ => {
        add("dataclasses", "dataclass");
        add("dataclasses", "field");
        add("typing", "Callable");
        add(SERIALIZATION_MODULE, "Parsable");
        add(SERIALIZATION_MODULE, "ParseNode");
        add(SERIALIZATION_MODULE, "SerializationWriter");
        if ctx.property_of_kind(declaration, PropertyKind::AdditionalData).is_some() {
          add(SERIALIZATION_MODULE, "AdditionalDataHolder");
        }
        if ctx.property_of_kind(declaration, PropertyKind::BackingStore).is_some() {
          add(STORE_MODULE, "BackedModel");
          add(STORE_MODULE, "BackingStore");
          add(STORE_MODULE, "BackingStoreFactorySingleton");
        }
      }
    }

    let (declarations, abstractions) = ctx.usings();
    for abstraction in abstractions {
      if let Some((module, symbol)) = abstraction_import(abstraction) {
        add(module, symbol);
      }
    }
    for primitive in ctx.primitives_used() {
      match primitive {
        Primitive::DateTime | Primitive::Date | Primitive::Time | Primitive::Duration => {
          plain.insert("import datetime");
        }
        Primitive::Guid => add("uuid", "UUID"),
        Primitive::Decimal => add("decimal", "Decimal"),
        Primitive::UntypedNode => add("kiota_abstractions.serialization.untyped_node", "UntypedNode"),
        _ => {}
      }
    }

    for line in plain {
      out.line(line);
    }
    for (module, symbols) in modules {
      out.line(format!(
        "from {module} import {}",
        symbols.into_iter().collect::<Vec<_>>().join(", ")
      ));
    }

    // Base classes must exist at class creation; everything else is only needed for
    // annotations and is imported lazily.
    let bases = ctx
      .class_def(declaration)
      .and_then(|def| def.base_class)
      .and_then(|base| ctx.dom.top_level_declaration(base))
      .into_iter()
      .collect::<BTreeSet<_>>();
    let mut eager = vec![];
    let mut lazy = vec![];
    for target in declarations {
      let line = Self::import_line(ctx, target);
      if bases.contains(&target) {
        eager.push(line);
      } else {
        lazy.push(line);
      }
    }
    eager.sort();
    lazy.sort();
    if !eager.is_empty() {
      out.blank();
      for line in eager {
        out.line(line);
      }
    }
    if !lazy.is_empty() {
      out.blank();
      out.open("if TYPE_CHECKING:");
      for line in lazy {
        out.line(line);
      }
      out.dedent();
    }
    out.blank();
    Ok(())
  }

  fn write_type_start(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    out.blank();
    let name = ctx.conventions.type_name(ctx.name(id));
    let Some(def) = ctx.class_def(id) else {
      return Ok(());
    };
    let bases = match def.kind {
      ClassKind::Enum => "str, Enum".to_string(),
      ClassKind::Model => {
        let mut bases = vec![];
        if let Some(base) = def.base_class {
          bases.push(ctx.declared_name(base));
        }
        if ctx.property_of_kind(id, PropertyKind::AdditionalData).is_some() {
          bases.push("AdditionalDataHolder".to_string());
        }
        if def.base_class.is_none() && def.is_error {
          bases.push("APIError".to_string());
        }
        if ctx.property_of_kind(id, PropertyKind::BackingStore).is_some() {
          bases.push("BackedModel".to_string());
        }
        if def.base_class.is_none() {
          bases.push("Parsable".to_string());
        }
        bases.join(", ")
      }
      ClassKind::ComposedType(_) => "ComposedTypeWrapper, Parsable".to_string(),
      ClassKind::RequestBuilder | ClassKind::QueryParameters | ClassKind::RequestConfiguration => String::new(),
    };
    if !matches!(def.kind, ClassKind::Enum | ClassKind::RequestBuilder) {
      out.line("@dataclass");
    }
    out.open(format!("class {name}({bases}):"));
    let docs = ctx
      .documentation(id)
      .map(doc_lines)
      .unwrap_or_default()
      .into_iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>();
    write_docstring(out, &docs);
    Ok(())
  }

  fn write_members_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    if ctx.dom.element(id).class_kind() == Some(ClassKind::QueryParameters) {
      Self::write_query_parameter_mapper(ctx, out, id);
    }
    Ok(())
  }

  fn write_block_end(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, owner: ElementId) -> GenerationResult<()> {
    if !Self::has_members(ctx, owner) && ctx.documentation(owner).is_none() {
      out.line("pass");
    }
    out.dedent();
    out.blank();
    Ok(())
  }

  fn write_property(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.property_def(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    let comment = |out: &mut CodeWriter| {
      if let Some(text) = ctx.documentation(id) {
        for line in doc_lines(text) {
          out.line(format!("# {line}"));
        }
      }
    };
    match def.kind {
      PropertyKind::Custom | PropertyKind::QueryParameter => {
        comment(out);
        let ty = self.type_name(ctx, &def.ty.with_nullable(true), id)?;
        out.line(format!("{name}: {ty} = None"));
      }
      PropertyKind::AdditionalData => {
        comment(out);
        out.line(format!("{name}: dict[str, Any] = field(default_factory=dict)"));
      }
      PropertyKind::BackingStore => {
        comment(out);
        out.line(format!(
          "{name}: BackingStore = field(default_factory=BackingStoreFactorySingleton(backing_store_factory=None).backing_store_factory.create_backing_store, repr=False)"
        ));
      }
      PropertyKind::Headers => {
        comment(out);
        out.line(format!("{name}: HeadersCollection = field(default_factory=HeadersCollection)"));
      }
      PropertyKind::Options => {
        comment(out);
        out.line(format!("{name}: list[RequestOption] = field(default_factory=list)"));
      }
      PropertyKind::QueryParameters => {
        comment(out);
        let ty = self.type_name(ctx, &def.ty.with_nullable(true), id)?;
        out.line(format!("{name}: {ty} = None"));
      }
      PropertyKind::RequestBuilder => {
        let ty = self.type_name(ctx, &def.ty.non_null(), id)?;
        out.blank();
        out.line("@property");
        out.open(format!("def {name}(self) -> {ty}:"));
        let docs = ctx
          .documentation(id)
          .map(doc_lines)
          .unwrap_or_default()
          .into_iter()
          .map(ToString::to_string)
          .collect::<Vec<_>>();
        write_docstring(out, &docs);
        Self::write_local_imports(ctx, out, [def.ty]);
        out.line(format!("return {ty}(self.path_parameters, self.request_adapter)"));
        out.dedent();
      }
      PropertyKind::UrlTemplate => {
        out.line(format!(
          "{name}: str = {}",
          quoted(def.default_value.as_deref().unwrap_or_default())
        ));
      }
      PropertyKind::RequestAdapter | PropertyKind::PathParameters => {
        comment(out);
        out.line(format!("{name}: {}", self.type_name(ctx, &def.ty, id)?));
      }
    }
    Ok(())
  }

  fn write_method(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    if def.kind == MethodKind::RawUrlConstructor {
      return Ok(());
    }
    out.blank();
    match def.kind {
      kind @ (MethodKind::ClientConstructor | MethodKind::Constructor) => self.write_constructor(ctx, out, id, kind),
      MethodKind::RequestExecutor => self.write_executor(ctx, out, id),
      MethodKind::RequestGenerator => self.write_generator(ctx, out, id),
      MethodKind::Factory => self.write_factory(ctx, out, id),
      MethodKind::Deserializer => self.write_deserializer(ctx, out, id),
      MethodKind::Serializer => self.write_serializer(ctx, out, id),
      MethodKind::RawUrlBuilder => {
        let return_type = self.type_name(ctx, &def.return_type.non_null(), id)?;
        let parameters = ctx.parameters(id);
        out.open(format!(
          "def {}({}) -> {return_type}:",
          ctx.member_name(id),
          self.parameter_list(ctx, &parameters)?
        ));
        write_docstring(out, &Self::method_docs(ctx, id, Some(&return_type)));
        Self::write_null_guards(ctx, out, &parameters);
        let raw_url = ctx
          .parameter_of_kind(id, ParameterKind::RawUrl)
          .map_or_else(|| "raw_url".to_string(), |parameter| ctx.parameter_name(parameter));
        out.line(format!("return {return_type}({raw_url}, self.request_adapter)"));
        out.dedent();
        Ok(())
      }
      MethodKind::RequestBuilderWithParameters => {
        let return_type = self.type_name(ctx, &def.return_type.non_null(), id)?;
        out.open(format!(
          "def {}({}) -> {return_type}:",
          ctx.member_name(id),
          self.parameter_list(ctx, &ctx.parameters(id))?
        ));
        write_docstring(out, &Self::method_docs(ctx, id, Some(&return_type)));
        self.write_path_builder(ctx, out, id, &def.return_type)?;
        out.dedent();
        Ok(())
      }
      _ => {
        let return_type = self.type_name(ctx, &def.return_type, id)?;
        out.open(format!(
          "def {}({}) -> {return_type}:",
          ctx.member_name(id),
          self.parameter_list(ctx, &ctx.parameters(id))?
        ));
        write_docstring(out, &Self::method_docs(ctx, id, None));
        out.line("raise NotImplementedError()");
        out.dedent();
        Ok(())
      }
    }
  }

  fn write_indexer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.dom.element(id).as_indexer() else {
      return Ok(());
    };
    let return_type = self.type_name(ctx, &def.return_type.non_null(), id)?;
    out.blank();
    out.open(format!(
      "def {}({}) -> {return_type}:",
      ctx.indexer_method_name(id),
      self.parameter_list(ctx, &ctx.parameters(id))?
    ));
    write_docstring(out, &Self::method_docs(ctx, id, Some(&return_type)));
    self.write_path_builder(ctx, out, id, &def.return_type)?;
    out.dedent();
    Ok(())
  }

  fn write_constant(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.dom.element(id).as_constant() else {
      return Ok(());
    };
    out.line(format!("{} = {}", ctx.conventions.type_name(ctx.name(id)), quoted(&def.value)));
    Ok(())
  }
}
