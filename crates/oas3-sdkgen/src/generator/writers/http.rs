use std::collections::{BTreeMap, BTreeSet};

use percent_encoding::percent_decode_str;

use super::{CodeWriter, LanguageRenderer, RenderContext, ValueShape, doc_lines, quoted};
use crate::{
  generator::{
    codedom::{
      Abstraction, ClassKind, CodeDom, CodeType, ElementId, ElementTag, MethodKind, ParameterKind, Primitive,
      PropertyKind,
    },
    errors::GenerationResult,
  },
  naming::identifiers::{cleanup_symbol_name, to_first_character_lower_case},
};

/// Variable holding the server URL in every snippet file.
const URL_VARIABLE: &str = "url";
const DEFAULT_SERVER: &str = "http://localhost";
/// Nesting limit for example bodies of self-referencing models.
const MAX_BODY_DEPTH: usize = 4;

/// Writes one `.http` file per request builder, one request per operation.
pub(crate) struct HttpRenderer;

/// Snippet variable spelling of a URL template variable.
fn variable_name(template_name: &str) -> String {
  let decoded = percent_decode_str(template_name).decode_utf8_lossy();
  to_first_character_lower_case(&cleanup_symbol_name(&decoded))
}

/// Expands a URL template into a snippet URL, turning every variable into a snippet
/// variable reference.
///
/// `{+baseurl}/users/{user%2Did}{?top,skip}` becomes
/// `{{url}}/users/{{userId}}?top={{top}}&skip={{skip}}`; query keys are percent-decoded.
/// The template of a request builder lists the query parameters of all its operations,
/// so only the ones in `query_names` are kept.
pub(crate) fn snippet_url(template: &str, query_names: &BTreeMap<String, String>) -> String {
  let mut url = String::with_capacity(template.len() + 16);
  let mut rest = template;
  let mut has_query = false;
  while let Some(start) = rest.find('{') {
    url.push_str(&rest[..start]);
    let Some(end) = rest[start..].find('}') else {
      url.push_str(&rest[start..]);
      return url;
    };
    let expression = &rest[start + 1..start + end];
    rest = &rest[start + end + 1..];

    if let Some(names) = expression.strip_prefix('?').or_else(|| expression.strip_prefix('&')) {
      for name in names.split(',').map(|name| name.trim_end_matches('*')) {
        let Some(variable) = query_names.get(name) else {
          continue;
        };
        url.push(if has_query { '&' } else { '?' });
        has_query = true;
        let key = percent_decode_str(name).decode_utf8_lossy();
        url.push_str(&format!("{key}={{{{{variable}}}}}"));
      }
      continue;
    }

    let name = expression.trim_start_matches('+').trim_end_matches('*');
    if name.eq_ignore_ascii_case(super::BASE_URL_KEY) {
      url.push_str(&format!("{{{{{URL_VARIABLE}}}}}"));
    } else {
      url.push_str(&format!("{{{{{}}}}}", variable_name(name)));
    }
  }
  url.push_str(rest);
  url
}

/// Path variables of a URL template, in order of appearance.
fn path_variables(template: &str) -> Vec<&str> {
  let mut variables = vec![];
  let mut rest = template;
  while let Some(start) = rest.find('{') {
    let Some(end) = rest[start..].find('}') else {
      break;
    };
    let expression = &rest[start + 1..start + end];
    rest = &rest[start + end + 1..];
    if expression.starts_with(['?', '&']) {
      continue;
    }
    let name = expression.trim_start_matches('+').trim_end_matches('*');
    if !name.eq_ignore_ascii_case(super::BASE_URL_KEY) && !variables.contains(&name) {
      variables.push(name);
    }
  }
  variables
}

/// Server URL declared by the client constructor, without a trailing slash.
fn server_url(dom: &CodeDom) -> String {
  dom
    .ids()
    .filter_map(|id| dom.element(id).as_method())
    .find(|def| def.kind == MethodKind::ClientConstructor)
    .and_then(|def| def.base_url.as_deref())
    .unwrap_or(DEFAULT_SERVER)
    .trim_end_matches('/')
    .to_string()
}

fn write_comment(out: &mut CodeWriter, text: Option<&str>) {
  if let Some(text) = text {
    for line in doc_lines(text) {
      out.line(format!("# {line}"));
    }
  }
}

impl HttpRenderer {
  fn executors(ctx: &RenderContext<'_>, class: ElementId) -> Vec<ElementId> {
    ctx
      .dom
      .children_of_kind(class, ElementTag::Method)
      .filter(|method| {
        ctx
          .method_def(*method)
          .is_some_and(|def| def.kind == MethodKind::RequestExecutor)
      })
      .collect()
  }

  /// Query parameters of an executor, wire name to property.
  fn query_parameters(ctx: &RenderContext<'_>, executor: ElementId) -> Vec<(String, ElementId)> {
    let Some(query) = ctx
      .configuration_class(executor)
      .and_then(|configuration| ctx.query_parameters_class(configuration))
    else {
      return vec![];
    };
    ctx
      .properties(query)
      .into_iter()
      .filter(|property| {
        ctx
          .property_def(*property)
          .is_some_and(|def| def.kind == PropertyKind::QueryParameter)
      })
      .map(|property| (ctx.wire_name(property), property))
      .collect()
  }

  /// Documentation of a path variable, taken from the path parameter of any method
  /// that declares it.
  fn path_documentation<'a>(ctx: &'a RenderContext<'_>, class: ElementId, name: &str) -> Option<&'a str> {
    ctx
      .dom
      .children_of_kind(class, ElementTag::Method)
      .flat_map(|method| ctx.parameters(method))
      .find(|parameter| {
        ctx
          .parameter_def(*parameter)
          .is_some_and(|def| def.kind == ParameterKind::Path)
          && ctx.serialization_name(*parameter) == name
      })
      .and_then(|parameter| ctx.documentation(parameter))
  }

  fn example_value(ctx: &RenderContext<'_>, ty: &CodeType, out: &mut CodeWriter, prefix: &str, suffix: &str, depth: usize) {
    if ty.is_collection() {
      out.line(format!("{prefix}[]{suffix}"));
      return;
    }
    match ValueShape::of(ctx.dom, ty) {
      ValueShape::Primitive(
        Primitive::Int8 | Primitive::Int32 | Primitive::Int64 | Primitive::Float32 | Primitive::Float64 | Primitive::Decimal,
      ) => out.line(format!("{prefix}0{suffix}")),
      ValueShape::Primitive(Primitive::String) => out.line(format!("{prefix}\"string\"{suffix}")),
      ValueShape::Primitive(Primitive::Boolean) => out.line(format!("{prefix}false{suffix}")),
      ValueShape::Enum(id) => {
        let first = ctx
          .dom
          .children_of_kind(id, ElementTag::Constant)
          .find_map(|constant| ctx.dom.element(constant).as_constant())
          .map_or_else(|| "null".to_string(), |def| quoted(&def.value));
        out.line(format!("{prefix}{first}{suffix}"));
      }
      ValueShape::Object(id) if depth < MAX_BODY_DEPTH && ctx.dom.element(id).class_kind() == Some(ClassKind::Model) => {
        out.open(format!("{prefix}{{"));
        Self::write_properties(ctx, out, id, depth + 1);
        out.close(format!("}}{suffix}"));
      }
      _ => out.line(format!("{prefix}null{suffix}")),
    }
  }

  /// Writes the serialized members of `class` and its bases as JSON members.
  fn write_properties(ctx: &RenderContext<'_>, out: &mut CodeWriter, class: ElementId, depth: usize) {
    let mut seen = BTreeSet::new();
    let mut properties = vec![];
    let mut current = Some(class);
    while let Some(id) = current {
      for property in ctx.serialized_properties(id) {
        let Some(def) = ctx.property_def(property) else {
          continue;
        };
        if def.kind == PropertyKind::Custom && !def.read_only && seen.insert(ctx.wire_name(property)) {
          properties.push(property);
        }
      }
      current = ctx.dom.class_base(id);
    }

    let count = properties.len();
    for (index, property) in properties.into_iter().enumerate() {
      let Some(def) = ctx.property_def(property) else {
        continue;
      };
      let suffix = if index + 1 < count { "," } else { "" };
      let prefix = format!("{}: ", quoted(&ctx.wire_name(property)));
      Self::example_value(ctx, &def.ty, out, &prefix, suffix, depth);
    }
  }

  fn write_request(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, executor: ElementId, template: &str) {
    let Some(def) = ctx.method_def(executor) else {
      return;
    };
    let query = Self::query_parameters(ctx, executor);
    let names = query
      .iter()
      .map(|(wire, property)| (wire.clone(), ctx.member_name(*property)))
      .collect::<BTreeMap<_, _>>();

    for (_, property) in &query {
      write_comment(out, ctx.documentation(*property));
      out.line(format!("@{} = ", ctx.member_name(*property)));
      out.blank();
    }

    write_comment(out, ctx.documentation(executor));
    out.line(format!("{} {} HTTP/1.1", ctx.http_verb(executor), snippet_url(template, &names)));
    if !def.accepted_response_types.is_empty() {
      out.line(format!("Accept: {}", def.accepted_response_types.join(", ")));
    }

    let Some(body) = ctx.parameter_of_kind(executor, ParameterKind::RequestBody) else {
      return;
    };
    let Some(body_def) = ctx.parameter_def(body) else {
      return;
    };
    out.line(format!(
      "Content-Type: {}",
      def.request_body_content_type.as_deref().unwrap_or("application/octet-stream")
    ));
    out.line("");
    match ValueShape::of(ctx.dom, &body_def.ty) {
      ValueShape::Primitive(Primitive::Stream | Primitive::Binary) => out.line("< ./body.bin"),
      _ => Self::example_value(ctx, &body_def.ty, out, "", "", 0),
    }
  }
}

impl LanguageRenderer for HttpRenderer {
  fn primitive_name(&self, primitive: Primitive) -> Option<&'static str> {
    Some(match primitive {
      Primitive::String => "String",
      Primitive::Boolean => "Bool",
      Primitive::Int8 => "Int8",
      Primitive::Int32 => "Int32",
      Primitive::Int64 => "Int64",
      Primitive::Float32 => "Float32",
      Primitive::Float64 | Primitive::Decimal => "Float64",
      Primitive::DateTime | Primitive::Date | Primitive::Time => "Date",
      Primitive::Duration => "Duration",
      Primitive::Guid => "UUID",
      Primitive::Binary | Primitive::Stream => "[UInt8]",
      Primitive::Void => "Void",
      Primitive::UntypedNode => "object",
    })
  }

  fn abstraction_name(&self, _abstraction: Abstraction) -> &'static str {
    "object"
  }

  fn decorate(&self, base: String, ty: &CodeType) -> String {
    if ty.is_collection() { format!("[{base}]") } else { base }
  }

  fn emits(&self, dom: &CodeDom, id: ElementId) -> bool {
    dom.element(id).class_kind() == Some(ClassKind::RequestBuilder)
      && dom
        .children_of_kind(id, ElementTag::Method)
        .any(|method| dom.element(method).method_kind() == Some(MethodKind::RequestExecutor))
  }

  fn render_file(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    let class = ctx.declaration;
    let template = ctx.url_template(class);

    if let Some(text) = ctx.documentation(class) {
      for line in doc_lines(text) {
        out.line(format!("### {line}"));
      }
      out.blank();
    }

    out.line("# Base url for the server/host");
    out.line(format!("@{URL_VARIABLE} = {}", server_url(ctx.dom)));
    out.blank();

    out.line(format!("# {template}"));
    out.blank();

    for name in path_variables(&template) {
      write_comment(out, Self::path_documentation(ctx, class, name));
      out.line(format!("@{} = ", variable_name(name)));
      out.blank();
    }

    let executors = Self::executors(ctx, class);
    let count = executors.len();
    for (index, executor) in executors.into_iter().enumerate() {
      self.write_request(ctx, out, executor, &template);
      if index + 1 < count {
        out.blank();
        out.line("###");
        out.blank();
      }
    }
    Ok(())
  }

  fn write_prologue(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter) -> GenerationResult<()> {
    Ok(())
  }

  fn write_type_start(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter, _id: ElementId) -> GenerationResult<()> {
    Ok(())
  }

  fn write_block_end(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter, _owner: ElementId) -> GenerationResult<()> {
    Ok(())
  }

  fn write_property(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter, _id: ElementId) -> GenerationResult<()> {
    Ok(())
  }

  fn write_method(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter, _id: ElementId) -> GenerationResult<()> {
    Ok(())
  }

  fn write_indexer(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter, _id: ElementId) -> GenerationResult<()> {
    Ok(())
  }

  fn write_constant(&self, _ctx: &RenderContext<'_>, _out: &mut CodeWriter, _id: ElementId) -> GenerationResult<()> {
    Ok(())
  }
}
