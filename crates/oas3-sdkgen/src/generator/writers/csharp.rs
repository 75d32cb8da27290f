use std::collections::BTreeSet;

use itertools::Itertools;

use super::{
  BASE_URL_KEY, CodeWriter, ComposedLayout, GENERATED_BANNER, LanguageRenderer, RAW_URL_KEY, RenderContext, ResponseShape,
  ValueShape, doc_lines, element_type, quoted,
};
use crate::generator::{
  codedom::{
    Abstraction, Access, ClassKind, CodeType, CollectionKind, ComposedKind, ElementId, ElementKind, MethodKind,
    ParameterKind, Primitive, PropertyKind,
  },
  errors::GenerationResult,
  writers::Casing,
};

const ABSTRACTIONS_NAMESPACE: &str = "Microsoft.Kiota.Abstractions";
const SERIALIZATION_NAMESPACE: &str = "Microsoft.Kiota.Abstractions.Serialization";
const EXTENSIONS_NAMESPACE: &str = "Microsoft.Kiota.Abstractions.Extensions";
const STORE_NAMESPACE: &str = "Microsoft.Kiota.Abstractions.Store";

pub(crate) struct CSharpRenderer;

fn access(access: Access) -> &'static str {
  match access {
    Access::Public => "public",
    Access::Protected => "protected",
    Access::Private => "private",
  }
}

fn xml_escaped(text: &str) -> String {
  text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// `ApiSdk.todos.item` becomes `ApiSdk.Todos.Item`.
fn namespace(dotted: &str) -> String {
  dotted
    .split('.')
    .map(|segment| Casing::Pascal.apply(segment))
    .join(".")
}

fn abstraction_namespace(abstraction: Abstraction) -> &'static str {
  match abstraction {
    Abstraction::ParseNode | Abstraction::SerializationWriter | Abstraction::AdditionalData => SERIALIZATION_NAMESPACE,
    Abstraction::BackingStore | Abstraction::BackingStoreFactory => STORE_NAMESPACE,
    Abstraction::RequestAdapter
    | Abstraction::RequestInformation
    | Abstraction::RequestOption
    | Abstraction::RequestHeaders
    | Abstraction::PathParameters
    | Abstraction::ErrorMappings
    | Abstraction::ApiException => ABSTRACTIONS_NAMESPACE,
  }
}

fn write_summary(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
  let Some(text) = ctx.documentation(id) else {
    return;
  };
  out.line("/// <summary>");
  for line in doc_lines(text) {
    out.line(format!("/// {}", xml_escaped(line)));
  }
  out.line("/// </summary>");
}

fn write_obsolete(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
  if ctx.is_deprecated(id) {
    out.line("[Obsolete(\"\")]");
  }
}

/// Opens the next branch of an `if`/`else if` chain.
fn branch(out: &mut CodeWriter, first: &mut bool, condition: &str) {
  let keyword = if *first { "if" } else { "else if" };
  *first = false;
  out.line(format!("{keyword}({condition})"));
  out.open("{");
}

impl CSharpRenderer {
  fn method_name(ctx: &RenderContext<'_>, id: ElementId) -> String {
    let name = ctx.member_name(id);
    match ctx.method_def(id) {
      Some(def) if def.is_async => format!("{name}Async"),
      _ => name,
    }
  }

  fn element_name(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    self.type_name(ctx, &element_type(ty), id)
  }

  /// Factory expression for parsable types.
  fn factory(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId) -> GenerationResult<String> {
    Ok(format!("{}.CreateFromDiscriminatorValue", self.element_name(ctx, ty, id)?))
  }

  fn collection_suffix(ty: &CodeType) -> &'static str {
    match ty.collection {
      CollectionKind::Array => "?.ToArray()",
      CollectionKind::Complex | CollectionKind::None => "?.AsList()",
    }
  }

  /// Reads a value of `ty` from the parse node `node`.
  fn read_value(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId, node: &str) -> GenerationResult<String> {
    let shape = ValueShape::of(ctx.dom, ty);
    let stem = shape.accessor_stem(ty.is_collection());
    let element = self.element_name(ctx, ty, id)?;
    Ok(match (shape, ty.is_collection()) {
      (ValueShape::Primitive(_), false) => format!("{node}.Get{stem}()"),
      (ValueShape::Enum(_), false) => format!("{node}.Get{stem}<{element}>()"),
      (ValueShape::Primitive(_) | ValueShape::Enum(_), true) => {
        format!("{node}.Get{stem}<{element}>(){}", Self::collection_suffix(ty))
      }
      (ValueShape::Object(_) | ValueShape::Untyped, false) => {
        format!("{node}.Get{stem}<{element}>({})", self.factory(ctx, ty, id)?)
      }
      (ValueShape::Object(_) | ValueShape::Untyped, true) => format!(
        "{node}.Get{stem}<{element}>({}){}",
        self.factory(ctx, ty, id)?,
        Self::collection_suffix(ty)
      ),
    })
  }

  /// Writes `value` under `key` (`null` for the root value).
  fn write_value(&self, ctx: &RenderContext<'_>, ty: &CodeType, id: ElementId, key: &str, value: &str) -> GenerationResult<String> {
    let shape = ValueShape::of(ctx.dom, ty);
    let stem = shape.accessor_stem(ty.is_collection());
    let element = self.element_name(ctx, ty, id)?;
    Ok(match shape {
      ValueShape::Primitive(_) if !ty.is_collection() => format!("writer.Write{stem}({key}, {value});"),
      _ => format!("writer.Write{stem}<{element}>({key}, {value});"),
    })
  }

  fn parameter_list(&self, ctx: &RenderContext<'_>, method: ElementId) -> GenerationResult<String> {
    let mut rendered = vec![];
    for parameter in ctx.parameters(method) {
      let Some(def) = ctx.parameter_def(parameter) else {
        continue;
      };
      let name = ctx.parameter_name(parameter);
      let ty = match def.kind {
        ParameterKind::RequestConfiguration => {
          format!("Action<{}>?", self.type_name(ctx, &def.ty.non_null(), parameter)?)
        }
        _ => self.type_name(ctx, &def.ty, parameter)?,
      };
      if def.optional {
        rendered.push(format!("{ty} {name} = default"));
      } else {
        rendered.push(format!("{ty} {name}"));
      }
    }
    if ctx.method_def(method).is_some_and(|def| def.is_async) {
      rendered.push("CancellationToken cancellationToken = default".to_string());
    }
    Ok(rendered.join(", "))
  }

  fn write_method_docs(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
    write_summary(ctx, out, id);
    for parameter in ctx.parameters(id) {
      if let Some(text) = ctx.documentation(parameter) {
        let text = doc_lines(text).join(" ");
        out.line(format!(
          "/// <param name=\"{}\">{}</param>",
          ctx.parameter_name(parameter),
          xml_escaped(&text)
        ));
      }
    }
  }

  fn write_null_guards(ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) {
    for parameter in ctx.parameters(id) {
      let Some(def) = ctx.parameter_def(parameter) else {
        continue;
      };
      if !def.optional
        && matches!(
          def.kind,
          ParameterKind::RequestBody
            | ParameterKind::RequestAdapter
            | ParameterKind::ParseNode
            | ParameterKind::Serializer
            | ParameterKind::RawUrl
        )
      {
        let name = ctx.parameter_name(parameter);
        out.line(format!("_ = {name} ?? throw new ArgumentNullException(nameof({name}));"));
      }
    }
  }

  fn write_constructor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId, kind: MethodKind) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let class_name = ctx.conventions.type_name(ctx.name(owner));
    out.line(format!("public {class_name}({})", self.parameter_list(ctx, id)?));
    out.open("{");
    Self::write_null_guards(ctx, out, id);
    let adapter = ctx
      .parameter_of_kind(id, ParameterKind::RequestAdapter)
      .map_or_else(|| "requestAdapter".to_string(), |parameter| ctx.parameter_name(parameter));
    match kind {
      MethodKind::ClientConstructor => {
        out.line("PathParameters = new Dictionary<string, object>();");
        out.line(format!("RequestAdapter = {adapter};"));
        if let Some(base_url) = ctx.base_url(id) {
          out.line("if(string.IsNullOrEmpty(RequestAdapter.BaseUrl))");
          out.open("{");
          out.line(format!("RequestAdapter.BaseUrl = {};", quoted(base_url)));
          out.close("}");
        }
        out.line(format!("PathParameters.TryAdd({}, RequestAdapter.BaseUrl);", quoted(BASE_URL_KEY)));
        if let Some(store) = ctx.parameter_of_kind(id, ParameterKind::BackingStore) {
          out.line(format!("RequestAdapter.EnableBackingStore({});", ctx.parameter_name(store)));
        }
      }
      MethodKind::Constructor => {
        let path_parameters = ctx
          .parameter_of_kind(id, ParameterKind::PathParameters)
          .map_or_else(|| "pathParameters".to_string(), |parameter| ctx.parameter_name(parameter));
        out.line(format!(
          "PathParameters = new Dictionary<string, object>({path_parameters});"
        ));
        for parameter in ctx.parameters(id) {
          if ctx.parameter_def(parameter).is_some_and(|def| def.kind == ParameterKind::Path) {
            let name = ctx.parameter_name(parameter);
            out.line(format!(
              "if({name} != null) PathParameters.Add({}, {name});",
              quoted(&ctx.serialization_name(parameter))
            ));
          }
        }
        out.line(format!("RequestAdapter = {adapter};"));
      }
      _ => {
        let raw_url = ctx
          .parameter_of_kind(id, ParameterKind::RawUrl)
          .map_or_else(|| "rawUrl".to_string(), |parameter| ctx.parameter_name(parameter));
        out.line(format!(
          "PathParameters = new Dictionary<string, object> {{ {{ {}, {raw_url} }} }};",
          quoted(RAW_URL_KEY)
        ));
        out.line(format!("RequestAdapter = {adapter};"));
      }
    }
    out.close("}");
    Ok(())
  }

  fn write_executor(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let name = Self::method_name(ctx, id);
    let shape = ResponseShape::of(ctx.dom, &def.return_type);
    let return_type = match shape {
      ResponseShape::NoContent => "Task".to_string(),
      _ => format!("Task<{}>", self.type_name(ctx, &def.return_type.with_nullable(true), id)?),
    };
    out.line(format!("public async {return_type} {name}({})", self.parameter_list(ctx, id)?));
    out.open("{");
    Self::write_null_guards(ctx, out, id);

    let generator = ctx
      .generator_for(id)
      .map_or_else(|| "ToRequestInformation".to_string(), |generator| Self::method_name(ctx, generator));
    let arguments = ctx
      .parameters(id)
      .into_iter()
      .map(|parameter| ctx.parameter_name(parameter))
      .join(", ");
    out.line(format!("var requestInfo = {generator}({arguments});"));

    let error_mapping = if def.error_mappings.is_empty() {
      "default"
    } else {
      out.line("var errorMapping = new Dictionary<string, ParsableFactory<IParsable>>");
      out.open("{");
      for (code, ty) in &def.error_mappings {
        out.line(format!("{{ {}, {} }},", quoted(code), self.factory(ctx, ty, id)?));
      }
      out.close("};");
      "errorMapping"
    };

    let ty = &def.return_type;
    let suffix = format!("{error_mapping}, cancellationToken).ConfigureAwait(false);");
    match shape {
      ResponseShape::NoContent => {
        out.line(format!("await RequestAdapter.SendNoContentAsync(requestInfo, {suffix}"));
      }
      ResponseShape::Primitive | ResponseShape::Enum => {
        let element = self.type_name(ctx, &element_type(ty).with_nullable(true), id)?;
        out.line(format!(
          "return await RequestAdapter.SendPrimitiveAsync<{element}>(requestInfo, {suffix}"
        ));
      }
      ResponseShape::PrimitiveCollection | ResponseShape::EnumCollection => {
        let element = self.element_name(ctx, ty, id)?;
        out.line(format!(
          "var collectionResult = await RequestAdapter.SendPrimitiveCollectionAsync<{element}>(requestInfo, {suffix}"
        ));
        out.line(format!("return collectionResult{};", Self::collection_suffix(ty)));
      }
      ResponseShape::Object => {
        let element = self.element_name(ctx, ty, id)?;
        out.line(format!(
          "return await RequestAdapter.SendAsync<{element}>(requestInfo, {}, {suffix}",
          self.factory(ctx, ty, id)?
        ));
      }
      ResponseShape::ObjectCollection => {
        let element = self.element_name(ctx, ty, id)?;
        out.line(format!(
          "var collectionResult = await RequestAdapter.SendCollectionAsync<{element}>(requestInfo, {}, {suffix}",
          self.factory(ctx, ty, id)?
        ));
        out.line(format!("return collectionResult{};", Self::collection_suffix(ty)));
      }
    }
    out.close("}");
    Ok(())
  }

  fn write_generator(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    out.line(format!(
      "public RequestInformation {}({})",
      Self::method_name(ctx, id),
      self.parameter_list(ctx, id)?
    ));
    out.open("{");
    Self::write_null_guards(ctx, out, id);
    out.line(format!(
      "var requestInfo = new RequestInformation(Method.{}, UrlTemplate, PathParameters);",
      ctx.http_verb(id)
    ));

    if let Some(parameter) = ctx.parameter_of_kind(id, ParameterKind::RequestConfiguration)
      && let Some(configuration) = ctx.configuration_class(id)
    {
      let name = ctx.parameter_name(parameter);
      out.line(format!("if({name} != null)"));
      out.open("{");
      out.line(format!("var requestConfig = new {}();", ctx.declared_name(configuration)));
      out.line(format!("{name}.Invoke(requestConfig);"));
      if ctx.query_parameters_class(configuration).is_some() {
        out.line("requestInfo.AddQueryParameters(requestConfig.QueryParameters);");
      }
      out.line("requestInfo.AddRequestOptions(requestConfig.Options);");
      out.line("requestInfo.AddHeaders(requestConfig.Headers);");
      out.close("}");
    }

    if !def.accepted_response_types.is_empty() {
      out.line(format!(
        "requestInfo.Headers.TryAdd(\"Accept\", {});",
        quoted(&def.accepted_response_types.join(", "))
      ));
    }

    if let Some(body) = ctx.parameter_of_kind(id, ParameterKind::RequestBody)
      && let Some(body_def) = ctx.parameter_def(body)
    {
      let name = ctx.parameter_name(body);
      let content_type = quoted(def.request_body_content_type.as_deref().unwrap_or("application/octet-stream"));
      let line = match ValueShape::of(ctx.dom, &body_def.ty) {
        ValueShape::Primitive(Primitive::Stream) => format!("requestInfo.SetStreamContent({name}, {content_type});"),
        ValueShape::Primitive(_) if body_def.ty.is_collection() => {
          format!("requestInfo.SetContentFromScalarCollection(RequestAdapter, {content_type}, {name});")
        }
        ValueShape::Primitive(_) => format!("requestInfo.SetContentFromScalar(RequestAdapter, {content_type}, {name});"),
        ValueShape::Enum(_) if body_def.ty.is_collection() => {
          format!("requestInfo.SetContentFromEnumCollection(RequestAdapter, {content_type}, {name});")
        }
        ValueShape::Enum(_) => format!("requestInfo.SetContentFromEnum(RequestAdapter, {content_type}, {name});"),
        ValueShape::Object(_) | ValueShape::Untyped => {
          format!("requestInfo.SetContentFromParsable(RequestAdapter, {content_type}, {name});")
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
    out.line(format!(
      "public static {class_name} {}(IParseNode {node})",
      Self::method_name(ctx, id)
    ));
    out.open("{");
    out.line(format!("_ = {node} ?? throw new ArgumentNullException(nameof({node}));"));

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      self.write_composed_factory(ctx, out, &layout, &class_name, &node)?;
      out.close("}");
      return Ok(());
    }

    let discriminator = ctx
      .class_def(owner)
      .and_then(|def| def.discriminator.as_ref())
      .filter(|info| !info.is_empty());
    match discriminator {
      Some(info) => {
        out.line(format!(
          "var mappingValue = {node}.GetChildNode({})?.GetStringValue();",
          quoted(&info.property_name)
        ));
        out.line("return mappingValue switch");
        out.open("{");
        for (value, ty) in info.mappings() {
          out.line(format!(
            "{} => new {}(),",
            quoted(value),
            self.element_name(ctx, ty, id)?
          ));
        }
        out.line(format!("_ => new {class_name}(),"));
        out.close("};");
      }
      None => out.line(format!("return new {class_name}();")),
    }
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
    if let Some(discriminator) = layout.discriminator.as_deref().filter(|_| layout.has_mappings()) {
      out.line(format!(
        "var mappingValue = {node}.GetChildNode({})?.GetStringValue();",
        quoted(discriminator)
      ));
    }
    out.line(format!("var result = new {class_name}();"));

    let mut first = true;
    if layout.has_mappings() {
      for (value, member) in &layout.mapped {
        let Some(def) = ctx.property_def(*member) else {
          continue;
        };
        branch(
          out,
          &mut first,
          &format!("{}.Equals(mappingValue, StringComparison.OrdinalIgnoreCase)", quoted(value)),
        );
        out.line(format!(
          "result.{} = new {}();",
          ctx.member_name(*member),
          self.element_name(ctx, &def.ty, *member)?
        ));
        out.close("}");
      }
    }
    for member in &layout.others {
      let Some(def) = ctx.property_def(*member) else {
        continue;
      };
      let variable = format!("{}Value", Casing::Camel.apply(ctx.name(*member)));
      let read = self.read_value(ctx, &def.ty, *member, node)?;
      let ty = self.type_name(ctx, &def.ty.non_null(), *member)?;
      branch(out, &mut first, &format!("{read} is {ty} {variable}"));
      out.line(format!("result.{} = {variable};", ctx.member_name(*member)));
      out.close("}");
    }
    if !layout.fallback.is_empty() {
      if !first {
        out.line("else");
        out.open("{");
      }
      for member in &layout.fallback {
        let Some(def) = ctx.property_def(*member) else {
          continue;
        };
        out.line(format!(
          "result.{} = new {}();",
          ctx.member_name(*member),
          self.element_name(ctx, &def.ty, *member)?
        ));
      }
      if !first {
        out.close("}");
      }
    }
    out.line("return result;");
    Ok(())
  }

  fn write_deserializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let base = ctx.dom.class_base(owner);
    let modifier = if base.is_some() { "override" } else { "virtual" };
    out.line(format!(
      "public {modifier} IDictionary<string, Action<IParseNode>> {}()",
      Self::method_name(ctx, id)
    ));
    out.open("{");

    if let Some(layout) = ComposedLayout::of(ctx, owner) {
      match layout.kind {
        ComposedKind::Union => {
          let mut first = true;
          for member in &layout.objects {
            let name = ctx.member_name(*member);
            branch(out, &mut first, &format!("{name} != null"));
            out.line(format!("return {name}.GetFieldDeserializers();"));
            out.close("}");
          }
          out.line("return new Dictionary<string, Action<IParseNode>>();");
        }
        ComposedKind::Intersection if !layout.objects.is_empty() => {
          let members = layout
            .objects
            .iter()
            .map(|member| ctx.member_name(*member))
            .join(", ");
          out.line(format!(
            "return ParseNodeHelper.MergeDeserializersForIntersectionWrapper({members});"
          ));
        }
        ComposedKind::Intersection => out.line("return new Dictionary<string, Action<IParseNode>>();"),
      }
      out.close("}");
      return Ok(());
    }

    if base.is_some() {
      out.line("return new Dictionary<string, Action<IParseNode>>(base.GetFieldDeserializers())");
    } else {
      out.line("return new Dictionary<string, Action<IParseNode>>");
    }
    out.open("{");
    for property in ctx.serialized_properties(owner) {
      let Some(def) = ctx.property_def(property) else {
        continue;
      };
      out.line(format!(
        "{{ {}, n => {{ {} = {}; }} }},",
        quoted(&ctx.wire_name(property)),
        ctx.member_name(property),
        self.read_value(ctx, &def.ty, property, "n")?
      ));
    }
    out.close("};");
    out.close("}");
    Ok(())
  }

  fn write_serializer(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(owner) = ctx.owner(id) else {
      return Ok(());
    };
    let base = ctx.dom.class_base(owner);
    let modifier = if base.is_some() { "override" } else { "virtual" };
    let writer = ctx
      .parameter_of_kind(id, ParameterKind::Serializer)
      .map_or_else(|| "writer".to_string(), |parameter| ctx.parameter_name(parameter));
    out.line(format!(
      "public {modifier} void {}(ISerializationWriter {writer})",
      Self::method_name(ctx, id)
    ));
    out.open("{");
    out.line(format!("_ = {writer} ?? throw new ArgumentNullException(nameof({writer}));"));

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
        let name = ctx.member_name(member);
        branch(out, &mut first, &format!("{name} != null"));
        out.line(self.write_value(ctx, &def.ty, member, "null", &name)?);
        out.close("}");
      }
      if layout.kind == ComposedKind::Intersection && !layout.objects.is_empty() {
        let members = layout
          .objects
          .iter()
          .map(|member| ctx.member_name(*member))
          .join(", ");
        let statement = format!("writer.WriteObjectValue<{}>(null, {members});", ctx.declared_name(owner));
        if first {
          out.line(statement);
        } else {
          out.line("else");
          out.open("{");
          out.line(statement);
          out.close("}");
        }
      }
      out.close("}");
      return Ok(());
    }

    if base.is_some() {
      out.line(format!("base.Serialize({writer});"));
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
        &ctx.member_name(property),
      )?);
    }
    if let Some(additional) = ctx.property_of_kind(owner, PropertyKind::AdditionalData) {
      out.line(format!("writer.WriteAdditionalData({});", ctx.member_name(additional)));
    }
    out.close("}");
    Ok(())
  }

  fn write_with_parameters(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    let return_type = self.type_name(ctx, &def.return_type, id)?;
    out.line(format!(
      "public {return_type} {}({})",
      Self::method_name(ctx, id),
      self.parameter_list(ctx, id)?
    ));
    out.open("{");
    out.line("var urlTplParams = new Dictionary<string, object>(PathParameters);");
    for parameter in ctx.parameters(id) {
      let name = ctx.parameter_name(parameter);
      out.line(format!(
        "if({name} != null) urlTplParams.Add({}, {name});",
        quoted(&ctx.serialization_name(parameter))
      ));
    }
    out.line(format!("return new {return_type}(urlTplParams, RequestAdapter);"));
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
    let property = ctx.member_name(target);
    if kind == MethodKind::Getter {
      let return_type = self.type_name(ctx, &def.return_type, id)?;
      out.line(format!("public {return_type} {}()", Self::method_name(ctx, id)));
      out.open("{");
      out.line(format!("return {property};"));
    } else {
      out.line(format!("public void {}({})", Self::method_name(ctx, id), self.parameter_list(ctx, id)?));
      out.open("{");
      if let Some(value) = ctx.parameters(id).first() {
        out.line(format!("{property} = {};", ctx.parameter_name(*value)));
      }
    }
    out.close("}");
    Ok(())
  }
}

impl LanguageRenderer for CSharpRenderer {
  fn primitive_name(&self, primitive: Primitive) -> Option<&'static str> {
    Some(match primitive {
      Primitive::String => "string",
      Primitive::Boolean => "bool",
      Primitive::Int8 => "sbyte",
      Primitive::Int32 => "int",
      Primitive::Int64 => "long",
      Primitive::Float32 => "float",
      Primitive::Float64 => "double",
      Primitive::Decimal => "decimal",
      Primitive::DateTime => "DateTimeOffset",
      Primitive::Date => "Date",
      Primitive::Time => "Time",
      Primitive::Duration => "TimeSpan",
      Primitive::Guid => "Guid",
      Primitive::Binary => "byte[]",
      Primitive::Stream => "Stream",
      Primitive::Void => "void",
      Primitive::UntypedNode => "UntypedNode",
    })
  }

  fn abstraction_name(&self, abstraction: Abstraction) -> &'static str {
    match abstraction {
      Abstraction::RequestAdapter => "IRequestAdapter",
      Abstraction::RequestInformation => "RequestInformation",
      Abstraction::RequestOption => "IRequestOption",
      Abstraction::RequestHeaders => "RequestHeaders",
      Abstraction::ParseNode => "IParseNode",
      Abstraction::SerializationWriter => "ISerializationWriter",
      Abstraction::BackingStore => "IBackingStore",
      Abstraction::BackingStoreFactory => "IBackingStoreFactory",
      Abstraction::PathParameters => "Dictionary<string, object>",
      Abstraction::AdditionalData => "IDictionary<string, object>",
      Abstraction::ErrorMappings => "Dictionary<string, ParsableFactory<IParsable>>",
      Abstraction::ApiException => "ApiException",
    }
  }

  fn decorate(&self, base: String, ty: &CodeType) -> String {
    let collected = match ty.collection {
      CollectionKind::None => base,
      CollectionKind::Array => format!("{base}[]"),
      CollectionKind::Complex => format!("List<{base}>"),
    };
    if ty.nullable && !ty.is_void() {
      format!("{collected}?")
    } else {
      collected
    }
  }

  fn write_prologue(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    out.line("// <auto-generated/>");
    out.line(format!("// {GENERATED_BANNER}"));
    out.line("#pragma warning disable CS0618");

    let own_namespace = namespace(ctx.namespace_name(ctx.declaration));
    let mut namespaces = BTreeSet::from([
      "System".to_string(),
      "System.Collections.Generic".to_string(),
      "System.IO".to_string(),
      "System.Linq".to_string(),
      "System.Threading".to_string(),
      "System.Threading.Tasks".to_string(),
    ]);
    match ctx.dom.element(ctx.declaration).class_kind() {
      Some(ClassKind::Enum) => {
        namespaces.insert("System.Runtime.Serialization".to_string());
      }
      Some(ClassKind::RequestBuilder) => {
        namespaces.insert(ABSTRACTIONS_NAMESPACE.to_string());
        namespaces.insert(EXTENSIONS_NAMESPACE.to_string());
        namespaces.insert(SERIALIZATION_NAMESPACE.to_string());
      }
      _ => {
        namespaces.insert(EXTENSIONS_NAMESPACE.to_string());
        namespaces.insert(SERIALIZATION_NAMESPACE.to_string());
      }
    }
    let (declarations, abstractions) = ctx.usings();
    for declaration in declarations {
      namespaces.insert(namespace(ctx.namespace_name(declaration)));
    }
    for abstraction in abstractions {
      namespaces.insert(abstraction_namespace(abstraction).to_string());
    }
    namespaces.remove(&own_namespace);
    for used in namespaces {
      out.line(format!("using {used};"));
    }
    out.line(format!("namespace {own_namespace}"));
    out.open("{");
    Ok(())
  }

  fn write_epilogue(&self, _ctx: &RenderContext<'_>, out: &mut CodeWriter) -> GenerationResult<()> {
    out.close("}");
    out.line("#pragma warning restore CS0618");
    Ok(())
  }

  fn write_type_start(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    write_summary(ctx, out, id);
    write_obsolete(ctx, out, id);
    let name = ctx.conventions.type_name(ctx.name(id));

    match &ctx.dom.element(id).kind {
      ElementKind::Interface(def) => {
        let extends = def
          .extends
          .iter()
          .map(|parent| self.definition_name(ctx, *parent))
          .collect::<Vec<_>>();
        if extends.is_empty() {
          out.line(format!("public interface {name} : IParsable"));
        } else {
          out.line(format!("public interface {name} : {}", extends.join(", ")));
        }
      }
      ElementKind::Class(def) => {
        let mut parents = vec![];
        match def.kind {
          ClassKind::Enum => {
            out.line(format!("public enum {name}"));
            out.open("{");
            return Ok(());
          }
          ClassKind::Model => {
            if let Some(base) = def.base_class {
              parents.push(self.definition_name(ctx, base));
            } else if def.is_error {
              parents.push("ApiException".to_string());
            }
            if ctx.property_of_kind(id, PropertyKind::AdditionalData).is_some() {
              parents.push("IAdditionalDataHolder".to_string());
            }
            if ctx.property_of_kind(id, PropertyKind::BackingStore).is_some() {
              parents.push("IBackedModel".to_string());
            }
            parents.push("IParsable".to_string());
          }
          ClassKind::ComposedType(_) => {
            parents.push("IComposedTypeWrapper".to_string());
            parents.push("IParsable".to_string());
          }
          ClassKind::RequestBuilder | ClassKind::QueryParameters | ClassKind::RequestConfiguration => {}
        }
        parents.extend(def.implements.iter().map(|interface| self.definition_name(ctx, *interface)));
        if parents.is_empty() {
          out.line(format!("public partial class {name}"));
        } else {
          out.line(format!("public partial class {name} : {}", parents.join(", ")));
        }
      }
      _ => return Ok(()),
    }
    out.open("{");
    Ok(())
  }

  fn write_block_end(&self, _ctx: &RenderContext<'_>, out: &mut CodeWriter, _owner: ElementId) -> GenerationResult<()> {
    out.close("}");
    Ok(())
  }

  fn write_property(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.property_def(id) else {
      return Ok(());
    };
    let name = ctx.member_name(id);
    let ty = self.type_name(ctx, &def.ty, id)?;
    let visibility = access(def.access);
    let backed = ctx.owner(id).is_some_and(|owner| ctx.is_backed(owner));
    write_summary(ctx, out, id);
    write_obsolete(ctx, out, id);

    match def.kind {
      PropertyKind::Custom if backed => {
        let wire = quoted(&ctx.wire_name(id));
        out.line(format!("{visibility} {ty} {name}"));
        out.open("{");
        out.line(format!("get {{ return BackingStore?.Get<{ty}>({wire}); }}"));
        out.line(format!("set {{ BackingStore?.Set({wire}, value); }}"));
        out.close("}");
      }
      PropertyKind::QueryParameter => {
        let wire = ctx.wire_name(id);
        if wire != ctx.name(id) {
          out.line(format!("[QueryParameter({})]", quoted(&wire)));
        }
        out.line(format!("{visibility} {ty} {name} {{ get; set; }}"));
      }
      PropertyKind::Custom => out.line(format!("{visibility} {ty} {name} {{ get; set; }}")),
      PropertyKind::AdditionalData if backed => {
        out.line(format!("{visibility} {ty} {name}"));
        out.open("{");
        out.line(format!("get {{ return BackingStore.Get<{ty}>(\"AdditionalData\") ?? new Dictionary<string, object>(); }}"));
        out.line("set { BackingStore.Set(\"AdditionalData\", value); }");
        out.close("}");
      }
      PropertyKind::AdditionalData => out.line(format!(
        "{visibility} {ty} {name} {{ get; set; }} = new Dictionary<string, object>();"
      )),
      PropertyKind::BackingStore => out.line(format!(
        "{visibility} {ty} {name} {{ get; private set; }} = BackingStoreFactorySingleton.Instance.CreateBackingStore();"
      )),
      PropertyKind::RequestBuilder => {
        out.line(format!("{visibility} {ty} {name}"));
        out.open("{");
        out.line(format!("get => new {ty}(PathParameters, RequestAdapter);"));
        out.close("}");
      }
      PropertyKind::UrlTemplate => {
        let template = def.default_value.as_deref().unwrap_or_default();
        out.line(format!("{visibility} {ty} {name} {{ get; }} = {};", quoted(template)));
      }
      PropertyKind::RequestAdapter | PropertyKind::PathParameters => {
        out.line(format!("{visibility} {ty} {name} {{ get; }}"));
      }
      PropertyKind::Headers | PropertyKind::Options => {
        out.line(format!("{visibility} {ty} {name} {{ get; set; }} = new {ty}();"));
      }
      PropertyKind::QueryParameters => {
        let bare = self.type_name(ctx, &def.ty.non_null(), id)?;
        out.line(format!("{visibility} {bare} {name} {{ get; set; }} = new {bare}();"));
      }
    }
    Ok(())
  }

  fn write_method(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.method_def(id) else {
      return Ok(());
    };
    out.blank();
    Self::write_method_docs(ctx, out, id);
    write_obsolete(ctx, out, id);

    match def.kind {
      kind @ (MethodKind::ClientConstructor | MethodKind::Constructor | MethodKind::RawUrlConstructor) => {
        self.write_constructor(ctx, out, id, kind)
      }
      MethodKind::RawUrlBuilder => {
        let return_type = self.type_name(ctx, &def.return_type, id)?;
        let raw_url = ctx
          .parameter_of_kind(id, ParameterKind::RawUrl)
          .map_or_else(|| "rawUrl".to_string(), |parameter| ctx.parameter_name(parameter));
        out.line(format!(
          "public {return_type} {}({})",
          Self::method_name(ctx, id),
          self.parameter_list(ctx, id)?
        ));
        out.open("{");
        out.line(format!("return new {return_type}({raw_url}, RequestAdapter);"));
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
        out.line(format!(
          "{} {return_type} {}({})",
          access(def.access),
          Self::method_name(ctx, id),
          self.parameter_list(ctx, id)?
        ));
        out.open("{");
        out.line("throw new NotImplementedException();");
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
    out.line(format!(
      "/// <summary>Gets an item from the {}.{} collection</summary>",
      namespace(ctx.root_namespace),
      def.path_segment
    ));
    if let Some(text) = ctx.documentation(parameter) {
      out.line(format!(
        "/// <param name=\"{name}\">{}</param>",
        xml_escaped(&doc_lines(text).join(" "))
      ));
    }
    write_obsolete(ctx, out, id);
    out.line(format!("public {return_type} this[{ty} {name}]"));
    out.open("{");
    out.line("get");
    out.open("{");
    out.line("var urlTplParams = new Dictionary<string, object>(PathParameters);");
    out.line(format!(
      "urlTplParams.Add({}, {name});",
      quoted(&ctx.serialization_name(parameter))
    ));
    out.line(format!("return new {return_type}(urlTplParams, RequestAdapter);"));
    out.close("}");
    out.close("}");
    Ok(())
  }

  fn write_constant(&self, ctx: &RenderContext<'_>, out: &mut CodeWriter, id: ElementId) -> GenerationResult<()> {
    let Some(def) = ctx.dom.element(id).as_constant() else {
      return Ok(());
    };
    write_summary(ctx, out, id);
    out.line(format!("[EnumMember(Value = {})]", quoted(&def.value)));
    out.line(format!("{},", ctx.member_name(id)));
    Ok(())
  }
}
