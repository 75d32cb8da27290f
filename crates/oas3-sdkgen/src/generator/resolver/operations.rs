use std::collections::BTreeMap;

use http::Method;
use itertools::Itertools;
use oas3::spec::{MediaType, ObjectOrReference, ObjectSchema, Operation, Response};
use tracing::trace;

use super::{InlineContext, ModelResolver, primitives::primitive_for, request_builders::parameter_symbol};
use crate::{
  generator::{
    codedom::{
      Abstraction, ClassDef, ClassKind, CodeType, CollectionKind, ElementId, ElementKind, MethodDef, MethodKind,
      ParameterDef, ParameterKind, Primitive, PropertyDef, PropertyKind,
    },
    errors::{GenerationError, GenerationResult},
    metrics::GenerationWarning,
    uri_space::{NodeId, QueryParameterInfo},
  },
  naming::identifiers::to_first_character_upper_case,
  utils::SchemaExt,
};

pub(crate) const BODY_PARAMETER_NAME: &str = "body";
pub(crate) const REQUEST_CONFIGURATION_PARAMETER_NAME: &str = "requestConfiguration";
pub(crate) const ERROR_MAPPING_CLIENT_RANGE: &str = "4XX";
pub(crate) const ERROR_MAPPING_SERVER_RANGE: &str = "5XX";

const SUCCESS_STATUS_CODES: [&str; 6] = ["200", "201", "202", "203", "206", "2XX"];
const NO_CONTENT_STATUS_CODES: [&str; 4] = ["201", "202", "204", "205"];
const DEFAULT_RESPONSE: &str = "default";
const PLAIN_TEXT_CONTENT_TYPE: &str = "text/plain";
const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";
const WILDCARD_CONTENT_TYPE: &str = "*/*";

fn is_error_status_code(code: &str) -> bool {
  code.eq_ignore_ascii_case(ERROR_MAPPING_CLIENT_RANGE)
    || code.eq_ignore_ascii_case(ERROR_MAPPING_SERVER_RANGE)
    || code.parse::<u16>().is_ok_and(|status| (400..600).contains(&status))
}

fn is_success_status_code(code: &str) -> bool {
  SUCCESS_STATUS_CODES.iter().any(|success| success.eq_ignore_ascii_case(code))
}

/// `GET` becomes `Get`.
pub(crate) fn operation_name(method: &Method) -> String {
  to_first_character_upper_case(&method.as_str().to_lowercase())
}

/// The schema of a payload together with the content types that carry it, best first.
struct SelectedContent {
  schema: ObjectOrReference<ObjectSchema>,
  content_types: Vec<String>,
}

impl ModelResolver<'_> {
  /// Adds the executor and generator methods of one operation plus its query parameter and
  /// request configuration classes.
  pub(super) fn create_operation_methods(
    &mut self,
    id: NodeId,
    class: ElementId,
    method: &Method,
    operation: &Operation,
  ) -> GenerationResult<()> {
    let class_name = self.dom.name(class).to_string();
    let operation_name = operation_name(method);
    let inline_prefix = format!("{}{operation_name}", self.tree.class_name(id, ""));
    let description = operation
      .description
      .as_deref()
      .or(operation.summary.as_deref())
      .map(str::trim)
      .filter(|text| !text.is_empty())
      .map(ToString::to_string);
    let deprecated = operation.deprecated.unwrap_or(false);
    let namespace = self.dom.namespace_of(class);

    let query_parameters = self.tree.query_parameters(id, Some(method), self.spec);
    let query_class = if query_parameters.is_empty() {
      None
    } else {
      Some(self.create_query_parameters_class(
        class,
        &format!("{class_name}{operation_name}QueryParameters"),
        &query_parameters,
        description.as_deref(),
        &InlineContext::new(namespace, format!("{inline_prefix}QueryParameter")),
      )?)
    };
    let configuration_class = self.create_request_configuration_class(
      class,
      &format!("{class_name}{operation_name}RequestConfiguration"),
      query_class,
    )?;

    let responses = self.resolved_responses(operation);
    let selected_response = self.select_response(&responses);
    let return_type = match &selected_response {
      Some(selected) => {
        let context = InlineContext::new(namespace, format!("{inline_prefix}Response"));
        self.resolve_schema(&selected.schema, &context)?
      }
      None => self.unstructured_return_type(&responses, method, id),
    };
    let accepted_types = match &selected_response {
      Some(selected) => selected.content_types.clone(),
      None => self.unstructured_accepted_types(&responses),
    };
    let error_mappings = self.error_mappings(&responses, namespace, &inline_prefix)?;
    let body = self.request_body(operation, namespace, &inline_prefix, method, id)?;

    let mut executor = MethodDef::new(MethodKind::RequestExecutor, return_type);
    executor.is_async = true;
    executor.http_method = Some(method.clone());
    executor.error_mappings = error_mappings;
    executor.request_body_content_type = body.as_ref().and_then(|body| body.content_type.clone());
    let executor_name = method.as_str().to_lowercase();
    let executor = self.dom.add_child(class, executor_name, ElementKind::Method(executor))?;
    self.dom.document(executor, description.as_deref());
    self.dom.element_mut(executor).deprecated = deprecated;
    self.add_request_parameters(executor, body.as_ref(), configuration_class)?;

    let mut generator = MethodDef::new(
      MethodKind::RequestGenerator,
      CodeType::abstraction(Abstraction::RequestInformation),
    );
    generator.http_method = Some(method.clone());
    generator.accepted_response_types = accepted_types;
    generator.request_body_content_type = body.as_ref().and_then(|body| body.content_type.clone());
    let generator = self.dom.add_child(
      class,
      format!("to{operation_name}RequestInformation"),
      ElementKind::Method(generator),
    )?;
    self.dom.document(generator, description.as_deref());
    self.dom.element_mut(generator).deprecated = deprecated;
    self.add_request_parameters(generator, body.as_ref(), configuration_class)?;

    self.stats.record_operation();
    trace!(path = self.tree.node(id).path(), %method, "created operation methods");
    Ok(())
  }

  fn create_query_parameters_class(
    &mut self,
    class: ElementId,
    name: &str,
    parameters: &[QueryParameterInfo],
    description: Option<&str>,
    enum_context: &InlineContext,
  ) -> GenerationResult<ElementId> {
    let query_class = self
      .dom
      .add_child(class, name, ElementKind::Class(ClassDef::new(ClassKind::QueryParameters)))?;
    self.dom.document(query_class, description);

    for parameter in parameters {
      let context = enum_context.with_suffix(&to_first_character_upper_case(&parameter_symbol(&parameter.name)));
      let ty = self.query_parameter_type(parameter, &context)?;
      let mut def = PropertyDef::new(PropertyKind::QueryParameter, ty);
      def.wire_name = Some(parameter.serialization_name());
      let property = self
        .dom
        .add_child(query_class, parameter_symbol(&parameter.name), ElementKind::Property(def))?;
      self.dom.document(property, parameter.description.as_deref());
      self.dom.element_mut(property).deprecated = parameter.deprecated;
    }
    Ok(query_class)
  }

  /// Enums keep their own type, arrays become arrays of their item type, and anything
  /// that cannot be serialized into a query string travels as a string.
  fn query_parameter_type(&mut self, parameter: &QueryParameterInfo, context: &InlineContext) -> GenerationResult<CodeType> {
    let Some(schema_ref) = &parameter.schema else {
      return Ok(CodeType::string());
    };
    let Ok(schema) = schema_ref.resolve(self.spec) else {
      self.stats.record_warning(GenerationWarning::SchemaFallback {
        schema_name: parameter.name.clone(),
        message: "query parameter schema could not be resolved, using a string".to_string(),
      });
      return Ok(CodeType::string());
    };

    let (item_ref, item, collection) = if schema.is_array() {
      let Some(items) = schema.items_schema() else {
        return Ok(CodeType::string().collection_of(CollectionKind::Array));
      };
      let Ok(resolved) = items.resolve(self.spec) else {
        return Ok(CodeType::string().collection_of(CollectionKind::Array));
      };
      (items.clone(), resolved, CollectionKind::Array)
    } else {
      (schema_ref.clone(), schema, CollectionKind::None)
    };

    let ty = if item.string_enum_values().is_empty() {
      primitive_for(&item).map_or_else(CodeType::string, CodeType::primitive)
    } else {
      self.resolve_schema(&item_ref, context)?
    };
    Ok(ty.collection_of(collection))
  }

  fn create_request_configuration_class(
    &mut self,
    class: ElementId,
    name: &str,
    query_class: Option<ElementId>,
  ) -> GenerationResult<ElementId> {
    let configuration = self.dom.add_child(
      class,
      name,
      ElementKind::Class(ClassDef::new(ClassKind::RequestConfiguration)),
    )?;
    self.dom.document(
      configuration,
      Some("Configuration for the request such as headers, query parameters, and middleware options."),
    );

    let headers = self.dom.add_child(
      configuration,
      "headers",
      ElementKind::Property(PropertyDef::new(
        PropertyKind::Headers,
        CodeType::abstraction(Abstraction::RequestHeaders),
      )),
    )?;
    self.dom.document(headers, Some("Request headers"));

    let options = self.dom.add_child(
      configuration,
      "options",
      ElementKind::Property(PropertyDef::new(
        PropertyKind::Options,
        CodeType::abstraction(Abstraction::RequestOption).collection_of(CollectionKind::Complex),
      )),
    )?;
    self.dom.document(options, Some("Request options"));

    if let Some(query_class) = query_class {
      let query = self.dom.add_child(
        configuration,
        "queryParameters",
        ElementKind::Property(PropertyDef::new(
          PropertyKind::QueryParameters,
          CodeType::definition(query_class),
        )),
      )?;
      self.dom.document(query, Some("Request query parameters"));
    }
    Ok(configuration)
  }

  /// Responses keyed by status code; references that do not resolve are dropped.
  fn resolved_responses(&self, operation: &Operation) -> BTreeMap<String, Response> {
    operation
      .responses
      .iter()
      .flatten()
      .filter_map(|(code, response)| response.resolve(self.spec).ok().map(|response| (code.clone(), response)))
      .collect()
  }

  fn select_content(&self, content: &BTreeMap<String, MediaType>) -> Option<SelectedContent> {
    let with_schema = content
      .iter()
      .filter(|(_, media)| media.schema.is_some())
      .map(|(content_type, _)| content_type.as_str());
    let content_types = self.config.structured_mime_types.select(with_schema);
    let best = content_types.first()?;
    let schema = content.get(*best)?.schema.clone()?;
    Some(SelectedContent {
      schema,
      content_types: content_types.into_iter().map(ToString::to_string).collect(),
    })
  }

  /// The first success response, in status code priority order, with a structured schema.
  fn select_response(&self, responses: &BTreeMap<String, Response>) -> Option<SelectedContent> {
    SUCCESS_STATUS_CODES.iter().find_map(|code| {
      let response = responses
        .iter()
        .find(|(status, _)| status.eq_ignore_ascii_case(code))
        .map(|(_, response)| response)?;
      self.select_content(&response.content)
    })
  }

  fn unstructured_return_type(&mut self, responses: &BTreeMap<String, Response>, method: &Method, id: NodeId) -> CodeType {
    if responses
      .keys()
      .any(|code| NO_CONTENT_STATUS_CODES.contains(&code.as_str()))
    {
      return CodeType::void();
    }
    let success_content = responses
      .iter()
      .filter(|(code, _)| is_success_status_code(code))
      .flat_map(|(_, response)| response.content.keys())
      .collect::<Vec<_>>();
    if success_content.is_empty() {
      return CodeType::void();
    }
    if success_content
      .iter()
      .any(|content_type| content_type.eq_ignore_ascii_case(PLAIN_TEXT_CONTENT_TYPE))
    {
      return CodeType::string();
    }
    self.stats.record_warning(GenerationWarning::UnstructuredContent {
      method: method.to_string(),
      path: self.tree.node(id).path().to_string(),
      content_types: success_content
        .iter()
        .map(|content_type| content_type.as_str())
        .join(", "),
    });
    CodeType::primitive(Primitive::Stream)
  }

  /// Success content types as declared, then the structured error content types.
  fn unstructured_accepted_types(&self, responses: &BTreeMap<String, Response>) -> Vec<String> {
    let mut accepted = responses
      .iter()
      .filter(|(code, _)| !is_error_status_code(code))
      .flat_map(|(_, response)| response.content.keys().cloned())
      .collect::<Vec<_>>();
    let error_types = responses
      .iter()
      .filter(|(code, _)| is_error_status_code(code))
      .flat_map(|(_, response)| response.content.keys().map(String::as_str))
      .collect::<Vec<_>>();
    for content_type in self.config.structured_mime_types.select(error_types) {
      accepted.push(content_type.to_string());
    }

    let mut distinct: Vec<String> = Vec::with_capacity(accepted.len());
    for content_type in accepted {
      if !distinct.iter().any(|known| known.eq_ignore_ascii_case(&content_type)) {
        distinct.push(content_type);
      }
    }
    distinct
  }

  /// Error responses with a structured schema, keyed by upper-cased status code. The
  /// `default` response fills the client and server ranges that are not mapped yet.
  fn error_mappings(
    &mut self,
    responses: &BTreeMap<String, Response>,
    namespace: ElementId,
    inline_prefix: &str,
  ) -> GenerationResult<BTreeMap<String, CodeType>> {
    let mut mappings = BTreeMap::new();
    for (code, response) in responses {
      if !is_error_status_code(code) {
        continue;
      }
      let Some(selected) = self.select_content(&response.content) else {
        continue;
      };
      let code = code.to_uppercase();
      let context = InlineContext::new(namespace, format!("{inline_prefix}{code}Error"));
      if let Some(ty) = self.error_type(&selected.schema, &context, &code)? {
        mappings.insert(code, ty);
      }
    }

    if let Some(default) = responses.get(DEFAULT_RESPONSE)
      && let Some(selected) = self.select_content(&default.content)
    {
      for range in [ERROR_MAPPING_CLIENT_RANGE, ERROR_MAPPING_SERVER_RANGE] {
        if mappings.contains_key(range) {
          continue;
        }
        let context = InlineContext::new(namespace, format!("{inline_prefix}{range}Error"));
        if let Some(ty) = self.error_type(&selected.schema, &context, range)? {
          mappings.insert(range.to_string(), ty);
        }
      }
    }
    Ok(mappings)
  }

  /// Only model classes can be raised; anything else is reported and skipped.
  fn error_type(
    &mut self,
    schema: &ObjectOrReference<ObjectSchema>,
    context: &InlineContext,
    code: &str,
  ) -> GenerationResult<Option<CodeType>> {
    let ty = self.resolve_schema(schema, context)?;
    let Some(id) = ty.definition_id().filter(|_| !ty.is_collection()) else {
      self.stats.record_warning(GenerationWarning::SchemaFallback {
        schema_name: context.name.clone(),
        message: format!("error response {code} is not an object schema and is not mapped"),
      });
      return Ok(None);
    };
    match self.dom.class_mut(id) {
      Some(def) if def.kind == ClassKind::Model => {
        def.is_error = true;
        Ok(Some(ty))
      }
      _ => {
        self.stats.record_warning(GenerationWarning::SchemaFallback {
          schema_name: context.name.clone(),
          message: format!("error response {code} is not a model and is not mapped"),
        });
        Ok(None)
      }
    }
  }

  fn request_body(
    &mut self,
    operation: &Operation,
    namespace: ElementId,
    inline_prefix: &str,
    method: &Method,
    id: NodeId,
  ) -> GenerationResult<Option<RequestBodyInfo>> {
    let Some(body_ref) = &operation.request_body else {
      return Ok(None);
    };
    let body = body_ref.resolve(self.spec).map_err(|error| {
      GenerationError::invalid_schema(
        format!("{method} {}", self.tree.node(id).path()),
        format!("request body cannot be resolved: {error}"),
      )
    })?;
    if body.content.is_empty() {
      return Ok(None);
    }

    if let Some(selected) = self.select_content(&body.content) {
      let context = InlineContext::new(namespace, format!("{inline_prefix}RequestBody"));
      let ty = self.resolve_schema(&selected.schema, &context)?;
      let description = match &selected.schema {
        ObjectOrReference::Object(inline) => inline.documentation().map(ToString::to_string),
        ObjectOrReference::Ref { .. } => None,
      };
      return Ok(Some(RequestBodyInfo {
        ty: ty.non_null(),
        content_type: selected.content_types.first().cloned(),
        description: description.unwrap_or_else(|| "The request body".to_string()),
      }));
    }

    let content_types = body.content.keys().collect::<Vec<_>>();
    let content_type = match content_types.as_slice() {
      [single] if !single.as_str().eq_ignore_ascii_case(WILDCARD_CONTENT_TYPE) => (*single).clone(),
      _ => OCTET_STREAM_CONTENT_TYPE.to_string(),
    };
    Ok(Some(RequestBodyInfo {
      ty: CodeType::primitive(Primitive::Stream).non_null(),
      content_type: Some(content_type),
      description: "Binary request body".to_string(),
    }))
  }

  fn add_request_parameters(
    &mut self,
    method: ElementId,
    body: Option<&RequestBodyInfo>,
    configuration: ElementId,
  ) -> GenerationResult<()> {
    if let Some(body) = body {
      let parameter = self.dom.add_child(
        method,
        BODY_PARAMETER_NAME,
        ElementKind::Parameter(ParameterDef::new(ParameterKind::RequestBody, body.ty)),
      )?;
      self.dom.document(parameter, Some(&body.description));
    }

    let mut def = ParameterDef::new(ParameterKind::RequestConfiguration, CodeType::definition(configuration));
    def.optional = true;
    let parameter = self
      .dom
      .add_child(method, REQUEST_CONFIGURATION_PARAMETER_NAME, ElementKind::Parameter(def))?;
    self.dom.document(
      parameter,
      Some("Configuration for the request such as headers, query parameters, and middleware options."),
    );
    Ok(())
  }
}

struct RequestBodyInfo {
  ty: CodeType,
  content_type: Option<String>,
  description: String,
}
