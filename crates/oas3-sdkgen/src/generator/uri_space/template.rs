use std::{collections::BTreeMap, sync::LazyLock};

use http::Method;
use itertools::Itertools;
use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Parameter, ParameterIn, ParameterStyle, PathItem},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{Captures, Regex};

use super::{NodeId, UriSpaceTree, naming::STRIP_EXTENSION_RE, operations};

pub(crate) const BASE_URL_PLACEHOLDER: &str = "{+baseurl}";

/// Everything outside the RFC 3986 unreserved set is escaped. `-`, `.` and `~` are
/// unreserved in URLs but not valid in URI template variable names, so they are escaped too.
const TEMPLATE_VARIABLE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_');

static PATH_PARAMETER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("path parameter regex is valid"));

/// A query parameter as it appears in URL templates and query parameter classes.
#[derive(Debug, Clone)]
pub(crate) struct QueryParameterInfo {
  pub(crate) name: String,
  pub(crate) required: bool,
  pub(crate) explode: bool,
  pub(crate) deprecated: bool,
  pub(crate) description: Option<String>,
  pub(crate) schema: Option<ObjectOrReference<ObjectSchema>>,
}

impl QueryParameterInfo {
  fn from_parameter(parameter: Parameter) -> Self {
    let explode = parameter
      .explode
      .unwrap_or(matches!(parameter.style, None | Some(ParameterStyle::Form)));
    Self {
      name: parameter.name,
      required: parameter.required.unwrap_or(false),
      explode,
      deprecated: parameter.deprecated.unwrap_or(false),
      description: parameter.description,
      schema: parameter.schema,
    }
  }

  /// Name used inside the URL template.
  pub(crate) fn serialization_name(&self) -> String {
    sanitize_parameter_name_for_url_template(&self.name)
  }
}

/// A path placeholder together with its declaration, when the document has one.
#[derive(Debug, Clone)]
pub(crate) struct PathParameterInfo {
  pub(crate) name: String,
  pub(crate) description: Option<String>,
  pub(crate) schema: Option<ObjectOrReference<ObjectSchema>>,
}

impl PathParameterInfo {
  pub(crate) fn serialization_name(&self) -> String {
    sanitize_parameter_name_for_url_template(&self.name)
  }
}

/// `{user-id}.json` becomes `user%2Did`.
pub(crate) fn sanitize_parameter_name_for_url_template(original: &str) -> String {
  if original.is_empty() {
    return String::new();
  }
  let stripped = STRIP_EXTENSION_RE.replace(original, "");
  let name = stripped.trim_start_matches('{').trim_end_matches('}');
  utf8_percent_encode(name, TEMPLATE_VARIABLE_ENCODE_SET).to_string()
}

/// Escapes every `{placeholder}` of a path so it is a valid URI template variable.
pub(crate) fn sanitize_path_for_url_template(path: &str) -> String {
  PATH_PARAMETER_RE
    .replace_all(path, |caps: &Captures| {
      format!("{{{}}}", sanitize_parameter_name_for_url_template(&caps[1]))
    })
    .into_owned()
}

fn resolved_parameters<'a>(
  parameters: impl IntoIterator<Item = &'a ObjectOrReference<Parameter>>,
  spec: &Spec,
) -> Vec<Parameter> {
  parameters
    .into_iter()
    .filter_map(|parameter| parameter.resolve(spec).ok())
    .collect()
}

/// Path-level parameters followed by the parameters of `method`, or of every operation.
fn parameters_for(path_item: &PathItem, method: Option<&Method>, spec: &Spec) -> Vec<Parameter> {
  let mut parameters = resolved_parameters(&path_item.parameters, spec);
  for (operation_method, operation) in operations(path_item) {
    if method.is_none_or(|wanted| *wanted == operation_method) {
      parameters.extend(resolved_parameters(&operation.parameters, spec));
    }
  }
  parameters
}

impl UriSpaceTree {
  /// Query parameters of the node, deduplicated by name and sorted ordinally.
  pub(crate) fn query_parameters(&self, id: NodeId, method: Option<&Method>, spec: &Spec) -> Vec<QueryParameterInfo> {
    let Some(path_item) = self.node(id).path_item() else {
      return vec![];
    };

    let mut by_name = BTreeMap::new();
    for parameter in parameters_for(path_item, method, spec) {
      if parameter.location == ParameterIn::Query && !by_name.contains_key(&parameter.name) {
        by_name.insert(parameter.name.clone(), QueryParameterInfo::from_parameter(parameter));
      }
    }
    by_name.into_values().collect()
  }

  /// Placeholders of the node's own segment, resolved against the declarations found on
  /// the node or, failing that, on its descendants.
  pub(crate) fn segment_parameters(&self, id: NodeId, spec: &Spec) -> Vec<PathParameterInfo> {
    let segment = self.node(id).segment();
    let declared = self.declared_path_parameters(id, spec);

    PATH_PARAMETER_RE
      .captures_iter(segment)
      .map(|caps| {
        let name = caps[1].to_string();
        let declaration = declared.iter().find(|parameter| parameter.name.eq_ignore_ascii_case(&name));
        PathParameterInfo {
          description: declaration.and_then(|parameter| parameter.description.clone()),
          schema: declaration.and_then(|parameter| parameter.schema.clone()),
          name,
        }
      })
      .collect()
  }

  /// Placeholders of every segment from the root down to the node.
  pub(crate) fn path_parameters(&self, id: NodeId, spec: &Spec) -> Vec<PathParameterInfo> {
    let mut chain = vec![];
    let mut current = Some(id);
    while let Some(node_id) = current {
      chain.push(node_id);
      current = self.node(node_id).parent();
    }
    chain.reverse();
    chain
      .into_iter()
      .flat_map(|node_id| self.segment_parameters(node_id, spec))
      .collect()
  }

  fn declared_path_parameters(&self, id: NodeId, spec: &Spec) -> Vec<Parameter> {
    let mut pending = vec![id];
    while let Some(node_id) = pending.pop() {
      let node = self.node(node_id);
      if let Some(path_item) = node.path_item() {
        let declared = parameters_for(path_item, None, spec)
          .into_iter()
          .filter(|parameter| parameter.location == ParameterIn::Path)
          .collect::<Vec<_>>();
        if !declared.is_empty() {
          return declared;
        }
      }
      pending.extend(node.children().collect::<Vec<_>>().into_iter().rev());
    }
    vec![]
  }

  /// RFC 6570 template for the node: `{+baseurl}`, the escaped path, then the query
  /// expansion (`?required={required}` followed by `{&optional*}`, or `{?optional*}`).
  pub(crate) fn url_template(&self, id: NodeId, method: Option<&Method>, spec: &Spec) -> String {
    let node = self.node(id);
    let path = if node.is_root() {
      String::new()
    } else {
      sanitize_path_for_url_template(node.path())
    };

    let parameters = self.query_parameters(id, method, spec);
    let required = parameters
      .iter()
      .filter(|parameter| parameter.required)
      .map(|parameter| format!("{}={{{}}}", parameter.name, parameter.serialization_name()))
      .join("&");
    let optional = parameters
      .iter()
      .filter(|parameter| !parameter.required)
      .map(|parameter| {
        let explode = if parameter.explode { "*" } else { "" };
        format!("{}{explode}", parameter.serialization_name())
      })
      .join(",");

    let query = match (required.is_empty(), optional.is_empty()) {
      (true, true) => String::new(),
      (false, true) => format!("?{required}"),
      (true, false) => format!("{{?{optional}}}"),
      (false, false) => format!("?{required}{{&{optional}}}"),
    };

    format!("{BASE_URL_PLACEHOLDER}{path}{query}")
  }
}
