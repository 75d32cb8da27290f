use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{NodeId, UriSpaceTree};
use crate::{
  generator::config::MODELS_NAMESPACE_SEGMENT,
  naming::identifiers::{cleanup_symbol_name, to_first_character_upper_case, to_original_camel_case},
};

pub(crate) const ITEM_NAMESPACE_SEGMENT: &str = "item";
const RESERVED_ITEM_NAME: &str = "Item";
const ESCAPED_SUFFIX: &str = "Escaped";
const WITH_KEYWORD: &str = "With";
const TRAILING_SLASH_NAME: &str = "slash";
const NAMESPACE_SPLIT_CHARACTERS: [char; 3] = ['.', '-', '$'];
const SEGMENTS_TO_SKIP_FOR_CLASS_NAMES: [&str; 6] = ["json", "xml", "csv", "yaml", "yml", "txt"];
const HTTP_VERBS: [&str; 8] = ["get", "post", "put", "patch", "delete", "head", "options", "trace"];

// {id}, name(idParam={id}), name(idParam='{id}'), name(idParam='{id}',idParam2='{id2}')
static PATH_PARAMETERS_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?<prefix>\w+)?(?<equals>=?)'?\{(?<param>\w+)\}'?,?").expect("path parameters regex is valid")
});
static AT_SIGN_PARAMETER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"=@(\w+)").expect("at sign parameter regex is valid"));
static ID_CLASS_NAME_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)-?id\d?\}?$").expect("id class name regex is valid"));
pub(super) static STRIP_EXTENSION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\.(?:json|yaml|yml|csv|txt)$").expect("extension regex is valid"));
static PARAMETER_WITH_EXTENSION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{\w+\}\.(?:json|yaml|yml|csv|txt)$").expect("parameter extension regex is valid"));

pub(super) fn is_single_parameter_segment(segment: &str) -> bool {
  if segment.is_empty() {
    return false;
  }
  let without_extension = STRIP_EXTENSION_RE.replace(segment, "");
  without_extension.starts_with('{') && without_extension.ends_with('}') && without_extension.matches('{').count() == 1
}

/// Rewrites parameter placeholders into `With<Param>` fragments and drops parentheses,
/// so `getStats(period='{period}')` becomes `getStatsWithPeriod`.
pub(crate) fn cleanup_parameters_from_path(segment: &str) -> String {
  if segment.is_empty() {
    return String::new();
  }
  let at_replaced = AT_SIGN_PARAMETER_RE.replace_all(segment, "={$1}");
  PATH_PARAMETERS_RE
    .replace_all(&at_replaced, |caps: &Captures| {
      let param = to_first_character_upper_case(&caps["param"]);
      if caps["equals"].is_empty() {
        let prefix = caps.name("prefix").map_or("", |m| m.as_str());
        format!("{prefix}{WITH_KEYWORD}{param}")
      } else {
        format!("{WITH_KEYWORD}{param}")
      }
    })
    .replace([')', '('], "")
}

fn replace_value_identifier(name: &str) -> String {
  name.replace("$value", "Content")
}

fn namespace_segment(segment: &str) -> String {
  let replaced = if is_single_parameter_segment(segment) {
    ITEM_NAMESPACE_SEGMENT.to_string()
  } else if segment.eq_ignore_ascii_case(RESERVED_ITEM_NAME) {
    format!("{RESERVED_ITEM_NAME}_{ESCAPED_SUFFIX}")
  } else {
    segment.to_string()
  };

  let joined = to_original_camel_case(&cleanup_parameters_from_path(&replaced), &NAMESPACE_SPLIT_CHARACTERS);

  let escaped = if SEGMENTS_TO_SKIP_FOR_CLASS_NAMES.contains(&joined.as_str()) {
    format!("{joined}{ESCAPED_SUFFIX}")
  } else {
    joined
  };

  let cleaned = cleanup_symbol_name(&escaped);
  if cleaned.eq_ignore_ascii_case(MODELS_NAMESPACE_SEGMENT) {
    format!("{cleaned}Requests")
  } else {
    cleaned
  }
}

fn is_skipped_extension(segment: &str) -> bool {
  SEGMENTS_TO_SKIP_FOR_CLASS_NAMES
    .iter()
    .any(|skipped| skipped.eq_ignore_ascii_case(segment))
}

enum SegmentReducer {
  /// Class names keep only the last dotted part.
  Last,
  /// Navigation names camel-join every dotted part.
  Join,
}

impl UriSpaceTree {
  /// Dotted namespace for the node, rooted at `prefix`. Empty segments are skipped.
  pub(crate) fn namespace_name(&self, id: NodeId, prefix: &str) -> String {
    let segments = self
      .segments(id)
      .into_iter()
      .filter(|segment| !segment.is_empty())
      .map(namespace_segment)
      .filter(|segment| !segment.is_empty())
      .collect::<Vec<_>>();

    match (prefix.is_empty(), segments.is_empty()) {
      (_, true) => prefix.to_string(),
      (true, false) => segments.join("."),
      (false, false) => format!("{prefix}.{}", segments.join(".")),
    }
  }

  /// Name of the member a parent exposes to reach this node, with `suffix` appended.
  /// Names colliding with an HTTP verb get a `Path` suffix.
  pub(crate) fn navigation_name(&self, id: NodeId, suffix: &str) -> String {
    let name = self.segment_name(id, suffix, SegmentReducer::Join, false);
    if HTTP_VERBS.iter().any(|verb| verb.eq_ignore_ascii_case(&name)) {
      return format!("{name}Path");
    }
    name
  }

  /// Name of the request builder class generated for the node.
  pub(crate) fn request_builder_class_name(&self, id: NodeId, suffix: &str) -> String {
    to_first_character_upper_case(&self.navigation_name(id, suffix))
  }

  /// Class name derived from the last segment, used for inline request and response models.
  pub(crate) fn class_name(&self, id: NodeId, suffix: &str) -> String {
    to_first_character_upper_case(&self.segment_name(id, suffix, SegmentReducer::Last, true))
  }

  fn segment_name(&self, id: NodeId, suffix: &str, reducer: SegmentReducer, skip_extension: bool) -> String {
    let node = self.node(id);
    let segment = if node.segment().is_empty() {
      TRAILING_SLASH_NAME
    } else {
      node.segment()
    };

    let segment = if PARAMETER_WITH_EXTENSION_RE.is_match(segment) {
      STRIP_EXTENSION_RE.replace(segment, "")
    } else {
      segment.into()
    };
    let mut raw = replace_value_identifier(&cleanup_parameters_from_path(&segment));

    if node.belongs_to_item_namespace() {
      let cleaned = ID_CLASS_NAME_RE.replace(&raw, "").into_owned();
      if cleaned != raw {
        raw = if cleaned == WITH_KEYWORD {
          self.previous_segment_name(id)
        } else {
          cleaned
        };
      }
    }

    let mut parts = raw.split('.').filter(|part| !part.is_empty()).collect::<Vec<_>>();
    if skip_extension && parts.len() > 1 {
      parts.retain(|part| !is_skipped_extension(part));
    }

    let reduced = match reducer {
      SegmentReducer::Last => parts.last().map(ToString::to_string).unwrap_or_default(),
      SegmentReducer::Join => to_original_camel_case(&parts.join("."), &['.']),
    };

    cleanup_symbol_name(&format!("{reduced}{suffix}"))
  }

  /// Parent segment, capitalized, for item nodes whose own segment carries no name (`/todos/{id}`).
  fn previous_segment_name(&self, id: NodeId) -> String {
    self
      .parent(id)
      .filter(|parent| !parent.is_root() && !parent.segment().is_empty())
      .map_or_else(
        || RESERVED_ITEM_NAME.to_string(),
        |parent| to_first_character_upper_case(&cleanup_parameters_from_path(parent.segment())),
      )
  }
}
