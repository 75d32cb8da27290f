use std::{cmp::Ordering, sync::LazyLock};

use indexmap::IndexMap;
use mediatype::MediaType;
use regex::Regex;

use crate::generator::errors::{GenerationError, GenerationResult};

pub(crate) const DEFAULT_STRUCTURED_MIME_TYPES: [&str; 4] = [
  "application/json;q=1",
  "text/plain;q=0.9",
  "application/x-www-form-urlencoded;q=0.2",
  "multipart/form-data;q=0.1",
];

static VENDOR_SPECIFIC_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^/+]+\+").expect("vendor specific mime regex is valid"));

/// Ordered set of content types the generator serializes natively, each with a `q` priority.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredMimeTypes {
  entries: IndexMap<String, f32>,
}

impl Default for StructuredMimeTypes {
  fn default() -> Self {
    let entries = DEFAULT_STRUCTURED_MIME_TYPES
      .iter()
      .filter_map(|value| parse_entry(value).ok())
      .collect();
    Self { entries }
  }
}

impl StructuredMimeTypes {
  /// Parses `type/subtype;q=x` entries. A missing `q` defaults to `1`.
  pub fn parse<I, S>(values: I) -> GenerationResult<Self>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut entries = IndexMap::new();
    for value in values {
      let (mime, priority) = parse_entry(value.as_ref())?;
      entries.insert(mime, priority);
    }

    if entries.is_empty() {
      return Err(GenerationError::InvalidConfiguration {
        option: "structured_mime_types",
        reason: "at least one content type is required".to_string(),
      });
    }

    Ok(Self { entries })
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Looks the content type up, falling back to its vendor-neutral form
  /// (`application/vnd.acme+json` becomes `application/json`).
  pub fn priority(&self, content_type: &str) -> Option<f32> {
    let normalized = normalize(content_type);
    self.entries.get(&normalized).copied().or_else(|| {
      let neutral = VENDOR_SPECIFIC_RE.replace(&normalized, "");
      self.entries.get(neutral.as_ref()).copied()
    })
  }

  pub fn contains(&self, content_type: &str) -> bool {
    self.priority(content_type).is_some()
  }

  /// Filters the candidates down to the structured ones, highest priority first and
  /// ties broken by descending name.
  pub fn select<'a, I>(&self, candidates: I) -> Vec<&'a str>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let mut selected = candidates
      .into_iter()
      .filter_map(|candidate| self.priority(candidate).map(|priority| (candidate, priority)))
      .collect::<Vec<_>>();
    selected.sort_by(|(a_name, a_priority), (b_name, b_priority)| {
      b_priority
        .total_cmp(a_priority)
        .then_with(|| b_name.cmp(a_name))
    });
    selected.dedup_by(|(a, _), (b, _)| a == b);
    selected.into_iter().map(|(name, _)| name).collect()
  }

  /// Entries as `type/subtype;q=value`, highest priority first.
  pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
    let mut sorted = self.entries.iter().collect::<Vec<_>>();
    sorted.sort_by(|(a_name, a_priority), (b_name, b_priority)| match b_priority.total_cmp(a_priority) {
      Ordering::Equal => a_name.cmp(b_name),
      other => other,
    });
    sorted.into_iter().map(|(name, priority)| format!("{name};q={priority}"))
  }

  /// Content types in priority order without their weights.
  pub fn names(&self) -> Vec<String> {
    self
      .iter()
      .map(|entry| entry.split(';').next().unwrap_or_default().to_string())
      .collect()
  }
}

fn parse_entry(value: &str) -> GenerationResult<(String, f32)> {
  let invalid = |reason: String| GenerationError::InvalidConfiguration {
    option: "structured_mime_types",
    reason,
  };

  let media = MediaType::parse(value.trim()).map_err(|e| invalid(format!("'{value}' is not a media type: {e}")))?;
  let mut essence = format!("{}/{}", media.ty.as_str(), media.subty.as_str());
  if let Some(suffix) = media.suffix.as_ref() {
    essence.push('+');
    essence.push_str(suffix.as_str());
  }

  let priority = match media.params.iter().find(|(name, _)| name.as_str().eq_ignore_ascii_case("q")) {
    Some((_, weight)) => weight
      .as_str()
      .parse::<f32>()
      .map_err(|_| invalid(format!("'{value}' has a non numeric priority")))?,
    None => 1.0,
  };

  if !(0.0..=1.0).contains(&priority) {
    return Err(invalid(format!("'{value}' priority must be between 0 and 1")));
  }

  Ok((essence.to_ascii_lowercase(), priority))
}

fn normalize(content_type: &str) -> String {
  content_type
    .split(';')
    .next()
    .unwrap_or_default()
    .trim()
    .to_ascii_lowercase()
}
