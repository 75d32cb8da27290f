use std::{
  cmp::Ordering,
  collections::{BTreeSet, HashSet},
  hash::{Hash, Hasher},
};

use glob::{MatchOptions, Pattern};

use crate::generator::errors::{GenerationError, GenerationResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: false,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

/// A path glob, optionally restricted to some HTTP methods with a `#GET,POST` suffix.
#[derive(Debug, Clone)]
pub struct PathPattern {
  text: String,
  glob: Pattern,
  methods: BTreeSet<String>,
}

impl PathPattern {
  pub fn parse(raw: &str) -> GenerationResult<Self> {
    let raw = raw.trim();
    let (path, methods) = match raw.split_once('#') {
      Some((path, methods)) => (
        path,
        methods
          .split(',')
          .map(|method| method.trim().to_ascii_uppercase())
          .filter(|method| !method.is_empty())
          .collect(),
      ),
      None => (raw, BTreeSet::new()),
    };

    let path = if path.starts_with('/') {
      path.to_string()
    } else {
      format!("/{path}")
    };

    let glob = Pattern::new(&path).map_err(|source| GenerationError::InvalidPattern {
      pattern: raw.to_string(),
      source,
    })?;

    Ok(Self {
      text: raw.to_string(),
      glob,
      methods,
    })
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }

  pub fn matches_path(&self, path: &str) -> bool {
    self.glob.matches_with(path, MATCH_OPTIONS)
  }

  pub fn matches(&self, path: &str, method: &str) -> bool {
    self.matches_path(path) && (self.methods.is_empty() || self.methods.contains(&method.to_ascii_uppercase()))
  }
}

impl PartialEq for PathPattern {
  fn eq(&self, other: &Self) -> bool {
    self.text == other.text
  }
}

impl Eq for PathPattern {}

impl Hash for PathPattern {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.text.hash(state);
  }
}

impl PartialOrd for PathPattern {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for PathPattern {
  fn cmp(&self, other: &Self) -> Ordering {
    self.text.cmp(&other.text)
  }
}

/// Include and exclude globs applied to path templates before the URI space is built.
///
/// No include pattern means everything is included; an exclusion always wins.
#[derive(Debug, Clone, Default)]
pub struct PathPatterns {
  include: Vec<PathPattern>,
  exclude: Vec<PathPattern>,
}

impl PathPatterns {
  pub fn new<'a, I, E>(include: I, exclude: E) -> GenerationResult<Self>
  where
    I: IntoIterator<Item = &'a String>,
    E: IntoIterator<Item = &'a String>,
  {
    Ok(Self {
      include: compile(include)?,
      exclude: compile(exclude)?,
    })
  }

  pub fn is_empty(&self) -> bool {
    self.include.is_empty() && self.exclude.is_empty()
  }

  pub fn includes_operation(&self, path: &str, method: &str) -> bool {
    let included = self.include.is_empty() || self.include.iter().any(|pattern| pattern.matches(path, method));
    included && !self.exclude.iter().any(|pattern| pattern.matches(path, method))
  }
}

fn compile<'a, I>(patterns: I) -> GenerationResult<Vec<PathPattern>>
where
  I: IntoIterator<Item = &'a String>,
{
  let mut seen = HashSet::new();
  let mut compiled = vec![];
  for raw in patterns {
    let pattern = PathPattern::parse(raw)?;
    if seen.insert(pattern.clone()) {
      compiled.push(pattern);
    }
  }
  compiled.sort();
  Ok(compiled)
}
