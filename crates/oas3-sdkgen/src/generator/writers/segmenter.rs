use std::path::{Path, PathBuf};

use crate::generator::{
  codedom::{CodeDom, ElementId},
  errors::{GenerationError, GenerationResult},
  writers::conventions::Conventions,
};

/// Maps declarations onto files below the output directory.
///
/// The client namespace is the output root; every remaining namespace segment becomes a
/// directory cased for the target language.
#[derive(Debug, Clone)]
pub(crate) struct PathSegmenter {
  root: PathBuf,
  root_namespace: String,
  conventions: Conventions,
}

impl PathSegmenter {
  pub(crate) fn new(root: impl Into<PathBuf>, root_namespace: impl Into<String>, conventions: Conventions) -> Self {
    Self {
      root: root.into(),
      root_namespace: root_namespace.into(),
      conventions,
    }
  }

  pub(crate) fn root(&self) -> &Path {
    &self.root
  }

  /// Directory segments of `namespace` relative to the client namespace.
  pub(crate) fn directory_segments(&self, namespace: &str) -> Vec<String> {
    let relative = if namespace == self.root_namespace {
      ""
    } else {
      namespace
        .strip_prefix(&self.root_namespace)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(namespace)
    };
    relative
      .split('.')
      .filter(|segment| !segment.is_empty())
      .map(|segment| self.conventions.directory_name(segment))
      .collect()
  }

  pub(crate) fn path(&self, namespace: &str, declaration: &str) -> PathBuf {
    let mut path = self.root.clone();
    path.extend(self.directory_segments(namespace));
    path.push(self.conventions.file_name(declaration));
    path
  }

  pub(crate) fn path_for(&self, dom: &CodeDom, declaration: ElementId) -> PathBuf {
    let namespace = dom.name(dom.namespace_of(declaration));
    self.path(namespace, dom.name(declaration))
  }

  /// Creates the directories leading to `path` when they do not exist yet.
  pub(crate) async fn ensure_directory(&self, path: &Path) -> GenerationResult<()> {
    let Some(parent) = path.parent() else {
      return Ok(());
    };
    if tokio::fs::try_exists(parent).await.unwrap_or(false) {
      return Ok(());
    }
    tokio::fs::create_dir_all(parent)
      .await
      .map_err(|source| GenerationError::environment(parent, source))
  }
}
