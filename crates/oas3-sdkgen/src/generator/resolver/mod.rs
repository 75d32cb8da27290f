//! Builds the code model from the URI space tree and the schemas it references.
//!
//! Resolution is single threaded. Classes are registered in the shape and component caches
//! before their members are resolved, so self references and reference cycles find the
//! class under construction instead of recursing.

mod models;
mod operations;
mod primitives;
mod registry;
mod request_builders;

use std::collections::{BTreeMap, BTreeSet};

use oas3::Spec;
use tracing::{debug, trace};

pub(crate) use primitives::primitive_for;
pub(crate) use registry::SchemaRegistry;

use super::{
  codedom::{ClassDef, ClassKind, CodeDom, ElementId, ElementKind},
  comparer::SchemaKey,
  config::GenerationConfig,
  errors::GenerationResult,
  metrics::GenerationStats,
  uri_space::UriSpaceTree,
};
use crate::naming::identifiers::ensure_unique;

/// The resolved model plus what was learned while building it.
#[derive(Debug)]
pub(crate) struct Resolution {
  pub(crate) dom: CodeDom,
  /// The client class generated for the tree root.
  pub(crate) root: ElementId,
  pub(crate) stats: GenerationStats,
}

/// Where an inline schema lands when it needs a declaration of its own.
#[derive(Debug, Clone)]
pub(crate) struct InlineContext {
  pub(crate) namespace: ElementId,
  pub(crate) name: String,
}

impl InlineContext {
  pub(crate) fn new(namespace: ElementId, name: impl Into<String>) -> Self {
    Self {
      namespace,
      name: name.into(),
    }
  }

  #[must_use]
  pub(crate) fn with_suffix(&self, suffix: &str) -> Self {
    Self::new(self.namespace, format!("{}{suffix}", self.name))
  }
}

pub(crate) struct ModelResolver<'a> {
  spec: &'a Spec,
  config: &'a GenerationConfig,
  tree: &'a UriSpaceTree,
  registry: SchemaRegistry,
  dom: CodeDom,
  by_shape: BTreeMap<SchemaKey, ElementId>,
  by_component: BTreeMap<String, ElementId>,
  /// Components whose resolution has started but produced no declaration yet.
  in_progress: BTreeSet<String>,
  /// Components standing for another component's declaration while that one resolves.
  aliases: BTreeMap<String, String>,
  stats: GenerationStats,
}

impl<'a> ModelResolver<'a> {
  pub(crate) fn new(spec: &'a Spec, config: &'a GenerationConfig, tree: &'a UriSpaceTree) -> Self {
    let (registry, warnings) = SchemaRegistry::new(spec);
    let mut stats = GenerationStats::default();
    stats.record_warnings(warnings);

    Self {
      spec,
      config,
      tree,
      registry,
      dom: CodeDom::new(),
      by_shape: BTreeMap::new(),
      by_component: BTreeMap::new(),
      in_progress: BTreeSet::new(),
      aliases: BTreeMap::new(),
      stats,
    }
  }

  /// Resolves every reachable component, then the request builders from the root down.
  ///
  /// Components go first so a component name wins over the inline name of an identically
  /// shaped schema.
  ///
  /// # Errors
  /// Any resolution failure aborts the whole run.
  pub(crate) fn resolve(mut self) -> GenerationResult<Resolution> {
    let cycles = self.registry.detect_cycles();
    for cycle in &cycles {
      debug!(schemas = ?cycle, "schema reference cycle");
    }
    self.stats.record_cycles(cycles);

    let reachable = self.registry.reachable(self.tree, self.spec);
    debug!(count = reachable.len(), "resolving reachable components");
    for name in reachable {
      self.resolve_component(&name)?;
    }

    let root = self.create_request_builder(UriSpaceTree::ROOT)?;
    debug!(elements = self.dom.len(), "code model resolved");

    Ok(Resolution {
      dom: self.dom,
      root,
      stats: self.stats,
    })
  }

  /// Adds a class under `context`, renaming it when the namespace already declares the
  /// name, and registers it in the caches before any member is resolved.
  fn declare_class(
    &mut self,
    context: &InlineContext,
    kind: ClassKind,
    key: Option<SchemaKey>,
    component: Option<&str>,
  ) -> GenerationResult<ElementId> {
    let name = ensure_unique(&context.name, |candidate| {
      self.dom.find_child_by_name(context.namespace, candidate).is_some()
    });
    let id = self
      .dom
      .add_child(context.namespace, name, ElementKind::Class(ClassDef::new(kind)))?;

    if let Some(key) = key {
      self.by_shape.insert(key, id);
    }
    if let Some(component) = component {
      self.by_component.insert(component.to_string(), id);
    }
    trace!(class = %self.dom.qualified_name(id), %kind, "declared class");
    Ok(id)
  }
}

#[cfg(test)]
mod tests;
