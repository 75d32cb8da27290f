mod models;
mod operations;
mod request_builders;

use oas3::Spec;

use crate::generator::{
  codedom::{CodeDom, ElementId, ElementTag},
  config::GenerationConfig,
  errors::GenerationError,
  resolver::{ModelResolver, Resolution},
  uri_space::UriSpaceTree,
};

pub(super) fn resolve_with(spec: &Spec, config: &GenerationConfig) -> Resolution {
  let tree = UriSpaceTree::from_spec(spec).expect("document declares paths");
  ModelResolver::new(spec, config, &tree)
    .resolve()
    .expect("resolution succeeds")
}

pub(super) fn resolve(spec: &Spec) -> Resolution {
  resolve_with(spec, &GenerationConfig::default())
}

pub(super) fn resolve_error(spec: &Spec) -> GenerationError {
  let config = GenerationConfig::default();
  let tree = UriSpaceTree::from_spec(spec).expect("document declares paths");
  ModelResolver::new(spec, &config, &tree)
    .resolve()
    .expect_err("resolution fails")
}

/// A class or interface by its dotted namespace plus nesting chain.
pub(super) fn find(dom: &CodeDom, qualified: &str) -> ElementId {
  dom
    .ids()
    .find(|id| dom.element(*id).is_type_declaration() && dom.qualified_name(*id) == qualified)
    .unwrap_or_else(|| panic!("no declaration named {qualified}"))
}

pub(super) fn child(dom: &CodeDom, parent: ElementId, name: &str, tag: ElementTag) -> ElementId {
  dom
    .find_child_of_kind(parent, name, tag)
    .unwrap_or_else(|| panic!("no {tag} named {name} under {}", dom.qualified_name(parent)))
}

pub(super) fn names_of(dom: &CodeDom, parent: ElementId, tag: ElementTag) -> Vec<String> {
  dom
    .children_of_kind(parent, tag)
    .map(|id| dom.name(id).to_string())
    .collect()
}

pub(super) fn classes_named(dom: &CodeDom, name: &str) -> usize {
  dom
    .ids()
    .filter(|id| dom.element(*id).tag() == ElementTag::Class && dom.name(*id) == name)
    .count()
}
