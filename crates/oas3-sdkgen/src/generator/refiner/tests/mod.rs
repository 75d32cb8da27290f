mod accessors;
mod usings;

use oas3::Spec;

use crate::generator::{
  codedom::{CodeDom, ElementId, ElementKind, ElementTag, UsingDef},
  config::{GenerationConfig, TargetLanguage},
  metrics::GenerationStats,
  refiner::refine,
  resolver::Resolution,
  tests::support::resolve_model,
};

pub(super) fn refined(spec: &Spec, config: &GenerationConfig) -> Resolution {
  let mut resolution = resolve_model(spec, config);
  refine(&mut resolution.dom, config.language, &mut resolution.stats).expect("refinement succeeds");
  resolution
}

pub(super) fn refined_for(spec: &Spec, language: TargetLanguage) -> Resolution {
  refined(spec, &GenerationConfig::builder().language(language).build())
}

pub(super) fn method_names(dom: &CodeDom, parent: ElementId) -> Vec<String> {
  dom
    .children_of_kind(parent, ElementTag::Method)
    .map(|id| dom.name(id).to_string())
    .collect()
}

/// Names of the declarations and abstractions imported by `declaration`.
pub(super) fn imports(dom: &CodeDom, declaration: ElementId) -> Vec<String> {
  dom
    .children_of_kind(declaration, ElementTag::Using)
    .filter_map(|id| match &dom.element(id).kind {
      ElementKind::Using(UsingDef::Declaration(target)) => Some(dom.qualified_name(*target)),
      ElementKind::Using(UsingDef::External(abstraction)) => Some(abstraction.to_string()),
      _ => None,
    })
    .collect()
}

pub(super) fn no_stats() -> GenerationStats {
  GenerationStats::default()
}
