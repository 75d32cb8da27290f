mod conventions;
mod go;
mod http;
mod java;
mod python;
mod segmenter;
mod typescript;

use oas3::Spec;

use crate::generator::{
  config::{GenerationConfig, TargetLanguage},
  errors::GenerationResult,
  order,
  refiner::refine,
  tests::support::{declaration, resolve_model},
  writers::{LanguageWriter, ModelIndex, RenderedFile},
};

/// Runs the model pipeline for `config` and renders the declaration named `qualified`.
pub(super) fn try_render(spec: &Spec, config: &GenerationConfig, qualified: &str) -> GenerationResult<RenderedFile> {
  let mut resolution = resolve_model(spec, config);
  refine(&mut resolution.dom, config.language, &mut resolution.stats).expect("refinement succeeds");
  order::apply(&mut resolution.dom, config.language);
  let index = ModelIndex::build(&resolution.dom);
  let id = declaration(&resolution.dom, qualified);
  LanguageWriter::new(config).render(&resolution.dom, &index, id)
}

pub(super) fn render(spec: &Spec, language: TargetLanguage, qualified: &str) -> String {
  let config = GenerationConfig::builder().language(language).output_path("out").build();
  try_render(spec, &config, qualified)
    .unwrap_or_else(|error| panic!("{qualified} renders: {error}"))
    .content
}

/// Qualified names of every declaration that gets a file.
pub(super) fn emitted(spec: &Spec, language: TargetLanguage) -> Vec<String> {
  let config = GenerationConfig::builder().language(language).build();
  let mut resolution = resolve_model(spec, &config);
  refine(&mut resolution.dom, language, &mut resolution.stats).expect("refinement succeeds");
  let writer = LanguageWriter::new(&config);
  writer
    .declarations(&resolution.dom)
    .into_iter()
    .map(|id| resolution.dom.qualified_name(id))
    .collect()
}

#[track_caller]
pub(super) fn assert_contains_all(content: &str, expected: &[&str]) {
  for needle in expected {
    assert!(content.contains(needle), "missing `{needle}` in:\n{content}");
  }
}
