//! Target specific adjustments applied to the resolved model before ordering.

mod accessors;
mod interfaces;
mod usings;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::generator::{
  codedom::CodeDom,
  config::TargetLanguage,
  errors::GenerationResult,
  metrics::GenerationStats,
  refiner::{accessors::AccessorGenerator, interfaces::ModelInterfaces, usings::UsingCollector},
};

/// Rewrites `dom` for `language`.
///
/// Java and Go read model state through generated accessors, Go additionally consumes models
/// through interfaces, and every language except the http snippets gets import elements on
/// its top-level declarations.
pub(crate) fn refine(dom: &mut CodeDom, language: TargetLanguage, stats: &mut GenerationStats) -> GenerationResult<()> {
  if matches!(language, TargetLanguage::Java | TargetLanguage::Go) {
    let added = AccessorGenerator::new(dom).apply()?;
    debug!(%language, accessors = added, "added property accessors");
  }

  if language == TargetLanguage::Go {
    let interfaces = ModelInterfaces::new(dom).apply()?;
    for _ in 0..interfaces {
      stats.record_interface();
    }
  }

  if language != TargetLanguage::Http {
    UsingCollector::new(dom, language).apply()?;
  }
  Ok(())
}
