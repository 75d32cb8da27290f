//! Client generation from OpenAPI documents.
//!
//! Phase one turns the document into a language neutral code model: the URI space tree
//! groups operations by resource, the resolver builds request builders and models, and the
//! refiner plus the order engine prepare it for one target language. Phase two renders each
//! top-level declaration into its own file.

pub(crate) mod codedom;
pub(crate) mod comparer;
pub mod config;
pub mod errors;
pub mod metrics;
pub(crate) mod order;
pub mod orchestrator;
pub(crate) mod refiner;
pub(crate) mod resolver;
pub(crate) mod uri_space;
pub(crate) mod writers;

#[cfg(test)]
mod tests;
