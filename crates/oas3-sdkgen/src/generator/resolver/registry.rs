use std::collections::{BTreeMap, BTreeSet};

use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Operation},
};
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap, visit::Dfs};

use crate::{
  generator::{
    metrics::GenerationWarning,
    uri_space::{UriSpaceTree, operations},
  },
  utils::{SchemaExt, extract_schema_ref_name},
};

/// Component schemas of the document plus the reference and inheritance graphs between them.
#[derive(Debug)]
pub(crate) struct SchemaRegistry {
  schemas: BTreeMap<String, ObjectSchema>,
  /// Every component a schema mentions, transitively through inline sub-schemas.
  dependencies: BTreeMap<String, BTreeSet<String>>,
  /// Components a schema extends through `allOf` references.
  parents: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaRegistry {
  pub(crate) fn new(spec: &Spec) -> (Self, Vec<GenerationWarning>) {
    let mut schemas = BTreeMap::new();
    let mut warnings = vec![];

    if let Some(components) = &spec.components {
      for (name, schema_ref) in &components.schemas {
        match schema_ref.resolve(spec) {
          Ok(schema) => {
            schemas.insert(name.clone(), schema);
          }
          Err(error) => warnings.push(GenerationWarning::SchemaResolutionFailed {
            schema_name: name.clone(),
            error: error.to_string(),
          }),
        }
      }
    }

    let dependencies = schemas
      .iter()
      .map(|(name, schema)| (name.clone(), collect_refs(schema)))
      .collect();
    let parents = schemas
      .iter()
      .map(|(name, schema)| {
        let parents = schema.all_of.iter().filter_map(extract_schema_ref_name).collect();
        (name.clone(), parents)
      })
      .collect();

    (
      Self {
        schemas,
        dependencies,
        parents,
      },
      warnings,
    )
  }

  pub(crate) fn get(&self, name: &str) -> Option<&ObjectSchema> {
    self.schemas.get(name)
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.schemas.contains_key(name)
  }

  pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
    self.schemas.keys().map(String::as_str)
  }

  /// Reference cycles, each as the sorted list of participating components.
  pub(crate) fn detect_cycles(&self) -> Vec<Vec<String>> {
    let mut graph = DiGraphMap::<&str, ()>::new();
    for (node, deps) in &self.dependencies {
      graph.add_node(node.as_str());
      for dep in deps {
        graph.add_edge(node.as_str(), dep.as_str(), ());
      }
    }

    let mut cycles = kosaraju_scc(&graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
      .map(|scc| {
        let mut members = scc.into_iter().map(String::from).collect::<Vec<_>>();
        members.sort();
        members
      })
      .collect::<Vec<_>>();
    cycles.sort();
    cycles
  }

  /// Components reachable from the operations of `tree`, including their dependencies.
  pub(crate) fn reachable(&self, tree: &UriSpaceTree, spec: &Spec) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    for id in tree.walk() {
      let Some(path_item) = tree.node(id).path_item() else {
        continue;
      };
      for parameter in &path_item.parameters {
        if let Ok(parameter) = parameter.resolve(spec)
          && let Some(schema) = &parameter.schema
        {
          collect_schema_ref(schema, &mut refs);
        }
      }
      for (_, operation) in operations(path_item) {
        collect_refs_from_operation(operation, spec, &mut refs);
      }
    }
    self.expand_with_dependencies(&refs)
  }

  fn expand_with_dependencies(&self, initial: &BTreeSet<String>) -> BTreeSet<String> {
    let graph = DiGraphMap::<&str, ()>::from_edges(
      self
        .dependencies
        .iter()
        .flat_map(|(node, deps)| deps.iter().map(move |dep| (node.as_str(), dep.as_str()))),
    );

    let mut expanded = initial.clone();
    for start in initial {
      if graph.contains_node(start.as_str()) {
        let mut dfs = Dfs::new(&graph, start.as_str());
        while let Some(node) = dfs.next(&graph) {
          expanded.insert(node.to_string());
        }
      }
    }
    expanded.retain(|name| self.schemas.contains_key(name));
    expanded
  }

  /// Components whose `allOf` references `base` directly, in name order.
  pub(crate) fn derived_types(&self, base: &str) -> Vec<&str> {
    self
      .parents
      .iter()
      .filter(|(_, parents)| parents.contains(base))
      .map(|(name, _)| name.as_str())
      .collect()
  }

  /// Whether `descendant` reaches `ancestor` through `allOf` references.
  pub(crate) fn descends_from(&self, descendant: &str, ancestor: &str) -> bool {
    if descendant == ancestor {
      return true;
    }
    let graph = DiGraphMap::<&str, ()>::from_edges(
      self
        .parents
        .iter()
        .flat_map(|(node, parents)| parents.iter().map(move |parent| (node.as_str(), parent.as_str()))),
    );
    if !graph.contains_node(descendant) {
      return false;
    }
    let mut dfs = Dfs::new(&graph, descendant);
    while let Some(node) = dfs.next(&graph) {
      if node == ancestor {
        return true;
      }
    }
    false
  }
}

fn collect_refs_from_operation(operation: &Operation, spec: &Spec, refs: &mut BTreeSet<String>) {
  for parameter in &operation.parameters {
    if let Ok(parameter) = parameter.resolve(spec)
      && let Some(schema) = &parameter.schema
    {
      collect_schema_ref(schema, refs);
    }
  }

  if let Some(body) = &operation.request_body
    && let Ok(body) = body.resolve(spec)
  {
    for media_type in body.content.values() {
      if let Some(schema) = &media_type.schema {
        collect_schema_ref(schema, refs);
      }
    }
  }

  if let Some(responses) = &operation.responses {
    for response in responses.values() {
      if let Ok(response) = response.resolve(spec) {
        for media_type in response.content.values() {
          if let Some(schema) = &media_type.schema {
            collect_schema_ref(schema, refs);
          }
        }
      }
    }
  }
}

fn collect_schema_ref(schema: &ObjectOrReference<ObjectSchema>, refs: &mut BTreeSet<String>) {
  match schema {
    ObjectOrReference::Ref { .. } => {
      if let Some(name) = extract_schema_ref_name(schema) {
        refs.insert(name);
      }
    }
    ObjectOrReference::Object(inline) => refs.extend(collect_refs(inline)),
  }
}

/// Components referenced anywhere inside `schema`.
pub(crate) fn collect_refs(schema: &ObjectSchema) -> BTreeSet<String> {
  let mut refs = BTreeSet::new();
  for property in schema.properties.values() {
    collect_schema_ref(property, &mut refs);
  }
  for member in schema.one_of.iter().chain(&schema.any_of).chain(&schema.all_of) {
    collect_schema_ref(member, &mut refs);
  }
  if let Some(items) = schema.items_schema() {
    collect_schema_ref(items, &mut refs);
  }
  if let Some(oas3::spec::Schema::Object(additional)) = &schema.additional_properties {
    collect_schema_ref(additional, &mut refs);
  }
  refs
}
