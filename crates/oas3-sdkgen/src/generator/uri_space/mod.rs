//! Hierarchical view of the document's path templates.
//!
//! Every path is split on `/` and each segment becomes a node; nodes are stored in an arena
//! and addressed by [`NodeId`]. Children are kept in a `BTreeMap` keyed by the exact segment
//! text so every traversal is ordered, and parents are plain ids so the tree has no
//! reference cycles.

mod naming;
mod template;

use std::collections::BTreeMap;

use http::Method;
use itertools::Itertools;
use oas3::{
  Spec,
  spec::{Operation, PathItem},
};
use tracing::{debug, trace};

pub(crate) use naming::{ITEM_NAMESPACE_SEGMENT, cleanup_parameters_from_path};
pub(crate) use template::{
  PathParameterInfo, QueryParameterInfo, sanitize_parameter_name_for_url_template, sanitize_path_for_url_template,
};

use super::comparer::PathPatterns;

const PATH_SEPARATOR: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
  pub(crate) fn index(self) -> usize {
    self.0
  }
}

#[derive(Debug, Clone)]
pub(crate) struct UriSpaceNode {
  segment: String,
  path: String,
  parent: Option<NodeId>,
  children: BTreeMap<String, NodeId>,
  path_item: Option<PathItem>,
}

impl UriSpaceNode {
  fn new(segment: String, path: String, parent: Option<NodeId>) -> Self {
    Self {
      segment,
      path,
      parent,
      children: BTreeMap::new(),
      path_item: None,
    }
  }

  pub(crate) fn segment(&self) -> &str {
    &self.segment
  }

  /// The path template this node answers to, `/` for the root.
  pub(crate) fn path(&self) -> &str {
    &self.path
  }

  pub(crate) fn parent(&self) -> Option<NodeId> {
    self.parent
  }

  pub(crate) fn path_item(&self) -> Option<&PathItem> {
    self.path_item.as_ref()
  }

  pub(crate) fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.children.values().copied()
  }

  pub(crate) fn child(&self, segment: &str) -> Option<NodeId> {
    self.children.get(segment).copied()
  }

  pub(crate) fn is_root(&self) -> bool {
    self.parent.is_none()
  }

  /// A segment made of exactly one parameter, optionally followed by a file extension (`{id}.json`).
  pub(crate) fn is_single_parameter_segment(&self) -> bool {
    naming::is_single_parameter_segment(&self.segment)
  }

  /// A segment mixing literals and one or more parameters, like `range(start={start},end={end})`.
  pub(crate) fn is_multi_parameter_segment(&self) -> bool {
    self.segment.contains('{') && !self.is_single_parameter_segment()
  }

  /// Single parameter nodes live in the `item` sub-namespace of their parent.
  pub(crate) fn belongs_to_item_namespace(&self) -> bool {
    self.is_single_parameter_segment()
  }

  pub(crate) fn has_operations(&self) -> bool {
    self.path_item.as_ref().is_some_and(|item| !operations(item).is_empty())
  }

  pub(crate) fn operations(&self) -> Vec<(Method, &Operation)> {
    self.path_item.as_ref().map(operations).unwrap_or_default()
  }

  pub(crate) fn description(&self) -> Option<&str> {
    let item = self.path_item.as_ref()?;
    item
      .description
      .as_deref()
      .or(item.summary.as_deref())
      .map(str::trim)
      .filter(|text| !text.is_empty())
  }
}

/// The operations of a path item in a fixed method order.
pub(crate) fn operations(path_item: &PathItem) -> Vec<(Method, &Operation)> {
  [
    (Method::GET, path_item.get.as_ref()),
    (Method::PUT, path_item.put.as_ref()),
    (Method::POST, path_item.post.as_ref()),
    (Method::DELETE, path_item.delete.as_ref()),
    (Method::OPTIONS, path_item.options.as_ref()),
    (Method::HEAD, path_item.head.as_ref()),
    (Method::PATCH, path_item.patch.as_ref()),
    (Method::TRACE, path_item.trace.as_ref()),
  ]
  .into_iter()
  .filter_map(|(method, operation)| operation.map(|operation| (method, operation)))
  .collect()
}

/// Drops the operations `keep` rejects, leaving path-level parameters untouched.
fn retain_operations<F>(path_item: &mut PathItem, keep: F)
where
  F: Fn(&Method) -> bool,
{
  let slots = [
    (Method::GET, &mut path_item.get),
    (Method::PUT, &mut path_item.put),
    (Method::POST, &mut path_item.post),
    (Method::DELETE, &mut path_item.delete),
    (Method::OPTIONS, &mut path_item.options),
    (Method::HEAD, &mut path_item.head),
    (Method::PATCH, &mut path_item.patch),
    (Method::TRACE, &mut path_item.trace),
  ];
  for (method, slot) in slots {
    if slot.is_some() && !keep(&method) {
      *slot = None;
    }
  }
}

#[derive(Debug, Clone)]
pub(crate) struct UriSpaceTree {
  nodes: Vec<UriSpaceNode>,
}

impl UriSpaceTree {
  pub(crate) const ROOT: NodeId = NodeId(0);

  /// Builds the tree from `(path template, path item)` pairs.
  ///
  /// Returns `None` when there is no path at all: the document is valid but nothing
  /// can be generated from it.
  pub(crate) fn build<I, S>(paths: I) -> Option<Self>
  where
    I: IntoIterator<Item = (S, PathItem)>,
    S: AsRef<str>,
  {
    let mut tree = Self {
      nodes: vec![UriSpaceNode::new(String::new(), PATH_SEPARATOR.to_string(), None)],
    };
    let mut attached = 0usize;

    for (path, item) in paths {
      tree.attach(path.as_ref(), item);
      attached += 1;
    }

    if attached == 0 {
      return None;
    }
    debug!(paths = attached, nodes = tree.nodes.len(), "built uri space tree");
    Some(tree)
  }

  pub(crate) fn from_spec(spec: &Spec) -> Option<Self> {
    let paths = spec.paths.as_ref()?;
    Self::build(paths.iter().map(|(path, item)| (path.as_str(), item.clone())))
  }

  /// Rebuilds the tree from the operations `patterns` accepts; paths left without
  /// operations are dropped.
  pub(crate) fn filtered(&self, patterns: &PathPatterns) -> Option<Self> {
    if patterns.is_empty() {
      return Some(self.clone());
    }

    let retained = self.walk().into_iter().filter_map(|id| {
      let node = self.node(id);
      let mut item = node.path_item.clone()?;
      retain_operations(&mut item, |method| patterns.includes_operation(&node.path, method.as_str()));
      if operations(&item).is_empty() {
        trace!(path = %node.path, "path excluded by patterns");
        return None;
      }
      Some((node.path.clone(), item))
    });

    Self::build(retained.collect::<Vec<_>>())
  }

  fn attach(&mut self, path: &str, item: PathItem) {
    let trimmed = path.strip_prefix(PATH_SEPARATOR).unwrap_or(path);
    let mut current = Self::ROOT;

    if !trimmed.is_empty() {
      for segment in trimmed.split(PATH_SEPARATOR) {
        current = self.find_or_add_child(current, segment);
      }
    }

    let node = &mut self.nodes[current.0];
    if node.path_item.is_some() {
      debug!(path, "duplicate path template ignored");
      return;
    }
    node.path_item = Some(item);
  }

  fn find_or_add_child(&mut self, parent: NodeId, segment: &str) -> NodeId {
    if let Some(existing) = self.nodes[parent.0].child(segment) {
      return existing;
    }

    let parent_path = &self.nodes[parent.0].path;
    let path = if parent == Self::ROOT {
      format!("{PATH_SEPARATOR}{segment}")
    } else {
      format!("{parent_path}{PATH_SEPARATOR}{segment}")
    };

    let id = NodeId(self.nodes.len());
    self.nodes.push(UriSpaceNode::new(segment.to_string(), path, Some(parent)));
    self.nodes[parent.0].children.insert(segment.to_string(), id);
    id
  }

  pub(crate) fn root(&self) -> &UriSpaceNode {
    &self.nodes[Self::ROOT.0]
  }

  pub(crate) fn node(&self, id: NodeId) -> &UriSpaceNode {
    &self.nodes[id.0]
  }

  pub(crate) fn len(&self) -> usize {
    self.nodes.len()
  }

  pub(crate) fn parent(&self, id: NodeId) -> Option<&UriSpaceNode> {
    self.node(id).parent.map(|parent| self.node(parent))
  }

  /// Reconstructs the path by concatenating the segments from the root down to `id`.
  #[cfg(test)]
  pub(crate) fn full_path(&self, id: NodeId) -> String {
    let mut segments = vec![];
    let mut current = Some(id);
    while let Some(node_id) = current {
      let node = self.node(node_id);
      if !node.is_root() {
        segments.push(node.segment.as_str());
      }
      current = node.parent;
    }

    if segments.is_empty() {
      return PATH_SEPARATOR.to_string();
    }
    segments.reverse();
    format!("{PATH_SEPARATOR}{}", segments.join("/"))
  }

  /// Segments between the root and `id`, root excluded.
  pub(crate) fn segments(&self, id: NodeId) -> Vec<&str> {
    let mut segments = vec![];
    let mut current = Some(id);
    while let Some(node_id) = current {
      let node = self.node(node_id);
      if !node.is_root() {
        segments.push(node.segment.as_str());
      }
      current = node.parent;
    }
    segments.reverse();
    segments
  }

  /// Looks a path template up segment by segment.
  pub(crate) fn find(&self, path: &str) -> Option<NodeId> {
    let trimmed = path.strip_prefix(PATH_SEPARATOR).unwrap_or(path);
    if trimmed.is_empty() {
      return Some(Self::ROOT);
    }
    trimmed
      .split(PATH_SEPARATOR)
      .try_fold(Self::ROOT, |current, segment| self.node(current).child(segment))
  }

  /// Pre-order traversal, children visited in segment order.
  pub(crate) fn walk(&self) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(self.nodes.len());
    let mut stack = vec![Self::ROOT];
    while let Some(id) = stack.pop() {
      order.push(id);
      let children = self.node(id).children.values().rev().copied();
      stack.extend(children);
    }
    order
  }

  /// Nodes that carry at least one operation, in traversal order.
  pub(crate) fn operation_nodes(&self) -> Vec<NodeId> {
    self
      .walk()
      .into_iter()
      .filter(|id| self.node(*id).has_operations())
      .collect()
  }

  /// Total number of operations in the tree.
  pub(crate) fn operation_count(&self) -> usize {
    self.nodes.iter().map(|node| node.operations().len()).sum()
  }

  /// Indented rendering used by `list tree`.
  pub(crate) fn render(&self) -> String {
    let mut out = String::new();
    for id in self.walk() {
      let depth = self.segments(id).len();
      let node = self.node(id);
      let label = if node.is_root() { "/" } else { node.segment() };
      let methods = node
        .operations()
        .iter()
        .map(|(method, _)| method.as_str())
        .join(", ");
      out.push_str(&"  ".repeat(depth));
      out.push_str(label);
      if !methods.is_empty() {
        out.push_str(" [");
        out.push_str(&methods);
        out.push(']');
      }
      out.push('\n');
    }
    out
  }
}

#[cfg(test)]
mod tests;
