//! Language independent model of the generated SDK.
//!
//! Elements live in one arena owned by [`CodeDom`] and refer to each other through
//! [`ElementId`]s. Ownership flows strictly from parent to child: every element except the
//! global namespace has exactly one parent, fixed when it is added. During resolution the
//! model only grows; afterwards the order engine permutes sibling lists and writers read it.

mod elements;
mod types;

pub(crate) use elements::{
  Access, ClassDef, ClassKind, ComposedKind, ConstantDef, DiscriminatorInfo, ElementKind, ElementTag, IndexerDef,
  InterfaceDef, InterfaceKind, MethodDef, MethodKind, ParameterDef, ParameterKind, PropertyDef, PropertyKind, UsingDef,
};
pub(crate) use types::{Abstraction, CodeType, CollectionKind, Primitive, TypeRef};

use super::errors::{GenerationError, GenerationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ElementId(usize);

impl ElementId {
  pub(crate) fn index(self) -> usize {
    self.0
  }
}

#[derive(Debug, Clone)]
pub(crate) struct CodeElement {
  name: String,
  parent: Option<ElementId>,
  children: Vec<ElementId>,
  pub(crate) kind: ElementKind,
  pub(crate) documentation: Option<String>,
  pub(crate) deprecated: bool,
}

impl CodeElement {
  pub(crate) fn name(&self) -> &str {
    &self.name
  }

  pub(crate) fn parent(&self) -> Option<ElementId> {
    self.parent
  }

  pub(crate) fn children(&self) -> &[ElementId] {
    &self.children
  }

  pub(crate) fn tag(&self) -> ElementTag {
    self.kind.tag()
  }

  pub(crate) fn as_class(&self) -> Option<&ClassDef> {
    match &self.kind {
      ElementKind::Class(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn as_interface(&self) -> Option<&InterfaceDef> {
    match &self.kind {
      ElementKind::Interface(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn as_property(&self) -> Option<&PropertyDef> {
    match &self.kind {
      ElementKind::Property(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn as_method(&self) -> Option<&MethodDef> {
    match &self.kind {
      ElementKind::Method(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn as_parameter(&self) -> Option<&ParameterDef> {
    match &self.kind {
      ElementKind::Parameter(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn as_indexer(&self) -> Option<&IndexerDef> {
    match &self.kind {
      ElementKind::Indexer(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn as_constant(&self) -> Option<&ConstantDef> {
    match &self.kind {
      ElementKind::Constant(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn class_kind(&self) -> Option<ClassKind> {
    self.as_class().map(|def| def.kind)
  }

  pub(crate) fn method_kind(&self) -> Option<MethodKind> {
    self.as_method().map(|def| def.kind)
  }

  pub(crate) fn property_kind(&self) -> Option<PropertyKind> {
    self.as_property().map(|def| def.kind)
  }

  /// Classes and interfaces are emitted one per file.
  pub(crate) fn is_type_declaration(&self) -> bool {
    matches!(self.kind, ElementKind::Class(_) | ElementKind::Interface(_))
  }
}

#[derive(Debug, Clone)]
pub(crate) struct CodeDom {
  elements: Vec<CodeElement>,
}

impl Default for CodeDom {
  fn default() -> Self {
    Self::new()
  }
}

impl CodeDom {
  /// The unnamed namespace every other namespace hangs off.
  pub(crate) const GLOBAL: ElementId = ElementId(0);

  pub(crate) fn new() -> Self {
    Self {
      elements: vec![CodeElement {
        name: String::new(),
        parent: None,
        children: vec![],
        kind: ElementKind::Namespace,
        documentation: None,
        deprecated: false,
      }],
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.elements.len()
  }

  pub(crate) fn element(&self, id: ElementId) -> &CodeElement {
    &self.elements[id.0]
  }

  pub(crate) fn element_mut(&mut self, id: ElementId) -> &mut CodeElement {
    &mut self.elements[id.0]
  }

  pub(crate) fn name(&self, id: ElementId) -> &str {
    &self.elements[id.0].name
  }

  pub(crate) fn children(&self, id: ElementId) -> &[ElementId] {
    &self.elements[id.0].children
  }

  pub(crate) fn children_of_kind(&self, id: ElementId, tag: ElementTag) -> impl Iterator<Item = ElementId> + '_ {
    self.elements[id.0]
      .children
      .iter()
      .copied()
      .filter(move |child| self.element(*child).tag() == tag)
  }

  /// Adds `kind` named `name` under `parent`.
  ///
  /// # Errors
  /// - [`GenerationError::InvalidOwner`] when `parent` cannot own that kind of element.
  /// - [`GenerationError::NameCollision`] when a sibling of an incompatible kind already uses
  ///   the name (compared case-insensitively).
  pub(crate) fn add_child(&mut self, parent: ElementId, name: impl Into<String>, kind: ElementKind) -> GenerationResult<ElementId> {
    let name = name.into();
    let tag = kind.tag();
    let owner = self.element(parent);

    if !owner.kind.accepts(tag) {
      return Err(GenerationError::InvalidOwner {
        parent: self.qualified_name(parent),
        child: name,
        kind: tag.to_string(),
      });
    }

    if !ElementKind::is_unnamed(tag)
      && let Some(existing) = self.find_child_by_name(parent, &name)
    {
      let existing_tag = self.element(existing).tag();
      if !ElementKind::compatible(existing_tag, tag) {
        return Err(GenerationError::NameCollision {
          parent: self.qualified_name(parent),
          name,
          kind: tag.to_string(),
          existing: existing_tag.to_string(),
        });
      }
    }

    let id = ElementId(self.elements.len());
    self.elements.push(CodeElement {
      name,
      parent: Some(parent),
      children: vec![],
      kind,
      documentation: None,
      deprecated: false,
    });
    self.elements[parent.0].children.push(id);

    if matches!(tag, ElementTag::Class | ElementTag::Interface) {
      self.add_child(id, "", ElementKind::BlockEnd)?;
    }
    Ok(id)
  }

  /// Case-insensitive lookup among named children.
  pub(crate) fn find_child_by_name(&self, parent: ElementId, name: &str) -> Option<ElementId> {
    self.elements[parent.0].children.iter().copied().find(|child| {
      let element = self.element(*child);
      !ElementKind::is_unnamed(element.tag()) && element.name.eq_ignore_ascii_case(name)
    })
  }

  #[cfg(test)]
  pub(crate) fn find_child_of_kind(&self, parent: ElementId, name: &str, tag: ElementTag) -> Option<ElementId> {
    self
      .children_of_kind(parent, tag)
      .find(|child| self.element(*child).name.eq_ignore_ascii_case(name))
  }

  /// Closest ancestor of `tag`, the element itself excluded.
  pub(crate) fn immediate_parent_of_kind(&self, id: ElementId, tag: ElementTag) -> Option<ElementId> {
    let mut current = self.element(id).parent;
    while let Some(candidate) = current {
      if self.element(candidate).tag() == tag {
        return Some(candidate);
      }
      current = self.element(candidate).parent;
    }
    None
  }

  /// Namespace that declares the element.
  pub(crate) fn namespace_of(&self, id: ElementId) -> ElementId {
    self
      .immediate_parent_of_kind(id, ElementTag::Namespace)
      .unwrap_or(Self::GLOBAL)
  }

  /// Walks or creates the namespace chain for a dotted name. Namespace elements carry their
  /// full dotted name.
  pub(crate) fn find_or_add_namespace(&mut self, dotted: &str) -> GenerationResult<ElementId> {
    if let Some(existing) = self.find_namespace(dotted) {
      return Ok(existing);
    }

    let mut current = Self::GLOBAL;
    let mut full_name = String::new();
    for segment in dotted.split('.').filter(|segment| !segment.is_empty()) {
      if !full_name.is_empty() {
        full_name.push('.');
      }
      full_name.push_str(segment);

      let existing = self
        .children_of_kind(current, ElementTag::Namespace)
        .find(|child| self.name(*child) == full_name);
      current = match existing {
        Some(existing) => existing,
        None => self.add_child(current, full_name.clone(), ElementKind::Namespace)?,
      };
    }
    Ok(current)
  }

  pub(crate) fn find_namespace(&self, dotted: &str) -> Option<ElementId> {
    self
      .elements
      .iter()
      .position(|element| matches!(element.kind, ElementKind::Namespace) && element.name == dotted)
      .map(ElementId)
  }

  /// Dotted namespace plus the nesting chain, for diagnostics.
  pub(crate) fn qualified_name(&self, id: ElementId) -> String {
    let element = self.element(id);
    match (&element.kind, element.parent) {
      (ElementKind::Namespace, _) | (_, None) => element.name.clone(),
      (_, Some(parent)) => {
        let prefix = self.qualified_name(parent);
        if prefix.is_empty() {
          element.name.clone()
        } else {
          format!("{prefix}.{}", element.name)
        }
      }
    }
  }

  /// Replaces the sibling order of `id`. `order` must be a permutation of the current children.
  pub(crate) fn set_children_order(&mut self, id: ElementId, order: Vec<ElementId>) {
    debug_assert_eq!(order.len(), self.elements[id.0].children.len());
    self.elements[id.0].children = order;
  }

  /// Every element in creation order.
  pub(crate) fn ids(&self) -> impl Iterator<Item = ElementId> {
    (0..self.elements.len()).map(ElementId)
  }

  /// Top-level classes and interfaces, one per output file.
  pub(crate) fn type_declarations(&self) -> Vec<ElementId> {
    self
      .ids()
      .filter(|id| {
        let element = self.element(*id);
        element.is_type_declaration()
          && element
            .parent
            .is_some_and(|parent| self.element(parent).tag() == ElementTag::Namespace)
      })
      .collect()
  }

  /// The namespace level class or interface that contains `id`, possibly `id` itself.
  pub(crate) fn top_level_declaration(&self, id: ElementId) -> Option<ElementId> {
    let mut current = id;
    loop {
      let element = self.element(current);
      let parent = element.parent?;
      if element.is_type_declaration() && self.element(parent).tag() == ElementTag::Namespace {
        return Some(current);
      }
      current = parent;
    }
  }

  /// Every element below `id` in depth-first order, `id` excluded.
  pub(crate) fn descendants(&self, id: ElementId) -> Vec<ElementId> {
    let mut result = vec![];
    let mut stack = self.children(id).iter().rev().copied().collect::<Vec<_>>();
    while let Some(current) = stack.pop() {
      result.push(current);
      stack.extend(self.children(current).iter().rev());
    }
    result
  }

  pub(crate) fn class_mut(&mut self, id: ElementId) -> Option<&mut ClassDef> {
    match &mut self.elements[id.0].kind {
      ElementKind::Class(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn interface_mut(&mut self, id: ElementId) -> Option<&mut InterfaceDef> {
    match &mut self.elements[id.0].kind {
      ElementKind::Interface(def) => Some(def),
      _ => None,
    }
  }

  pub(crate) fn class_base(&self, id: ElementId) -> Option<ElementId> {
    self.element(id).as_class().and_then(|def| def.base_class)
  }

  /// Properties of the class and of every base class, most derived first.
  pub(crate) fn inherited_properties(&self, class: ElementId) -> Vec<ElementId> {
    let mut properties = vec![];
    let mut current = Some(class);
    let mut guard = 0usize;
    while let Some(id) = current {
      properties.extend(self.children_of_kind(id, ElementTag::Property));
      current = self.element(id).as_class().and_then(|def| def.base_class);
      guard += 1;
      if guard > self.elements.len() {
        break;
      }
    }
    properties
  }

  /// Sets the documentation of an element, ignoring blank text.
  pub(crate) fn document(&mut self, id: ElementId, text: Option<&str>) {
    let text = text.map(str::trim).filter(|text| !text.is_empty());
    self.elements[id.0].documentation = text.map(|text| text.replace(['\r', '\n', '\t'], " "));
  }
}

#[cfg(test)]
mod tests;
