use std::collections::BTreeMap;

use tracing::trace;

use crate::{
  generator::{
    codedom::{ClassKind, CodeDom, ElementId, ElementKind, ElementTag, InterfaceDef, InterfaceKind, MethodKind},
    errors::GenerationResult,
  },
  naming::identifiers::ensure_unique,
};

pub(crate) const INTERFACE_SUFFIX: &str = "able";

/// Extracts a `<Model>able` interface from every model class.
///
/// The interface carries copies of the model accessors, extends the interface of the base
/// model, and is implemented by the model it was extracted from.
pub(crate) struct ModelInterfaces<'a> {
  dom: &'a mut CodeDom,
}

impl<'a> ModelInterfaces<'a> {
  pub(crate) fn new(dom: &'a mut CodeDom) -> Self {
    Self { dom }
  }

  /// Returns the number of interfaces declared.
  pub(crate) fn apply(mut self) -> GenerationResult<usize> {
    let models = self
      .dom
      .ids()
      .filter(|id| self.dom.element(*id).class_kind() == Some(ClassKind::Model))
      .collect::<Vec<_>>();

    let mut interfaces = BTreeMap::new();
    for model in &models {
      let interface = self.declare(*model)?;
      interfaces.insert(*model, interface);
    }

    for (model, interface) in &interfaces {
      if let Some(base) = self.dom.class_base(*model)
        && let Some(base_interface) = interfaces.get(&base)
        && let Some(def) = self.dom.interface_mut(*interface)
      {
        def.extends.push(*base_interface);
      }
      if let Some(def) = self.dom.class_mut(*model) {
        def.implements.push(*interface);
      }
    }
    Ok(interfaces.len())
  }

  fn declare(&mut self, model: ElementId) -> GenerationResult<ElementId> {
    let namespace = self.dom.namespace_of(model);
    let name = ensure_unique(&format!("{}{INTERFACE_SUFFIX}", self.dom.name(model)), |candidate| {
      self.dom.find_child_by_name(namespace, candidate).is_some()
    });
    let interface = self.dom.add_child(
      namespace,
      name,
      ElementKind::Interface(InterfaceDef {
        kind: InterfaceKind::Model,
        original_class: Some(model),
        extends: vec![],
      }),
    )?;
    let documentation = self.dom.element(model).documentation.clone();
    self.dom.document(interface, documentation.as_deref());

    let accessors = self
      .dom
      .children_of_kind(model, ElementTag::Method)
      .filter(|id| {
        matches!(
          self.dom.element(*id).method_kind(),
          Some(MethodKind::Getter | MethodKind::Setter)
        )
      })
      .collect::<Vec<_>>();

    for accessor in accessors {
      let element = self.dom.element(accessor).clone();
      let copy = self.dom.add_child(interface, element.name(), element.kind.clone())?;
      self.dom.document(copy, element.documentation.as_deref());
      for parameter in element.children() {
        let parameter = self.dom.element(*parameter).clone();
        let name = parameter.name().to_string();
        self.dom.add_child(copy, name, parameter.kind)?;
      }
    }

    trace!(interface = %self.dom.qualified_name(interface), "extracted model interface");
    Ok(interface)
  }
}
