use tracing::trace;

use crate::{
  generator::{
    codedom::{
      ClassKind, CodeDom, CodeType, ElementId, ElementKind, ElementTag, MethodDef, MethodKind, ParameterDef,
      ParameterKind, PropertyKind,
    },
    errors::GenerationResult,
  },
  naming::identifiers::to_first_character_upper_case,
};

pub(crate) const SETTER_PARAMETER_NAME: &str = "value";

/// Adds `get`/`set` method pairs bound to the state properties of models.
pub(crate) struct AccessorGenerator<'a> {
  dom: &'a mut CodeDom,
}

impl<'a> AccessorGenerator<'a> {
  pub(crate) fn new(dom: &'a mut CodeDom) -> Self {
    Self { dom }
  }

  /// Returns how many accessor methods were added.
  pub(crate) fn apply(mut self) -> GenerationResult<usize> {
    let classes = self
      .dom
      .ids()
      .filter(|id| {
        matches!(
          self.dom.element(*id).class_kind(),
          Some(ClassKind::Model | ClassKind::ComposedType(_))
        )
      })
      .collect::<Vec<_>>();

    let mut added = 0;
    for class in classes {
      let properties = self
        .dom
        .children_of_kind(class, ElementTag::Property)
        .filter(|id| {
          matches!(
            self.dom.element(*id).property_kind(),
            Some(PropertyKind::Custom | PropertyKind::AdditionalData | PropertyKind::BackingStore)
          )
        })
        .collect::<Vec<_>>();

      for property in properties {
        added += self.add_accessors(class, property)?;
      }
    }
    Ok(added)
  }

  fn add_accessors(&mut self, class: ElementId, property: ElementId) -> GenerationResult<usize> {
    let Some(def) = self.dom.element(property).as_property().cloned() else {
      return Ok(0);
    };
    let suffix = to_first_character_upper_case(self.dom.name(property));
    let documentation = self.dom.element(property).documentation.clone();
    let deprecated = self.dom.element(property).deprecated;
    let mut added = 0;

    let getter_name = format!("get{suffix}");
    if self.is_free(class, &getter_name) {
      let mut getter = MethodDef::new(MethodKind::Getter, def.ty);
      getter.target = Some(property);
      let id = self.dom.add_child(class, getter_name, ElementKind::Method(getter))?;
      self.dom.document(id, documentation.as_deref());
      self.dom.element_mut(id).deprecated = deprecated;
      added += 1;
    }

    let setter_name = format!("set{suffix}");
    if !def.read_only && self.is_free(class, &setter_name) {
      let mut setter = MethodDef::new(MethodKind::Setter, CodeType::void());
      setter.target = Some(property);
      let id = self.dom.add_child(class, setter_name, ElementKind::Method(setter))?;
      self.dom.add_child(
        id,
        SETTER_PARAMETER_NAME,
        ElementKind::Parameter(ParameterDef::new(ParameterKind::SetterValue, def.ty)),
      )?;
      self.dom.document(id, documentation.as_deref());
      self.dom.element_mut(id).deprecated = deprecated;
      added += 1;
    }
    Ok(added)
  }

  fn is_free(&self, class: ElementId, name: &str) -> bool {
    let free = self.dom.find_child_by_name(class, name).is_none();
    if !free {
      trace!(class = %self.dom.name(class), name, "accessor name already taken");
    }
    free
  }
}
