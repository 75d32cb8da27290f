use std::collections::BTreeSet;

use crate::generator::{
  codedom::{Abstraction, CodeDom, CodeType, ElementId, ElementKind, MethodKind, TypeRef, UsingDef},
  config::TargetLanguage,
  errors::GenerationResult,
};

/// Adds one `Using` element per referenced declaration and runtime abstraction to every
/// top-level declaration. References from nested classes are hoisted to the file level.
pub(crate) struct UsingCollector<'a> {
  dom: &'a mut CodeDom,
  language: TargetLanguage,
}

#[derive(Debug, Default)]
struct References {
  declarations: BTreeSet<ElementId>,
  abstractions: BTreeSet<Abstraction>,
}

impl<'a> UsingCollector<'a> {
  pub(crate) fn new(dom: &'a mut CodeDom, language: TargetLanguage) -> Self {
    Self { dom, language }
  }

  pub(crate) fn apply(mut self) -> GenerationResult<()> {
    for declaration in self.dom.type_declarations() {
      let references = self.collect(declaration);
      for target in references.declarations {
        let name = self.dom.name(target).to_string();
        self
          .dom
          .add_child(declaration, name, ElementKind::Using(UsingDef::Declaration(target)))?;
      }
      for abstraction in references.abstractions {
        self.dom.add_child(
          declaration,
          abstraction.to_string(),
          ElementKind::Using(UsingDef::External(abstraction)),
        )?;
      }
    }
    Ok(())
  }

  fn collect(&self, declaration: ElementId) -> References {
    let mut references = References::default();
    let mut types = vec![];

    for id in std::iter::once(declaration).chain(self.dom.descendants(declaration)) {
      match &self.dom.element(id).kind {
        ElementKind::Class(def) => {
          types.extend(def.base_class.into_iter().chain(def.implements.iter().copied()).map(CodeType::definition));
          if let Some(discriminator) = &def.discriminator {
            types.extend(discriminator.mappings().map(|(_, ty)| *ty));
          }
          if def.is_error {
            references.abstractions.insert(Abstraction::ApiException);
          }
        }
        ElementKind::Interface(def) => types.extend(def.extends.iter().copied().map(CodeType::definition)),
        ElementKind::Property(def) => types.push(def.ty),
        ElementKind::Method(def) => {
          types.push(def.return_type);
          types.extend(def.error_mappings.values().copied());
          if !def.error_mappings.is_empty() {
            references.abstractions.insert(Abstraction::ErrorMappings);
          }
          if def.kind == MethodKind::RequestExecutor {
            references.abstractions.insert(Abstraction::RequestInformation);
          }
        }
        ElementKind::Parameter(def) => types.push(def.ty),
        ElementKind::Indexer(def) => types.push(def.return_type),
        ElementKind::Namespace | ElementKind::Constant(_) | ElementKind::Using(_) | ElementKind::BlockEnd => {}
      }
    }

    for ty in types {
      match ty.reference {
        TypeRef::Definition(target) => {
          if let Some(top) = self.dom.top_level_declaration(target)
            && top != declaration
            && self.needs_import(declaration, top)
          {
            references.declarations.insert(top);
          }
        }
        TypeRef::Abstraction(abstraction) => {
          references.abstractions.insert(abstraction);
        }
        TypeRef::Primitive(_) => {}
      }
    }
    references
  }

  /// Languages with one module per file import siblings of the same namespace too.
  fn needs_import(&self, from: ElementId, to: ElementId) -> bool {
    if self.dom.namespace_of(from) != self.dom.namespace_of(to) {
      return true;
    }
    matches!(self.language, TargetLanguage::TypeScript | TargetLanguage::Python)
  }
}
