//! Deterministic sibling ordering applied to the whole DOM before emission.
//!
//! Comparisons are weighted sums of per-criterion signs. Weights are powers of ten and
//! every criterion contributes -1, 0 or 1, so the sum orders lexicographically by
//! criterion: element kind, then method kind, then name, then parameter count.

use std::cmp::Ordering;

use super::{
  codedom::{CodeDom, ElementId, ElementTag, MethodKind},
  config::TargetLanguage,
};

const TYPE_WEIGHT: i32 = 10_000;
const METHOD_KIND_WEIGHT: i32 = 1_000;
const NAME_WEIGHT: i32 = 100;
const PARAMETER_COUNT_WEIGHT: i32 = 1;

const OPTIONAL_WEIGHT: i32 = 1_000;
const PARAMETER_KIND_WEIGHT: i32 = 100;
const PARAMETER_NAME_WEIGHT: i32 = 10;

/// Where free-standing methods go relative to nested type declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MethodPlacement {
  #[default]
  BeforeTypes,
  /// Languages that emit methods as functions after the types they operate on.
  AfterTypes,
}

impl From<TargetLanguage> for MethodPlacement {
  fn from(language: TargetLanguage) -> Self {
    match language {
      TargetLanguage::Go | TargetLanguage::TypeScript => Self::AfterTypes,
      TargetLanguage::CSharp | TargetLanguage::Java | TargetLanguage::Python | TargetLanguage::Http => {
        Self::BeforeTypes
      }
    }
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ElementComparer {
  placement: MethodPlacement,
}

impl ElementComparer {
  pub(crate) fn new(placement: MethodPlacement) -> Self {
    Self { placement }
  }

  pub(crate) fn for_language(language: TargetLanguage) -> Self {
    Self::new(language.into())
  }

  /// Weighted comparison of two optional siblings. A missing element sorts first.
  pub(crate) fn compare(&self, dom: &CodeDom, left: Option<ElementId>, right: Option<ElementId>) -> i32 {
    let (left, right) = match (left, right) {
      (None, None) => return 0,
      (None, Some(_)) => return -1,
      (Some(_), None) => return 1,
      (Some(left), Some(right)) => (left, right),
    };

    let left_tag = dom.element(left).tag();
    let right_tag = dom.element(right).tag();

    let mut result = sign(self.type_factor(left_tag).cmp(&self.type_factor(right_tag))) * TYPE_WEIGHT;

    if let (Some(left_kind), Some(right_kind)) = (dom.element(left).method_kind(), dom.element(right).method_kind()) {
      result += sign(method_kind_factor(left_kind).cmp(&method_kind_factor(right_kind))) * METHOD_KIND_WEIGHT;
    }

    // Enum members keep their declaration order.
    if !(left_tag == ElementTag::Constant && right_tag == ElementTag::Constant) {
      result += sign(compare_ignore_case(dom.name(left), dom.name(right))) * NAME_WEIGHT;
    }

    result += sign(parameter_count(dom, left).cmp(&parameter_count(dom, right))) * PARAMETER_COUNT_WEIGHT;
    result
  }

  fn type_factor(&self, tag: ElementTag) -> u8 {
    match tag {
      ElementTag::Using => 1,
      ElementTag::Property => 4,
      ElementTag::Indexer => 5,
      ElementTag::Method => match self.placement {
        MethodPlacement::BeforeTypes => 6,
        MethodPlacement::AfterTypes => 8,
      },
      ElementTag::Class | ElementTag::Interface => 7,
      ElementTag::Constant => 9,
      ElementTag::Namespace => 10,
      ElementTag::BlockEnd => 11,
      ElementTag::Parameter => 12,
    }
  }
}

fn method_kind_factor(kind: MethodKind) -> u8 {
  match kind {
    MethodKind::ClientConstructor => 1,
    MethodKind::Constructor => 2,
    MethodKind::RawUrlConstructor => 3,
    _ => 4,
  }
}

fn parameter_count(dom: &CodeDom, id: ElementId) -> usize {
  match dom.element(id).tag() {
    ElementTag::Method => dom.children_of_kind(id, ElementTag::Parameter).count(),
    _ => 0,
  }
}

/// Required parameters first, then by kind, then by name.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ParameterComparer;

impl ParameterComparer {
  pub(crate) fn compare(self, dom: &CodeDom, left: Option<ElementId>, right: Option<ElementId>) -> i32 {
    let (left, right) = match (left, right) {
      (None, None) => return 0,
      (None, Some(_)) => return -1,
      (Some(_), None) => return 1,
      (Some(left), Some(right)) => (left, right),
    };
    let (Some(left_def), Some(right_def)) = (dom.element(left).as_parameter(), dom.element(right).as_parameter()) else {
      return sign(compare_ignore_case(dom.name(left), dom.name(right))) * PARAMETER_NAME_WEIGHT;
    };

    sign(left_def.optional.cmp(&right_def.optional)) * OPTIONAL_WEIGHT
      + sign(left_def.kind.cmp(&right_def.kind)) * PARAMETER_KIND_WEIGHT
      + sign(compare_ignore_case(dom.name(left), dom.name(right))) * PARAMETER_NAME_WEIGHT
  }
}

/// Stable sort of `siblings`; ties keep their insertion order.
pub(crate) fn sort(dom: &CodeDom, siblings: &[ElementId], comparer: ElementComparer) -> Vec<ElementId> {
  let mut ordered = siblings.to_vec();
  ordered.sort_by(|left, right| comparer.compare(dom, Some(*left), Some(*right)).cmp(&0));
  ordered
}

pub(crate) fn sort_parameters(dom: &CodeDom, parameters: &[ElementId]) -> Vec<ElementId> {
  let mut ordered = parameters.to_vec();
  ordered.sort_by(|left, right| ParameterComparer.compare(dom, Some(*left), Some(*right)).cmp(&0));
  ordered
}

/// Orders the children of every element for `language`.
pub(crate) fn apply(dom: &mut CodeDom, language: TargetLanguage) {
  let comparer = ElementComparer::for_language(language);
  let ids = dom.ids().collect::<Vec<_>>();
  for id in ids {
    let children = dom.children(id);
    if children.len() < 2 {
      continue;
    }
    let ordered = match dom.element(id).tag() {
      ElementTag::Method | ElementTag::Indexer => sort_parameters(dom, children),
      _ => sort(dom, children, comparer),
    };
    dom.set_children_order(id, ordered);
  }
}

fn compare_ignore_case(left: &str, right: &str) -> Ordering {
  left
    .chars()
    .flat_map(char::to_lowercase)
    .cmp(right.chars().flat_map(char::to_lowercase))
}

fn sign(ordering: Ordering) -> i32 {
  match ordering {
    Ordering::Less => -1,
    Ordering::Equal => 0,
    Ordering::Greater => 1,
  }
}

#[cfg(test)]
mod tests;
