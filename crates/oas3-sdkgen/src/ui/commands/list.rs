use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use crossterm::style::Stylize;

use crate::{
  generator::uri_space::UriSpaceTree,
  ui::{Colors, colors::IntoComfyColor, term_width},
  utils::spec::SpecLoader,
};

/// One line of `list operations`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OperationRow {
  method: String,
  path: String,
  url_template: String,
  operation_id: String,
}

fn operation_rows(spec: &oas3::Spec, tree: &UriSpaceTree) -> Vec<OperationRow> {
  tree
    .operation_nodes()
    .into_iter()
    .flat_map(|id| {
      let node = tree.node(id);
      node
        .operations()
        .into_iter()
        .map(|(method, operation)| OperationRow {
          url_template: tree.url_template(id, Some(&method), spec),
          method: method.as_str().to_string(),
          path: node.path().to_string(),
          operation_id: operation.operation_id.clone().unwrap_or_default(),
        })
        .collect::<Vec<_>>()
    })
    .collect()
}

async fn load_tree(input: &Path) -> anyhow::Result<(oas3::Spec, UriSpaceTree)> {
  let spec = SpecLoader::open(input).await?.parse()?;
  let Some(tree) = UriSpaceTree::from_spec(&spec) else {
    anyhow::bail!("{} does not declare any path", input.display());
  };
  Ok((spec, tree))
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let (spec, tree) = load_tree(input).await?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in ["METHOD", "PATH", "URL TEMPLATE", "OPERATION ID"] {
    row.add_cell(Cell::new(header).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(row);

  for operation in operation_rows(&spec, &tree) {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(operation.method)
        .fg(IntoComfyColor::into(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(
      Cell::new(operation.path)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(operation.url_template).fg(IntoComfyColor::into(colors.primary())));
    row.add_cell(Cell::new(operation.operation_id).fg(IntoComfyColor::into(colors.info())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}

pub async fn list_tree(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let (_, tree) = load_tree(input).await?;
  print!("{}", tree.render().with(colors.primary()));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rows_follow_the_tree_order_with_templates() {
    let spec: oas3::Spec =
      oas3::from_json(include_str!("../../../fixtures/todo_api.json")).expect("todo fixture parses");
    let tree = UriSpaceTree::from_spec(&spec).expect("fixture has paths");

    let rows = operation_rows(&spec, &tree);

    let listed = rows
      .iter()
      .map(|row| format!("{} {}", row.method, row.path))
      .collect::<Vec<_>>();
    assert!(listed.contains(&"GET /todos".to_string()));
    assert!(listed.contains(&"DELETE /todos/{id}".to_string()));
    assert_eq!(rows.len(), 7);

    let list = rows
      .iter()
      .find(|row| row.operation_id == "listTodos")
      .expect("listTodos row");
    assert!(list.url_template.starts_with("{+baseurl}/todos{?"));

    let item = rows
      .iter()
      .find(|row| row.operation_id == "getTodo")
      .expect("getTodo row");
    assert_eq!(item.url_template, "{+baseurl}/todos/{id}");
  }
}
