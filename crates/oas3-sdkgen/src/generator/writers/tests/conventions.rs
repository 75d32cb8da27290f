use crate::generator::{
  config::TargetLanguage,
  writers::{Casing, Conventions},
};

#[test]
fn casing_rules_follow_the_language() {
  let csharp = Conventions::for_language(TargetLanguage::CSharp);
  assert_eq!(csharp.member_name("dueDate"), "DueDate");
  assert_eq!(csharp.parameter_name("RequestAdapter"), "requestAdapter");

  let python = Conventions::for_language(TargetLanguage::Python);
  assert_eq!(python.member_name("dueDate"), "due_date");
  assert_eq!(python.file_name("TodoItem"), "todo_item.py");
  assert_eq!(python.member_name("caféCrème"), "cafe_creme");

  let go = Conventions::for_language(TargetLanguage::Go);
  assert_eq!(go.member_name("dueDate"), "DueDate");
  assert_eq!(go.directory_name("Todos"), "todos");
  assert_eq!(go.indent, "\t");
}

#[test]
fn reserved_words_are_escaped_per_language() {
  assert_eq!(Conventions::for_language(TargetLanguage::CSharp).escape("class"), "@class");
  assert_eq!(Conventions::for_language(TargetLanguage::Python).escape("from"), "from_");
  assert_eq!(Conventions::for_language(TargetLanguage::Java).escape("class"), "classEscaped");
  assert_eq!(Conventions::for_language(TargetLanguage::Go).escape("type"), "typeEscaped");
  assert_eq!(Conventions::for_language(TargetLanguage::Go).escape("title"), "title");
}

#[test]
fn type_names_are_pascal_cased() {
  let java = Conventions::for_language(TargetLanguage::Java);
  assert_eq!(java.type_name("todoItem"), "TodoItem");
  assert_eq!(Casing::Lower.apply("TodoItem"), "todoitem");
}
