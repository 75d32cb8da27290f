use inflections::Inflect;

use crate::{
  generator::config::TargetLanguage,
  naming::identifiers::{sanitize, to_first_character_lower_case, to_first_character_upper_case},
};

const CSHARP_RESERVED: &[&str] = &[
  "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class", "const", "continue",
  "decimal", "default", "delegate", "do", "double", "else", "enum", "event", "explicit", "extern", "false", "finally",
  "fixed", "float", "for", "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
  "long", "namespace", "new", "null", "object", "operator", "out", "override", "params", "private", "protected",
  "public", "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static", "string",
  "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort",
  "using", "virtual", "void", "volatile", "while",
];

const JAVA_RESERVED: &[&str] = &[
  "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const", "continue", "default",
  "do", "double", "else", "enum", "extends", "final", "finally", "float", "for", "goto", "if", "implements", "import",
  "instanceof", "int", "interface", "long", "native", "new", "package", "private", "protected", "public", "return",
  "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
  "void", "volatile", "while", "true", "false", "null",
];

const TYPESCRIPT_RESERVED: &[&str] = &[
  "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do", "else", "enum",
  "export", "extends", "false", "finally", "for", "function", "if", "import", "in", "instanceof", "new", "null",
  "return", "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "as",
  "implements", "interface", "let", "package", "private", "protected", "public", "static", "yield", "any",
  "boolean", "number", "string", "symbol", "type",
];

const PYTHON_RESERVED: &[&str] = &[
  "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif", "else", "except",
  "False", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "None", "nonlocal", "not", "or",
  "pass", "raise", "return", "True", "try", "while", "with", "yield", "self",
];

const GO_RESERVED: &[&str] = &[
  "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough", "for", "func", "go", "goto",
  "if", "import", "interface", "map", "package", "range", "return", "select", "struct", "switch", "type", "var",
  "string", "error", "any", "int", "bool",
];

/// How a name is cased for one kind of symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Casing {
  /// `TodoItem`
  Pascal,
  /// `todoItem`
  Camel,
  /// `todo_item`
  Snake,
  /// `todoitem`
  Lower,
}

impl Casing {
  pub(crate) fn apply(self, name: &str) -> String {
    match self {
      Self::Pascal => to_first_character_upper_case(name),
      Self::Camel => to_first_character_lower_case(name),
      Self::Snake => sanitize(&name.to_snake_case()),
      Self::Lower => name.to_lowercase(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
  Prefix(&'static str),
  Suffix(&'static str),
}

/// Naming and layout rules of one target language.
#[derive(Debug, Clone)]
pub(crate) struct Conventions {
  pub(crate) language: TargetLanguage,
  pub(crate) file_suffix: &'static str,
  pub(crate) indent: &'static str,
  pub(crate) directory_casing: Casing,
  pub(crate) file_casing: Casing,
  /// Properties and methods.
  pub(crate) member_casing: Casing,
  pub(crate) parameter_casing: Casing,
  /// Whether nested classes are declared inside their owner or after it.
  pub(crate) nests_types: bool,
  /// Whether references to nested classes spell out the owner (`Owner.Nested`).
  pub(crate) qualifies_nested_types: bool,
  reserved: &'static [&'static str],
  escape: Escape,
}

impl Conventions {
  pub(crate) fn for_language(language: TargetLanguage) -> Self {
    match language {
      TargetLanguage::CSharp => Self {
        language,
        file_suffix: ".cs",
        indent: "    ",
        directory_casing: Casing::Pascal,
        file_casing: Casing::Pascal,
        member_casing: Casing::Pascal,
        parameter_casing: Casing::Camel,
        nests_types: true,
        qualifies_nested_types: true,
        reserved: CSHARP_RESERVED,
        escape: Escape::Prefix("@"),
      },
      TargetLanguage::Java => Self {
        language,
        file_suffix: ".java",
        indent: "    ",
        directory_casing: Casing::Lower,
        file_casing: Casing::Pascal,
        member_casing: Casing::Camel,
        parameter_casing: Casing::Camel,
        nests_types: true,
        qualifies_nested_types: false,
        reserved: JAVA_RESERVED,
        escape: Escape::Suffix("Escaped"),
      },
      TargetLanguage::TypeScript => Self {
        language,
        file_suffix: ".ts",
        indent: "    ",
        directory_casing: Casing::Camel,
        file_casing: Casing::Camel,
        member_casing: Casing::Camel,
        parameter_casing: Casing::Camel,
        nests_types: false,
        qualifies_nested_types: false,
        reserved: TYPESCRIPT_RESERVED,
        escape: Escape::Suffix("Escaped"),
      },
      TargetLanguage::Python => Self {
        language,
        file_suffix: ".py",
        indent: "    ",
        directory_casing: Casing::Snake,
        file_casing: Casing::Snake,
        member_casing: Casing::Snake,
        parameter_casing: Casing::Snake,
        nests_types: true,
        qualifies_nested_types: true,
        reserved: PYTHON_RESERVED,
        escape: Escape::Suffix("_"),
      },
      TargetLanguage::Go => Self {
        language,
        file_suffix: ".go",
        indent: "\t",
        directory_casing: Casing::Lower,
        file_casing: Casing::Snake,
        member_casing: Casing::Pascal,
        parameter_casing: Casing::Camel,
        nests_types: false,
        qualifies_nested_types: false,
        reserved: GO_RESERVED,
        escape: Escape::Suffix("Escaped"),
      },
      TargetLanguage::Http => Self {
        language,
        file_suffix: ".http",
        indent: "  ",
        directory_casing: Casing::Camel,
        file_casing: Casing::Camel,
        member_casing: Casing::Camel,
        parameter_casing: Casing::Camel,
        nests_types: true,
        qualifies_nested_types: false,
        reserved: &[],
        escape: Escape::Suffix("Escaped"),
      },
    }
  }

  pub(crate) fn is_reserved(&self, name: &str) -> bool {
    self.reserved.contains(&name)
  }

  /// Escapes `name` when it is a keyword of the language.
  pub(crate) fn escape(&self, name: &str) -> String {
    if !self.is_reserved(name) {
      return name.to_string();
    }
    match self.escape {
      Escape::Prefix(prefix) => format!("{prefix}{name}"),
      Escape::Suffix(suffix) => format!("{name}{suffix}"),
    }
  }

  pub(crate) fn member_name(&self, name: &str) -> String {
    self.escape(&self.member_casing.apply(name))
  }

  pub(crate) fn parameter_name(&self, name: &str) -> String {
    self.escape(&self.parameter_casing.apply(name))
  }

  pub(crate) fn type_name(&self, name: &str) -> String {
    self.escape(&Casing::Pascal.apply(name))
  }

  pub(crate) fn directory_name(&self, segment: &str) -> String {
    self.directory_casing.apply(segment)
  }

  pub(crate) fn file_name(&self, declaration: &str) -> String {
    format!("{}{}", self.file_casing.apply(declaration), self.file_suffix)
  }
}
