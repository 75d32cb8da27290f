use std::sync::LazyLock;

use any_ascii::any_ascii;
use regex::{Captures, Regex};

// Characters that cannot appear in a symbol; the captured letter that follows is upper-cased.
static SYMBOL_CLEANUP_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"["\s!#$%&'()*,./:;<=>?@\[\]\\^`’{}|~-](?<following>\w)?"#).expect("symbol cleanup regex is valid")
});
static LEADING_NUMBER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?<number>\d+)").expect("leading number regex is valid"));
static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("regex is valid"));
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("regex is valid"));

const SPELLED_OUT_DIGITS: [&str; 10] = [
  "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

const SPELLED_OUT_SYMBOLS: [(char, &str); 25] = [
  ('!', "Exclamation"),
  ('"', "DoubleQuote"),
  ('#', "Pound"),
  ('$', "Dollar"),
  ('%', "Percent"),
  ('&', "Ampersand"),
  ('\'', "Apostrophe"),
  ('(', "LeftParenthesis"),
  (')', "RightParenthesis"),
  ('*', "Asterisk"),
  ('+', "Plus"),
  (',', "Comma"),
  ('-', "Hyphen"),
  ('_', "Underscore"),
  ('.', "Period"),
  ('/', "Slash"),
  ('\\', "BackSlash"),
  (':', "Colon"),
  (';', "SemiColon"),
  ('<', "LessThan"),
  ('=', "Equal"),
  ('>', "GreaterThan"),
  ('?', "QuestionMark"),
  ('~', "Tilde"),
  ('@', "At"),
];

/// Transliterates to ASCII, replaces invalid characters with underscores, collapses
/// consecutive underscores, and trims leading or trailing underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

pub(crate) fn to_first_character_upper_case(input: &str) -> String {
  let mut chars = input.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

pub(crate) fn to_first_character_lower_case(input: &str) -> String {
  let mut chars = input.chars();
  match chars.next() {
    Some(first) => first.to_lowercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Turns any string into a symbol usable by every target language.
///
/// # Rules:
/// 1. A leading `-` becomes `minus_` and every `+` becomes `_plus_`.
/// 2. Leading underscores are dropped.
/// 3. Punctuation and whitespace are removed and the letter that follows is upper-cased,
///    so `user-id` becomes `userId` and `{id}` becomes `Id`.
/// 4. Leading digits are spelled out (`2fa` becomes `Twofa`).
/// 5. A name made only of symbols is spelled out (`+` becomes `Plus`).
pub(crate) fn cleanup_symbol_name(original: &str) -> String {
  if original.is_empty() {
    return String::new();
  }

  let mut result = original.to_string();
  if let Some(rest) = result.strip_prefix('-') {
    result = format!("minus_{rest}");
  }
  if result.contains('+') {
    result = result.replace('+', "_plus_");
  }

  let trimmed = result.trim_start_matches('_');
  let mut result = SYMBOL_CLEANUP_RE
    .replace_all(trimmed, |caps: &Captures| {
      caps
        .name("following")
        .map(|m| to_first_character_upper_case(m.as_str()))
        .unwrap_or_default()
    })
    .into_owned();

  if result.starts_with(|c: char| c.is_ascii_digit()) {
    result = LEADING_NUMBER_RE
      .replace(&result, |caps: &Captures| {
        caps["number"]
          .chars()
          .filter_map(|digit| digit.to_digit(10))
          .map(|digit| SPELLED_OUT_DIGITS[digit as usize])
          .collect::<String>()
      })
      .into_owned();
  }

  if result.ends_with("minus_") || result.ends_with("plus_") {
    result.pop();
  }
  if let Some(rest) = result.strip_prefix("_plus") {
    result = format!("plus{rest}");
  }

  if result.is_empty() {
    result = original
      .chars()
      .map(|c| {
        SPELLED_OUT_SYMBOLS
          .iter()
          .find(|(symbol, _)| *symbol == c)
          .map_or_else(|| c.to_string(), |(_, word)| (*word).to_string())
      })
      .collect();
  }

  result
}

fn split_words(input: &str, separators: &[char]) -> Vec<String> {
  input
    .split(|c: char| separators.contains(&c))
    .filter(|chunk| !chunk.is_empty())
    .map(String::from)
    .collect()
}

/// Camel-joins the words without normalizing the first one (`Item-id` stays `ItemId`).
pub(crate) fn to_original_camel_case(input: &str, separators: &[char]) -> String {
  let words = split_words(input, separators);
  let Some((first, rest)) = words.split_first() else {
    return String::new();
  };
  let mut result = first.clone();
  result.extend(rest.iter().map(|word| to_first_character_upper_case(word)));
  result
}

/// `userIdValue` becomes `user_id_value`; generic arguments (`<...>`) are dropped.
pub(crate) fn to_snake_case(input: &str) -> String {
  let name = input.split('<').next().unwrap_or_default();
  let chars = name.chars().collect::<Vec<_>>();
  let Some(first) = chars.first() else {
    return String::new();
  };

  let mut result = String::with_capacity(name.len() + 4);
  result.extend(first.to_lowercase());
  for (index, current) in chars.iter().enumerate().skip(1) {
    if *current == '-' {
      if !chars.get(index + 1).is_some_and(char::is_ascii_uppercase) {
        result.push('_');
      }
    } else if current.is_ascii_uppercase() {
      if chars[index - 1] != '_' {
        result.push('_');
      }
      result.extend(current.to_lowercase());
    } else {
      result.push(*current);
    }
  }
  result
}

/// Appends a numeric suffix until `name` is not in `used`.
pub(crate) fn ensure_unique<F>(name: &str, is_used: F) -> String
where
  F: Fn(&str) -> bool,
{
  if !is_used(name) {
    return name.to_string();
  }
  let mut index = 1usize;
  loop {
    let candidate = format!("{name}{index}");
    if !is_used(&candidate) {
      return candidate;
    }
    index += 1;
  }
}
