use crate::naming::identifiers::{
  cleanup_symbol_name, ensure_unique, sanitize, to_first_character_lower_case, to_first_character_upper_case,
  to_original_camel_case, to_snake_case,
};

#[test]
fn test_cleanup_symbol_name() {
  assert_eq!(cleanup_symbol_name("user-id"), "userId");
  assert_eq!(cleanup_symbol_name("{id}"), "Id");
  assert_eq!(cleanup_symbol_name("{user-id}"), "UserId");
  assert_eq!(cleanup_symbol_name("some.dotted name"), "someDottedName");
  assert_eq!(cleanup_symbol_name("__private"), "private");
  assert_eq!(cleanup_symbol_name(""), "");
}

#[test]
fn test_cleanup_symbol_name_spells_out_leading_digits() {
  assert_eq!(cleanup_symbol_name("2fa"), "Twofa");
  assert_eq!(cleanup_symbol_name("10x"), "OneZerox");
}

#[test]
fn test_cleanup_symbol_name_handles_signs() {
  assert_eq!(cleanup_symbol_name("-created"), "minus_created");
  assert_eq!(cleanup_symbol_name("+1"), "plus_1");
  assert_eq!(cleanup_symbol_name("-"), "minus");
}

#[test]
fn test_cleanup_symbol_name_spells_out_symbol_only_names() {
  assert_eq!(cleanup_symbol_name("*"), "Asterisk");
  assert_eq!(cleanup_symbol_name("@"), "At");
}

#[test]
fn test_first_character_casing() {
  assert_eq!(to_first_character_upper_case("todo"), "Todo");
  assert_eq!(to_first_character_lower_case("Todo"), "todo");
  assert_eq!(to_first_character_upper_case(""), "");
}

#[test]
fn test_original_camel_case() {
  assert_eq!(to_original_camel_case("Item-id", &['-', '.']), "ItemId");
  assert_eq!(to_original_camel_case("user.profile-photo", &['-', '.']), "userProfilePhoto");
  assert_eq!(to_original_camel_case("--", &['-']), "");
}

#[test]
fn test_snake_case() {
  assert_eq!(to_snake_case("userIdValue"), "user_id_value");
  assert_eq!(to_snake_case("TodoItem"), "todo_item");
  assert_eq!(to_snake_case("List<String>"), "list");
  assert_eq!(to_snake_case("already_snake"), "already_snake");
  assert_eq!(to_snake_case("with-dash"), "with_dash");
}

#[test]
fn test_sanitize() {
  assert_eq!(sanitize("café au lait"), "cafe_au_lait");
  assert_eq!(sanitize("__a--b__"), "a_b");
  assert_eq!(sanitize(""), "");
}

#[test]
fn test_ensure_unique() {
  let used = ["Todo", "Todo1"];
  assert_eq!(ensure_unique("Todo", |name| used.contains(&name)), "Todo2");
  assert_eq!(ensure_unique("User", |name| used.contains(&name)), "User");
}
