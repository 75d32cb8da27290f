use crate::generator::config::StructuredMimeTypes;

#[test]
fn test_default_entries_in_priority_order() {
  let mime_types = StructuredMimeTypes::default();
  let entries = mime_types.iter().collect::<Vec<_>>();
  assert_eq!(
    entries,
    vec![
      "application/json;q=1",
      "text/plain;q=0.9",
      "application/x-www-form-urlencoded;q=0.2",
      "multipart/form-data;q=0.1",
    ]
  );
}

#[test]
fn test_missing_priority_defaults_to_one() {
  let mime_types = StructuredMimeTypes::parse(["application/json", "text/plain;q=0.5"]).unwrap();
  assert_eq!(mime_types.priority("application/json"), Some(1.0));
  assert_eq!(mime_types.priority("text/plain"), Some(0.5));
}

#[test]
fn test_lookup_ignores_parameters_and_case() {
  let mime_types = StructuredMimeTypes::default();
  assert!(mime_types.contains("Application/JSON; charset=utf-8"));
  assert!(!mime_types.contains("application/octet-stream"));
}

#[test]
fn test_vendor_specific_types_fall_back_to_neutral_form() {
  let mime_types = StructuredMimeTypes::default();
  assert_eq!(mime_types.priority("application/vnd.github.v3+json"), Some(1.0));
}

#[test]
fn test_select_orders_by_priority_then_name_descending() {
  let mime_types = StructuredMimeTypes::parse(["application/json;q=1", "application/xml;q=1", "text/plain;q=0.9"]).unwrap();
  let selected = mime_types.select(["text/plain", "application/json", "image/png", "application/xml"]);
  assert_eq!(selected, vec!["application/xml", "application/json", "text/plain"]);
}

#[test]
fn test_invalid_entries_are_rejected() {
  assert!(StructuredMimeTypes::parse(["not a mime type"]).is_err());
  assert!(StructuredMimeTypes::parse(["application/json;q=abc"]).is_err());
  assert!(StructuredMimeTypes::parse(["application/json;q=2"]).is_err());
  assert!(StructuredMimeTypes::parse(Vec::<String>::new()).is_err());
}
