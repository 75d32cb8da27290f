use oas3::spec::Server;

use crate::generator::comparer::{api_root_url, distinct_servers, normalize_server_url, servers_equivalent};

fn server(url: &str) -> Server {
  serde_json::from_value(serde_json::json!({ "url": url })).expect("server should deserialize")
}

#[test]
fn normalization_lowercases_scheme_and_host_only() {
  assert_eq!(
    normalize_server_url("HTTPS://Api.Example.COM/V1/"),
    "https://api.example.com/V1"
  );
  assert_eq!(normalize_server_url("/relative/"), "/relative");
}

#[test]
fn trailing_slash_and_host_case_are_equivalent() {
  assert!(servers_equivalent("https://api.example.com/", "https://API.example.com"));
  assert!(!servers_equivalent("https://api.example.com/v1", "https://api.example.com/V1"));
}

#[test]
fn distinct_servers_keeps_first_spelling() {
  let servers = vec![
    server("https://api.example.com/"),
    server("https://API.example.com"),
    server("https://staging.example.com"),
  ];

  assert_eq!(
    distinct_servers(&servers),
    vec!["https://api.example.com", "https://staging.example.com"]
  );
}

#[test]
fn api_root_url_uses_first_server() {
  assert_eq!(
    api_root_url(&[server("https://graph.example.com/v1.0/")]).as_deref(),
    Some("https://graph.example.com/v1.0")
  );
  assert_eq!(api_root_url(&[]), None);
}
