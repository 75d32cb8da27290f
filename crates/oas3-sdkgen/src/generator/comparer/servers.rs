use oas3::spec::Server;

/// Lower-cases scheme and host and drops trailing slashes; the path keeps its case.
pub(crate) fn normalize_server_url(url: &str) -> String {
  let trimmed = url.trim().trim_end_matches('/');
  let Some((scheme, rest)) = trimmed.split_once("://") else {
    return trimmed.to_string();
  };
  let (host, path) = rest.find('/').map_or((rest, ""), |index| rest.split_at(index));
  format!("{}://{}{path}", scheme.to_ascii_lowercase(), host.to_ascii_lowercase())
}

pub(crate) fn servers_equivalent(a: &str, b: &str) -> bool {
  normalize_server_url(a) == normalize_server_url(b)
}

/// Server URLs in declaration order with equivalent entries removed.
pub(crate) fn distinct_servers(servers: &[Server]) -> Vec<String> {
  let mut distinct: Vec<String> = vec![];
  for server in servers {
    if !distinct.iter().any(|known| servers_equivalent(known, &server.url)) {
      distinct.push(server.url.trim().trim_end_matches('/').to_string());
    }
  }
  distinct
}

/// The first declared server, which becomes the client's base URL.
pub(crate) fn api_root_url(servers: &[Server]) -> Option<String> {
  distinct_servers(servers).into_iter().find(|url| !url.is_empty())
}
