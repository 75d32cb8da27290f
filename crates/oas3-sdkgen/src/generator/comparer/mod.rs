//! Structural equality for schemas, servers and path patterns.

mod hashing;
mod patterns;
mod servers;

pub(crate) use hashing::{CanonicalSchema, SchemaKey};
pub use patterns::{PathPattern, PathPatterns};
pub(crate) use servers::{api_root_url, distinct_servers, normalize_server_url, servers_equivalent};

#[cfg(test)]
mod tests;
