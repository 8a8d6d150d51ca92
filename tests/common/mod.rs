//! Shared fixtures for integration tests.

use route_reverse::routing::RouteTable;
use route_reverse::ParamBuilder;
use serde_json::json;

/// `root -> mid -> leaf` with segments `/api`, `/v1/`, `/users/:id`, plus a
/// `profile` route whose builder renames `userId` to `id`.
#[allow(dead_code)]
pub fn api_table() -> RouteTable {
    let table = RouteTable::new();
    let api = table.router().route().unwrap().mount("/api").unwrap();
    let v1 = api.route().unwrap().mount("/v1/").unwrap();
    v1.define("leaf", None).unwrap().get("/users/:id").unwrap();
    v1.define(
        "profile",
        Some(ParamBuilder::new(|raw| json!({ "id": raw["userId"] }))),
    )
    .unwrap()
    .get("/profiles/:id")
    .unwrap();
    table
}

/// Write `content` to a temporary TOML file.
#[allow(dead_code)]
pub fn config_file(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}
