//! Route tables declared through configuration files.

use route_reverse::config::{load_config, ConfigError, ValidationError};
use route_reverse::routing::{MethodFilter, RouteTable};
use route_reverse::{RequestContext, RouteError};
use serde_json::json;

mod common;

const ROUTES: &str = r#"
base_url = "/"
base_from_request = true

[[routes]]
path = "/api"

[[routes.routes]]
path = "/v1/"

[[routes.routes.routes]]
name = "user"
path = "/users/:id(\\d+)"
method = "GET"

[[routes.routes.routes]]
name = "files"
path = "/files/:path*"

[[routes]]
name = "home"
path = "/"
"#;

#[test]
fn test_load_and_resolve() {
    let file = common::config_file(ROUTES);
    let config = load_config(file.path()).unwrap();

    let table = RouteTable::from_config(&config.routes).unwrap();
    let resolver = table.finalize(config.base()).unwrap();

    let names: Vec<_> = resolver.list_all().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["user", "files", "home"]);

    let ctx = RequestContext::new().with_scheme("https").with_host("shop.example");
    assert_eq!(
        resolver.resolve("user", &json!({ "id": 5 }), Some(&ctx)).unwrap(),
        "https://shop.example/api/v1/users/5"
    );
    assert_eq!(
        resolver.resolve("files", &json!({ "path": ["a", "b.txt"] }), None).unwrap(),
        "/api/v1/files/a/b.txt"
    );
    assert_eq!(resolver.resolve("home", &json!({}), None).unwrap(), "/");
}

#[test]
fn test_pattern_rejects_bad_values() {
    let file = common::config_file(ROUTES);
    let config = load_config(file.path()).unwrap();
    let resolver = RouteTable::from_config(&config.routes)
        .unwrap()
        .finalize(config.base())
        .unwrap();

    let err = resolver.resolve("user", &json!({ "id": "abc" }), None).unwrap_err();
    assert!(matches!(err, RouteError::InvalidParameter { ref name, .. } if name == "id"));
}

#[test]
fn test_methods_are_recorded() {
    let config = route_reverse::config::parse_config(ROUTES).unwrap();
    let table = RouteTable::from_config(&config.routes).unwrap();
    let methods: Vec<_> = table
        .snapshot()
        .iter()
        .map(|node| node.method().map(ToString::to_string))
        .collect();

    assert_eq!(
        methods,
        vec![
            Some("USE".to_string()),
            Some("USE".to_string()),
            Some("GET".to_string()),
            Some("ALL".to_string()),
            Some("ALL".to_string()),
        ]
    );
    assert_eq!(
        table.snapshot().iter().nth(2).unwrap().method(),
        Some(&MethodFilter::Method(http::Method::GET))
    );
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let file = common::config_file(
        r#"
        [[routes]]
        name = "dup"
        path = "/a/:"

        [[routes]]
        name = "dup"
        "#,
    );

    match load_config(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 3, "{errors:?}");
            assert!(matches!(errors[0], ValidationError::InvalidTemplate { .. }));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}
