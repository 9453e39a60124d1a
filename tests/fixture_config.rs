//! Fixture files driving the dispatcher.

use mock_dispatch::config::{load_config, parse_config, ConfigError};

mod common;

const FIXTURE: &str = r#"
[server]
failure_status = 418

[[rules]]
kind = "body"
value = "body"
response = { status = 201, body = "created" }

[[rules]]
kind = "path"
value = "/api"
[rules.response]
status = 404
headers = { "content-type" = "text/plain" }

[[rules]]
kind = "body"
value = "body"
response = { status = 200 }
"#;

#[tokio::test]
async fn test_fixture_serves_rules_in_file_order() {
    let config = parse_config(FIXTURE).unwrap();
    let dispatcher = config.to_responses().into_dispatcher();
    let addr = common::serve(
        dispatcher
            .clone()
            .router_with(config.server.handler_config()),
    )
    .await;
    let client = common::client();
    let url = format!("http://{}/", addr);

    let res = client.post(&url).body("some body").send().await.unwrap();
    assert_eq!(res.status(), 201);
    assert_eq!(res.text().await.unwrap(), "created");

    let res = client.post(&url).body("body").send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(format!("{url}api/v1")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["content-type"], "text/plain");

    let res = client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), 418);

    assert_eq!(dispatcher.unexpected_requests().len(), 1);
}

#[test]
fn test_load_fixture_from_disk() {
    let path = std::env::temp_dir().join(format!("mock-dispatch-{}.toml", std::process::id()));
    std::fs::write(&path, FIXTURE).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.rules.len(), 3);
    assert_eq!(config.server.failure_status, 418);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_invalid_fixture_reports_every_problem() {
    let err = parse_config(
        r#"
        [server]
        max_body_bytes = 0

        [[rules]]
        kind = "method"
        value = "GET"
        response = { status = 1234 }
        "#,
    )
    .unwrap_err();

    match err {
        ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation error, got {}", other),
    }
}
