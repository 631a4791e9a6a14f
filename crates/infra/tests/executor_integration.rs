//! Integration tests for the command executor
//!
//! Exercises the full path against a mock REST endpoint: token acquisition,
//! request shape per verb, envelope decoding and error translation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use marketo_domain::{Command, ConnectionContext, ExecutorConfig, ParamValue};
use marketo_infra::{AccessToken, ApiError, BoxError, CommandExecutor, TokenProvider};
use serde::Deserialize;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Counts calls and hands out a fixed token
struct CountingTokenProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl TokenProvider for CountingTokenProvider {
    async fn authenticate(&self, connection: &ConnectionContext) -> Result<AccessToken, BoxError> {
        assert_eq!(connection.client_id, "integration-client");
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AccessToken::new("integration-token"))
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct DeletedEmail {
    id: i64,
    status: String,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("debug").try_init();
}

fn setup(server: &MockServer) -> (CommandExecutor, Arc<CountingTokenProvider>) {
    init_tracing();

    let provider = Arc::new(CountingTokenProvider { calls: AtomicUsize::new(0) });
    let mut config = ExecutorConfig::new(ConnectionContext::new(
        format!("{}/identity", server.uri()),
        server.uri(),
        "integration-client",
        "integration-secret",
    ));
    config.connection_timeout_ms = 1_000;
    config.socket_read_timeout_ms = 2_000;

    let executor = CommandExecutor::from_config(config, provider.clone()).expect("executor");
    (executor, provider)
}

#[tokio::test]
async fn test_delete_scenario_returns_typed_result() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/emails/5"))
        .and(header("Authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"id": 5, "status": "deleted"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (executor, provider) = setup(&server);
    let command: Command<DeletedEmail> = Command::delete("/rest/v1/emails/5");

    let deleted = executor.execute(&command).await.expect("delete should succeed");
    assert_eq!(deleted, DeletedEmail { id: 5, status: "deleted".to_string() });
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_get_query_carries_json_text_that_round_trips() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/asset/v1/emails.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "result": []})),
        )
        .mount(&server)
        .await;

    let (executor, _) = setup(&server);
    let filter = json!({
        "folder": {"id": 12, "type": "Folder"},
        "names": ["Spring & Summer", "Ünïcode"]
    });
    let command: Command<Vec<Value>> = Command::get("/rest/asset/v1/emails.json")
        .param("filter", ParamValue::json(filter.clone()))
        .param("name", "a b&c");

    let result = executor.execute(&command).await.unwrap();
    assert!(result.is_empty());

    let requests = server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = requests[0].url.query_pairs().into_owned().collect();

    let (_, filter_text) = pairs.iter().find(|(k, _)| k == "filter").expect("filter param");
    let decoded: Value = serde_json::from_str(filter_text).unwrap();
    assert_eq!(decoded, filter);

    assert!(pairs.contains(&("name".to_string(), "a b&c".to_string())));
}

#[tokio::test]
async fn test_limit_error_reported_even_when_listed_second() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requestId": "8cb4#1713d6d17b1",
            "success": false,
            "errors": [
                {"code": "1003", "message": "Invalid action"},
                {"code": "606", "message": "Max rate limit '100' exceeded with in '20' secs"}
            ]
        })))
        .mount(&server)
        .await;

    let (executor, _) = setup(&server);
    let command: Command<Value> = Command::post("/rest/v1/leads.json").param("action", "sync");

    let err = executor.execute(&command).await.unwrap_err();
    match &err {
        ApiError::RequestLimitExceeded { code, message } => {
            assert_eq!(code, "606");
            assert_eq!(
                message,
                "Max rate limit '100' exceeded with in '20' secs \
                 (POST:/rest/v1/leads.json, parameters={action=sync})"
            );
        }
        other => panic!("expected request limit error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generic_error_uses_first_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": [
                {"code": "100", "message": "Invalid id"},
                {"code": "101", "message": "Other"}
            ]
        })))
        .mount(&server)
        .await;

    let (executor, _) = setup(&server);
    let command: Command<Value> = Command::get("/rest/asset/v1/email/0.json");

    match executor.execute(&command).await {
        Err(ApiError::Api { code, message }) => {
            assert_eq!(code.as_deref(), Some("100"));
            assert_eq!(message, "Invalid id (GET:/rest/asset/v1/email/0.json, parameters={})");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_executions_share_one_executor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "result": 1}))
                .set_delay(Duration::from_millis(20)),
        )
        .expect(8)
        .mount(&server)
        .await;

    let (executor, provider) = setup(&server);
    let executor = Arc::new(executor);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let executor = executor.clone();
            tokio::spawn(async move {
                let command: Command<i64> =
                    Command::get("/rest/v1/stats/usage.json").param("n", i);
                executor.execute(&command).await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 1);
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_read_timeout_surfaces_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "result": 1}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let connection =
        ConnectionContext::new("https://id", server.uri(), "integration-client", "secret");
    let executor = CommandExecutor::builder()
        .connection(connection)
        .auth(Arc::new(CountingTokenProvider { calls: AtomicUsize::new(0) }))
        .socket_read_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let command: Command<i64> = Command::get("/rest/v1/stats/usage.json");
    let err = executor.execute(&command).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
}
