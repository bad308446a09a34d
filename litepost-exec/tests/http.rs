use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use litepost_core::{Environment, EnvironmentRegistry, Request, Test};
use litepost_exec::{
    Executor, ExecutorConfig, HttpClient, HttpConfig, HttpError, HttpRequestParts,
    ReqwestHttpClient, RetryConfig,
};
use litepost_store::{MemoryStore, Storage};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MAX_BYTES: usize = 1024;

fn client(follow_redirects: bool) -> ReqwestHttpClient {
    ReqwestHttpClient::new(&HttpConfig {
        follow_redirects,
        ..HttpConfig::default()
    })
    .unwrap()
}

fn parts(method: &str, url: String) -> HttpRequestParts {
    HttpRequestParts {
        method: method.to_string(),
        url: url::Url::parse(&url).unwrap(),
        headers: BTreeMap::new(),
        body: Vec::new(),
    }
}

#[tokio::test]
async fn sends_method_headers_query_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .and(header("x-token", "abc"))
        .and(body_string(r#"{"name":"alice"}"#))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("x-request-id", "r-1")
                .set_body_string("created"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut req = parts("POST", format!("{}/users?page=2", server.uri()));
    req.headers.insert("X-Token".to_string(), "abc".to_string());
    req.body = br#"{"name":"alice"}"#.to_vec();

    let resp = client(true)
        .send(req, Duration::from_secs(5), MAX_BYTES)
        .await
        .unwrap();

    assert_eq!(resp.status, 201);
    assert_eq!(resp.headers["x-request-id"], "r-1");
    assert_eq!(resp.body, b"created".to_vec());
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(MAX_BYTES + 1)))
        .mount(&server)
        .await;

    let err = client(true)
        .send(parts("GET", server.uri()), Duration::from_secs(5), MAX_BYTES)
        .await
        .unwrap_err();

    assert_eq!(err, HttpError::ResponseTooLarge { max_bytes: MAX_BYTES });
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let err = client(true)
        .send(parts("GET", server.uri()), Duration::from_millis(50), MAX_BYTES)
        .await
        .unwrap_err();

    assert_eq!(err, HttpError::Timeout);
    assert!(err.is_transient());
}

#[tokio::test]
async fn redirects_can_be_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let url = format!("{}/old", server.uri());
    let followed = client(true)
        .send(parts("GET", url.clone()), Duration::from_secs(5), MAX_BYTES)
        .await
        .unwrap();
    assert_eq!(followed.status, 200);

    let not_followed = client(false)
        .send(parts("GET", url), Duration::from_secs(5), MAX_BYTES)
        .await
        .unwrap();
    assert_eq!(not_followed.status, 302);
}

#[tokio::test]
async fn pipeline_end_to_end_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("authorization", "Bearer k1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":1,"name":"alice"}"#))
        .mount(&server)
        .await;

    let registry = Arc::new(EnvironmentRegistry::new());
    registry.set(
        Environment::new("local", "Local")
            .with_variable("base_url", server.uri())
            .with_variable("token", "k1"),
    );
    let store = Arc::new(MemoryStore::new());
    let config = ExecutorConfig::default();
    let http = Arc::new(ReqwestHttpClient::new(&config.http).unwrap());
    let executor = Executor::new(config, store.clone(), http, registry);

    let mut req = Request::new("get user");
    req.url = "{{base_url}}/users/1".to_string();
    req.headers
        .insert("Authorization".to_string(), "Bearer {{token}}".to_string());
    req.environment_id = Some("local".to_string());
    req.tests.push(Test::new(
        "named alice",
        r#"pm.expect(response.json.name).to.equal("alice")"#,
    ));

    let execution = executor.execute_request(&req).await.unwrap();

    assert_eq!(execution.attempts, 2);
    assert_eq!(execution.response.status_code, 200);
    assert_eq!(execution.response.size, 23);
    assert!(execution.tests_passed());
    assert_eq!(store.responses_for_request(&req.id).await.unwrap().len(), 1);
}

#[test]
fn retry_config_builders() {
    let cfg = RetryConfig::default().with_retries(0);
    assert_eq!(cfg.max_attempts, 1);
    assert_eq!(RetryConfig::disabled().max_attempts, 1);
}
