use std::time::Duration;

use chrono::{TimeZone, Utc};
use litepost_core::{
    AuthConfig, BodyKind, Collection, Environment, Folder, Request, RequestBody, Response, Test,
};
use litepost_store::{MemoryStore, SqliteStore, Storage, StoreError};

fn sample_request(name: &str) -> Request {
    let mut req = Request::new(name);
    req.method = "POST".to_string();
    req.url = "{{base_url}}/users".to_string();
    req.headers.insert("Accept".to_string(), "application/json".to_string());
    req.query_params.insert("page".to_string(), "1".to_string());
    req.body = Some(RequestBody::new(BodyKind::Json, r#"{"name":"a"}"#));
    req.auth = Some(AuthConfig::new("bearer").with("token", "{{api_key}}"));
    req.pre_script = Some("request.headers[\"X-Trace\"] = \"1\";".to_string());
    req.tests.push(Test::new("ok", "response.statusCode == 200"));
    req.environment_id = Some("development".to_string());
    req
}

fn response_at(request_id: &str, status: u16, secs: i64) -> Response {
    let mut resp = Response::new(
        request_id,
        status,
        [("content-type".to_string(), "text/plain".to_string())]
            .into_iter()
            .collect(),
        b"hello",
        Duration::from_millis(42),
    );
    resp.created_at = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
    resp
}

async fn request_crud(store: &dyn Storage) {
    let req = sample_request("create user");
    let before = req.updated_at;

    let saved = store.save_request(req.clone()).await.unwrap();
    assert!(saved.updated_at >= before);

    let loaded = store.get_request(&req.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "create user");
    assert_eq!(loaded.method, "POST");
    assert_eq!(loaded.url, req.url);
    assert_eq!(loaded.headers, req.headers);
    assert_eq!(loaded.query_params, req.query_params);
    assert_eq!(loaded.body, req.body);
    assert_eq!(loaded.auth, req.auth);
    assert_eq!(loaded.pre_script, req.pre_script);
    assert_eq!(loaded.tests, req.tests);
    assert_eq!(loaded.environment(), Some("development"));

    let mut renamed = loaded.clone();
    renamed.name = "create user v2".to_string();
    store.save_request(renamed).await.unwrap();
    let all = store.list_requests().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "create user v2");

    store.delete_request(&req.id).await.unwrap();
    assert!(store.get_request(&req.id).await.unwrap().is_none());
    // Deleting twice is not an error.
    store.delete_request(&req.id).await.unwrap();
}

async fn requests_listed_in_creation_order(store: &dyn Storage) {
    let mut first = sample_request("first");
    first.created_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut second = sample_request("second");
    second.created_at = Utc.timestamp_opt(1_700_000_100, 0).unwrap();

    store.save_request(second).await.unwrap();
    store.save_request(first).await.unwrap();

    let names: Vec<String> = store
        .list_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

async fn responses_newest_first(store: &dyn Storage) {
    let older = response_at("req-1", 200, 0);
    let newer = response_at("req-1", 500, 10);
    let other = response_at("req-2", 201, 5);

    store.save_response(&older).await.unwrap();
    store.save_response(&newer).await.unwrap();
    store.save_response(&other).await.unwrap();

    let history = store.responses_for_request("req-1").await.unwrap();
    let statuses: Vec<u16> = history.iter().map(|r| r.status_code).collect();
    assert_eq!(statuses, vec![500, 200]);
    assert_eq!(history[1].body, "hello");
    assert_eq!(history[1].size, 5);
    assert_eq!(history[1].duration, Duration::from_millis(42));
    assert_eq!(history[1].header("Content-Type"), Some("text/plain"));

    assert!(store.responses_for_request("missing").await.unwrap().is_empty());
}

async fn duplicate_response_rejected(store: &dyn Storage) {
    let resp = response_at("req-1", 200, 0);
    store.save_response(&resp).await.unwrap();
    let err = store.save_response(&resp).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateResponse(id) if id == resp.id));
    assert_eq!(store.responses_for_request("req-1").await.unwrap().len(), 1);
}

async fn collection_crud(store: &dyn Storage) {
    let mut collection = Collection::new("users api");
    collection.requests.push(sample_request("list"));
    collection.folders.push(Folder {
        id: "admin".to_string(),
        name: "Admin".to_string(),
        requests: vec![sample_request("ban")],
        folders: Vec::new(),
    });

    store.save_collection(collection.clone()).await.unwrap();
    let loaded = store.get_collection(&collection.id).await.unwrap().unwrap();
    let summary = loaded.summary();
    assert_eq!(summary.request_count, 2);
    assert_eq!(summary.folder_count, 1);
    assert_eq!(loaded.folders[0].requests[0].name, "ban");

    assert_eq!(store.list_collections().await.unwrap().len(), 1);
    store.delete_collection(&collection.id).await.unwrap();
    assert!(store.get_collection(&collection.id).await.unwrap().is_none());
}

async fn environment_crud(store: &dyn Storage) {
    let staging = Environment::new("staging", "Staging").with_variable("base_url", "https://staging");
    let local = Environment::new("local", "Local").with_variable("base_url", "http://localhost");

    store.save_environment(staging).await.unwrap();
    store.save_environment(local).await.unwrap();

    let ids: Vec<String> = store
        .list_environments()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["local", "staging"]);

    let updated = Environment::new("staging", "Staging").with_variable("base_url", "https://staging2");
    store.save_environment(updated).await.unwrap();
    let loaded = store.get_environment("staging").await.unwrap().unwrap();
    assert_eq!(loaded.variable("base_url"), Some("https://staging2"));

    store.delete_environment("staging").await.unwrap();
    assert!(store.get_environment("staging").await.unwrap().is_none());
}

#[tokio::test]
async fn memory_request_crud() {
    request_crud(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_requests_listed_in_creation_order() {
    requests_listed_in_creation_order(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_responses_newest_first() {
    responses_newest_first(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_duplicate_response_rejected() {
    duplicate_response_rejected(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_collection_crud() {
    collection_crud(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_environment_crud() {
    environment_crud(&MemoryStore::new()).await;
}

#[tokio::test]
async fn sqlite_request_crud() {
    request_crud(&SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn sqlite_requests_listed_in_creation_order() {
    requests_listed_in_creation_order(&SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn sqlite_responses_newest_first() {
    responses_newest_first(&SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn sqlite_duplicate_response_rejected() {
    duplicate_response_rejected(&SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn sqlite_collection_crud() {
    collection_crud(&SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn sqlite_environment_crud() {
    environment_crud(&SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn sqlite_file_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("litepost.db").display());

    let req = sample_request("persisted");
    {
        let store = SqliteStore::connect(&url, 2).await.unwrap();
        store.save_request(req.clone()).await.unwrap();
        store.save_response(&response_at(&req.id, 204, 0)).await.unwrap();
        store.pool().close().await;
    }

    // Reconnecting re-runs migrations, which must be a no-op.
    let store = SqliteStore::connect(&url, 2).await.unwrap();
    let loaded = store.get_request(&req.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "persisted");
    let history = store.responses_for_request(&req.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status_code, 204);
}
