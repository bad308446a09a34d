use chrono::{DateTime, Utc};
use litepost_core::types::StringMap;
use litepost_core::{AuthConfig, Request, RequestBody, Test};
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::store::StoreError;

#[derive(sqlx::FromRow)]
struct RequestRow {
    id: String,
    name: String,
    method: String,
    url: String,
    headers: Json<StringMap>,
    query_params: Json<StringMap>,
    body: Option<Json<RequestBody>>,
    auth: Option<Json<AuthConfig>>,
    pre_script: Option<String>,
    post_script: Option<String>,
    tests: Json<Vec<Test>>,
    collection_id: Option<String>,
    folder_id: Option<String>,
    environment_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RequestRow> for Request {
    fn from(r: RequestRow) -> Self {
        Request {
            id: r.id,
            name: r.name,
            method: r.method,
            url: r.url,
            headers: r.headers.0,
            query_params: r.query_params.0,
            body: r.body.map(|b| b.0),
            auth: r.auth.map(|a| a.0),
            pre_script: r.pre_script,
            post_script: r.post_script,
            tests: r.tests.0,
            collection_id: r.collection_id,
            folder_id: r.folder_id,
            environment_id: r.environment_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const SELECT: &str = r#"
SELECT id, name, method, url, headers, query_params, body, auth, pre_script, post_script,
       tests, collection_id, folder_id, environment_id, created_at, updated_at
FROM requests
"#;

pub async fn save_request(pool: &SqlitePool, mut req: Request) -> Result<Request, StoreError> {
    req.updated_at = Utc::now();
    sqlx::query(
        r#"
INSERT INTO requests
  (id, name, method, url, headers, query_params, body, auth, pre_script, post_script,
   tests, collection_id, folder_id, environment_id, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (id) DO UPDATE SET
  name = excluded.name,
  method = excluded.method,
  url = excluded.url,
  headers = excluded.headers,
  query_params = excluded.query_params,
  body = excluded.body,
  auth = excluded.auth,
  pre_script = excluded.pre_script,
  post_script = excluded.post_script,
  tests = excluded.tests,
  collection_id = excluded.collection_id,
  folder_id = excluded.folder_id,
  environment_id = excluded.environment_id,
  updated_at = excluded.updated_at
        "#,
    )
    .bind(&req.id)
    .bind(&req.name)
    .bind(&req.method)
    .bind(&req.url)
    .bind(Json(&req.headers))
    .bind(Json(&req.query_params))
    .bind(req.body.as_ref().map(Json))
    .bind(req.auth.as_ref().map(Json))
    .bind(&req.pre_script)
    .bind(&req.post_script)
    .bind(Json(&req.tests))
    .bind(&req.collection_id)
    .bind(&req.folder_id)
    .bind(&req.environment_id)
    .bind(req.created_at)
    .bind(req.updated_at)
    .execute(pool)
    .await?;
    Ok(req)
}

pub async fn get_request(pool: &SqlitePool, id: &str) -> Result<Option<Request>, StoreError> {
    let row: Option<RequestRow> = sqlx::query_as(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Request::from))
}

pub async fn list_requests(pool: &SqlitePool) -> Result<Vec<Request>, StoreError> {
    let rows: Vec<RequestRow> = sqlx::query_as(&format!("{SELECT} ORDER BY created_at, id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Request::from).collect())
}

pub async fn delete_request(pool: &SqlitePool, id: &str) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM requests WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
