use std::time::Duration;

use chrono::{DateTime, Utc};
use litepost_core::types::StringMap;
use litepost_core::Response;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::store::StoreError;

#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: String,
    request_id: String,
    status_code: i64,
    headers: Json<StringMap>,
    body: String,
    size: i64,
    duration_ms: i64,
    created_at: DateTime<Utc>,
}

impl From<ResponseRow> for Response {
    fn from(r: ResponseRow) -> Self {
        Response {
            id: r.id,
            request_id: r.request_id,
            status_code: u16::try_from(r.status_code).unwrap_or_default(),
            headers: r.headers.0,
            body: r.body,
            size: u64::try_from(r.size).unwrap_or_default(),
            duration: Duration::from_millis(u64::try_from(r.duration_ms).unwrap_or_default()),
            created_at: r.created_at,
        }
    }
}

pub async fn save_response(pool: &SqlitePool, resp: &Response) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
INSERT INTO responses
  (id, request_id, status_code, headers, body, size, duration_ms, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(&resp.id)
    .bind(&resp.request_id)
    .bind(i64::from(resp.status_code))
    .bind(Json(&resp.headers))
    .bind(&resp.body)
    .bind(i64::try_from(resp.size).unwrap_or(i64::MAX))
    .bind(i64::try_from(resp.duration.as_millis()).unwrap_or(i64::MAX))
    .bind(resp.created_at)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::DuplicateResponse(resp.id.clone()));
    }
    Ok(())
}

pub async fn responses_for_request(
    pool: &SqlitePool,
    request_id: &str,
) -> Result<Vec<Response>, StoreError> {
    let rows: Vec<ResponseRow> = sqlx::query_as(
        r#"
SELECT id, request_id, status_code, headers, body, size, duration_ms, created_at
FROM responses
WHERE request_id = ?
ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(request_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Response::from).collect())
}
