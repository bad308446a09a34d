use chrono::{DateTime, Utc};
use litepost_core::types::StringMap;
use litepost_core::{Collection, Folder, Request};
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::store::StoreError;

#[derive(sqlx::FromRow)]
struct CollectionRow {
    id: String,
    name: String,
    description: String,
    requests: Json<Vec<Request>>,
    folders: Json<Vec<Folder>>,
    variables: Json<StringMap>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CollectionRow> for Collection {
    fn from(r: CollectionRow) -> Self {
        Collection {
            id: r.id,
            name: r.name,
            description: r.description,
            requests: r.requests.0,
            folders: r.folders.0,
            variables: r.variables.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const SELECT: &str = r#"
SELECT id, name, description, requests, folders, variables, created_at, updated_at
FROM collections
"#;

pub async fn save_collection(pool: &SqlitePool, mut col: Collection) -> Result<Collection, StoreError> {
    col.updated_at = Utc::now();
    sqlx::query(
        r#"
INSERT INTO collections
  (id, name, description, requests, folders, variables, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (id) DO UPDATE SET
  name = excluded.name,
  description = excluded.description,
  requests = excluded.requests,
  folders = excluded.folders,
  variables = excluded.variables,
  updated_at = excluded.updated_at
        "#,
    )
    .bind(&col.id)
    .bind(&col.name)
    .bind(&col.description)
    .bind(Json(&col.requests))
    .bind(Json(&col.folders))
    .bind(Json(&col.variables))
    .bind(col.created_at)
    .bind(col.updated_at)
    .execute(pool)
    .await?;
    Ok(col)
}

pub async fn get_collection(pool: &SqlitePool, id: &str) -> Result<Option<Collection>, StoreError> {
    let row: Option<CollectionRow> = sqlx::query_as(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Collection::from))
}

pub async fn list_collections(pool: &SqlitePool) -> Result<Vec<Collection>, StoreError> {
    let rows: Vec<CollectionRow> = sqlx::query_as(&format!("{SELECT} ORDER BY created_at, id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Collection::from).collect())
}

pub async fn delete_collection(pool: &SqlitePool, id: &str) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM collections WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
