use chrono::{DateTime, Utc};
use litepost_core::types::StringMap;
use litepost_core::Environment;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::store::StoreError;

#[derive(sqlx::FromRow)]
struct EnvironmentRow {
    id: String,
    name: String,
    variables: Json<StringMap>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EnvironmentRow> for Environment {
    fn from(r: EnvironmentRow) -> Self {
        Environment {
            id: r.id,
            name: r.name,
            variables: r.variables.0,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const SELECT: &str = r#"
SELECT id, name, variables, is_active, created_at, updated_at
FROM environments
"#;

pub async fn save_environment(
    pool: &SqlitePool,
    mut env: Environment,
) -> Result<Environment, StoreError> {
    env.updated_at = Utc::now();
    sqlx::query(
        r#"
INSERT INTO environments (id, name, variables, is_active, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?)
ON CONFLICT (id) DO UPDATE SET
  name = excluded.name,
  variables = excluded.variables,
  is_active = excluded.is_active,
  updated_at = excluded.updated_at
        "#,
    )
    .bind(&env.id)
    .bind(&env.name)
    .bind(Json(&env.variables))
    .bind(env.is_active)
    .bind(env.created_at)
    .bind(env.updated_at)
    .execute(pool)
    .await?;
    Ok(env)
}

pub async fn get_environment(pool: &SqlitePool, id: &str) -> Result<Option<Environment>, StoreError> {
    let row: Option<EnvironmentRow> = sqlx::query_as(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Environment::from))
}

pub async fn list_environments(pool: &SqlitePool) -> Result<Vec<Environment>, StoreError> {
    let rows: Vec<EnvironmentRow> = sqlx::query_as(&format!("{SELECT} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Environment::from).collect())
}

pub async fn delete_environment(pool: &SqlitePool, id: &str) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM environments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
