use std::str::FromStr;
use std::time::Duration;

use litepost_core::{Collection, Environment, Request, Response};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::store::{Storage, StoreError};

use super::collections;
use super::environments;
use super::migrate::run_migrations;
use super::requests;
use super::responses;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `database_url` and apply migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        run_migrations(&pool).await?;
        tracing::debug!(database_url, "sqlite store ready");
        Ok(Self { pool })
    }

    /// Private in-memory database. Pinned to a single long-lived connection
    /// because every sqlite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Storage for SqliteStore {
    async fn save_request(&self, request: Request) -> Result<Request, StoreError> {
        requests::save_request(&self.pool, request).await
    }

    async fn get_request(&self, id: &str) -> Result<Option<Request>, StoreError> {
        requests::get_request(&self.pool, id).await
    }

    async fn list_requests(&self) -> Result<Vec<Request>, StoreError> {
        requests::list_requests(&self.pool).await
    }

    async fn delete_request(&self, id: &str) -> Result<(), StoreError> {
        requests::delete_request(&self.pool, id).await
    }

    async fn save_response(&self, response: &Response) -> Result<(), StoreError> {
        responses::save_response(&self.pool, response).await
    }

    async fn responses_for_request(&self, request_id: &str) -> Result<Vec<Response>, StoreError> {
        responses::responses_for_request(&self.pool, request_id).await
    }

    async fn save_collection(&self, collection: Collection) -> Result<Collection, StoreError> {
        collections::save_collection(&self.pool, collection).await
    }

    async fn get_collection(&self, id: &str) -> Result<Option<Collection>, StoreError> {
        collections::get_collection(&self.pool, id).await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError> {
        collections::list_collections(&self.pool).await
    }

    async fn delete_collection(&self, id: &str) -> Result<(), StoreError> {
        collections::delete_collection(&self.pool, id).await
    }

    async fn save_environment(&self, environment: Environment) -> Result<Environment, StoreError> {
        environments::save_environment(&self.pool, environment).await
    }

    async fn get_environment(&self, id: &str) -> Result<Option<Environment>, StoreError> {
        environments::get_environment(&self.pool, id).await
    }

    async fn list_environments(&self) -> Result<Vec<Environment>, StoreError> {
        environments::list_environments(&self.pool).await
    }

    async fn delete_environment(&self, id: &str) -> Result<(), StoreError> {
        environments::delete_environment(&self.pool, id).await
    }
}
