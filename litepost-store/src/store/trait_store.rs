use async_trait::async_trait;
use litepost_core::{Collection, Environment, Request, Response};

/// Durable CRUD for requests, responses, collections and environments.
///
/// Implementations provide their own internal synchronization; callers may
/// share one instance across tasks. `save_*` upserts by id and returns the
/// stored entity with `updated_at` stamped.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_request(&self, request: Request) -> Result<Request, StoreError>;

    async fn get_request(&self, id: &str) -> Result<Option<Request>, StoreError>;

    async fn list_requests(&self) -> Result<Vec<Request>, StoreError>;

    async fn delete_request(&self, id: &str) -> Result<(), StoreError>;

    /// Responses are append-only; saving an existing id is an error.
    async fn save_response(&self, response: &Response) -> Result<(), StoreError>;

    /// Responses recorded for a request, newest first.
    async fn responses_for_request(&self, request_id: &str) -> Result<Vec<Response>, StoreError>;

    async fn save_collection(&self, collection: Collection) -> Result<Collection, StoreError>;

    async fn get_collection(&self, id: &str) -> Result<Option<Collection>, StoreError>;

    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError>;

    async fn delete_collection(&self, id: &str) -> Result<(), StoreError>;

    async fn save_environment(&self, environment: Environment) -> Result<Environment, StoreError>;

    async fn get_environment(&self, id: &str) -> Result<Option<Environment>, StoreError>;

    async fn list_environments(&self) -> Result<Vec<Environment>, StoreError>;

    async fn delete_environment(&self, id: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
    #[error("response already recorded: {0}")]
    DuplicateResponse(String),
    #[error("migration failed: {0}")]
    Migration(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}
