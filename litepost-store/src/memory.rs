use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use litepost_core::{Collection, Environment, Request, Response};

use crate::store::{Storage, StoreError};

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Maps>,
}

#[derive(Debug, Default)]
struct Maps {
    requests: HashMap<String, Request>,
    responses: HashMap<String, Response>,
    collections: HashMap<String, Collection>,
    environments: HashMap<String, Environment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Maps) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Maps) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn save_request(&self, mut request: Request) -> Result<Request, StoreError> {
        request.updated_at = Utc::now();
        self.write(|m| m.requests.insert(request.id.clone(), request.clone()));
        Ok(request)
    }

    async fn get_request(&self, id: &str) -> Result<Option<Request>, StoreError> {
        Ok(self.read(|m| m.requests.get(id).cloned()))
    }

    async fn list_requests(&self) -> Result<Vec<Request>, StoreError> {
        let mut out: Vec<Request> = self.read(|m| m.requests.values().cloned().collect());
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn delete_request(&self, id: &str) -> Result<(), StoreError> {
        self.write(|m| m.requests.remove(id));
        Ok(())
    }

    async fn save_response(&self, response: &Response) -> Result<(), StoreError> {
        self.write(|m| {
            if m.responses.contains_key(&response.id) {
                return Err(StoreError::DuplicateResponse(response.id.clone()));
            }
            m.responses.insert(response.id.clone(), response.clone());
            Ok(())
        })
    }

    async fn responses_for_request(&self, request_id: &str) -> Result<Vec<Response>, StoreError> {
        let mut out: Vec<Response> = self.read(|m| {
            m.responses
                .values()
                .filter(|r| r.request_id == request_id)
                .cloned()
                .collect()
        });
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn save_collection(&self, mut collection: Collection) -> Result<Collection, StoreError> {
        collection.updated_at = Utc::now();
        self.write(|m| m.collections.insert(collection.id.clone(), collection.clone()));
        Ok(collection)
    }

    async fn get_collection(&self, id: &str) -> Result<Option<Collection>, StoreError> {
        Ok(self.read(|m| m.collections.get(id).cloned()))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError> {
        let mut out: Vec<Collection> = self.read(|m| m.collections.values().cloned().collect());
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn delete_collection(&self, id: &str) -> Result<(), StoreError> {
        self.write(|m| m.collections.remove(id));
        Ok(())
    }

    async fn save_environment(&self, mut environment: Environment) -> Result<Environment, StoreError> {
        environment.updated_at = Utc::now();
        self.write(|m| m.environments.insert(environment.id.clone(), environment.clone()));
        Ok(environment)
    }

    async fn get_environment(&self, id: &str) -> Result<Option<Environment>, StoreError> {
        Ok(self.read(|m| m.environments.get(id).cloned()))
    }

    async fn list_environments(&self) -> Result<Vec<Environment>, StoreError> {
        let mut out: Vec<Environment> = self.read(|m| m.environments.values().cloned().collect());
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    async fn delete_environment(&self, id: &str) -> Result<(), StoreError> {
        self.write(|m| m.environments.remove(id));
        Ok(())
    }
}
