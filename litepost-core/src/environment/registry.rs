use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::environment::builtin_environments;
use crate::error::{EnvironmentError, SubstitutionError};
use crate::template;
use crate::types::{Environment, Request};

/// In-memory environment id -> variables lookup.
///
/// Reads share a read lock; inserts and removals take the write lock. Entries
/// are handed out as `Arc`s so no lock is held once a lookup returns.
#[derive(Debug)]
pub struct EnvironmentRegistry {
    envs: RwLock<HashMap<String, Arc<Environment>>>,
}

impl Default for EnvironmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentRegistry {
    /// Registry seeded with the built-in environments.
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.extend(builtin_environments());
        registry
    }

    pub fn empty() -> Self {
        Self {
            envs: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace an environment, returning the previous entry.
    pub fn set(&self, env: Environment) -> Option<Arc<Environment>> {
        self.write().insert(env.id.clone(), Arc::new(env))
    }

    pub fn extend(&self, envs: impl IntoIterator<Item = Environment>) {
        let mut map = self.write();
        for env in envs {
            map.insert(env.id.clone(), Arc::new(env));
        }
    }

    pub fn get(&self, id: &str) -> Result<Arc<Environment>, EnvironmentError> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| EnvironmentError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Environment>> {
        self.write().remove(id)
    }

    /// All environments, ordered by id.
    pub fn list(&self) -> Vec<Arc<Environment>> {
        let mut envs: Vec<_> = self.read().values().cloned().collect();
        envs.sort_by(|a, b| a.id.cmp(&b.id));
        envs
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Substitute `{{name}}` placeholders in `text` with the variables of
    /// `env_id`. An empty id returns `text` unchanged.
    ///
    /// On lookup failure the caller still owns `text` and can fall back to it.
    pub fn substitute(&self, text: &str, env_id: &str) -> Result<String, EnvironmentError> {
        if env_id.is_empty() {
            return Ok(text.to_string());
        }
        let env = self.get(env_id)?;
        Ok(template::substitute(text, &env.variables).into_owned())
    }

    /// Substitute every templated field of `req` using `env_id`.
    pub fn substitute_request(
        &self,
        req: &mut Request,
        env_id: &str,
    ) -> Result<(), SubstitutionError> {
        if env_id.is_empty() {
            return Ok(());
        }
        let env = self.get(env_id)?;
        template::substitute_request(req, &env.variables)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Environment>>> {
        self.envs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Environment>>> {
        self.envs.write().unwrap_or_else(PoisonError::into_inner)
    }
}
