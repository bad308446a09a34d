use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of executions in flight. Closing it turns every
/// pending and future `acquire` into an error.
pub struct ConcurrencyLimits {
    global: Arc<Semaphore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("executor is closed")]
pub struct Closed;

impl ConcurrencyLimits {
    pub fn new(limit: usize) -> Self {
        Self {
            global: Arc::new(Semaphore::new(limit.max(1))),
        }
    }

    pub async fn acquire(&self) -> Result<ConcurrencyPermit, Closed> {
        let permit = self
            .global
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Closed)?;
        Ok(ConcurrencyPermit { _global: permit })
    }

    pub fn available(&self) -> usize {
        self.global.available_permits()
    }

    pub fn close(&self) {
        self.global.close();
    }

    pub fn is_closed(&self) -> bool {
        self.global.is_closed()
    }
}

pub struct ConcurrencyPermit {
    _global: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn permits_are_returned_on_drop() {
        let limits = ConcurrencyLimits::new(2);
        let first = limits.acquire().await.unwrap();
        let _second = limits.acquire().await.unwrap();
        assert_eq!(limits.available(), 0);
        drop(first);
        assert_eq!(limits.available(), 1);
    }

    #[tokio::test]
    async fn closed_limits_reject_acquire() {
        let limits = ConcurrencyLimits::new(0);
        assert_eq!(limits.available(), 1);
        limits.close();
        assert!(limits.is_closed());
        assert!(limits.acquire().await.is_err());
    }
}
