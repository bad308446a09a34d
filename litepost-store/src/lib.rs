#![forbid(unsafe_code)]

pub mod memory;
pub mod sqlite;
pub mod store;

pub use crate::memory::MemoryStore;
pub use crate::sqlite::{run_migrations, SqliteStore};
pub use crate::store::{Storage, StoreError};
