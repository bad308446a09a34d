mod collections;
mod environments;
mod migrate;
mod requests;
mod responses;
mod store;

pub use migrate::run_migrations;
pub use store::SqliteStore;
