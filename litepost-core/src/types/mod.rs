mod auth;
mod collection;
mod common;
mod environment;
mod request;
mod response;

pub use auth::{AuthConfig, AuthKind, AuthStrategy};
pub use collection::{Collection, CollectionSummary, Folder};
pub use common::{duration_ms, new_id, StringMap};
pub use environment::Environment;
pub use request::{BodyKind, Request, RequestBody, Test};
pub use response::Response;
