#![forbid(unsafe_code)]

pub mod environment;
pub mod error;
pub mod template;
pub mod types;

pub use crate::environment::EnvironmentRegistry;
pub use crate::error::{AuthError, EnvironmentError, SubstitutionError};
pub use crate::template::{substitute, substitute_request};
pub use crate::types::{
    AuthConfig, AuthKind, AuthStrategy, BodyKind, Collection, Environment, Folder, Request,
    RequestBody, Response, Test,
};
