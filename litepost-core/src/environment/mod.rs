mod defaults;
mod registry;

pub use defaults::{builtin_environments, DEFAULT_ENVIRONMENT_ID};
pub use registry::EnvironmentRegistry;
