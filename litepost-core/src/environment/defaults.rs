use crate::types::Environment;

pub const DEFAULT_ENVIRONMENT_ID: &str = "default";

/// Environments every registry starts with.
pub fn builtin_environments() -> Vec<Environment> {
    vec![
        builtin(
            DEFAULT_ENVIRONMENT_ID,
            "Default Environment",
            "https://api.example.com",
            "your-api-key-here",
            "30",
        ),
        builtin(
            "development",
            "Development Environment",
            "http://localhost:3000",
            "dev-api-key",
            "10",
        ),
        builtin(
            "production",
            "Production Environment",
            "https://api.production.com",
            "prod-api-key",
            "30",
        ),
    ]
}

fn builtin(id: &str, name: &str, base_url: &str, api_key: &str, timeout: &str) -> Environment {
    Environment::new(id, name)
        .with_variable("base_url", base_url)
        .with_variable("api_key", api_key)
        .with_variable("timeout", timeout)
}
