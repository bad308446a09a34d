use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("environment not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    /// A variable value introduced a line break into a header or auth value.
    #[error("substitution produced an invalid value for {field} (line breaks are not allowed)")]
    InvalidHeaderValue { field: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{key} required for {kind} auth")]
    Missing { kind: &'static str, key: &'static str },
    #[error("unsupported authentication type: {0}")]
    Unsupported(String),
}
