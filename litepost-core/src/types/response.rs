use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::types::{duration_ms, new_id, StringMap};

/// Outcome of one network call. Each execution creates a new one; responses
/// are never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Response {
    pub id: String,
    pub request_id: String,
    pub status_code: u16,
    #[serde(default)]
    pub headers: StringMap,
    #[serde(default)]
    pub body: String,
    pub size: u64,
    /// Time taken by the network attempt that produced this response.
    /// Earlier retried attempts and backoff are not included.
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

impl Response {
    pub fn new(
        request_id: impl Into<String>,
        status_code: u16,
        headers: StringMap,
        body: &[u8],
        duration: Duration,
    ) -> Self {
        Self {
            id: new_id(),
            request_id: request_id.into(),
            status_code,
            headers,
            body: String::from_utf8_lossy(body).into_owned(),
            size: body.len() as u64,
            duration,
            created_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
