use chrono::{DateTime, Utc};

use crate::types::{new_id, AuthConfig, StringMap};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Request {
    #[serde(default = "new_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub headers: StringMap,

    #[serde(default)]
    pub query_params: StringMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_script: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_script: Option<String>,

    #[serde(default)]
    pub tests: Vec<Test>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Request {
    /// A blank `GET` request with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            method: default_method(),
            url: String::new(),
            headers: StringMap::new(),
            query_params: StringMap::new(),
            body: None,
            auth: None,
            pre_script: None,
            post_script: None,
            tests: Vec::new(),
            collection_id: None,
            folder_id: None,
            environment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Environment id, treating an empty string as unset.
    pub fn environment(&self) -> Option<&str> {
        self.environment_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn pre_script(&self) -> Option<&str> {
        non_blank(self.pre_script.as_deref())
    }

    pub fn post_script(&self) -> Option<&str> {
        non_blank(self.post_script.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestBody {
    #[serde(alias = "type")]
    pub kind: BodyKind,
    #[serde(default)]
    pub content: String,
}

impl RequestBody {
    pub fn new(kind: BodyKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Json,
    Xml,
    Form,
    Raw,
}

impl BodyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Json => "json",
            BodyKind::Xml => "xml",
            BodyKind::Form => "form",
            BodyKind::Raw => "raw",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(BodyKind::Json),
            "xml" => Some(BodyKind::Xml),
            "form" => Some(BodyKind::Form),
            "raw" => Some(BodyKind::Raw),
            _ => None,
        }
    }

    /// `Content-Type` implied by the body kind; raw bodies leave it unset.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            BodyKind::Json => Some("application/json"),
            BodyKind::Xml => Some("application/xml"),
            BodyKind::Form => Some("application/x-www-form-urlencoded"),
            BodyKind::Raw => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Test {
    pub name: String,
    pub script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl Test {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            expected: None,
        }
    }
}
