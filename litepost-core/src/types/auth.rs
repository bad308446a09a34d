use crate::error::AuthError;
use crate::types::StringMap;

/// Stored authentication settings: a kind plus a free-form config map.
///
/// Kept loosely typed so variable substitution and scripts can rewrite any
/// value; [`AuthConfig::strategy`] turns it into a validated [`AuthStrategy`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthConfig {
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub config: StringMap,
}

impl AuthConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            config: StringMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn strategy(&self) -> Result<AuthStrategy, AuthError> {
        let kind = AuthKind::parse(&self.kind)
            .ok_or_else(|| AuthError::Unsupported(self.kind.clone()))?;
        let name = kind.as_str();
        let get = |key: &'static str| {
            self.config
                .get(key)
                .cloned()
                .ok_or(AuthError::Missing { kind: name, key })
        };
        let strategy = match kind {
            AuthKind::Basic => AuthStrategy::Basic {
                username: get("username")?,
                password: get("password")?,
            },
            AuthKind::Bearer => AuthStrategy::Bearer { token: get("token")? },
            AuthKind::ApiKey => AuthStrategy::ApiKey {
                value: get("value")?,
                header: self
                    .config
                    .get("header")
                    .filter(|h| !h.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string()),
            },
            AuthKind::OAuth2 => AuthStrategy::OAuth2 {
                access_token: get("access_token")?,
                token_type: self
                    .config
                    .get("token_type")
                    .filter(|t| !t.trim().is_empty())
                    .cloned(),
            },
            AuthKind::Digest => AuthStrategy::Digest {
                username: get("username")?,
                password: get("password")?,
            },
            AuthKind::Hawk => AuthStrategy::Hawk {
                id: get("id")?,
                key: get("key")?,
            },
        };
        Ok(strategy)
    }
}

pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Basic,
    Bearer,
    ApiKey,
    OAuth2,
    Digest,
    Hawk,
}

impl AuthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthKind::Basic => "basic",
            AuthKind::Bearer => "bearer",
            AuthKind::ApiKey => "api_key",
            AuthKind::OAuth2 => "oauth2",
            AuthKind::Digest => "digest",
            AuthKind::Hawk => "hawk",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(AuthKind::Basic),
            "bearer" => Some(AuthKind::Bearer),
            "api_key" | "apikey" => Some(AuthKind::ApiKey),
            "oauth2" => Some(AuthKind::OAuth2),
            "digest" => Some(AuthKind::Digest),
            "hawk" => Some(AuthKind::Hawk),
            _ => None,
        }
    }
}

/// Validated authentication settings, one variant per supported scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    Basic { username: String, password: String },
    Bearer { token: String },
    ApiKey { header: String, value: String },
    OAuth2 { access_token: String, token_type: Option<String> },
    /// Sent as Basic credentials; the digest challenge/response is not implemented.
    Digest { username: String, password: String },
    /// Sent as an unsigned Hawk header; no MAC is computed.
    Hawk { id: String, key: String },
}

impl AuthStrategy {
    pub fn kind(&self) -> AuthKind {
        match self {
            AuthStrategy::Basic { .. } => AuthKind::Basic,
            AuthStrategy::Bearer { .. } => AuthKind::Bearer,
            AuthStrategy::ApiKey { .. } => AuthKind::ApiKey,
            AuthStrategy::OAuth2 { .. } => AuthKind::OAuth2,
            AuthStrategy::Digest { .. } => AuthKind::Digest,
            AuthStrategy::Hawk { .. } => AuthKind::Hawk,
        }
    }

    pub fn is_approximation(&self) -> bool {
        matches!(self, AuthStrategy::Digest { .. } | AuthStrategy::Hawk { .. })
    }
}
