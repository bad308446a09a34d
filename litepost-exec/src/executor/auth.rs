use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use litepost_core::AuthStrategy;

/// Header(s) carrying the credentials of `strategy`.
pub(crate) fn auth_headers(strategy: &AuthStrategy) -> Vec<(String, String)> {
    let authorization = match strategy {
        AuthStrategy::Basic { username, password }
        | AuthStrategy::Digest { username, password } => basic(username, password),
        AuthStrategy::Bearer { token } => format!("Bearer {token}"),
        AuthStrategy::OAuth2 {
            access_token,
            token_type,
        } => format!("{} {access_token}", token_type.as_deref().unwrap_or("Bearer")),
        AuthStrategy::Hawk { id, key: _ } => hawk(id),
        AuthStrategy::ApiKey { header, value } => return vec![(header.clone(), value.clone())],
    };
    vec![("Authorization".to_string(), authorization)]
}

fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

// Unsigned: no mac is computed, the key stays local.
fn hawk(id: &str) -> String {
    let ts = chrono::Utc::now().timestamp();
    let nonce: String = std::iter::repeat_with(fastrand::alphanumeric).take(8).collect();
    format!(r#"Hawk id="{id}", ts="{ts}", nonce="{nonce}""#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_encodes_credentials() {
        let headers = auth_headers(&AuthStrategy::Basic {
            username: "user".into(),
            password: "pass".into(),
        });
        assert_eq!(
            headers,
            vec![("Authorization".to_string(), "Basic dXNlcjpwYXNz".to_string())]
        );
    }

    #[test]
    fn hawk_never_sends_the_key() {
        let headers = auth_headers(&AuthStrategy::Hawk {
            id: "dh37fgj492je".into(),
            key: "werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn".into(),
        });
        let value = &headers[0].1;
        assert!(value.starts_with(r#"Hawk id="dh37fgj492je", ts=""#));
        assert!(value.contains("nonce=\""));
        assert!(!value.contains("werxhqb98"));
    }
}
