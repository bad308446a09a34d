use std::time::Duration;

use litepost_core::types::{AuthKind, StringMap};
use litepost_core::{AuthConfig, AuthError, AuthStrategy, BodyKind, Collection, Folder, Request, Response};

#[test]
fn request_json_fills_defaults() {
    let req: Request = serde_json::from_str(r#"{"name":"ping","url":"https://x"}"#).unwrap();
    assert_eq!(req.method, "GET");
    assert!(!req.id.is_empty());
    assert!(req.headers.is_empty());
    assert!(req.tests.is_empty());
    assert_eq!(req.environment(), None);
}

#[test]
fn request_yaml_with_body_and_auth() {
    let yaml = r#"
id: r1
name: create
method: POST
url: "{{base_url}}/items"
environment_id: development
body:
  type: json
  content: '{"a":1}'
auth:
  kind: bearer
  config:
    token: "{{api_key}}"
tests:
  - name: ok
    script: pm.test("ok", response.statusCode == 201);
"#;
    let req: Request = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(req.environment(), Some("development"));
    assert_eq!(req.body.as_ref().unwrap().kind, BodyKind::Json);
    assert_eq!(req.auth.as_ref().unwrap().kind, "bearer");
    assert_eq!(req.tests.len(), 1);
}

#[test]
fn empty_environment_id_is_unset() {
    let mut req = Request::new("r");
    req.environment_id = Some(String::new());
    assert_eq!(req.environment(), None);
    req.pre_script = Some("  \n".to_string());
    assert_eq!(req.pre_script(), None);
}

#[test]
fn body_kind_content_types() {
    assert_eq!(BodyKind::Json.content_type(), Some("application/json"));
    assert_eq!(BodyKind::Xml.content_type(), Some("application/xml"));
    assert_eq!(
        BodyKind::Form.content_type(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(BodyKind::Raw.content_type(), None);
}

#[test]
fn basic_auth_requires_password() {
    let err = AuthConfig::new("basic")
        .with("username", "u")
        .strategy()
        .unwrap_err();
    assert_eq!(err, AuthError::Missing { kind: "basic", key: "password" });
    assert_eq!(err.to_string(), "password required for basic auth");
}

#[test]
fn api_key_defaults_header() {
    let s = AuthConfig::new("api_key").with("value", "k").strategy().unwrap();
    assert_eq!(
        s,
        AuthStrategy::ApiKey {
            header: "X-API-Key".to_string(),
            value: "k".to_string()
        }
    );
}

#[test]
fn oauth2_token_type_is_optional() {
    let s = AuthConfig::new("oauth2")
        .with("access_token", "t")
        .with("token_type", "")
        .strategy()
        .unwrap();
    assert_eq!(
        s,
        AuthStrategy::OAuth2 {
            access_token: "t".to_string(),
            token_type: None
        }
    );
}

#[test]
fn unknown_auth_kind_is_unsupported() {
    let err = AuthConfig::new("kerberos").strategy().unwrap_err();
    assert_eq!(err, AuthError::Unsupported("kerberos".to_string()));
}

#[test]
fn approximated_schemes_are_flagged() {
    let digest = AuthConfig::new("digest")
        .with("username", "u")
        .with("password", "p")
        .strategy()
        .unwrap();
    assert!(digest.is_approximation());
    assert_eq!(digest.kind(), AuthKind::Digest);
    let hawk = AuthConfig::new("hawk").with("id", "i").strategy().unwrap_err();
    assert_eq!(hawk, AuthError::Missing { kind: "hawk", key: "key" });
}

#[test]
fn response_serializes_duration_in_millis() {
    let resp = Response::new("r1", 200, StringMap::new(), b"hello", Duration::from_millis(1500));
    assert_eq!(resp.size, 5);
    assert_eq!(resp.body, "hello");
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["duration_ms"], 1500);
    assert_eq!(json["status_code"], 200);
    let back: Response = serde_json::from_value(json).unwrap();
    assert_eq!(back.duration, Duration::from_millis(1500));
}

#[test]
fn response_header_lookup_is_case_insensitive() {
    let mut headers = StringMap::new();
    headers.insert("content-type".to_string(), "text/plain".to_string());
    let resp = Response::new("r1", 404, headers, b"", Duration::ZERO);
    assert_eq!(resp.header("Content-Type"), Some("text/plain"));
    assert!(!resp.is_success());
}

#[test]
fn collection_summary_counts_nested_folders() {
    let mut col = Collection::new("api");
    col.requests.push(Request::new("a"));
    col.folders.push(Folder {
        id: "f1".to_string(),
        name: "users".to_string(),
        requests: vec![Request::new("b"), Request::new("c")],
        folders: vec![Folder {
            id: "f2".to_string(),
            name: "admin".to_string(),
            requests: vec![Request::new("d")],
            folders: vec![],
        }],
    });
    let summary = col.summary();
    assert_eq!(summary.request_count, 4);
    assert_eq!(summary.folder_count, 2);
}
