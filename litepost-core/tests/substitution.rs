use litepost_core::template::{placeholders, substitute, substitute_request};
use litepost_core::types::StringMap;
use litepost_core::{AuthConfig, BodyKind, EnvironmentRegistry, Request, RequestBody, SubstitutionError};

fn vars(pairs: &[(&str, &str)]) -> StringMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn text_without_placeholders_is_unchanged() {
    let v = vars(&[("a", "1")]);
    for s in ["", "plain", "{single}", "{ {a} }", "}}{{", "https://x/{id}"] {
        assert_eq!(substitute(s, &v), s);
    }
}

#[test]
fn known_variable_is_replaced_exactly_once() {
    let v = vars(&[("host", "example.com"), ("loop", "{{host}}")]);
    assert_eq!(substitute("https://{{host}}/x", &v), "https://example.com/x");
    // value containing placeholder syntax is not expanded again
    assert_eq!(substitute("{{loop}}", &v), "{{host}}");
}

#[test]
fn unknown_variable_is_left_byte_identical() {
    let v = vars(&[("a", "1")]);
    assert_eq!(substitute("{{a}}-{{unknown}}-{{ a }}", &v), "1-{{unknown}}-{{ a }}");
}

#[test]
fn adjacent_and_repeated_placeholders() {
    let v = vars(&[("a", "x"), ("b", "y")]);
    assert_eq!(substitute("{{a}}{{b}}{{a}}", &v), "xyx");
    assert_eq!(placeholders("{{a}}{{b}}{{a}}"), vec!["a", "b", "a"]);
}

#[test]
fn scenario_url_and_bearer_header() {
    let registry = EnvironmentRegistry::empty();
    registry.set(
        litepost_core::Environment::new("test", "Test")
            .with_variable("base_url", "https://api.example.com")
            .with_variable("api_key", "k1"),
    );

    let mut req = Request::new("users");
    req.url = "{{base_url}}/users".to_string();
    req.headers
        .insert("Authorization".to_string(), "Bearer {{api_key}}".to_string());

    registry.substitute_request(&mut req, "test").unwrap();
    assert_eq!(req.url, "https://api.example.com/users");
    assert_eq!(req.headers["Authorization"], "Bearer k1");
}

#[test]
fn every_templated_field_is_rewritten() {
    let v = vars(&[("id", "42"), ("user", "alice"), ("pw", "secret")]);
    let mut req = Request::new("all fields");
    req.url = "https://h/items/{{id}}".to_string();
    req.query_params.insert("q".to_string(), "{{id}}".to_string());
    req.headers.insert("X-User".to_string(), "{{user}}".to_string());
    req.body = Some(RequestBody::new(BodyKind::Raw, "id={{id}}"));
    req.auth = Some(
        AuthConfig::new("basic")
            .with("username", "{{user}}")
            .with("password", "{{pw}}"),
    );

    substitute_request(&mut req, &v).unwrap();

    assert_eq!(req.url, "https://h/items/42");
    assert_eq!(req.query_params["q"], "42");
    assert_eq!(req.headers["X-User"], "alice");
    assert_eq!(req.body.as_ref().unwrap().content, "id=42");
    let auth = req.auth.as_ref().unwrap();
    assert_eq!(auth.config["username"], "alice");
    assert_eq!(auth.config["password"], "secret");
}

#[test]
fn line_break_injected_into_header_is_rejected() {
    let v = vars(&[("evil", "x\r\nX-Injected: 1")]);
    let mut req = Request::new("inject");
    req.headers.insert("X-Trace".to_string(), "{{evil}}".to_string());

    let err = substitute_request(&mut req, &v).unwrap_err();
    assert_eq!(
        err,
        SubstitutionError::InvalidHeaderValue {
            field: "header X-Trace".to_string()
        }
    );
}

#[test]
fn line_break_in_body_is_allowed() {
    let v = vars(&[("lines", "a\nb")]);
    let mut req = Request::new("body");
    req.body = Some(RequestBody::new(BodyKind::Raw, "{{lines}}"));
    substitute_request(&mut req, &v).unwrap();
    assert_eq!(req.body.unwrap().content, "a\nb");
}
