//! Marshalling between the data model and script values.

use litepost_core::types::StringMap;
use litepost_core::{AuthConfig, BodyKind, Environment, Request, RequestBody, Response};
use rhai::{Dynamic, EvalAltResult, Map};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBinding<'a> {
    id: &'a str,
    name: &'a str,
    method: &'a str,
    url: &'a str,
    headers: &'a StringMap,
    query_params: &'a StringMap,
    body: Option<BodyBinding<'a>>,
    auth: Option<AuthBinding<'a>>,
}

#[derive(Serialize)]
struct BodyBinding<'a> {
    kind: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct AuthBinding<'a> {
    kind: &'a str,
    config: &'a StringMap,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBinding<'a> {
    id: &'a str,
    status_code: u16,
    headers: &'a StringMap,
    body: &'a str,
    /// Body parsed as JSON, unit when it is not JSON.
    json: Option<serde_json::Value>,
    size: u64,
    duration: u64,
    timestamp: String,
}

#[derive(Serialize)]
struct EnvironmentBinding<'a> {
    id: &'a str,
    name: &'a str,
    variables: &'a StringMap,
}

pub(crate) fn request(req: &Request) -> Result<Dynamic, Box<EvalAltResult>> {
    rhai::serde::to_dynamic(RequestBinding {
        id: &req.id,
        name: &req.name,
        method: &req.method,
        url: &req.url,
        headers: &req.headers,
        query_params: &req.query_params,
        body: req.body.as_ref().map(|b| BodyBinding {
            kind: b.kind.as_str(),
            content: &b.content,
        }),
        auth: req.auth.as_ref().map(|a| AuthBinding {
            kind: &a.kind,
            config: &a.config,
        }),
    })
}

pub(crate) fn response(resp: &Response) -> Result<Dynamic, Box<EvalAltResult>> {
    rhai::serde::to_dynamic(ResponseBinding {
        id: &resp.id,
        status_code: resp.status_code,
        headers: &resp.headers,
        body: &resp.body,
        json: serde_json::from_str(&resp.body).ok(),
        size: resp.size,
        duration: u64::try_from(resp.duration.as_millis()).unwrap_or(u64::MAX),
        timestamp: resp.created_at.to_rfc3339(),
    })
}

pub(crate) fn environment(env: Option<&Environment>) -> Result<Dynamic, Box<EvalAltResult>> {
    match env {
        Some(env) => rhai::serde::to_dynamic(EnvironmentBinding {
            id: &env.id,
            name: &env.name,
            variables: &env.variables,
        }),
        None => Ok(Dynamic::UNIT),
    }
}

/// Copy what a script did to its `request` binding back onto `req`.
///
/// Non-string values are stringified and unknown keys ignored. A binding
/// that is no longer a map leaves `req` untouched. Identity and name are
/// never taken back.
pub(crate) fn apply_request_changes(value: &Dynamic, req: &mut Request) {
    let Some(map) = value.read_lock::<Map>() else {
        return;
    };

    if let Some(method) = map.get("method").map(text) {
        if !method.trim().is_empty() {
            req.method = method;
        }
    }
    if let Some(url) = map.get("url") {
        req.url = text(url);
    }
    if let Some(headers) = map.get("headers").and_then(string_map) {
        req.headers = headers;
    }
    if let Some(query) = map.get("queryParams").and_then(string_map) {
        req.query_params = query;
    }
    if let Some(body) = map.get("body") {
        req.body = body_from(body, req.body.as_ref());
    }
    if let Some(auth) = map.get("auth") {
        req.auth = auth_from(auth);
    }
}

fn text(v: &Dynamic) -> String {
    if v.is_unit() {
        String::new()
    } else if v.is_string() {
        v.clone().into_string().unwrap_or_default()
    } else {
        v.to_string()
    }
}

fn string_map(v: &Dynamic) -> Option<StringMap> {
    let map = v.read_lock::<Map>()?;
    Some(map.iter().map(|(k, v)| (k.to_string(), text(v))).collect())
}

fn body_from(v: &Dynamic, previous: Option<&RequestBody>) -> Option<RequestBody> {
    let map = v.read_lock::<Map>()?;
    let kind = map
        .get("kind")
        .or_else(|| map.get("type"))
        .and_then(|k| BodyKind::parse(&text(k)))
        .or(previous.map(|b| b.kind))
        .unwrap_or(BodyKind::Raw);
    let content = map.get("content").map(text).unwrap_or_default();
    Some(RequestBody::new(kind, content))
}

fn auth_from(v: &Dynamic) -> Option<AuthConfig> {
    let map = v.read_lock::<Map>()?;
    let kind = map.get("kind").or_else(|| map.get("type")).map(text)?;
    let mut auth = AuthConfig::new(kind);
    if let Some(config) = map.get("config").and_then(string_map) {
        auth.config = config;
    }
    Some(auth)
}
