use std::collections::BTreeMap;

use litepost_core::{AuthStrategy, Request};

use crate::executor::auth::auth_headers;
use crate::executor::http::{HttpError, HttpRequestParts};

/// Turn the working copy into wire parts. Auth headers override same-named
/// request headers; the body kind's content type is only added when the
/// request does not set one.
pub(crate) fn build_request(
    req: &Request,
    auth: Option<&AuthStrategy>,
) -> Result<HttpRequestParts, HttpError> {
    let method = req.method.trim().to_ascii_uppercase();
    if method.is_empty() {
        return Err(HttpError::InvalidRequest("empty method".to_string()));
    }

    let mut url = url::Url::parse(req.url.trim())
        .map_err(|e| HttpError::InvalidRequest(format!("invalid url {:?}: {e}", req.url)))?;
    if !req.query_params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &req.query_params {
            pairs.append_pair(k, v);
        }
    }

    let mut headers: BTreeMap<String, String> = req.headers.clone();
    if let Some(strategy) = auth {
        for (name, value) in auth_headers(strategy) {
            headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
            headers.insert(name, value);
        }
    }

    let mut body = Vec::new();
    if let Some(b) = &req.body {
        let has_content_type = headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("content-type"));
        if let (Some(ct), false) = (b.kind.content_type(), has_content_type) {
            headers.insert("Content-Type".to_string(), ct.to_string());
        }
        body = b.content.clone().into_bytes();
    }

    Ok(HttpRequestParts {
        method,
        url,
        headers,
        body,
    })
}
