//! `{{name}}` placeholder substitution.
//!
//! Substitution is a single pass: a value that itself contains `{{...}}` is
//! inserted verbatim and never expanded again. Unknown names are left as-is.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::SubstitutionError;
use crate::types::{Request, StringMap};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("valid regex"));

/// Replace every `{{name}}` whose name is a key of `vars`.
pub fn substitute<'a>(text: &'a str, vars: &StringMap) -> Cow<'a, str> {
    if !text.contains("{{") {
        return Cow::Borrowed(text);
    }
    PLACEHOLDER_RE.replace_all(text, |caps: &Captures<'_>| match vars.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
    })
}

/// Placeholder names in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Placeholder names in `text` that `vars` cannot resolve.
pub fn unresolved<'a>(text: &'a str, vars: &StringMap) -> Vec<&'a str> {
    placeholders(text)
        .into_iter()
        .filter(|name| !vars.contains_key(*name))
        .collect()
}

/// Rewrite URL, header values, query values, body content and auth config
/// values of `req` in place.
pub fn substitute_request(req: &mut Request, vars: &StringMap) -> Result<(), SubstitutionError> {
    req.url = substitute(&req.url, vars).into_owned();

    for (name, value) in req.headers.iter_mut() {
        *value = substitute_header_value(value, vars, || format!("header {name}"))?;
    }

    for value in req.query_params.values_mut() {
        *value = substitute(value, vars).into_owned();
    }

    if let Some(body) = req.body.as_mut() {
        body.content = substitute(&body.content, vars).into_owned();
    }

    if let Some(auth) = req.auth.as_mut() {
        for (key, value) in auth.config.iter_mut() {
            *value = substitute_header_value(value, vars, || format!("auth {key}"))?;
        }
    }

    Ok(())
}

fn substitute_header_value(
    value: &str,
    vars: &StringMap,
    field: impl FnOnce() -> String,
) -> Result<String, SubstitutionError> {
    let out = substitute(value, vars);
    if has_line_break(&out) && !has_line_break(value) {
        return Err(SubstitutionError::InvalidHeaderValue { field: field() });
    }
    Ok(out.into_owned())
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> StringMap {
        [("a".to_string(), "1".to_string())].into_iter().collect()
    }

    #[test]
    fn borrowed_when_no_placeholder() {
        assert!(matches!(substitute("plain", &vars()), Cow::Borrowed("plain")));
    }

    #[test]
    fn empty_braces_are_not_a_placeholder() {
        assert_eq!(substitute("{{}}", &vars()), "{{}}");
        assert!(placeholders("{{}}").is_empty());
    }

    #[test]
    fn unresolved_lists_missing_names() {
        assert_eq!(unresolved("{{a}}/{{b}}/{{c}}", &vars()), vec!["b", "c"]);
    }
}
