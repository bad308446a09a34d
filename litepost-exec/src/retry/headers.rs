use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use httpdate::parse_http_date;

/// Delay requested by a `Retry-After` header, either delta seconds or an
/// HTTP-date. Dates in the past yield `None`.
pub fn parse_retry_after(headers: &BTreeMap<String, String>, now: SystemTime) -> Option<Duration> {
    let value = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("retry-after"))
        .map(|(_, v)| v.trim())?;

    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = parse_http_date(value).ok()?;
    at.duration_since(now).ok()
}
