//! Minimal `Set-Cookie` inspection for session tokens

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, SET_COOKIE};

/// A cookie pulled from a `Set-Cookie` response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
}

/// Find the cookie called `name` among the response's `Set-Cookie` headers.
pub fn find_cookie(headers: &HeaderMap, name: &str) -> Option<SessionCookie> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|line| parse_set_cookie(line, name))
}

fn parse_set_cookie(line: &str, name: &str) -> Option<SessionCookie> {
    let mut parts = line.split(';').map(str::trim);
    let (key, value) = parts.next()?.split_once('=')?;
    if key != name || value.is_empty() {
        return None;
    }

    let expires = parts
        .filter_map(|attribute| attribute.split_once('='))
        .find(|(key, _)| key.eq_ignore_ascii_case("expires"))
        .and_then(|(_, raw)| DateTime::parse_from_rfc2822(raw).ok())
        .map(|at| at.with_timezone(&Utc));

    Some(SessionCookie { value: value.to_string(), expires })
}
