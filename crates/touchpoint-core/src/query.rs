//! Query string and URL helpers

use url::Url;

/// Raw query string of `url` (no leading `?`, no fragment).
///
/// Absolute URLs go through the `url` parser; anything it rejects is split
/// by hand so relative locations like `/landing?x=1` still work.
pub fn query_of(url: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(url) {
        return parsed.query().map(str::to_owned);
    }

    let (_, rest) = url.split_once('?')?;
    let query = rest.split('#').next().unwrap_or_default();
    Some(query.to_string())
}

/// Raw (still encoded) value of `key` in `query`.
///
/// Accepts the query with or without a leading `?`. A key without `=` is
/// present with an empty value. The first occurrence wins.
pub fn query_param<'a>(key: &str, query: &'a str) -> Option<&'a str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| match pair.split_once('=') {
            Some((name, value)) if name == key => Some(value),
            None if pair == key => Some(""),
            _ => None,
        })
}

/// Percent-decode a query value, keeping the raw text when it is not valid UTF-8
pub fn decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Host part of a referrer URL
pub fn host_of(referrer: &str) -> Option<String> {
    Url::parse(referrer)
        .ok()?
        .host_str()
        .map(|host| host.to_ascii_lowercase())
}
