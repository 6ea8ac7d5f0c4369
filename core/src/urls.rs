//! URL normalization and query-string helpers shared by parse, serialize and
//! prepare.
//!
//! The descriptor keeps the URL as the user wrote it (plus a scheme when one
//! was missing). `url::Url` is only used to validate and to read the query;
//! its re-serialized form never replaces what the user wrote.

use url::form_urlencoded;
use url::Url;

/// Trim, drop one layer of wrapping quotes, and prepend `scheme://` when the
/// text has no scheme of its own.
pub(crate) fn normalize_url(raw: &str, default_scheme: &str) -> String {
    let trimmed = strip_outer_quotes(raw.trim()).trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        format!("{default_scheme}://{rest}")
    } else {
        format!("{default_scheme}://{trimmed}")
    }
}

/// `Err` carries the reason the URL is structurally invalid.
pub(crate) fn validate_url(url: &str) -> Result<(), String> {
    Url::parse(url).map(|_| ()).map_err(|e| e.to_string())
}

fn has_scheme(text: &str) -> bool {
    let Some((scheme, _)) = text.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Remove a single layer of matching `'` or `"` around `text`.
pub(crate) fn strip_outer_quotes(text: &str) -> &str {
    for q in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(q) && text.ends_with(q) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Decoded `(key, value)` pairs of the URL's query string, in order.
///
/// Falls back to splitting on `?` for URLs that `url::Url` rejects, such as
/// templated ones.
pub(crate) fn query_pairs(url: &str) -> Vec<(String, String)> {
    if let Ok(parsed) = Url::parse(url) {
        return parsed.query_pairs().into_owned().collect();
    }
    let Some((_, after)) = url.split_once('?') else {
        return Vec::new();
    };
    let query = after.split_once('#').map_or(after, |(q, _)| q);
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// Append already-decoded pairs to the URL, percent-encoded, before any
/// fragment.
pub(crate) fn append_query(url: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url.to_string();
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    append_raw_query(url, &encoded)
}

/// Append an already-encoded query fragment.
pub(crate) fn append_raw_query(url: &str, encoded: &str) -> String {
    if encoded.is_empty() {
        return url.to_string();
    }
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let separator = if !base.contains('?') {
        "?"
    } else if base.ends_with('?') || base.ends_with('&') {
        ""
    } else {
        "&"
    };
    match fragment {
        Some(fragment) => format!("{base}{separator}{encoded}#{fragment}"),
        None => format!("{base}{separator}{encoded}"),
    }
}

/// The URL with every pair from `params` that it does not already carry.
pub(crate) fn with_missing_params(url: &str, params: &[(String, String)]) -> String {
    let existing = query_pairs(url);
    let missing: Vec<(String, String)> = params
        .iter()
        .filter(|pair| !existing.contains(pair))
        .cloned()
        .collect();
    append_query(url, &missing)
}
