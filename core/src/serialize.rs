//! `RequestDescriptor` → command text.
//!
//! Rendering is total: `serialize` always returns something pasteable. If
//! the full rendering fails the output degrades to the method and URL, or to
//! the bare command keyword when there is no URL.

use crate::config::TranscoderConfig;
use crate::error::TranscodeError;
use crate::heuristics;
use crate::types::{form_value, Auth, Body, RequestDescriptor};
use crate::urls;

pub(crate) fn serialize(descriptor: &RequestDescriptor, config: &TranscoderConfig) -> String {
    match render(descriptor, config) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!(error = %e, "falling back to minimal command");
            minimal(descriptor, config)
        }
    }
}

fn minimal(descriptor: &RequestDescriptor, config: &TranscoderConfig) -> String {
    if descriptor.url.trim().is_empty() {
        return config.command.clone();
    }
    format!(
        "{} -X {} {}",
        config.command,
        descriptor.method,
        single_quote(&descriptor.url)
    )
}

fn render(descriptor: &RequestDescriptor, config: &TranscoderConfig) -> Result<String, TranscodeError> {
    if descriptor.url.trim().is_empty() {
        return Err(TranscodeError::MissingUrl);
    }

    let url = urls::with_missing_params(&descriptor.url, &descriptor.query_params);
    let mut parts = vec![
        config.command.clone(),
        format!("-X {}", descriptor.method),
        single_quote(&url),
    ];

    for (key, value) in &descriptor.headers {
        parts.push(header_flag(key, value));
    }

    if !descriptor.has_header("authorization") {
        match &descriptor.auth {
            Auth::None => {}
            Auth::Basic { username, password } => {
                parts.push(format!("-u {}", single_quote(&format!("{username}:{password}"))));
            }
            Auth::Bearer { token } | Auth::Jwt { token } => {
                parts.push(header_flag("Authorization", &format!("Bearer {token}")));
            }
            Auth::ApiKey { token } => {
                let already_sent = descriptor.has_header(&config.api_key_header)
                    || descriptor
                        .headers
                        .iter()
                        .any(|(k, _)| heuristics::is_api_key_header(k));
                if !already_sent {
                    parts.push(header_flag(&config.api_key_header, token));
                }
            }
        }
    }

    match &descriptor.body {
        None => {}
        Some(Body::Object(map)) if descriptor.is_form_url_encoded => {
            for (key, value) in map {
                let pair = format!("{key}={}", form_value(value));
                parts.push(format!("--data-urlencode {}", single_quote(&pair)));
            }
        }
        Some(Body::Object(map)) => {
            let json = serde_json::to_string(map)
                .map_err(|e| TranscodeError::Serialization(e.to_string()))?;
            parts.push(format!("-d {}", single_quote(&json)));
        }
        Some(Body::Raw(text)) => {
            // `-d @x` would be read as a file reference.
            let flag = if text.starts_with('@') { "--data-raw" } else { "-d" };
            parts.push(format!("{flag} {}", single_quote(text)));
        }
    }

    let separator = if config.multiline { " \\\n  " } else { " " };
    Ok(parts.join(separator))
}

fn header_flag(key: &str, value: &str) -> String {
    format!("-H {}", double_quote(&format!("{key}: {value}")))
}

/// Wrap in single quotes; an inner `'` closes the literal, emits an escaped
/// quote and reopens it.
pub(crate) fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// Wrap in double quotes, escaping the characters a shell still interprets
/// there.
pub(crate) fn double_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
