//! `RequestDescriptor` → `HttpRequest`: what an HTTP client actually sends.
//!
//! Auth variants become concrete headers (or a query parameter for API keys
//! placed in the query), query params missing from the URL are appended and
//! the body is rendered to text. An `Authorization` header already on the
//! descriptor always wins over the auth variant.

use url::form_urlencoded;

use crate::config::{ApiKeyPlacement, TranscoderConfig};
use crate::error::TranscodeError;
use crate::heuristics;
use crate::http::HttpRequest;
use crate::types::{form_value, Auth, Body, RequestDescriptor};
use crate::urls;

pub(crate) fn prepare(
    descriptor: &RequestDescriptor,
    config: &TranscoderConfig,
) -> Result<HttpRequest, TranscodeError> {
    if descriptor.url.trim().is_empty() {
        return Err(TranscodeError::MissingUrl);
    }

    let mut url = urls::with_missing_params(&descriptor.url, &descriptor.query_params);
    let mut headers = descriptor.headers.clone();

    if !descriptor.has_header("authorization") {
        match &descriptor.auth {
            Auth::None => {}
            Auth::Basic { username, password } => {
                let encoded = heuristics::encode_basic(username, password);
                headers.push(("Authorization".to_string(), format!("Basic {encoded}")));
            }
            Auth::Bearer { token } | Auth::Jwt { token } => {
                headers.push(("Authorization".to_string(), format!("Bearer {token}")));
            }
            Auth::ApiKey { token } => match &config.api_key_placement {
                ApiKeyPlacement::Header { name } => {
                    if !descriptor.has_header(name) {
                        headers.push((name.clone(), token.clone()));
                    }
                }
                ApiKeyPlacement::Query { name } => {
                    if !urls::query_pairs(&url).iter().any(|(k, _)| k == name) {
                        url = urls::append_query(&url, &[(name.clone(), token.clone())]);
                    }
                }
            },
        }
    }

    let body = match &descriptor.body {
        None => None,
        Some(Body::Object(map)) if descriptor.is_form_url_encoded => Some(
            form_urlencoded::Serializer::new(String::new())
                .extend_pairs(map.iter().map(|(k, v)| (k.as_str(), form_value(v))))
                .finish(),
        ),
        Some(Body::Object(map)) => Some(
            serde_json::to_string(map).map_err(|e| TranscodeError::Serialization(e.to_string()))?,
        ),
        Some(Body::Raw(text)) => Some(text.clone()),
    };

    if let Some(body) = &descriptor.body {
        if !descriptor.has_header("content-type") {
            let content_type = heuristics::infer_content_type(body, descriptor.is_form_url_encoded);
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
    }

    Ok(HttpRequest {
        method: descriptor.method,
        url,
        headers,
        body,
    })
}
