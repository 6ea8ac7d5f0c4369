//! The request descriptor: the structured form of an HTTP request that the
//! transcoder produces from a command and renders back into one.
//!
//! # Design
//! Field names serialize in camelCase (`queryParams`, `isFormUrlEncoded`) so
//! the JSON form matches what the surrounding forms and persistence layer
//! already store. Header and query pairs are ordered `Vec`s, not maps:
//! duplicates are legal in HTTP and order matters when a command is rendered
//! back for a human.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::HttpMethod;

/// Structured representation of a single HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// Source of truth for transport. Empty when the command had no URL.
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Read-shadow of the URL's query string, for display.
    pub query_params: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    pub is_form_url_encoded: bool,
    pub auth: Auth,
}

impl RequestDescriptor {
    /// First header whose name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Request body. Absent bodies are `None` on the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// Key/value body: a JSON object, or form pairs when the descriptor is
    /// form-urlencoded.
    Object(Map<String, Value>),
    /// Anything that did not parse into an object, kept verbatim.
    Raw(String),
}

/// Authentication scheme. Exactly one variant is active; a later signal in a
/// command replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Auth {
    #[default]
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
    /// A bearer token shaped like a JWT (three dot-separated segments).
    /// Transported exactly like `Bearer`.
    Jwt { token: String },
    ApiKey { token: String },
}

impl Auth {
    /// Classify a bearer credential: `Jwt` when it has exactly three
    /// non-empty dot-separated segments, `Bearer` otherwise.
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() == 3 && segments.iter().all(|s| !s.is_empty()) {
            Auth::Jwt { token }
        } else {
            Auth::Bearer { token }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Auth::None)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Auth::None => "none",
            Auth::Basic { .. } => "basic",
            Auth::Bearer { .. } => "bearer",
            Auth::Jwt { .. } => "jwt",
            Auth::ApiKey { .. } => "api_key",
        }
    }
}

/// String form of a body value when it is sent form-urlencoded.
pub(crate) fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
