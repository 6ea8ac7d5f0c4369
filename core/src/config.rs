//! Transcoder configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! gives the stock `curl` behaviour.

use serde::{Deserialize, Serialize};

use crate::error::TranscodeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderConfig {
    /// Leading keyword a command must start with, and the one serialize emits.
    pub command: String,
    /// Scheme prepended to URLs that have none.
    pub default_scheme: String,
    /// Header name serialize uses to present `api_key` auth.
    pub api_key_header: String,
    /// Where `prepare` puts an `api_key` credential.
    pub api_key_placement: ApiKeyPlacement,
    /// Render one flag per line with shell line continuations.
    pub multiline: bool,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            command: "curl".to_string(),
            default_scheme: "https".to_string(),
            api_key_header: "X-API-Key".to_string(),
            api_key_placement: ApiKeyPlacement::default(),
            multiline: false,
        }
    }
}

impl TranscoderConfig {
    pub fn from_json(raw: &str) -> Result<Self, TranscodeError> {
        serde_json::from_str(raw).map_err(|e| TranscodeError::Serialization(e.to_string()))
    }
}

/// Placement of an API key on the outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "in", rename_all = "snake_case")]
pub enum ApiKeyPlacement {
    Header { name: String },
    Query { name: String },
}

impl Default for ApiKeyPlacement {
    fn default() -> Self {
        ApiKeyPlacement::Header {
            name: "X-API-Key".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = TranscoderConfig::from_json("{}").unwrap();
        assert_eq!(config, TranscoderConfig::default());
        assert_eq!(config.command, "curl");
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = TranscoderConfig::from_json(
            r#"{"multiline":true,"api_key_placement":{"in":"query","name":"key"}}"#,
        )
        .unwrap();
        assert!(config.multiline);
        assert_eq!(config.default_scheme, "https");
        assert_eq!(
            config.api_key_placement,
            ApiKeyPlacement::Query {
                name: "key".to_string()
            }
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = TranscoderConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, TranscodeError::Serialization(_)));
    }
}
