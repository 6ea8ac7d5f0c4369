//! Stateless transcoder between command text and request descriptors.
//!
//! # Design
//! `Transcoder` holds only its configuration and carries no mutable state
//! between calls, so one instance can be shared freely across threads. Each
//! call is a pure function of its input: `parse` reads text, `serialize`
//! writes text, `prepare` turns a descriptor into a plain-data `HttpRequest`
//! for the caller to execute.

use crate::config::TranscoderConfig;
use crate::error::TranscodeError;
use crate::http::HttpRequest;
use crate::parse::{self, Parsed};
use crate::prepare;
use crate::serialize;
use crate::tokenizer;
use crate::types::RequestDescriptor;

#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    config: TranscoderConfig,
}

impl Transcoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Parse command text into a descriptor.
    ///
    /// Fails only on blank input or a missing command keyword; every other
    /// problem is recovered from (see `parse_with_diagnostics`).
    pub fn parse(&self, command: &str) -> Result<RequestDescriptor, TranscodeError> {
        self.parse_with_diagnostics(command).map(|parsed| parsed.descriptor)
    }

    /// Like `parse`, but also returns the fragments that had to be repaired.
    pub fn parse_with_diagnostics(&self, command: &str) -> Result<Parsed, TranscodeError> {
        let rest = strip_command(command, &self.config.command)?;
        let tokenized = tokenizer::tokenize(rest);
        Ok(parse::parse_tokens(tokenized, &self.config))
    }

    /// Render a descriptor as command text. Never fails.
    pub fn serialize(&self, descriptor: &RequestDescriptor) -> String {
        serialize::serialize(descriptor, &self.config)
    }

    /// Build the concrete request an HTTP client should send.
    pub fn prepare(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, TranscodeError> {
        prepare::prepare(descriptor, &self.config)
    }
}

/// Check the leading keyword and return the text after it.
///
/// The keyword matches case-insensitively, with an optional directory prefix
/// (`/usr/bin/curl`) and `.exe` suffix.
fn strip_command<'a>(input: &'a str, keyword: &str) -> Result<&'a str, TranscodeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TranscodeError::invalid_command("empty input"));
    }
    let (head, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let program = head.rsplit(['/', '\\']).next().unwrap_or(head);
    let program = program
        .get(..program.len().saturating_sub(4))
        .filter(|_| program.to_ascii_lowercase().ends_with(".exe"))
        .unwrap_or(program);
    if program.eq_ignore_ascii_case(keyword) {
        Ok(rest)
    } else {
        Err(TranscodeError::invalid_command(format!(
            "expected the command to start with `{keyword}`, found `{head}`"
        )))
    }
}
