//! Bidirectional transcoder between `curl` command lines and structured
//! HTTP request descriptors.
//!
//! # Overview
//! Users paste commands from API documentation; the rest of the system wants
//! a `RequestDescriptor`. `parse` turns the former into the latter,
//! `serialize` goes back, and `Transcoder::prepare` maps a descriptor onto a
//! plain-data `HttpRequest` that the host executes (host-does-IO pattern).
//!
//! # Design
//! - `Transcoder` is stateless; it holds only its `TranscoderConfig`.
//! - Parsing is forgiving. Only blank input or a missing `curl` keyword is an
//!   error; every other problem becomes a `MalformedFragment` warning and a
//!   best-effort substitute.
//! - Serialization is total and degrades to a minimal command.
//! - No I/O anywhere in this crate.

pub mod config;
pub mod error;
mod heuristics;
pub mod http;
mod parse;
mod prepare;
mod serialize;
pub mod tokenizer;
pub mod transcoder;
pub mod types;
mod urls;

pub use config::{ApiKeyPlacement, TranscoderConfig};
pub use error::{MalformedFragment, TranscodeError};
pub use http::{HttpMethod, HttpRequest};
pub use parse::Parsed;
pub use tokenizer::{tokenize, Token, TokenKind, Tokenized};
pub use transcoder::Transcoder;
pub use types::{Auth, Body, RequestDescriptor};

/// Parse a command with the default configuration.
pub fn parse(command: &str) -> Result<RequestDescriptor, TranscodeError> {
    Transcoder::default().parse(command)
}

/// Serialize a descriptor with the default configuration.
pub fn serialize(descriptor: &RequestDescriptor) -> String {
    Transcoder::default().serialize(descriptor)
}
