//! Error types for the command transcoder.
//!
//! # Design
//! Only two things are fatal to a parse: blank input and input that does not
//! start with the expected command keyword. Everything else a user can paste
//! is recovered from, and the recovery is reported as a `MalformedFragment`
//! next to the descriptor instead of as an `Err`.

use thiserror::Error;

/// Errors returned by `Transcoder` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// The input is empty or does not begin with the command keyword.
    #[error("invalid command: {reason}")]
    InvalidCommand { reason: String },

    /// The descriptor has no URL, so there is nothing to send.
    #[error("request descriptor has no url")]
    MissingUrl,

    /// A body could not be rendered to text.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl TranscodeError {
    pub(crate) fn invalid_command(reason: impl Into<String>) -> Self {
        TranscodeError::InvalidCommand {
            reason: reason.into(),
        }
    }
}

/// A non-fatal problem found while parsing a command.
///
/// Each fragment was replaced with a safe default (raw text, `GET`, or the
/// field left untouched) and the parse carried on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedFragment {
    /// A quote was opened and never closed; the remaining text became the
    /// last token.
    #[error("unterminated {quote} quote starting at byte {offset}")]
    UnterminatedQuote { quote: char, offset: usize },

    /// A header argument with no `:` separator.
    #[error("header without a colon: {header:?}")]
    MissingHeaderColon { header: String },

    /// `-X` named something outside the method enumeration.
    #[error("unknown method {method:?}, falling back to GET")]
    InvalidMethod { method: String },

    /// The URL did not parse even after scheme normalization.
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A data argument that looked structured but did not parse.
    #[error("body kept as raw text: {reason}")]
    InvalidBody { reason: String },

    /// A `Basic` credential that is not valid base64 or not UTF-8.
    #[error("basic credentials are not valid base64: {reason}")]
    InvalidBase64 { reason: String },

    /// A form pair with a broken `%XX` escape.
    #[error("form data has invalid percent-encoding: {fragment:?}")]
    InvalidPercentEncoding { fragment: String },

    /// A flag that needs an argument appeared last.
    #[error("flag {flag} is missing its argument")]
    MissingArgument { flag: String },

    /// An `@file` data argument; the transcoder does no file I/O.
    #[error("file reference {reference:?} kept as raw text")]
    UnsupportedFileReference { reference: String },

    /// `--data-urlencode` after a non-form `Content-Type`.
    #[error("content type {content_type:?} replaced by application/x-www-form-urlencoded")]
    ConflictingContentType { content_type: String },
}
