//! Shell-style tokenizer for pasted commands.
//!
//! # Design
//! Two passes. `normalize` repairs copy-paste damage without changing
//! meaning: it drops `\`-newline continuations, collapses whitespace runs
//! outside quotes, and separates a flag glued to a preceding closing quote
//! (`'{}'-H`). `tokenize` then walks the normalized text with a small quote
//! state machine.
//!
//! Quoting follows POSIX shells: single quotes are fully literal, double
//! quotes only honour `\` before `"`, `\`, `$` and `` ` ``, and a bare `\x`
//! outside quotes is the literal `x`. Unterminated quotes never abort: the
//! accumulated text is flushed as the last token and a `MalformedFragment`
//! is returned alongside.

use crate::error::MalformedFragment;

/// Flags whose argument may be glued on (`-XPOST`, `-d'{}'`).
const SHORT_FLAGS_WITH_ARG: &[&str] = &["-X", "-H", "-d", "-u", "-A", "-e", "-b"];

/// Long flags whose argument may follow an `=` (`--data=a=b`).
const LONG_FLAGS_WITH_ARG: &[&str] = &[
    "--request",
    "--header",
    "--data",
    "--data-raw",
    "--data-binary",
    "--data-ascii",
    "--data-urlencode",
    "--json",
    "--user",
    "--url",
    "--user-agent",
    "--referer",
    "--cookie",
    "--oauth2-bearer",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted text starting with `-`.
    Flag,
    /// Unquoted value.
    Bare,
    /// Value that contained at least one quoted segment. The quotes
    /// themselves are already removed from `text`.
    Quoted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn flag(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Flag,
            text: text.into(),
        }
    }

    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Bare,
            text: text.into(),
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Quoted,
            text: text.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Output of `tokenize`: the tokens plus anything that had to be repaired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub warnings: Vec<MalformedFragment>,
}

/// Repair common copy-paste artifacts. Quoted content is left untouched.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut quote: Option<char> = None;
    let mut pending_space = false;
    let mut just_closed = false;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && q == '"' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == q {
                quote = None;
                just_closed = true;
            }
            continue;
        }

        if c == '\\' {
            match chars.peek() {
                Some('\n') => {
                    chars.next();
                    pending_space = true;
                    just_closed = false;
                    continue;
                }
                Some('\r') => {
                    chars.next();
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    pending_space = true;
                    just_closed = false;
                    continue;
                }
                _ => {}
            }
        }

        if c.is_whitespace() {
            pending_space = true;
            just_closed = false;
            continue;
        }

        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;

        if just_closed && c == '-' && chars.peek().is_some_and(|n| n.is_ascii_alphabetic() || *n == '-')
        {
            out.push(' ');
        }
        just_closed = false;

        out.push(c);
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else if c == '\'' || c == '"' {
            quote = Some(c);
        }
    }

    out
}

/// Split a command (without its leading keyword) into tokens.
pub fn tokenize(input: &str) -> Tokenized {
    let normalized = normalize(input);
    let mut builder = TokenBuilder::default();
    let mut warnings = Vec::new();
    let mut chars = normalized.char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\'' => {
                builder.start_quoted();
                let mut closed = false;
                for (_, ch) in chars.by_ref() {
                    if ch == '\'' {
                        closed = true;
                        break;
                    }
                    builder.push(ch);
                }
                if !closed {
                    warnings.push(MalformedFragment::UnterminatedQuote { quote: '\'', offset });
                }
            }
            '"' => {
                builder.start_quoted();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    match ch {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, esc @ ('"' | '\\' | '$' | '`'))) => builder.push(esc),
                            Some((_, other)) => {
                                builder.push('\\');
                                builder.push(other);
                            }
                            None => builder.push('\\'),
                        },
                        other => builder.push(other),
                    }
                }
                if !closed {
                    warnings.push(MalformedFragment::UnterminatedQuote { quote: '"', offset });
                }
            }
            '\\' => {
                builder.start_literal();
                match chars.next() {
                    Some((_, ch)) => builder.push(ch),
                    None => builder.push('\\'),
                }
            }
            ' ' => builder.flush(),
            other => builder.push_plain(other),
        }
    }
    builder.flush();

    let tokens = builder.tokens;
    tracing::trace!(count = tokens.len(), "tokenized command");
    Tokenized { tokens, warnings }
}

/// Accumulates the characters of the token currently being read.
#[derive(Default)]
struct TokenBuilder {
    tokens: Vec<Token>,
    current: String,
    active: bool,
    /// The token has a quoted segment somewhere.
    quoted: bool,
    /// The first character came from a quote or an escape, so a leading `-`
    /// is data, not a flag.
    literal_start: bool,
}

impl TokenBuilder {
    fn start_quoted(&mut self) {
        if !self.active {
            self.literal_start = true;
        }
        self.active = true;
        self.quoted = true;
    }

    fn start_literal(&mut self) {
        if !self.active {
            self.literal_start = true;
        }
        self.active = true;
    }

    fn push(&mut self, c: char) {
        self.current.push(c);
    }

    fn push_plain(&mut self, c: char) {
        self.active = true;
        self.current.push(c);
    }

    fn flush(&mut self) {
        if !self.active {
            return;
        }
        let text = std::mem::take(&mut self.current);
        let quoted = self.quoted;
        let literal_start = self.literal_start;
        self.active = false;
        self.quoted = false;
        self.literal_start = false;

        if literal_start || !text.starts_with('-') || text.len() == 1 {
            self.tokens.push(value_token(text, quoted));
        } else {
            split_flag(text, quoted, &mut self.tokens);
        }
    }
}

fn value_token(text: String, quoted: bool) -> Token {
    if quoted {
        Token::quoted(text)
    } else {
        Token::bare(text)
    }
}

/// Push a flag token, splitting off an attached argument when the flag is
/// one we interpret.
fn split_flag(text: String, quoted: bool, tokens: &mut Vec<Token>) {
    if text.starts_with("--") {
        if let Some((name, value)) = text.split_once('=') {
            if LONG_FLAGS_WITH_ARG.contains(&name) {
                tokens.push(Token::flag(name));
                tokens.push(value_token(value.to_string(), quoted));
                return;
            }
        }
        tokens.push(Token::flag(text));
        return;
    }

    if let (Some(name), Some(rest)) = (text.get(..2), text.get(2..)) {
        if !rest.is_empty() && SHORT_FLAGS_WITH_ARG.contains(&name) {
            tokens.push(Token::flag(name));
            tokens.push(value_token(rest.to_string(), quoted));
            return;
        }
    }
    tokens.push(Token::flag(text));
}
