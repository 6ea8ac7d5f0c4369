//! Token stream → `RequestDescriptor`.
//!
//! # Design
//! A single left-to-right pass. `Cursor` owns the position; each flag has a
//! handler that pulls its argument from the cursor and mutates `ParseState`.
//! Handlers never fail: anything they cannot make sense of is recorded as a
//! `MalformedFragment` and replaced with a safe default.
//!
//! Auth is last-write-wins. Whichever of `-u`, `--oauth2-bearer`, an
//! `Authorization` header or an API-key header appears last decides the
//! variant, and an `Authorization` header this parser synthesized for `-u`
//! is dropped when an explicit one follows.

use serde_json::{Map, Value};

use crate::config::TranscoderConfig;
use crate::error::MalformedFragment;
use crate::heuristics::{
    self, AuthSignal, BodyEncoding, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE,
};
use crate::http::HttpMethod;
use crate::tokenizer::{Token, TokenKind, Tokenized};
use crate::types::{Auth, Body, RequestDescriptor};
use crate::urls;

/// Flags that take an argument but carry nothing the descriptor models.
/// Their argument is skipped so it is never mistaken for the URL.
const IGNORED_FLAGS_WITH_ARG: &[&str] = &[
    "-o", "--output", "-w", "--write-out", "-m", "--max-time", "--connect-timeout",
    "-x", "--proxy", "-U", "--proxy-user", "-F", "--form", "--form-string", "--cacert",
    "--capath", "-E", "--cert", "--key", "--cert-type", "--key-type", "-T",
    "--upload-file", "-K", "--config", "--retry", "--retry-delay", "--retry-max-time",
    "--resolve", "--connect-to", "-c", "--cookie-jar", "-D", "--dump-header", "-r",
    "--range", "-C", "--continue-at", "--limit-rate", "--max-filesize", "--max-redirs",
    "-y", "--speed-time", "-Y", "--speed-limit", "--interface", "--local-port",
    "--trace", "--trace-ascii", "--stderr", "--unix-socket", "--noproxy", "-z",
    "--time-cond",
];

/// Result of a parse: the descriptor plus every recovery made on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub descriptor: RequestDescriptor,
    pub warnings: Vec<MalformedFragment>,
}

/// Read-only walk over the token list.
pub(crate) struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn advance(&mut self) -> Option<&'t Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// The descriptor under construction plus bookkeeping the descriptor itself
/// does not carry.
pub(crate) struct ParseState<'c> {
    config: &'c TranscoderConfig,
    descriptor: RequestDescriptor,
    warnings: Vec<MalformedFragment>,
    url_set: bool,
    /// The current `Authorization` header was generated from `-u` or
    /// `--oauth2-bearer`, not typed by the user.
    synthesized_authorization: bool,
    /// `-G`: data arguments go to the query string.
    get_mode: bool,
    query_data: Vec<String>,
}

impl<'c> ParseState<'c> {
    pub(crate) fn new(config: &'c TranscoderConfig) -> Self {
        Self {
            config,
            descriptor: RequestDescriptor::default(),
            warnings: Vec::new(),
            url_set: false,
            synthesized_authorization: false,
            get_mode: false,
            query_data: Vec::new(),
        }
    }

    fn warn(&mut self, fragment: MalformedFragment) {
        tracing::warn!(fragment = %fragment, "recovered from malformed command fragment");
        self.warnings.push(fragment);
    }

    fn set_auth(&mut self, auth: Auth) {
        tracing::debug!(kind = auth.kind(), "auth classified");
        self.descriptor.auth = auth;
    }

    fn push_header(&mut self, key: &str, value: &str) {
        self.descriptor
            .headers
            .push((key.to_string(), value.to_string()));
    }

    fn push_header_if_absent(&mut self, key: &str, value: &str) {
        if !self.descriptor.has_header(key) {
            self.push_header(key, value);
        }
    }

    /// Form data needs a form `Content-Type`. Any other type already set is
    /// overwritten in place.
    fn ensure_form_content_type(&mut self) {
        let current = self.descriptor.content_type().map(str::to_string);
        match current {
            None => self.push_header("Content-Type", FORM_CONTENT_TYPE),
            Some(ct) if ct.to_ascii_lowercase().contains(FORM_CONTENT_TYPE) => {}
            Some(ct) => {
                for (key, value) in &mut self.descriptor.headers {
                    if key.eq_ignore_ascii_case("content-type") {
                        *value = FORM_CONTENT_TYPE.to_string();
                    }
                }
                self.warn(MalformedFragment::ConflictingContentType { content_type: ct });
            }
        }
    }

    /// Data on a GET turns it into a POST. A method flag seen later still
    /// overrides this.
    fn promote_for_data(&mut self) {
        if self.descriptor.method == HttpMethod::Get {
            tracing::debug!("data attached to GET, promoting to POST");
            self.descriptor.method = HttpMethod::Post;
        }
    }

    /// Replace (or add) the generated `Authorization` header. A header the
    /// user typed is left alone.
    fn synthesize_authorization(&mut self, value: String) {
        if self.synthesized_authorization {
            self.remove_authorization();
        }
        if !self.descriptor.has_header("authorization") {
            self.push_header("Authorization", &value);
            self.synthesized_authorization = true;
        }
    }

    fn remove_authorization(&mut self) {
        self.descriptor
            .headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
        self.synthesized_authorization = false;
    }

    fn set_url(&mut self, raw: &str) {
        let url = urls::normalize_url(raw, &self.config.default_scheme);
        if !url.is_empty() {
            if let Err(reason) = urls::validate_url(&url) {
                self.warn(MalformedFragment::InvalidUrl {
                    url: url.clone(),
                    reason,
                });
            }
        }
        self.descriptor.url = url;
        self.url_set = true;
    }

    /// Add raw text to the body. Raw pieces join with `&` as curl does.
    fn append_raw_body(&mut self, text: &str) {
        match self.descriptor.body.take() {
            None => self.descriptor.body = Some(Body::Raw(text.to_string())),
            Some(Body::Raw(prev)) => {
                self.descriptor.body = Some(Body::Raw(format!("{prev}&{text}")));
            }
            Some(Body::Object(map)) => {
                self.descriptor.body = Some(Body::Object(map));
                self.warn(MalformedFragment::InvalidBody {
                    reason: format!("raw data {text:?} cannot join a structured body"),
                });
            }
        }
    }

    /// Merge keys into an object body; later keys win.
    fn merge_object_body(&mut self, map: Map<String, Value>) {
        match self.descriptor.body.take() {
            Some(Body::Object(mut existing)) => {
                existing.extend(map);
                self.descriptor.body = Some(Body::Object(existing));
            }
            Some(Body::Raw(prev)) => {
                self.warn(MalformedFragment::InvalidBody {
                    reason: format!("raw data {prev:?} replaced by structured data"),
                });
                self.descriptor.body = Some(Body::Object(map));
            }
            None => self.descriptor.body = Some(Body::Object(map)),
        }
    }

    fn into_parsed(mut self) -> Parsed {
        if !self.query_data.is_empty() && !self.descriptor.url.is_empty() {
            let joined = self.query_data.join("&");
            self.descriptor.url = urls::append_raw_query(&self.descriptor.url, &joined);
        }

        self.descriptor.query_params = urls::query_pairs(&self.descriptor.url);

        let inferred = match &self.descriptor.body {
            Some(body) if self.descriptor.content_type().is_none() => Some(
                heuristics::infer_content_type(body, self.descriptor.is_form_url_encoded),
            ),
            _ => None,
        };
        if let Some(content_type) = inferred {
            tracing::debug!(content_type, "injecting content type");
            self.push_header("Content-Type", content_type);
        }

        Parsed {
            descriptor: self.descriptor,
            warnings: self.warnings,
        }
    }
}

/// Walk the tokens and build a descriptor. Never fails.
pub(crate) fn parse_tokens(tokenized: Tokenized, config: &TranscoderConfig) -> Parsed {
    let Tokenized { tokens, warnings } = tokenized;
    let mut state = ParseState::new(config);
    for fragment in warnings {
        state.warn(fragment);
    }

    let mut cursor = Cursor::new(&tokens);
    while let Some(token) = cursor.advance() {
        match token.kind {
            TokenKind::Flag => dispatch_flag(&token.text, &mut cursor, &mut state),
            TokenKind::Bare | TokenKind::Quoted => handle_positional(token, &mut state),
        }
    }
    state.into_parsed()
}

fn dispatch_flag(flag: &str, cursor: &mut Cursor<'_>, state: &mut ParseState<'_>) {
    match flag {
        "-X" | "--request" => with_argument(flag, cursor, state, handle_method),
        "-H" | "--header" => with_argument(flag, cursor, state, handle_header),
        "-d" | "--data" | "--data-ascii" | "--data-binary" => {
            with_argument(flag, cursor, state, |arg, state| handle_data(arg, true, state));
        }
        "--data-raw" => {
            with_argument(flag, cursor, state, |arg, state| handle_data(arg, false, state));
        }
        "--data-urlencode" => with_argument(flag, cursor, state, handle_data_urlencode),
        "--json" => with_argument(flag, cursor, state, handle_json),
        "-u" | "--user" => with_argument(flag, cursor, state, handle_user),
        "--oauth2-bearer" => with_argument(flag, cursor, state, handle_oauth2_bearer),
        "--url" => with_argument(flag, cursor, state, |arg, state| state.set_url(arg)),
        "-A" | "--user-agent" => {
            with_argument(flag, cursor, state, |arg, state| state.push_header("User-Agent", arg));
        }
        "-e" | "--referer" => {
            with_argument(flag, cursor, state, |arg, state| state.push_header("Referer", arg));
        }
        "-b" | "--cookie" => {
            with_argument(flag, cursor, state, |arg, state| state.push_header("Cookie", arg));
        }
        "-I" | "--head" => state.descriptor.method = HttpMethod::Head,
        "-G" | "--get" => state.get_mode = true,
        _ if IGNORED_FLAGS_WITH_ARG.contains(&flag) => {
            if cursor.at_end() {
                state.warn(MalformedFragment::MissingArgument {
                    flag: flag.to_string(),
                });
            } else {
                cursor.advance();
            }
        }
        _ => tracing::trace!(flag, "skipping unrecognized flag"),
    }
}

/// Run `handler` on the token after the flag, or record the missing
/// argument.
fn with_argument(
    flag: &str,
    cursor: &mut Cursor<'_>,
    state: &mut ParseState<'_>,
    handler: impl FnOnce(&str, &mut ParseState<'_>),
) {
    match cursor.advance() {
        Some(token) => handler(token.as_str(), state),
        None => state.warn(MalformedFragment::MissingArgument {
            flag: flag.to_string(),
        }),
    }
}

/// The first value outside any flag is the URL; later ones are ignored.
fn handle_positional(token: &Token, state: &mut ParseState<'_>) {
    if state.url_set {
        tracing::trace!(value = token.as_str(), "ignoring extra positional argument");
        return;
    }
    state.set_url(token.as_str());
}

pub(crate) fn handle_method(arg: &str, state: &mut ParseState<'_>) {
    match arg.parse::<HttpMethod>() {
        Ok(method) => state.descriptor.method = method,
        Err(_) => {
            state.warn(MalformedFragment::InvalidMethod {
                method: arg.to_string(),
            });
            state.descriptor.method = HttpMethod::Get;
        }
    }
}

pub(crate) fn handle_header(arg: &str, state: &mut ParseState<'_>) {
    let raw = urls::strip_outer_quotes(arg.trim());
    let Some((key, value)) = split_header(raw) else {
        state.warn(MalformedFragment::MissingHeaderColon {
            header: raw.to_string(),
        });
        return;
    };
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() {
        state.warn(MalformedFragment::MissingHeaderColon {
            header: raw.to_string(),
        });
        return;
    }

    if key.eq_ignore_ascii_case("authorization") {
        if state.synthesized_authorization {
            state.remove_authorization();
        }
        match heuristics::classify_authorization(value) {
            AuthSignal::Detected(auth) => state.set_auth(auth),
            AuthSignal::Malformed(fragment) => state.warn(fragment),
            AuthSignal::Unrecognized => {
                tracing::debug!("authorization scheme not recognized, auth unchanged");
            }
        }
    } else if heuristics::is_api_key_header(key) {
        state.set_auth(Auth::ApiKey {
            token: value.to_string(),
        });
    }
    state.push_header(key, value);
}

/// Split on the first `:` that is not inside a quoted section of the header.
fn split_header(header: &str) -> Option<(&str, &str)> {
    let mut quote: Option<char> = None;
    for (i, c) in header.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, ':') => return Some((&header[..i], &header[i + 1..])),
            _ => {}
        }
    }
    None
}

/// `-d` and friends. `file_refs` is false for `--data-raw`, where a leading
/// `@` is plain text.
pub(crate) fn handle_data(arg: &str, file_refs: bool, state: &mut ParseState<'_>) {
    if state.get_mode {
        state.query_data.push(arg.to_string());
        return;
    }
    state.promote_for_data();
    if file_refs && arg.starts_with('@') {
        state.warn(MalformedFragment::UnsupportedFileReference {
            reference: arg.to_string(),
        });
        state.append_raw_body(arg);
        return;
    }

    let encoding = heuristics::classify_body(state.descriptor.content_type(), arg);
    tracing::debug!(?encoding, "body encoding chosen");
    match encoding {
        BodyEncoding::Form => match heuristics::parse_form(arg) {
            Ok(map) => {
                state.merge_object_body(map);
                state.descriptor.is_form_url_encoded = true;
            }
            Err(fragment) => {
                state.warn(fragment);
                state.append_raw_body(arg);
            }
        },
        BodyEncoding::Json => merge_json(arg, state),
        BodyEncoding::Raw => state.append_raw_body(arg),
    }
}

fn merge_json(arg: &str, state: &mut ParseState<'_>) {
    match serde_json::from_str::<Value>(arg) {
        Ok(Value::Object(map)) => state.merge_object_body(map),
        Ok(_) => state.append_raw_body(arg),
        Err(e) => {
            state.warn(MalformedFragment::InvalidBody {
                reason: e.to_string(),
            });
            state.append_raw_body(arg);
        }
    }
}

/// `--data-urlencode [name]=content`: one pair merged into a form body.
pub(crate) fn handle_data_urlencode(arg: &str, state: &mut ParseState<'_>) {
    let (key, value) = arg.split_once('=').unwrap_or(("", arg));
    if state.get_mode {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();
        state.query_data.push(encoded);
        return;
    }
    state.promote_for_data();

    let mut map = Map::new();
    map.insert(key.to_string(), Value::String(value.to_string()));
    let earlier_form = match &state.descriptor.body {
        Some(Body::Raw(prev)) if heuristics::looks_like_form(prev) => {
            heuristics::parse_form(prev).ok()
        }
        _ => None,
    };
    if let Some(existing) = earlier_form {
        state.descriptor.body = Some(Body::Object(existing));
    }
    state.merge_object_body(map);
    state.descriptor.is_form_url_encoded = true;
    state.ensure_form_content_type();
}

/// `--json <data>`: a JSON body plus JSON content negotiation headers.
fn handle_json(arg: &str, state: &mut ParseState<'_>) {
    state.push_header_if_absent("Content-Type", JSON_CONTENT_TYPE);
    state.push_header_if_absent("Accept", JSON_CONTENT_TYPE);
    if state.get_mode {
        state.query_data.push(arg.to_string());
        return;
    }
    state.promote_for_data();
    merge_json(arg, state);
}

/// `-u user[:password]`.
pub(crate) fn handle_user(arg: &str, state: &mut ParseState<'_>) {
    let (username, password) = heuristics::split_credentials(arg);
    let encoded = heuristics::encode_basic(&username, &password);
    state.set_auth(Auth::Basic { username, password });
    state.synthesize_authorization(format!("Basic {encoded}"));
}

fn handle_oauth2_bearer(arg: &str, state: &mut ParseState<'_>) {
    let token = arg.trim();
    state.set_auth(Auth::bearer(token));
    state.synthesize_authorization(format!("Bearer {token}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn headers(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn cursor_walks_tokens() {
        let tokens = vec![Token::flag("-X"), Token::bare("PUT")];
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.peek(), Some(&Token::flag("-X")));
        assert_eq!(cursor.advance(), Some(&Token::flag("-X")));
        assert!(!cursor.at_end());
        assert_eq!(cursor.advance(), Some(&Token::bare("PUT")));
        assert!(cursor.at_end());
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn method_handler_falls_back_to_get() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_method("delete", &mut state);
        assert_eq!(state.descriptor.method, HttpMethod::Delete);

        let mut state = ParseState::new(&config);
        handle_method("YEET", &mut state);
        assert_eq!(state.descriptor.method, HttpMethod::Get);
        assert_eq!(
            state.warnings,
            vec![MalformedFragment::InvalidMethod {
                method: "YEET".to_string()
            }]
        );
    }

    #[test]
    fn header_splits_on_first_colon() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_header("X-Time:  12:30:00 ", &mut state);
        assert_eq!(state.descriptor.headers, headers(&[("X-Time", "12:30:00")]));
    }

    #[test]
    fn header_colon_inside_quotes_is_skipped() {
        assert_eq!(split_header(r#""a:b": c"#), Some((r#""a:b""#, " c")));
        assert_eq!(split_header("no colon"), None);
    }

    #[test]
    fn header_strips_one_layer_of_quotes() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_header(r#""Accept: */*""#, &mut state);
        assert_eq!(state.descriptor.headers, headers(&[("Accept", "*/*")]));
    }

    #[test]
    fn header_without_colon_is_dropped_with_warning() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_header("Accept json", &mut state);
        assert!(state.descriptor.headers.is_empty());
        assert_eq!(
            state.warnings,
            vec![MalformedFragment::MissingHeaderColon {
                header: "Accept json".to_string()
            }]
        );
    }

    #[test]
    fn api_key_header_sets_auth_and_is_kept() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_header("x-api-token: t0k", &mut state);
        assert_eq!(
            state.descriptor.auth,
            Auth::ApiKey {
                token: "t0k".to_string()
            }
        );
        assert_eq!(state.descriptor.headers, headers(&[("x-api-token", "t0k")]));
    }

    #[test]
    fn user_then_authorization_header_replaces_synthesized_header() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_user("admin:secret", &mut state);
        assert_eq!(
            state.descriptor.headers,
            headers(&[("Authorization", "Basic YWRtaW46c2VjcmV0")])
        );
        handle_header("Authorization: Bearer abc", &mut state);
        assert_eq!(
            state.descriptor.auth,
            Auth::Bearer {
                token: "abc".to_string()
            }
        );
        assert_eq!(
            state.descriptor.headers,
            headers(&[("Authorization", "Bearer abc")])
        );
    }

    #[test]
    fn authorization_header_then_user_keeps_header() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_header("Authorization: Bearer abc", &mut state);
        handle_user("admin", &mut state);
        assert_eq!(
            state.descriptor.auth,
            Auth::Basic {
                username: "admin".to_string(),
                password: String::new()
            }
        );
        assert_eq!(
            state.descriptor.headers,
            headers(&[("Authorization", "Bearer abc")])
        );
    }

    #[test]
    fn repeated_user_refreshes_synthesized_header() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_user("a:b", &mut state);
        handle_user("admin:secret", &mut state);
        assert_eq!(
            state.descriptor.headers,
            headers(&[("Authorization", "Basic YWRtaW46c2VjcmV0")])
        );
    }

    #[test]
    fn json_data_merges_into_object() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_data(r#"{"a":1}"#, true, &mut state);
        handle_data(r#"{"b":[true]}"#, true, &mut state);
        assert_eq!(
            state.descriptor.body,
            Some(Body::Object(json!({"a": 1, "b": [true]}).as_object().unwrap().clone()))
        );
        assert!(!state.descriptor.is_form_url_encoded);
    }

    #[test]
    fn broken_json_is_kept_raw() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_data(r#"{"a":}"#, true, &mut state);
        assert_eq!(state.descriptor.body, Some(Body::Raw(r#"{"a":}"#.to_string())));
        assert!(matches!(
            state.warnings.as_slice(),
            [MalformedFragment::InvalidBody { .. }]
        ));
    }

    #[test]
    fn json_array_is_kept_raw() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_data("[1,2]", true, &mut state);
        assert_eq!(state.descriptor.body, Some(Body::Raw("[1,2]".to_string())));
        assert!(state.warnings.is_empty());
    }

    #[test]
    fn raw_pieces_join_with_ampersand() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_data("hello", true, &mut state);
        handle_data("world", true, &mut state);
        assert_eq!(state.descriptor.body, Some(Body::Raw("hello&world".to_string())));
    }

    #[test]
    fn file_reference_is_kept_raw_with_warning() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_data("@payload.json", true, &mut state);
        assert_eq!(state.descriptor.body, Some(Body::Raw("@payload.json".to_string())));
        assert_eq!(
            state.warnings,
            vec![MalformedFragment::UnsupportedFileReference {
                reference: "@payload.json".to_string()
            }]
        );

        let mut state = ParseState::new(&config);
        handle_data("@handle", false, &mut state);
        assert!(state.warnings.is_empty());
    }

    #[test]
    fn data_urlencode_builds_form_body() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_data_urlencode("q=hello world", &mut state);
        handle_data_urlencode("bare value", &mut state);
        assert_eq!(
            state.descriptor.body,
            Some(Body::Object(
                json!({"q": "hello world", "": "bare value"}).as_object().unwrap().clone()
            ))
        );
        assert!(state.descriptor.is_form_url_encoded);
        assert_eq!(
            state.descriptor.headers,
            headers(&[("Content-Type", FORM_CONTENT_TYPE)])
        );
    }

    #[test]
    fn data_urlencode_absorbs_earlier_form_text() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        state.descriptor.body = Some(Body::Raw("a=1".to_string()));
        handle_data_urlencode("b=2", &mut state);
        assert_eq!(
            state.descriptor.body,
            Some(Body::Object(json!({"a": "1", "b": "2"}).as_object().unwrap().clone()))
        );
    }

    #[test]
    fn data_promotes_get_until_a_later_method_flag() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        handle_method("GET", &mut state);
        handle_data("a=1", true, &mut state);
        assert_eq!(state.descriptor.method, HttpMethod::Post);

        let mut state = ParseState::new(&config);
        handle_data("a=1", true, &mut state);
        handle_method("GET", &mut state);
        assert_eq!(state.descriptor.method, HttpMethod::Get);

        let mut state = ParseState::new(&config);
        handle_method("PUT", &mut state);
        handle_json("{}", &mut state);
        assert_eq!(state.descriptor.method, HttpMethod::Put);
    }

    #[test]
    fn data_urlencode_replaces_other_content_type() {
        let config = TranscoderConfig::default();
        let mut state = ParseState::new(&config);
        state.push_header("content-type", "application/json");
        handle_data_urlencode("q=a b", &mut state);
        assert!(state.descriptor.is_form_url_encoded);
        assert_eq!(
            state.descriptor.headers,
            headers(&[("content-type", FORM_CONTENT_TYPE)])
        );
        assert_eq!(
            state.warnings,
            vec![MalformedFragment::ConflictingContentType {
                content_type: "application/json".to_string()
            }]
        );

        let mut state = ParseState::new(&config);
        state.push_header("Content-Type", "application/x-www-form-urlencoded; charset=utf-8");
        handle_data_urlencode("q=1", &mut state);
        assert_eq!(
            state.descriptor.content_type(),
            Some("application/x-www-form-urlencoded; charset=utf-8")
        );
        assert!(state.warnings.is_empty());
    }
}
