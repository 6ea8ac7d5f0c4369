//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length instead of `Vec`,
//! and enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.
//!
//! Every pointer handed out is owned by the C caller until it is passed back
//! to the matching `curlcodec_free_*` function.

use std::ffi::CString;
use std::os::raw::c_char;

use curlcodec_core::{
    Auth, Body, HttpMethod, HttpRequest, Parsed, RequestDescriptor, TranscodeError, Transcoder,
};

/// Opaque handle to a `Transcoder`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiTranscoder {
    pub(crate) inner: Transcoder,
}

/// Copy `text` into a heap C string. Interior NUL bytes cannot cross the
/// boundary and are dropped.
pub(crate) fn to_c_string(text: impl Into<Vec<u8>>) -> *mut c_char {
    let c_string = CString::new(text).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|b| *b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c_string.into_raw()
}

fn optional_c_string(text: Option<String>) -> *mut c_char {
    text.map_or(std::ptr::null_mut(), to_c_string)
}

/// Release a string created by `to_c_string`. Null is ignored.
///
/// # Safety
/// `ptr` must be null or come from `to_c_string` and not be freed yet.
pub(crate) unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Patch = 3,
    Delete = 4,
    Head = 5,
    Options = 6,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Delete => FfiHttpMethod::Delete,
            HttpMethod::Head => FfiHttpMethod::Head,
            HttpMethod::Options => FfiHttpMethod::Options,
        }
    }
}

/// A key-value pair of C strings. Used for headers and query parameters.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// Move pairs into a heap array. Empty input gives a null pointer.
fn pairs_into_raw(pairs: Vec<(String, String)>) -> (*mut FfiHeader, u32) {
    if pairs.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = pairs.len() as u32;
    let items: Box<[FfiHeader]> = pairs
        .into_iter()
        .map(|(k, v)| FfiHeader {
            key: to_c_string(k),
            value: to_c_string(v),
        })
        .collect();
    (Box::into_raw(items) as *mut FfiHeader, len)
}

/// Release an array built by `pairs_into_raw`.
///
/// # Safety
/// `ptr`/`len` must come from `pairs_into_raw` and not be freed yet.
pub(crate) unsafe fn free_pairs(ptr: *mut FfiHeader, len: u32) {
    if ptr.is_null() || len == 0 {
        return;
    }
    let items = unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) };
    for item in items.iter() {
        unsafe {
            free_c_string(item.key);
            free_c_string(item.value);
        }
    }
}

// ---------------------------------------------------------------------------
// Prepared request
// ---------------------------------------------------------------------------

/// An HTTP request described as C-compatible plain data.
///
/// Built by `curlcodec_prepare`. The C caller executes the request with its
/// own HTTP client and frees it with `curlcodec_free_request`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    /// Null when the request has no body.
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let (headers, headers_len) = pairs_into_raw(req.headers);
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(req.url),
            headers,
            headers_len,
            body: optional_c_string(req.body),
        }))
    }

    /// # Safety
    /// `req` must come from `from_core` and not be freed yet.
    pub(crate) unsafe fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            free_c_string(req.body);
            free_pairs(req.headers, req.headers_len);
        }
    }
}

// ---------------------------------------------------------------------------
// Parsed descriptor
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiBodyKind {
    None = 0,
    /// `body` holds compact JSON of a key/value object.
    Object = 1,
    /// `body` holds the text verbatim.
    Raw = 2,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiAuthKind {
    None = 0,
    Basic = 1,
    Bearer = 2,
    Jwt = 3,
    ApiKey = 4,
}

/// Auth variant. Fields that the kind does not use are null.
#[repr(C)]
pub struct FfiAuth {
    pub kind: FfiAuthKind,
    pub username: *mut c_char,
    pub password: *mut c_char,
    pub token: *mut c_char,
}

impl FfiAuth {
    fn from_core(auth: Auth) -> Self {
        let null = std::ptr::null_mut;
        match auth {
            Auth::None => FfiAuth {
                kind: FfiAuthKind::None,
                username: null(),
                password: null(),
                token: null(),
            },
            Auth::Basic { username, password } => FfiAuth {
                kind: FfiAuthKind::Basic,
                username: to_c_string(username),
                password: to_c_string(password),
                token: null(),
            },
            Auth::Bearer { token } => FfiAuth::with_token(FfiAuthKind::Bearer, token),
            Auth::Jwt { token } => FfiAuth::with_token(FfiAuthKind::Jwt, token),
            Auth::ApiKey { token } => FfiAuth::with_token(FfiAuthKind::ApiKey, token),
        }
    }

    fn with_token(kind: FfiAuthKind, token: String) -> Self {
        FfiAuth {
            kind,
            username: std::ptr::null_mut(),
            password: std::ptr::null_mut(),
            token: to_c_string(token),
        }
    }

    unsafe fn free_fields(&self) {
        unsafe {
            free_c_string(self.username);
            free_c_string(self.password);
            free_c_string(self.token);
        }
    }
}

/// A parsed request descriptor exposed to C.
///
/// `json` carries the whole descriptor in its JSON form, which is what
/// `curlcodec_serialize` and `curlcodec_prepare` accept back.
#[repr(C)]
pub struct FfiRequestDescriptor {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub query_params: *mut FfiHeader,
    pub query_params_len: u32,
    pub body_kind: FfiBodyKind,
    pub body: *mut c_char,
    pub is_form_url_encoded: bool,
    pub auth: FfiAuth,
    pub json: *mut c_char,
}

impl FfiRequestDescriptor {
    fn from_core(descriptor: RequestDescriptor) -> Result<*mut Self, TranscodeError> {
        let json = serde_json::to_string(&descriptor)
            .map_err(|e| TranscodeError::Serialization(e.to_string()))?;
        let (body_kind, body) = match descriptor.body {
            None => (FfiBodyKind::None, None),
            Some(Body::Object(map)) => (
                FfiBodyKind::Object,
                Some(
                    serde_json::to_string(&map)
                        .map_err(|e| TranscodeError::Serialization(e.to_string()))?,
                ),
            ),
            Some(Body::Raw(text)) => (FfiBodyKind::Raw, Some(text)),
        };
        let (headers, headers_len) = pairs_into_raw(descriptor.headers);
        let (query_params, query_params_len) = pairs_into_raw(descriptor.query_params);

        Ok(Box::into_raw(Box::new(FfiRequestDescriptor {
            method: descriptor.method.into(),
            url: to_c_string(descriptor.url),
            headers,
            headers_len,
            query_params,
            query_params_len,
            body_kind,
            body: optional_c_string(body),
            is_form_url_encoded: descriptor.is_form_url_encoded,
            auth: FfiAuth::from_core(descriptor.auth),
            json: to_c_string(json),
        })))
    }

    /// # Safety
    /// `ptr` must come from `from_core` and not be freed yet.
    unsafe fn free(ptr: *mut Self) {
        let d = unsafe { Box::from_raw(ptr) };
        unsafe {
            free_c_string(d.url);
            free_pairs(d.headers, d.headers_len);
            free_pairs(d.query_params, d.query_params_len);
            free_c_string(d.body);
            d.auth.free_fields();
            free_c_string(d.json);
        }
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiParseResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidCommand = 1,
    MissingUrl = 2,
    Serialization = 3,
    Panic = 4,
    NullArg = 5,
}

impl From<&TranscodeError> for FfiErrorCode {
    fn from(err: &TranscodeError) -> Self {
        match err {
            TranscodeError::InvalidCommand { .. } => FfiErrorCode::InvalidCommand,
            TranscodeError::MissingUrl => FfiErrorCode::MissingUrl,
            TranscodeError::Serialization(_) => FfiErrorCode::Serialization,
        }
    }
}

/// Result envelope for `curlcodec_parse`.
///
/// On success `error_code` is `Ok`, `error_message` is null and
/// `descriptor` points to the parsed request. `warnings_len` counts the
/// malformed fragments that were repaired along the way.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string and `descriptor` is null.
#[repr(C)]
pub struct FfiParseResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub descriptor: *mut FfiRequestDescriptor,
    pub warnings_len: u32,
}

impl FfiParseResult {
    pub(crate) fn from_core(result: Result<Parsed, TranscodeError>) -> *mut Self {
        let parsed = match result {
            Ok(parsed) => parsed,
            Err(e) => return Self::from_error(&e),
        };
        let warnings_len = parsed.warnings.len() as u32;
        match FfiRequestDescriptor::from_core(parsed.descriptor) {
            Ok(descriptor) => Box::into_raw(Box::new(FfiParseResult {
                error_code: FfiErrorCode::Ok,
                error_message: std::ptr::null_mut(),
                descriptor,
                warnings_len,
            })),
            Err(e) => Self::from_error(&e),
        }
    }

    fn failure(error_code: FfiErrorCode, message: String) -> *mut Self {
        Box::into_raw(Box::new(FfiParseResult {
            error_code,
            error_message: to_c_string(message),
            descriptor: std::ptr::null_mut(),
            warnings_len: 0,
        }))
    }

    pub(crate) fn from_error(err: &TranscodeError) -> *mut Self {
        Self::failure(err.into(), err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    /// # Safety
    /// `ptr` must come from one of the constructors and not be freed yet.
    pub(crate) unsafe fn free(ptr: *mut Self) {
        let result = unsafe { Box::from_raw(ptr) };
        unsafe {
            free_c_string(result.error_message);
            if !result.descriptor.is_null() {
                FfiRequestDescriptor::free(result.descriptor);
            }
        }
    }
}
