//! C-ABI wrapper around `curlcodec-core`.
//!
//! # Overview
//! Exposes parse, serialize and request preparation through `extern "C"`
//! functions so any language with a C FFI can transcode commands without
//! linking to serde directly. Descriptors travel back into Rust as JSON, the
//! same shape the `json` field of a parsed descriptor carries.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `curlcodec_parse` returns an `FfiParseResult` envelope carrying either
//!   the descriptor or an error code and message.
//! - `curlcodec_serialize` and `curlcodec_prepare` return null on failure.
//! - The C caller owns all returned pointers and must call the matching
//!   `curlcodec_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use curlcodec_core::{RequestDescriptor, Transcoder, TranscoderConfig};

use types::*;

/// Borrow a C string as UTF-8. Invalid UTF-8 reads as `None`.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that outlives
/// the returned borrow.
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn read_descriptor(json: &str) -> Option<RequestDescriptor> {
    serde_json::from_str(json).ok()
}

// ---------------------------------------------------------------------------
// Transcoder lifecycle
// ---------------------------------------------------------------------------

/// Create a new `Transcoder`.
///
/// `config_json` is a JSON `TranscoderConfig`; null or an empty string
/// selects the defaults. Returns null if the JSON is invalid or if an
/// internal panic occurs. The caller must free the returned pointer with
/// `curlcodec_transcoder_free`.
#[unsafe(no_mangle)]
pub extern "C" fn curlcodec_transcoder_new(config_json: *const c_char) -> *mut FfiTranscoder {
    catch_unwind(|| {
        let config = if config_json.is_null() {
            TranscoderConfig::default()
        } else {
            let Some(text) = (unsafe { read_str(config_json) }) else {
                return std::ptr::null_mut();
            };
            if text.trim().is_empty() {
                TranscoderConfig::default()
            } else {
                match TranscoderConfig::from_json(text) {
                    Ok(config) => config,
                    Err(_) => return std::ptr::null_mut(),
                }
            }
        };
        Box::into_raw(Box::new(FfiTranscoder {
            inner: Transcoder::new(config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `Transcoder` created by `curlcodec_transcoder_new`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn curlcodec_transcoder_free(transcoder: *mut FfiTranscoder) {
    if !transcoder.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(transcoder) });
        });
    }
}

// ---------------------------------------------------------------------------
// Transcoding
// ---------------------------------------------------------------------------

/// Parse a command into a descriptor.
///
/// Always returns a result; free it with `curlcodec_free_parse_result`.
#[unsafe(no_mangle)]
pub extern "C" fn curlcodec_parse(
    transcoder: *const FfiTranscoder,
    command: *const c_char,
) -> *mut FfiParseResult {
    catch_unwind(|| {
        if transcoder.is_null() {
            return FfiParseResult::null_arg("transcoder");
        }
        if command.is_null() {
            return FfiParseResult::null_arg("command");
        }
        let transcoder = unsafe { &*transcoder };
        let command = unsafe { CStr::from_ptr(command) }.to_string_lossy();
        FfiParseResult::from_core(transcoder.inner.parse_with_diagnostics(&command))
    })
    .unwrap_or_else(|_| FfiParseResult::panic("panic in curlcodec_parse"))
}

/// Render a JSON descriptor as a command.
///
/// Returns null if an argument is null or the JSON is not a descriptor.
/// The caller must free the returned string with `curlcodec_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn curlcodec_serialize(
    transcoder: *const FfiTranscoder,
    descriptor_json: *const c_char,
) -> *mut c_char {
    catch_unwind(|| {
        if transcoder.is_null() || descriptor_json.is_null() {
            return std::ptr::null_mut();
        }
        let transcoder = unsafe { &*transcoder };
        let Some(descriptor) = (unsafe { read_str(descriptor_json) }).and_then(read_descriptor)
        else {
            return std::ptr::null_mut();
        };
        to_c_string(transcoder.inner.serialize(&descriptor))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the HTTP request a JSON descriptor describes.
///
/// Returns null if an argument is null, the JSON is not a descriptor, or the
/// descriptor has no URL. The caller must free the returned pointer with
/// `curlcodec_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn curlcodec_prepare(
    transcoder: *const FfiTranscoder,
    descriptor_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if transcoder.is_null() || descriptor_json.is_null() {
            return std::ptr::null_mut();
        }
        let transcoder = unsafe { &*transcoder };
        let Some(descriptor) = (unsafe { read_str(descriptor_json) }).and_then(read_descriptor)
        else {
            return std::ptr::null_mut();
        };
        match transcoder.inner.prepare(&descriptor) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiParseResult` returned by `curlcodec_parse`. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn curlcodec_free_parse_result(result: *mut FfiParseResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiParseResult::free(result) });
}

/// Free an `FfiHttpRequest` returned by `curlcodec_prepare`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn curlcodec_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::free(req) });
}

/// Free a string returned by `curlcodec_serialize`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn curlcodec_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
