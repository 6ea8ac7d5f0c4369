//! Check parse and serialize against the JSON vectors in `test-vectors/`.
//!
//! Expected descriptors are deserialized into `RequestDescriptor` before
//! comparing, so vectors may leave default fields out and key order in the
//! files does not matter.

use curlcodec_core::{RequestDescriptor, TranscodeError, Transcoder};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

#[test]
fn parse_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/parse.json"));
    let transcoder = Transcoder::default();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let command = case["command"].as_str().unwrap();
        let expected: RequestDescriptor =
            serde_json::from_value(case["expected"].clone()).unwrap();

        let parsed = transcoder
            .parse_with_diagnostics(command)
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(parsed.descriptor, expected, "{name}: descriptor");

        let warnings = case["warnings"].as_u64().unwrap() as usize;
        assert_eq!(parsed.warnings.len(), warnings, "{name}: {:?}", parsed.warnings);
    }
}

#[test]
fn parse_error_vectors() {
    let vectors = load(include_str!("../../test-vectors/parse.json"));
    let transcoder = Transcoder::default();

    for case in vectors["errors"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let err = transcoder
            .parse(case["command"].as_str().unwrap())
            .unwrap_err();
        assert!(
            matches!(err, TranscodeError::InvalidCommand { .. }),
            "{name}: unexpected error {err:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// Serialize
// ---------------------------------------------------------------------------

#[test]
fn serialize_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/serialize.json"));
    let transcoder = Transcoder::default();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let descriptor: RequestDescriptor =
            serde_json::from_value(case["descriptor"].clone()).unwrap();

        let command = transcoder.serialize(&descriptor);
        assert_eq!(command, case["expected"].as_str().unwrap(), "{name}: command");

        // The rendered command must parse back to the same target.
        let reparsed = transcoder.parse(&command).unwrap();
        let url = case
            .get("reparsed_url")
            .and_then(Value::as_str)
            .unwrap_or(descriptor.url.as_str());
        assert_eq!(reparsed.url, url, "{name}: url");
        assert_eq!(reparsed.method, descriptor.method, "{name}: method");
    }
}
