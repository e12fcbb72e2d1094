//! The `{"data": ...}` envelope every payload travels in, and the
//! `{"error_message": ...}` shape the API uses to report failures.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
struct Envelope<'a, T: ?Sized> {
    data: &'a T,
}

/// Shape-agnostic first pass over a response body.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error_message: String,
}

/// Serialize `payload` as `{"data": payload}`.
pub fn wrap<T: Serialize + ?Sized>(payload: &T) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&Envelope { data: payload })
}

/// Extract the `data` member of `bytes` and decode it into `T`.
///
/// The body is parsed into an untyped document first and only then projected
/// into `T`, so an envelope with extra top-level members still decodes. A
/// missing `data` member is treated as `null`.
pub fn unwrap<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let raw: RawEnvelope = serde_json::from_slice(bytes)?;
    serde_json::from_value(raw.data)
}

/// Return the remote error message if `bytes` is a non-empty error envelope.
///
/// Bodies of any other shape (including empty bodies) are not errors.
pub fn detect_error(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(bytes)
        .ok()
        .map(|e| e.error_message)
        .filter(|message| !message.is_empty())
}
