//! Status classification
//!
//! Maps a raw `(status, body)` pair to an [`Outcome`]. The retry loop and the
//! typed helpers in [`super::client`] only ever look at outcomes.

use super::error::{is_retryable_status, ApiError, RemoteErrorBody};

/// Normalized result of one HTTP attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx other than 204; the body may still be empty
    Success(Vec<u8>),
    NoContent,
    NotFound,
    NotSupported(String),
    Retryable,
    Permanent,
}

/// Classify a completed HTTP exchange
pub fn classify(status: u16, body: &[u8]) -> Outcome {
    match status {
        204 => Outcome::NoContent,
        200..=299 => Outcome::Success(body.to_vec()),
        404 => Outcome::NotFound,
        s if is_retryable_status(s) => Outcome::Retryable,
        400..=499 => match not_supported_reason(body) {
            Some(reason) => Outcome::NotSupported(reason),
            None => Outcome::Permanent,
        },
        _ => Outcome::Permanent,
    }
}

/// Turn an outcome into the body or the matching error
pub fn into_result(outcome: Outcome, method: &str, url: &str, status: u16, body: &[u8]) -> Result<Vec<u8>, ApiError> {
    match outcome {
        Outcome::Success(bytes) => Ok(bytes),
        Outcome::NoContent => Err(ApiError::NoContent),
        Outcome::NotFound => Err(ApiError::NotFound),
        Outcome::NotSupported(reason) => Err(ApiError::NotSupported(reason)),
        Outcome::Retryable | Outcome::Permanent => Err(ApiError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

/// A 4xx carrying an `errorCode` whose text says the setting type is unsupported
fn not_supported_reason(body: &[u8]) -> Option<String> {
    let parsed: RemoteErrorBody = serde_json::from_slice(body).ok()?;
    parsed.error_code.as_ref()?;
    let text = parsed.text();
    let lower = text.to_lowercase();
    if lower.contains("not supported") || lower.contains("unsupported") {
        Some(text)
    } else {
        None
    }
}
