//! Error taxonomy for PAM API calls
//!
//! Every API operation returns [`ApiResult`]. Three variants act as sentinels
//! that callers branch on: [`ApiError::NotFound`], [`ApiError::NoContent`] and
//! [`ApiError::NotSupported`]. Match on the variant (or use the `is_*`
//! helpers), never on the rendered message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of body characters rendered in an error message
const MAX_DISPLAY_BODY_LENGTH: usize = 512;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404, or an empty body / empty array on a lookup
    #[error("resource not found")]
    NotFound,

    /// 204 from the remote; mutating wrappers treat this as success
    #[error("no content")]
    NoContent,

    /// The remote rejected a setting type it does not support for this tenant
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Non-success HTTP status that was not mapped to a sentinel
    #[error("{method} {url} -> {status}: {}", truncate_body(body))]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The request never produced an HTTP status (connect, DNS, timeout, body read)
    #[error("{method} {url} failed: {message}")]
    Transport {
        method: String,
        url: String,
        message: String,
        retryable: bool,
    },

    /// A retryable failure persisted after the configured number of retries
    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ApiError>,
    },

    /// Input rejected before any request was sent
    #[error("invalid request: {0}")]
    Validation(String),

    /// A client-side search found nothing; the message lists what exists
    #[error("{0}")]
    NoMatch(String),

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, ApiError::NoContent)
    }

    pub fn is_not_supported(&self) -> bool {
        matches!(self, ApiError::NotSupported(_))
    }

    /// Whether the retry policy should re-dispatch the request
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => is_retryable_status(*status),
            ApiError::Transport { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// HTTP status carried by the error, looking through exhausted retries
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::NotFound => Some(404),
            ApiError::NoContent => Some(204),
            ApiError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Remote `errorCode`, when the body follows the service error schema
    pub fn error_code(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } => RemoteErrorBody::parse(body)?.error_code,
            ApiError::RetriesExhausted { last, .. } => last.error_code(),
            _ => None,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

/// Statuses the service returns for transient conditions
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

/// Error document returned by the service: `{status, message, errorCode, details}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl RemoteErrorBody {
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Human-readable text from `message` and `details`
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }
        match &self.details {
            Some(serde_json::Value::String(s)) => parts.push(s.clone()),
            Some(serde_json::Value::Null) | None => {},
            Some(other) => parts.push(other.to_string()),
        }
        parts.join(": ")
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() > MAX_DISPLAY_BODY_LENGTH {
        let head: String = body.chars().take(MAX_DISPLAY_BODY_LENGTH).collect();
        format!("{}... [truncated]", head)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16, body: &str) -> ApiError {
        ApiError::Status {
            method: "GET".to_string(),
            url: "https://tenant.example/api/apps".to_string(),
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 502, 503, 504] {
            assert!(status_error(status, "").is_retryable(), "{status}");
        }
        for status in [400, 401, 403, 409, 500] {
            assert!(!status_error(status, "").is_retryable(), "{status}");
        }
    }

    #[test]
    fn test_sentinels_are_not_retryable() {
        assert!(!ApiError::NotFound.is_retryable());
        assert!(!ApiError::NoContent.is_retryable());
        assert!(!ApiError::NotSupported("ITSM".into()).is_retryable());
    }

    #[test]
    fn test_status_message_carries_method_url_and_body() {
        let err = status_error(400, r#"{"message":"bad name"}"#);
        let text = err.to_string();
        assert!(text.contains("GET"));
        assert!(text.contains("/api/apps"));
        assert!(text.contains("400"));
        assert!(text.contains("bad name"));
    }

    #[test]
    fn test_long_body_is_truncated_in_message_only() {
        let body = "x".repeat(2000);
        let err = status_error(500, &body);
        assert!(err.to_string().contains("[truncated]"));
        if let ApiError::Status { body: kept, .. } = err {
            assert_eq!(kept.len(), 2000);
        }
    }

    #[test]
    fn test_error_code_extraction() {
        let err = status_error(
            400,
            r#"{"status":400,"message":"nope","errorCode":"PA-0011","details":"x"}"#,
        );
        assert_eq!(err.error_code().as_deref(), Some("PA-0011"));

        let wrapped = ApiError::RetriesExhausted {
            attempts: 4,
            last: Box::new(status_error(503, "")),
        };
        assert_eq!(wrapped.status(), Some(503));
        assert!(wrapped.error_code().is_none());
    }

    #[test]
    fn test_remote_error_text() {
        let body = RemoteErrorBody::parse(r#"{"message":"Invalid","details":"name is taken"}"#)
            .unwrap();
        assert_eq!(body.text(), "Invalid: name is taken");
    }
}
