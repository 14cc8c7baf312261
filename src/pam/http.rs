//! HTTP transport for PAM REST API calls

use super::error::ApiError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const CLIENT_NAME: &str = "pam-provider";

/// Version of the compiler that built this crate, recorded by `build.rs`
pub const RUSTC_VERSION: &str = match option_env!("PAM_PROVIDER_RUSTC_VERSION") {
    Some(v) => v,
    None => "unknown",
};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// `<client>/<ver> rust/<ver> <os>/<arch> <host-client>/<ver>`
pub fn user_agent(host_agent: &str) -> String {
    format!(
        "{}/{} rust/{} {}/{} {}",
        CLIENT_NAME,
        env!("CARGO_PKG_VERSION"),
        RUSTC_VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH,
        host_agent
    )
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Serialized JSON; sent with `application/json`
    Json(Vec<u8>),
    /// Raw bytes with an explicit content type (icon uploads use `text/xml`)
    Raw { content_type: String, bytes: Vec<u8> },
    /// `multipart/form-data` with a single file part
    Multipart {
        field: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl RequestBody {
    pub fn content_type(&self) -> Option<&str> {
        match self {
            RequestBody::Empty | RequestBody::Json(_) => Some(JSON_CONTENT_TYPE),
            RequestBody::Raw { content_type, .. } => Some(content_type),
            // boundary is chosen by the transport
            RequestBody::Multipart { .. } => None,
        }
    }
}

/// A fully prepared request; kept by value so retries can resend it
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Set `Authorization`, `User-Agent` and (unless multipart) `Content-Type`
    pub fn with_standard_headers(mut self, token: &str, user_agent: &str) -> Result<Self, ApiError> {
        let auth = HeaderValue::from_str(&format!("TOKEN {}", token))
            .map_err(|_| ApiError::validation("token contains characters not allowed in a header"))?;
        self.headers.insert(AUTHORIZATION, auth);

        let agent = HeaderValue::from_str(user_agent)
            .map_err(|_| ApiError::validation("user agent contains invalid characters"))?;
        self.headers.insert(USER_AGENT, agent);

        match self.body.content_type() {
            Some(content_type) => {
                let value = HeaderValue::from_str(content_type)
                    .map_err(|_| ApiError::validation(format!("invalid content type {}", content_type)))?;
                self.headers.insert(CONTENT_TYPE, value);
            },
            None => {
                self.headers.remove(CONTENT_TYPE);
            },
        }
        Ok(self)
    }
}

/// Status and fully read body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One HTTP attempt. Implementations must not retry or decode.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Pooled reqwest transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::validation(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn transport_error(request: &ApiRequest, err: &reqwest::Error) -> ApiError {
        // builder errors are bugs in the request, everything else is network trouble
        let retryable = !err.is_builder();
        ApiError::Transport {
            method: request.method.to_string(),
            url: request.url.clone(),
            message: err.to_string(),
            retryable,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        tracing::debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) | RequestBody::Raw { bytes, .. } => builder.body(bytes.clone()),
            RequestBody::Multipart { field, file_name, bytes } => {
                let part = reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                builder.multipart(reqwest::multipart::Form::new().part(field.clone(), part))
            },
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Self::transport_error(request, &e))?;

        let status = response.status().as_u16();
        // bytes() drains the body and releases the connection on every path
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(request, &e))?
            .to_vec();

        if !(200..300).contains(&status) {
            tracing::error!(
                "API error: {} {} -> {} - {}",
                request.method,
                request.url,
                status,
                sanitize_for_log(&String::from_utf8_lossy(&body))
            );
        }

        Ok(RawResponse { status, body })
    }
}
