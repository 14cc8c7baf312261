//! PAM Client
//!
//! Main client for the PAM REST API, combining the transport, retry policy,
//! named locks and the per-cycle cache. The typed operations live in
//! [`crate::api`] as further `impl PamClient` blocks.

use super::cache::CycleCache;
use super::classify::{classify, into_result};
use super::error::{ApiError, ApiResult};
use super::http::{user_agent, ApiRequest, RequestBody, ReqwestTransport, Transport, DEFAULT_TIMEOUT};
use super::locks::LockRegistry;
use super::retry::RetryPolicy;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Default host-client token appended to the user agent
pub const DEFAULT_HOST_AGENT: &str = "orchestrator/unknown";

/// Everything needed to construct a [`PamClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Tenant base URL, e.g. `https://acme.example.com`
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub host_agent: String,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            host_agent: DEFAULT_HOST_AGENT.to_string(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_host_agent(mut self, host_agent: impl Into<String>) -> Self {
        self.host_agent = host_agent.into();
        self
    }
}

/// Main PAM client; cheap to clone, safe to share between tasks
#[derive(Clone)]
pub struct PamClient {
    host_url: String,
    api_base_url: String,
    token: String,
    user_agent: String,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
    locks: LockRegistry,
    cache: CycleCache,
}

impl std::fmt::Debug for PamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PamClient")
            .field("host_url", &self.host_url)
            .field("api_base_url", &self.api_base_url)
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl PamClient {
    /// Create a client backed by a pooled reqwest transport
    pub fn new(options: ClientOptions) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(options.timeout)?;
        Self::with_transport(options, Arc::new(transport))
    }

    /// Create a client over any [`Transport`] (tests use fakes)
    pub fn with_transport(options: ClientOptions, transport: Arc<dyn Transport>) -> ApiResult<Self> {
        if options.token.trim().is_empty() {
            return Err(ApiError::validation("token must not be empty"));
        }
        let base = options.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(ApiError::validation("base URL must not be empty"));
        }

        Ok(Self {
            host_url: format!("{}/api", base),
            api_base_url: format!("{}/api", base),
            token: options.token,
            user_agent: user_agent(&options.host_agent),
            retry: options.retry,
            transport,
            locks: LockRegistry::new(),
            cache: CycleCache::new(),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    pub fn cache(&self) -> &CycleCache {
        &self.cache
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Legacy prefix: users, tags, applications, profile tag/identity membership
    pub fn host_url(&self, path: &str) -> String {
        format!("{}/{}", self.host_url, path.trim_start_matches('/'))
    }

    /// Current prefix for everything else
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    // =========================================================================
    // Request execution
    // =========================================================================

    /// Execute a request with retries; body bytes for 2xx, a classified error otherwise
    pub async fn do_request(&self, request: ApiRequest) -> ApiResult<Vec<u8>> {
        let request = request.with_standard_headers(&self.token, &self.user_agent)?;
        let operation = format!("{} {}", request.method, request.url);
        self.retry
            .execute(&operation, || self.send_once(&request))
            .await
    }

    /// Same as [`Self::do_request`] while holding the named lock, retries included
    pub async fn do_with_lock(&self, request: ApiRequest, lock_name: &str) -> ApiResult<Vec<u8>> {
        let _guard = self.locks.acquire(lock_name).await;
        tracing::trace!(lock = lock_name, "lock acquired");
        self.do_request(request).await
    }

    async fn send_once(&self, request: &ApiRequest) -> ApiResult<Vec<u8>> {
        let response = self.transport.send(request).await?;
        let outcome = classify(response.status, &response.body);
        into_result(
            outcome,
            request.method.as_str(),
            &request.url,
            response.status,
            &response.body,
        )
    }

    async fn dispatch(&self, request: ApiRequest, lock: Option<&str>) -> ApiResult<Vec<u8>> {
        match lock {
            Some(name) => self.do_with_lock(request, name).await,
            None => self.do_request(request).await,
        }
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// GET and decode; an empty body is `NotFound`
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let bytes = self.do_request(ApiRequest::new(Method::GET, url)).await?;
        if is_blank(&bytes) {
            return Err(ApiError::NotFound);
        }
        decode(url, &bytes)
    }

    /// GET a list; an empty body decodes as an empty list
    pub async fn get_list<T: DeserializeOwned>(&self, url: &str) -> ApiResult<Vec<T>> {
        match self.do_request(ApiRequest::new(Method::GET, url)).await {
            Ok(bytes) if is_blank(&bytes) => Ok(Vec::new()),
            Ok(bytes) => decode(url, &bytes),
            Err(ApiError::NoContent) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    /// GET a list and return its first element; empty lists are `NotFound`
    pub async fn get_first<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        self.get_list(url).await?.into_iter().next().ok_or(ApiError::NotFound)
    }

    /// GET through the per-cycle cache
    pub async fn get_cached<T>(&self, url: &str) -> ApiResult<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.cache.get_or_fetch(url, || self.get_json::<T>(url)).await
    }

    /// Send a JSON body. `Ok(None)` for 204 or an empty 2xx body.
    pub async fn send_json<B, T>(&self, method: Method, url: &str, body: Option<&B>, lock: Option<&str>) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = ApiRequest::new(method, url);
        if let Some(body) = body {
            request = request.with_body(RequestBody::Json(serde_json::to_vec(body)?));
        }
        match self.dispatch(request, lock).await {
            Ok(bytes) if is_blank(&bytes) => Ok(None),
            Ok(bytes) => decode(url, &bytes).map(Some),
            Err(ApiError::NoContent) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Mutate with `input` as the body; when the remote answers without a
    /// document the caller's input is returned unchanged
    pub async fn mutate<T>(&self, method: Method, url: &str, input: &T, lock: &str) -> ApiResult<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let response = self.send_json::<T, T>(method, url, Some(input), Some(lock)).await?;
        Ok(response.unwrap_or_else(|| input.clone()))
    }

    /// Send without caring about the response document
    pub async fn send_unit<B>(&self, method: Method, url: &str, body: Option<&B>, lock: Option<&str>) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_json::<B, serde_json::Value>(method, url, body, lock).await.map(|_| ())
    }

    /// DELETE; `NoContent` counts as success
    pub async fn delete(&self, url: &str, lock: &str) -> ApiResult<()> {
        match self.do_with_lock(ApiRequest::new(Method::DELETE, url), lock).await {
            Ok(_) | Err(ApiError::NoContent) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Send a pre-built body (raw or multipart); `NoContent` counts as success
    pub async fn send_body(&self, method: Method, url: &str, body: RequestBody, lock: Option<&str>) -> ApiResult<Vec<u8>> {
        match self.dispatch(ApiRequest::new(method, url).with_body(body), lock).await {
            Err(ApiError::NoContent) => Ok(Vec::new()),
            other => other,
        }
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| b.is_ascii_whitespace())
}

fn decode<T: DeserializeOwned>(url: &str, bytes: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(bytes).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Percent-encode a value for use in a path segment or query string
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pam::http::RawResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned responses and records requests
    struct Scripted {
        responses: Mutex<Vec<RawResponse>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Scripted {
        fn new(mut responses: Vec<(u16, &str)>) -> Arc<Self> {
            responses.reverse();
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| RawResponse { status, body: body.as_bytes().to_vec() })
                        .collect(),
                ),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn send(&self, request: &ApiRequest) -> ApiResult<RawResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.responses.lock().unwrap().pop().expect("unexpected request"))
        }
    }

    fn client(transport: Arc<Scripted>) -> PamClient {
        let options = ClientOptions::new("https://acme.example.com/", "tok")
            .with_retry(RetryPolicy::new(3, Duration::ZERO));
        PamClient::with_transport(options, transport).unwrap()
    }

    #[test]
    fn test_url_builders() {
        let c = client(Scripted::new(vec![]));
        assert_eq!(c.host_url("/apps"), "https://acme.example.com/api/apps");
        assert_eq!(c.api_url("v1/policy-admin/roles"), "https://acme.example.com/api/v1/policy-admin/roles");
    }

    #[test]
    fn test_empty_token_rejected() {
        let options = ClientOptions::new("https://acme.example.com", "  ");
        assert!(PamClient::with_transport(options, Scripted::new(vec![])).is_err());
    }

    #[tokio::test]
    async fn test_get_json_empty_body_is_not_found() {
        let c = client(Scripted::new(vec![(200, "")]));
        let result: ApiResult<serde_json::Value> = c.get_json(&c.host_url("apps/A1")).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_first_empty_array_is_not_found() {
        let c = client(Scripted::new(vec![(200, "[]")]));
        let result: ApiResult<serde_json::Value> = c.get_first(&c.host_url("apps?name=x")).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_mutate_no_content_returns_input() {
        let c = client(Scripted::new(vec![(204, "")]));
        let input = serde_json::json!({"name": "p"});
        let out = c.mutate(Method::PATCH, &c.api_url("paps/P1"), &input, "profile").await.unwrap();
        assert_eq!(out, input);
    }

    #[tokio::test]
    async fn test_every_attempt_carries_standard_headers() {
        let transport = Scripted::new(vec![(503, ""), (200, "{}")]);
        let c = client(transport.clone());
        let _: serde_json::Value = c.get_json(&c.api_url("paps/P1")).await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for request in seen.iter() {
            assert_eq!(request.headers.get("authorization").unwrap(), "TOKEN tok");
            assert_eq!(request.headers.get("content-type").unwrap(), "application/json");
            assert!(request.headers.get("user-agent").unwrap().to_str().unwrap().starts_with("pam-provider/"));
        }
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let c = client(Scripted::new(vec![(204, "")]));
        c.delete(&c.api_url("paps/P1"), "profile").await.unwrap();
    }
}
