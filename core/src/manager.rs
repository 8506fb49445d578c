//! Request dispatch: assembly, interceptors, timeout, retries, shaping.
//!
//! # Design
//! `ServiceManager` owns an [`ApiConfig`] and a transport, and runs every
//! request through one pipeline. Each attempt rebuilds the request from
//! scratch (config headers, per-call overrides, body rule), passes it through
//! the request interceptor, executes it under a `tokio::time::timeout`, and
//! passes the response through the response interceptor before inspecting the
//! status. Failed attempts are retried sequentially with a fixed backoff
//! until the retry budget is spent; only then is the failure normalized into
//! a [`ServiceError`].
//!
//! Interceptors are single-slot: setting one replaces the previous one.
//! All mutation (interceptors, auth token) goes through `&mut self`, so a
//! shared manager is immutable by construction.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::error::{RequestFailure, ServiceError};
use crate::http::{Body, HttpMethod, HttpRequest, HttpResponse, MultipartForm};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Pause between a failed attempt and the next one.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Hook that may rewrite the fully assembled request of each attempt.
pub type RequestInterceptor = Box<dyn Fn(HttpRequest) -> HttpRequest + Send + Sync>;

/// Hook that may rewrite each raw response before the status is inspected.
pub type ResponseInterceptor = Box<dyn Fn(HttpResponse) -> HttpResponse + Send + Sync>;

/// Per-call overrides layered over the manager's [`ApiConfig`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Request payload. JSON bodies are dropped for GET/HEAD/OPTIONS.
    pub body: Option<Body>,
    /// Headers merged over the config defaults; a same-name header wins.
    pub headers: Vec<(String, String)>,
    /// Overrides the configured retry budget for this call.
    pub retries: Option<u32>,
    /// Overrides the configured per-attempt timeout for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options carrying a JSON body.
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ServiceError> {
        let value = serde_json::to_value(body).map_err(ServiceError::serialize_failure)?;
        Ok(Self {
            body: Some(Body::Json(value)),
            ..Self::default()
        })
    }

    /// Options carrying a multipart form body.
    pub fn form(form: MultipartForm) -> Self {
        Self {
            body: Some(Body::Form(form)),
            ..Self::default()
        }
    }
}

/// Successful outcome of one attempt, shaped by method before typed decoding:
/// HEAD and OPTIONS surface headers, DELETE nothing, everything else a JSON
/// document.
enum Reply {
    Json(Value),
    Headers(Vec<(String, String)>),
    Empty,
}

/// HTTP dispatcher with per-attempt timeout, sequential retries and
/// single-slot interceptors.
///
/// One value per upstream API; construction captures the configuration and
/// all later requests use it. Entity endpoints hang off the accessor methods
/// (`users()`, `posts()`, ...) defined next to their DTOs.
pub struct ServiceManager {
    config: ApiConfig,
    transport: Arc<dyn HttpTransport>,
    request_interceptor: Option<RequestInterceptor>,
    response_interceptor: Option<ResponseInterceptor>,
}

impl ServiceManager {
    /// Manager for the given base url with the bare-constructor defaults:
    /// a JSON content type, a 10 second timeout and no retries. Use
    /// [`Self::from_config`] to apply an [`ApiConfig`] profile instead.
    pub fn new(base_url: &str) -> Self {
        Self::from_config(ApiConfig {
            base_url: base_url.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            timeout: Duration::from_secs(10),
            retries: 0,
        })
    }

    /// Manager over the production transport.
    pub fn from_config(config: ApiConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Manager over a caller-supplied transport.
    pub fn with_transport(mut config: ApiConfig, transport: Arc<dyn HttpTransport>) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            config,
            transport,
            request_interceptor: None,
            response_interceptor: None,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Install the request interceptor, replacing any previous one.
    pub fn set_request_interceptor<F>(&mut self, interceptor: F)
    where
        F: Fn(HttpRequest) -> HttpRequest + Send + Sync + 'static,
    {
        self.request_interceptor = Some(Box::new(interceptor));
    }

    pub fn clear_request_interceptor(&mut self) {
        self.request_interceptor = None;
    }

    /// Install the response interceptor, replacing any previous one.
    pub fn set_response_interceptor<F>(&mut self, interceptor: F)
    where
        F: Fn(HttpResponse) -> HttpResponse + Send + Sync + 'static,
    {
        self.response_interceptor = Some(Box::new(interceptor));
    }

    pub fn clear_response_interceptor(&mut self) {
        self.response_interceptor = None;
    }

    /// Attach `Authorization: Bearer <token>` to every following request.
    pub fn set_auth_token(&mut self, token: &str) {
        upsert_header(
            &mut self.config.headers,
            "Authorization",
            &format!("Bearer {token}"),
        );
    }

    /// Drop the authorization header installed by [`Self::set_auth_token`].
    pub fn remove_auth_token(&mut self) {
        self.config
            .headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
    }

    /// Send a request and decode the JSON reply into `T`.
    ///
    /// For DELETE/HEAD/OPTIONS (which produce no JSON document) `T` decodes
    /// from `null`; use the dedicated helpers to reach headers instead.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ServiceError> {
        let value = match self.request_core(method, path, &options).await? {
            Reply::Json(value) => value,
            Reply::Headers(_) | Reply::Empty => Value::Null,
        };
        serde_json::from_value(value).map_err(ServiceError::decode_failure)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        self.request(HttpMethod::Get, path, RequestOptions::default())
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, path, RequestOptions::json(body)?)
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, path, RequestOptions::json(body)?)
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Patch, path, RequestOptions::json(body)?)
            .await
    }

    /// Send a DELETE; the response body is discarded, not decoded.
    pub async fn delete(&self, path: &str) -> Result<(), ServiceError> {
        self.request_core(HttpMethod::Delete, path, &RequestOptions::default())
            .await
            .map(|_| ())
    }

    /// Send a HEAD and return the response headers.
    pub async fn head(&self, path: &str) -> Result<Vec<(String, String)>, ServiceError> {
        self.request_headers(HttpMethod::Head, path).await
    }

    /// Send an OPTIONS and return the response headers.
    pub async fn options(&self, path: &str) -> Result<Vec<(String, String)>, ServiceError> {
        self.request_headers(HttpMethod::Options, path).await
    }

    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<T, ServiceError> {
        self.request(HttpMethod::Post, path, RequestOptions::form(form))
            .await
    }

    pub async fn put_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<T, ServiceError> {
        self.request(HttpMethod::Put, path, RequestOptions::form(form))
            .await
    }

    pub async fn patch_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<T, ServiceError> {
        self.request(HttpMethod::Patch, path, RequestOptions::form(form))
            .await
    }

    async fn request_headers(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> Result<Vec<(String, String)>, ServiceError> {
        match self.request_core(method, path, &RequestOptions::default()).await? {
            Reply::Headers(headers) => Ok(headers),
            Reply::Json(_) | Reply::Empty => Ok(Vec::new()),
        }
    }

    /// The retry loop. Runs attempts until one succeeds or the budget is
    /// spent, then normalizes the last failure.
    async fn request_core(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Reply, ServiceError> {
        let retries = options.retries.unwrap_or(self.config.retries);
        let timeout = options.timeout.unwrap_or(self.config.timeout);

        let mut attempt: u32 = 0;
        loop {
            match self.attempt_once(method, path, options, timeout).await {
                Ok(reply) => return Ok(reply),
                Err(failure) if attempt == retries => {
                    let error = ServiceError::from(failure);
                    error!(
                        method = %method,
                        path,
                        code = %error.code,
                        status = error.status,
                        "request failed: {}",
                        error.message
                    );
                    return Err(error);
                }
                Err(failure) => {
                    warn!(
                        method = %method,
                        path,
                        attempt = attempt + 1,
                        retries,
                        error = %failure,
                        "retrying request"
                    );
                    attempt += 1;
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
            }
        }
    }

    /// One full attempt: assemble, intercept, execute under the timeout,
    /// intercept the response, check status, shape the reply by method.
    async fn attempt_once(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<Reply, RequestFailure> {
        let mut request = self.assemble(method, path, options);
        if let Some(intercept) = &self.request_interceptor {
            request = intercept(request);
        }

        // Dropping the in-flight future on expiry aborts only this attempt.
        let response = match tokio::time::timeout(timeout, self.transport.execute(request)).await {
            Ok(outcome) => outcome?,
            Err(_) => return Err(RequestFailure::Timeout(timeout)),
        };

        let response = match &self.response_interceptor {
            Some(intercept) => intercept(response),
            None => response,
        };
        debug!(method = %method, path, status = response.status, "response received");

        if !response.is_success() {
            return Err(RequestFailure::Status {
                status: response.status,
                body: response.body,
            });
        }

        match method {
            HttpMethod::Head | HttpMethod::Options => Ok(Reply::Headers(response.headers)),
            HttpMethod::Delete => Ok(Reply::Empty),
            _ => Ok(Reply::Json(serde_json::from_str(&response.body)?)),
        }
    }

    /// Build the wire request for one attempt: config headers, per-call
    /// overrides, then the body rule.
    fn assemble(&self, method: HttpMethod, path: &str, options: &RequestOptions) -> HttpRequest {
        let url = format!("{}{}", self.config.base_url, path);

        let mut headers = self.config.headers.clone();
        for (name, value) in &options.headers {
            upsert_header(&mut headers, name, value);
        }

        let body = match &options.body {
            Some(Body::Json(value)) if !method.is_bodyless() => {
                upsert_header(&mut headers, "Content-Type", "application/json");
                Some(Body::Json(value.clone()))
            }
            // GET/HEAD/OPTIONS never send a JSON body.
            Some(Body::Json(_)) => None,
            Some(Body::Form(form)) => {
                // The HTTP layer must pick the multipart boundary itself, so
                // no preset content type may survive.
                headers.retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
                Some(Body::Form(form.clone()))
            }
            None => None,
        };

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

/// Replace a header in place or append it, matching names case-insensitively.
fn upsert_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers
        .iter_mut()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}
