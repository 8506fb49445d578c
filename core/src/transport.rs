//! Pluggable request execution.
//!
//! # Design
//! `HttpTransport` is the only seam that touches the network. The manager
//! hands it a fully assembled [`HttpRequest`] and gets back a plain
//! [`HttpResponse`] regardless of status code; classifying non-2xx responses
//! is the manager's job, not the transport's. The shipped implementation
//! wraps `reqwest`; tests substitute a scripted mock.

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{Body, HttpMethod, HttpRequest, HttpResponse, MultipartForm};

/// Failure raised by a transport before any HTTP status is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be constructed (bad url, header or body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The request was sent but no response came back.
    #[error("connection failed: {0}")]
    Connect(String),
    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Read(String),
}

/// Executes one HTTP exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by a shared `reqwest` client.
///
/// Connection pooling lives in the inner client, so cloning the transport is
/// cheap and all clones reuse the same pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(as_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        match request.body {
            Some(Body::Json(value)) => {
                let payload = serde_json::to_string(&value)
                    .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
                builder = builder.body(payload);
            }
            Some(Body::Form(form)) => {
                builder = builder.multipart(as_reqwest_form(form)?);
            }
            None => {}
        }

        let prepared = builder
            .build()
            .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
        let response = self
            .client
            .execute(prepared)
            .await
            .map_err(|err| TransportError::Connect(err.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Read(err.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn as_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

fn as_reqwest_form(form: MultipartForm) -> Result<reqwest::multipart::Form, TransportError> {
    let mut out = reqwest::multipart::Form::new();
    for part in form.parts {
        let mut piece = reqwest::multipart::Part::bytes(part.data);
        if let Some(filename) = part.filename {
            piece = piece.file_name(filename);
        }
        if let Some(content_type) = part.content_type {
            piece = piece
                .mime_str(&content_type)
                .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
        }
        out = out.part(part.name, piece);
    }
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;

    #[tokio::test]
    async fn mock_replays_in_order_and_records() {
        let transport = MockTransport::new();
        transport.push_status(200, "{}");
        transport.push_status(404, "");

        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/a".to_string(),
            headers: Vec::new(),
            body: None,
        };

        let first = transport.execute(request.clone()).await.unwrap();
        let second = transport.execute(request).await.unwrap();

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 404);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.requests()[0].url, "http://localhost/a");
    }
}
