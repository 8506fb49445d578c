//! HTTP wire types shared by the manager and its transports.
//!
//! # Design
//! Requests and responses are described as plain data. The manager assembles
//! `HttpRequest` values (url, headers, body) and interprets `HttpResponse`
//! values; only the transport layer touches the network. This separation keeps
//! the request pipeline deterministic and lets tests drive it with scripted
//! responses instead of sockets.
//!
//! All fields use owned types (`String`, `Vec`) so values can be rebuilt and
//! handed to interceptors by value on every retry attempt.

use std::fmt;

use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Methods that never carry a request body.
    pub fn is_bodyless(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Options)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload: a JSON document or a multipart form.
///
/// JSON bodies are serialized by the transport and sent with an
/// `application/json` content type. Form bodies are handed to the HTTP layer
/// unserialized so it can pick the multipart boundary itself.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Form(MultipartForm),
}

/// A multipart form built part by part.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            data: value.into().into_bytes(),
            filename: None,
            content_type: None,
        });
        self
    }

    /// Append a file field with a filename and content type.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            data,
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
        });
        self
    }
}

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

/// An HTTP request described as plain data.
///
/// Assembled by the manager once per attempt, then passed through the request
/// interceptor (if any) before the transport executes it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Produced by the transport, then passed through the response interceptor
/// (if any) before the manager inspects status and body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodyless_methods() {
        assert!(HttpMethod::Get.is_bodyless());
        assert!(HttpMethod::Head.is_bodyless());
        assert!(HttpMethod::Options.is_bodyless());
        assert!(!HttpMethod::Post.is_bodyless());
        assert!(!HttpMethod::Delete.is_bodyless());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn form_builder_collects_parts() {
        let form = MultipartForm::new()
            .text("kind", "avatar")
            .file("file", "me.png", "image/png", vec![1, 2, 3]);

        assert_eq!(form.parts.len(), 2);
        assert_eq!(form.parts[0].name, "kind");
        assert_eq!(form.parts[0].data, b"avatar");
        assert!(form.parts[0].filename.is_none());
        assert_eq!(form.parts[1].filename.as_deref(), Some("me.png"));
        assert_eq!(form.parts[1].content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn success_covers_2xx_only() {
        let mut response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 204;
        assert!(response.is_success());
        response.status = 301;
        assert!(!response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }
}
