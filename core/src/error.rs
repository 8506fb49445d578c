//! Error normalization.
//!
//! # Design
//! Every failure mode of a request (timeout, transport failure, non-2xx
//! status, undecodable body) funnels into one public [`ServiceError`] with a
//! stable machine-readable [`ErrorCode`]. Callers branch on the code, render
//! [`ServiceError::user_message`], or inspect the raw `details` payload the
//! server sent; they never see transport internals.
//!
//! Inside the crate, each retry attempt produces a [`RequestFailure`] first.
//! Normalization happens exactly once, after the last attempt.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Stable failure category attached to every [`ServiceError`].
///
/// Servers may return their own code in the error body (`{"code": ...}`);
/// unknown values are preserved verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    Timeout,
    NetworkError,
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationError,
    UnknownError,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
            ErrorCode::Other(code) => code,
        }
    }

    /// Map a code string from an error body back to the known set.
    fn from_wire(code: &str) -> Self {
        match code {
            "TIMEOUT" => ErrorCode::Timeout,
            "NETWORK_ERROR" => ErrorCode::NetworkError,
            "UNAUTHORIZED" => ErrorCode::Unauthorized,
            "FORBIDDEN" => ErrorCode::Forbidden,
            "NOT_FOUND" => ErrorCode::NotFound,
            "VALIDATION_ERROR" => ErrorCode::ValidationError,
            "UNKNOWN_ERROR" => ErrorCode::UnknownError,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    /// Fallback classification when the error body carries no code.
    fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            400 | 422 => ErrorCode::ValidationError,
            _ => ErrorCode::UnknownError,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized failure returned by every manager and service call.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ServiceError {
    /// Human-readable description, preferring the server's own message.
    pub message: String,
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Stable category for programmatic handling.
    pub code: ErrorCode,
    /// Parsed error body, when the server sent JSON.
    pub details: Option<Value>,
}

impl ServiceError {
    /// Short message suitable for direct display, keyed on the code with the
    /// raw message as fallback.
    pub fn user_message(&self) -> String {
        match self.code {
            ErrorCode::NetworkError => "Check your network connection".to_string(),
            ErrorCode::Timeout => "The request timed out, try again".to_string(),
            ErrorCode::Unauthorized => "You need to sign in first".to_string(),
            ErrorCode::Forbidden => "You do not have permission for this action".to_string(),
            ErrorCode::NotFound => "The requested record was not found".to_string(),
            ErrorCode::ValidationError => "Check the information you entered".to_string(),
            _ if self.message.is_empty() => "Something went wrong".to_string(),
            _ => self.message.clone(),
        }
    }

    /// Emit a structured log line for this error under the given context
    /// (typically `"ServiceName.method"`).
    pub fn log(&self, context: &str) {
        tracing::error!(
            context,
            code = %self.code,
            status = self.status,
            details = ?self.details,
            "{}",
            self.message
        );
    }

    pub(crate) fn serialize_failure(err: serde_json::Error) -> Self {
        Self {
            message: format!("failed to serialize request body: {err}"),
            status: None,
            code: ErrorCode::UnknownError,
            details: None,
        }
    }

    pub(crate) fn decode_failure(err: serde_json::Error) -> Self {
        Self {
            message: format!("failed to decode response body: {err}"),
            status: None,
            code: ErrorCode::UnknownError,
            details: None,
        }
    }
}

/// One attempt's failure, before normalization.
///
/// The retry loop matches on this to decide logging; only the final attempt's
/// value reaches [`ServiceError::from`].
#[derive(Debug, Error)]
pub(crate) enum RequestFailure {
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("HTTP {status}")]
    Status { status: u16, body: String },
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<RequestFailure> for ServiceError {
    fn from(failure: RequestFailure) -> Self {
        match failure {
            RequestFailure::Timeout(limit) => ServiceError {
                message: format!("request timed out after {}ms", limit.as_millis()),
                status: None,
                code: ErrorCode::Timeout,
                details: None,
            },
            RequestFailure::Transport(err) => ServiceError {
                message: err.to_string(),
                status: None,
                code: ErrorCode::NetworkError,
                details: None,
            },
            RequestFailure::Status { status, body } => {
                let details: Option<Value> = serde_json::from_str(&body).ok();
                let code = details
                    .as_ref()
                    .and_then(|value| value.get("code"))
                    .and_then(Value::as_str)
                    .map(ErrorCode::from_wire)
                    .unwrap_or_else(|| ErrorCode::from_status(status));
                let message = details
                    .as_ref()
                    .and_then(|value| value.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| canonical_reason(status).map(str::to_string))
                    .unwrap_or_else(|| "API Error".to_string());
                ServiceError {
                    message,
                    status: Some(status),
                    code,
                    details,
                }
            }
            RequestFailure::Decode(err) => ServiceError::decode_failure(err),
        }
    }
}

fn canonical_reason(status: u16) -> Option<&'static str> {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn timeout_maps_to_timeout_code() {
        let error = ServiceError::from(RequestFailure::Timeout(Duration::from_millis(250)));
        assert_eq!(error.code, ErrorCode::Timeout);
        assert_eq!(error.status, None);
        assert!(error.message.contains("250ms"));
    }

    #[test]
    fn transport_failure_maps_to_network_error() {
        let failure = RequestFailure::Transport(TransportError::Connect(
            "connection refused".to_string(),
        ));
        let error = ServiceError::from(failure);
        assert_eq!(error.code, ErrorCode::NetworkError);
        assert_eq!(error.status, None);
        assert!(error.message.contains("connection refused"));
    }

    #[test]
    fn status_without_body_falls_back_to_status_classification() {
        let error = ServiceError::from(RequestFailure::Status {
            status: 401,
            body: String::new(),
        });
        assert_eq!(error.code, ErrorCode::Unauthorized);
        assert_eq!(error.status, Some(401));
        assert_eq!(error.message, "Unauthorized");
        assert!(error.details.is_none());
    }

    #[test]
    fn status_classification_covers_the_table() {
        let code_for = |status: u16| {
            ServiceError::from(RequestFailure::Status {
                status,
                body: String::new(),
            })
            .code
        };
        assert_eq!(code_for(403), ErrorCode::Forbidden);
        assert_eq!(code_for(404), ErrorCode::NotFound);
        assert_eq!(code_for(400), ErrorCode::ValidationError);
        assert_eq!(code_for(422), ErrorCode::ValidationError);
        assert_eq!(code_for(500), ErrorCode::UnknownError);
        assert_eq!(code_for(503), ErrorCode::UnknownError);
    }

    #[test]
    fn server_supplied_code_and_message_win() {
        let body = json!({"code": "VALIDATION_ERROR", "message": "email is taken"});
        let error = ServiceError::from(RequestFailure::Status {
            status: 500,
            body: body.to_string(),
        });
        assert_eq!(error.code, ErrorCode::ValidationError);
        assert_eq!(error.message, "email is taken");
        assert_eq!(error.status, Some(500));
        assert_eq!(error.details, Some(body));
    }

    #[test]
    fn unknown_server_code_is_preserved() {
        let error = ServiceError::from(RequestFailure::Status {
            status: 429,
            body: json!({"code": "QUOTA_EXCEEDED", "message": "slow down"}).to_string(),
        });
        assert_eq!(error.code, ErrorCode::Other("QUOTA_EXCEEDED".to_string()));
        assert_eq!(error.code.as_str(), "QUOTA_EXCEEDED");
    }

    #[test]
    fn non_json_error_body_keeps_reason_phrase() {
        let error = ServiceError::from(RequestFailure::Status {
            status: 404,
            body: "<html>not json</html>".to_string(),
        });
        assert_eq!(error.code, ErrorCode::NotFound);
        assert_eq!(error.message, "Not Found");
        assert!(error.details.is_none());
    }

    #[test]
    fn user_message_prefers_category_then_raw_message() {
        let timeout = ServiceError {
            message: "request timed out after 10ms".to_string(),
            status: None,
            code: ErrorCode::Timeout,
            details: None,
        };
        assert_eq!(timeout.user_message(), "The request timed out, try again");

        let custom = ServiceError {
            message: "quota exhausted for key".to_string(),
            status: Some(429),
            code: ErrorCode::Other("QUOTA_EXCEEDED".to_string()),
            details: None,
        };
        assert_eq!(custom.user_message(), "quota exhausted for key");

        let empty = ServiceError {
            message: String::new(),
            status: None,
            code: ErrorCode::UnknownError,
            details: None,
        };
        assert_eq!(empty.user_message(), "Something went wrong");
    }
}
