//! Async API client with retries, timeouts and pluggable interceptors.
//!
//! # Overview
//! [`ServiceManager`] runs every request through one pipeline: assemble the
//! wire request from configuration plus per-call options, apply the request
//! interceptor, execute under a per-attempt timeout, apply the response
//! interceptor, then shape the reply by method. Failed attempts are retried
//! sequentially; the terminal failure is normalized into a [`ServiceError`]
//! with a stable [`ErrorCode`]. Entity endpoints (users, posts, comments,
//! products, notifications, settings) are thin tables over the manager,
//! reached through accessor methods such as [`ServiceManager::users`].
//!
//! # Design
//! - Requests and responses are plain data (`http` module); the network sits
//!   behind the [`HttpTransport`] trait, so tests script exchanges instead of
//!   opening sockets.
//! - Interceptors are single-slot per hook: setting one replaces the last.
//! - Normalization happens once, after the retry budget is spent; callers
//!   never see transport internals.
//! - Service modules hold no state; they borrow the manager per call, and
//!   integration tests catch schema drift against the mock server.

pub mod config;
pub mod error;
pub mod http;
pub mod manager;
pub mod services;
pub mod transport;

pub use config::{ApiConfig, Environment};
pub use error::{ErrorCode, ServiceError};
pub use http::{Body, FormPart, HttpMethod, HttpRequest, HttpResponse, MultipartForm};
pub use manager::{RequestInterceptor, RequestOptions, ResponseInterceptor, ServiceManager};
pub use services::{
    CommentService, NotificationService, PostService, ProductService, SettingsService, UserService,
};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
