//! Client configuration.
//!
//! # Design
//! `ApiConfig` is plain data: one value per manager, captured at construction
//! and never read from globals afterwards. Defaults point at the public
//! fixture API; deployments override through `API_*` environment variables,
//! read once by [`ApiConfig::from_env`].

use std::time::Duration;

/// Deployment profile. Selected with `API_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Read the profile from `API_ENV`, defaulting to development.
    pub fn from_env() -> Self {
        match std::env::var("API_ENV").as_deref() {
            Ok("production") => Environment::Production,
            Ok("staging") => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Settings applied to every request a manager sends.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Upstream base, without a trailing slash.
    pub base_url: String,
    /// Headers attached to every request before per-call headers.
    pub headers: Vec<(String, String)>,
    /// Per-attempt time limit.
    pub timeout: Duration,
    /// Retries after the first failed attempt (so `retries + 1` attempts).
    pub retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            timeout: Duration::from_secs(10),
            retries: 3,
        }
    }
}

impl ApiConfig {
    /// Preset for a deployment profile.
    ///
    /// Every profile currently shares the public fixture upstream; profiles
    /// differ only in what deployments override via `API_*` variables.
    pub fn for_environment(_env: Environment) -> Self {
        Self::default()
    }

    /// Build the active configuration: profile preset plus `API_BASE_URL`,
    /// `API_TIMEOUT_MS` and `API_RETRIES` overrides.
    pub fn from_env() -> Self {
        let mut config = Self::for_environment(Environment::from_env());
        if let Ok(value) = std::env::var("API_BASE_URL") {
            config.base_url = value;
        }
        if let Ok(value) = std::env::var("API_TIMEOUT_MS") {
            if let Ok(ms) = value.parse::<u64>() {
                config.timeout = Duration::from_millis(ms);
            }
        }
        if let Ok(value) = std::env::var("API_RETRIES") {
            if let Ok(count) = value.parse::<u32>() {
                config.retries = count;
            }
        }
        config
    }
}
