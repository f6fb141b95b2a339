//! Runtime configuration for the API endpoint, request timeout and credential
//! file location. Values come from CLI flags or environment variables (see
//! `cli::commands::api`) and fall back to the defaults below. Configuration is
//! public; the session token is never part of it.

use crate::errors::ApiError;
use std::{env, path::PathBuf, time::Duration};
use url::Url;

/// API base URL used when neither a flag nor `TASTYGO_API_URL` is set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
/// Client-side timeout applied to every request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// File name of the persisted bearer token inside the config directory.
pub const CREDENTIALS_FILE_NAME: &str = "token";

const APP_DIR: &str = "tastygo-admin";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub credentials_path: PathBuf,
}

impl ApiConfig {
    /// Builds a config for `base_url`, rejecting blank or non-http(s) URLs.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the URL is empty, unparsable or uses another scheme.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            credentials_path: default_credentials_path(),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_credentials_path(mut self, path: PathBuf) -> Self {
        self.credentials_path = path;
        self
    }

    /// Joins the configured base URL with an API path.
    #[must_use]
    pub fn build_url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }
}

fn normalize_base_url(value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Config("API base URL is not configured.".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|err| ApiError::Config(format!("Invalid API base URL '{trimmed}': {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        scheme => Err(ApiError::Config(format!(
            "Unsupported API base URL scheme: {scheme}"
        ))),
    }
}

fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// `$XDG_CONFIG_HOME/tastygo-admin/token`, else `$HOME/.config/tastygo-admin/token`.
/// Falls back to the working directory when neither variable is usable.
#[must_use]
pub fn default_credentials_path() -> PathBuf {
    let base = env::var("XDG_CONFIG_HOME")
        .ok()
        .and_then(|value| normalize_env_value(&value))
        .map(PathBuf::from)
        .or_else(|| {
            env::var("HOME")
                .ok()
                .and_then(|value| normalize_env_value(&value))
                .map(|home| PathBuf::from(home).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(APP_DIR).join(CREDENTIALS_FILE_NAME)
}

fn normalize_env_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
