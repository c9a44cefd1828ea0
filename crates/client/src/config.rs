//! Client configuration, read from the environment.

use reqwest::Url;

use crate::error::ClientError;

pub const API_BASE_URL_VAR: &str = "CADUCADOS_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base_url: Url,
}

impl ClientConfig {
    /// Parse a base URL. Trailing slashes are dropped; only http(s) is accepted.
    pub fn new(raw: &str) -> Result<Self, ClientError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::Config(format!("{API_BASE_URL_VAR} is empty")));
        }
        let api_base_url = Url::parse(trimmed)
            .map_err(|e| ClientError::Config(format!("{trimmed:?}: {e}")))?;
        match api_base_url.scheme() {
            "http" | "https" => Ok(Self { api_base_url }),
            other => Err(ClientError::Config(format!("unsupported scheme {other:?}"))),
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        match lookup(API_BASE_URL_VAR) {
            Some(raw) if !raw.trim().is_empty() => Self::new(&raw),
            _ => Self::new(DEFAULT_API_BASE_URL),
        }
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    /// Absolute URL for a backend asset. Absolute inputs are returned as is.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.api_base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
