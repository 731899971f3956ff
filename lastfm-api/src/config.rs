//! Client configuration.

use std::time::Duration;

/// Public Last.fm API 2.0 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";
/// Per-request timeout unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Application credentials and endpoint settings.
///
/// The API key identifies the application on every call; the secret is only
/// used to compute signatures and is never sent.
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `None` leaves the timeout to the transport.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keep the secret out of logs and panic messages.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ApiConfig::new("key", "secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn debug_hides_secret() {
        let config = ApiConfig::new("key", "hunter2").with_base_url("http://localhost/");
        let dbg = format!("{config:?}");
        assert!(dbg.contains("key"));
        assert!(!dbg.contains("hunter2"));
    }
}
