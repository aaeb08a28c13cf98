//! HTTP client utilities
//!
//! Common construction of the `reqwest` client used to reach the verifier.

use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout (connect + body)
    pub request_timeout: Duration,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("presence/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Error when building the HTTP client or an endpoint URL
#[derive(Debug, thiserror::Error)]
pub enum HttpSetupError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build a `reqwest::Client` from configuration
pub fn build_client(config: &HttpClientConfig) -> Result<reqwest::Client, HttpSetupError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Join a base URL and an endpoint path
///
/// Exactly one slash separates the two parts regardless of how either side
/// is written.
///
/// ## Returns
/// * `Ok(String)` - `http(s)://host[:port]/prefix/path`
/// * `Err(HttpSetupError)` - base URL without an http(s) scheme or host
pub fn join_url(base: &str, path: &str) -> Result<String, HttpSetupError> {
    let base = base.trim();
    let host_part = base
        .strip_prefix("http://")
        .or_else(|| base.strip_prefix("https://"))
        .ok_or_else(|| HttpSetupError::InvalidBaseUrl(base.to_string()))?;
    if host_part.trim_matches('/').is_empty() {
        return Err(HttpSetupError::InvalidBaseUrl(base.to_string()));
    }

    let base = base.trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');
    if path.is_empty() {
        return Ok(base.to_string());
    }
    Ok(format!("{}/{}", base, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_slashes() {
        assert_eq!(
            join_url("http://127.0.0.1:5000", "/start_session").unwrap(),
            "http://127.0.0.1:5000/start_session"
        );
        assert_eq!(
            join_url("http://127.0.0.1:5000/", "process_frame").unwrap(),
            "http://127.0.0.1:5000/process_frame"
        );
        assert_eq!(
            join_url("https://verifier.example/api/", "/predict").unwrap(),
            "https://verifier.example/api/predict"
        );
    }

    #[test]
    fn test_join_url_empty_path() {
        assert_eq!(
            join_url("http://localhost:5000/", "").unwrap(),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_join_url_rejects_missing_scheme() {
        let result = join_url("localhost:5000", "/predict");
        assert!(matches!(result, Err(HttpSetupError::InvalidBaseUrl(_))));

        let result = join_url("http://", "/predict");
        assert!(matches!(result, Err(HttpSetupError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_build_client_default() {
        let client = build_client(&HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_user_agent() {
        let config = HttpClientConfig::default();
        assert!(config.user_agent.starts_with("presence/"));
    }
}
