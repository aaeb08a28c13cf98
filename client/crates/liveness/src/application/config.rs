//! Application Configuration
//!
//! Configuration for the liveness session client.

use crate::domain::value_objects::FacingMode;
use crate::error::{LivenessError, LivenessResult};
use platform::http::HttpClientConfig;
use std::time::Duration;

/// Liveness client configuration
#[derive(Debug, Clone)]
pub struct LivenessConfig {
    /// Verifier base URL, e.g. `http://127.0.0.1:5000`
    pub verifier_base_url: String,
    /// Path of the session start endpoint
    pub start_session_path: String,
    /// Path of the frame evaluation endpoint
    pub process_frame_path: String,
    /// Path of the age estimation endpoint
    pub predict_path: String,
    /// Interval between frame samples
    pub cadence_interval: Duration,
    /// Seconds granted per challenge
    pub countdown_seconds: u32,
    /// Countdown decrement period
    pub countdown_tick: Duration,
    /// Pause between a passed challenge and the next one
    pub pause_after_pass: Duration,
    /// Whole-request timeout for verifier calls
    pub request_timeout: Duration,
    /// Connect timeout for verifier calls
    pub connect_timeout: Duration,
    /// Camera requested on start
    pub facing_mode: FacingMode,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            verifier_base_url: "http://127.0.0.1:5000".to_string(),
            start_session_path: "/start_session".to_string(),
            process_frame_path: "/process_frame".to_string(),
            predict_path: "/predict".to_string(),
            cadence_interval: Duration::from_millis(1500),
            countdown_seconds: crate::domain::countdown::DEFAULT_COUNTDOWN_SECONDS,
            countdown_tick: Duration::from_secs(1),
            pause_after_pass: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            facing_mode: FacingMode::User,
        }
    }
}

impl LivenessConfig {
    /// Create config for development (verifier on localhost, short timeouts)
    pub fn development() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            ..Default::default()
        }
    }

    /// Defaults overlaid with `PRESENCE_*` environment variables
    pub fn from_env() -> LivenessResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary key lookup
    ///
    /// Recognised keys:
    /// - `PRESENCE_VERIFIER_URL`
    /// - `PRESENCE_START_SESSION_PATH`, `PRESENCE_PROCESS_FRAME_PATH`, `PRESENCE_PREDICT_PATH`
    /// - `PRESENCE_CADENCE_MS`, `PRESENCE_COUNTDOWN_SECONDS`, `PRESENCE_PAUSE_MS`
    /// - `PRESENCE_REQUEST_TIMEOUT_SECS`, `PRESENCE_CONNECT_TIMEOUT_SECS`
    /// - `PRESENCE_FACING_MODE` (`user` / `environment`)
    pub fn from_lookup<F>(lookup: F) -> LivenessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = get("PRESENCE_VERIFIER_URL") {
            config.verifier_base_url = url;
        }
        if let Some(path) = get("PRESENCE_START_SESSION_PATH") {
            config.start_session_path = path;
        }
        if let Some(path) = get("PRESENCE_PROCESS_FRAME_PATH") {
            config.process_frame_path = path;
        }
        if let Some(path) = get("PRESENCE_PREDICT_PATH") {
            config.predict_path = path;
        }
        if let Some(ms) = get("PRESENCE_CADENCE_MS") {
            config.cadence_interval = Duration::from_millis(parse_number("PRESENCE_CADENCE_MS", &ms)?);
        }
        if let Some(secs) = get("PRESENCE_COUNTDOWN_SECONDS") {
            config.countdown_seconds = parse_number("PRESENCE_COUNTDOWN_SECONDS", &secs)?;
        }
        if let Some(ms) = get("PRESENCE_PAUSE_MS") {
            config.pause_after_pass = Duration::from_millis(parse_number("PRESENCE_PAUSE_MS", &ms)?);
        }
        if let Some(secs) = get("PRESENCE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_number("PRESENCE_REQUEST_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = get("PRESENCE_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout =
                Duration::from_secs(parse_number("PRESENCE_CONNECT_TIMEOUT_SECS", &secs)?);
        }
        if let Some(mode) = get("PRESENCE_FACING_MODE") {
            config.facing_mode = mode.parse().map_err(LivenessError::InvalidConfig)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> LivenessResult<()> {
        for path in [
            &self.start_session_path,
            &self.process_frame_path,
            &self.predict_path,
        ] {
            platform::http::join_url(&self.verifier_base_url, path)?;
        }
        if self.cadence_interval.is_zero() {
            return Err(LivenessError::InvalidConfig(
                "cadence interval must be greater than zero".to_string(),
            ));
        }
        if self.countdown_tick.is_zero() {
            return Err(LivenessError::InvalidConfig(
                "countdown tick must be greater than zero".to_string(),
            ));
        }
        if self.countdown_seconds == 0 {
            return Err(LivenessError::InvalidConfig(
                "countdown must be at least one second".to_string(),
            ));
        }
        if self.request_timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(LivenessError::InvalidConfig(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            ..Default::default()
        }
    }

    pub fn cadence_interval_ms(&self) -> u64 {
        self.cadence_interval.as_millis() as u64
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> LivenessResult<T> {
    raw.parse()
        .map_err(|_| LivenessError::InvalidConfig(format!("{key} is not a valid number: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LivenessConfig::default();
        assert_eq!(config.cadence_interval, Duration::from_millis(1500));
        assert_eq!(config.countdown_seconds, 10);
        assert_eq!(config.pause_after_pass, Duration::from_secs(2));
        assert_eq!(config.process_frame_path, "/process_frame");
        assert_eq!(config.facing_mode, FacingMode::User);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_lookup_yields_defaults() {
        let config = LivenessConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.verifier_base_url, "http://127.0.0.1:5000");
        assert_eq!(config.cadence_interval_ms(), 1500);
    }

    #[test]
    fn test_overlay_values() {
        let config = LivenessConfig::from_lookup(lookup(&[
            ("PRESENCE_VERIFIER_URL", "https://verifier.example.com/api"),
            ("PRESENCE_CADENCE_MS", "500"),
            ("PRESENCE_COUNTDOWN_SECONDS", " 15 "),
            ("PRESENCE_PAUSE_MS", "750"),
            ("PRESENCE_FACING_MODE", "rear"),
            ("PRESENCE_PREDICT_PATH", ""),
        ]))
        .unwrap();

        assert_eq!(config.verifier_base_url, "https://verifier.example.com/api");
        assert_eq!(config.cadence_interval, Duration::from_millis(500));
        assert_eq!(config.countdown_seconds, 15);
        assert_eq!(config.pause_after_pass, Duration::from_millis(750));
        assert_eq!(config.facing_mode, FacingMode::Environment);
        // Blank values fall back to the default
        assert_eq!(config.predict_path, "/predict");
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = LivenessConfig::from_lookup(lookup(&[("PRESENCE_CADENCE_MS", "fast")]))
            .unwrap_err();
        assert!(matches!(err, LivenessError::InvalidConfig(msg) if msg.contains("PRESENCE_CADENCE_MS")));
    }

    #[test]
    fn test_zero_cadence_rejected() {
        let err =
            LivenessConfig::from_lookup(lookup(&[("PRESENCE_CADENCE_MS", "0")])).unwrap_err();
        assert_eq!(err.kind(), kernel::error::kind::ErrorKind::Configuration);
    }

    #[test]
    fn test_bad_url_rejected() {
        let err = LivenessConfig::from_lookup(lookup(&[("PRESENCE_VERIFIER_URL", "localhost:5000")]))
            .unwrap_err();
        assert!(matches!(err, LivenessError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_facing_mode_rejected() {
        let err = LivenessConfig::from_lookup(lookup(&[("PRESENCE_FACING_MODE", "sideways")]))
            .unwrap_err();
        assert!(matches!(err, LivenessError::InvalidConfig(_)));
    }

    #[test]
    fn test_http_client_config_carries_timeouts() {
        let config = LivenessConfig::development();
        let http = config.http_client_config();
        assert_eq!(http.request_timeout, Duration::from_secs(5));
        assert_eq!(http.connect_timeout, Duration::from_secs(2));
        assert!(http.user_agent.starts_with("presence/"));
    }
}
