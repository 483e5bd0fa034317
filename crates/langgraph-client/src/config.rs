//! Client configuration.
//!
//! Everything [`ClientBuilder`](crate::ClientBuilder) accepts can also be
//! loaded from a TOML file:
//!
//! ```toml
//! base-url = "https://my-deployment.example.com"
//! timeout-secs = 300
//! connect-retries = 5
//! frame-mode = "batched"
//!
//! [headers]
//! x-tenant = "acme"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stream::FrameMode;

/// Server URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8123";

/// Default timeout for non-streaming requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default number of connectivity checks made by `connect`.
pub const DEFAULT_CONNECT_RETRIES: u32 = 5;

/// Default pause between connectivity checks.
pub const DEFAULT_CONNECT_RETRY_INTERVAL: Duration = Duration::from_secs(3);

/// Default capacity of a stream's event channel.
pub const DEFAULT_STREAM_BUFFER: usize = 32;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Headers callers may not set directly.
pub const RESERVED_HEADERS: &[&str] = &[API_KEY_HEADER];

/// Environment variables checked, in order, for an API key.
pub const API_KEY_ENV_VARS: &[&str] = &["LANGGRAPH_API_KEY", "LANGSMITH_API_KEY", "LANGCHAIN_API_KEY"];

/// File-loadable client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Server base URL.
    pub base_url: String,
    /// API key. Falls back to the environment when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Timeout for non-streaming requests, in seconds.
    pub timeout_secs: u64,
    /// Timeout for a whole streaming request, in seconds. Unset means none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_timeout_secs: Option<u64>,
    /// Connectivity checks made by `connect`.
    pub connect_retries: u32,
    /// Pause between connectivity checks, in milliseconds.
    pub connect_retry_interval_ms: u64,
    /// How stream lines are grouped into events.
    pub frame_mode: FrameMode,
    /// Event channel capacity per stream.
    pub stream_buffer: usize,
    /// Extra headers sent with every request.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            stream_timeout_secs: None,
            connect_retries: DEFAULT_CONNECT_RETRIES,
            connect_retry_interval_ms: DEFAULT_CONNECT_RETRY_INTERVAL.as_millis() as u64,
            frame_mode: FrameMode::default(),
            stream_buffer: DEFAULT_STREAM_BUFFER,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config file '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Streaming timeout as a duration.
    pub fn stream_timeout(&self) -> Option<Duration> {
        self.stream_timeout_secs.map(Duration::from_secs)
    }

    /// Retry interval as a duration.
    pub fn connect_retry_interval(&self) -> Duration {
        Duration::from_millis(self.connect_retry_interval_ms)
    }
}

/// Resolve the API key from an explicit value or the process environment.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<String> {
    resolve_api_key_with(explicit, |name| std::env::var(name).ok())
}

/// Resolve the API key using a custom variable lookup.
///
/// An explicit non-empty key wins; otherwise the first non-blank variable in
/// [`API_KEY_ENV_VARS`] is used, trimmed.
pub fn resolve_api_key_with<F>(explicit: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Fail if any header name is reserved.
pub fn check_reserved_headers<'a, I>(names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for name in names {
        if RESERVED_HEADERS
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(name))
        {
            return Err(Error::Config(format!("Cannot set reserved header '{name}'")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8123");
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert_eq!(config.connect_retries, 5);
        assert_eq!(config.connect_retry_interval(), Duration::from_secs(3));
        assert_eq!(config.stream_timeout(), None);
        assert_eq!(config.frame_mode, FrameMode::Batched);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
base-url = "https://graph.example.com"
stream-timeout-secs = 600
frame-mode = "eager"

[headers]
x-tenant = "acme"
"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://graph.example.com");
        assert_eq!(config.stream_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.frame_mode, FrameMode::Eager);
        assert_eq!(config.headers.get("x-tenant").map(String::as_str), Some("acme"));
        // Unspecified fields keep their defaults
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = ClientConfig::default();
        config.api_key = Some("secret".to_string());
        let text = config.to_toml_string().unwrap();
        assert_eq!(ClientConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ClientConfig::from_toml_str("timeout-secs = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "connect-retries = 1\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.connect_retries, 1);

        let err = ClientConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_api_key_resolution_order() {
        let env: HashMap<&str, &str> = [
            ("LANGSMITH_API_KEY", "  smith  "),
            ("LANGCHAIN_API_KEY", "chain"),
        ]
        .into_iter()
        .collect();
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());

        assert_eq!(
            resolve_api_key_with(Some("explicit"), lookup).as_deref(),
            Some("explicit")
        );
        assert_eq!(resolve_api_key_with(None, lookup).as_deref(), Some("smith"));
        assert_eq!(resolve_api_key_with(Some(""), lookup).as_deref(), Some("smith"));
        assert_eq!(resolve_api_key_with(None, |_| None), None);
        assert_eq!(
            resolve_api_key_with(None, |_| Some("   ".to_string())),
            None
        );
    }

    #[test]
    fn test_reserved_headers() {
        assert!(check_reserved_headers(["x-tenant", "authorization"]).is_ok());
        let err = check_reserved_headers(["X-Api-Key"]).unwrap_err();
        assert!(err.to_string().contains("reserved header"));
    }
}
