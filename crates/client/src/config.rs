//! Client configuration.
//!
//! [`ClientConfig`] deserializes with serde, every field falling back to its
//! default, so it can be embedded in whatever configuration file the
//! application already loads.

use std::time::Duration;

use serde::Deserialize;

/// Read timeout applied by every transport unless configured otherwise.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// `User-Agent` sent when a request does not carry its own.
pub const DEFAULT_USER_AGENT: &str = concat!("micro-http-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Seconds to wait for response data before giving up on a request.
    pub read_timeout_secs: u64,

    pub user_agent: String,

    /// Transport names (`ureq`, `tokio`, `socket`) reported as unavailable.
    pub disabled_transports: Vec<String>,

    pub decode_transfer_encoding: bool,

    pub decode_content_encoding: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_timeout_secs: DEFAULT_READ_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            disabled_transports: Vec::new(),
            decode_transfer_encoding: true,
            decode_content_encoding: true,
        }
    }
}

impl ClientConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn is_transport_enabled(&self, name: &str) -> bool {
        !self.disabled_transports.iter().any(|disabled| disabled.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.read_timeout(), Duration::from_secs(5));
        assert!(config.user_agent.starts_with("micro-http-client/"));
        assert!(config.is_transport_enabled("ureq"));
        assert!(config.decode_transfer_encoding);
        assert!(config.decode_content_encoding);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"read_timeout_secs": 2, "disabled_transports": ["Tokio"]}"#).unwrap();

        assert_eq!(config.read_timeout(), Duration::from_secs(2));
        assert!(!config.is_transport_enabled("tokio"));
        assert!(config.is_transport_enabled("socket"));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.decode_content_encoding);
    }
}
