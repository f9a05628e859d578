use crate::{ConfigError, FromEnv, env_or_default, env_parse};
use std::net::Ipv4Addr;
use std::time::Duration;

/// HTTP listener settings.
///
/// - `HOST` (default `0.0.0.0`)
/// - `PORT` (default `8080`)
/// - `REQUEST_TIMEOUT_SECS` (default `30`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse("PORT", 8080u16)?;
        let timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", 30u64)?;

        Ok(Self {
            host,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
        }
    }
}
