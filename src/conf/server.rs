use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    /// Upper bound on one multipart upload request, all files included.
    #[serde(default = "ServerConfig::default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Sessions untouched for longer than this are dropped.
    #[serde(
        with = "humantime_serde",
        default = "ServerConfig::default_session_ttl"
    )]
    pub session_ttl: Duration,
    /// Live plus finished sessions kept at once; the least recently used go first.
    #[serde(default = "ServerConfig::default_max_sessions")]
    pub max_sessions: usize,
}

impl ServerConfig {
    fn default_port() -> u16 {
        8080
    }

    fn default_host() -> String {
        String::from("localhost")
    }

    fn default_max_upload_bytes() -> usize {
        200 * 1024 * 1024
    }

    fn default_session_ttl() -> Duration {
        Duration::from_secs(60 * 60)
    }

    fn default_max_sessions() -> usize {
        1024
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            max_upload_bytes: Self::default_max_upload_bytes(),
            session_ttl: Self::default_session_ttl(),
            max_sessions: Self::default_max_sessions(),
        }
    }
}
