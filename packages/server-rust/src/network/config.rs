//! Network configuration for the HTTP transport.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level network configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Route accepting MCP JSON-RPC posts. Always starts with `/`.
    pub mcp_path: String,
    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            mcp_path: "/mcp".to_string(),
            tls: None,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(65),
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

/// TLS certificate configuration.
///
/// No `Default` impl because certificate paths have no sensible defaults.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the PEM certificate chain.
    pub cert_path: PathBuf,
    /// Path to the PEM private key.
    pub key_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 0);
        assert_eq!(config.mcp_path, "/mcp");
        assert!(config.tls.is_none());
        assert_eq!(config.cors_origins, vec!["*"]);
        assert_eq!(config.request_timeout, Duration::from_secs(65));
        assert_eq!(config.max_body_bytes, 4_194_304);
    }

    #[test]
    fn request_timeout_exceeds_backend_ceiling() {
        let config = NetworkConfig::default();
        assert!(config.request_timeout > openwebui_mcp_core::DEFAULT_BACKEND_TIMEOUT);
    }
}
