//! Command-line and environment configuration.
//!
//! Every flag has an environment-variable twin so the server can be launched
//! by an MCP client (which usually only sets env vars) or by hand.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use openwebui_mcp_core::{Credential, GatewayError, DEFAULT_BACKEND_TIMEOUT};

use crate::network::{NetworkConfig, TlsConfig};

/// Request-level timeout headroom above the backend ceiling, so the backend
/// timeout always fires first and is reported as a classified error.
const HTTP_TIMEOUT_HEADROOM: Duration = Duration::from_secs(5);

/// Errors raised while turning raw configuration into runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENWEBUI_URL environment variable is required")]
    MissingBaseUrl,
    #[error("OPENWEBUI_URL must start with http:// or https://, got `{0}`")]
    InvalidBaseUrl(String),
    #[error("MCP_HTTP_PATH must not be empty")]
    EmptyPath,
}

impl From<ConfigError> for GatewayError {
    fn from(err: ConfigError) -> Self {
        GatewayError::Configuration(err.to_string())
    }
}

/// Which inbound transport serves MCP traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportMode {
    /// Line-delimited JSON-RPC over stdin/stdout; one client per process.
    #[value(alias = "point-to-point")]
    Stdio,
    /// JSON-RPC over HTTP POST; caller identity comes from `Authorization`.
    #[value(alias = "networked")]
    Http,
}

impl TransportMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Process configuration, parsed from flags and environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openwebui-mcp",
    version,
    about = "MCP server exposing Open WebUI administration over stdio or HTTP"
)]
pub struct Config {
    /// Base URL of the Open WebUI instance, e.g. `https://ai.example.com`.
    #[arg(long = "openwebui-url", env = "OPENWEBUI_URL")]
    pub openwebui_url: Option<String>,

    /// Fallback API key used when a call carries no other credential.
    #[arg(long, env = "OPENWEBUI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(
        long,
        env = "MCP_TRANSPORT",
        value_enum,
        ignore_case = true,
        default_value_t = TransportMode::Stdio
    )]
    pub transport: TransportMode,

    #[arg(long, env = "MCP_HTTP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "MCP_HTTP_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Route that accepts MCP JSON-RPC posts.
    #[arg(long, env = "MCP_HTTP_PATH", default_value = "/mcp")]
    pub path: String,

    /// Ceiling for a single backend call, in seconds.
    #[arg(
        long,
        env = "OPENWEBUI_TIMEOUT_SECS",
        default_value_t = DEFAULT_BACKEND_TIMEOUT.as_secs()
    )]
    pub request_timeout_secs: u64,

    /// Let HTTP callers without a bearer token use `OPENWEBUI_API_KEY`.
    #[arg(long, env = "MCP_ALLOW_FALLBACK_IN_HTTP")]
    pub allow_fallback_in_http: bool,

    #[arg(
        long = "cors-origin",
        env = "MCP_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub cors_origins: Vec<String>,

    #[arg(long, env = "MCP_TLS_CERT", requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    #[arg(long, env = "MCP_TLS_KEY", requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    /// Expose Prometheus metrics on this port when set.
    #[arg(long, env = "MCP_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[arg(
        long,
        env = "MCP_LOG_FORMAT",
        value_enum,
        ignore_case = true,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}

/// Immutable backend settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: String,
    fallback: Option<Credential>,
    timeout: Duration,
}

impl BackendConfig {
    /// Normalizes `base_url` (whitespace and trailing slashes removed).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] for a blank URL and
    /// [`ConfigError::InvalidBaseUrl`] for a non-http(s) scheme.
    pub fn new(base_url: &str, fallback: Option<Credential>) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        let lower = trimmed.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(trimmed.to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            fallback,
            timeout: DEFAULT_BACKEND_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn fallback(&self) -> Option<&Credential> {
        self.fallback.as_ref()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Config {
    /// Builds the backend settings from the URL, fallback key and timeout.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Configuration` when the base URL is missing or
    /// malformed.
    pub fn backend(&self) -> Result<BackendConfig, GatewayError> {
        let url = self.openwebui_url.as_deref().unwrap_or_default();
        let fallback = self.api_key.as_deref().and_then(Credential::new);
        Ok(BackendConfig::new(url, fallback)?
            .with_timeout(Duration::from_secs(self.request_timeout_secs.max(1))))
    }

    #[must_use]
    pub fn transport(&self) -> TransportMode {
        self.transport
    }

    /// Whether the fallback credential may be used for this transport.
    ///
    /// Stdio always uses it; HTTP only when explicitly allowed.
    #[must_use]
    pub fn fallback_enabled(&self) -> bool {
        match self.transport {
            TransportMode::Stdio => true,
            TransportMode::Http => self.allow_fallback_in_http,
        }
    }

    /// Settings for the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPath`] when the MCP route is blank.
    pub fn network(&self) -> Result<NetworkConfig, ConfigError> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        let mcp_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: cert.clone(),
                key_path: key.clone(),
            }),
            _ => None,
        };

        Ok(NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            mcp_path,
            tls,
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1))
                + HTTP_TIMEOUT_HEADROOM,
            ..NetworkConfig::default()
        })
    }
}

/// Stderr text for a startup failure. Configuration errors carry a usage
/// example so a bare `OPENWEBUI_URL` omission is self-explanatory.
#[must_use]
pub fn startup_diagnostic(err: &GatewayError) -> String {
    match err {
        GatewayError::Configuration(msg) => {
            format!("ERROR: {msg}\nExample: export OPENWEBUI_URL=https://ai.example.com")
        }
        other => format!("ERROR: {other}"),
    }
}
