//! reqwest-backed [`Dispatcher`] for the Open WebUI REST API.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use openwebui_mcp_core::{
    normalize_response, Dispatcher, GatewayError, HttpMethod, RequestOptions, TransportErrorKind,
};

use crate::config::BackendConfig;

/// Issues backend calls against the configured base URL.
///
/// The underlying `reqwest::Client` pools connections and is shared by all
/// invocations; nothing per-call is stored on it.
#[derive(Debug, Clone)]
pub struct BackendClient {
    config: BackendConfig,
    http: reqwest::Client,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns `GatewayError::Configuration` when the HTTP client cannot be
    /// constructed (e.g. the TLS backend fails to initialize).
    pub fn new(config: BackendConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("openwebui-mcp/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl Dispatcher for BackendClient {
    async fn execute(&self, request: RequestOptions) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.config.base_url(), request.path);
        let timeout = request.timeout.unwrap_or(self.config.timeout());
        let method = request.method.as_str();

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json");
        if let Some(credential) = &request.credential {
            builder = builder.header(AUTHORIZATION, credential.bearer_header());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                record_request(method, "error");
                return Err(classify_reqwest_error(&e));
            }
        };

        let status = response.status();
        record_request(method, status_class(status.as_u16()));
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.map_err(|e| classify_reqwest_error(&e))?;

        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = start.elapsed().as_millis() as u64;
        debug!(
            method,
            path = %request.path,
            status = status.as_u16(),
            elapsed_ms,
            authenticated = request.credential.is_some(),
            "backend call complete"
        );

        if status.is_success() || status.is_redirection() {
            normalize_response(content_type.as_deref(), &body)
        } else {
            Err(GatewayError::from_status(status.as_u16(), body))
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn classify_reqwest_error(err: &reqwest::Error) -> GatewayError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if err.is_decode() || err.is_body() {
        TransportErrorKind::Decode
    } else {
        TransportErrorKind::Other
    };
    GatewayError::transport(kind, err.to_string())
}

fn status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

fn record_request(method: &'static str, status_class: &'static str) {
    metrics::counter!(
        "backend_requests_total",
        "method" => method,
        "status_class" => status_class
    )
    .increment(1);
}
