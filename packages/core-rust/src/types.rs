use std::time::Duration;

use serde_json::{json, Value};

use crate::credential::Credential;
use crate::error::{GatewayError, TransportErrorKind};

/// Hard ceiling for a single backend call.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP method of a backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Everything the dispatcher needs to issue one backend call.
///
/// `path` is relative to the configured base URL and must start with `/`.
/// `credential` is the already-resolved credential; the dispatcher never
/// consults the invocation context itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub path: String,
    pub credential: Option<Credential>,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Per-call override; `None` means the dispatcher's configured ceiling.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            credential: None,
            body: None,
            query: Vec::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Turns a successful backend response into the uniform result shape.
///
/// JSON content types decode to the JSON value; anything else (including a
/// missing content type or an empty JSON body) becomes `{"text": <body>}`.
///
/// # Errors
///
/// Returns a `Transport` error of kind `Decode` when the response declares
/// JSON but the body is not valid JSON.
pub fn normalize_response(content_type: Option<&str>, body: &str) -> Result<Value, GatewayError> {
    let is_json = content_type
        .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("application/json"));

    if is_json && !body.trim().is_empty() {
        serde_json::from_str(body).map_err(|e| {
            GatewayError::transport(
                TransportErrorKind::Decode,
                format!("backend declared JSON but body did not decode: {e}"),
            )
        })
    } else {
        Ok(json!({ "text": body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_decodes() {
        let value = normalize_response(Some("application/json"), r#"{"id":"x"}"#).unwrap();
        assert_eq!(value, json!({"id": "x"}));
    }

    #[test]
    fn json_with_charset_decodes() {
        let value = normalize_response(Some("application/json; charset=utf-8"), "[1,2]").unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn text_body_is_wrapped() {
        let value = normalize_response(Some("text/plain"), "ok").unwrap();
        assert_eq!(value, json!({"text": "ok"}));
    }

    #[test]
    fn missing_content_type_is_wrapped() {
        let value = normalize_response(None, "<html/>").unwrap();
        assert_eq!(value, json!({"text": "<html/>"}));
    }

    #[test]
    fn empty_json_body_is_wrapped() {
        let value = normalize_response(Some("application/json"), "").unwrap();
        assert_eq!(value, json!({"text": ""}));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = normalize_response(Some("application/json"), "{nope").unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Transport {
                kind: TransportErrorKind::Decode,
                ..
            }
        ));
    }

    #[test]
    fn request_options_builder() {
        let opts = RequestOptions::new(HttpMethod::Get, "/api/v1/users/")
            .with_query("page", "2")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(opts.query, vec![("page".to_string(), "2".to_string())]);
        assert!(opts.credential.is_none());
        assert_eq!(opts.timeout, Some(Duration::from_secs(5)));
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}
