//! Bearer-token extraction into the invocation context.
//!
//! The token from `Authorization: Bearer <token>` is installed as the
//! ambient credential for exactly the duration of the request. It is not
//! validated here; the backend decides whether it is acceptable.

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use openwebui_mcp_core::{context, Credential};

/// Case-sensitive scheme prefix, including the separating space.
const BEARER_PREFIX: &str = "Bearer ";

/// Reads the bearer credential from `headers`.
///
/// Anything other than a well-formed `Bearer` header (missing, another
/// scheme, lowercase `bearer`, empty token) yields `None`.
#[must_use]
pub fn bearer_credential(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .and_then(Credential::new)
}

/// Axum middleware that scopes the request's bearer credential around the
/// rest of the handler chain.
///
/// A request without one still gets a scope (holding "none"), so nothing
/// can leak in from elsewhere.
pub async fn bearer_context(request: Request, next: Next) -> Response {
    let credential = bearer_credential(request.headers());
    debug!(bearer_present = credential.is_some(), "invocation context installed");
    context::scope(credential, next.run(request)).await
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(
            bearer_credential(&headers("Bearer abc123")),
            Credential::new("abc123")
        );
    }

    #[test]
    fn rejects_other_forms() {
        assert!(bearer_credential(&HeaderMap::new()).is_none());
        assert!(bearer_credential(&headers("Basic dXNlcjpwYXNz")).is_none());
        assert!(bearer_credential(&headers("bearer abc123")).is_none());
        assert!(bearer_credential(&headers("Bearer ")).is_none());
        assert!(bearer_credential(&headers("Bearerabc123")).is_none());
    }

    /// Echoes the ambient credential seen by the handler.
    fn app() -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|| async {
                    context::current()
                        .map_or_else(|| "none".to_string(), |c| c.expose().to_string())
                }),
            )
            .layer(axum::middleware::from_fn(bearer_context))
    }

    async fn whoami(authorization: Option<&str>) -> String {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn handler_sees_bearer_token() {
        assert_eq!(whoami(Some("Bearer abc123")).await, "abc123");
    }

    #[tokio::test]
    async fn handler_sees_none_without_header() {
        assert_eq!(whoami(None).await, "none");
        assert_eq!(whoami(Some("Basic abc123")).await, "none");
    }

    #[tokio::test]
    async fn context_is_gone_after_request() {
        whoami(Some("Bearer abc123")).await;
        assert!(context::current().is_none());
        assert!(!context::in_scope());
    }
}
