//! Network module with deferred startup lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves. The
//! split lets callers learn the bound port (e.g. when port 0 is configured)
//! before traffic is accepted.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::auth::bearer_context;
use super::config::{NetworkConfig, TlsConfig};
use super::handlers::{
    health_handler, liveness_handler, mcp_handler, readiness_handler, AppState,
};
use super::middleware::build_http_layers;
use super::shutdown::ShutdownController;
use crate::mcp::McpServer;

/// Upper bound on waiting for in-flight invocations after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Manages the HTTP transport lifecycle.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- allocates shared state (shutdown controller)
/// 2. `start()` -- binds TCP listener to the configured address
/// 3. `serve()` -- accepts connections until shutdown is signalled
pub struct NetworkModule {
    config: NetworkConfig,
    mcp: Arc<McpServer>,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    #[must_use]
    pub fn new(config: NetworkConfig, mcp: McpServer) -> Self {
        Self {
            config,
            mcp: Arc::new(mcp),
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `POST <mcp_path>` -- MCP JSON-RPC, inside the bearer-context scope
    /// - `GET /health` -- detailed health JSON
    /// - `GET /health/live` -- liveness probe
    /// - `GET /health/ready` -- readiness probe
    ///
    /// Other methods on `<mcp_path>` get 405 from the method router.
    pub fn build_router(&self) -> Router {
        build_router(AppState {
            mcp: Arc::clone(&self.mcp),
            shutdown: Arc::clone(&self.shutdown),
            config: Arc::new(self.config.clone()),
            start_time: Instant::now(),
        })
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until `shutdown` resolves, then drains.
    ///
    /// After the shutdown signal:
    /// 1. Health state transitions to Draining (new MCP posts get 503)
    /// 2. The listener stops accepting connections
    /// 3. Waits up to 30 seconds for in-flight invocations to complete
    /// 4. Health state transitions to Stopped
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a fatal I/O error or the TLS
    /// material cannot be loaded.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .expect("start() must be called before serve()");
        let shutdown_ctrl = self.shutdown;

        let signal_ctrl = Arc::clone(&shutdown_ctrl);
        let shutdown = async move {
            shutdown.await;
            info!("Shutdown signal received, draining");
            signal_ctrl.trigger_shutdown();
        };

        shutdown_ctrl.set_ready();

        if let Some(ref tls_config) = self.config.tls {
            serve_tls(listener, router, tls_config, shutdown).await?;
        } else {
            serve_plain(listener, router, shutdown).await?;
        }

        drain(&shutdown_ctrl).await;
        Ok(())
    }
}

fn build_router(state: AppState) -> Router {
    let layers = build_http_layers(&state.config);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route(&state.config.mcp_path, post(mcp_handler))
        .route_layer(axum::middleware::from_fn(bearer_context))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .layer(body_limit)
        .layer(layers)
        .with_state(state)
}

/// Serves plain HTTP using axum's built-in server.
async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Serving MCP over HTTP");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Serves TLS connections using `axum-server` with rustls.
///
/// Reuses the pre-bound TCP listener by converting it to a `std::net::TcpListener`.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls_config: &TlsConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls_config.cert_path, &tls_config.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(Some(DRAIN_TIMEOUT));
    });

    info!("Serving MCP over HTTPS on {}", addr);

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

async fn drain(shutdown_ctrl: &ShutdownController) {
    shutdown_ctrl.trigger_shutdown();

    let in_flight = shutdown_ctrl.in_flight_count();
    if in_flight > 0 {
        info!("Waiting for {} in-flight invocations", in_flight);
    }

    if shutdown_ctrl.wait_for_drain(DRAIN_TIMEOUT).await {
        info!("All invocations drained");
    } else {
        warn!("Drain timeout expired with in-flight invocations remaining");
    }
}
