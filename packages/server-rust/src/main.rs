//! `openwebui-mcp` binary: parses configuration, wires the tool pipeline and
//! runs the selected transport until EOF or Ctrl+C.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use openwebui_mcp_core::CredentialResolver;
use openwebui_mcp_server::{
    build_tool_pipeline, startup_diagnostic, BackendClient, BackendConfig, Config, LogFormat,
    McpServer, NetworkModule, ToolRegistry, ToolRouter, TransportMode,
};

fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.log_format);

    let backend = match config.backend() {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("{}", startup_diagnostic(&e));
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("ERROR: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config, backend)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, backend: BackendConfig) -> anyhow::Result<()> {
    if let Some(port) = config.metrics_port {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("failed to install Prometheus exporter")?;
        info!("Prometheus metrics on {}", addr);
    }

    let fallback = if config.fallback_enabled() {
        backend.fallback().cloned()
    } else {
        if backend.fallback().is_some() {
            warn!(
                "OPENWEBUI_API_KEY is ignored for HTTP callers; \
                 set MCP_ALLOW_FALLBACK_IN_HTTP to enable it"
            );
        }
        None
    };
    if fallback.is_some() && config.transport() == TransportMode::Http {
        warn!("HTTP callers without a bearer token will act with the fallback API key");
    }

    info!(
        base_url = backend.base_url(),
        transport = config.transport().as_str(),
        fallback = fallback.is_some(),
        "starting openwebui-mcp"
    );

    let client = BackendClient::new(backend)?;
    let registry = Arc::new(ToolRegistry::open_webui());
    let router = ToolRouter::new(
        Arc::clone(&registry),
        CredentialResolver::new(fallback),
        Arc::new(client),
    );
    let server = McpServer::new(build_tool_pipeline(router), registry);

    match config.transport() {
        TransportMode::Stdio => {
            openwebui_mcp_server::transport::serve_stdio(server, shutdown_signal()).await
        }
        TransportMode::Http => {
            let mut module = NetworkModule::new(config.network()?, server);
            let port = module.start().await?;
            info!("MCP endpoint listening on port {}", port);
            module.serve(shutdown_signal()).await
        }
    }
}

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
