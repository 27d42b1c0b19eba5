//! Line-delimited JSON-RPC over stdin/stdout.
//!
//! stdout carries protocol messages only; all logging goes to stderr. The
//! invocation context is never populated here, so credentials come from the
//! `api_key` argument or the configured fallback.

use std::future::Future;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::mcp::McpServer;

/// Bounded capacity of the response queue feeding the writer task.
const OUTBOUND_CAPACITY: usize = 256;

/// Serves MCP on the process's stdin/stdout until EOF or `shutdown`.
///
/// # Errors
///
/// Returns an error when reading stdin or writing stdout fails.
pub async fn serve_stdio(
    server: McpServer,
    shutdown: impl Future<Output = ()> + Send,
) -> anyhow::Result<()> {
    info!("Serving MCP over stdio");
    serve_lines(server, tokio::io::stdin(), tokio::io::stdout(), shutdown).await
}

/// Reads one JSON-RPC message per line from `reader` and writes responses,
/// one per line, to `writer`.
///
/// Each message is handled on its own task so a slow backend call does not
/// block the next request; responses may therefore be written out of order.
/// On EOF or `shutdown` no new lines are read, and the function returns
/// once every in-flight message has been answered.
///
/// # Errors
///
/// Returns an error when reading or writing fails.
pub async fn serve_lines<R, W>(
    server: McpServer,
    reader: R,
    writer: W,
    shutdown: impl Future<Output = ()> + Send,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Value>(OUTBOUND_CAPACITY);
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut lines = BufReader::new(reader).lines();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown signal received, finishing in-flight messages");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let server = server.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = server.handle_bytes(line.as_bytes()).await {
                // A closed queue means the writer already failed; its error is
                // reported when the writer task is joined.
                let _ = tx.send(response).await;
            }
        });
    }

    drop(tx);
    writer_task.await??;
    Ok(())
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::Receiver<Value>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = serde_json::to_vec(&message)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}
