//! TCP bridge that turns host JSON lines into inbound messages.

use anyhow::{Result, anyhow};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    net::TcpListener,
    sync::mpsc,
};

use crate::message::HostMessage;

/// Bind the listener; failing here is fatal at startup.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow!("failed to bind bridge on {addr}: {e}"))
}

/// Accept host connections until the receiving side goes away.
pub async fn run(listener: TcpListener, tx: mpsc::Sender<HostMessage>) {
    match listener.local_addr() {
        Ok(addr) => tracing::info!("bridge listening on {addr}"),
        Err(e) => tracing::warn!("bridge address unavailable: {e}"),
    }

    loop {
        let (sock, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("bridge accept failed: {e}");
                continue;
            }
        };
        if tx.is_closed() {
            break;
        }
        tracing::info!("host connected: {peer}");
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = serve(sock, tx).await {
                tracing::warn!("host connection {peer} ended: {e}");
            } else {
                tracing::info!("host disconnected: {peer}");
            }
        });
    }
    tracing::info!("bridge stopped");
}

/// Read one message per line; bad lines are logged and skipped.
pub async fn serve<R>(reader: R, tx: mpsc::Sender<HostMessage>) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        // Lines that are not UTF-8 are skipped without closing the connection.
        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::warn!("ignored host line: not valid UTF-8 ({} bytes)", buf.len());
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match HostMessage::parse(line) {
            Ok(msg) => tx
                .send(msg)
                .await
                .map_err(|_| anyhow!("overlay is shutting down"))?,
            Err(e) => tracing::warn!("ignored host line: {e}"),
        }
    }
    Ok(())
}
