//! Per-connection request loop
//!
//! One task per accepted socket. The loop is strictly sequential: read a
//! line, route it to completion, write exactly one response line, then
//! read again. No pipelining, no reordering. Handler failures never end
//! the loop; the router already folded them into a response. The loop
//! exits only on peer EOF, a transport error, the server shutdown
//! signal, or a successful logout.

use crate::core::Router;
use crate::types::Session;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Serve one connection until it ends
///
/// Transport errors are logged here and swallowed; they concern only this
/// connection, never the listener.
pub async fn serve(
    stream: TcpStream,
    peer: SocketAddr,
    router: Router,
    shutdown: watch::Receiver<bool>,
) {
    info!("connection opened");
    match request_loop(stream, peer, router, shutdown).await {
        Ok(()) => info!("connection closed"),
        Err(error) => warn!(%error, "connection ended with transport error"),
    }
}

async fn request_loop(
    stream: TcpStream,
    peer: SocketAddr,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut writer = BufWriter::new(write_half);
    let mut session = Session::new();

    loop {
        // Block waiting for the next request line. Shutdown is only
        // observed here, between requests: a dispatched handler always
        // runs to completion and its response is written before the
        // loop can end.
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = shutdown.changed() => {
                info!("closing idle connection for shutdown");
                return Ok(());
            }
        };
        let Some(line) = line else {
            // Peer closed its end of the stream.
            return Ok(());
        };
        let line = line.trim_end_matches('\r');
        debug!(peer = %peer, request = line, "received");

        let reply = router.handle_line(&mut session, line);
        let response = reply.response.to_line();
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        debug!(peer = %peer, response = %response, "sent");

        if reply.end_session {
            return Ok(());
        }
    }
}
