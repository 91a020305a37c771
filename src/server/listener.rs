//! TCP listener and connection lifecycle
//!
//! The listener owns the shared ledger, accepts connections, and spawns
//! one handler task per connection through a semaphore bound. Accept
//! errors are non-fatal. Shutdown is cooperative: once the shutdown
//! future resolves the listener stops accepting, signals every handler,
//! and gives in-flight connections a bounded grace period to finish
//! their current request before the remaining tasks are aborted.

use crate::core::{Ledger, Router};
use crate::server::connection;
use crate::types::BankError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{info, info_span, warn, Instrument};

/// Listener settings, assembled from the CLI layer
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listening socket to
    pub addr: SocketAddr,
    /// Upper bound on concurrently served connections
    pub max_connections: usize,
    /// How long in-flight connections get to finish on shutdown
    pub shutdown_grace: Duration,
}

/// A bound banking server, ready to serve
pub struct BankServer {
    listener: TcpListener,
    router: Router,
    max_connections: usize,
    shutdown_grace: Duration,
}

impl BankServer {
    /// Bind the listening socket
    ///
    /// Binding is separate from serving so callers (and tests) can learn
    /// the actual local address before any connection is accepted.
    pub async fn bind(config: ServerConfig, ledger: Ledger) -> Result<BankServer, BankError> {
        let listener = TcpListener::bind(config.addr).await?;
        Ok(BankServer {
            listener,
            router: Router::new(ledger),
            max_connections: config.max_connections,
            shutdown_grace: config.shutdown_grace,
        })
    }

    /// The address the listener actually bound (relevant with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr, BankError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve connections until `shutdown` resolves
    ///
    /// Consumes the server; when this returns, the socket is closed and
    /// every connection task has finished or been aborted.
    pub async fn serve(self, shutdown: impl Future<Output = ()>) -> Result<(), BankError> {
        let addr = self.local_addr()?;
        info!(%addr, max_connections = self.max_connections, "server listening");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let limiter = Arc::new(Semaphore::new(self.max_connections));
        let mut tasks: JoinSet<()> = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            // Reap connection tasks that already finished.
            while let Some(result) = tasks.try_join_next() {
                if let Err(error) = result {
                    if error.is_panic() {
                        warn!(%error, "connection task panicked");
                    }
                }
            }

            // Wait for a free connection slot; excess connections queue
            // in the accept backlog instead of being refused.
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = Arc::clone(&limiter).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(error) => {
                        warn!(%error, "error accepting connection");
                        continue;
                    }
                },
            };

            let router = self.router.clone();
            let per_conn_shutdown = shutdown_rx.clone();
            tasks.spawn(
                async move {
                    connection::serve(stream, peer, router, per_conn_shutdown).await;
                    drop(permit);
                }
                .instrument(info_span!("conn", %peer)),
            );
        }

        info!("shutdown requested, no longer accepting connections");
        drop(self.listener);
        let _ = shutdown_tx.send(true);

        let open = tasks.len();
        let drained = timeout(self.shutdown_grace, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(
                remaining = tasks.len(),
                "grace period elapsed, aborting remaining connections"
            );
            tasks.shutdown().await;
        } else if open > 0 {
            info!(connections = open, "all connections drained");
        }

        info!("server stopped");
        Ok(())
    }
}
