//! Banking server binary
//!
//! Binds the TCP listener and serves the banking wire protocol until
//! interrupted.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --port 5000
//! cargo run -- --host 0.0.0.0 --port 6001 --max-connections 64
//! ```
//!
//! Logging is controlled through `RUST_LOG` (default `info`); per-line
//! request/response traffic is visible at `debug`.
//!
//! # Exit Codes
//!
//! - 0: clean shutdown (ctrl-c)
//! - 1: fatal startup or serve error (port in use, etc.)

use rust_banking_server::storage::MemoryStore;
use rust_banking_server::{cli, BankServer, Ledger};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // One ledger over one shared store; every connection worker routes
    // through the same instance.
    let ledger = Ledger::new(Arc::new(MemoryStore::new()));

    let server = match BankServer::bind(args.server_config(), ledger).await {
        Ok(server) => server,
        Err(error) => {
            tracing::error!(%error, "could not start server");
            process::exit(1);
        }
    };

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    if let Err(error) = server.serve(shutdown).await {
        tracing::error!(%error, "server terminated abnormally");
        process::exit(1);
    }
}
