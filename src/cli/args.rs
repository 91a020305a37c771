use crate::server::ServerConfig;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Serve the banking wire protocol over TCP
#[derive(Parser, Debug)]
#[command(name = "banking-server")]
#[command(about = "Line-protocol banking server", long_about = None)]
pub struct CliArgs {
    /// Address to listen on
    #[arg(
        long,
        value_name = "ADDR",
        default_value = "127.0.0.1",
        env = "BANK_SERVER_HOST"
    )]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(
        long,
        value_name = "PORT",
        default_value_t = 5000,
        env = "BANK_SERVER_PORT"
    )]
    pub port: u16,

    /// Upper bound on concurrently served connections
    #[arg(
        long = "max-connections",
        value_name = "COUNT",
        default_value_t = 256,
        value_parser = parse_positive
    )]
    pub max_connections: usize,

    /// Seconds granted to in-flight connections on shutdown
    #[arg(
        long = "shutdown-grace-secs",
        value_name = "SECONDS",
        default_value_t = 5
    )]
    pub shutdown_grace_secs: u64,
}

/// Parse command-line arguments, exiting with usage on failure
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

impl CliArgs {
    /// Assemble the listener configuration
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            addr: SocketAddr::new(self.host, self.port),
            max_connections: self.max_connections,
            shutdown_grace: Duration::from_secs(self.shutdown_grace_secs),
        }
    }
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err("must be a positive integer".to_string()),
    }
}
