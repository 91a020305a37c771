//! Rust Banking Server Library
//! # Overview
//!
//! This library implements a banking back end served over a persistent
//! TCP connection per caller, using a line-delimited text protocol. A
//! privileged admin surface provisions clients and accounts; the
//! customer surface covers login, balance, deposit, withdrawal, transfer
//! and account listing.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Client, Account, Session, errors)
//! - [`cli`] - CLI argument parsing
//! - [`protocol`] - Wire format handling:
//!   - [`protocol::codec`] - delimited field encoding/decoding
//!   - [`protocol::command`] - closed command enums and validation
//!   - [`protocol::response`] - response vocabulary and error mapping
//! - [`storage`] - The durable-store collaborator trait and its
//!   in-memory implementation
//! - [`core`] - Business logic:
//!   - [`core::ledger`] - account reads and transactional money movement
//!   - [`core::router`] - session gate and command dispatch
//! - [`server`] - TCP listener and per-connection request loops
//!
//! # Guarantees
//!
//! - Balances are `rust_decimal` values; no floating point touches money
//! - A transfer debits and credits atomically, or not at all
//! - Every request line gets exactly one response line, in order
//! - A handler failure never terminates the connection

// Module declarations
pub mod cli;
pub mod core;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod types;

pub use crate::core::{Ledger, Reply, Router};
pub use protocol::{AdminCommand, Command, Response};
pub use server::{BankServer, ServerConfig};
pub use storage::{BankStore, MemoryStore};
pub use types::{Account, AccountId, BankError, Client, ClientId, Session};
