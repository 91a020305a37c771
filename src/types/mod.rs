//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `client`: client identity records and the national-id format
//! - `account`: account records and the account-number format
//! - `session`: per-connection authentication state
//! - `error`: the error taxonomy for the banking server

pub mod account;
pub mod client;
pub mod error;
pub mod session;

pub use account::{Account, AccountId, ACCOUNT_NUMBER_DIGITS, ACCOUNT_NUMBER_PREFIX};
pub use client::{Client, ClientId, NATIONAL_ID_DIGITS};
pub use error::BankError;
pub use session::Session;
