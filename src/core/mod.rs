//! Core business logic module
//!
//! This module contains the banking core:
//! - `ledger` - account ledger over the storage collaborator
//! - `router` - session gate and command dispatch

pub mod ledger;
pub mod router;

pub use ledger::Ledger;
pub use router::{Reply, Router};
