//! Wire protocol module
//!
//! The protocol is a line-delimited text format over a persistent TCP
//! connection: one request line in, one response line out, fields joined
//! by `;`. This module contains:
//! - `codec` - stateless field encoding/decoding
//! - `command` - the closed command enums and positional validation
//! - `response` - response construction and the error-to-wire mapping

pub mod codec;
pub mod command;
pub mod response;

pub use command::{AdminCommand, Command};
pub use response::Response;
