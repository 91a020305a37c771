//! Error types for the banking server
//!
//! This module defines all failures that can surface while serving a
//! request. Every variant is recoverable at the connection level: the
//! handler boundary converts each into exactly one structured response
//! line and keeps the connection alive. Only transport failures end a
//! connection, and those are plain `std::io::Error`s in the server layer.
//!
//! # Error Categories
//!
//! - **Protocol errors**: empty line, unknown command or admin sub-command
//! - **Validation errors**: missing or malformed positional parameter
//! - **Not-found errors**: client or account absent, no mutation performed
//! - **Business-rule errors**: insufficient funds, duplicate national id,
//!   same-account transfer
//! - **Access errors**: login required, login rejected, foreign account
//! - **Storage / internal errors**: collaborator failure or arithmetic
//!   overflow, reported generically on the wire and logged in full

use crate::types::ClientId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the banking server
///
/// Each variant carries enough context to log the failure server-side;
/// the wire mapping in `protocol::response` decides how much of it the
/// caller gets to see.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// An empty or blank request line was received
    #[error("empty command received")]
    EmptyCommand,

    /// The first field names no known command
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// The unrecognized command name
        name: String,
    },

    /// `ADMIN` was sent without a sub-command field
    #[error("missing admin subcommand")]
    MissingAdminSubcommand,

    /// The second field under `ADMIN` names no known sub-command
    #[error("unknown admin action: {name}")]
    UnknownAdminSubcommand {
        /// The unrecognized sub-command name
        name: String,
    },

    /// A required positional parameter is absent or blank
    #[error("{command}: missing required parameter '{field}' at position {position}")]
    MissingParameter {
        /// Command being parsed
        command: String,
        /// Declared name of the missing field
        field: String,
        /// Zero-based position in the request line
        position: usize,
    },

    /// A positional parameter is present but malformed
    #[error("{command}: invalid value '{value}' for '{field}' at position {position}, expected {expected}")]
    InvalidParameter {
        /// Command being parsed
        command: String,
        /// Declared name of the failing field
        field: String,
        /// Zero-based position in the request line
        position: usize,
        /// The offending raw value
        value: String,
        /// Human description of the accepted format
        expected: String,
    },

    /// A command that requires authentication arrived on an anonymous session
    #[error("please login first")]
    AuthRequired,

    /// Credentials did not match any client
    #[error("invalid client id or password")]
    LoginFailed,

    /// A login arrived while the session is already authenticated
    #[error("already logged in as client {client}")]
    AlreadyLoggedIn {
        /// Currently authenticated client
        client: ClientId,
    },

    /// The authenticated client does not own the targeted account
    #[error("account {number} does not belong to you")]
    AccessDenied {
        /// Account number that was targeted
        number: String,
    },

    /// No client row for the given id
    #[error("client {client} not found")]
    ClientNotFound {
        /// Looked-up client id
        client: ClientId,
    },

    /// No account row for the given number
    #[error("account {number} not found")]
    AccountNotFound {
        /// Looked-up account number
        number: String,
    },

    /// Transfer source account is absent
    #[error("source account {number} not found")]
    SourceAccountNotFound {
        /// Looked-up account number
        number: String,
    },

    /// Transfer destination account is absent
    #[error("destination account {number} not found")]
    DestinationAccountNotFound {
        /// Looked-up account number
        number: String,
    },

    /// Withdrawal or transfer exceeds the current balance
    #[error("insufficient funds on {number}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Debited account number
        number: String,
        /// Balance at the time of the check
        available: Decimal,
        /// Requested debit amount
        requested: Decimal,
    },

    /// Transfer names the same account on both sides
    #[error("TRANSFER: cannot transfer to the same account ({number})")]
    SameAccountTransfer {
        /// The repeated account number
        number: String,
    },

    /// A client with this national id already exists
    #[error("a client with national id {national_id} already exists")]
    DuplicateNationalId {
        /// The colliding national id
        national_id: String,
    },

    /// An update would assign a national id held by a different client
    #[error("national id {national_id} belongs to another client")]
    NationalIdTakenByOther {
        /// The colliding national id
        national_id: String,
    },

    /// A client update affected no row
    #[error("update failed or client unchanged: {client}")]
    UpdateFailed {
        /// Targeted client id
        client: ClientId,
    },

    /// A client delete affected no row
    #[error("client deletion failed: {client}")]
    ClientDeletionFailed {
        /// Targeted client id
        client: ClientId,
    },

    /// An account delete affected no row
    #[error("account deletion failed: {number}")]
    AccountDeletionFailed {
        /// Targeted account number
        number: String,
    },

    /// Balance arithmetic left the representable range
    #[error("arithmetic overflow in {operation} on account {number}")]
    ArithmeticOverflow {
        /// Operation that overflowed
        operation: String,
        /// Account whose balance was involved
        number: String,
    },

    /// The storage collaborator failed mid-operation
    ///
    /// Reported to the caller with a generic category; the full message
    /// is for server-side logs.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// I/O failure reaching a handler (reported generically)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O failure
        message: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::Io {
            message: error.to_string(),
        }
    }
}

// Helper constructors for the variants built in more than one place

impl BankError {
    /// Create a MissingParameter error
    pub fn missing_parameter(command: &str, field: &str, position: usize) -> Self {
        BankError::MissingParameter {
            command: command.to_string(),
            field: field.to_string(),
            position,
        }
    }

    /// Create an InvalidParameter error
    pub fn invalid_parameter(
        command: &str,
        field: &str,
        position: usize,
        value: &str,
        expected: &str,
    ) -> Self {
        BankError::InvalidParameter {
            command: command.to_string(),
            field: field.to_string(),
            position,
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create an AccessDenied error
    pub fn access_denied(number: &str) -> Self {
        BankError::AccessDenied {
            number: number.to_string(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(number: &str) -> Self {
        BankError::AccountNotFound {
            number: number.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(number: &str, available: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            number: number.to_string(),
            available,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, number: &str) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            number: number.to_string(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        BankError::Storage {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::empty_command(BankError::EmptyCommand, "empty command received")]
    #[case::unknown_command(
        BankError::UnknownCommand { name: "FROBNICATE".to_string() },
        "unknown command: FROBNICATE"
    )]
    #[case::missing_parameter(
        BankError::missing_parameter("DEPOSIT", "amount", 2),
        "DEPOSIT: missing required parameter 'amount' at position 2"
    )]
    #[case::invalid_parameter(
        BankError::invalid_parameter("LOGIN", "clientId", 1, "abc", "a positive integer"),
        "LOGIN: invalid value 'abc' for 'clientId' at position 1, expected a positive integer"
    )]
    #[case::insufficient_funds(
        BankError::insufficient_funds("PL01", Decimal::new(10000, 2), Decimal::new(15000, 2)),
        "insufficient funds on PL01: available 100.00, requested 150.00"
    )]
    #[case::access_denied(
        BankError::access_denied("PL01"),
        "account PL01 does not belong to you"
    )]
    #[case::storage(
        BankError::storage("row vanished"),
        "storage error: row vanished"
    )]
    fn test_error_display(#[case] error: BankError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        let error: BankError = io_error.into();
        assert!(matches!(error, BankError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: broken pipe");
    }
}
