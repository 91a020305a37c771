//! Response construction and the error-to-wire mapping
//!
//! Every request produces exactly one response line. Success responses
//! start with `OK;SUB_STATUS`, queries use dedicated leading tokens, and
//! failures are either one of a small set of bare tokens or
//! `ERROR;KIND;detail`. This module owns the whole response vocabulary,
//! so no handler assembles wire strings by hand, and [`Response::from_error`]
//! is the single place where the error taxonomy turns into wire kinds.

use crate::protocol::codec;
use crate::types::{Account, BankError, Client, ClientId};
use rust_decimal::Decimal;
use std::fmt;

/// Response status tokens
pub mod tokens {
    pub const OK: &str = "OK";
    pub const ERROR: &str = "ERROR";
    pub const INFO: &str = "INFO";
    pub const BALANCE_IS: &str = "BALANCE_IS";
    pub const MY_ACCOUNTS: &str = "MY_ACCOUNTS";
    pub const CLIENT_INFO: &str = "CLIENT_INFO";
    pub const ACCOUNT_DETAILS: &str = "ACCOUNT_DETAILS";

    pub const LOGIN_SUCCESSFUL: &str = "LOGIN_SUCCESSFUL";
    pub const LOGOUT_SUCCESSFUL: &str = "LOGOUT_SUCCESSFUL";
    pub const DEPOSIT_SUCCESSFUL: &str = "DEPOSIT_SUCCESSFUL";
    pub const WITHDRAWAL_SUCCESSFUL: &str = "WITHDRAWAL_SUCCESSFUL";
    pub const TRANSFER_SUCCESSFUL: &str = "TRANSFER_SUCCESSFUL";
    pub const CLIENT_ADDED: &str = "CLIENT_ADDED";
    pub const ACCOUNT_ADDED_TO_CLIENT: &str = "ACCOUNT_ADDED_TO_CLIENT";
    pub const CLIENT_INFO_UPDATED: &str = "CLIENT_INFO_UPDATED";
    pub const CLIENT_DELETED: &str = "CLIENT_DELETED";
    pub const ACCOUNT_DELETED: &str = "ACCOUNT_DELETED";

    pub const CLIENT_NOT_FOUND: &str = "CLIENT_NOT_FOUND";
    pub const ACCOUNT_NOT_FOUND: &str = "ACCOUNT_NOT_FOUND";
    pub const INSUFFICIENT_FUNDS: &str = "INSUFFICIENT_FUNDS";
    pub const SOURCE_ACCOUNT_NOT_FOUND: &str = "SOURCE_ACCOUNT_NOT_FOUND";
    pub const DESTINATION_ACCOUNT_NOT_FOUND: &str = "DESTINATION_ACCOUNT_NOT_FOUND";
    pub const EMPTY_COMMAND: &str = "EMPTY_COMMAND";
    pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
    pub const UNKNOWN_ADMIN_SUBCOMMAND: &str = "UNKNOWN_ADMIN_SUBCOMMAND";
    pub const AUTH_REQUIRED: &str = "AUTH_REQUIRED";
    pub const LOGIN_FAILED: &str = "LOGIN_FAILED";
    pub const ALREADY_LOGGED_IN: &str = "ALREADY_LOGGED_IN";
    pub const ACCESS_DENIED: &str = "ACCESS_DENIED";
    pub const NATIONAL_ID_EXISTS: &str = "NATIONAL_ID_EXISTS";
    pub const NATIONAL_ID_EXISTS_OTHER: &str = "NATIONAL_ID_EXISTS_OTHER";
    pub const UPDATE_FAILED: &str = "UPDATE_FAILED_OR_CLIENT_UNCHANGED";
    pub const CLIENT_DELETION_FAILED: &str = "CLIENT_DELETION_FAILED";
    pub const ACCOUNT_DELETION_FAILED: &str = "ACCOUNT_DELETION_FAILED";
    pub const PARAM: &str = "PARAM";
    pub const STORAGE: &str = "STORAGE";
    pub const UNEXPECTED: &str = "UNEXPECTED";

    pub const NO_ACCOUNTS_FOUND: &str = "NO_ACCOUNTS_FOUND";
    /// Marker used in `CLIENT_INFO` when the client owns no accounts
    pub const NO_ACCOUNTS_MARKER: &str = "NO_ACCOUNTS";
}

/// One response line, as an ordered field sequence
///
/// Built only through the named constructors so the vocabulary stays
/// closed; [`Response::to_line`] renders the wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response(Vec<String>);

impl Response {
    fn new<const N: usize>(fields: [&str; N]) -> Self {
        Response(fields.iter().map(|f| f.to_string()).collect())
    }

    /// Render the wire line (without the trailing newline)
    pub fn to_line(&self) -> String {
        codec::encode(&self.0)
    }

    /// The response fields, for assertions and logging
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    // --- success responses ---

    /// `OK;LOGIN_SUCCESSFUL;firstName;clientId`
    pub fn login_successful(first_name: &str, client_id: ClientId) -> Self {
        Response::new([
            tokens::OK,
            tokens::LOGIN_SUCCESSFUL,
            first_name,
            &client_id.to_string(),
        ])
    }

    /// `OK;LOGOUT_SUCCESSFUL;Goodbye <firstName>!`
    pub fn logout_successful(first_name: &str) -> Self {
        Response::new([
            tokens::OK,
            tokens::LOGOUT_SUCCESSFUL,
            &format!("Goodbye {}!", first_name),
        ])
    }

    /// `BALANCE_IS;amount`
    pub fn balance_is(amount: Decimal) -> Self {
        Response::new([tokens::BALANCE_IS, &amount.to_string()])
    }

    /// `OK;DEPOSIT_SUCCESSFUL;newBalance`
    pub fn deposit_successful(balance: Decimal) -> Self {
        Response::new([tokens::OK, tokens::DEPOSIT_SUCCESSFUL, &balance.to_string()])
    }

    /// `OK;WITHDRAWAL_SUCCESSFUL;newBalance`
    pub fn withdrawal_successful(balance: Decimal) -> Self {
        Response::new([
            tokens::OK,
            tokens::WITHDRAWAL_SUCCESSFUL,
            &balance.to_string(),
        ])
    }

    /// `OK;TRANSFER_SUCCESSFUL`
    pub fn transfer_successful() -> Self {
        Response::new([tokens::OK, tokens::TRANSFER_SUCCESSFUL])
    }

    /// `MY_ACCOUNTS;n1:b1,n2:b2,...`
    pub fn my_accounts(accounts: &[Account]) -> Self {
        Response::new([tokens::MY_ACCOUNTS, &format_account_list(accounts)])
    }

    /// `INFO;NO_ACCOUNTS_FOUND;...` for a client with no accounts
    pub fn no_accounts() -> Self {
        Response::new([
            tokens::INFO,
            tokens::NO_ACCOUNTS_FOUND,
            "You have no active accounts.",
        ])
    }

    /// `OK;CLIENT_ADDED;clientId;accountNumber`
    pub fn client_added(client_id: ClientId, account_number: &str) -> Self {
        Response::new([
            tokens::OK,
            tokens::CLIENT_ADDED,
            &client_id.to_string(),
            account_number,
        ])
    }

    /// `OK;ACCOUNT_ADDED_TO_CLIENT;accountNumber`
    pub fn account_added(account_number: &str) -> Self {
        Response::new([tokens::OK, tokens::ACCOUNT_ADDED_TO_CLIENT, account_number])
    }

    /// `CLIENT_INFO;id;first;last;nationalId;acctList-or-marker`
    pub fn client_info(client: &Client, accounts: &[Account]) -> Self {
        let account_list = if accounts.is_empty() {
            tokens::NO_ACCOUNTS_MARKER.to_string()
        } else {
            format_account_list(accounts)
        };
        Response::new([
            tokens::CLIENT_INFO,
            &client.id.to_string(),
            &client.first_name,
            &client.last_name,
            &client.national_id,
            &account_list,
        ])
    }

    /// `ACCOUNT_DETAILS;dbId;number;balance;ownerId;ownerFirst;ownerLast;ownerNationalId`
    ///
    /// Owner fields fall back to `N/A` placeholders when the owning
    /// client row is missing; the account is still reported.
    pub fn account_details(account: &Account, owner: Option<&Client>) -> Self {
        let (first, last, national_id) = match owner {
            Some(owner) => (
                owner.first_name.as_str(),
                owner.last_name.as_str(),
                owner.national_id.as_str(),
            ),
            None => ("N/A", "N/A", "N/A"),
        };
        Response::new([
            tokens::ACCOUNT_DETAILS,
            &account.id.to_string(),
            &account.number,
            &account.balance.to_string(),
            &account.client_id.to_string(),
            first,
            last,
            national_id,
        ])
    }

    /// `OK;CLIENT_INFO_UPDATED`
    pub fn client_info_updated() -> Self {
        Response::new([tokens::OK, tokens::CLIENT_INFO_UPDATED])
    }

    /// `OK;CLIENT_DELETED;clientId`
    pub fn client_deleted(client_id: ClientId) -> Self {
        Response::new([tokens::OK, tokens::CLIENT_DELETED, &client_id.to_string()])
    }

    /// `OK;ACCOUNT_DELETED;accountNumber`
    pub fn account_deleted(number: &str) -> Self {
        Response::new([tokens::OK, tokens::ACCOUNT_DELETED, number])
    }

    // --- failure responses ---

    /// Map a handler failure to its one wire response
    ///
    /// Not-found and insufficient-funds outcomes use their bare legacy
    /// tokens; everything else is `ERROR;KIND[;detail]`. Storage and
    /// internal failures deliberately carry a generic detail on the wire;
    /// the full error goes to the server log, not to the peer.
    pub fn from_error(error: &BankError) -> Self {
        match error {
            BankError::EmptyCommand => {
                Response::error(tokens::EMPTY_COMMAND, "Empty command received.")
            }
            BankError::UnknownCommand { .. } => {
                Response::error(tokens::UNKNOWN_COMMAND, &error.to_string())
            }
            BankError::MissingAdminSubcommand | BankError::UnknownAdminSubcommand { .. } => {
                Response::error(tokens::UNKNOWN_ADMIN_SUBCOMMAND, &error.to_string())
            }
            BankError::MissingParameter { .. }
            | BankError::InvalidParameter { .. }
            | BankError::SameAccountTransfer { .. } => {
                Response::error(tokens::PARAM, &error.to_string())
            }
            BankError::AuthRequired => {
                Response::error(tokens::AUTH_REQUIRED, "Please login first.")
            }
            BankError::LoginFailed => {
                Response::error(tokens::LOGIN_FAILED, "Invalid Client ID or password.")
            }
            BankError::AlreadyLoggedIn { client } => {
                Response::error(tokens::ALREADY_LOGGED_IN, &format!("Client ID {}", client))
            }
            BankError::AccessDenied { .. } => {
                Response::error(tokens::ACCESS_DENIED, "Account does not belong to you.")
            }
            BankError::ClientNotFound { .. } => Response::new([tokens::CLIENT_NOT_FOUND]),
            BankError::AccountNotFound { .. } => Response::new([tokens::ACCOUNT_NOT_FOUND]),
            BankError::SourceAccountNotFound { .. } => {
                Response::new([tokens::ERROR, tokens::SOURCE_ACCOUNT_NOT_FOUND])
            }
            BankError::DestinationAccountNotFound { .. } => {
                Response::new([tokens::ERROR, tokens::DESTINATION_ACCOUNT_NOT_FOUND])
            }
            BankError::InsufficientFunds { .. } => Response::new([tokens::INSUFFICIENT_FUNDS]),
            BankError::DuplicateNationalId { .. } => Response::error(
                tokens::NATIONAL_ID_EXISTS,
                "Client with this national id already exists.",
            ),
            BankError::NationalIdTakenByOther { .. } => Response::error(
                tokens::NATIONAL_ID_EXISTS_OTHER,
                "New national id belongs to another client.",
            ),
            BankError::UpdateFailed { .. } => {
                Response::error(tokens::UPDATE_FAILED, "Update failed or no changes made.")
            }
            BankError::ClientDeletionFailed { client } => {
                Response::error(tokens::CLIENT_DELETION_FAILED, &client.to_string())
            }
            BankError::AccountDeletionFailed { number } => {
                Response::error(tokens::ACCOUNT_DELETION_FAILED, number)
            }
            BankError::Storage { .. } => {
                Response::error(tokens::STORAGE, "Storage error, please retry later.")
            }
            BankError::ArithmeticOverflow { .. } | BankError::Io { .. } => {
                Response::error(tokens::UNEXPECTED, "Unexpected server error.")
            }
        }
    }

    fn error(kind: &str, detail: &str) -> Self {
        Response::new([tokens::ERROR, kind, &codec::sanitize(detail)])
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Render accounts as `number:balance` pairs joined with commas
fn format_account_list(accounts: &[Account]) -> String {
    accounts
        .iter()
        .map(|a| format!("{}:{}", a.number, a.balance))
        .collect::<Vec<_>>()
        .join(",")
}
