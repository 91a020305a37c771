//! Command parsing and parameter validation
//!
//! Requests are resolved into the closed [`Command`] / [`AdminCommand`]
//! enums exactly once, right after decoding. Dispatch downstream matches
//! on variants; no string table is consulted per request. Each positional
//! field is validated here against its declared semantic type (non-empty
//! string, positive integer, decimal ranges, national id, account
//! number), and a failure short-circuits with an error naming the field
//! and its position. No handler runs, and no storage is touched, unless
//! every parameter validated.

use crate::types::{account, client, BankError, ClientId};
use rust_decimal::Decimal;

/// Top-level command names
pub mod names {
    pub const LOGIN: &str = "LOGIN";
    pub const LOGOUT: &str = "LOGOUT";
    pub const BALANCE: &str = "BALANCE";
    pub const DEPOSIT: &str = "DEPOSIT";
    pub const WITHDRAW: &str = "WITHDRAW";
    pub const TRANSFER: &str = "TRANSFER";
    pub const LIST_MY_ACCOUNTS: &str = "LIST_MY_ACCOUNTS";
    pub const ADMIN: &str = "ADMIN";
}

/// Admin sub-command names (second field under `ADMIN`)
pub mod admin_names {
    pub const ADD_CLIENT: &str = "ADD_CLIENT";
    pub const ADD_ACCOUNT_TO_CLIENT: &str = "ADD_ACCOUNT_TO_CLIENT";
    pub const GET_CLIENT_INFO_BY_ID: &str = "GET_CLIENT_INFO_BY_ID";
    pub const GET_ACCOUNT_DETAILS: &str = "GET_ACCOUNT_DETAILS";
    pub const UPDATE_CLIENT_INFO_BY_ID: &str = "UPDATE_CLIENT_INFO_BY_ID";
    pub const DELETE_CLIENT: &str = "DELETE_CLIENT";
    pub const DELETE_ACCOUNT: &str = "DELETE_ACCOUNT";
}

/// One fully validated customer-surface request
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `LOGIN;clientId;password`
    Login { client_id: ClientId, password: String },

    /// `LOGOUT`, which ends the session and the connection loop
    Logout,

    /// `BALANCE;accountNumber`
    Balance { number: String },

    /// `DEPOSIT;accountNumber;amount`
    Deposit { number: String, amount: Decimal },

    /// `WITHDRAW;accountNumber;amount`
    Withdraw { number: String, amount: Decimal },

    /// `TRANSFER;fromAccountNumber;toAccountNumber;amount`
    Transfer {
        from: String,
        to: String,
        amount: Decimal,
    },

    /// `LIST_MY_ACCOUNTS`
    ListMyAccounts,

    /// `ADMIN;SUBCOMMAND;...`, the separate provisioning trust channel
    Admin(AdminCommand),
}

/// One fully validated admin-surface request
///
/// Admin commands bypass the session authentication gate entirely; they
/// are keyed only by command name. That is the inherited contract of this
/// protocol, not an oversight (see DESIGN.md).
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    /// `ADMIN;ADD_CLIENT;first;last;nationalId;password`; also creates
    /// one zero-balance account for the new client
    AddClient {
        first_name: String,
        last_name: String,
        national_id: String,
        password: String,
    },

    /// `ADMIN;ADD_ACCOUNT_TO_CLIENT;clientId;initialBalance`
    AddAccountToClient {
        client_id: ClientId,
        initial_balance: Decimal,
    },

    /// `ADMIN;GET_CLIENT_INFO_BY_ID;clientId`
    GetClientInfoById { client_id: ClientId },

    /// `ADMIN;GET_ACCOUNT_DETAILS;accountNumber`
    GetAccountDetails { number: String },

    /// `ADMIN;UPDATE_CLIENT_INFO_BY_ID;clientId;first;last;nationalId`
    UpdateClientInfoById {
        client_id: ClientId,
        first_name: String,
        last_name: String,
        national_id: String,
    },

    /// `ADMIN;DELETE_CLIENT;clientId`
    DeleteClient { client_id: ClientId },

    /// `ADMIN;DELETE_ACCOUNT;accountNumber`
    DeleteAccount { number: String },
}

impl Command {
    /// Parse decoded fields into a validated command
    ///
    /// # Errors
    ///
    /// - `EmptyCommand` for an empty field sequence or blank first field
    /// - `UnknownCommand` / `UnknownAdminSubcommand` / `MissingAdminSubcommand`
    ///   for unrecognized names
    /// - `MissingParameter` / `InvalidParameter` when a positional field
    ///   fails its declared semantic type
    pub fn parse(fields: &[String]) -> Result<Command, BankError> {
        let name = match fields.first().map(|f| f.trim()) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BankError::EmptyCommand),
        };

        match name {
            names::LOGIN => Ok(Command::Login {
                client_id: required_client_id(fields, 1, "clientId", names::LOGIN)?,
                password: required(fields, 2, "password", names::LOGIN)?.to_string(),
            }),
            names::LOGOUT => Ok(Command::Logout),
            names::BALANCE => Ok(Command::Balance {
                number: required_account_number(fields, 1, "accountNumber", names::BALANCE)?,
            }),
            names::DEPOSIT => Ok(Command::Deposit {
                number: required_account_number(fields, 1, "accountNumber", names::DEPOSIT)?,
                amount: required_positive_decimal(fields, 2, "amount", names::DEPOSIT)?,
            }),
            names::WITHDRAW => Ok(Command::Withdraw {
                number: required_account_number(fields, 1, "accountNumber", names::WITHDRAW)?,
                amount: required_positive_decimal(fields, 2, "amount", names::WITHDRAW)?,
            }),
            names::TRANSFER => Ok(Command::Transfer {
                from: required_account_number(fields, 1, "fromAccountNumber", names::TRANSFER)?,
                to: required_account_number(fields, 2, "toAccountNumber", names::TRANSFER)?,
                amount: required_positive_decimal(fields, 3, "amount", names::TRANSFER)?,
            }),
            names::LIST_MY_ACCOUNTS => Ok(Command::ListMyAccounts),
            names::ADMIN => AdminCommand::parse(fields).map(Command::Admin),
            _ => Err(BankError::UnknownCommand {
                name: name.to_string(),
            }),
        }
    }
}

/// Whether the session gate applies to the command with this name
///
/// `LOGIN` must be reachable while anonymous, and `ADMIN` is its own
/// trust channel. Every other name, recognized or not, requires an
/// authenticated session, and the gate is checked before any parameter
/// is validated.
pub fn requires_auth(name: &str) -> bool {
    name != names::LOGIN && name != names::ADMIN
}

impl AdminCommand {
    /// Parse the sub-command and its parameters from the full field list
    ///
    /// Positions in errors are absolute within the request line, so the
    /// caller can point at the exact offending field.
    fn parse(fields: &[String]) -> Result<AdminCommand, BankError> {
        let sub = match fields.get(1).map(|f| f.trim()) {
            Some(sub) if !sub.is_empty() => sub,
            _ => return Err(BankError::MissingAdminSubcommand),
        };

        match sub {
            admin_names::ADD_CLIENT => Ok(AdminCommand::AddClient {
                first_name: required(fields, 2, "firstName", sub)?.to_string(),
                last_name: required(fields, 3, "lastName", sub)?.to_string(),
                national_id: required_national_id(fields, 4, "nationalId", sub)?,
                password: required(fields, 5, "password", sub)?.to_string(),
            }),
            admin_names::ADD_ACCOUNT_TO_CLIENT => Ok(AdminCommand::AddAccountToClient {
                client_id: required_client_id(fields, 2, "clientId", sub)?,
                initial_balance: required_non_negative_decimal(fields, 3, "initialBalance", sub)?,
            }),
            admin_names::GET_CLIENT_INFO_BY_ID => Ok(AdminCommand::GetClientInfoById {
                client_id: required_client_id(fields, 2, "clientId", sub)?,
            }),
            admin_names::GET_ACCOUNT_DETAILS => Ok(AdminCommand::GetAccountDetails {
                number: required_account_number(fields, 2, "accountNumber", sub)?,
            }),
            admin_names::UPDATE_CLIENT_INFO_BY_ID => Ok(AdminCommand::UpdateClientInfoById {
                client_id: required_client_id(fields, 2, "clientId", sub)?,
                first_name: required(fields, 3, "newFirstName", sub)?.to_string(),
                last_name: required(fields, 4, "newLastName", sub)?.to_string(),
                national_id: required_national_id(fields, 5, "newNationalId", sub)?,
            }),
            admin_names::DELETE_CLIENT => Ok(AdminCommand::DeleteClient {
                client_id: required_client_id(fields, 2, "clientId", sub)?,
            }),
            admin_names::DELETE_ACCOUNT => Ok(AdminCommand::DeleteAccount {
                number: required_account_number(fields, 2, "accountNumber", sub)?,
            }),
            _ => Err(BankError::UnknownAdminSubcommand {
                name: sub.to_string(),
            }),
        }
    }
}

// Positional field validators. Each declares the field's name and the
// absolute position it occupies so a failure identifies both.

fn required<'a>(
    fields: &'a [String],
    position: usize,
    field: &str,
    command: &str,
) -> Result<&'a str, BankError> {
    match fields.get(position).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BankError::missing_parameter(command, field, position)),
    }
}

fn required_client_id(
    fields: &[String],
    position: usize,
    field: &str,
    command: &str,
) -> Result<ClientId, BankError> {
    let value = required(fields, position, field, command)?;
    match value.parse::<ClientId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(BankError::invalid_parameter(
            command,
            field,
            position,
            value,
            "a positive integer",
        )),
    }
}

fn required_decimal(
    fields: &[String],
    position: usize,
    field: &str,
    command: &str,
) -> Result<Decimal, BankError> {
    let value = required(fields, position, field, command)?;
    value.parse::<Decimal>().map_err(|_| {
        BankError::invalid_parameter(command, field, position, value, "a decimal number")
    })
}

fn required_positive_decimal(
    fields: &[String],
    position: usize,
    field: &str,
    command: &str,
) -> Result<Decimal, BankError> {
    let value = required_decimal(fields, position, field, command)?;
    if value <= Decimal::ZERO {
        return Err(BankError::invalid_parameter(
            command,
            field,
            position,
            &value.to_string(),
            "a strictly positive decimal",
        ));
    }
    Ok(value)
}

fn required_non_negative_decimal(
    fields: &[String],
    position: usize,
    field: &str,
    command: &str,
) -> Result<Decimal, BankError> {
    let value = required_decimal(fields, position, field, command)?;
    if value < Decimal::ZERO {
        return Err(BankError::invalid_parameter(
            command,
            field,
            position,
            &value.to_string(),
            "a non-negative decimal",
        ));
    }
    Ok(value)
}

fn required_national_id(
    fields: &[String],
    position: usize,
    field: &str,
    command: &str,
) -> Result<String, BankError> {
    let value = required(fields, position, field, command)?;
    if !client::is_valid_national_id(value) {
        return Err(BankError::invalid_parameter(
            command,
            field,
            position,
            value,
            "exactly 11 digits",
        ));
    }
    Ok(value.to_string())
}

/// Account numbers are case-normalized to upper before the format check,
/// so `pl...` on the wire targets the same account as `PL...`.
fn required_account_number(
    fields: &[String],
    position: usize,
    field: &str,
    command: &str,
) -> Result<String, BankError> {
    let value = required(fields, position, field, command)?.to_uppercase();
    if !account::is_valid_account_number(&value) {
        return Err(BankError::invalid_parameter(
            command,
            field,
            position,
            &value,
            "PL followed by 26 digits",
        ));
    }
    Ok(value)
}
