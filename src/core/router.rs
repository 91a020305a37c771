//! Command router
//!
//! Routes one decoded request to its handler and turns the outcome into
//! exactly one response. The router owns the session gate: while a
//! session is anonymous only `LOGIN` and the `ADMIN` channel are
//! reachable, everything else is answered with an authentication-required
//! error and the session is left untouched. Admin commands deliberately
//! bypass the gate; they are a separate trust channel keyed only by
//! command name (see DESIGN.md).
//!
//! Every handler failure is converted to a structured error response
//! here; nothing a handler does can terminate the connection. Only the
//! transport layer ends the per-connection loop, plus the one cooperative
//! case: a successful `LOGOUT` reply asks the loop to exit.

use crate::core::ledger::Ledger;
use crate::protocol::{codec, command, AdminCommand, Command, Response};
use crate::types::{BankError, ClientId, Session};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Outcome of routing one request line
#[derive(Debug)]
pub struct Reply {
    /// The single response line for this request
    pub response: Response,
    /// True after a successful logout: write the response, then exit
    pub end_session: bool,
}

impl Reply {
    fn error(error: BankError) -> Self {
        Reply {
            response: Response::from_error(&error),
            end_session: false,
        }
    }
}

/// Per-server command router, shared by all connection workers
///
/// Cheap to clone; every clone routes against the same ledger.
#[derive(Clone)]
pub struct Router {
    ledger: Ledger,
}

impl Router {
    /// Create a router over the shared ledger
    pub fn new(ledger: Ledger) -> Self {
        Router { ledger }
    }

    /// Process one raw request line against the connection's session
    ///
    /// Decodes, validates, applies the session gate, dispatches, and
    /// folds any failure into a structured error response. Always returns
    /// a reply; the connection stays alive no matter what the line held.
    pub fn handle_line(&self, session: &mut Session, line: &str) -> Reply {
        let fields = codec::decode(line);
        let name = fields.first().map(|f| f.trim()).unwrap_or("");
        if name.is_empty() {
            warn!("empty command received");
            return Reply::error(BankError::EmptyCommand);
        }

        // The gate is keyed on the command name alone and sits ahead of
        // parameter validation: while anonymous, everything except LOGIN
        // and the ADMIN channel is refused outright.
        if !session.is_authenticated() && command::requires_auth(name) {
            return Reply::error(BankError::AuthRequired);
        }

        let command = match Command::parse(&fields) {
            Ok(command) => command,
            Err(error) => {
                warn!(%error, "request rejected during parsing");
                return Reply::error(error);
            }
        };

        let ends_session = matches!(command, Command::Logout);
        match self.dispatch(session, command) {
            Ok(response) => Reply {
                response,
                end_session: ends_session,
            },
            Err(error) => {
                match &error {
                    BankError::Storage { message } => {
                        tracing::error!(%message, "storage failure while handling request")
                    }
                    _ => warn!(%error, "request failed"),
                }
                Reply::error(error)
            }
        }
    }

    fn dispatch(&self, session: &mut Session, command: Command) -> Result<Response, BankError> {
        match command {
            Command::Login {
                client_id,
                password,
            } => self.handle_login(session, client_id, &password),
            Command::Logout => self.handle_logout(session),
            Command::Balance { number } => self.handle_balance(session, &number),
            Command::Deposit { number, amount } => self.handle_deposit(&number, amount),
            Command::Withdraw { number, amount } => self.handle_withdraw(session, &number, amount),
            Command::Transfer { from, to, amount } => {
                self.handle_transfer(session, &from, &to, amount)
            }
            Command::ListMyAccounts => self.handle_list_accounts(session),
            Command::Admin(admin) => self.dispatch_admin(admin),
        }
    }

    // --- customer surface ---

    fn handle_login(
        &self,
        session: &mut Session,
        client_id: ClientId,
        password: &str,
    ) -> Result<Response, BankError> {
        if let Some(current) = session.client_id() {
            return Err(BankError::AlreadyLoggedIn { client: current });
        }
        match self.ledger.authenticate(client_id, password)? {
            Some(client) => {
                info!(client = client.id, "client logged in");
                let response = Response::login_successful(&client.first_name, client.id);
                session.login(client.id, client.first_name);
                Ok(response)
            }
            None => {
                warn!(client = client_id, "login failed");
                Err(BankError::LoginFailed)
            }
        }
    }

    fn handle_logout(&self, session: &mut Session) -> Result<Response, BankError> {
        // The gate guarantees an authenticated session here.
        let first_name = session.logout().ok_or(BankError::AuthRequired)?;
        info!("client logged out");
        Ok(Response::logout_successful(&first_name))
    }

    fn handle_balance(&self, session: &Session, number: &str) -> Result<Response, BankError> {
        let account = self
            .ledger
            .find_account(number)?
            .ok_or_else(|| BankError::account_not_found(number))?;
        if session.client_id() != Some(account.client_id) {
            return Err(BankError::access_denied(number));
        }
        Ok(Response::balance_is(account.balance))
    }

    /// Deposits are allowed onto any existing account once authenticated;
    /// only reads and debits check ownership.
    fn handle_deposit(&self, number: &str, amount: Decimal) -> Result<Response, BankError> {
        let new_balance = self.ledger.deposit(number, amount)?;
        info!(account = number, %amount, "deposit applied");
        Ok(Response::deposit_successful(new_balance))
    }

    fn handle_withdraw(
        &self,
        session: &Session,
        number: &str,
        amount: Decimal,
    ) -> Result<Response, BankError> {
        let account = self
            .ledger
            .find_account(number)?
            .ok_or_else(|| BankError::account_not_found(number))?;
        if session.client_id() != Some(account.client_id) {
            return Err(BankError::access_denied(number));
        }
        let new_balance = self.ledger.withdraw(number, amount)?;
        info!(account = number, %amount, "withdrawal applied");
        Ok(Response::withdrawal_successful(new_balance))
    }

    fn handle_transfer(
        &self,
        session: &Session,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Response, BankError> {
        if from == to {
            return Err(BankError::SameAccountTransfer {
                number: from.to_string(),
            });
        }
        let source =
            self.ledger
                .find_account(from)?
                .ok_or_else(|| BankError::SourceAccountNotFound {
                    number: from.to_string(),
                })?;
        if self.ledger.find_account(to)?.is_none() {
            return Err(BankError::DestinationAccountNotFound {
                number: to.to_string(),
            });
        }
        if session.client_id() != Some(source.client_id) {
            return Err(BankError::access_denied(from));
        }
        self.ledger.transfer(from, to, amount)?;
        info!(from, to, %amount, "transfer applied");
        Ok(Response::transfer_successful())
    }

    fn handle_list_accounts(&self, session: &Session) -> Result<Response, BankError> {
        let client = session.client_id().ok_or(BankError::AuthRequired)?;
        let accounts = self.ledger.accounts_for_client(client)?;
        if accounts.is_empty() {
            Ok(Response::no_accounts())
        } else {
            Ok(Response::my_accounts(&accounts))
        }
    }

    // --- admin surface ---

    fn dispatch_admin(&self, command: AdminCommand) -> Result<Response, BankError> {
        match command {
            AdminCommand::AddClient {
                first_name,
                last_name,
                national_id,
                password,
            } => self.admin_add_client(&first_name, &last_name, &national_id, &password),
            AdminCommand::AddAccountToClient {
                client_id,
                initial_balance,
            } => {
                let account = self.ledger.create_account(client_id, initial_balance)?;
                info!(client = client_id, account = %account.number, "admin added account");
                Ok(Response::account_added(&account.number))
            }
            AdminCommand::GetClientInfoById { client_id } => {
                let client = self
                    .ledger
                    .client_by_id(client_id)?
                    .ok_or(BankError::ClientNotFound { client: client_id })?;
                let accounts = self.ledger.accounts_for_client(client_id)?;
                Ok(Response::client_info(&client, &accounts))
            }
            AdminCommand::GetAccountDetails { number } => {
                let account = self
                    .ledger
                    .find_account(&number)?
                    .ok_or_else(|| BankError::account_not_found(&number))?;
                let owner = self.ledger.client_by_id(account.client_id)?;
                Ok(Response::account_details(&account, owner.as_ref()))
            }
            AdminCommand::UpdateClientInfoById {
                client_id,
                first_name,
                last_name,
                national_id,
            } => self.admin_update_client(client_id, &first_name, &last_name, &national_id),
            AdminCommand::DeleteClient { client_id } => {
                if self.ledger.delete_client(client_id)? {
                    info!(client = client_id, "admin deleted client");
                    Ok(Response::client_deleted(client_id))
                } else {
                    Err(BankError::ClientDeletionFailed { client: client_id })
                }
            }
            AdminCommand::DeleteAccount { number } => {
                if self.ledger.delete_account(&number)? {
                    info!(account = %number, "admin deleted account");
                    Ok(Response::account_deleted(&number))
                } else {
                    Err(BankError::AccountDeletionFailed { number })
                }
            }
        }
    }

    /// Create a client plus their first, zero-balance account
    fn admin_add_client(
        &self,
        first_name: &str,
        last_name: &str,
        national_id: &str,
        password: &str,
    ) -> Result<Response, BankError> {
        if self.ledger.client_by_national_id(national_id)?.is_some() {
            return Err(BankError::DuplicateNationalId {
                national_id: national_id.to_string(),
            });
        }
        let client_id = self
            .ledger
            .create_client(first_name, last_name, national_id, password)?;
        let account = self.ledger.create_account(client_id, Decimal::ZERO)?;
        info!(client = client_id, account = %account.number, "admin added client");
        Ok(Response::client_added(client_id, &account.number))
    }

    fn admin_update_client(
        &self,
        client_id: ClientId,
        first_name: &str,
        last_name: &str,
        national_id: &str,
    ) -> Result<Response, BankError> {
        let current = self
            .ledger
            .client_by_id(client_id)?
            .ok_or(BankError::ClientNotFound { client: client_id })?;

        if current.national_id != national_id {
            if let Some(existing) = self.ledger.client_by_national_id(national_id)? {
                if existing.id != client_id {
                    return Err(BankError::NationalIdTakenByOther {
                        national_id: national_id.to_string(),
                    });
                }
            }
        }

        if self
            .ledger
            .update_client_info(client_id, first_name, last_name, national_id)?
        {
            info!(client = client_id, "admin updated client info");
            Ok(Response::client_info_updated())
        } else {
            Err(BankError::UpdateFailed { client: client_id })
        }
    }
}
