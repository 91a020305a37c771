//! Account ledger
//!
//! The ledger owns every durable mutation of client and account rows. It
//! is a thin, stateless layer over the storage collaborator: each
//! operation reads the rows it needs fresh from the store (nothing is
//! cached between requests), enforces the money rules (amounts positive,
//! balances never negative, transfers atomic) and delegates the actual
//! row changes to the store's single-row update or paired transfer
//! primitive. One ledger instance is shared by every connection worker.

use crate::storage::BankStore;
use crate::types::{
    Account, BankError, Client, ClientId, ACCOUNT_NUMBER_DIGITS, ACCOUNT_NUMBER_PREFIX,
};
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Shared, thread-safe ledger over a storage collaborator
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn BankStore>,
}

impl Ledger {
    /// Create a ledger over the given store
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Ledger { store }
    }

    // --- reads ---

    /// Look up a client by id
    pub fn client_by_id(&self, client: ClientId) -> Result<Option<Client>, BankError> {
        self.store.client_by_id(client)
    }

    /// Look up a client by national id
    pub fn client_by_national_id(&self, national_id: &str) -> Result<Option<Client>, BankError> {
        self.store.client_by_national_id(national_id)
    }

    /// Look up an account by number
    pub fn find_account(&self, number: &str) -> Result<Option<Account>, BankError> {
        self.store.account_by_number(number)
    }

    /// All accounts owned by a client
    pub fn accounts_for_client(&self, client: ClientId) -> Result<Vec<Account>, BankError> {
        self.store.accounts_by_client(client)
    }

    /// Check credentials, returning the identity on an exact match
    ///
    /// A missing id and a wrong password are the same `None`; the caller
    /// turns either into a login failure, never an error.
    pub fn authenticate(
        &self,
        client: ClientId,
        password: &str,
    ) -> Result<Option<Client>, BankError> {
        self.store.authenticate(client, password)
    }

    // --- provisioning ---

    /// Create a client row, returning the generated id
    ///
    /// The store enforces national-id uniqueness at the insert; callers
    /// that want the distinct duplicate error should check
    /// [`Ledger::client_by_national_id`] first.
    pub fn create_client(
        &self,
        first_name: &str,
        last_name: &str,
        national_id: &str,
        password: &str,
    ) -> Result<ClientId, BankError> {
        self.store
            .insert_client(first_name, last_name, national_id, password)
    }

    /// Create an account for a client with the given opening balance
    ///
    /// Generates a random `PL` + 26-digit number and retries generation
    /// until no existing account holds it.
    pub fn create_account(
        &self,
        client: ClientId,
        initial_balance: Decimal,
    ) -> Result<Account, BankError> {
        if self.store.client_by_id(client)?.is_none() {
            return Err(BankError::ClientNotFound { client });
        }
        let number = loop {
            let candidate = generate_account_number();
            if self.store.account_by_number(&candidate)?.is_none() {
                break candidate;
            }
        };
        self.store.insert_account(client, &number, initial_balance)
    }

    // --- money movement ---

    /// Credit an account, returning the new balance
    pub fn deposit(&self, number: &str, amount: Decimal) -> Result<Decimal, BankError> {
        let account = self
            .store
            .account_by_number(number)?
            .ok_or_else(|| BankError::account_not_found(number))?;
        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("deposit", number))?;
        self.store.update_balance(number, new_balance)?;
        Ok(new_balance)
    }

    /// Debit an account, returning the new balance
    ///
    /// Rejects with `InsufficientFunds` when the freshly read balance is
    /// below the requested amount; the account is left untouched.
    pub fn withdraw(&self, number: &str, amount: Decimal) -> Result<Decimal, BankError> {
        let account = self
            .store
            .account_by_number(number)?
            .ok_or_else(|| BankError::account_not_found(number))?;
        if account.balance < amount {
            return Err(BankError::insufficient_funds(
                number,
                account.balance,
                amount,
            ));
        }
        let new_balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("withdrawal", number))?;
        self.store.update_balance(number, new_balance)?;
        Ok(new_balance)
    }

    /// Move `amount` from one account to another atomically
    ///
    /// The debit precondition is checked against a read taken immediately
    /// before the store transaction, and checked again inside it; either
    /// both balances change by exactly the amount or neither does.
    pub fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<(), BankError> {
        if from == to {
            return Err(BankError::SameAccountTransfer {
                number: from.to_string(),
            });
        }
        let source = self
            .store
            .account_by_number(from)?
            .ok_or_else(|| BankError::SourceAccountNotFound {
                number: from.to_string(),
            })?;
        if source.balance < amount {
            return Err(BankError::insufficient_funds(from, source.balance, amount));
        }
        self.store.transfer(from, to, amount)
    }

    // --- maintenance ---

    /// Update a client's names and national id
    ///
    /// Returns whether a row was affected; the password and id are not
    /// touched by this operation.
    pub fn update_client_info(
        &self,
        client: ClientId,
        first_name: &str,
        last_name: &str,
        national_id: &str,
    ) -> Result<bool, BankError> {
        self.store
            .update_client(client, first_name, last_name, national_id)
    }

    /// Delete a client and, by cascade, all owned accounts
    pub fn delete_client(&self, client: ClientId) -> Result<bool, BankError> {
        self.store.delete_client(client)
    }

    /// Delete a single account
    pub fn delete_account(&self, number: &str) -> Result<bool, BankError> {
        self.store.delete_account(number)
    }
}

/// Random candidate account number: `PL` followed by 26 decimal digits
fn generate_account_number() -> String {
    let mut rng = rand::thread_rng();
    let mut number = String::with_capacity(ACCOUNT_NUMBER_PREFIX.len() + ACCOUNT_NUMBER_DIGITS);
    number.push_str(ACCOUNT_NUMBER_PREFIX);
    for _ in 0..ACCOUNT_NUMBER_DIGITS {
        number.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    number
}
