//! Storage collaborator module
//!
//! The ledger talks to durable storage only through the [`BankStore`]
//! trait: row lookup by key, insert with a generated id, single-row
//! balance update, one paired-update transfer transaction, and delete
//! with a client-to-accounts cascade. Anything that satisfies this
//! contract (an embedded database, a remote relational store) can sit
//! behind the ledger; [`memory::MemoryStore`] is the in-process
//! implementation used by the server binary and the test suite.

use crate::types::{Account, BankError, Client, ClientId};
use rust_decimal::Decimal;

pub mod memory;

pub use memory::MemoryStore;

/// Durable row store for clients and accounts
///
/// All methods take `&self`; implementations are internally synchronized
/// and safe to share across an unbounded number of connection workers.
/// Reads always reflect the store's current state at call time; callers
/// never cache rows between requests.
pub trait BankStore: Send + Sync {
    /// Insert a client row, returning the generated id
    ///
    /// Fails with `DuplicateNationalId` if the national id is already
    /// present; uniqueness is enforced here, at the insert itself, so two
    /// concurrent creations cannot both commit.
    fn insert_client(
        &self,
        first_name: &str,
        last_name: &str,
        national_id: &str,
        password: &str,
    ) -> Result<ClientId, BankError>;

    /// Look up a client by id
    fn client_by_id(&self, client: ClientId) -> Result<Option<Client>, BankError>;

    /// Look up a client by national id
    fn client_by_national_id(&self, national_id: &str) -> Result<Option<Client>, BankError>;

    /// Compare credentials against the stored password
    ///
    /// Returns the identity (never the password) on an exact match, and
    /// `None` for a missing id or a mismatch; callers cannot tell the
    /// two apart, and the password never leaves the store.
    fn authenticate(&self, client: ClientId, password: &str) -> Result<Option<Client>, BankError>;

    /// Update a client's names and national id; the password and id are
    /// immutable through this call. Returns whether a row was affected.
    fn update_client(
        &self,
        client: ClientId,
        first_name: &str,
        last_name: &str,
        national_id: &str,
    ) -> Result<bool, BankError>;

    /// Delete a client row and cascade to all owned accounts
    ///
    /// Returns whether a client row was deleted; deleting a missing
    /// client is `Ok(false)`, never an error.
    fn delete_client(&self, client: ClientId) -> Result<bool, BankError>;

    /// Insert an account row with the given number and opening balance
    ///
    /// Fails with `ClientNotFound` if the owning client is absent and
    /// with a storage error if the number is already taken (callers
    /// generate candidate numbers and retry on collision).
    fn insert_account(
        &self,
        client: ClientId,
        number: &str,
        balance: Decimal,
    ) -> Result<Account, BankError>;

    /// Look up an account by number
    fn account_by_number(&self, number: &str) -> Result<Option<Account>, BankError>;

    /// All accounts owned by a client, ordered by account id
    fn accounts_by_client(&self, client: ClientId) -> Result<Vec<Account>, BankError>;

    /// Single-row balance update
    ///
    /// Fails with `AccountNotFound` if zero rows were affected.
    fn update_balance(&self, number: &str, new_balance: Decimal) -> Result<(), BankError>;

    /// Atomic paired debit/credit between two accounts
    ///
    /// Both updates apply together or neither applies; partial transfers
    /// are never observable by any other caller. The debit precondition
    /// (`balance >= amount`) is re-checked inside the transaction, so the
    /// sum of the two balances is invariant across the call.
    fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<(), BankError>;

    /// Delete a single account row
    ///
    /// Returns whether a row was deleted; a missing account is
    /// `Ok(false)`, never an error.
    fn delete_account(&self, number: &str) -> Result<bool, BankError>;
}
