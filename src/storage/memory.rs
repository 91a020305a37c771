//! In-memory implementation of the storage collaborator
//!
//! `MemoryStore` keeps both tables behind a single `RwLock`, which is
//! what makes the paired transfer update genuinely atomic: every check
//! and both row mutations happen under one write guard, so no reader can
//! observe a debited-but-not-credited state. Ids are assigned from
//! monotonic counters starting at 1, matching a relational store's
//! generated keys.

use crate::storage::BankStore;
use crate::types::{Account, AccountId, BankError, Client, ClientId};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Client row as stored: identity plus the password column
///
/// The password stays inside this module; lookups hand out only the
/// `Client` identity part.
#[derive(Debug, Clone)]
struct ClientRow {
    client: Client,
    password: String,
}

#[derive(Debug, Default)]
struct Tables {
    clients: HashMap<ClientId, ClientRow>,
    /// Accounts keyed by account number (the unique lookup key)
    accounts: HashMap<String, Account>,
    next_client_id: ClientId,
    next_account_id: AccountId,
}

/// Thread-safe in-memory `BankStore`
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, BankError> {
        self.tables
            .read()
            .map_err(|_| BankError::storage("storage lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, BankError> {
        self.tables
            .write()
            .map_err(|_| BankError::storage("storage lock poisoned"))
    }
}

impl BankStore for MemoryStore {
    fn insert_client(
        &self,
        first_name: &str,
        last_name: &str,
        national_id: &str,
        password: &str,
    ) -> Result<ClientId, BankError> {
        let mut tables = self.write()?;

        // Uniqueness enforced at the insert, under the same guard as the
        // lookup, so concurrent duplicate creations cannot both pass.
        if tables
            .clients
            .values()
            .any(|row| row.client.national_id == national_id)
        {
            return Err(BankError::DuplicateNationalId {
                national_id: national_id.to_string(),
            });
        }

        tables.next_client_id += 1;
        let id = tables.next_client_id;
        tables.clients.insert(
            id,
            ClientRow {
                client: Client {
                    id,
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    national_id: national_id.to_string(),
                },
                password: password.to_string(),
            },
        );
        Ok(id)
    }

    fn client_by_id(&self, client: ClientId) -> Result<Option<Client>, BankError> {
        Ok(self.read()?.clients.get(&client).map(|row| row.client.clone()))
    }

    fn client_by_national_id(&self, national_id: &str) -> Result<Option<Client>, BankError> {
        Ok(self
            .read()?
            .clients
            .values()
            .find(|row| row.client.national_id == national_id)
            .map(|row| row.client.clone()))
    }

    fn authenticate(&self, client: ClientId, password: &str) -> Result<Option<Client>, BankError> {
        Ok(self
            .read()?
            .clients
            .get(&client)
            .filter(|row| row.password == password)
            .map(|row| row.client.clone()))
    }

    fn update_client(
        &self,
        client: ClientId,
        first_name: &str,
        last_name: &str,
        national_id: &str,
    ) -> Result<bool, BankError> {
        let mut tables = self.write()?;
        match tables.clients.get_mut(&client) {
            Some(row) => {
                row.client.first_name = first_name.to_string();
                row.client.last_name = last_name.to_string();
                row.client.national_id = national_id.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_client(&self, client: ClientId) -> Result<bool, BankError> {
        let mut tables = self.write()?;
        if tables.clients.remove(&client).is_none() {
            return Ok(false);
        }
        // Cascade: drop every account owned by the deleted client.
        tables.accounts.retain(|_, account| account.client_id != client);
        Ok(true)
    }

    fn insert_account(
        &self,
        client: ClientId,
        number: &str,
        balance: Decimal,
    ) -> Result<Account, BankError> {
        let mut tables = self.write()?;
        if !tables.clients.contains_key(&client) {
            return Err(BankError::ClientNotFound { client });
        }
        if tables.accounts.contains_key(number) {
            return Err(BankError::storage(format!(
                "account number {} already exists",
                number
            )));
        }

        tables.next_account_id += 1;
        let account = Account {
            id: tables.next_account_id,
            client_id: client,
            number: number.to_string(),
            balance,
        };
        tables.accounts.insert(number.to_string(), account.clone());
        Ok(account)
    }

    fn account_by_number(&self, number: &str) -> Result<Option<Account>, BankError> {
        Ok(self.read()?.accounts.get(number).cloned())
    }

    fn accounts_by_client(&self, client: ClientId) -> Result<Vec<Account>, BankError> {
        let mut accounts: Vec<Account> = self
            .read()?
            .accounts
            .values()
            .filter(|account| account.client_id == client)
            .cloned()
            .collect();
        accounts.sort_by_key(|account| account.id);
        Ok(accounts)
    }

    fn update_balance(&self, number: &str, new_balance: Decimal) -> Result<(), BankError> {
        let mut tables = self.write()?;
        match tables.accounts.get_mut(number) {
            Some(account) => {
                account.balance = new_balance;
                Ok(())
            }
            None => Err(BankError::account_not_found(number)),
        }
    }

    fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<(), BankError> {
        let mut tables = self.write()?;

        if from == to {
            return Err(BankError::SameAccountTransfer {
                number: from.to_string(),
            });
        }

        let from_balance = match tables.accounts.get(from) {
            Some(account) => account.balance,
            None => {
                return Err(BankError::SourceAccountNotFound {
                    number: from.to_string(),
                })
            }
        };
        let to_balance = match tables.accounts.get(to) {
            Some(account) => account.balance,
            None => {
                return Err(BankError::DestinationAccountNotFound {
                    number: to.to_string(),
                })
            }
        };

        // Precondition re-checked inside the transaction boundary.
        if from_balance < amount {
            return Err(BankError::insufficient_funds(from, from_balance, amount));
        }

        let new_from = from_balance
            .checked_sub(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("transfer debit", from))?;
        let new_to = to_balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("transfer credit", to))?;

        // All checks passed; both rows commit under the same guard.
        if let Some(account) = tables.accounts.get_mut(from) {
            account.balance = new_from;
        }
        if let Some(account) = tables.accounts.get_mut(to) {
            account.balance = new_to;
        }
        Ok(())
    }

    fn delete_account(&self, number: &str) -> Result<bool, BankError> {
        Ok(self.write()?.accounts.remove(number).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn store_with_client(national_id: &str) -> (MemoryStore, ClientId) {
        let store = MemoryStore::new();
        let id = store
            .insert_client("Anna", "Kowalska", national_id, "pw1")
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_insert_client_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = store.insert_client("A", "B", "11111111111", "x").unwrap();
        let second = store.insert_client("C", "D", "22222222222", "y").unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_insert_client_rejects_duplicate_national_id() {
        let (store, _) = store_with_client("12345678901");
        let result = store.insert_client("Jan", "Nowak", "12345678901", "pw2");
        assert!(matches!(
            result.unwrap_err(),
            BankError::DuplicateNationalId { .. }
        ));
    }

    #[test]
    fn test_authenticate_checks_exact_password() {
        let (store, id) = store_with_client("12345678901");

        let client = store.authenticate(id, "pw1").unwrap().unwrap();
        assert_eq!(client.id, id);
        assert_eq!(client.first_name, "Anna");

        assert!(store.authenticate(id, "wrong").unwrap().is_none());
        assert!(store.authenticate(id, "PW1").unwrap().is_none());
        assert!(store.authenticate(999, "pw1").unwrap().is_none());
    }

    #[test]
    fn test_client_lookup_by_national_id() {
        let (store, id) = store_with_client("12345678901");
        let found = store.client_by_national_id("12345678901").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(store.client_by_national_id("99999999999").unwrap().is_none());
    }

    #[test]
    fn test_update_client_reports_affected_row() {
        let (store, id) = store_with_client("12345678901");

        assert!(store.update_client(id, "Jan", "Nowak", "98765432109").unwrap());
        let client = store.client_by_id(id).unwrap().unwrap();
        assert_eq!(client.first_name, "Jan");
        assert_eq!(client.national_id, "98765432109");

        assert!(!store.update_client(999, "X", "Y", "11111111111").unwrap());
    }

    #[test]
    fn test_insert_account_requires_existing_client() {
        let store = MemoryStore::new();
        let result = store.insert_account(42, "PL01", Decimal::ZERO);
        assert!(matches!(
            result.unwrap_err(),
            BankError::ClientNotFound { client: 42 }
        ));
    }

    #[test]
    fn test_insert_account_rejects_duplicate_number() {
        let (store, id) = store_with_client("12345678901");
        store.insert_account(id, "PL01", Decimal::ZERO).unwrap();
        let result = store.insert_account(id, "PL01", Decimal::ZERO);
        assert!(matches!(result.unwrap_err(), BankError::Storage { .. }));
    }

    #[test]
    fn test_delete_client_cascades_to_accounts() {
        let (store, id) = store_with_client("12345678901");
        store.insert_account(id, "PL01", dec("10.00")).unwrap();
        store.insert_account(id, "PL02", dec("20.00")).unwrap();

        assert!(store.delete_client(id).unwrap());
        assert!(store.client_by_id(id).unwrap().is_none());
        assert!(store.account_by_number("PL01").unwrap().is_none());
        assert!(store.account_by_number("PL02").unwrap().is_none());

        assert!(!store.delete_client(id).unwrap());
    }

    #[test]
    fn test_accounts_by_client_ordered_by_id() {
        let (store, id) = store_with_client("12345678901");
        store.insert_account(id, "PL0B", Decimal::ZERO).unwrap();
        store.insert_account(id, "PL0A", Decimal::ZERO).unwrap();

        let numbers: Vec<String> = store
            .accounts_by_client(id)
            .unwrap()
            .into_iter()
            .map(|a| a.number)
            .collect();
        assert_eq!(numbers, vec!["PL0B", "PL0A"]);
    }

    #[test]
    fn test_update_balance_missing_account() {
        let store = MemoryStore::new();
        let result = store.update_balance("PL01", Decimal::ONE);
        assert!(matches!(
            result.unwrap_err(),
            BankError::AccountNotFound { .. }
        ));
    }

    #[test]
    fn test_transfer_moves_exact_amount() {
        let (store, id) = store_with_client("12345678901");
        store.insert_account(id, "PL01", dec("100.00")).unwrap();
        store.insert_account(id, "PL02", dec("0.00")).unwrap();

        store.transfer("PL01", "PL02", dec("40.00")).unwrap();

        assert_eq!(
            store.account_by_number("PL01").unwrap().unwrap().balance,
            dec("60.00")
        );
        assert_eq!(
            store.account_by_number("PL02").unwrap().unwrap().balance,
            dec("40.00")
        );
    }

    #[test]
    fn test_transfer_insufficient_funds_leaves_both_unchanged() {
        let (store, id) = store_with_client("12345678901");
        store.insert_account(id, "PL01", dec("30.00")).unwrap();
        store.insert_account(id, "PL02", dec("5.00")).unwrap();

        let result = store.transfer("PL01", "PL02", dec("30.01"));
        assert!(matches!(
            result.unwrap_err(),
            BankError::InsufficientFunds { .. }
        ));

        assert_eq!(
            store.account_by_number("PL01").unwrap().unwrap().balance,
            dec("30.00")
        );
        assert_eq!(
            store.account_by_number("PL02").unwrap().unwrap().balance,
            dec("5.00")
        );
    }

    #[test]
    fn test_transfer_missing_endpoints() {
        let (store, id) = store_with_client("12345678901");
        store.insert_account(id, "PL01", dec("10.00")).unwrap();

        assert!(matches!(
            store.transfer("PLXX", "PL01", Decimal::ONE).unwrap_err(),
            BankError::SourceAccountNotFound { .. }
        ));
        assert!(matches!(
            store.transfer("PL01", "PLXX", Decimal::ONE).unwrap_err(),
            BankError::DestinationAccountNotFound { .. }
        ));
        // Nothing moved in either failed attempt.
        assert_eq!(
            store.account_by_number("PL01").unwrap().unwrap().balance,
            dec("10.00")
        );
    }

    #[test]
    fn test_transfer_same_account_rejected() {
        let (store, id) = store_with_client("12345678901");
        store.insert_account(id, "PL01", dec("10.00")).unwrap();
        assert!(matches!(
            store.transfer("PL01", "PL01", Decimal::ONE).unwrap_err(),
            BankError::SameAccountTransfer { .. }
        ));
    }

    #[test]
    fn test_concurrent_transfers_preserve_total() {
        let (store, id) = store_with_client("12345678901");
        store.insert_account(id, "PL01", dec("1000.00")).unwrap();
        store.insert_account(id, "PL02", dec("1000.00")).unwrap();

        let store = Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            let (from, to) = if i % 2 == 0 {
                ("PL01", "PL02")
            } else {
                ("PL02", "PL01")
            };
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    // Failures (insufficient funds under contention) are
                    // fine; only partial application would not be.
                    let _ = store.transfer(from, to, dec("7.00"));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let a = store.account_by_number("PL01").unwrap().unwrap().balance;
        let b = store.account_by_number("PL02").unwrap().unwrap().balance;
        assert_eq!(a + b, dec("2000.00"));
        assert!(a >= Decimal::ZERO && b >= Decimal::ZERO);
    }
}
