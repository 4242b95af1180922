//! Core traits for ledger storage, account management and time
//!
//! This module defines the seams between the ledger core and its collaborators
//! so that the in-memory store can be swapped for another storage engine, and
//! so tests can inject failing stores or fixed clocks.

use crate::types::{
    Account, AccountId, LedgerError, LedgerSnapshot, NewAccount, OwnerId, TransactionId,
    TransactionKind, TransactionRecord,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Durable ledger state: account balances plus the append-only transaction log
///
/// Implementations own the authoritative copy of both. Every method must be
/// safe to call concurrently; `append` is additionally only called while the
/// caller holds the account's lock.
pub trait LedgerStore: Send + Sync {
    /// Get the current state of an account
    fn account(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Get the account's records in ascending `(timestamp, id)` order
    ///
    /// Returns an empty sequence for an unknown account.
    fn transactions(&self, id: AccountId) -> Vec<TransactionRecord>;

    /// Look up a single record by its id
    fn transaction(&self, id: TransactionId) -> Result<TransactionRecord, LedgerError>;

    /// Get a consistent pair of account state and ordered log
    fn snapshot(&self, id: AccountId) -> Result<LedgerSnapshot, LedgerError>;

    /// Atomically append a record and apply its effect to the balance
    ///
    /// Re-validates against the latest balance. On any error neither the
    /// balance nor the log is changed.
    fn append(
        &self,
        id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<(Account, TransactionRecord), LedgerError>;
}

/// Account lifecycle owned outside the ledger core
pub trait AccountRepository: Send + Sync {
    /// Open a new account
    fn open_account(&self, request: NewAccount) -> Result<Account, LedgerError>;

    /// Close an account; refused while the account owns transaction records
    fn close_account(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Change an account's display number, keeping numbers unique
    fn renumber(&self, id: AccountId, number: &str) -> Result<Account, LedgerError>;

    /// All accounts, in no particular order
    fn accounts(&self) -> Vec<Account>;

    /// Accounts held by `owner`, in no particular order
    fn accounts_of(&self, owner: OwnerId) -> Vec<Account>;
}

/// Source of commit timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
