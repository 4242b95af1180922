//! Ledger facade
//!
//! This module provides the `Ledger`, the entry point used by the request
//! layer. It wires validation, per-account locking, the store and statement
//! reconstruction together.
//!
//! # Mutation Flow
//!
//! ```text
//! submit_transaction
//!     ├── validation::validate   (no lock, against the last seen balance)
//!     ├── AccountGuard           (bounded wait, Busy on timeout)
//!     └── LedgerStore::append    (re-validates, appends and updates atomically)
//! ```
//!
//! Statements read a store snapshot, which is consistent by construction, so
//! they never take the account lock and never block mutations.

use crate::core::account_guard::AccountGuard;
use crate::core::statement::StatementBuilder;
use crate::core::traits::{Clock, LedgerStore, SystemClock};
use crate::core::validation;
use crate::types::{
    Account, AccountId, LedgerError, Statement, TransactionId, TransactionRecord,
};
use log::debug;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Ledger settings
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Longest a mutation waits for its account's lock before failing with `Busy`
    pub lock_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
        }
    }
}

impl LedgerConfig {
    /// Create a config with a custom lock timeout
    pub fn new(lock_timeout: Duration) -> Self {
        Self { lock_timeout }
    }
}

/// Single-account, single-currency ledger over a `LedgerStore`
///
/// Safe to share across tasks behind an `Arc`.
pub struct Ledger<S> {
    store: Arc<S>,
    guard: AccountGuard,
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
}

impl<S: fmt::Debug> fmt::Debug for Ledger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("store", &self.store)
            .field("guard", &self.guard)
            .field("config", &self.config)
            .finish()
    }
}

impl<S: LedgerStore> Ledger<S> {
    /// Create a ledger over `store`, stamping statements with the system clock
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self {
            store,
            guard: AccountGuard::new(),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Stamp statements with `clock` instead
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Current settings
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Validate and commit a credit or debit
    ///
    /// `kind` is matched case-insensitively against `credit` and `debit`.
    ///
    /// # Returns
    ///
    /// * `Ok(TransactionRecord)` - the committed record
    /// * `Err(LedgerError::AccountNotFound)` - unknown account
    /// * `Err(LedgerError::InvalidAmount)` - amount is not strictly positive
    /// * `Err(LedgerError::InvalidKind)` - kind is neither credit nor debit
    /// * `Err(LedgerError::InsufficientFunds)` - debit exceeds the balance
    /// * `Err(LedgerError::Busy)` - the account lock was not acquired in time
    /// * `Err(LedgerError::StorageFailure)` - the store failed; nothing was written
    ///
    /// On every error the account is left exactly as it was.
    pub async fn submit_transaction(
        &self,
        account: AccountId,
        kind: &str,
        amount: Decimal,
    ) -> Result<TransactionRecord, LedgerError> {
        let current = self.store.account(account)?;
        let kind = validation::validate(account, kind, amount, current.balance)?;

        let (updated, record) = self
            .guard
            .with_account_lock(account, self.config.lock_timeout, || async {
                self.store.append(account, kind, amount)
            })
            .await?;

        debug!(
            "Committed tx {} on account {}: {} {}, balance {}",
            record.id, account, record.kind, record.amount, updated.balance
        );

        Ok(record)
    }

    /// Get the current state of an account
    pub fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store.account(id)
    }

    /// List an account's records in ascending time order
    ///
    /// The result is an owned, re-enumerable sequence; empty for an unknown
    /// account.
    pub fn list_transactions(&self, id: AccountId) -> Vec<TransactionRecord> {
        self.store.transactions(id)
    }

    /// Get one committed record by id
    pub fn get_transaction(&self, id: TransactionId) -> Result<TransactionRecord, LedgerError> {
        self.store.transaction(id)
    }

    /// Reconstruct the account's statement from a consistent snapshot
    pub fn build_statement(&self, id: AccountId) -> Result<Statement, LedgerError> {
        let snapshot = self.store.snapshot(id)?;
        StatementBuilder::build(snapshot, self.clock.now())
    }
}
