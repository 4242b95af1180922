//! Thread-safe in-memory ledger store
//!
//! This module provides the `MemoryLedgerStore`, which owns account balances
//! and the append-only transaction log and also acts as the account
//! repository.
//!
//! # Design
//!
//! Each account's balance and log live together in one `DashMap` entry. An
//! append mutates both while holding that entry's shard lock, and every read
//! clones them under the same lock, so a reader never observes a balance
//! without its records or the other way round. Operations on different
//! accounts only contend when they hash to the same shard.
//!
//! # Ordering
//!
//! Transaction ids come from a global monotonic counter and timestamps are
//! clamped to be non-decreasing per account, so appending keeps each log
//! sorted by `(timestamp, id)` without re-sorting.

use crate::core::traits::{AccountRepository, Clock, LedgerStore, SystemClock};
use crate::core::validation;
use crate::types::{
    Account, AccountId, LedgerError, LedgerSnapshot, NewAccount, OwnerId, TransactionId,
    TransactionKind, TransactionRecord,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Balance and history of one account, always mutated together
#[derive(Debug, Clone)]
struct AccountLedger {
    account: Account,
    log: Vec<TransactionRecord>,
}

/// In-memory ledger store and account repository
pub struct MemoryLedgerStore {
    /// Account state and log keyed by account id
    ledgers: DashMap<AccountId, AccountLedger>,

    /// Reserved display numbers, for uniqueness
    numbers: DashMap<String, AccountId>,

    /// Owning account of every committed transaction id
    locations: DashMap<TransactionId, AccountId>,

    /// Next transaction id to hand out
    next_transaction_id: AtomicU64,

    clock: Arc<dyn Clock>,
}

impl MemoryLedgerStore {
    /// Create an empty store using the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store that timestamps records with `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            ledgers: DashMap::new(),
            numbers: DashMap::new(),
            locations: DashMap::new(),
            next_transaction_id: AtomicU64::new(1),
            clock,
        }
    }

    fn allocate_transaction_id(&self) -> TransactionId {
        self.next_transaction_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryLedgerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLedgerStore")
            .field("accounts", &self.ledgers.len())
            .field("next_transaction_id", &self.next_transaction_id)
            .finish()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.ledgers
            .get(&id)
            .map(|ledger| ledger.account.clone())
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    fn transactions(&self, id: AccountId) -> Vec<TransactionRecord> {
        self.ledgers
            .get(&id)
            .map(|ledger| ledger.log.clone())
            .unwrap_or_default()
    }

    fn transaction(&self, id: TransactionId) -> Result<TransactionRecord, LedgerError> {
        // Copy the account id out so the index shard is released before the ledger is read
        let account = self
            .locations
            .get(&id)
            .map(|location| *location.value())
            .ok_or_else(|| LedgerError::transaction_not_found(id))?;

        let ledger = self
            .ledgers
            .get(&account)
            .ok_or_else(|| LedgerError::transaction_not_found(id))?;

        // Logs are sorted by id as well as by time
        ledger
            .log
            .binary_search_by_key(&id, |record| record.id)
            .map(|index| ledger.log[index].clone())
            .map_err(|_| LedgerError::transaction_not_found(id))
    }

    fn snapshot(&self, id: AccountId) -> Result<LedgerSnapshot, LedgerError> {
        let ledger = self
            .ledgers
            .get(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;

        Ok(LedgerSnapshot {
            account: ledger.account.clone(),
            transactions: ledger.log.clone(),
        })
    }

    fn append(
        &self,
        id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<(Account, TransactionRecord), LedgerError> {
        let mut entry = self
            .ledgers
            .get_mut(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;
        let ledger = entry.value_mut();

        // Re-validate against the balance as it is now, not as the caller saw it
        validation::check(id, kind, amount, ledger.account.balance)?;

        let balance = ledger
            .account
            .balance
            .checked_add(kind.delta(amount))
            .ok_or_else(|| LedgerError::arithmetic_overflow(kind.as_str(), id))?;

        let now = self.clock.now();
        let timestamp = match ledger.log.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        let record = TransactionRecord {
            id: self.allocate_transaction_id(),
            account: id,
            timestamp,
            kind,
            amount,
        };

        // Nothing below can fail: publish balance and record together
        ledger.account.balance = balance;
        ledger.log.push(record.clone());
        self.locations.insert(record.id, id);

        Ok((ledger.account.clone(), record))
    }
}

impl AccountRepository for MemoryLedgerStore {
    fn open_account(&self, request: NewAccount) -> Result<Account, LedgerError> {
        if request.opening_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(request.opening_balance));
        }

        let slot = match self.ledgers.entry(request.id) {
            Entry::Occupied(_) => return Err(LedgerError::duplicate_account(request.id)),
            Entry::Vacant(slot) => slot,
        };

        match self.numbers.entry(request.number.clone()) {
            Entry::Occupied(_) => {
                return Err(LedgerError::duplicate_account_number(&request.number))
            }
            Entry::Vacant(number) => {
                number.insert(request.id);
            }
        }

        let account = Account {
            id: request.id,
            number: request.number,
            owner: request.owner,
            balance: request.opening_balance,
        };
        slot.insert(AccountLedger {
            account: account.clone(),
            log: Vec::new(),
        });

        Ok(account)
    }

    fn close_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        // The emptiness check and the removal happen under the same shard lock
        if let Some((_, ledger)) = self.ledgers.remove_if(&id, |_, ledger| ledger.log.is_empty()) {
            self.numbers.remove(&ledger.account.number);
            return Ok(ledger.account);
        }

        match self.ledgers.get(&id) {
            Some(ledger) => Err(LedgerError::account_has_transactions(id, ledger.log.len())),
            None => Err(LedgerError::account_not_found(id)),
        }
    }

    fn renumber(&self, id: AccountId, number: &str) -> Result<Account, LedgerError> {
        let mut ledger = self
            .ledgers
            .get_mut(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;

        if ledger.account.number == number {
            return Ok(ledger.account.clone());
        }

        match self.numbers.entry(number.to_string()) {
            Entry::Occupied(_) => return Err(LedgerError::duplicate_account_number(number)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let previous = std::mem::replace(&mut ledger.account.number, number.to_string());
        self.numbers.remove(&previous);

        Ok(ledger.account.clone())
    }

    fn accounts(&self) -> Vec<Account> {
        self.ledgers
            .iter()
            .map(|entry| entry.value().account.clone())
            .collect()
    }

    fn accounts_of(&self, owner: OwnerId) -> Vec<Account> {
        self.ledgers
            .iter()
            .filter(|entry| entry.value().account.owner == Some(owner))
            .map(|entry| entry.value().account.clone())
            .collect()
    }
}
