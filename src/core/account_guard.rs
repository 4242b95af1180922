//! Per-account mutual exclusion
//!
//! This module provides the `AccountGuard`, which guarantees at most one
//! in-flight mutation per account while letting mutations on different
//! accounts proceed independently.
//!
//! # Design
//!
//! Locks live in a `DashMap` keyed by account id, so there is no global lock:
//! looking up or creating an account's lock only touches one shard. Each entry
//! is an `Arc<tokio::sync::Mutex<()>>`. Tokio's mutex is fair, so callers
//! contending for the same account are served in the order they queued.
//!
//! # Lifecycle
//!
//! Lock objects are created on first use. When an `AccountLock` is dropped (on
//! every exit path, including panics unwinding through the holder) the mutex
//! is released and the map entry is removed if nobody else references it. A
//! waiter holds its own clone of the `Arc`, so an entry with queued waiters is
//! never reclaimed.

use crate::types::{AccountId, LedgerError};
use dashmap::DashMap;
use log::debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<AccountId, Arc<Mutex<()>>>;

/// Per-account lock registry
#[derive(Debug, Default)]
pub struct AccountGuard {
    locks: LockTable,
}

/// Exclusive hold on one account, released on drop
#[derive(Debug)]
pub struct AccountLock<'a> {
    account: AccountId,
    permit: Option<OwnedMutexGuard<()>>,
    locks: &'a LockTable,
}

impl AccountGuard {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the lock for `account`, waiting at most `timeout`
    ///
    /// A zero timeout tries exactly once.
    ///
    /// # Returns
    ///
    /// * `Ok(AccountLock)` - the lock is held until the handle is dropped
    /// * `Err(LedgerError::Busy)` - the wait timed out; nothing was changed
    pub async fn acquire(
        &self,
        account: AccountId,
        timeout: Duration,
    ) -> Result<AccountLock<'_>, LedgerError> {
        // Clone under the shard lock so reclamation sees this caller as a holder
        let mutex = Arc::clone(
            self.locks
                .entry(account)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );

        let acquired = tokio::time::timeout(timeout, mutex.lock_owned()).await;

        match acquired {
            Ok(permit) => Ok(AccountLock {
                account,
                permit: Some(permit),
                locks: &self.locks,
            }),
            Err(_) => {
                reclaim(&self.locks, account);
                let waited_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                Err(LedgerError::busy(account, waited_ms))
            }
        }
    }

    /// Run `operation` while holding the lock for `account`
    ///
    /// The lock is released whether the operation succeeds, fails or panics.
    pub async fn with_account_lock<F, Fut, T>(
        &self,
        account: AccountId,
        timeout: Duration,
        operation: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, LedgerError>>,
    {
        let _lock = self.acquire(account, timeout).await?;
        operation().await
    }

    /// Whether the account's lock is currently held
    #[cfg(test)]
    pub(crate) fn is_locked(&self, account: AccountId) -> bool {
        self.locks
            .get(&account)
            .map(|mutex| mutex.try_lock().is_err())
            .unwrap_or(false)
    }

    /// Number of accounts with a live lock object
    #[cfg(test)]
    pub(crate) fn tracked_accounts(&self) -> usize {
        self.locks.len()
    }
}

impl AccountLock<'_> {
    /// The account this lock protects
    pub fn account(&self) -> AccountId {
        self.account
    }
}

impl Drop for AccountLock<'_> {
    fn drop(&mut self) {
        // Release before reclaiming so our own guard no longer counts as a holder
        self.permit.take();
        reclaim(self.locks, self.account);
    }
}

/// Remove the account's lock object if the map holds the only reference
fn reclaim(locks: &LockTable, account: AccountId) {
    if locks
        .remove_if(&account, |_, mutex| Arc::strong_count(mutex) == 1)
        .is_some()
    {
        debug!("Reclaimed lock for account {}", account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_acquire_and_release() {
        let guard = AccountGuard::new();

        let lock = guard.acquire(1, WAIT).await.unwrap();
        assert_eq!(lock.account(), 1);
        assert!(guard.is_locked(1));

        drop(lock);
        assert!(!guard.is_locked(1));
    }

    #[tokio::test]
    async fn test_uncontended_lock_is_reclaimed() {
        let guard = AccountGuard::new();

        {
            let _lock = guard.acquire(1, WAIT).await.unwrap();
            assert_eq!(guard.tracked_accounts(), 1);
        }

        assert_eq!(guard.tracked_accounts(), 0);
    }

    #[tokio::test]
    async fn test_busy_after_timeout() {
        let guard = AccountGuard::new();
        let _held = guard.acquire(1, WAIT).await.unwrap();

        let result = guard.acquire(1, Duration::from_millis(20)).await;
        assert_eq!(result.unwrap_err(), LedgerError::busy(1, 20));

        // The holder's entry survives the timed-out waiter
        assert_eq!(guard.tracked_accounts(), 1);
        assert!(guard.is_locked(1));
    }

    #[tokio::test]
    async fn test_zero_timeout_acquires_free_lock() {
        let guard = AccountGuard::new();

        assert!(guard.acquire(1, Duration::ZERO).await.is_ok());
    }

    #[tokio::test]
    async fn test_distinct_accounts_do_not_block() {
        let guard = AccountGuard::new();
        let _held = guard.acquire(1, WAIT).await.unwrap();

        let other = guard.acquire(2, Duration::ZERO).await;
        assert!(other.is_ok());
        assert_eq!(guard.tracked_accounts(), 2);
    }

    #[tokio::test]
    async fn test_released_after_operation_error() {
        let guard = AccountGuard::new();

        let result: Result<(), LedgerError> = guard
            .with_account_lock(1, WAIT, || async { Err(LedgerError::account_not_found(1)) })
            .await;
        assert_eq!(result, Err(LedgerError::account_not_found(1)));

        assert!(!guard.is_locked(1));
        assert!(guard.acquire(1, Duration::ZERO).await.is_ok());
    }

    #[tokio::test]
    async fn test_with_account_lock_returns_operation_value() {
        let guard = AccountGuard::new();

        let value = guard
            .with_account_lock(3, WAIT, || async { Ok(42) })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(guard.tracked_accounts(), 0);
    }

    #[tokio::test]
    async fn test_released_after_panic() {
        let guard = Arc::new(AccountGuard::new());

        let task_guard = Arc::clone(&guard);
        let handle = tokio::spawn(async move {
            let _lock = task_guard.acquire(1, WAIT).await.unwrap();
            panic!("fault while holding the lock");
        });

        let join = handle.await;
        assert!(join.unwrap_err().is_panic());

        assert!(guard.acquire(1, Duration::ZERO).await.is_ok());
    }

    #[tokio::test]
    async fn test_waiters_are_served_in_arrival_order() {
        let guard = Arc::new(AccountGuard::new());
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let held = guard.acquire(1, WAIT).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..5 {
            let guard = Arc::clone(&guard);
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                let _lock = guard.acquire(1, WAIT).await.unwrap();
                order.lock().unwrap().push(i);
            }));
            // Let the spawned task run until it queues on the mutex
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        drop(held);
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(guard.tracked_accounts(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_at_most_one_holder_per_account() {
        let guard = Arc::new(AccountGuard::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let guard = Arc::clone(&guard);
            let inside = Arc::clone(&inside);
            let max_inside = Arc::clone(&max_inside);
            handles.push(tokio::spawn(async move {
                guard
                    .with_account_lock(1, WAIT, || async {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        inside.fetch_sub(1, Ordering::SeqCst);
                        Ok(())
                    })
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(guard.tracked_accounts(), 0);
    }
}
