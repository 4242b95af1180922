//! Error types for the ledger
//!
//! This module defines every error the ledger core can return. Errors are
//! typed values; callers are expected to match on them rather than on messages.
//!
//! # Error Categories
//!
//! - **Validation Errors**: invalid amount, invalid kind, insufficient funds.
//!   Terminal for the request, never retried, account state untouched.
//! - **Lookup Errors**: account or transaction not found, duplicate account or number,
//!   account still owning transactions.
//! - **Transient Errors**: lock contention (`Busy`) and storage faults.
//!   Retryable by the caller; the account is left in its pre-call state.
//! - **Arithmetic Errors**: balance overflow

use super::transaction::{AccountId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Amount is zero or negative
    #[error("Invalid amount {amount}: amounts must be strictly positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Transaction kind is neither credit nor debit
    #[error("Invalid transaction kind '{kind}': expected 'credit' or 'debit'")]
    InvalidKind {
        /// The rejected kind as received
        kind: String,
    },

    /// Debit larger than the current balance
    #[error("Insufficient funds on account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account ID
        account: AccountId,
        /// Balance at validation time
        balance: Decimal,
        /// Requested debit
        requested: Decimal,
    },

    /// No account with this id
    #[error("Account {account} not found")]
    AccountNotFound {
        /// Account ID that was not found
        account: AccountId,
    },

    /// No transaction with this id
    #[error("Transaction {transaction} not found")]
    TransactionNotFound {
        /// Transaction ID that was not found
        transaction: TransactionId,
    },

    /// The account lock could not be acquired within the bounded wait
    ///
    /// Retryable with backoff; never indicates corruption.
    #[error("Account {account} is busy: lock not acquired within {waited_ms} ms")]
    Busy {
        /// Account ID
        account: AccountId,
        /// How long the caller waited
        waited_ms: u64,
    },

    /// The storage layer failed during an operation
    ///
    /// Nothing was written; the caller may retry.
    #[error("Storage failure: {message}")]
    StorageFailure {
        /// Description of the fault
        message: String,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account ID
        account: AccountId,
    },

    /// An account with this id already exists
    #[error("Account {account} already exists")]
    DuplicateAccount {
        /// Account ID
        account: AccountId,
    },

    /// Another account already uses this display number
    #[error("Account number '{number}' is already in use")]
    DuplicateAccountNumber {
        /// The conflicting number
        number: String,
    },

    /// The account still owns transaction records and cannot be closed
    #[error("Account {account} owns {count} transaction(s) and cannot be closed")]
    AccountHasTransactions {
        /// Account ID
        account: AccountId,
        /// Number of records it owns
        count: usize,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an InvalidKind error
    pub fn invalid_kind(kind: &str) -> Self {
        LedgerError::InvalidKind {
            kind: kind.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(transaction: TransactionId) -> Self {
        LedgerError::TransactionNotFound { transaction }
    }

    /// Create a Busy error
    pub fn busy(account: AccountId, waited_ms: u64) -> Self {
        LedgerError::Busy { account, waited_ms }
    }

    /// Create a StorageFailure error
    pub fn storage_failure(message: impl Into<String>) -> Self {
        LedgerError::StorageFailure {
            message: message.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: AccountId) -> Self {
        LedgerError::DuplicateAccount { account }
    }

    /// Create a DuplicateAccountNumber error
    pub fn duplicate_account_number(number: &str) -> Self {
        LedgerError::DuplicateAccountNumber {
            number: number.to_string(),
        }
    }

    /// Create an AccountHasTransactions error
    pub fn account_has_transactions(account: AccountId, count: usize) -> Self {
        LedgerError::AccountHasTransactions { account, count }
    }

    /// Whether the caller may retry the same request later
    ///
    /// Only lock contention and storage faults are transient. Every other
    /// error is terminal for the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::Busy { .. } | LedgerError::StorageFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: Decimal::new(-500, 2) },
        "Invalid amount -5.00: amounts must be strictly positive"
    )]
    #[case::invalid_kind(
        LedgerError::InvalidKind { kind: "transfer".to_string() },
        "Invalid transaction kind 'transfer': expected 'credit' or 'debit'"
    )]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds { account: 1, balance: Decimal::new(120000, 2), requested: Decimal::new(200000, 2) },
        "Insufficient funds on account 1: balance 1200.00, requested 2000.00"
    )]
    #[case::account_not_found(
        LedgerError::AccountNotFound { account: 42 },
        "Account 42 not found"
    )]
    #[case::transaction_not_found(
        LedgerError::TransactionNotFound { transaction: 77 },
        "Transaction 77 not found"
    )]
    #[case::busy(
        LedgerError::Busy { account: 3, waited_ms: 250 },
        "Account 3 is busy: lock not acquired within 250 ms"
    )]
    #[case::storage_failure(
        LedgerError::StorageFailure { message: "disk full".to_string() },
        "Storage failure: disk full"
    )]
    #[case::arithmetic_overflow(
        LedgerError::ArithmeticOverflow { operation: "credit".to_string(), account: 1 },
        "Arithmetic overflow in credit for account 1"
    )]
    #[case::duplicate_account_number(
        LedgerError::DuplicateAccountNumber { number: "ACC-000001".to_string() },
        "Account number 'ACC-000001' is already in use"
    )]
    #[case::account_has_transactions(
        LedgerError::AccountHasTransactions { account: 8, count: 2 },
        "Account 8 owns 2 transaction(s) and cannot be closed"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds(1, Decimal::new(5000, 4), Decimal::new(10000, 4)),
        LedgerError::InsufficientFunds { account: 1, balance: Decimal::new(5000, 4), requested: Decimal::new(10000, 4) }
    )]
    #[case::invalid_kind(
        LedgerError::invalid_kind("refund"),
        LedgerError::InvalidKind { kind: "refund".to_string() }
    )]
    #[case::busy(
        LedgerError::busy(2, 10),
        LedgerError::Busy { account: 2, waited_ms: 10 }
    )]
    #[case::storage_failure(
        LedgerError::storage_failure("timeout"),
        LedgerError::StorageFailure { message: "timeout".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case::busy(LedgerError::busy(1, 5), true)]
    #[case::storage(LedgerError::storage_failure("io"), true)]
    #[case::invalid_amount(LedgerError::invalid_amount(Decimal::ZERO), false)]
    #[case::invalid_kind(LedgerError::invalid_kind("x"), false)]
    #[case::insufficient(LedgerError::insufficient_funds(1, Decimal::ZERO, Decimal::ONE), false)]
    #[case::not_found(LedgerError::account_not_found(1), false)]
    #[case::overflow(LedgerError::arithmetic_overflow("credit", 1), false)]
    #[case::unknown_transaction(LedgerError::transaction_not_found(9), false)]
    fn test_is_retryable(#[case] error: LedgerError, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }
}
