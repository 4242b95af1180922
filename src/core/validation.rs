//! Transaction validation
//!
//! Pure checks applied to a transaction intent before any lock is taken, and
//! again by the store against the latest balance. Nothing here performs I/O or
//! touches shared state.

use crate::types::{AccountId, LedgerError, TransactionKind};
use rust_decimal::Decimal;

/// Validate a transaction intent as received at the boundary
///
/// Checks run in this order:
/// 1. `amount` must be strictly positive (`InvalidAmount`)
/// 2. `kind` must be `credit` or `debit`, case-insensitive (`InvalidKind`)
/// 3. a debit must not exceed `balance` (`InsufficientFunds`)
///
/// # Returns
///
/// The normalized kind on success.
pub fn validate(
    account: AccountId,
    kind: &str,
    amount: Decimal,
    balance: Decimal,
) -> Result<TransactionKind, LedgerError> {
    validate_amount(amount)?;
    let kind: TransactionKind = kind.parse()?;
    check_funds(account, kind, amount, balance)?;
    Ok(kind)
}

/// Validate an already-normalized intent against a balance
pub fn check(
    account: AccountId,
    kind: TransactionKind,
    amount: Decimal,
    balance: Decimal,
) -> Result<(), LedgerError> {
    validate_amount(amount)?;
    check_funds(account, kind, amount, balance)
}

/// Amounts are magnitudes and must be strictly positive
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

fn check_funds(
    account: AccountId,
    kind: TransactionKind,
    amount: Decimal,
    balance: Decimal,
) -> Result<(), LedgerError> {
    if kind == TransactionKind::Debit && amount > balance {
        return Err(LedgerError::insufficient_funds(account, balance, amount));
    }
    Ok(())
}
