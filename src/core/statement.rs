//! Statement reconstruction
//!
//! Rebuilds an account statement from a consistent ledger snapshot. The
//! opening balance is recovered by inverting the net effect of the whole log
//! from the closing balance:
//!
//! ```text
//! opening = closing - sum(credits) + sum(debits)
//! ```
//!
//! and running balances are then replayed forward from it. All arithmetic is
//! exact decimal arithmetic, so the last running balance equals the closing
//! balance with no drift.

use crate::types::{LedgerError, LedgerSnapshot, Statement, StatementEntry, TransactionKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Read-side statement builder
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementBuilder;

impl StatementBuilder {
    /// Build a statement from `snapshot`, stamped with `generated_at`
    ///
    /// The snapshot's transactions must be in ascending time order, as
    /// returned by the store.
    pub fn build(
        snapshot: LedgerSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Result<Statement, LedgerError> {
        let LedgerSnapshot {
            account,
            transactions,
        } = snapshot;
        let account_id = account.id;
        let overflow = move || LedgerError::arithmetic_overflow("statement", account_id);

        let mut total_credits = Decimal::ZERO;
        let mut total_debits = Decimal::ZERO;
        for record in &transactions {
            match record.kind {
                TransactionKind::Credit => {
                    total_credits = total_credits.checked_add(record.amount).ok_or_else(overflow)?
                }
                TransactionKind::Debit => {
                    total_debits = total_debits.checked_add(record.amount).ok_or_else(overflow)?
                }
            }
        }

        let closing_balance = account.balance;
        let opening_balance = closing_balance
            .checked_sub(total_credits)
            .and_then(|b| b.checked_add(total_debits))
            .ok_or_else(overflow)?;

        let mut running_balance = opening_balance;
        let mut entries = Vec::with_capacity(transactions.len());
        for record in transactions {
            running_balance = running_balance
                .checked_add(record.kind.delta(record.amount))
                .ok_or_else(overflow)?;
            entries.push(StatementEntry {
                record,
                running_balance,
            });
        }
        debug_assert_eq!(running_balance, closing_balance);

        Ok(Statement {
            account,
            opening_balance,
            entries,
            closing_balance,
            total_credits,
            total_debits,
            generated_at,
        })
    }
}
