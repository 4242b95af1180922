//! Read-side types: consistent ledger snapshots and reconstructed statements

use super::account::Account;
use super::transaction::TransactionRecord;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Causally consistent pair of balance and ordered log for one account
///
/// The balance reflects exactly the records in `transactions`, which are in
/// ascending `(timestamp, id)` order.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub account: Account,
    pub transactions: Vec<TransactionRecord>,
}

/// One statement line: the record and the balance right after it
#[derive(Debug, Clone, PartialEq)]
pub struct StatementEntry {
    pub record: TransactionRecord,
    pub running_balance: Decimal,
}

/// Point-in-time account statement
///
/// `opening_balance + total_credits - total_debits == closing_balance` holds
/// exactly, and the running balance of the last entry equals the closing
/// balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Account the statement was built for, as of the snapshot
    pub account: Account,

    /// Balance immediately before the earliest entry
    pub opening_balance: Decimal,

    /// Entries in ascending time order
    pub entries: Vec<StatementEntry>,

    /// Current authoritative balance
    pub closing_balance: Decimal,

    /// Sum of all credit amounts
    pub total_credits: Decimal,

    /// Sum of all debit amounts
    pub total_debits: Decimal,

    /// When the statement was generated
    pub generated_at: DateTime<Utc>,
}
