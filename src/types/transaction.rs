//! Transaction-related types for the ledger
//!
//! This module defines identifiers, the transaction kind, committed transaction
//! records and the commands fed to the ledger by the processing pipelines.

use super::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Account identifier
pub type AccountId = u32;

/// Client (owner) identifier
pub type OwnerId = u32;

/// Transaction identifier, assigned by the store at commit time
pub type TransactionId = u64;

/// Effect of a transaction on the account balance
///
/// Amounts are always recorded as positive magnitudes; the kind carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Adds the amount to the balance
    Credit,

    /// Subtracts the amount from the balance
    ///
    /// Requires the balance to cover the amount.
    Debit,
}

impl TransactionKind {
    /// Lowercase name as used at the boundary
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// Signed effect of `amount` under this kind
    pub fn delta(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Credit => amount,
            TransactionKind::Debit => -amount,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    /// Parse a kind case-insensitively; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            _ => Err(LedgerError::invalid_kind(s)),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Committed transaction record
///
/// Records are immutable once committed and are never deleted while their
/// account exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// Owning account
    pub account: AccountId,

    /// Commit time, non-decreasing per account
    pub timestamp: DateTime<Utc>,

    /// Credit or debit
    pub kind: TransactionKind,

    /// Strictly positive magnitude
    pub amount: Decimal,
}

/// Command read from the input by the processing pipelines
///
/// `Submit` keeps the kind as the raw string so that kind validation happens in
/// the ledger, exactly as for any other caller.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Open an account through the account repository
    Open {
        account: AccountId,
        opening_balance: Decimal,
    },

    /// Submit a transaction intent
    Submit {
        account: AccountId,
        kind: String,
        amount: Decimal,
    },
}

impl LedgerCommand {
    /// Account targeted by this command
    pub fn account(&self) -> AccountId {
        match self {
            LedgerCommand::Open { account, .. } | LedgerCommand::Submit { account, .. } => {
                *account
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("credit", TransactionKind::Credit)]
    #[case("CREDIT", TransactionKind::Credit)]
    #[case("Debit", TransactionKind::Debit)]
    #[case("  debit ", TransactionKind::Debit)]
    fn test_kind_parses_case_insensitively(#[case] input: &str, #[case] expected: TransactionKind) {
        assert_eq!(input.parse::<TransactionKind>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("deposit")]
    #[case("credit card")]
    fn test_kind_rejects_unknown(#[case] input: &str) {
        assert_eq!(
            input.parse::<TransactionKind>(),
            Err(LedgerError::invalid_kind(input))
        );
    }

    #[test]
    fn test_kind_delta_sign() {
        let amount = Decimal::new(1250, 2);
        assert_eq!(TransactionKind::Credit.delta(amount), amount);
        assert_eq!(TransactionKind::Debit.delta(amount), -amount);
    }

    #[test]
    fn test_command_account() {
        let open = LedgerCommand::Open {
            account: 4,
            opening_balance: Decimal::ZERO,
        };
        let submit = LedgerCommand::Submit {
            account: 5,
            kind: "credit".to_string(),
            amount: Decimal::ONE,
        };

        assert_eq!(open.account(), 4);
        assert_eq!(submit.account(), 5);
    }
}
