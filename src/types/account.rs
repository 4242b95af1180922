//! Account-related types for the ledger
//!
//! This module defines the Account structure held by the ledger store and the
//! request used by the account repository to open new accounts.

use super::transaction::{AccountId, OwnerId};
use rust_decimal::Decimal;

/// Account state as owned by the ledger store
///
/// The balance always equals the opening balance plus the net effect of every
/// committed transaction record, applied in commit order.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Stable account identifier
    pub id: AccountId,

    /// Display identifier, unique across accounts
    pub number: String,

    /// Client owning the account, if one was recorded at opening
    pub owner: Option<OwnerId>,

    /// Current authoritative balance (never negative)
    pub balance: Decimal,
}

impl Account {
    /// Create a new account with a zero balance
    ///
    /// # Arguments
    ///
    /// * `id` - The account identifier
    /// * `number` - The display number for this account
    pub fn new(id: AccountId, number: impl Into<String>) -> Self {
        Account {
            id,
            number: number.into(),
            owner: None,
            balance: Decimal::ZERO,
        }
    }
}

/// Request to open a new account through the account repository
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// Identifier to assign to the account
    pub id: AccountId,

    /// Display number (must be unique)
    pub number: String,

    /// Owning client
    pub owner: Option<OwnerId>,

    /// Balance at creation, zero unless stated otherwise
    pub opening_balance: Decimal,
}

impl NewAccount {
    /// Build a request for a zero-balance account with the default number format
    pub fn new(id: AccountId) -> Self {
        NewAccount {
            id,
            number: Self::default_number(id),
            owner: None,
            opening_balance: Decimal::ZERO,
        }
    }

    /// Set the opening balance
    pub fn with_opening_balance(mut self, opening_balance: Decimal) -> Self {
        self.opening_balance = opening_balance;
        self
    }

    /// Set the owning client
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Default display number for an account id: `ACC-` followed by six digits
    pub fn default_number(id: AccountId) -> String {
        format!("ACC-{:06}", id)
    }
}
