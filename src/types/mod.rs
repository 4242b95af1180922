//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account state and account-opening requests
//! - `transaction`: Identifiers, transaction kinds, records and input commands
//! - `statement`: Ledger snapshots and reconstructed statements
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod statement;
pub mod transaction;

pub use account::{Account, NewAccount};
pub use error::LedgerError;
pub use statement::{LedgerSnapshot, Statement, StatementEntry};
pub use transaction::{
    AccountId, LedgerCommand, OwnerId, TransactionId, TransactionKind, TransactionRecord,
};
