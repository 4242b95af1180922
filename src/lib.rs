//! Banque Ledger Library
//!
//! # Overview
//!
//! Core of a retail banking back end: a single-currency ledger that records
//! credits and debits against accounts, keeps balances exact and never
//! negative, serializes concurrent mutations per account and rebuilds account
//! statements from the transaction log.
//!
//! # Architecture
//!
//! - [`types`] - Accounts, transaction records, commands, statements and [`LedgerError`]
//! - [`core`] - Business logic:
//!   - [`core::validation`] - Stateless checks on amount, kind and funds
//!   - [`core::account_guard`] - Per-account exclusive locks with bounded wait
//!   - [`core::memory_store`] - In-memory ledger store and account repository
//!   - [`core::statement`] - Statement reconstruction from a snapshot
//!   - [`core::ledger`] - The facade: submit, read and build statements
//!   - [`core::batch_processor`] - Command execution partitioned by account
//! - [`io`] - CSV command input and report output
//! - [`strategy`] - Sequential and batched processing pipelines
//! - [`cli`] - Command-line arguments
//!
//! # Invariants
//!
//! - A balance is never negative.
//! - A balance always equals the net of its account's transaction log plus the
//!   opening balance.
//! - A rejected transaction leaves no trace.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{Ledger, LedgerConfig, MemoryLedgerStore, StatementBuilder};
pub use io::{write_accounts_csv, write_statement_csv};
pub use types::{
    Account, AccountId, LedgerCommand, LedgerError, NewAccount, Statement, StatementEntry,
    TransactionId, TransactionKind, TransactionRecord,
};
