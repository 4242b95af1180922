//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Seams for storage, account management and time
//! - `validation` - Pure transaction validation
//! - `account_guard` - Per-account mutual exclusion
//! - `memory_store` - In-memory ledger store and account repository
//! - `statement` - Statement reconstruction
//! - `ledger` - Facade used by the request layer
//! - `batch_processor` - Account-partitioned command execution

pub mod account_guard;
pub mod batch_processor;
pub mod ledger;
pub mod memory_store;
pub mod statement;
pub mod traits;
pub mod validation;

pub use account_guard::{AccountGuard, AccountLock};
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use ledger::{Ledger, LedgerConfig};
pub use memory_store::MemoryLedgerStore;
pub use statement::StatementBuilder;
pub use traits::{AccountRepository, Clock, LedgerStore, SystemClock};
