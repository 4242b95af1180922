//! Processing strategy module
//!
//! Defines the Strategy pattern for complete ledger pipelines: reading commands
//! from CSV, applying them to a fresh in-memory ledger and writing a report.
//! The implementation (sequential or batched across accounts) is selected at
//! runtime.

use crate::cli::StrategyType;
use crate::core::{AccountRepository, Ledger, LedgerConfig, MemoryLedgerStore};
use crate::io::csv_format::{write_accounts_csv, write_statement_csv};
use crate::types::AccountId;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// What a pipeline writes once all commands are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Report {
    /// Every account with its current balance
    #[default]
    Accounts,
    /// The statement of a single account
    Statement(AccountId),
}

/// Settings shared by every strategy
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub ledger: LedgerConfig,
    pub report: Report,
}

/// Processing strategy trait for complete ledger pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Apply the commands in `input_path` and write the report to `output`
    ///
    /// Rejected commands and malformed rows are logged and skipped. Only fatal
    /// problems (unreadable input, runtime creation, unwritable output, a
    /// statement for an unknown account) are returned as `Err`.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

pub(crate) fn new_ledger(config: &LedgerConfig) -> Arc<Ledger<MemoryLedgerStore>> {
    Arc::new(Ledger::new(
        Arc::new(MemoryLedgerStore::new()),
        config.clone(),
    ))
}

pub(crate) fn write_report(
    ledger: &Ledger<MemoryLedgerStore>,
    report: Report,
    output: &mut dyn Write,
) -> Result<(), String> {
    match report {
        Report::Accounts => write_accounts_csv(&ledger.store().accounts(), output),
        Report::Statement(account) => {
            let statement = ledger
                .build_statement(account)
                .map_err(|e| format!("Failed to build statement: {}", e))?;
            write_statement_csv(&statement, output)
        }
    }
}

/// Create a processing strategy
///
/// `batch` only applies to the async strategy and falls back to
/// `BatchConfig::default()`.
pub fn create_strategy(
    strategy_type: StrategyType,
    batch: Option<BatchConfig>,
    options: PipelineOptions,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(options)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            batch.unwrap_or_default(),
            options,
        )),
    }
}
