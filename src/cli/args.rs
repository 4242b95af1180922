use crate::core::LedgerConfig;
use crate::strategy::{BatchConfig, PipelineOptions, Report};
use crate::types::AccountId;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Apply ledger commands from a CSV file and report balances or a statement
#[derive(Parser, Debug)]
#[command(name = "banque-ledger")]
#[command(about = "Apply ledger commands from a CSV file and report balances or a statement", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger commands
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for batched across accounts"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Worker threads (async mode only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Worker threads for batch processing (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Bounded wait for an account lock, in milliseconds
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MILLIS",
        help = "How long a transaction waits for its account before failing as busy (default: 5000)"
    )]
    pub lock_timeout_ms: Option<u64>,

    /// Print the statement of one account instead of the account listing
    #[arg(long = "statement", value_name = "ACCOUNT")]
    pub statement: Option<AccountId>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, defaulting missing values
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.worker_threads.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.worker_threads
                    .unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn to_ledger_config(&self) -> LedgerConfig {
        match self.lock_timeout_ms {
            Some(millis) => LedgerConfig::new(Duration::from_millis(millis)),
            None => LedgerConfig::default(),
        }
    }

    pub fn to_pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            ledger: self.to_ledger_config(),
            report: self.statement.map_or(Report::Accounts, Report::Statement),
        }
    }
}
