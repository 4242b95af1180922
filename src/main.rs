//! Banque Ledger CLI
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv > accounts.csv
//! cargo run -- --strategy sync ledger.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --worker-threads 8 ledger.csv
//! cargo run -- --statement 42 ledger.csv > statement.csv
//! RUST_LOG=debug cargo run -- ledger.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, unreadable input, unknown statement account, etc.)

use banque_ledger::cli;
use banque_ledger::strategy;
use log::{error, info};
use std::process;

fn main() {
    env_logger::init();

    let args = cli::parse_args();

    let strategy = {
        let batch = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, batch, args.to_pipeline_options())
    };

    info!(
        "Processing {} with the {:?} strategy",
        args.input_file.display(),
        args.strategy
    );

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
