//! Benchmarks for the processing pipelines and the contended submit path
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Inputs are generated into temporary files: 50 accounts, each opened with a
//! balance, followed by interleaved credits and debits.

use banque_ledger::cli::StrategyType;
use banque_ledger::core::{AccountRepository, Ledger, LedgerConfig, MemoryLedgerStore};
use banque_ledger::strategy::{create_strategy, BatchConfig, PipelineOptions};
use banque_ledger::NewAccount;
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const ACCOUNTS: u32 = 50;

fn main() {
    divan::main();
}

fn generate_input(transactions: u32) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "type,account,amount").unwrap();
    for account in 1..=ACCOUNTS {
        writeln!(file, "open,{},1000", account).unwrap();
    }
    for i in 0..transactions {
        let account = i % ACCOUNTS + 1;
        let kind = if i % 3 == 0 { "debit" } else { "credit" };
        writeln!(file, "{},{},{}.{:02}", kind, account, i % 40, i % 100).unwrap();
    }
    file.flush().unwrap();
    file
}

#[divan::bench(args = [1_000, 100_000])]
fn sync_strategy(bencher: divan::Bencher, transactions: u32) {
    let input = generate_input(transactions);
    let strategy = create_strategy(StrategyType::Sync, None, PipelineOptions::default());

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Processing failed");
    });
}

#[divan::bench(args = [1_000, 100_000])]
fn async_strategy(bencher: divan::Bencher, transactions: u32) {
    let input = generate_input(transactions);
    let strategy = create_strategy(
        StrategyType::Async,
        Some(BatchConfig::default()),
        PipelineOptions::default(),
    );

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Processing failed");
    });
}

/// 1,000 concurrent credits against a single account
#[divan::bench]
fn contended_credits(bencher: divan::Bencher) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    bencher.bench_local(|| {
        runtime.block_on(async {
            let store = Arc::new(MemoryLedgerStore::new());
            store.open_account(NewAccount::new(1)).unwrap();
            let ledger = Arc::new(Ledger::new(store, LedgerConfig::default()));

            let tasks: Vec<_> = (0..1_000)
                .map(|_| {
                    let ledger = Arc::clone(&ledger);
                    tokio::spawn(async move {
                        ledger
                            .submit_transaction(1, "credit", Decimal::ONE)
                            .await
                            .unwrap();
                    })
                })
                .collect();
            for task in tasks {
                task.await.unwrap();
            }
        });
    });
}
