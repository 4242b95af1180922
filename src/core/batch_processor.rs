//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which executes ledger
//! commands read by the pipelines. Batches are partitioned by account so that
//! different accounts are processed concurrently while each account's commands
//! keep their input order.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<Ledger<S>>  (shared ledger; S also acts as the account repository)
//! ```
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be safely shared across async tasks.
//! Partitioning only decides scheduling: correctness under concurrent
//! mutation of one account comes from the ledger's own account locks.

use std::collections::HashMap;
use std::sync::Arc;

use log::{error, warn};

use crate::core::ledger::Ledger;
use crate::core::traits::{AccountRepository, LedgerStore};
use crate::types::{AccountId, LedgerCommand, LedgerError, NewAccount};

/// Result of executing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was executed
    pub command: LedgerCommand,

    /// The outcome (success or error)
    pub result: Result<(), LedgerError>,
}

/// Command executor with account-based partitioning
#[derive(Debug)]
pub struct BatchProcessor<S> {
    ledger: Arc<Ledger<S>>,
}

impl<S> Clone for BatchProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<S> BatchProcessor<S>
where
    S: LedgerStore + AccountRepository + 'static,
{
    /// Create a new BatchProcessor over a shared ledger
    pub fn new(ledger: Arc<Ledger<S>>) -> Self {
        Self { ledger }
    }

    /// The ledger commands are executed against
    pub fn ledger(&self) -> &Arc<Ledger<S>> {
        &self.ledger
    }

    /// Execute one command
    ///
    /// `Open` goes to the account repository with the default account number;
    /// `Submit` goes through `Ledger::submit_transaction`.
    pub async fn execute(&self, command: &LedgerCommand) -> Result<(), LedgerError> {
        match command {
            LedgerCommand::Open {
                account,
                opening_balance,
            } => {
                let request = NewAccount::new(*account).with_opening_balance(*opening_balance);
                self.ledger.store().open_account(request).map(|_| ())
            }
            LedgerCommand::Submit {
                account,
                kind,
                amount,
            } => self
                .ledger
                .submit_transaction(*account, kind, *amount)
                .await
                .map(|_| ()),
        }
    }

    /// Partition a batch of commands by account
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one sub-batch
    /// - Commands for each account keep their original order
    pub fn partition_by_account(
        &self,
        batch: Vec<LedgerCommand>,
    ) -> HashMap<AccountId, Vec<LedgerCommand>> {
        let mut account_batches: HashMap<AccountId, Vec<LedgerCommand>> = HashMap::new();

        for command in batch {
            account_batches
                .entry(command.account())
                .or_default()
                .push(command);
        }

        account_batches
    }

    /// Execute all commands for a single account sequentially
    ///
    /// Failed commands are logged and do not stop processing. Results are in
    /// input order.
    pub async fn process_account_commands(
        &self,
        commands: Vec<LedgerCommand>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            let result = self.execute(&command).await;
            if let Err(e) = &result {
                warn!("Command rejected: {}", e);
            }
            results.push(ProcessingResult { command, result });
        }

        results
    }

    /// Process a batch with one tokio task per account
    ///
    /// Results may come back in a different order than the input across
    /// accounts; within an account they keep input order.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let account_batches = self.partition_by_account(batch);

        let mut tasks = Vec::with_capacity(account_batches.len());
        for (_account, commands) in account_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_account_commands(commands).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(account_results) => results.extend(account_results),
                Err(e) => error!("Account task failed: {}", e),
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::LedgerConfig;
    use crate::core::memory_store::MemoryLedgerStore;
    use rust_decimal::Decimal;

    fn processor() -> BatchProcessor<MemoryLedgerStore> {
        let store = Arc::new(MemoryLedgerStore::new());
        BatchProcessor::new(Arc::new(Ledger::new(store, LedgerConfig::default())))
    }

    fn open(account: AccountId, opening: i64) -> LedgerCommand {
        LedgerCommand::Open {
            account,
            opening_balance: Decimal::from(opening),
        }
    }

    fn submit(account: AccountId, kind: &str, amount: i64) -> LedgerCommand {
        LedgerCommand::Submit {
            account,
            kind: kind.to_string(),
            amount: Decimal::from(amount),
        }
    }

    #[test]
    fn test_processor_is_cloneable() {
        let processor = processor();
        let clone = processor.clone();

        assert!(Arc::ptr_eq(processor.ledger(), clone.ledger()));
    }

    #[test]
    fn test_partition_by_account_empty_batch() {
        let partitioned = processor().partition_by_account(vec![]);
        assert!(partitioned.is_empty());
    }

    #[test]
    fn test_partition_by_account_keeps_order() {
        let batch = vec![
            open(1, 0),
            open(2, 0),
            submit(1, "credit", 10),
            submit(2, "credit", 20),
            submit(1, "debit", 5),
        ];

        let partitioned = processor().partition_by_account(batch);

        assert_eq!(partitioned.len(), 2);
        assert_eq!(
            partitioned[&1],
            vec![open(1, 0), submit(1, "credit", 10), submit(1, "debit", 5)]
        );
        assert_eq!(partitioned[&2], vec![open(2, 0), submit(2, "credit", 20)]);
    }

    #[tokio::test]
    async fn test_execute_open_and_submit() {
        let processor = processor();

        processor.execute(&open(1, 100)).await.unwrap();
        processor
            .execute(&submit(1, "debit", 40))
            .await
            .unwrap();

        let account = processor.ledger().get_account(1).unwrap();
        assert_eq!(account.number, "ACC-000001");
        assert_eq!(account.balance, Decimal::from(60));
    }

    #[tokio::test]
    async fn test_process_account_commands_continues_after_errors() {
        let processor = processor();

        let results = processor
            .process_account_commands(vec![
                submit(1, "credit", 10),
                open(1, 0),
                submit(1, "debit", 10),
                submit(1, "credit", 10),
            ])
            .await;

        let outcomes: Vec<Result<(), LedgerError>> =
            results.into_iter().map(|r| r.result).collect();
        assert_eq!(
            outcomes,
            vec![
                Err(LedgerError::account_not_found(1)),
                Ok(()),
                Err(LedgerError::insufficient_funds(1, Decimal::ZERO, Decimal::from(10))),
                Ok(()),
            ]
        );
        assert_eq!(
            processor.ledger().get_account(1).unwrap().balance,
            Decimal::from(10)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_across_accounts() {
        let processor = processor();

        let mut batch = Vec::new();
        for account in 1..=5 {
            batch.push(open(account, 0));
        }
        for _ in 0..20 {
            for account in 1..=5 {
                batch.push(submit(account, "credit", account as i64));
            }
        }
        for account in 1..=5 {
            batch.push(submit(account, "debit", 1));
        }

        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 5 + 100 + 5);
        assert!(results.iter().all(|r| r.result.is_ok()));
        for account in 1..=5u32 {
            let expected = Decimal::from(20 * account as i64 - 1);
            assert_eq!(
                processor.ledger().get_account(account).unwrap().balance,
                expected
            );
        }
    }
}
