//! Asynchronous batch processing strategy
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, worker_threads)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (account partitioning, one task per account)
//!         └── Ledger<MemoryLedgerStore>
//! ```
//!
//! Batches are applied one after another so that an account whose rows span
//! several batches still sees them in file order. Inside a batch, different
//! accounts run in parallel on the multi-threaded runtime.

use crate::core::BatchProcessor;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{new_ledger, write_report, PipelineOptions, ProcessingStrategy};
use log::{info, warn};
use std::io::Write;
use std::path::Path;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Worker threads of the processing runtime
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                "Invalid worker_threads ({}), using default ({})",
                worker_threads, default.worker_threads
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Multi-threaded strategy partitioning each batch by account
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    options: PipelineOptions,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, options: PipelineOptions) -> Self {
        Self { config, options }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .enable_all()
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let ledger = new_ledger(&self.options.ledger);
        let processor = BatchProcessor::new(ledger.clone());

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let (mut batches, mut applied, mut rejected) = (0usize, 0usize, 0usize);
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Wait for the whole batch before reading the next one
                let results = processor.process_batch(batch).await;
                batches += 1;
                for result in &results {
                    match result.result {
                        Ok(()) => applied += 1,
                        Err(_) => rejected += 1,
                    }
                }
            }

            info!(
                "Async pipeline finished: {} batches, {} applied, {} rejected, {} skipped",
                batches,
                applied,
                rejected,
                reader.skipped()
            );

            Ok::<(), String>(())
        })?;

        write_report(&ledger, self.options.report, output)
    }
}
