//! Sequential processing strategy
//!
//! Streams rows through `SyncReader` and applies each command in file order on
//! a single-threaded runtime. The runtime is only there to drive the ledger's
//! async lock acquisition; nothing is ever contended.

use crate::core::BatchProcessor;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{new_ledger, write_report, PipelineOptions, ProcessingStrategy};
use log::{info, warn};
use std::io::Write;
use std::path::Path;

/// Sequential, single-threaded strategy
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    options: PipelineOptions,
}

impl SyncProcessingStrategy {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let reader = SyncReader::new(input_path)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let ledger = new_ledger(&self.options.ledger);
        let processor = BatchProcessor::new(ledger.clone());

        let (applied, rejected, skipped) = runtime.block_on(async {
            let (mut applied, mut rejected, mut skipped) = (0usize, 0usize, 0usize);

            for row in reader {
                match row {
                    Ok(command) => match processor.execute(&command).await {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            rejected += 1;
                            warn!("Command rejected: {}", e);
                        }
                    },
                    Err(e) => {
                        skipped += 1;
                        warn!("CSV parsing error: {}", e);
                    }
                }
            }

            (applied, rejected, skipped)
        });

        info!(
            "Sync pipeline finished: {} applied, {} rejected, {} skipped",
            applied, rejected, skipped
        );

        write_report(&ledger, self.options.report, output)
    }
}
