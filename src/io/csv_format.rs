//! CSV format handling for ledger commands, account listings and statements
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger commands
//! - Account listing and statement serialization
//!
//! All functions are pure (no I/O beyond the given writer) for easy testing.

use crate::types::{Account, AccountId, LedgerCommand, Statement};
use chrono::SecondsFormat;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, account, amount.
/// The amount is optional because `open` rows may omit the opening balance.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command: String,
    pub account: AccountId,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a LedgerCommand
///
/// This function:
/// - Maps `open` (case-insensitive) to an account opening, defaulting the
///   opening balance to zero
/// - Passes every other type through as the transaction kind, so the ledger
///   decides whether it is a valid kind
/// - Requires an amount for transaction rows
///
/// # Returns
///
/// Result containing either:
/// - Ok(LedgerCommand) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, String> {
    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            match Decimal::from_str(amount_str.trim()) {
                Ok(decimal) => Some(decimal),
                Err(_) => {
                    return Err(format!(
                        "Invalid amount '{}' for account {}",
                        amount_str, csv_record.account
                    ))
                }
            }
        }
        _ => None,
    };

    if csv_record.command.trim().eq_ignore_ascii_case("open") {
        return Ok(LedgerCommand::Open {
            account: csv_record.account,
            opening_balance: amount.unwrap_or(Decimal::ZERO),
        });
    }

    let amount = amount.ok_or_else(|| {
        format!(
            "'{}' transaction for account {} requires an amount",
            csv_record.command, csv_record.account
        )
    })?;

    Ok(LedgerCommand::Submit {
        account: csv_record.account,
        kind: csv_record.command,
        amount,
    })
}

/// Render a monetary amount for output, rounded half away from zero to cents
fn money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Write account states to CSV format
///
/// Writes accounts with columns: account, number, balance.
/// Accounts are sorted by account ID for deterministic output.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "number", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.number,
                money(account.balance),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write a statement to CSV format
///
/// Columns: entry, tx, timestamp, kind, amount, balance. Rows, in order:
/// - `statement`: account id in `tx`, generation time in `timestamp`, account
///   number in `kind`, owner (empty when unset) in `amount`
/// - `opening`: opening balance
/// - `entry`: one per transaction with its running balance
/// - `credits` / `debits`: period totals in `amount`
/// - `closing`: closing balance
pub fn write_statement_csv(statement: &Statement, output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);
    let write_error = |e: csv::Error| format!("Failed to write statement record: {}", e);

    writer
        .write_record(["entry", "tx", "timestamp", "kind", "amount", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let account = &statement.account;
    writer
        .write_record(&[
            "statement".to_string(),
            account.id.to_string(),
            statement
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            account.number.clone(),
            account.owner.map(|owner| owner.to_string()).unwrap_or_default(),
            String::new(),
        ])
        .map_err(write_error)?;

    writer
        .write_record(["opening", "", "", "", "", money(statement.opening_balance).as_str()])
        .map_err(write_error)?;

    for entry in &statement.entries {
        let record = &entry.record;
        writer
            .write_record(&[
                "entry".to_string(),
                record.id.to_string(),
                record
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                record.kind.to_string(),
                money(record.amount),
                money(entry.running_balance),
            ])
            .map_err(write_error)?;
    }

    writer
        .write_record(["credits", "", "", "", money(statement.total_credits).as_str(), ""])
        .map_err(write_error)?;
    writer
        .write_record(["debits", "", "", "", money(statement.total_debits).as_str(), ""])
        .map_err(write_error)?;

    writer
        .write_record(["closing", "", "", "", "", money(statement.closing_balance).as_str()])
        .map_err(write_error)?;

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
