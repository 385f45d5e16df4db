//! CSV format handling for command records and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Account snapshot serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{
    Account, AccountId, AccountType, CommandRecord, CommandType, CustomerId, ProcessingError,
    MONEY_SCALE,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Header of the account snapshot
pub const OUTPUT_HEADER: [&str; 6] = [
    "account",
    "customer",
    "type",
    "balance",
    "minimum_balance",
    "active",
];

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: command, customer, account, type,
/// amount. Only `command` and `customer` are present on every row; which of the
/// others a command needs is decided when it is dispatched.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub command: String,
    pub customer: CustomerId,
    pub account: Option<AccountId>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a CommandRecord
///
/// This function:
/// - Parses the command name (case-insensitive)
/// - Resolves the account type from a name or a numeric type id
/// - Parses the amount into a Decimal (if present)
///
/// Numeric type ids are passed through unchecked, so an unknown id reaches the
/// service and is rejected there as an invalid request. An unknown type name is
/// a malformed row.
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
/// * `line` - Line number of the row in the input file
pub fn convert_csv_record(csv_record: CsvRecord, line: u64) -> Result<CommandRecord, ProcessingError> {
    let command = match csv_record.command.to_lowercase().as_str() {
        "list" => CommandType::List,
        "open" => CommandType::Open,
        "close" => CommandType::Close,
        "deposit" => CommandType::Deposit,
        "withdraw" => CommandType::Withdraw,
        _ => {
            return Err(ProcessingError::invalid_record(
                line,
                format!("Invalid command: '{}'", csv_record.command),
            ))
        }
    };

    let account_type_id = match non_empty(csv_record.account_type.as_deref()) {
        Some(value) => Some(parse_account_type(value).map_err(|message| {
            ProcessingError::invalid_record(line, message)
        })?),
        None => None,
    };

    let amount = match non_empty(csv_record.amount.as_deref()) {
        Some(value) => match Decimal::from_str(value) {
            Ok(decimal) => Some(decimal),
            Err(_) => {
                return Err(ProcessingError::invalid_record(
                    line,
                    format!("Invalid amount '{}'", value),
                ))
            }
        },
        None => None,
    };

    Ok(CommandRecord {
        line,
        command,
        customer_id: csv_record.customer,
        account_id: csv_record.account,
        account_type_id,
        amount,
    })
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|value| !value.is_empty())
}

/// Resolve a type column value to a type id
fn parse_account_type(value: &str) -> Result<i32, String> {
    if let Ok(id) = value.parse::<i32>() {
        return Ok(id);
    }

    AccountType::from_str(value).map(AccountType::id)
}

fn format_money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(MONEY_SCALE))
}

/// Write the account snapshot in CSV format
///
/// Writes accounts with columns: account, customer, type, balance,
/// minimum_balance, active. Accounts are sorted by account id for
/// deterministic output. Amounts are whole cents (the validators and the
/// configuration refuse anything finer), so they are written at their
/// two-decimal scale without loss.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), ProcessingError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(OUTPUT_HEADER)?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.account_id);

    for account in sorted_accounts {
        writer.write_record(&[
            account.account_id.to_string(),
            account.customer_id.to_string(),
            account.account_type.to_string(),
            format_money(account.balance),
            format_money(account.minimum_balance),
            account.active.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
