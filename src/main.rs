//! Rust Accounts Engine CLI
//!
//! Command-line interface for replaying account commands from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > accounts.csv
//! cargo run -- --strategy concurrent --batch-size 2000 --max-concurrent 8 commands.csv > accounts.csv
//! ACCOUNTS_MIN_OPENING_BALANCE=50 cargo run -- commands.csv > accounts.csv
//! RUST_LOG=info cargo run -- commands.csv > accounts.csv
//! ```
//!
//! The program reads command records from the input CSV file, applies them
//! through the account service using the selected processing strategy, and
//! writes every account to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, invalid configuration, I/O failure, etc.)

use rust_accounts_engine::types::ProcessingError;
use rust_accounts_engine::{cli, strategy, telemetry};
use std::process;

fn main() {
    telemetry::init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<(), ProcessingError> {
    let service_config = args.to_service_config()?;

    let batch_config = match args.strategy {
        cli::StrategyType::Concurrent => Some(args.to_batch_config()),
        cli::StrategyType::Sequential => None,
    };
    let strategy = strategy::create_strategy(args.strategy, batch_config, service_config);

    let mut output = std::io::stdout();
    strategy.process(&args.input_file, &mut output)
}
