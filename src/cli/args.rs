use crate::config::{ConfigError, ServiceConfig};
use crate::strategy::BatchConfig;
use crate::types::AccountType;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Apply account commands from a CSV file and print the resulting accounts
#[derive(Parser, Debug)]
#[command(name = "accounts-engine")]
#[command(about = "Apply account commands from a CSV file and print the resulting accounts", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing command records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sequential",
        help = "Processing strategy: 'sequential' or 'concurrent'"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (concurrent mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (concurrent mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Smallest opening balance accepted
    #[arg(
        long = "min-opening-balance",
        value_name = "AMOUNT",
        env = "ACCOUNTS_MIN_OPENING_BALANCE",
        default_value = "100"
    )]
    pub min_opening_balance: Decimal,

    /// Minimum balance recorded on new accounts
    #[arg(
        long = "default-minimum-balance",
        value_name = "AMOUNT",
        env = "ACCOUNTS_DEFAULT_MINIMUM_BALANCE",
        default_value = "100"
    )]
    pub default_minimum_balance: Decimal,

    /// Account types that may be opened
    #[arg(
        long = "account-types",
        value_name = "TYPES",
        env = "ACCOUNTS_SUPPORTED_TYPES",
        value_delimiter = ',',
        default_value = "checking,savings"
    )]
    pub account_types: Vec<AccountType>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    /// One command at a time, in file order
    Sequential,
    /// Batches partitioned by customer across worker threads
    Concurrent,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take their defaults; zero values are replaced by their
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the account service configuration from CLI arguments
    pub fn to_service_config(&self) -> Result<ServiceConfig, ConfigError> {
        ServiceConfig::new(
            self.min_opening_balance,
            self.default_minimum_balance,
            self.account_types.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Strategy parsing tests
    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Sequential)]
    #[case::explicit_sequential(&["program", "--strategy", "sequential", "input.csv"], StrategyType::Sequential)]
    #[case::explicit_concurrent(&["program", "--strategy", "concurrent", "input.csv"], StrategyType::Concurrent)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[test]
    fn test_service_config_options() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--min-opening-balance",
            "25.50",
            "--default-minimum-balance",
            "10",
            "--account-types",
            "savings",
            "input.csv",
        ])
        .unwrap();

        let config = parsed.to_service_config().unwrap();

        assert_eq!(config.minimum_opening_balance, Decimal::new(2550, 2));
        assert_eq!(config.default_minimum_balance, Decimal::new(10, 0));
        assert_eq!(config.supported_account_types, vec![AccountType::Savings]);
    }

    #[test]
    fn test_account_types_are_comma_separated() {
        let parsed =
            CliArgs::try_parse_from(["program", "--account-types", "Savings,checking", "input.csv"])
                .unwrap();

        assert_eq!(
            parsed.account_types,
            vec![AccountType::Savings, AccountType::Checking]
        );
    }

    #[test]
    fn test_negative_threshold_is_a_config_error() {
        let parsed =
            CliArgs::try_parse_from(["program", "--min-opening-balance=-1", "input.csv"]).unwrap();

        assert!(matches!(
            parsed.to_service_config(),
            Err(ConfigError::NegativeAmount { .. })
        ));
    }

    // Error handling tests
    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::invalid_amount(&["program", "--min-opening-balance", "lots", "input.csv"])]
    #[case::invalid_account_type(&["program", "--account-types", "brokerage", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
