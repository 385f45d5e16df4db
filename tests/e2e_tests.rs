//! End-to-end integration tests
//!
//! These tests validate the complete command processing pipeline using
//! predefined CSV test fixtures. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Dispatches every command through the account service
//! 3. Generates the account snapshot
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path scenarios
//! - The savings-account prerequisite
//! - Overdraft protection and account closure
//! - Rejected requests and malformed rows
//! - Several interleaved customers and decimal precision
//!
//! Each fixture runs with both strategies. The concurrent strategy uses one
//! command per batch so account ids are assigned in file order.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_accounts_engine::cli::StrategyType;
    use rust_accounts_engine::config::ServiceConfig;
    use rust_accounts_engine::strategy::{create_strategy, BatchConfig};
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Run a test fixture by processing input.csv and comparing with expected.csv
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let strategy = create_strategy(
            strategy_type,
            Some(BatchConfig::new(1, 2)),
            ServiceConfig::default(),
        );

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");
        strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to process commands: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));

        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures with both processing strategies
    #[rstest]
    #[case("happy_path")]
    #[case("savings_policy")]
    #[case("overdraft")]
    #[case("close_flow")]
    #[case("invalid_requests")]
    #[case("malformed_rows")]
    #[case("multiple_customers")]
    #[case("precision")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sequential, StrategyType::Concurrent)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy);
    }

    #[rstest]
    fn test_missing_input_is_fatal(
        #[values(StrategyType::Sequential, StrategyType::Concurrent)] strategy: StrategyType,
    ) {
        let strategy = create_strategy(strategy, None, ServiceConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("tests/fixtures/does_not_exist.csv"), &mut output);

        assert!(result.is_err());
    }
}
