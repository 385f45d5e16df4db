// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, StrategyType};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Values not given on the command line are read from their environment
/// variables. On invalid arguments or `--help`, clap prints a message and
/// exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
