//! Clinical data model featurization CLI.

use clap::Parser;

use cdm_cli::cli::{Cli, Command, LogFormatArg};
use cdm_cli::commands::{run_featurize, run_segment};
use cdm_cli::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Featurize(args) => match run_featurize(args) {
            Ok(result) => {
                eprintln!(
                    "{} vectors from {} examples across {} sequences",
                    result.n_vectors, result.n_examples, result.n_sequences
                );
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Segment(args) => match run_segment(args) {
            Ok(result) => {
                eprintln!(
                    "{} periods across {} sequences",
                    result.n_periods, result.n_sequences
                );
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence:
/// an explicit `-v`/`-q` beats `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        format: match cli.log_format {
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        log_file: cli.log_file.clone(),
        with_ansi: cli.log_file.is_none(),
    }
}
