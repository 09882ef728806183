//! formfill: place fields over a PDF and fill it from CSV rows.

use std::io::{self, IsTerminal};

use clap::Parser;
use formfill_cli::cli::{Cli, LogFormatArg};
use formfill_cli::commands::run;
use formfill_cli::logging::{init_logging, LogConfig, LogFormat};

fn main() {
    let cli = Cli::parse();
    init_logging(&log_config_from_cli(&cli));

    let exit_code = match run(&cli.command) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags; `-v`/`-q` take precedence over `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        with_ansi: io::stderr().is_terminal(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        ..LogConfig::default()
    }
}
