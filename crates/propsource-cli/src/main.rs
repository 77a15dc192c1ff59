mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use std::process;

use commands::calculate::CalculateArgs;
use commands::format::FormatCurrencyArgs;
use commands::sensitivity::SensitivityArgs;

/// Interest-only mortgage and property returns calculations
#[derive(Parser)]
#[command(
    name = "psc",
    version,
    about = "Interest-only mortgage and property returns calculations",
    long_about = "A CLI for the property returns calculator with decimal precision. \
                  Derives deposit, loan amount and interest-only payments from a \
                  purchase price, interest rate and loan-to-value, sweeps payment \
                  sensitivity, and formats currency amounts."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate deposit, loan and interest-only payments
    Calculate(CalculateArgs),
    /// Sweep interest rate against loan-to-value
    Sensitivity(SensitivityArgs),
    /// Format an amount as whole currency units
    FormatCurrency(FormatCurrencyArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, takes precedence over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::calculate::run_calculate(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::FormatCurrency(args) => commands::format::run_format_currency(args),
        Commands::Version => {
            println!("psc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
