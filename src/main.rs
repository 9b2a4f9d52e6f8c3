//! Unified rulecheck CLI.
//!
//! - `rulecheck check` - Resolve referenced domains and write filtered lists
//! - `rulecheck inspect` - Parse a rule file and print statistics

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rulecheck_pipeline::cli::{self, CheckArgs, InspectArgs};

/// rulecheck unified CLI.
#[derive(Parser)]
#[command(
    name = "rulecheck",
    version,
    about = "Validate ad-block rule lists by resolving the domains they reference",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every referenced domain and write the filtered artifacts.
    #[command(name = "check", alias = "run")]
    Check(Box<CheckArgs>),

    /// Parse a rule file and print statistics without any DNS traffic.
    #[command(name = "inspect")]
    Inspect(InspectArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let result = match args.command {
        Commands::Check(args) => cli::run_check(*args).await,
        Commands::Inspect(args) => cli::run_inspect(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
