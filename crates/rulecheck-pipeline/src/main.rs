//! rulecheck pipeline standalone binary.

use std::process::ExitCode;

use clap::Parser;
use rulecheck_pipeline::cli::{self, PipelineCli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = PipelineCli::parse();
    match cli::run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
