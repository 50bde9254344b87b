//! hostgate CLI.
//!
//! - `hostgate check` - Evaluate a caller against a rules file
//! - `hostgate validate` - Load a rules file and report its contents

use std::process::ExitCode;

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Cli::parse();

    match cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
