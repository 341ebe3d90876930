#![recursion_limit = "256"]

mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;

use std::process::ExitCode;

use clap::{error::ErrorKind, Parser};
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // RUST_LOG wins when set
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cloud_classifier=info")),
        )
        .init();

    // help and version exit 0; every other argument error exits 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match cli.run() {
        Ok(())  => ExitCode::SUCCESS,
        Err(e) => {
            println!("[Error] {e:#}");
            ExitCode::FAILURE
        }
    }
}
