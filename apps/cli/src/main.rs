use clap::Parser;
use clic_cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    clic_cli::run(Cli::parse()).await
}
