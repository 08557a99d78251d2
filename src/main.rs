use std::process::ExitCode;

use clap::Parser;
use marketpulse::adapter::inbound::cli::command::Cli;
use marketpulse::adapter::inbound::cli::{dispatch, operator};
use marketpulse::infrastructure::operator::entry::Operator;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if operator::install(Box::new(Operator::new())).is_err() {
        eprintln!("CLI operator was already installed");
        return ExitCode::FAILURE;
    }

    match dispatch::execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}
