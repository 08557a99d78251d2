//! Routes parsed commands to their handlers.

use super::command::{CheckCommand, Cli, ColorChoice, Commands, ServiceCommand};
use super::output::{self, OutputConfig};
use super::{check, diagnostic, logs, run, service, session, subscribers};
use crate::error::Result;

/// Apply global flags, then run the selected command.
///
/// # Errors
///
/// Returns a rendered diagnostic when the command fails.
pub async fn execute(cli: Cli) -> std::result::Result<(), miette::Report> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    output::set_color(match cli.color {
        ColorChoice::Auto => None,
        ColorChoice::Always => Some(true),
        ColorChoice::Never => Some(false),
    });

    let config_file = config_file(&cli.command);
    route(&cli.command)
        .await
        .map_err(|error| diagnostic::report(error, config_file.as_deref()))
}

async fn route(command: &Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Check(CheckCommand::Config(args)) => check::config::execute_config(args),
        Commands::Check(CheckCommand::Health(args)) => check::health::execute_health(args).await,
        Commands::Subscribers(args) => subscribers::execute(args).await,
        Commands::Session(args) => session::execute(args).await,
        Commands::Service(command) => match command {
            ServiceCommand::Install(args) => service::execute_install(args),
            ServiceCommand::Uninstall(args) => service::execute_uninstall(args),
            ServiceCommand::Start(args) => service::execute_control("start", args),
            ServiceCommand::Stop(args) => service::execute_control("stop", args),
            ServiceCommand::Restart(args) => service::execute_control("restart", args),
            ServiceCommand::Status(args) => service::execute_status(args),
        },
        Commands::Logs(args) => logs::execute(args),
    }
}

/// Tuning file a command reads, for pointing parse errors at it.
fn config_file(command: &Commands) -> Option<String> {
    match command {
        Commands::Run(args) => Some(args.source.config.clone()),
        Commands::Check(CheckCommand::Config(args)) | Commands::Session(args) => {
            Some(args.config.clone())
        }
        Commands::Check(CheckCommand::Health(args)) => Some(args.source.config.clone()),
        Commands::Subscribers(args) => Some(args.source.config.clone()),
        Commands::Service(_) | Commands::Logs(_) => None,
    }
}
