//! Command-line interface definitions.
//!
//! Defines the CLI structure for the marketpulse bot using `clap`: running
//! the bot, diagnostics, subscriber reports, session generation, and
//! systemd service management.

use clap::{Parser, Subcommand};

/// Default environment file holding credentials.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default optional tuning file.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Default systemd unit name.
pub const DEFAULT_SERVICE: &str = "marketpulse";

/// Telegram bot that summarizes a financial news channel for subscribers
#[derive(Parser, Debug)]
#[command(name = "marketpulse")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the marketpulse CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Show every stored subscriber
    Subscribers(SubscribersArgs),

    /// Log in to Telegram and print a session string for the channel reader
    Session(SourceArgs),

    /// Manage the systemd service
    #[command(subcommand)]
    Service(ServiceCommand),

    /// Show service logs
    Logs(LogsArgs),
}

/// Subcommands for `marketpulse check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Load and validate configuration.
    Config(SourceArgs),
    /// Probe the service, database, disk, memory and recent errors.
    Health(HealthArgs),
}

/// Subcommands for `marketpulse service`.
#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    /// Write and enable the systemd unit.
    Install(InstallArgs),
    /// Stop, disable and remove the systemd unit.
    Uninstall(ServiceArgs),
    /// Start the service.
    Start(ServiceArgs),
    /// Stop the service.
    Stop(ServiceArgs),
    /// Restart the service.
    Restart(ServiceArgs),
    /// Show `systemctl status` for the service.
    Status(ServiceArgs),
}

/// Where configuration is read from.
#[derive(Parser, Debug, Clone)]
pub struct SourceArgs {
    /// Environment file with credentials.
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: String,

    /// Optional TOML file with non-secret tuning.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Use the testing interval instead of the summary interval.
    #[arg(long)]
    pub test: bool,

    /// Force debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Subscribe this Telegram user id as admin before starting.
    #[arg(long = "admin_id", alias = "admin-id", value_name = "ID")]
    pub admin_id: Option<i64>,

    /// Use JSON log format instead of pretty.
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for `check health`.
#[derive(Parser, Debug)]
pub struct HealthArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// systemd unit to inspect.
    #[arg(long)]
    pub service: Option<String>,

    /// Subscriber database to open.
    #[arg(long)]
    pub db: Option<String>,
}

/// Arguments for `subscribers`.
#[derive(Parser, Debug)]
pub struct SubscribersArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Subscriber database to read.
    #[arg(long)]
    pub db: Option<String>,
}

/// Arguments for service control.
#[derive(Parser, Debug)]
pub struct ServiceArgs {
    /// systemd unit name.
    #[arg(long, default_value = DEFAULT_SERVICE)]
    pub name: String,
}

/// Arguments for `service install`.
#[derive(Parser, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// User to run the service as.
    #[arg(long, default_value = "marketpulse")]
    pub user: String,

    /// Working directory holding `.env` and the database.
    #[arg(long, default_value = "/opt/marketpulse")]
    pub working_dir: String,
}

/// Arguments for the `logs` subcommand.
#[derive(Parser, Debug)]
pub struct LogsArgs {
    /// Number of lines to show
    #[arg(short = 'n', long, default_value = "50")]
    pub lines: u32,

    /// Follow log output (like tail -f)
    #[arg(short, long)]
    pub follow: bool,

    /// Show logs since (e.g., "1 hour ago", "2024-01-01")
    #[arg(long)]
    pub since: Option<String>,

    /// systemd unit name.
    #[arg(long, default_value = DEFAULT_SERVICE)]
    pub name: String,
}
