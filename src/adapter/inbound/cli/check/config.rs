use crate::adapter::inbound::cli::command::SourceArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::diagnostic::ConfigCheckReport;
use serde_json::json;

/// Validate configuration without starting the bot.
pub fn execute_config(args: &SourceArgs) -> Result<()> {
    let report = operator::operator().check_config(&operator::source(args))?;

    if output::is_json() {
        output::json_output(to_json(&report));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Env file", &args.env_file);
    output::field(
        "Config",
        if report.config_file_found {
            args.config.clone()
        } else {
            format!("{} {}", args.config, output::muted("(not found, defaults)"))
        },
    );
    output::field("Channel", output::highlight(&report.channel));
    output::field("Interval", format!("{} min", report.summary_interval_minutes));
    output::field("Test", format!("{} min", report.testing_interval_minutes));
    output::field("Database", &report.database);
    output::field("Model", &report.model);
    output::field("Timezone", format!("UTC{:+}", report.display_utc_offset_hours));

    if !report.env_file_found {
        output::warning(&format!("{} not found; `run` will refuse to start", args.env_file));
    }
    for name in &report.missing_credentials {
        output::warning(&format!("{name} is not set"));
    }

    if report.is_ready() {
        output::success("Configuration is valid");
    } else {
        output::hint("copy .env.example to .env and fill in the missing values");
    }
    Ok(())
}

fn to_json(report: &ConfigCheckReport) -> serde_json::Value {
    json!({
        "command": "check.config",
        "ready": report.is_ready(),
        "env_file_found": report.env_file_found,
        "config_file_found": report.config_file_found,
        "channel": report.channel,
        "summary_interval_minutes": report.summary_interval_minutes,
        "testing_interval_minutes": report.testing_interval_minutes,
        "database": report.database,
        "model": report.model,
        "display_utc_offset_hours": report.display_utc_offset_hours,
        "missing_credentials": report.missing_credentials,
    })
}
