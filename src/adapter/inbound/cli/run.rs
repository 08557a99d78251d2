//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot};

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let request = build_run_request(args, output::is_json());
    let service = operator::operator();

    let startup = service.prepare_run(&request)?;
    if !request.json_logs || output::is_json() {
        print_startup(&startup);
    }

    service.execute_run(request).await
}

/// Forward the recognized `run` flags into a launch request.
#[must_use]
pub fn build_run_request(args: &RunArgs, force_json_logs: bool) -> RunRequest {
    RunRequest {
        source: operator::source(&args.source),
        test_mode: args.test,
        debug: args.debug,
        json_logs: args.json_logs || force_json_logs,
        admin_id: args.admin_id,
    }
}

fn print_startup(snapshot: &RunStartupSnapshot) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Channel", output::highlight(&snapshot.channel));
    output::field("Interval", format!("{} min", snapshot.interval_minutes));
    output::field("Database", &snapshot.database);
    if output::verbosity() > 0 {
        output::field("Model", &snapshot.model);
    }
    if let Some(admin_id) = snapshot.admin_id {
        output::field("Admin", admin_id);
    }
    if snapshot.test_mode {
        output::warning("Test mode: using the testing interval");
    }
}
