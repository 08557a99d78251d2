//! Handler for the `logs` command.

use std::process::Command;

use crate::adapter::inbound::cli::command::LogsArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;

/// journalctl arguments for `args`.
#[must_use]
pub fn journalctl_args(args: &LogsArgs) -> Vec<String> {
    let mut cmd = vec!["-u".to_string(), args.name.clone(), "--output=cat".to_string()];

    if args.follow {
        cmd.push("-f".to_string());
    } else {
        cmd.push("-n".to_string());
        cmd.push(args.lines.to_string());
    }

    if let Some(since) = &args.since {
        cmd.push("--since".to_string());
        cmd.push(since.clone());
    }
    cmd
}

/// Stream the service journal.
pub fn execute(args: &LogsArgs) -> Result<()> {
    let status = Command::new("journalctl")
        .args(journalctl_args(args))
        .status()?;

    if status.code() == Some(1) {
        output::warning(&format!("No logs found. Is the {} service installed?", args.name));
        output::hint("run 'sudo marketpulse service install' to install it");
    }
    Ok(())
}
