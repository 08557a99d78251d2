//! Handlers for `service` subcommands.

use std::fs;
use std::process::Command;

use crate::adapter::inbound::cli::command::{InstallArgs, ServiceArgs};
use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Error, Result};

fn unit_path(name: &str) -> String {
    format!("/etc/systemd/system/{name}.service")
}

/// Generate the systemd unit content.
#[must_use]
pub fn generate_unit(args: &InstallArgs, binary_path: &str) -> String {
    format!(
        r#"[Unit]
Description=Marketpulse Telegram Summary Bot
After=network-online.target
Wants=network-online.target

[Service]
Type=simple
User={user}
Group={user}
WorkingDirectory={working_dir}
ExecStart={binary} run --json-logs --env-file {working_dir}/.env --config {working_dir}/config.toml
Restart=on-failure
RestartSec=10

[Install]
WantedBy=multi-user.target
"#,
        user = args.user,
        working_dir = args.working_dir,
        binary = binary_path,
    )
}

/// Write, reload and enable the unit.
pub fn execute_install(args: &InstallArgs) -> Result<()> {
    require_root()?;

    let binary_path = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/opt/marketpulse/marketpulse".to_string());
    let name = &args.service.name;
    let path = unit_path(name);

    fs::write(&path, generate_unit(args, &binary_path))?;
    output::success(&format!("Created {path}"));

    systemctl(&["daemon-reload"])?;
    output::success("Reloaded systemd daemon");

    systemctl(&["enable", name])?;
    output::success(&format!("Enabled {name} (starts on boot)"));

    output::hint(&format!("start with: sudo marketpulse service start --name {name}"));
    Ok(())
}

/// Stop, disable and remove the unit.
pub fn execute_uninstall(args: &ServiceArgs) -> Result<()> {
    require_root()?;
    let name = &args.name;

    if systemctl(&["stop", name]).is_ok() {
        output::success(&format!("Stopped {name}"));
    }
    if systemctl(&["disable", name]).is_ok() {
        output::success(&format!("Disabled {name}"));
    }

    let path = unit_path(name);
    if std::path::Path::new(&path).exists() {
        fs::remove_file(&path)?;
        output::success(&format!("Removed {path}"));
    }

    systemctl(&["daemon-reload"])?;
    output::success("Reloaded systemd daemon");
    Ok(())
}

/// `start`, `stop` or `restart` the unit.
pub fn execute_control(action: &str, args: &ServiceArgs) -> Result<()> {
    require_root()?;
    systemctl(&[action, &args.name])?;
    output::success(&format!("{} {}", past_tense(action), args.name));
    Ok(())
}

/// Show `systemctl status` output.
pub fn execute_status(args: &ServiceArgs) -> Result<()> {
    // systemctl status exits 3 for a stopped unit; the output is still useful.
    Command::new("systemctl")
        .args(["status", "--no-pager", &args.name])
        .status()?;
    Ok(())
}

fn past_tense(action: &str) -> &'static str {
    match action {
        "start" => "Started",
        "stop" => "Stopped",
        "restart" => "Restarted",
        _ => "Updated",
    }
}

fn systemctl(args: &[&str]) -> Result<()> {
    let status = Command::new("systemctl").args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::Io(std::io::Error::other(format!(
            "systemctl {} failed with {status}",
            args.join(" ")
        ))))
    }
}

fn require_root() -> Result<()> {
    if is_root() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: "user",
            reason: "this command must be run as root (use sudo)".to_string(),
        }
        .into())
    }
}

fn is_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
