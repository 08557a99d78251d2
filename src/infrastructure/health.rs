//! Host and service health probes for `check health`.
//!
//! Probes shell out to systemd tools and read kernel counters; each result
//! is classified into a [`HealthLevel`] by pure functions so the thresholds
//! can be tested without a host.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::adapter::outbound::sqlite::SqliteSubscriberStore;
use crate::domain::{HealthCheck, HealthLevel, HealthReport, Thresholds};
use crate::infrastructure::config::health::HealthConfig;

/// Runs every probe for one deployment.
pub struct HealthMonitor {
    config: HealthConfig,
    database: String,
}

impl HealthMonitor {
    pub fn new(config: HealthConfig, database: impl Into<String>) -> Self {
        Self {
            config,
            database: database.into(),
        }
    }

    /// Run all probes.
    pub async fn report(&self) -> HealthReport {
        let mut report = HealthReport::default();
        report.push(self.service());
        report.push(check_database(&self.database).await);
        report.push(self.disk());
        report.push(self.memory());
        report.push(self.recent_errors());
        report
    }

    fn service(&self) -> HealthCheck {
        let output = Command::new("systemctl")
            .args(["is-active", &self.config.service_name])
            .output();

        match output {
            Ok(output) => {
                let state = String::from_utf8_lossy(&output.stdout).trim().to_string();
                let state = if state.is_empty() {
                    "unknown".to_string()
                } else {
                    state
                };
                HealthCheck::new("service", classify_service(&state), state)
            }
            Err(e) => HealthCheck::new(
                "service",
                HealthLevel::Error,
                format!("systemctl unavailable: {e}"),
            ),
        }
    }

    fn disk(&self) -> HealthCheck {
        let dir = Path::new(&self.database)
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && p.exists())
            .unwrap_or_else(|| Path::new("."));

        match disk_usage(dir) {
            Some(percent) => threshold_check("disk", &self.config.disk, percent),
            None => HealthCheck::new("disk", HealthLevel::Error, "statvfs failed"),
        }
    }

    fn memory(&self) -> HealthCheck {
        let usage = std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|content| memory_usage(&content));

        match usage {
            Some(percent) => threshold_check("memory", &self.config.memory, percent),
            None => HealthCheck::new("memory", HealthLevel::Error, "/proc/meminfo unreadable"),
        }
    }

    fn recent_errors(&self) -> HealthCheck {
        let output = Command::new("journalctl")
            .args([
                "-u",
                &self.config.service_name,
                "--since",
                &self.config.error_window,
                "-p",
                "err",
                "--no-pager",
                "-q",
                "--output=cat",
            ])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let count = count_lines(&String::from_utf8_lossy(&output.stdout));
                let level = self.config.error_lines.classify(count as f64);
                HealthCheck::new(
                    "errors",
                    level,
                    format!("{count} error lines since {}", self.config.error_window),
                )
            }
            Ok(output) => {
                debug!(status = ?output.status, "journalctl exited with failure");
                HealthCheck::new("errors", HealthLevel::Warning, "journal not readable")
            }
            Err(e) => HealthCheck::new(
                "errors",
                HealthLevel::Warning,
                format!("journalctl unavailable: {e}"),
            ),
        }
    }
}

/// Count active rows in the subscriber database, opened read-only.
pub async fn check_database(path: &str) -> HealthCheck {
    if !Path::new(path).exists() {
        return HealthCheck::new("database", HealthLevel::Warning, format!("{path} not found"));
    }

    match SqliteSubscriberStore::count_active_at(path).await {
        Ok(count) => HealthCheck::new(
            "database",
            HealthLevel::Ok,
            format!("{count} active subscribers"),
        ),
        Err(e) => HealthCheck::new("database", HealthLevel::Error, e.to_string()),
    }
}

fn threshold_check(name: &'static str, thresholds: &Thresholds, percent: f64) -> HealthCheck {
    HealthCheck::new(name, thresholds.classify(percent), format!("{percent:.1}% used"))
}

/// Level for a `systemctl is-active` state.
#[must_use]
pub fn classify_service(state: &str) -> HealthLevel {
    match state {
        "active" => HealthLevel::Ok,
        "activating" | "reloading" => HealthLevel::Warning,
        _ => HealthLevel::Error,
    }
}

/// Used memory percentage from `/proc/meminfo` content.
#[must_use]
pub fn memory_usage(meminfo: &str) -> Option<f64> {
    let field = |name: &str| {
        meminfo.lines().find_map(|line| {
            let rest = line.strip_prefix(name)?.strip_prefix(':')?;
            rest.split_whitespace().next()?.parse::<f64>().ok()
        })
    };

    let total = field("MemTotal")?;
    let available = field("MemAvailable").or_else(|| field("MemFree"))?;
    if total <= 0.0 {
        return None;
    }
    Some((total - available) / total * 100.0)
}

/// Used disk percentage the way `df` reports it.
#[must_use]
pub fn disk_percent(blocks: u64, free: u64, available: u64) -> Option<f64> {
    let used = blocks.checked_sub(free)?;
    let denominator = used + available;
    if denominator == 0 {
        return None;
    }
    Some(used as f64 / denominator as f64 * 100.0)
}

#[cfg(unix)]
fn disk_usage(path: &Path) -> Option<f64> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: c_path is a valid NUL-terminated string and stat is a valid
    // out-pointer for the duration of the call.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if rc != 0 {
        return None;
    }
    disk_percent(
        u64::from(stat.f_blocks),
        u64::from(stat.f_bfree),
        u64::from(stat.f_bavail),
    )
}

#[cfg(not(unix))]
fn disk_usage(_path: &Path) -> Option<f64> {
    None
}

fn count_lines(output: &str) -> usize {
    output.lines().filter(|line| !line.trim().is_empty()).count()
}
