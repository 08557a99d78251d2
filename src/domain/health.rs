//! Health levels and threshold classification for the service monitor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status level reported for a single health probe.
///
/// Ordered from best to worst so the overall level of a report is the
/// maximum of its checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthLevel {
    Ok,
    Warning,
    Error,
}

impl HealthLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-step threshold: values below `warning` are OK, values below `error`
/// are WARNING, anything else is ERROR.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    pub warning: f64,
    pub error: f64,
}

impl Thresholds {
    #[must_use]
    pub const fn new(warning: f64, error: f64) -> Self {
        Self { warning, error }
    }

    /// Disk usage percentage thresholds.
    #[must_use]
    pub const fn disk() -> Self {
        Self::new(85.0, 95.0)
    }

    /// Memory usage percentage thresholds.
    #[must_use]
    pub const fn memory() -> Self {
        Self::new(80.0, 90.0)
    }

    /// Thresholds for the number of recent error log lines.
    #[must_use]
    pub const fn error_lines() -> Self {
        Self::new(1.0, 10.0)
    }

    #[must_use]
    pub fn classify(&self, value: f64) -> HealthLevel {
        if value < self.warning {
            HealthLevel::Ok
        } else if value < self.error {
            HealthLevel::Warning
        } else {
            HealthLevel::Error
        }
    }

    /// True when the thresholds are ordered and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.warning >= 0.0 && self.warning <= self.error
    }
}

/// Result of one health probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub level: HealthLevel,
    pub detail: String,
}

impl HealthCheck {
    pub fn new(name: &'static str, level: HealthLevel, detail: impl Into<String>) -> Self {
        Self {
            name,
            level,
            detail: detail.into(),
        }
    }
}

/// Collected probe results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthReport {
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn push(&mut self, check: HealthCheck) {
        self.checks.push(check);
    }

    /// Worst level across all checks; an empty report is OK.
    #[must_use]
    pub fn overall(&self) -> HealthLevel {
        self.checks
            .iter()
            .map(|check| check.level)
            .max()
            .unwrap_or(HealthLevel::Ok)
    }
}
