use crate::adapter::inbound::cli::command::HealthArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::domain::{HealthLevel, HealthReport};
use crate::error::{Error, Result};
use crate::port::inbound::operator::diagnostic::HealthRequest;
use serde_json::json;

/// Run the service and host health checks.
///
/// Exits non-zero when the overall level is ERROR.
pub async fn execute_health(args: &HealthArgs) -> Result<()> {
    let request = HealthRequest {
        source: operator::source(&args.source),
        service: args.service.clone(),
        database: args.db.clone(),
    };

    let spinner = output::spinner("Running health checks");
    let report = operator::operator().health_report(&request).await?;
    spinner.finish_and_clear();

    let overall = report.overall();
    if output::is_json() {
        output::json_output(to_json(&report));
    } else {
        output::section("Health Check");
        for check in &report.checks {
            output::field(
                check.name,
                format!("{} {}", output::level(check.level), check.detail),
            );
        }
    }

    match overall {
        HealthLevel::Error => {
            output::error("Health check failed");
            Err(Error::Unhealthy(failing_checks(&report)))
        }
        HealthLevel::Warning => {
            output::warning("Health check passed with warnings");
            Ok(())
        }
        HealthLevel::Ok => {
            output::success("Health check passed");
            Ok(())
        }
    }
}

fn to_json(report: &HealthReport) -> serde_json::Value {
    json!({
        "command": "check.health",
        "status": report.overall(),
        "checks": report.checks,
    })
}

fn failing_checks(report: &HealthReport) -> String {
    report
        .checks
        .iter()
        .filter(|check| check.level == HealthLevel::Error)
        .map(|check| check.name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HealthCheck;

    fn report() -> HealthReport {
        let mut report = HealthReport::default();
        report.push(HealthCheck::new("service", HealthLevel::Ok, "active"));
        report.push(HealthCheck::new("disk", HealthLevel::Error, "97.0% used"));
        report.push(HealthCheck::new("memory", HealthLevel::Warning, "85.0% used"));
        report
    }

    #[test]
    fn json_uses_level_names() {
        let value = to_json(&report());
        assert_eq!(value["command"], "check.health");
        assert_eq!(value["status"], "ERROR");
        assert_eq!(value["checks"][0]["name"], "service");
        assert_eq!(value["checks"][0]["level"], "OK");
        assert_eq!(value["checks"][2]["level"], "WARNING");
    }

    #[test]
    fn failing_checks_lists_errors_only() {
        assert_eq!(failing_checks(&report()), "disk");
    }
}
