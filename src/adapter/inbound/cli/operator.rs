//! Inbound operator accessor for CLI handlers.

use std::sync::OnceLock;

use crate::port::inbound::operator::port::OperatorPort;
use crate::port::inbound::operator::source::ConfigSource;

use super::command::SourceArgs;

static OPERATOR: OnceLock<Box<dyn OperatorPort>> = OnceLock::new();

/// Installs the operator implementation used by CLI handlers.
pub fn install(operator: Box<dyn OperatorPort>) -> std::result::Result<(), Box<dyn OperatorPort>> {
    OPERATOR.set(operator)
}

/// Returns the configured operator capability surface for CLI handlers.
#[must_use]
pub fn operator() -> &'static dyn OperatorPort {
    OPERATOR
        .get()
        .expect("CLI operator not installed; call cli::operator::install from main")
        .as_ref()
}

/// Configuration locations from the shared source flags.
#[must_use]
pub fn source(args: &SourceArgs) -> ConfigSource {
    ConfigSource::new(args.env_file.clone(), args.config.clone())
}
