//! Unified operator capability surface for inbound adapters.

use super::diagnostic::DiagnosticOperator;
use super::runtime::RuntimeOperator;
use super::session::SessionOperator;
use super::subscribers::SubscriberOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort:
    DiagnosticOperator + RuntimeOperator + SessionOperator + SubscriberOperator
{
}

impl<T> OperatorPort for T where
    T: DiagnosticOperator + RuntimeOperator + SessionOperator + SubscriberOperator
{
}
