//! Concrete operator installed by the binary.

/// Implements every operator port on top of the infrastructure layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Operator;

impl Operator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}
