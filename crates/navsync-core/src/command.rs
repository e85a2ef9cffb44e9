//! Command abstractions.

use uuid::Uuid;

/// Trait that all navigation commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID tying the command to the journal events it produces.
    fn correlation_id(&self) -> Uuid;
}
