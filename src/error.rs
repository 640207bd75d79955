//!
//! Defines error types for the capability registry.

use crate::types::KindId;

/// Represents errors raised while building capability relationships.
///
/// Every variant describes a program-construction defect: callers should fail fast
/// rather than keep registering facts against an inconsistent registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The identifier already denotes a capability kind.
    #[error("Capability kind `{0}` is already defined")]
    DuplicateDefinition(KindId),
    /// A composite was declared with fewer than two distinct constituents, or would
    /// (transitively) contain itself.
    #[error("Invalid composite capability `{kind}`: {reason}")]
    InvalidComposite { kind: KindId, reason: String },
    /// The kind was never defined in any tier reachable from the namespace.
    #[error("Unknown capability kind `{0}`")]
    UnknownCapability(KindId),
    /// Composite kinds are derived from their constituents and cannot be assigned.
    #[error("Capability kind `{0}` is composite and cannot be assigned directly")]
    CompositeAssignment(KindId),
    /// Malformed declaration input (identifiers, labels).
    #[error("Usage error: {0}")]
    Usage(String),
}

/// Errors raised while loading a [`crate::config::RegistryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration parsed but carries values the registry rejects.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] RegistryError),
}
