use netops_shared::{AuthorityError, OperatorId, ServerProtocol};
use thiserror::Error;

/// Errors produced by the servers editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// No entry at this position of the operator list.
    #[error("No operator entry at index {0}")]
    UnknownEntry(usize),

    /// The entry holds user-added servers and has no operator.
    #[error("Entry at index {0} has no operator")]
    NoOperator(usize),

    #[error("No {protocol} server at index {index}")]
    UnknownServer {
        protocol: ServerProtocol,
        index: usize,
    },

    #[error("Preset servers cannot be deleted")]
    PresetServer,

    /// Loaded data has an operator enabled whose conditions forbid usage.
    #[error("Operator {0} is enabled but its conditions do not allow usage")]
    InvalidOperatorState(OperatorId),

    #[error("Conditions acceptance already in progress")]
    AcceptanceInFlight,

    #[error("No conditions acceptance pending")]
    NoPendingAcceptance,

    #[error("No conditions acceptance in progress")]
    NotInFlight,

    /// The authority answered, but its snapshot still forbids the operator.
    #[error("Conditions for operator {0} are still not accepted")]
    NotAccepted(OperatorId),

    #[error("Error accepting conditions: {0}")]
    Authority(#[from] AuthorityError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;
