use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{OperatorId, ServerProtocol};

/// A configuration problem found by server validation.
///
/// These are data for display, not failures: a configuration with errors can
/// still be saved.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UserServersError {
    #[error("No {protocol} servers enabled")]
    NoServers { protocol: ServerProtocol },

    #[error("No {protocol} servers to receive")]
    StorageFromAllOperatorsDisabled { protocol: ServerProtocol },

    #[error("No {protocol} servers for private routing")]
    ProxyFromAllOperatorsDisabled { protocol: ServerProtocol },

    #[error("No {protocol} servers to receive or for private routing")]
    NoProxyOrStorageEnabled { protocol: ServerProtocol },

    #[error("Duplicate {protocol} server host: {host}")]
    DuplicateHost {
        protocol: ServerProtocol,
        host: String,
        servers: Vec<DuplicateServer>,
    },
}

/// One of the servers sharing a duplicated host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateServer {
    /// `None` for user-added servers without an operator.
    pub operator_id: Option<OperatorId>,
    pub server: String,
}

impl UserServersError {
    pub fn protocol(&self) -> ServerProtocol {
        match self {
            Self::NoServers { protocol }
            | Self::StorageFromAllOperatorsDisabled { protocol }
            | Self::ProxyFromAllOperatorsDisabled { protocol }
            | Self::NoProxyOrStorageEnabled { protocol }
            | Self::DuplicateHost { protocol, .. } => *protocol,
        }
    }

    pub fn duplicate_host(&self) -> Option<&str> {
        match self {
            Self::DuplicateHost { host, .. } => Some(host),
            _ => None,
        }
    }

    /// Operators a duplicate involves. Role and empty-list errors are not
    /// tied to a single operator.
    pub fn operator_ids(&self) -> Vec<Option<OperatorId>> {
        match self {
            Self::DuplicateHost { servers, .. } => {
                let mut ids: Vec<Option<OperatorId>> = Vec::new();
                for s in servers {
                    if !ids.contains(&s.operator_id) {
                        ids.push(s.operator_id);
                    }
                }
                ids
            }
            _ => Vec::new(),
        }
    }
}

/// Failures talking to the conditions authority.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rejected by conditions authority ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
