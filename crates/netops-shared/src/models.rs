//! Domain model structs for operators, their servers and usage conditions.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer over IPC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::host::normalized_hosts;
use crate::types::{ConditionsAcceptance, OperatorId, ServerProtocol, ServerRoles};

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// Public description of an operator, shown on its info page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OperatorInfo {
    /// Description paragraphs.
    #[serde(default)]
    pub description: Vec<String>,
    /// Operator website.
    #[serde(default)]
    pub website: String,
}

/// An entity publishing message relay and file transfer servers under its
/// own conditions of use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerOperator {
    pub operator_id: OperatorId,
    pub trade_name: String,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub info: OperatorInfo,
    /// Whether the user uses this operator's servers. Only ever `true` when
    /// `conditions_acceptance` allows usage.
    pub enabled: bool,
    pub conditions_acceptance: ConditionsAcceptance,
    pub smp_roles: ServerRoles,
    pub xftp_roles: ServerRoles,
}

impl ServerOperator {
    /// Legal name, falling back to the trade name.
    pub fn legal_name_or_trade(&self) -> &str {
        self.legal_name.as_deref().unwrap_or(&self.trade_name)
    }

    pub fn roles(&self, protocol: ServerProtocol) -> ServerRoles {
        match protocol {
            ServerProtocol::Smp => self.smp_roles,
            ServerProtocol::Xftp => self.xftp_roles,
        }
    }

    pub fn roles_mut(&mut self, protocol: ServerProtocol) -> &mut ServerRoles {
        match protocol {
            ServerProtocol::Smp => &mut self.smp_roles,
            ServerProtocol::Xftp => &mut self.xftp_roles,
        }
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// One configured server of either protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserServer {
    /// Stable identity for list rendering; not used for duplicate detection.
    #[serde(default = "Uuid::new_v4")]
    pub key: Uuid,
    /// Database id, present once the server has been saved.
    #[serde(default)]
    pub server_id: Option<i64>,
    /// Server address, e.g. `smp://<keyhash>@host1,host2:5223`.
    pub server: String,
    /// Built-in server shipped with the operator; cannot be deleted.
    #[serde(default)]
    pub preset: bool,
    /// Result of the last connectivity test, if any.
    #[serde(default)]
    pub tested: Option<bool>,
    pub enabled: bool,
    /// Soft-deleted: excluded from validation until the edit is saved.
    #[serde(default)]
    pub deleted: bool,
}

impl UserServer {
    /// A new user-added server, not yet saved.
    pub fn custom(server: impl Into<String>) -> Self {
        Self {
            key: Uuid::new_v4(),
            server_id: None,
            server: server.into(),
            preset: false,
            tested: None,
            enabled: true,
            deleted: false,
        }
    }

    /// Normalized hosts of this server's address.
    pub fn hosts(&self) -> Vec<String> {
        normalized_hosts(&self.server)
    }
}

// ---------------------------------------------------------------------------
// Per-operator server lists
// ---------------------------------------------------------------------------

/// The servers of one operator, or of no operator for servers the user
/// added by hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserOperatorServers {
    /// `None` for the entry holding user-added servers.
    #[serde(default)]
    pub operator: Option<ServerOperator>,
    #[serde(default)]
    pub smp_servers: Vec<UserServer>,
    #[serde(default)]
    pub xftp_servers: Vec<UserServer>,
}

impl UserOperatorServers {
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.operator.as_ref().map(|op| op.operator_id)
    }

    /// User-added servers have no operator to switch off.
    pub fn is_operator_enabled(&self) -> bool {
        self.operator.as_ref().map_or(true, |op| op.enabled)
    }

    pub fn servers(&self, protocol: ServerProtocol) -> &[UserServer] {
        match protocol {
            ServerProtocol::Smp => &self.smp_servers,
            ServerProtocol::Xftp => &self.xftp_servers,
        }
    }

    pub fn servers_mut(&mut self, protocol: ServerProtocol) -> &mut Vec<UserServer> {
        match protocol {
            ServerProtocol::Smp => &mut self.smp_servers,
            ServerProtocol::Xftp => &mut self.xftp_servers,
        }
    }

    /// Roles granted to this entry's servers. User-added servers carry every role.
    pub fn roles(&self, protocol: ServerProtocol) -> ServerRoles {
        self.operator
            .as_ref()
            .map_or(ServerRoles::ALL, |op| op.roles(protocol))
    }

    pub fn has_active_servers(&self, protocol: ServerProtocol) -> bool {
        self.servers(protocol).iter().any(|s| !s.deleted)
    }

    pub fn has_preset_servers(&self, protocol: ServerProtocol) -> bool {
        self.servers(protocol).iter().any(|s| s.preset)
    }

    pub fn has_custom_servers(&self, protocol: ServerProtocol) -> bool {
        self.servers(protocol)
            .iter()
            .any(|s| !s.preset && !s.deleted)
    }
}

// ---------------------------------------------------------------------------
// Usage conditions
// ---------------------------------------------------------------------------

/// One published version of the conditions of use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageConditions {
    pub conditions_id: i64,
    /// Commit of the legal text this version refers to.
    pub conditions_commit: String,
    #[serde(default)]
    pub notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Authoritative acceptance state of every known operator, as returned by
/// the conditions authority on every query and accept call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerOperatorConditions {
    pub server_operators: Vec<ServerOperator>,
    pub current_conditions: UsageConditions,
}

impl ServerOperatorConditions {
    pub fn operator(&self, id: OperatorId) -> Option<&ServerOperator> {
        self.server_operators.iter().find(|op| op.operator_id == id)
    }
}

/// Result of fetching the current conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsDocument {
    pub current: UsageConditions,
    /// Full legal text, when the authority can serve it.
    #[serde(default)]
    pub text: Option<String>,
    /// The version the user accepted previously, if any.
    #[serde(default)]
    pub accepted: Option<UsageConditions>,
}
