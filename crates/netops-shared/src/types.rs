use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Operator identity, assigned by the remote authority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct OperatorId(pub i64);

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ServerProtocol {
    /// Message relay servers (send/receive).
    Smp,
    /// File transfer servers.
    Xftp,
}

impl ServerProtocol {
    /// Every protocol, in the order validation reports them.
    pub const ALL: [ServerProtocol; 2] = [ServerProtocol::Smp, ServerProtocol::Xftp];

    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Smp => "smp",
            Self::Xftp => "xftp",
        }
    }

    /// Only message relays can forward traffic for private routing.
    pub fn has_proxy_role(&self) -> bool {
        matches!(self, Self::Smp)
    }
}

impl std::fmt::Display for ServerProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scheme())
    }
}

/// What an operator's servers may be used for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ServerRoles {
    /// Store and receive messages / files.
    pub storage: bool,
    /// Relay for private routing.
    pub proxy: bool,
}

impl ServerRoles {
    pub const ALL: ServerRoles = ServerRoles {
        storage: true,
        proxy: true,
    };
}

/// Whether the user has accepted an operator's conditions of use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConditionsAcceptance {
    /// Conditions are in force. `accepted_at` is absent for acceptances
    /// recorded before timestamps were tracked.
    Accepted {
        #[serde(rename = "acceptedAt", default)]
        accepted_at: Option<DateTime<Utc>>,
    },
    /// Conditions are not accepted yet. With a deadline the operator may be
    /// used until then; without one an explicit accept is mandatory.
    Required {
        #[serde(default)]
        deadline: Option<DateTime<Utc>>,
    },
}

impl ConditionsAcceptance {
    pub fn conditions_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn usage_allowed(&self) -> bool {
        match self {
            Self::Accepted { .. } => true,
            Self::Required { deadline } => deadline.is_some(),
        }
    }

    /// Footer line shown under the operator toggle.
    pub fn acceptance_note(&self, enabled: bool) -> Option<AcceptanceNote> {
        match *self {
            Self::Accepted { accepted_at } => accepted_at.map(AcceptanceNote::AcceptedOn),
            Self::Required {
                deadline: Some(deadline),
            } if enabled => Some(AcceptanceNote::WillBeAcceptedOn(deadline)),
            Self::Required { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "date", rename_all = "camelCase")]
pub enum AcceptanceNote {
    AcceptedOn(DateTime<Utc>),
    WillBeAcceptedOn(DateTime<Utc>),
}
