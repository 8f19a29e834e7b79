//! Contract of the remote conditions authority.
//!
//! The engine never talks to the network itself; adapters implement this
//! trait over whatever transport the authority uses.

use std::collections::BTreeSet;

use netops_shared::{AuthorityError, ConditionsDocument, OperatorId, ServerOperatorConditions};

#[allow(async_fn_in_trait)]
pub trait ConditionsAuthority {
    /// Current acceptance state of every known operator.
    async fn server_operators(&self) -> Result<ServerOperatorConditions, AuthorityError>;

    /// Current conditions, their text when available, and the version the
    /// user accepted before. Read-only: the future may be dropped at any time.
    async fn fetch_usage_conditions(&self) -> Result<ConditionsDocument, AuthorityError>;

    /// Accept `conditions_id` for every operator in `operator_ids` at once.
    async fn accept_conditions(
        &self,
        conditions_id: i64,
        operator_ids: &BTreeSet<OperatorId>,
    ) -> Result<ServerOperatorConditions, AuthorityError>;
}
