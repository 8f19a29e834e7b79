//! Editing session over the user's operators and servers.
//!
//! [`ServersEditor`] owns two copies of the operator lists: the committed
//! baseline and the draft the user is editing. Every mutation goes through
//! the editor and is followed by validation, so [`ServersEditor::errors`]
//! always matches [`ServersEditor::servers`].
//!
//! Switching an operator on follows its conditions acceptance: accepted
//! operators and operators within their grace period are enabled at once;
//! otherwise the operator becomes *pending* and stays disabled until a
//! conditions acceptance transaction for it succeeds. The transaction is
//! split into [`ServersEditor::begin_acceptance`] and
//! [`ServersEditor::complete_acceptance`] so that the network call happens
//! outside the editor; [`ServersEditor::accept_conditions`] runs both around
//! a [`ConditionsAuthority`].
//!
//! At every point, an enabled operator in either copy has conditions that
//! allow usage. Breaking this is a bug in the editor and panics.

use std::collections::BTreeSet;
use std::sync::Arc;

use netops_shared::{
    AcceptanceNote, AuthorityError, ConditionsAcceptance, OperatorId, ServerOperator,
    ServerOperatorConditions, ServerProtocol, ServerRoles, UserOperatorServers, UserServer,
    UserServersError,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::authority::ConditionsAuthority;
use crate::conditions::{select_acceptance_flow, AcceptanceFlow};
use crate::context::ConditionsContext;
use crate::duplicates::find_duplicate_hosts;
use crate::error::{EditorError, Result};
use crate::validation::validate_servers;

/// Result of switching an operator on or off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseOperatorOutcome {
    Enabled,
    Disabled,
    /// Conditions must be accepted first; the operator is pending.
    AcceptanceRequired(AcceptanceFlow),
}

/// Parameters of the acceptance call to make against the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceRequest {
    pub conditions_id: i64,
    pub operator_ids: BTreeSet<OperatorId>,
    /// Operator whose toggle started the flow.
    pub initiator: OperatorId,
}

pub struct ServersEditor {
    context: Arc<ConditionsContext>,
    baseline: Vec<UserOperatorServers>,
    draft: Vec<UserOperatorServers>,
    errors: Vec<UserServersError>,
    /// Operator switched on but waiting for conditions acceptance.
    pending: Option<OperatorId>,
    /// Set between `begin_acceptance` and `complete_acceptance`.
    in_flight: bool,
}

impl ServersEditor {
    /// Start an editing session over `servers`.
    ///
    /// Fails if an operator is enabled although its conditions forbid usage.
    pub fn new(servers: Vec<UserOperatorServers>, context: Arc<ConditionsContext>) -> Result<Self> {
        if let Some(op) = servers
            .iter()
            .filter_map(|e| e.operator.as_ref())
            .find(|op| op.enabled && !op.conditions_acceptance.usage_allowed())
        {
            return Err(EditorError::InvalidOperatorState(op.operator_id));
        }

        let mut editor = Self {
            context,
            baseline: servers.clone(),
            draft: servers,
            errors: Vec::new(),
            pending: None,
            in_flight: false,
        };
        editor.revalidate();
        Ok(editor)
    }

    // -- Snapshots ----------------------------------------------------------

    /// The draft lists being edited.
    pub fn servers(&self) -> &[UserOperatorServers] {
        &self.draft
    }

    /// The lists as last committed.
    pub fn baseline(&self) -> &[UserOperatorServers] {
        &self.baseline
    }

    /// Validation errors of the current draft.
    pub fn errors(&self) -> &[UserServersError] {
        &self.errors
    }

    pub fn duplicate_hosts(&self) -> BTreeSet<String> {
        find_duplicate_hosts(&self.errors)
    }

    pub fn context(&self) -> &Arc<ConditionsContext> {
        &self.context
    }

    pub fn has_changes(&self) -> bool {
        self.draft != self.baseline
    }

    pub fn is_accepting(&self) -> bool {
        self.in_flight
    }

    pub fn pending_operator(&self) -> Option<OperatorId> {
        self.pending
    }

    /// Re-run validation against the current draft.
    pub fn revalidate(&mut self) -> &[UserServersError] {
        self.errors = validate_servers(&self.draft);
        self.assert_usage_invariant();
        &self.errors
    }

    // -- Operator use -------------------------------------------------------

    /// Position of the "use servers" toggle: on when enabled or pending.
    pub fn use_operator(&self, index: usize) -> Result<bool> {
        let op = self.operator(index)?;
        Ok(op.enabled || self.pending == Some(op.operator_id))
    }

    /// Switch an operator's servers on or off.
    pub fn set_use_operator(&mut self, index: usize, use_operator: bool) -> Result<UseOperatorOutcome> {
        let (id, acceptance) = {
            let op = self.operator(index)?;
            (op.operator_id, op.conditions_acceptance)
        };
        if self.in_flight && self.pending == Some(id) {
            return Err(EditorError::AcceptanceInFlight);
        }

        if !use_operator {
            self.operator_mut(index)?.enabled = false;
            if self.pending == Some(id) {
                self.pending = None;
            }
            debug!(operator_id = %id, "Operator disabled");
            self.revalidate();
            return Ok(UseOperatorOutcome::Disabled);
        }

        match acceptance {
            ConditionsAcceptance::Accepted { .. }
            | ConditionsAcceptance::Required { deadline: Some(_) } => {
                self.operator_mut(index)?.enabled = true;
                if self.pending == Some(id) {
                    self.pending = None;
                }
                debug!(operator_id = %id, ?acceptance, "Operator enabled");
                self.revalidate();
                Ok(UseOperatorOutcome::Enabled)
            }
            ConditionsAcceptance::Required { deadline: None } => {
                if self.in_flight {
                    return Err(EditorError::AcceptanceInFlight);
                }
                let flow = self.acceptance_flow(index)?;
                self.pending = Some(id);
                debug!(
                    operator_id = %id,
                    accept_for = ?flow.operator_ids,
                    "Operator requires conditions acceptance"
                );
                Ok(UseOperatorOutcome::AcceptanceRequired(flow))
            }
        }
    }

    /// The user left the acceptance flow without accepting: the pending
    /// toggle reverts. Other operators are not touched.
    pub fn abandon_acceptance(&mut self) -> Result<Option<OperatorId>> {
        if self.in_flight {
            return Err(EditorError::AcceptanceInFlight);
        }
        let reverted = self.pending.take();
        if let Some(id) = reverted {
            debug!(operator_id = %id, "Conditions acceptance abandoned");
        }
        Ok(reverted)
    }

    /// How conditions would be presented for the operator at `index`.
    pub fn acceptance_flow(&self, index: usize) -> Result<AcceptanceFlow> {
        let op = self.operator(index)?;
        Ok(select_acceptance_flow(op, &self.context.load()))
    }

    pub fn acceptance_note(&self, index: usize) -> Result<Option<AcceptanceNote>> {
        let op = self.operator(index)?;
        Ok(op.conditions_acceptance.acceptance_note(op.enabled))
    }

    // -- Conditions acceptance transaction ----------------------------------

    /// Mark the acceptance for the pending operator as in flight and return
    /// the call to make.
    pub fn begin_acceptance(&mut self) -> Result<AcceptanceRequest> {
        if self.in_flight {
            return Err(EditorError::AcceptanceInFlight);
        }
        let initiator = self.pending.ok_or(EditorError::NoPendingAcceptance)?;
        let target = self
            .draft
            .iter()
            .filter_map(|e| e.operator.as_ref())
            .find(|op| op.operator_id == initiator)
            .ok_or(EditorError::NoPendingAcceptance)?;

        let snapshot = self.context.load();
        let flow = select_acceptance_flow(target, &snapshot);
        self.in_flight = true;

        debug!(
            operator_id = %initiator,
            conditions_id = snapshot.current_conditions.conditions_id,
            accept_for = ?flow.operator_ids,
            "Accepting conditions"
        );

        Ok(AcceptanceRequest {
            conditions_id: snapshot.current_conditions.conditions_id,
            operator_ids: flow.operator_ids,
            initiator,
        })
    }

    /// Apply the authority's answer to an in-flight acceptance.
    ///
    /// On success the snapshot replaces the shared context, both list copies
    /// take their acceptance state from it, and the initiating operator is
    /// enabled in the draft. On failure nothing but the pending toggle
    /// changes, and the error is returned for display.
    pub fn complete_acceptance(
        &mut self,
        result: std::result::Result<ServerOperatorConditions, AuthorityError>,
    ) -> Result<()> {
        if !self.in_flight {
            return Err(EditorError::NotInFlight);
        }
        self.in_flight = false;
        let initiator = self.pending.take();

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, operator_id = ?initiator, "Error accepting conditions");
                self.revalidate();
                return Err(e.into());
            }
        };

        reconcile_acceptance(&mut self.baseline, &snapshot.server_operators);
        reconcile_acceptance(&mut self.draft, &snapshot.server_operators);

        let mut outcome = Ok(());
        if let Some(id) = initiator {
            let target = self
                .draft
                .iter_mut()
                .filter_map(|e| e.operator.as_mut())
                .find(|op| op.operator_id == id);
            match target {
                Some(op) if op.conditions_acceptance.usage_allowed() => op.enabled = true,
                Some(_) => outcome = Err(EditorError::NotAccepted(id)),
                None => {}
            }
        }

        info!(
            operator_id = ?initiator,
            conditions_id = snapshot.current_conditions.conditions_id,
            "Conditions accepted"
        );
        self.context.replace(snapshot);
        self.revalidate();
        outcome
    }

    /// Accept conditions for the pending operator (and every other enabled
    /// operator awaiting acceptance) through `authority`.
    pub async fn accept_conditions<A: ConditionsAuthority>(&mut self, authority: &A) -> Result<()> {
        let request = self.begin_acceptance()?;
        let result = authority
            .accept_conditions(request.conditions_id, &request.operator_ids)
            .await;
        self.complete_acceptance(result)
    }

    // -- Roles and servers --------------------------------------------------

    pub fn set_roles(&mut self, index: usize, protocol: ServerProtocol, roles: ServerRoles) -> Result<()> {
        let op = self.operator_mut(index)?;
        *op.roles_mut(protocol) = roles;
        debug!(operator_id = %op.operator_id, %protocol, ?roles, "Operator roles changed");
        self.revalidate();
        Ok(())
    }

    pub fn set_storage_role(&mut self, index: usize, protocol: ServerProtocol, storage: bool) -> Result<()> {
        let roles = ServerRoles {
            storage,
            ..self.operator(index)?.roles(protocol)
        };
        self.set_roles(index, protocol, roles)
    }

    pub fn set_proxy_role(&mut self, index: usize, protocol: ServerProtocol, proxy: bool) -> Result<()> {
        let roles = ServerRoles {
            proxy,
            ..self.operator(index)?.roles(protocol)
        };
        self.set_roles(index, protocol, roles)
    }

    /// Add a user server, creating the entry for servers without an operator
    /// if there is none yet. Returns the new server's key.
    pub fn add_server(&mut self, protocol: ServerProtocol, address: impl Into<String>) -> Uuid {
        let index = match self.draft.iter().position(|e| e.operator.is_none()) {
            Some(index) => index,
            None => {
                self.draft.push(UserOperatorServers::default());
                self.draft.len() - 1
            }
        };

        let server = UserServer::custom(address);
        let key = server.key;
        debug!(%protocol, server = %server.server, "Server added");
        self.draft[index].servers_mut(protocol).push(server);
        self.revalidate();
        key
    }

    /// Delete a server. Saved servers are marked deleted until the edit is
    /// committed; unsaved ones are dropped. Preset servers cannot be deleted.
    pub fn delete_server(&mut self, index: usize, protocol: ServerProtocol, server_index: usize) -> Result<()> {
        let servers = self
            .draft
            .get_mut(index)
            .ok_or(EditorError::UnknownEntry(index))?
            .servers_mut(protocol);
        let (preset, saved) = servers
            .get(server_index)
            .map(|s| (s.preset, s.server_id.is_some()))
            .ok_or(EditorError::UnknownServer {
                protocol,
                index: server_index,
            })?;

        if preset {
            return Err(EditorError::PresetServer);
        }
        if saved {
            servers[server_index].deleted = true;
        } else {
            servers.remove(server_index);
        }
        debug!(%protocol, index, server_index, "Server deleted");
        self.revalidate();
        Ok(())
    }

    pub fn set_server_enabled(
        &mut self,
        index: usize,
        protocol: ServerProtocol,
        server_index: usize,
        enabled: bool,
    ) -> Result<()> {
        self.draft
            .get_mut(index)
            .ok_or(EditorError::UnknownEntry(index))?
            .servers_mut(protocol)
            .get_mut(server_index)
            .ok_or(EditorError::UnknownServer {
                protocol,
                index: server_index,
            })?
            .enabled = enabled;
        self.revalidate();
        Ok(())
    }

    // -- Session end --------------------------------------------------------

    /// Make the draft the new baseline and return it for saving.
    pub fn commit(&mut self) -> Vec<UserOperatorServers> {
        self.baseline = self.draft.clone();
        info!(entries = self.baseline.len(), "Server configuration committed");
        self.baseline.clone()
    }

    /// Discard the draft.
    pub fn reset(&mut self) -> Result<()> {
        if self.in_flight {
            return Err(EditorError::AcceptanceInFlight);
        }
        self.draft = self.baseline.clone();
        self.pending = None;
        self.revalidate();
        Ok(())
    }

    // -- Internals ----------------------------------------------------------

    fn operator(&self, index: usize) -> Result<&ServerOperator> {
        self.draft
            .get(index)
            .ok_or(EditorError::UnknownEntry(index))?
            .operator
            .as_ref()
            .ok_or(EditorError::NoOperator(index))
    }

    fn operator_mut(&mut self, index: usize) -> Result<&mut ServerOperator> {
        self.draft
            .get_mut(index)
            .ok_or(EditorError::UnknownEntry(index))?
            .operator
            .as_mut()
            .ok_or(EditorError::NoOperator(index))
    }

    fn assert_usage_invariant(&self) {
        for op in self
            .baseline
            .iter()
            .chain(self.draft.iter())
            .filter_map(|e| e.operator.as_ref())
        {
            assert!(
                !op.enabled || op.conditions_acceptance.usage_allowed(),
                "operator {} enabled while its conditions forbid usage",
                op.operator_id
            );
        }
    }
}

/// Copy each operator's acceptance state from the authoritative snapshot,
/// matching by operator id. Nothing else is changed, except that an operator
/// whose conditions no longer allow usage is switched off.
pub fn reconcile_acceptance(lists: &mut [UserOperatorServers], operators: &[ServerOperator]) {
    for op in lists.iter_mut().filter_map(|e| e.operator.as_mut()) {
        let Some(latest) = operators.iter().find(|o| o.operator_id == op.operator_id) else {
            continue;
        };
        op.conditions_acceptance = latest.conditions_acceptance;
        if op.enabled && !op.conditions_acceptance.usage_allowed() {
            warn!(operator_id = %op.operator_id, "Conditions no longer allow usage, disabling operator");
            op.enabled = false;
        }
    }
}
