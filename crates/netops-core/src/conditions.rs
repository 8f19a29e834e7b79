//! Choosing how conditions are presented before an operator is switched on.

use std::collections::BTreeSet;

use netops_shared::constants::{conditions_url, DEFAULT_CONDITIONS_URL};
use netops_shared::{ConditionsDocument, OperatorId, ServerOperator, ServerOperatorConditions};
use serde::Serialize;
use tracing::warn;

use crate::authority::ConditionsAuthority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FlowPresentation {
    /// The target already accepted; nothing to ask.
    AlreadyAccepted,
    /// Other enabled operators accepted the same conditions; confirm they
    /// apply to the target too.
    #[serde(rename_all = "camelCase")]
    AcceptedElsewhere { accepted_by: Vec<String> },
    /// Show the full conditions text with an accept action.
    FullText,
}

/// What to show the user, and who the acceptance will cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceFlow {
    pub presentation: FlowPresentation,
    /// The target plus every other enabled operator still awaiting acceptance.
    pub operator_ids: BTreeSet<OperatorId>,
    /// Legal names of the other operators the acceptance will also cover.
    pub also_applies_to: Vec<String>,
}

/// Select the acceptance flow for `target` against the authoritative snapshot.
pub fn select_acceptance_flow(
    target: &ServerOperator,
    snapshot: &ServerOperatorConditions,
) -> AcceptanceFlow {
    let others = move || {
        snapshot
            .server_operators
            .iter()
            .filter(move |op| op.operator_id != target.operator_id && op.enabled)
    };

    let pending: Vec<&ServerOperator> = others()
        .filter(|op| !op.conditions_acceptance.conditions_accepted())
        .collect();

    let mut operator_ids: BTreeSet<OperatorId> =
        pending.iter().map(|op| op.operator_id).collect();
    operator_ids.insert(target.operator_id);

    let also_applies_to = pending
        .iter()
        .map(|op| op.legal_name_or_trade().to_owned())
        .collect();

    let accepted_by: Vec<String> = others()
        .filter(|op| op.conditions_acceptance.conditions_accepted())
        .map(|op| op.legal_name_or_trade().to_owned())
        .collect();

    let presentation = if target.conditions_acceptance.conditions_accepted() {
        FlowPresentation::AlreadyAccepted
    } else if !accepted_by.is_empty() {
        FlowPresentation::AcceptedElsewhere { accepted_by }
    } else {
        FlowPresentation::FullText
    };

    AcceptanceFlow {
        presentation,
        operator_ids,
        also_applies_to,
    }
}

/// Conditions content to display in the full-text flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ConditionsText {
    Text(String),
    /// The text is unavailable; review it at this link instead.
    Link(String),
}

impl ConditionsText {
    pub fn from_document(doc: &ConditionsDocument) -> Self {
        match doc.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Self::Text(text.to_owned()),
            _ => Self::Link(conditions_url(&doc.current.conditions_commit)),
        }
    }
}

/// Fetch the conditions text, falling back to the static link on any failure.
pub async fn load_conditions_text<A: ConditionsAuthority>(authority: &A) -> ConditionsText {
    match authority.fetch_usage_conditions().await {
        Ok(doc) => ConditionsText::from_document(&doc),
        Err(e) => {
            warn!(error = %e, "Failed to load usage conditions, falling back to link");
            ConditionsText::Link(DEFAULT_CONDITIONS_URL.to_string())
        }
    }
}
