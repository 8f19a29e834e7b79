//! # netops-check
//!
//! Validates a user's operator and server configuration against the
//! conditions authority.
//!
//! - loads the current operators snapshot from the authority
//! - loads the servers file and reports every validation error
//! - optionally switches one operator on (`NETOPS_ACCEPT`), accepting its
//!   conditions when required
//! - prints the resulting configuration as JSON on stdout

use std::sync::Arc;

use anyhow::Context;
use netops_client_lib::{init_tracing, load_servers, ClientConfig, HttpAuthority};
use netops_core::{
    load_conditions_text, ConditionsAuthority, ConditionsContext, ConditionsText,
    ServersEditor, UseOperatorOutcome,
};
use netops_shared::{OperatorId, UserServersError};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Tracing and configuration
    // -----------------------------------------------------------------------
    init_tracing();
    info!("Starting netops-check v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 2. Authority snapshot and servers file
    // -----------------------------------------------------------------------
    let authority = HttpAuthority::new(&config)?;
    let snapshot = authority
        .server_operators()
        .await
        .with_context(|| format!("Failed to load operators from {}", authority.base_url()))?;
    info!(
        operators = snapshot.server_operators.len(),
        conditions_id = snapshot.current_conditions.conditions_id,
        "Loaded operators snapshot"
    );
    let context = Arc::new(ConditionsContext::new(snapshot));

    let servers = load_servers(&config.servers_file)?;
    let mut editor = ServersEditor::new(servers, context)?;
    report(editor.errors());

    // -----------------------------------------------------------------------
    // 3. Switch an operator on, if asked
    // -----------------------------------------------------------------------
    if let Some(operator_id) = config.accept_operator {
        enable_operator(&mut editor, &authority, operator_id).await?;
        report(editor.errors());
    }

    // -----------------------------------------------------------------------
    // 4. Output
    // -----------------------------------------------------------------------
    println!("{}", serde_json::to_string_pretty(editor.servers())?);
    Ok(())
}

async fn enable_operator(
    editor: &mut ServersEditor,
    authority: &HttpAuthority,
    operator_id: OperatorId,
) -> anyhow::Result<()> {
    let Some(index) = editor
        .servers()
        .iter()
        .position(|e| e.operator_id() == Some(operator_id))
    else {
        warn!(%operator_id, "Operator not found in servers file");
        return Ok(());
    };

    match editor.set_use_operator(index, true)? {
        UseOperatorOutcome::Enabled | UseOperatorOutcome::Disabled => {
            info!(%operator_id, "Operator enabled");
        }
        UseOperatorOutcome::AcceptanceRequired(flow) => {
            info!(
                %operator_id,
                presentation = ?flow.presentation,
                also_applies_to = ?flow.also_applies_to,
                "Conditions must be accepted"
            );
            match load_conditions_text(authority).await {
                ConditionsText::Text(text) => info!(chars = text.len(), "Conditions text loaded"),
                ConditionsText::Link(url) => info!(%url, "Conditions available at link"),
            }

            match editor.accept_conditions(authority).await {
                Ok(()) => info!(%operator_id, "Operator enabled after accepting conditions"),
                Err(e) => error!(%operator_id, error = %e, "Operator not enabled"),
            }
        }
    }
    Ok(())
}

fn report(errors: &[UserServersError]) {
    if errors.is_empty() {
        info!("Server configuration is valid");
    }
    for e in errors {
        warn!(protocol = %e.protocol(), "{e}");
    }
}
