// Operator server validation and conditions acceptance engine.

pub mod authority;
pub mod conditions;
pub mod context;
pub mod duplicates;
pub mod editor;
pub mod validation;

mod error;

#[cfg(test)]
mod test_support;

pub use authority::ConditionsAuthority;
pub use conditions::{
    load_conditions_text, select_acceptance_flow, AcceptanceFlow, ConditionsText,
    FlowPresentation,
};
pub use context::ConditionsContext;
pub use duplicates::{detect_duplicates, find_duplicate_hosts, is_duplicate};
pub use editor::{reconcile_acceptance, AcceptanceRequest, ServersEditor, UseOperatorOutcome};
pub use error::{EditorError, Result};
pub use validation::{global_error, global_protocol_error, operator_errors, validate_servers};
