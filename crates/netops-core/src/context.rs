//! Process-wide conditions snapshot.
//!
//! The snapshot returned by the conditions authority is the single source of
//! truth for every operator's acceptance state. It is replaced as a whole,
//! never patched, and only by a completed acceptance transaction.

use std::sync::Arc;

use arc_swap::ArcSwap;
use netops_shared::ServerOperatorConditions;

/// Shared holder of the latest [`ServerOperatorConditions`].
///
/// Reads are lock-free; every editing session holds an `Arc` to the same
/// context.
#[derive(Debug)]
pub struct ConditionsContext {
    snapshot: ArcSwap<ServerOperatorConditions>,
}

impl ConditionsContext {
    pub fn new(initial: ServerOperatorConditions) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(initial),
        }
    }

    /// Current snapshot. Later replacements do not affect the returned value.
    pub fn load(&self) -> Arc<ServerOperatorConditions> {
        self.snapshot.load_full()
    }

    /// Swap in a new snapshot, returning the previous one.
    pub(crate) fn replace(&self, next: ServerOperatorConditions) -> Arc<ServerOperatorConditions> {
        self.snapshot.swap(Arc::new(next))
    }
}
