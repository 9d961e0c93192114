use crate::queue::OperationKind;
use std::time::Duration;

/// The modal shown after a commit. `kind` is `None` for quick clean, which
/// mixes both operations.
#[derive(Debug, Clone)]
pub struct ProcessingState {
    pub kind: Option<OperationKind>,
    pub entry_ids: Vec<String>,
    pub opened_at: Duration,
}

impl ProcessingState {
    pub fn is_expired(&self, now: Duration, ttl: Duration) -> bool {
        now.saturating_sub(self.opened_at) >= ttl
    }
}
