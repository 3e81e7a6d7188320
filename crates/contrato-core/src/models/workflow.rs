use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

wire_enum! {
    /// Discriminated status of the upload/analysis workflow.
    pub enum WorkflowStatus {
        Idle => "idle",
        Uploading => "uploading",
        Analyzing => "analyzing",
        Succeeded => "succeeded",
        Failed => "failed",
    }
}

impl WorkflowStatus {
    /// A network call is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowStatus::Uploading | WorkflowStatus::Analyzing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Succeeded | WorkflowStatus::Failed)
    }
}

impl Default for WorkflowStatus {
    fn default() -> Self {
        WorkflowStatus::Idle
    }
}

/// Token identifying one `submit`. Continuations holding a stale token are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_and_terminal_are_disjoint() {
        for status in WorkflowStatus::ALL {
            assert!(!(status.is_busy() && status.is_terminal()), "{}", status);
        }
        assert!(WorkflowStatus::Uploading.is_busy());
        assert!(WorkflowStatus::Failed.is_terminal());
        assert!(!WorkflowStatus::Idle.is_busy());
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
