//! Request/response shapes of the analysis service's auxiliary endpoints.

use serde::{Deserialize, Serialize};

use super::analysis::ContractAnalysis;

/// Body of `POST /check-milestone`: the current contract state, the action
/// being verified and free-text evidence.
#[derive(Debug, Clone, Serialize)]
pub struct MilestoneCheckRequest {
    pub contract: ContractAnalysis,
    pub action_id: String,
    pub evidence_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneCheckResponse {
    pub status: String,
    #[serde(default)]
    pub agent_response: Option<String>,
    /// Contract with the action (and possibly its phase) advanced.
    #[serde(default)]
    pub updated_contract: Option<ContractAnalysis>,
}

/// `GET /` health payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// `GET /agent-status` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub state: String,
    #[serde(default)]
    pub agents_active: u32,
}
