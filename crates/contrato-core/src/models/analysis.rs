use serde::{Deserialize, Serialize};

use super::contract::RiskLevel;

wire_enum! {
    /// Progress of a single detected action.
    pub enum ActionStatus {
        Pending => "pending",
        InProgress => "in-progress" | "inprogress" | "in progress",
        Completed => "completed",
        Delayed => "delayed",
    }
}

impl Default for ActionStatus {
    fn default() -> Self {
        ActionStatus::Pending
    }
}

wire_enum! {
    /// Progress of an analysis phase.
    pub enum PhaseStatus {
        Pending => "PENDING",
        Active => "ACTIVE",
        Completed => "COMPLETED",
    }
}

impl Default for PhaseStatus {
    fn default() -> Self {
        PhaseStatus::Pending
    }
}

/// Proof submitted against an action's completion criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub timestamp: String,
}

/// A single task detected in the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    pub description: String,
    /// Completion criteria used to verify the action.
    pub criteria: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    /// Contract clause that justifies the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Weight of the action within the contract, e.g. `"10%"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deliverables: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

/// Ordered group of actions. Display order is source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub status: PhaseStatus,
    pub actions: Vec<ActionItem>,
}

impl Phase {
    pub fn completed_actions(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.status == ActionStatus::Completed)
            .count()
    }
}

/// Structured breakdown returned by the analysis service.
///
/// Only `contract_id`, `title`, `summary`, `parties` and `phases` are
/// required. The remaining fields are enrichment the service may or may not
/// produce (ERP mapping, audit layer, portfolio metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAnalysis {
    pub contract_id: String,
    pub title: String,
    pub summary: String,
    pub parties: Vec<String>,
    pub phases: Vec<Phase>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_cost_center: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_material_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_purchasing_org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_summary: Option<String>,
    /// Always serialized, even when empty: the milestone check requires it.
    #[serde(default)]
    pub audit_insights: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(default = "default_contract_status")]
    pub status: String,
    /// Percentage, 0-100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

fn default_contract_status() -> String {
    "active".to_string()
}

impl ContractAnalysis {
    pub fn action_count(&self) -> usize {
        self.phases.iter().map(|p| p.actions.len()).sum()
    }

    /// Position `(phase, action)` of the first action with the given id.
    pub fn find_action(&self, id: &str) -> Option<(usize, usize)> {
        self.phases.iter().enumerate().find_map(|(phase_idx, phase)| {
            phase
                .actions
                .iter()
                .position(|a| a.id == id)
                .map(|action_idx| (phase_idx, action_idx))
        })
    }

    pub fn action(&self, phase: usize, action: usize) -> Option<&ActionItem> {
        self.phases.get(phase)?.actions.get(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "contract_id": "C1",
        "title": "T",
        "summary": "S",
        "parties": ["A", "B"],
        "phases": [
            {
                "name": "Fase 1",
                "description": "d",
                "actions": [
                    {"id": "a1", "description": "do X", "criteria": "c", "status": "pending"}
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_minimal_payload() {
        let analysis: ContractAnalysis = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(analysis.contract_id, "C1");
        assert_eq!(analysis.parties, vec!["A", "B"]);
        assert_eq!(analysis.phases.len(), 1);
        assert_eq!(analysis.phases[0].status, PhaseStatus::Pending);
        assert_eq!(analysis.phases[0].actions[0].status, ActionStatus::Pending);
        assert_eq!(analysis.action_count(), 1);
        assert!(analysis.risk_level.is_none());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let json = r#"{"contract_id": "C1", "title": "T", "summary": "S", "parties": []}"#;
        let err = serde_json::from_str::<ContractAnalysis>(json).unwrap_err();
        assert!(err.to_string().contains("phases"));
    }

    #[test]
    fn statuses_are_case_insensitive() {
        let json = r#"{"id": "a", "description": "d", "criteria": "c", "status": "COMPLETED"}"#;
        let action: ActionItem = serde_json::from_str(json).unwrap();
        assert_eq!(action.status, ActionStatus::Completed);

        assert_eq!("IN_PROGRESS".parse::<ActionStatus>().unwrap(), ActionStatus::InProgress);
        assert_eq!("active".parse::<PhaseStatus>().unwrap(), PhaseStatus::Active);
        assert!("finished".parse::<ActionStatus>().is_err());
    }

    #[test]
    fn unknown_status_is_a_parse_error() {
        let json = r#"{"id": "a", "description": "d", "criteria": "c", "status": "blocked"}"#;
        assert!(serde_json::from_str::<ActionItem>(json).is_err());
    }

    #[test]
    fn statuses_serialize_with_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&ActionStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&PhaseStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn find_action_returns_first_match_in_order() {
        let mut analysis: ContractAnalysis = serde_json::from_str(MINIMAL).unwrap();
        let mut second = analysis.phases[0].clone();
        second.name = "Fase 2".to_string();
        second.actions[0].id = "a2".to_string();
        analysis.phases.push(second);

        assert_eq!(analysis.find_action("a1"), Some((0, 0)));
        assert_eq!(analysis.find_action("a2"), Some((1, 0)));
        assert_eq!(analysis.find_action("zz"), None);
        assert_eq!(analysis.action(1, 0).map(|a| a.id.as_str()), Some("a2"));
        assert!(analysis.action(2, 0).is_none());
    }

    #[test]
    fn enrichment_fields_round_trip_from_service_payload() {
        let json = r#"{
            "contract_id": "CTR-9",
            "title": "Mantenimiento",
            "summary": "S",
            "parties": ["PetroAndina"],
            "phases": [],
            "type": "mantenimiento",
            "risk_level": "medio",
            "health": 87,
            "audit_insights": ["Falta proveedor"]
        }"#;
        let analysis: ContractAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.contract_type.as_deref(), Some("mantenimiento"));
        assert_eq!(analysis.risk_level, Some(RiskLevel::Medio));
        assert_eq!(analysis.health, Some(87));
        assert_eq!(analysis.audit_insights.len(), 1);

        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["type"], "mantenimiento");
        assert!(value.get("pdf_url").is_none());
    }

    #[test]
    fn full_service_payload_keeps_every_key() {
        let json = r#"{
            "contract_id": "CTR-2024-001",
            "title": "Perforación Pozo Exploratorio",
            "summary": "S",
            "thought_process": "ERP mapping from vendor master",
            "erp_vendor_id": "V-100",
            "erp_cost_center": "CC-7",
            "erp_material_group": "MG-1",
            "erp_purchasing_org": "PO-1",
            "parties": ["PetroAndina", "Perforaciones del Sur"],
            "phases": [
                {"name": "INICIO", "description": "d", "status": "ACTIVE", "actions": [
                    {"id": "M1-C1", "description": "Sign start act", "criteria": "Signed act"}
                ]}
            ],
            "current_phase": "INICIO",
            "audit_summary": "No findings",
            "audit_insights": [],
            "client": "PetroAndina S.A.",
            "type": "perforacion",
            "status": "at-risk",
            "progress": 35,
            "value": "$12.5M",
            "start_date": "15 Ene 2026",
            "end_date": "30 Jun 2026",
            "location": "Bloque 15",
            "health": 92,
            "risk_level": "bajo",
            "project_manager_id": "7",
            "pdf_url": "https://x/contract.pdf"
        }"#;
        let original: serde_json::Value = serde_json::from_str(json).unwrap();
        let analysis: ContractAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.status, "at-risk");
        assert_eq!(analysis.progress, 35);
        assert_eq!(analysis.project_manager_id.as_deref(), Some("7"));

        let value = serde_json::to_value(&analysis).unwrap();
        for key in original.as_object().unwrap().keys() {
            assert!(value.get(key).is_some(), "{} lost on serialization", key);
        }
        assert_eq!(value["audit_insights"], serde_json::json!([]));
        assert_eq!(value["status"], "at-risk");
        assert_eq!(value["progress"], 35);
        assert_eq!(value["project_manager_id"], "7");
    }

    #[test]
    fn portfolio_fields_default_when_absent() {
        let analysis: ContractAnalysis = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(analysis.status, "active");
        assert_eq!(analysis.progress, 0);
        assert!(analysis.project_manager_id.is_none());

        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["audit_insights"], serde_json::json!([]));
    }
}
