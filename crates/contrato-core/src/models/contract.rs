//! Contract records served by the GraphQL read API.

use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum ContractStatus {
        Active => "active",
        Completed => "completed",
        AtRisk => "at-risk" | "atrisk",
    }
}

wire_enum! {
    pub enum ContractType {
        Perforacion => "perforacion" | "perforación",
        Construccion => "construccion" | "construcción",
        Mantenimiento => "mantenimiento",
        Refineria => "refineria" | "refinería",
    }
}

wire_enum! {
    /// Lifecycle stage of a contract (not to be confused with an analysis phase).
    pub enum LifecyclePhase {
        Inicio => "inicio",
        Ejecucion => "ejecucion" | "ejecución",
        Cierre => "cierre",
    }
}

wire_enum! {
    pub enum RiskLevel {
        Bajo => "bajo",
        Medio => "medio",
        Alto => "alto",
    }
}

wire_enum! {
    pub enum MilestoneStatus {
        Completed => "completed",
        InProgress => "in-progress",
        Pending => "pending",
        Delayed => "delayed",
    }
}

wire_enum! {
    pub enum MemberStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

wire_enum! {
    pub enum DocumentKind {
        Contrato => "contrato",
        Tecnico => "tecnico" | "técnico",
        Legal => "legal",
        Financiero => "financiero",
    }
}

wire_enum! {
    pub enum DocumentStatus {
        Approved => "approved",
        Pending => "pending",
        Review => "review",
    }
}

/// Fields returned by the contract list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub id: String,
    pub title: String,
    pub client: String,
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    pub status: ContractStatus,
    /// Percentage, 0-100.
    pub progress: u8,
    /// Formatted amount, e.g. `"$12.5M"`.
    pub value: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub name: String,
    pub phase: LifecyclePhase,
    pub due_date: String,
    pub status: MilestoneStatus,
    pub value: String,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub status: MemberStatus,
}

/// Join row of `contract_team_members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub user: TeamMember,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDocument {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub upload_date: String,
    pub uploaded_by: String,
    pub size: String,
    pub status: DocumentStatus,
}

/// Fields returned by the contract detail query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDetail {
    #[serde(flatten)]
    pub summary: ContractSummary,
    pub phase: LifecyclePhase,
    /// Health score, 0-100.
    pub health: u8,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub contract_team_members: Vec<TeamMembership>,
    #[serde(default)]
    pub documents: Vec<ContractDocument>,
}

impl ContractDetail {
    pub fn team(&self) -> impl Iterator<Item = &TeamMember> {
        self.contract_team_members.iter().map(|m| &m.user)
    }

    /// `(completed, total)` milestone counts.
    pub fn milestone_progress(&self) -> (usize, usize) {
        let completed = self
            .milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Completed)
            .count();
        (completed, self.milestones.len())
    }

    /// First milestone in list order that is not completed yet.
    pub fn next_milestone(&self) -> Option<&Milestone> {
        self.milestones
            .iter()
            .find(|m| m.status != MilestoneStatus::Completed)
    }

    pub fn pending_documents(&self) -> impl Iterator<Item = &ContractDocument> {
        self.documents
            .iter()
            .filter(|d| d.status != DocumentStatus::Approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_json() -> &'static str {
        r#"{
            "id": "CTR-2024-001",
            "title": "Perforación Pozo Exploratorio Bloque 15",
            "client": "PetroAndina S.A.",
            "type": "perforacion",
            "status": "active",
            "progress": 65,
            "value": "$12.5M",
            "start_date": "15 Ene 2026",
            "end_date": "30 Jun 2026",
            "location": "Bloque 15 - Cuenca Oriente",
            "phase": "ejecucion",
            "health": 92,
            "risk_level": "bajo",
            "pdf_url": null,
            "milestones": [
                {"id": "M1", "name": "Movilización de Equipo", "phase": "inicio",
                 "due_date": "20 Ene 2026", "status": "completed", "value": "10%",
                 "deliverables": ["Acta de movilización"]},
                {"id": "M2", "name": "Perforación Sección Superficial", "phase": "ejecucion",
                 "due_date": "15 Mar 2026", "status": "in-progress", "value": "25%"}
            ],
            "contract_team_members": [
                {"user": {"id": "1", "name": "Ing. Carlos Mendoza", "role": "Project Manager",
                          "email": "cmendoza@company.com", "status": "active"}}
            ],
            "documents": [
                {"id": "D1", "name": "Contrato Principal.pdf", "type": "contrato",
                 "upload_date": "10 Ene 2026", "uploaded_by": "Admin", "size": "2.4 MB",
                 "status": "approved"},
                {"id": "D2", "name": "Plan HSE.pdf", "type": "tecnico",
                 "upload_date": "12 Ene 2026", "uploaded_by": "R. Silva", "size": "1.1 MB",
                 "status": "review"}
            ]
        }"#
    }

    #[test]
    fn parses_contract_detail() {
        let detail: ContractDetail = serde_json::from_str(detail_json()).unwrap();
        assert_eq!(detail.summary.id, "CTR-2024-001");
        assert_eq!(detail.summary.contract_type, ContractType::Perforacion);
        assert_eq!(detail.phase, LifecyclePhase::Ejecucion);
        assert_eq!(detail.risk_level, RiskLevel::Bajo);
        assert_eq!(detail.team().count(), 1);
        assert!(detail.milestones[1].deliverables.is_empty());
    }

    #[test]
    fn milestone_helpers() {
        let detail: ContractDetail = serde_json::from_str(detail_json()).unwrap();
        assert_eq!(detail.milestone_progress(), (1, 2));
        assert_eq!(detail.next_milestone().map(|m| m.id.as_str()), Some("M2"));
        let pending: Vec<_> = detail.pending_documents().map(|d| d.id.as_str()).collect();
        assert_eq!(pending, vec!["D2"]);
    }

    #[test]
    fn contract_status_accepts_aliases() {
        assert_eq!("at-risk".parse::<ContractStatus>().unwrap(), ContractStatus::AtRisk);
        assert_eq!("AT_RISK".parse::<ContractStatus>().unwrap(), ContractStatus::AtRisk);
        assert_eq!(ContractStatus::AtRisk.to_string(), "at-risk");
        assert!("archived".parse::<ContractStatus>().is_err());
    }

    #[test]
    fn accented_spellings_parse() {
        assert_eq!(
            "construcción".parse::<ContractType>().unwrap(),
            ContractType::Construccion
        );
        assert_eq!(
            "Ejecución".parse::<LifecyclePhase>().unwrap(),
            LifecyclePhase::Ejecucion
        );
    }
}
