//! Phase-by-phase board projected from a contract analysis.
//!
//! One column per phase, actions in source order, and at most one focused
//! action whose full detail (insight and citation) can be shown. Selection is
//! local state only; nothing here talks to the network.

use contrato_core::models::{ActionItem, ActionStatus, ContractAnalysis, PhaseStatus};
use serde::Serialize;

pub const NO_INSIGHT: &str = "No additional insight for this action.";
pub const NO_CITATION: &str = "No direct citation found.";

/// Position of an action on the board. Ids and descriptions are not unique,
/// so actions are addressed by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActionRef {
    pub phase: usize,
    pub action: usize,
}

impl ActionRef {
    pub fn new(phase: usize, action: usize) -> Self {
        Self { phase, action }
    }
}

/// Column colour, cycling through the palette by phase index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAccent {
    Blue,
    Purple,
    Cyan,
}

impl ColumnAccent {
    const PALETTE: [ColumnAccent; 3] =
        [ColumnAccent::Blue, ColumnAccent::Purple, ColumnAccent::Cyan];

    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionCard {
    pub at: ActionRef,
    pub id: String,
    pub description: String,
    pub status: ActionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseColumn {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub status: PhaseStatus,
    pub accent: ColumnAccent,
    pub actions: Vec<ActionCard>,
}

impl PhaseColumn {
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

/// Focused view of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDetail {
    pub at: ActionRef,
    pub id: String,
    pub description: String,
    pub criteria: String,
    pub status: ActionStatus,
    pub insight: String,
    pub citation: String,
    pub deliverables: Vec<String>,
}

impl ActionDetail {
    fn from_item(at: ActionRef, item: &ActionItem) -> Self {
        Self {
            at,
            id: item.id.clone(),
            description: item.description.clone(),
            criteria: item.criteria.clone(),
            status: item.status,
            insight: non_blank(item.insight.as_deref()).unwrap_or(NO_INSIGHT).to_string(),
            citation: non_blank(item.citation.as_deref()).unwrap_or(NO_CITATION).to_string(),
            deliverables: item.deliverables.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBoard {
    analysis: ContractAnalysis,
    columns: Vec<PhaseColumn>,
    selected: Option<ActionRef>,
}

impl ResultBoard {
    pub fn new(analysis: ContractAnalysis) -> Self {
        let columns = analysis
            .phases
            .iter()
            .enumerate()
            .map(|(index, phase)| PhaseColumn {
                index,
                name: phase.name.clone(),
                description: phase.description.clone(),
                status: phase.status,
                accent: ColumnAccent::for_index(index),
                actions: phase
                    .actions
                    .iter()
                    .enumerate()
                    .map(|(action_idx, item)| ActionCard {
                        at: ActionRef::new(index, action_idx),
                        id: item.id.clone(),
                        description: item.description.clone(),
                        status: item.status,
                    })
                    .collect(),
            })
            .collect();

        Self {
            analysis,
            columns,
            selected: None,
        }
    }

    pub fn analysis(&self) -> &ContractAnalysis {
        &self.analysis
    }

    pub fn into_analysis(self) -> ContractAnalysis {
        self.analysis
    }

    pub fn columns(&self) -> &[PhaseColumn] {
        &self.columns
    }

    pub fn total_actions(&self) -> usize {
        self.columns.iter().map(PhaseColumn::action_count).sum()
    }

    /// `(completed, total)` action counts.
    pub fn completion(&self) -> (usize, usize) {
        let completed = self
            .analysis
            .phases
            .iter()
            .map(|p| p.completed_actions())
            .sum();
        (completed, self.total_actions())
    }

    pub fn selection(&self) -> Option<ActionRef> {
        self.selected
    }

    /// Focus an action, replacing any previous selection. An out-of-range
    /// reference leaves the selection untouched and returns `None`.
    pub fn select(&mut self, at: ActionRef) -> Option<ActionDetail> {
        let item = self.analysis.action(at.phase, at.action)?;
        let detail = ActionDetail::from_item(at, item);
        self.selected = Some(at);
        Some(detail)
    }

    /// Focus the first action (in display order) carrying `id`.
    pub fn select_by_id(&mut self, id: &str) -> Option<ActionDetail> {
        let (phase, action) = self.analysis.find_action(id)?;
        self.select(ActionRef::new(phase, action))
    }

    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    pub fn detail(&self) -> Option<ActionDetail> {
        let at = self.selected?;
        let item = self.analysis.action(at.phase, at.action)?;
        Some(ActionDetail::from_item(at, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrato_core::models::Phase;

    fn action(id: &str, description: &str) -> ActionItem {
        ActionItem {
            id: id.to_string(),
            description: description.to_string(),
            criteria: format!("criteria for {}", id),
            status: ActionStatus::Pending,
            insight: None,
            citation: None,
            due_date: None,
            milestone_value: None,
            deliverables: Vec::new(),
            evidence: Vec::new(),
        }
    }

    fn phase(name: &str, actions: Vec<ActionItem>) -> Phase {
        Phase {
            name: name.to_string(),
            description: format!("{} description", name),
            status: PhaseStatus::Pending,
            actions,
        }
    }

    fn analysis() -> ContractAnalysis {
        let mut cited = action("M1-C2", "Submit HSE plan");
        cited.insight = Some("Required before mobilization".to_string());
        cited.citation = Some("Cláusula 7.2".to_string());
        cited.status = ActionStatus::Completed;

        let mut analysis: ContractAnalysis = serde_json::from_value(serde_json::json!({
            "contract_id": "C1",
            "title": "T",
            "summary": "S",
            "parties": ["A"],
            "phases": []
        }))
        .unwrap();
        analysis.phases = vec![
            phase("INICIO", vec![action("M1-C1", "Sign start act"), cited]),
            phase("EJECUCION", vec![action("M2-C1", "Drill"), action("M2-C1", "Drill")]),
            phase("CIERRE", vec![]),
            phase("POST", vec![action("M4-C1", "Archive")]),
        ];
        analysis
    }

    #[test]
    fn columns_follow_phase_order_and_cycle_accents() {
        let board = ResultBoard::new(analysis());
        let names: Vec<_> = board.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["INICIO", "EJECUCION", "CIERRE", "POST"]);

        let accents: Vec<_> = board.columns().iter().map(|c| c.accent).collect();
        assert_eq!(
            accents,
            vec![
                ColumnAccent::Blue,
                ColumnAccent::Purple,
                ColumnAccent::Cyan,
                ColumnAccent::Blue
            ]
        );
        assert_eq!(board.columns()[2].action_count(), 0);
        assert_eq!(board.total_actions(), 5);
        assert_eq!(board.completion(), (1, 5));
    }

    #[test]
    fn duplicate_actions_keep_their_positions() {
        let board = ResultBoard::new(analysis());
        let cards = &board.columns()[1].actions;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].at, ActionRef::new(1, 0));
        assert_eq!(cards[1].at, ActionRef::new(1, 1));
    }

    #[test]
    fn selecting_replaces_previous_selection() {
        let mut board = ResultBoard::new(analysis());
        let first = board.select(ActionRef::new(0, 0)).unwrap();
        assert_eq!(first.id, "M1-C1");
        assert_eq!(board.selection(), Some(ActionRef::new(0, 0)));

        let second = board.select(ActionRef::new(1, 1)).unwrap();
        assert_eq!(second.at, ActionRef::new(1, 1));
        assert_eq!(board.selection(), Some(ActionRef::new(1, 1)));
        assert_eq!(board.detail().unwrap().at, ActionRef::new(1, 1));
    }

    #[test]
    fn dismiss_clears_selection() {
        let mut board = ResultBoard::new(analysis());
        board.select(ActionRef::new(0, 1));
        board.dismiss();
        assert_eq!(board.selection(), None);
        assert!(board.detail().is_none());
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut board = ResultBoard::new(analysis());
        board.select(ActionRef::new(0, 0));
        assert!(board.select(ActionRef::new(2, 0)).is_none());
        assert!(board.select(ActionRef::new(9, 9)).is_none());
        assert_eq!(board.selection(), Some(ActionRef::new(0, 0)));
    }

    #[test]
    fn detail_uses_placeholders_when_annotations_missing() {
        let mut board = ResultBoard::new(analysis());
        let plain = board.select(ActionRef::new(0, 0)).unwrap();
        assert_eq!(plain.insight, NO_INSIGHT);
        assert_eq!(plain.citation, NO_CITATION);

        let cited = board.select_by_id("M1-C2").unwrap();
        assert_eq!(cited.insight, "Required before mobilization");
        assert_eq!(cited.citation, "Cláusula 7.2");
        assert_eq!(cited.status, ActionStatus::Completed);
    }

    #[test]
    fn select_by_id_picks_first_duplicate() {
        let mut board = ResultBoard::new(analysis());
        let detail = board.select_by_id("M2-C1").unwrap();
        assert_eq!(detail.at, ActionRef::new(1, 0));
        assert!(board.select_by_id("missing").is_none());
    }
}
