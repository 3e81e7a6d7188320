//! Plain-text tables for terminal output.

use contrato_core::models::{ContractDetail, ContractSummary, TeamMember};
use contrato_services::{format_contract_value, ActionDetail, PortfolioStats, ResultBoard};

use crate::truncate_string;

/// One block per phase column, actions listed with their board position.
pub fn render_board(board: &ResultBoard) -> String {
    let analysis = board.analysis();
    let (completed, total) = board.completion();

    let mut lines = vec![
        format!("=== {} ({}) ===", analysis.title, analysis.contract_id),
        analysis.summary.clone(),
    ];
    if !analysis.parties.is_empty() {
        lines.push(format!("Parties: {}", analysis.parties.join(", ")));
    }
    lines.push(format!("Actions completed: {}/{}", completed, total));

    for column in board.columns() {
        lines.push(String::new());
        lines.push(format!(
            "--- {}. {} [{}] ({} actions) ---",
            column.index + 1,
            column.name,
            column.status,
            column.action_count()
        ));
        if !column.description.is_empty() {
            lines.push(format!("    {}", truncate_string(&column.description, 76)));
        }
        if column.actions.is_empty() {
            lines.push("    (no actions)".to_string());
        }
        for card in &column.actions {
            lines.push(format!(
                "  [{}.{}] {:<12} {:<12} {}",
                card.at.phase + 1,
                card.at.action + 1,
                truncate_string(&card.id, 12),
                card.status,
                truncate_string(&card.description, 50)
            ));
        }
    }

    lines.join("\n")
}

pub fn render_action_detail(detail: &ActionDetail) -> String {
    let mut lines = vec![
        format!("{} ({})", detail.id, detail.status),
        detail.description.clone(),
        String::new(),
        format!("Criteria: {}", detail.criteria),
        format!("Insight:  {}", detail.insight),
        format!("Citation: {}", detail.citation),
    ];
    if !detail.deliverables.is_empty() {
        lines.push("Deliverables:".to_string());
        lines.extend(detail.deliverables.iter().map(|d| format!("  - {}", d)));
    }
    lines.join("\n")
}

pub fn render_contracts(contracts: &[ContractSummary]) -> String {
    if contracts.is_empty() {
        return "No contracts found.".to_string();
    }

    let mut lines = vec![format!(
        "{:<14} {:<40} {:<14} {:<10} {:>5} {:>10}",
        "ID", "TITLE", "TYPE", "STATUS", "PROG", "VALUE"
    )];
    for contract in contracts {
        lines.push(format!(
            "{:<14} {:<40} {:<14} {:<10} {:>4}% {:>10}",
            truncate_string(&contract.id, 14),
            truncate_string(&contract.title, 40),
            contract.contract_type,
            contract.status,
            contract.progress,
            contract.value
        ));
    }
    lines.join("\n")
}

pub fn render_contract_detail(detail: &ContractDetail) -> String {
    let summary = &detail.summary;
    let (done, total) = detail.milestone_progress();

    let mut lines = vec![
        format!("=== {} ({}) ===", summary.title, summary.id),
        format!("Client:   {}", summary.client),
        format!(
            "Type:     {}  Status: {}  Phase: {}",
            summary.contract_type, summary.status, detail.phase
        ),
        format!("Value:    {}  Progress: {}%", summary.value, summary.progress),
        format!("Period:   {} - {}", summary.start_date, summary.end_date),
        format!("Location: {}", summary.location),
        format!("Health:   {}/100  Risk: {}", detail.health, detail.risk_level),
        String::new(),
        format!("Milestones ({}/{} completed):", done, total),
    ];
    for milestone in &detail.milestones {
        lines.push(format!(
            "  {:<6} {:<40} {:<12} {:<12} {}",
            milestone.id,
            truncate_string(&milestone.name, 40),
            milestone.status,
            milestone.due_date,
            milestone.value
        ));
    }
    if let Some(next) = detail.next_milestone() {
        lines.push(format!("Next milestone: {} (due {})", next.name, next.due_date));
    }

    let team: Vec<&TeamMember> = detail.team().collect();
    if !team.is_empty() {
        lines.push(String::new());
        lines.push("Team:".to_string());
        lines.extend(team.iter().map(|m| format!("  {} - {}", m.name, m.role)));
    }

    let pending: Vec<_> = detail.pending_documents().collect();
    if !pending.is_empty() {
        lines.push(String::new());
        lines.push(format!("Documents awaiting approval: {}", pending.len()));
        lines.extend(pending.iter().map(|d| format!("  {} ({})", d.name, d.status)));
    }

    lines.join("\n")
}

pub fn render_users(users: &[TeamMember]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }
    let mut lines = vec![format!("{:<28} {:<24} {:<32} {}", "NAME", "ROLE", "EMAIL", "STATUS")];
    lines.extend(users.iter().map(|u| {
        format!(
            "{:<28} {:<24} {:<32} {}",
            truncate_string(&u.name, 28),
            truncate_string(&u.role, 24),
            truncate_string(&u.email, 32),
            u.status
        )
    }));
    lines.join("\n")
}

pub fn render_stats(stats: &PortfolioStats) -> String {
    let mut lines = vec![
        "=== Contract Portfolio ===".to_string(),
        String::new(),
        format!("Total contracts:  {}", stats.total),
        format!("Average progress: {:.1}%", stats.average_progress),
        format!("Total value:      {}", format_contract_value(stats.total_value)),
    ];
    if stats.unparsed_values > 0 {
        lines.push(format!("  ({} values could not be parsed)", stats.unparsed_values));
    }

    lines.push(String::new());
    lines.push("--- By Status ---".to_string());
    lines.extend(
        stats
            .by_status
            .iter()
            .map(|(status, count)| format!("{:<12} {:>6}", status, count)),
    );

    if !stats.by_type.is_empty() {
        lines.push(String::new());
        lines.push("--- By Type ---".to_string());
        lines.extend(
            stats
                .by_type
                .iter()
                .map(|(kind, count)| format!("{:<14} {:>4}", kind, count)),
        );
    }

    lines.join("\n")
}
