//! Portfolio statistics over the contract list.

use std::collections::BTreeMap;

use contrato_core::models::{ContractStatus, ContractSummary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    /// Mean progress in percent, 0 for an empty portfolio.
    pub average_progress: f64,
    /// Sum of every value that could be parsed.
    pub total_value: f64,
    /// Contracts whose value string could not be parsed.
    pub unparsed_values: usize,
}

impl PortfolioStats {
    pub fn from_contracts(contracts: &[ContractSummary]) -> Self {
        let mut by_status: BTreeMap<String, usize> = ContractStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let mut by_type = BTreeMap::new();
        let mut total_value = 0.0;
        let mut unparsed_values = 0;

        for contract in contracts {
            *by_status.entry(contract.status.to_string()).or_insert(0) += 1;
            *by_type.entry(contract.contract_type.to_string()).or_insert(0) += 1;
            match parse_contract_value(&contract.value) {
                Some(value) => total_value += value,
                None => unparsed_values += 1,
            }
        }

        let average_progress = if contracts.is_empty() {
            0.0
        } else {
            let sum: u64 = contracts.iter().map(|c| u64::from(c.progress)).sum();
            sum as f64 / contracts.len() as f64
        };

        Self {
            total: contracts.len(),
            by_status,
            by_type,
            average_progress,
            total_value,
            unparsed_values,
        }
    }

    pub fn count(&self, status: ContractStatus) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}

/// Parse a display amount such as `"$12.5M"`, `"$850K"` or `"1,200,000"`.
pub fn parse_contract_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let (number, multiplier) = match cleaned.chars().last()?.to_ascii_uppercase() {
        'K' => (&cleaned[..cleaned.len() - 1], 1e3),
        'M' => (&cleaned[..cleaned.len() - 1], 1e6),
        'B' => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value * multiplier)
}

/// Inverse of [`parse_contract_value`], one decimal place.
pub fn format_contract_value(value: f64) -> String {
    if value >= 1e9 {
        format!("${:.1}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("${:.1}K", value / 1e3)
    } else {
        format!("${:.0}", value)
    }
}
