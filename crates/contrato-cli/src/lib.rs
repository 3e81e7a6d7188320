//! Shared helpers for the `contrato` binary: tracing setup, file loading and
//! plain-text rendering.

pub mod render;

use std::path::Path;

use anyhow::{Context, Result};
use contrato_core::{ContractAnalysis, UploadedFile};

/// Initialize tracing for CLI binaries. Events go to stderr so that JSON
/// output on stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Read a contract file from disk; the MIME type is derived from its extension.
pub fn load_contract(path: &Path) -> Result<UploadedFile> {
    UploadedFile::from_path(path)
}

/// Read a previously saved analysis (the JSON printed by `analyze --json`).
pub fn load_analysis(path: &Path) -> Result<ContractAnalysis> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a contract analysis", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_exact() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
        assert_eq!(truncate_string("hello", 0), "...");
    }

    #[test]
    fn truncate_string_counts_characters() {
        assert_eq!(truncate_string("Perforación", 11), "Perforación");
        assert_eq!(truncate_string("Perforación Pozo", 10), "Perfora...");
    }

    #[test]
    fn load_contract_detects_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let file = load_contract(&path).unwrap();
        assert_eq!(file.name(), "contract.pdf");
        assert_eq!(file.mime_type(), "application/pdf");
        assert_eq!(file.len(), 8);
    }

    #[test]
    fn load_analysis_round_trips_saved_json() {
        let mut saved = tempfile::NamedTempFile::new().unwrap();
        write!(
            saved,
            r#"{{"contract_id": "C1", "title": "T", "summary": "S", "parties": [], "phases": []}}"#
        )
        .unwrap();

        let analysis = load_analysis(saved.path()).unwrap();
        assert_eq!(analysis.contract_id, "C1");
    }

    #[test]
    fn load_analysis_rejects_other_json() {
        let mut saved = tempfile::NamedTempFile::new().unwrap();
        write!(saved, r#"{{"status": "ok"}}"#).unwrap();
        assert!(load_analysis(saved.path()).is_err());
    }
}
