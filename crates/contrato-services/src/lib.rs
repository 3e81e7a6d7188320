//! Contrato Services Layer
//!
//! Hosts the upload/analysis orchestration and the projections built on its
//! results (the phase board and portfolio statistics). Front ends depend on
//! this crate alone: it re-exports the domain types they need and wires the
//! HTTP transports from a validated [`ClientConfig`].

pub mod board;
pub mod stats;
pub mod workflow;

use std::sync::Arc;

use anyhow::Result;
use contrato_client::{AnalysisClient, CloudinaryUploader};

pub use board::{ActionCard, ActionDetail, ActionRef, ColumnAccent, PhaseColumn, ResultBoard};
pub use contrato_core::{
    ClientConfig, ContractAnalysis, ErrorMetadata, FileValidator, UploadedFile, WorkflowError,
    WorkflowStatus,
};
pub use stats::{format_contract_value, parse_contract_value, PortfolioStats};
pub use workflow::{ContractWorkflow, WorkflowSnapshot};

/// Build a workflow backed by the HTTP storage uploader and analysis client.
/// Fails when storage settings are missing.
pub fn http_workflow(config: &ClientConfig) -> Result<ContractWorkflow> {
    let uploader = CloudinaryUploader::new(config)?;
    let analyzer = AnalysisClient::new(config)?;
    tracing::debug!(
        upload_url = %uploader.upload_url(),
        analysis_url = %analyzer.base_url(),
        "Contract workflow transports ready"
    );
    Ok(ContractWorkflow::new(
        Arc::new(uploader),
        Arc::new(analyzer),
        FileValidator::from_config(config),
    ))
}
