//! Transport abstraction traits
//!
//! The orchestrator only sees these two seams. HTTP implementations live in
//! `contrato-client`; tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::models::{ContractAnalysis, StorageReference, UploadedFile};

/// Durable object storage for uploaded contracts.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Store the file and return its public reference.
    async fn upload(&self, file: &UploadedFile) -> Result<StorageReference, TransportError>;
}

/// Contract analysis service. Treated as a black box.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Submit the file bytes and return the structured breakdown.
    async fn analyze(&self, file: &UploadedFile) -> Result<ContractAnalysis, TransportError>;
}
