//! Contrato Core Library
//!
//! This crate provides the domain models, error types, configuration, file
//! validation and transport traits shared by every contrato component.

pub mod config;
pub mod error;
pub mod models;
pub mod transport;
pub mod validation;

// Re-export commonly used types
pub use config::{AnalysisConfig, ClientConfig, GraphqlConfig, StorageConfig};
pub use error::{
    ErrorMetadata, LogLevel, SchemaError, Service, TransportError, ValidationError, WorkflowError,
};
pub use models::{
    ActionItem, ActionStatus, ContractAnalysis, Phase, PhaseStatus, RunId, StorageReference,
    UploadedFile, WorkflowStatus,
};
pub use transport::{AnalysisTransport, UploadTransport};
pub use validation::FileValidator;
