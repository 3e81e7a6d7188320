//! Error types module
//!
//! Every way a workflow run can end badly is represented here. Validation
//! errors are raised before any network I/O, transport errors come back from
//! the remote services, and schema errors cover 2xx bodies that do not parse.
//! `WorkflowError` unifies them for the orchestrator and implements
//! `ErrorMetadata` so front ends can present them consistently.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

use crate::models::RunId;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for remote failures the user can act on
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for user-facing error reporting.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether resubmitting the same file may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// Message shown next to the failing step
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Remote collaborator a transport talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Storage,
    Analysis,
    Graphql,
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Service::Storage => write!(f, "storage service"),
            Service::Analysis => write!(f, "analysis service"),
            Service::Graphql => write!(f, "GraphQL API"),
        }
    }
}

/// File intake errors. Raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported file type: {content_type} (allowed: {allowed:?})")]
    UnsupportedType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

/// A 2xx response whose body does not match the expected schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unexpected response from {service}: {reason}")]
pub struct SchemaError {
    pub service: Service,
    pub reason: String,
}

/// Failure of a single remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Non-2xx response. `server_message` holds the body's detail field when present.
    #[error(
        "{service} returned HTTP {status}: {}",
        .server_message.as_deref().unwrap_or("no detail")
    )]
    Status {
        service: Service,
        status: u16,
        server_message: Option<String>,
    },

    /// 2xx response that reports an application-level failure (GraphQL `errors`).
    #[error("{service} rejected the request: {message}")]
    Rejected { service: Service, message: String },

    /// The service could not be reached at all (connection refused, DNS).
    #[error("{service} is unreachable: {reason}")]
    Unreachable { service: Service, reason: String },

    /// Any other network-level failure (timeout, reset, body read).
    #[error("{service} request failed: {reason}")]
    Network { service: Service, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl TransportError {
    pub fn service(&self) -> Service {
        match self {
            TransportError::Status { service, .. }
            | TransportError::Rejected { service, .. }
            | TransportError::Unreachable { service, .. }
            | TransportError::Network { service, .. } => *service,
            TransportError::Schema(err) => err.service,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message surfaced to the user: the server's own words when it gave
    /// any, otherwise `HTTP {status}`.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Status {
                server_message: Some(message),
                ..
            } => message.clone(),
            TransportError::Status { status, .. } => format!("HTTP {}", status),
            TransportError::Rejected { message, .. } => message.clone(),
            TransportError::Unreachable { service, .. } => {
                format!("Could not reach the {}. Ensure the backend is running.", service)
            }
            TransportError::Network { reason, .. } => reason.clone(),
            TransportError::Schema(err) => err.to_string(),
        }
    }
}

/// Terminal error of a workflow run, or a refused command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Workflow is {0}; reset before submitting another file")]
    Busy(crate::models::WorkflowStatus),

    #[error("Run {0} was superseded by a reset")]
    Superseded(RunId),
}

impl From<SchemaError> for WorkflowError {
    fn from(err: SchemaError) -> Self {
        WorkflowError::Transport(TransportError::Schema(err))
    }
}

impl ErrorMetadata for WorkflowError {
    fn error_code(&self) -> &'static str {
        match self {
            WorkflowError::Validation(_) => "VALIDATION_ERROR",
            WorkflowError::Transport(TransportError::Schema(_)) => "SCHEMA_ERROR",
            WorkflowError::Transport(TransportError::Unreachable { .. }) => "SERVICE_UNREACHABLE",
            WorkflowError::Transport(_) => "TRANSPORT_ERROR",
            WorkflowError::Busy(_) => "WORKFLOW_BUSY",
            WorkflowError::Superseded(_) => "RUN_SUPERSEDED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            WorkflowError::Validation(_) => false,
            WorkflowError::Transport(TransportError::Schema(_)) => false,
            WorkflowError::Transport(TransportError::Status { status, .. }) => *status >= 500,
            WorkflowError::Transport(_) => true,
            WorkflowError::Busy(_) | WorkflowError::Superseded(_) => true,
        }
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            WorkflowError::Validation(ValidationError::UnsupportedType { .. }) => {
                Some("Select a PDF contract")
            }
            WorkflowError::Validation(ValidationError::FileTooLarge { .. }) => {
                Some("Reduce the file size and try again")
            }
            WorkflowError::Validation(_) => Some("Select a different file"),
            WorkflowError::Transport(TransportError::Unreachable { .. }) => {
                Some("Ensure the backend is running, then resubmit")
            }
            WorkflowError::Transport(_) => Some("Resubmit the file"),
            WorkflowError::Busy(_) => Some("Wait for the current run or reset it"),
            WorkflowError::Superseded(_) => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            WorkflowError::Validation(ValidationError::UnsupportedType { .. }) => {
                "Only PDF files are accepted.".to_string()
            }
            WorkflowError::Validation(err) => err.to_string(),
            WorkflowError::Transport(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            WorkflowError::Validation(_) | WorkflowError::Busy(_) => LogLevel::Debug,
            WorkflowError::Superseded(_) => LogLevel::Debug,
            WorkflowError::Transport(TransportError::Schema(_)) => LogLevel::Error,
            WorkflowError::Transport(_) => LogLevel::Warn,
        }
    }
}
