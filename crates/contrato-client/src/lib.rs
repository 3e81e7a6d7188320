//! HTTP transports for the contract workflow.
//!
//! Provides the storage uploader and analysis client that implement the
//! `contrato-core` transport traits, plus a read-only GraphQL client for
//! contract records. All of them share one reqwest client built from
//! [`ClientConfig`], so timeouts are configured in a single place.

pub mod analysis;
pub mod graphql;
pub mod response;
pub mod storage;

use anyhow::{Context, Result};
use contrato_core::{ClientConfig, Service, TransportError, UploadedFile};
use reqwest::multipart::Part;
use reqwest::Client;

/// Shared HTTP client with the configured request timeout.
pub fn build_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.http_timeout())
        .build()
        .context("Failed to create HTTP client")
}

/// Multipart `file` part carrying the original bytes, filename and MIME type.
pub(crate) fn file_part(service: Service, file: &UploadedFile) -> Result<Part, TransportError> {
    Part::bytes(file.content().to_vec())
        .file_name(file.name().to_string())
        .mime_str(file.mime_type())
        .map_err(|e| TransportError::Network {
            service,
            reason: format!("Invalid content type '{}': {}", file.mime_type(), e),
        })
}

pub use analysis::AnalysisClient;
pub use graphql::GraphqlClient;
pub use storage::CloudinaryUploader;
