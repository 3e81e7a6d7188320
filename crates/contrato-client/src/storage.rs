//! Cloudinary-style unsigned upload of contract files.

use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use contrato_core::{
    ClientConfig, SchemaError, Service, StorageConfig, StorageReference, TransportError,
    UploadTransport, UploadedFile,
};
use reqwest::multipart::Form;
use reqwest::Client;

use crate::response::{read_json, request_error};
use crate::{build_http_client, file_part};

/// Uploads files as multipart form data and returns the public `secure_url`.
#[derive(Clone, Debug)]
pub struct CloudinaryUploader {
    client: Client,
    config: StorageConfig,
}

impl CloudinaryUploader {
    /// Fails when the Cloudinary cloud name and upload preset are not configured.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let storage = config.require_storage()?.clone();
        Ok(Self::with_client(build_http_client(config)?, storage))
    }

    pub fn with_client(client: Client, config: StorageConfig) -> Self {
        Self { client, config }
    }

    pub fn upload_url(&self) -> String {
        self.config.upload_url()
    }
}

#[async_trait]
impl UploadTransport for CloudinaryUploader {
    async fn upload(&self, file: &UploadedFile) -> Result<StorageReference, TransportError> {
        let start = Instant::now();
        let form = Form::new()
            .part("file", file_part(Service::Storage, file)?)
            .text("upload_preset", self.config.upload_preset.clone());

        tracing::debug!(file = %file.name(), bytes = file.len(), "Uploading contract to storage");

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| request_error(Service::Storage, e))?;

        let reference: StorageReference = read_json(Service::Storage, response).await?;
        if reference.secure_url.trim().is_empty() {
            return Err(SchemaError {
                service: Service::Storage,
                reason: "empty secure_url".to_string(),
            }
            .into());
        }

        tracing::info!(
            file = %file.name(),
            url = %reference.secure_url,
            duration_ms = start.elapsed().as_millis(),
            "Contract stored"
        );
        Ok(reference)
    }
}
