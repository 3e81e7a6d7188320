//! Client for the contract analysis service.
//!
//! `analyze` implements [`AnalysisTransport`]. The service also exposes a
//! milestone check that advances an action when the submitted evidence meets
//! its criteria, plus two status endpoints.

use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use contrato_core::models::{
    AgentStatus, MilestoneCheckRequest, MilestoneCheckResponse, ServiceStatus,
};
use contrato_core::{
    AnalysisTransport, ClientConfig, ContractAnalysis, Service, TransportError, UploadedFile,
};
use reqwest::multipart::Form;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::response::{read_json, request_error};
use crate::{build_http_client, file_part};

#[derive(Clone, Debug)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(
            build_http_client(config)?,
            config.analysis.base_url.clone(),
        ))
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let response = self
            .client
            .get(self.build_url(path))
            .send()
            .await
            .map_err(|e| request_error(Service::Analysis, e))?;
        read_json(Service::Analysis, response).await
    }

    /// Ask the service whether `evidence_text` satisfies the criteria of `action_id`.
    pub async fn check_milestone(
        &self,
        contract: &ContractAnalysis,
        action_id: &str,
        evidence_text: &str,
    ) -> Result<MilestoneCheckResponse, TransportError> {
        let request = MilestoneCheckRequest {
            contract: contract.clone(),
            action_id: action_id.to_string(),
            evidence_text: evidence_text.to_string(),
        };

        let response = self
            .client
            .post(self.build_url("/check-milestone"))
            .json(&request)
            .send()
            .await
            .map_err(|e| request_error(Service::Analysis, e))?;

        let result: MilestoneCheckResponse = read_json(Service::Analysis, response).await?;
        tracing::info!(
            contract_id = %contract.contract_id,
            action_id = %action_id,
            status = %result.status,
            "Milestone check completed"
        );
        Ok(result)
    }

    /// `GET /`
    pub async fn service_status(&self) -> Result<ServiceStatus, TransportError> {
        self.get("/").await
    }

    /// `GET /agent-status`
    pub async fn agent_status(&self) -> Result<AgentStatus, TransportError> {
        self.get("/agent-status").await
    }
}

#[async_trait]
impl AnalysisTransport for AnalysisClient {
    async fn analyze(&self, file: &UploadedFile) -> Result<ContractAnalysis, TransportError> {
        let start = Instant::now();
        let form = Form::new().part("file", file_part(Service::Analysis, file)?);

        tracing::debug!(
            file = %file.name(),
            bytes = file.len(),
            "Submitting contract for analysis"
        );

        let response = self
            .client
            .post(self.build_url("/analyze-contract"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| request_error(Service::Analysis, e))?;

        let analysis: ContractAnalysis = read_json(Service::Analysis, response).await?;

        tracing::info!(
            file = %file.name(),
            contract_id = %analysis.contract_id,
            phases = analysis.phases.len(),
            actions = analysis.action_count(),
            duration_ms = start.elapsed().as_millis(),
            "Contract analysis received"
        );
        Ok(analysis)
    }
}
