//! Read-only client for the hosted GraphQL contract API.

use anyhow::Result;
use contrato_core::models::{ContractDetail, ContractSummary, TeamMember};
use contrato_core::{ClientConfig, GraphqlConfig, SchemaError, Service, TransportError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::build_http_client;
use crate::response::{read_json, request_error};

pub const GET_CONTRACTS: &str = r#"
  query GetContracts {
    contracts {
      id
      title
      client
      type
      status
      progress
      value
      location
      start_date
      end_date
      pdf_url
    }
  }
"#;

pub const GET_CONTRACT_DETAIL: &str = r#"
  query GetContractDetail($id: String!) {
    contracts(where: { id: { _eq: $id } }) {
      id
      title
      client
      type
      status
      progress
      value
      start_date
      end_date
      location
      phase
      health
      risk_level
      pdf_url
      milestones {
        id
        name
        phase
        due_date
        status
        value
        deliverables
      }
      contract_team_members {
        user {
          id
          name
          role
          email
          status
        }
      }
      documents {
        id
        name
        type
        upload_date
        uploaded_by
        size
        status
      }
    }
  }
"#;

pub const GET_USERS: &str = r#"
  query GetUsers {
    users {
      id
      name
      role
      email
      status
    }
  }
"#;

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ContractsData<T> {
    contracts: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct UsersData {
    users: Vec<TeamMember>,
}

#[derive(Clone, Debug)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
    admin_secret: Option<String>,
}

impl GraphqlClient {
    /// Fails when `GRAPHQL_ENDPOINT` is not configured.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let graphql = config.require_graphql()?;
        Ok(Self::with_client(build_http_client(config)?, graphql))
    }

    pub fn with_client(client: Client, config: &GraphqlConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            admin_secret: config.admin_secret.clone(),
        }
    }

    /// Run a query and return its `data` object.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, TransportError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(secret) = &self.admin_secret {
            request = request.header("x-hasura-admin-secret", secret.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| request_error(Service::Graphql, e))?;

        let body: GraphqlResponse<T> = read_json(Service::Graphql, response).await?;
        if let Some(first) = body.errors.into_iter().next() {
            return Err(TransportError::Rejected {
                service: Service::Graphql,
                message: first.message,
            });
        }

        body.data.ok_or_else(|| {
            SchemaError {
                service: Service::Graphql,
                reason: "response has neither data nor errors".to_string(),
            }
            .into()
        })
    }

    pub async fn list_contracts(&self) -> Result<Vec<ContractSummary>, TransportError> {
        let data: ContractsData<ContractSummary> = self.query(GET_CONTRACTS, json!({})).await?;
        tracing::debug!(count = data.contracts.len(), "Fetched contracts");
        Ok(data.contracts)
    }

    /// `None` when no contract has the given id.
    pub async fn get_contract(&self, id: &str) -> Result<Option<ContractDetail>, TransportError> {
        let data: ContractsData<ContractDetail> = self
            .query(GET_CONTRACT_DETAIL, json!({ "id": id }))
            .await?;
        Ok(data.contracts.into_iter().next())
    }

    pub async fn list_users(&self) -> Result<Vec<TeamMember>, TransportError> {
        let data: UsersData = self.query(GET_USERS, json!({})).await?;
        Ok(data.users)
    }
}
