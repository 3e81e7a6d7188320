//! Configuration module
//!
//! Endpoints and credentials for the storage service, the analysis service
//! and the GraphQL read API. Loaded once at startup, validated, then handed
//! to the transport constructors.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::models::PDF_CONTENT_TYPE;

const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";
const DEFAULT_ANALYSIS_SERVICE_URL: &str = "http://localhost:8000";
const HTTP_TIMEOUT_SECS: u64 = 120;
const MAX_CONTRACT_SIZE_MB: usize = 25;

/// Object storage (Cloudinary unsigned upload) settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub upload_preset: String,
}

impl StorageConfig {
    /// `auto` resource type so PDFs are accepted alongside images.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/auto/upload",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

/// Contract analysis service settings
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub base_url: String,
}

/// GraphQL read API settings
#[derive(Clone)]
pub struct GraphqlConfig {
    pub endpoint: String,
    pub admin_secret: Option<String>,
}

impl Debug for GraphqlConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GraphqlConfig")
            .field("endpoint", &self.endpoint)
            .field(
                "admin_secret",
                &self.admin_secret.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Absent when neither cloud name nor upload preset is configured.
    pub storage: Option<StorageConfig>,
    pub analysis: AnalysisConfig,
    pub graphql: Option<GraphqlConfig>,
    pub http_timeout_secs: u64,
    pub max_contract_size_bytes: usize,
    /// Also accept `text/plain` and `text/markdown` contracts.
    pub accept_text_documents: bool,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match (get("CLOUDINARY_CLOUD_NAME"), get("CLOUDINARY_UPLOAD_PRESET")) {
            (None, None) => None,
            (Some(cloud_name), Some(upload_preset)) => Some(StorageConfig {
                base_url: get("CLOUDINARY_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CLOUDINARY_BASE_URL.to_string()),
                cloud_name,
                upload_preset,
            }),
            (None, Some(_)) => return Err(anyhow::anyhow!("CLOUDINARY_CLOUD_NAME must be set")),
            (Some(_), None) => return Err(anyhow::anyhow!("CLOUDINARY_UPLOAD_PRESET must be set")),
        };

        let analysis = AnalysisConfig {
            base_url: get("ANALYSIS_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_ANALYSIS_SERVICE_URL.to_string()),
        };

        let graphql = get("GRAPHQL_ENDPOINT").map(|endpoint| GraphqlConfig {
            endpoint,
            admin_secret: get("GRAPHQL_ADMIN_SECRET"),
        });

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a valid number"))?,
            None => HTTP_TIMEOUT_SECS,
        };

        let max_contract_size_mb = match get("MAX_CONTRACT_SIZE_MB") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_CONTRACT_SIZE_MB must be a valid number"))?,
            None => MAX_CONTRACT_SIZE_MB,
        };

        let accept_text_documents = get("CONTRATO_ACCEPT_TEXT")
            .map(|v| v.trim().to_lowercase())
            .map(|v| v == "true" || v == "1" || v == "yes")
            .unwrap_or(false);

        let config = ClientConfig {
            storage,
            analysis,
            graphql,
            http_timeout_secs,
            max_contract_size_bytes: max_contract_size_mb * 1024 * 1024,
            accept_text_documents,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        validate_http_url("ANALYSIS_SERVICE_URL", &self.analysis.base_url)?;
        if let Some(graphql) = &self.graphql {
            validate_http_url("GRAPHQL_ENDPOINT", &graphql.endpoint)?;
        }

        if let Some(storage) = &self.storage {
            validate_http_url("CLOUDINARY_BASE_URL", &storage.base_url)?;
            if storage.cloud_name.contains('/') {
                return Err(anyhow::anyhow!(
                    "CLOUDINARY_CLOUD_NAME must not contain '/'"
                ));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        if self.max_contract_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONTRACT_SIZE_MB must be greater than 0"
            ));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn accepted_content_types(&self) -> Vec<String> {
        let mut types = vec![PDF_CONTENT_TYPE.to_string()];
        if self.accept_text_documents {
            types.push("text/plain".to_string());
            types.push("text/markdown".to_string());
        }
        types
    }

    /// Storage settings, or an error naming the missing variables.
    pub fn require_storage(&self) -> Result<&StorageConfig, anyhow::Error> {
        self.storage.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "CLOUDINARY_CLOUD_NAME and CLOUDINARY_UPLOAD_PRESET must be set for uploads"
            )
        })
    }

    /// GraphQL settings, or an error naming the missing variable.
    pub fn require_graphql(&self) -> Result<&GraphqlConfig, anyhow::Error> {
        self.graphql
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("GRAPHQL_ENDPOINT must be set for contract queries"))
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<(), anyhow::Error> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(anyhow::anyhow!(
            "{} must be an http(s) URL, got '{}'",
            name,
            value
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_UPLOAD_PRESET", "contracts"),
        ]
    }

    #[test]
    fn defaults_apply() {
        let config = ClientConfig::from_lookup(lookup(&required())).unwrap();
        assert_eq!(
            config.require_storage().unwrap().base_url,
            DEFAULT_CLOUDINARY_BASE_URL
        );
        assert_eq!(config.analysis.base_url, DEFAULT_ANALYSIS_SERVICE_URL);
        assert!(config.graphql.is_none());
        assert_eq!(config.http_timeout(), Duration::from_secs(HTTP_TIMEOUT_SECS));
        assert_eq!(config.max_contract_size_bytes, 25 * 1024 * 1024);
        assert_eq!(config.accepted_content_types(), vec!["application/pdf"]);
    }

    #[test]
    fn upload_url_uses_auto_resource_type() {
        let mut pairs = required();
        pairs.push(("CLOUDINARY_BASE_URL", "http://127.0.0.1:9000/"));
        let config = ClientConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            config.require_storage().unwrap().upload_url(),
            "http://127.0.0.1:9000/v1_1/demo/auto/upload"
        );
    }

    #[test]
    fn missing_cloud_name_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[("CLOUDINARY_UPLOAD_PRESET", "p")]))
            .unwrap_err();
        assert!(err.to_string().contains("CLOUDINARY_CLOUD_NAME"));
    }

    #[test]
    fn graphql_only_environment_loads_without_storage() {
        let config = ClientConfig::from_lookup(lookup(&[(
            "GRAPHQL_ENDPOINT",
            "https://example.hasura.app/v1/graphql",
        )]))
        .unwrap();

        assert!(config.storage.is_none());
        assert!(config.require_graphql().is_ok());
        let err = config.require_storage().unwrap_err();
        assert!(err.to_string().contains("CLOUDINARY_UPLOAD_PRESET"));
    }

    #[test]
    fn storage_base_url_is_only_checked_when_storage_is_configured() {
        let config =
            ClientConfig::from_lookup(lookup(&[("CLOUDINARY_BASE_URL", "not-a-url")])).unwrap();
        assert!(config.storage.is_none());

        let mut pairs = required();
        pairs.push(("CLOUDINARY_BASE_URL", "not-a-url"));
        let err = ClientConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("CLOUDINARY_BASE_URL"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let mut pairs = required();
        pairs.push(("ANALYSIS_SERVICE_URL", "  "));
        let config = ClientConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.analysis.base_url, DEFAULT_ANALYSIS_SERVICE_URL);
    }

    #[test]
    fn rejects_non_http_urls() {
        let mut pairs = required();
        pairs.push(("ANALYSIS_SERVICE_URL", "localhost:8000"));
        let err = ClientConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("ANALYSIS_SERVICE_URL"));
    }

    #[test]
    fn rejects_zero_timeout_and_bad_numbers() {
        let mut pairs = required();
        pairs.push(("HTTP_TIMEOUT_SECS", "0"));
        assert!(ClientConfig::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = required();
        pairs.push(("MAX_CONTRACT_SIZE_MB", "lots"));
        assert!(ClientConfig::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn text_documents_opt_in() {
        let mut pairs = required();
        pairs.push(("CONTRATO_ACCEPT_TEXT", "TRUE"));
        let config = ClientConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            config.accepted_content_types(),
            vec!["application/pdf", "text/plain", "text/markdown"]
        );
    }

    #[test]
    fn graphql_secret_is_redacted_in_debug() {
        let mut pairs = required();
        pairs.push(("GRAPHQL_ENDPOINT", "https://example.hasura.app/v1/graphql"));
        pairs.push(("GRAPHQL_ADMIN_SECRET", "super-secret"));
        let config = ClientConfig::from_lookup(lookup(&pairs)).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[redacted]"));
        assert!(config.require_graphql().is_ok());
    }
}
