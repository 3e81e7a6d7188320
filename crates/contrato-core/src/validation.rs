//! Client-side file intake checks, run before any network call.

use crate::config::ClientConfig;
use crate::error::ValidationError;
use crate::models::{UploadedFile, PDF_CONTENT_TYPE};

/// Contract file validator
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl FileValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.to_lowercase())
                .collect(),
        }
    }

    /// Accept PDF only.
    pub fn pdf_only(max_file_size: usize) -> Self {
        Self::new(max_file_size, vec![PDF_CONTENT_TYPE.to_string()])
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.max_contract_size_bytes,
            config.accepted_content_types(),
        )
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }

    /// Validate declared content type. Parameters such as `; charset=utf-8` are ignored.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if !self.allowed_content_types.iter().any(|ct| ct == &essence) {
            return Err(ValidationError::UnsupportedType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn validate_filename(&self, filename: &str) -> Result<(), ValidationError> {
        if filename.trim().is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename == ".."
        {
            return Err(ValidationError::InvalidFilename(filename.to_string()));
        }
        Ok(())
    }

    /// Content type first, so a wrong type is reported even for empty files.
    pub fn validate(&self, file: &UploadedFile) -> Result<(), ValidationError> {
        self.validate_content_type(file.mime_type())?;
        self.validate_filename(file.name())?;
        self.validate_file_size(file.len())?;
        Ok(())
    }
}
